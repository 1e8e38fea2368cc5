//! Arena graph of units, ports and streams.

use core::fmt;

use hb_core::{Medium, PortId, StreamId, UnitId};

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    Inlet,
    Outlet,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortKind::Inlet => "inlet",
            PortKind::Outlet => "outlet",
        })
    }
}

/// A process unit in the plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNode {
    pub id: UnitId,
    pub name: String,
    /// Ports in declaration order.
    pub ports: Vec<PortId>,
    /// Holds inventory (storage, hotwell) that can absorb a recycle loop.
    pub holds_inventory: bool,
}

/// A named port on a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    pub unit: UnitId,
    pub name: String,
    pub kind: PortKind,
    pub medium: Medium,
}

/// A directed stream from an outlet to an inlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stream {
    pub id: StreamId,
    pub from: PortId,
    pub to: PortId,
}

/// The plant graph: a validated, immutable arena.
///
/// Units, ports and streams are stored in vectors indexed by their IDs.
/// Every port is attached to at most one stream.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) units: Vec<UnitNode>,
    pub(crate) ports: Vec<Port>,
    pub(crate) streams: Vec<Stream>,
    /// Stream attached to each port, indexed by port.
    pub(crate) port_stream: Vec<Option<StreamId>>,
}

impl Graph {
    pub fn units(&self) -> &[UnitNode] {
        &self.units
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitNode> {
        self.units.get(id.ix())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.ix())
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream> {
        self.streams.get(id.ix())
    }

    /// Find a unit by name.
    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.units.iter().find(|u| u.name == name).map(|u| u.id)
    }

    /// Find a port on `unit` by name.
    pub fn find_port(&self, unit: UnitId, name: &str) -> Option<PortId> {
        self.unit(unit)?
            .ports
            .iter()
            .copied()
            .find(|&p| self.ports[p.ix()].name == name)
    }

    /// Stream attached to a port, if any.
    pub fn port_stream(&self, port: PortId) -> Option<StreamId> {
        self.port_stream.get(port.ix()).copied().flatten()
    }

    /// Unit owning the source end of a stream.
    pub fn source_unit(&self, stream: StreamId) -> Option<UnitId> {
        let s = self.stream(stream)?;
        Some(self.port(s.from)?.unit)
    }

    /// Unit owning the destination end of a stream.
    pub fn dest_unit(&self, stream: StreamId) -> Option<UnitId> {
        let s = self.stream(stream)?;
        Some(self.port(s.to)?.unit)
    }

    /// `unit.port` label for messages.
    pub fn qualified_name(&self, port: PortId) -> String {
        match self.port(port) {
            Some(p) => format!("{}.{}", self.units[p.unit.ix()].name, p.name),
            None => format!("<port {}>", port),
        }
    }

    /// Streams entering `unit`, in port declaration order.
    pub fn inbound_streams(&self, unit: UnitId) -> Vec<StreamId> {
        self.attached_streams(unit, PortKind::Inlet)
    }

    /// Streams leaving `unit`, in port declaration order.
    pub fn outbound_streams(&self, unit: UnitId) -> Vec<StreamId> {
        self.attached_streams(unit, PortKind::Outlet)
    }

    fn attached_streams(&self, unit: UnitId, kind: PortKind) -> Vec<StreamId> {
        let Some(node) = self.unit(unit) else {
            return Vec::new();
        };
        node.ports
            .iter()
            .filter(|p| self.ports[p.ix()].kind == kind)
            .filter_map(|&p| self.port_stream(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_kind_display() {
        assert_eq!(PortKind::Inlet.to_string(), "inlet");
        assert_eq!(PortKind::Outlet.to_string(), "outlet");
    }
}
