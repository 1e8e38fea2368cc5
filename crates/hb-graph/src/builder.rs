//! Incremental graph builder.

use hb_core::{Medium, PortId, StreamId, UnitId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, Port, PortKind, Stream, UnitNode};

/// Builder for constructing a plant graph incrementally.
///
/// Use `add_unit`, `add_port` and `connect` to build up the graph, then call
/// `build()` to freeze it. Every structural rule is checked as it is added,
/// so `build()` cannot fail.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    units: Vec<UnitNode>,
    ports: Vec<Port>,
    streams: Vec<Stream>,
    port_stream: Vec<Option<StreamId>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit and return its ID.
    pub fn add_unit(&mut self, name: impl Into<String>, holds_inventory: bool) -> GraphResult<UnitId> {
        let name = name.into();
        if self.units.iter().any(|u| u.name == name) {
            return Err(GraphError::DuplicateUnit { name });
        }
        let id = UnitId::from_index(self.units.len() as u32);
        self.units.push(UnitNode {
            id,
            name,
            ports: Vec::new(),
            holds_inventory,
        });
        Ok(id)
    }

    /// Declare a port on `unit`.
    pub fn add_port(
        &mut self,
        unit: UnitId,
        name: impl Into<String>,
        kind: PortKind,
        medium: Medium,
    ) -> GraphResult<PortId> {
        let name = name.into();
        let node = self
            .units
            .get(unit.ix())
            .ok_or(GraphError::UnknownUnit { unit })?;
        if node.ports.iter().any(|p| self.ports[p.ix()].name == name) {
            return Err(GraphError::DuplicatePort {
                port: format!("{}.{}", node.name, name),
            });
        }

        let id = PortId::from_index(self.ports.len() as u32);
        self.ports.push(Port {
            id,
            unit,
            name,
            kind,
            medium,
        });
        self.port_stream.push(None);
        self.units[unit.ix()].ports.push(id);
        Ok(id)
    }

    /// Connect an outlet to an inlet.
    pub fn connect(&mut self, from: PortId, to: PortId) -> GraphResult<StreamId> {
        let src = self
            .ports
            .get(from.ix())
            .ok_or(GraphError::UnknownPort { port: from })?;
        let dst = self
            .ports
            .get(to.ix())
            .ok_or(GraphError::UnknownPort { port: to })?;

        if src.kind != PortKind::Outlet {
            return Err(GraphError::PortDirection {
                port: self.label(from),
                expected: PortKind::Outlet,
            });
        }
        if dst.kind != PortKind::Inlet {
            return Err(GraphError::PortDirection {
                port: self.label(to),
                expected: PortKind::Inlet,
            });
        }
        if self.port_stream[to.ix()].is_some() {
            return Err(GraphError::PortAlreadyFed {
                port: self.label(to),
            });
        }
        if self.port_stream[from.ix()].is_some() {
            return Err(GraphError::OutletAlreadyConnected {
                port: self.label(from),
            });
        }
        if !src.medium.compatible_with(dst.medium) {
            return Err(GraphError::MediumMismatch {
                from: self.label(from),
                to: self.label(to),
                from_medium: src.medium,
                to_medium: dst.medium,
            });
        }

        let id = StreamId::from_index(self.streams.len() as u32);
        self.streams.push(Stream { id, from, to });
        self.port_stream[from.ix()] = Some(id);
        self.port_stream[to.ix()] = Some(id);
        Ok(id)
    }

    /// Look up a port on a unit by name.
    pub fn find_port(&self, unit: UnitId, name: &str) -> Option<PortId> {
        self.units
            .get(unit.ix())?
            .ports
            .iter()
            .copied()
            .find(|p| self.ports[p.ix()].name == name)
    }

    /// Freeze into an immutable `Graph`.
    pub fn build(self) -> Graph {
        Graph {
            units: self.units,
            ports: self.ports,
            streams: self.streams,
            port_stream: self.port_stream,
        }
    }

    fn label(&self, port: PortId) -> String {
        let p = &self.ports[port.ix()];
        format!("{}.{}", self.units[p.unit.ix()].name, p.name)
    }
}
