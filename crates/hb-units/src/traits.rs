//! The unit contract.

use std::collections::BTreeMap;
use std::fmt;

use hb_core::{Ambient, Medium};
use hb_fluids::PortState;
use hb_graph::PortKind;
use serde::{Deserialize, Serialize};

use crate::error::{UnitError, UnitResult};

/// Port states keyed by port name.
pub type PortMap = BTreeMap<&'static str, PortState>;

/// Scalar results a unit publishes for constraints and reporting.
pub type Metrics = BTreeMap<&'static str, f64>;

/// Static description of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    pub name: &'static str,
    #[serde(serialize_with = "serialize_kind")]
    pub direction: PortKind,
    pub medium: Medium,
}

fn serialize_kind<S: serde::Serializer>(kind: &PortKind, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(kind)
}

impl PortSpec {
    pub const fn inlet(name: &'static str, medium: Medium) -> Self {
        Self {
            name,
            direction: PortKind::Inlet,
            medium,
        }
    }

    pub const fn outlet(name: &'static str, medium: Medium) -> Self {
        Self {
            name,
            direction: PortKind::Outlet,
            medium,
        }
    }
}

/// Plant-level bookkeeping category of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    GasTurbine,
    DuctBurner,
    Hrsg,
    SteamTurbine,
    Condenser,
    Pump,
    DistrictHeating,
    Storage,
}

impl UnitCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitCategory::GasTurbine => "gas_turbine",
            UnitCategory::DuctBurner => "duct_burner",
            UnitCategory::Hrsg => "hrsg",
            UnitCategory::SteamTurbine => "steam_turbine",
            UnitCategory::Condenser => "condenser",
            UnitCategory::Pump => "pump",
            UnitCategory::DistrictHeating => "district_heating",
            UnitCategory::Storage => "storage",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy bookkeeping of one unit [MW].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDuty {
    /// Electrical output.
    #[serde(rename = "power_MW", default)]
    pub power_mw: f64,
    /// Electrical auxiliary consumption.
    #[serde(rename = "aux_MW", default)]
    pub aux_mw: f64,
    /// Fuel energy input, LHV basis.
    #[serde(rename = "fuel_LHV_MW", default)]
    pub fuel_mw: f64,
    /// Useful heat delivered to a customer.
    #[serde(rename = "heat_out_MWth", default)]
    pub heat_out_mw: f64,
}

/// Everything a unit evaluation produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOutputs {
    /// Outbound port states.
    pub ports: PortMap,
    pub duty: UnitDuty,
    pub metrics: Metrics,
    /// Non-fatal operating notes (trimmed firing, flow limits, ...).
    pub warnings: Vec<String>,
}

impl UnitOutputs {
    pub fn with_port(mut self, name: &'static str, state: PortState) -> Self {
        self.ports.insert(name, state);
        self
    }

    pub fn metric(mut self, name: &'static str, value: f64) -> Self {
        self.metrics.insert(name, value);
        self
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// A process unit: fixed parameters plus a pure evaluation.
///
/// `evaluate` must depend only on its inputs, the unit's parameters and the
/// ambient; implementations keep no state between calls.
pub trait Unit: Send + Sync + fmt::Debug {
    fn type_key(&self) -> &'static str;

    fn category(&self) -> UnitCategory;

    fn ports(&self) -> &'static [PortSpec];

    /// Holds an inventory that can absorb a recycle loop (storage tanks).
    fn holds_inventory(&self) -> bool {
        false
    }

    fn evaluate(&self, inputs: &PortMap, ambient: &Ambient) -> UnitResult<UnitOutputs>;
}

/// Fetch an inbound port state.
pub fn input<'a>(
    inputs: &'a PortMap,
    type_key: &'static str,
    port: &'static str,
) -> UnitResult<&'a PortState> {
    inputs
        .get(port)
        .ok_or(UnitError::MissingPort { type_key, port })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_spec_serializes_direction_as_text() {
        let spec = PortSpec::inlet("steam_in", Medium::Steam);
        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(json["direction"], "inlet");
        assert_eq!(json["medium"], "steam");
    }

    #[test]
    fn missing_port_names_the_port() {
        let err = input(&PortMap::new(), "Condenser", "steam_in").unwrap_err();
        assert_eq!(err.to_string(), "Condenser has no input for port 'steam_in'");
    }
}
