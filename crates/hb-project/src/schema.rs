//! Plant and run-case document definitions.

use std::collections::BTreeMap;

use hb_core::Ambient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::ValidationError;

/// Unit parameters as written in the plant document.
pub type ParamMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantGraph {
    #[serde(default = "default_meta")]
    pub meta: BTreeMap<String, Value>,
    /// Site conditions; the defaults table's ambient applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient: Option<Ambient>,
    pub units: Vec<UnitDefinition>,
    #[serde(default)]
    pub streams: Vec<StreamDefinition>,
}

fn default_meta() -> BTreeMap<String, Value> {
    BTreeMap::from([("version".to_string(), Value::from("1.0"))])
}

impl PlantGraph {
    pub fn new(ambient: Ambient) -> Self {
        Self {
            meta: default_meta(),
            ambient: Some(ambient),
            units: Vec::new(),
            streams: Vec::new(),
        }
    }

    /// The document's ambient, or `fallback` when it declares none.
    pub fn ambient_or(&self, fallback: &Ambient) -> Ambient {
        self.ambient.unwrap_or(*fallback)
    }

    pub fn unit(&self, id: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut UnitDefinition> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Append a unit (builder style, for tests and demos).
    pub fn with_unit(mut self, id: &str, type_key: &str, params: ParamMap) -> Self {
        self.units.push(UnitDefinition {
            id: id.to_string(),
            type_key: type_key.to_string(),
            params,
        });
        self
    }

    /// Append a stream `from -> to`, both written `unit.port`.
    pub fn with_stream(mut self, from: &str, to: &str) -> Self {
        self.streams.push(StreamDefinition {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub type_key: String,
    #[serde(default)]
    pub params: ParamMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamDefinition {
    pub from: String,
    pub to: String,
}

/// A parsed `unit.port` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub unit: &'a str,
    pub port: &'a str,
}

impl<'a> Endpoint<'a> {
    pub fn parse(text: &'a str) -> Result<Self, ValidationError> {
        match text.split_once('.') {
            Some((unit, port)) if !unit.is_empty() && !port.is_empty() => Ok(Self { unit, port }),
            _ => Err(ValidationError::MalformedEndpoint {
                endpoint: text.to_string(),
            }),
        }
    }
}

impl StreamDefinition {
    pub fn source(&self) -> Result<Endpoint<'_>, ValidationError> {
        Endpoint::parse(&self.from)
    }

    pub fn dest(&self) -> Result<Endpoint<'_>, ValidationError> {
        Endpoint::parse(&self.to)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Simulate,
    Optimize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    #[default]
    MaxPower,
    MinHeatRate,
    MaxEfficiency,
    MaxRevenue,
}

impl Objective {
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::MaxPower => "max_power",
            Objective::MinHeatRate => "min_heat_rate",
            Objective::MaxEfficiency => "max_efficiency",
            Objective::MaxRevenue => "max_revenue",
        }
    }

    pub fn needs_pricing(self) -> bool {
        matches!(self, Objective::MaxRevenue)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pricing {
    #[serde(rename = "power_USD_MWh")]
    pub power_usd_mwh: f64,
    #[serde(rename = "heat_USD_MWh")]
    pub heat_usd_mwh: f64,
    #[serde(rename = "fuel_USD_MMBtu")]
    pub fuel_usd_mmbtu: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RunCase {
    pub mode: Mode,
    pub objective: Objective,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    /// Decision variables `unit.param -> [lo, hi]`.
    #[serde(default)]
    pub bounds: BTreeMap<String, [f64; 2]>,
    #[serde(default)]
    pub constraints: BTreeMap<String, f64>,
    #[serde(default)]
    pub toggles: BTreeMap<String, bool>,
}

impl RunCase {
    pub fn simulate(objective: Objective) -> Self {
        Self {
            mode: Mode::Simulate,
            objective,
            ..Self::default()
        }
    }

    pub fn toggle(&self, name: &str) -> bool {
        self.toggles.get(name).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plant_meta_defaults_to_version() {
        let plant: PlantGraph = serde_json::from_str(r#"{"units": []}"#).unwrap();
        assert_eq!(plant.meta["version"], "1.0");
        assert_eq!(plant.ambient, None);

        let site = Ambient::new(-10.0, 90.0, 100.0);
        assert_eq!(plant.ambient_or(&site), site);
        assert_eq!(PlantGraph::new(Ambient::default()).ambient_or(&site), Ambient::default());
    }

    #[test]
    fn unit_type_key_uses_type_field() {
        let unit: UnitDefinition =
            serde_json::from_str(r#"{"id": "ST1", "type": "SteamTurbineHP", "params": {"eta_isentropic": 0.9}}"#)
                .unwrap();
        assert_eq!(unit.type_key, "SteamTurbineHP");
        assert_eq!(unit.params["eta_isentropic"], 0.9);
    }

    #[test]
    fn endpoints_split_on_first_dot() {
        let ep = Endpoint::parse("HRSG1.steam_out").unwrap();
        assert_eq!(ep.unit, "HRSG1");
        assert_eq!(ep.port, "steam_out");
        assert!(Endpoint::parse("HRSG1").is_err());
        assert!(Endpoint::parse(".steam_out").is_err());
        assert!(Endpoint::parse("HRSG1.").is_err());
    }

    #[test]
    fn run_case_wire_names() {
        let rc: RunCase = serde_json::from_str(
            r#"{
                "mode": "optimize",
                "objective": "max_revenue",
                "pricing": {"power_USD_MWh": 60, "heat_USD_MWh": 25, "fuel_USD_MMBtu": 4},
                "bounds": {"GT1.load_pct": [50, 100]},
                "toggles": {"strict_feasibility": true}
            }"#,
        )
        .unwrap();
        assert_eq!(rc.mode, Mode::Optimize);
        assert!(rc.objective.needs_pricing());
        assert_eq!(rc.pricing.unwrap().fuel_usd_mmbtu, 4.0);
        assert_eq!(rc.bounds["GT1.load_pct"], [50.0, 100.0]);
        assert!(rc.toggle("strict_feasibility"));
        assert!(!rc.toggle("other"));
    }
}
