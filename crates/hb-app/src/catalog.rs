//! Registry listing for frontends.

use hb_units::{ParamSpec, PortSpec, UnitCategory, UnitRegistry};
use serde::Serialize;

/// Everything a frontend needs to offer one unit type.
#[derive(Debug, Clone, Serialize)]
pub struct UnitInfo {
    #[serde(rename = "type")]
    pub type_key: &'static str,
    pub category: UnitCategory,
    pub holds_inventory: bool,
    pub ports: &'static [PortSpec],
    pub params: &'static [ParamSpec],
}

/// Registered unit types, sorted by type key.
pub fn unit_catalog(registry: &UnitRegistry) -> Vec<UnitInfo> {
    registry
        .descriptors()
        .map(|d| UnitInfo {
            type_key: d.type_key,
            category: d.category,
            holds_inventory: d.holds_inventory,
            ports: d.ports,
            params: d.params,
        })
        .collect()
}
