//! Result data types.

use std::collections::BTreeMap;

use hb_fluids::PortState;
use hb_units::UnitDuty;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything one solve reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantResult {
    pub summary: Summary,
    pub violations: Vec<String>,
    pub unit_states: BTreeMap<String, UnitState>,
    pub mass_energy_balance: MassEnergyBalance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_heating: Option<DistrictHeating>,
    pub meta: ResultMeta,
}

/// Plant-level performance figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "GT_power_MW")]
    pub gt_power_mw: f64,
    #[serde(rename = "ST_power_MW")]
    pub st_power_mw: f64,
    #[serde(rename = "AUX_load_MW")]
    pub aux_load_mw: f64,
    #[serde(rename = "NET_power_MW")]
    pub net_power_mw: f64,
    #[serde(rename = "NET_eff_LHV_pct")]
    pub net_eff_lhv_pct: f64,
    #[serde(rename = "heat_out_MWth")]
    pub heat_out_mwth: f64,
    #[serde(rename = "fuel_LHV_MW")]
    pub fuel_lhv_mw: f64,
    /// Net heat rate; absent when the plant produces no net power.
    #[serde(rename = "heat_rate_kJ_kWh", default)]
    pub heat_rate_kj_kwh: Option<f64>,
    /// Hourly margin; absent without pricing.
    #[serde(rename = "revenue_USD_h", default)]
    pub revenue_usd_h: Option<f64>,
}

impl Summary {
    /// Look up a summary figure by its serialized name.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "GT_power_MW" => Some(self.gt_power_mw),
            "ST_power_MW" => Some(self.st_power_mw),
            "AUX_load_MW" => Some(self.aux_load_mw),
            "NET_power_MW" => Some(self.net_power_mw),
            "NET_eff_LHV_pct" => Some(self.net_eff_lhv_pct),
            "heat_out_MWth" => Some(self.heat_out_mwth),
            "fuel_LHV_MW" => Some(self.fuel_lhv_mw),
            "heat_rate_kJ_kWh" => self.heat_rate_kj_kwh,
            "revenue_USD_h" => self.revenue_usd_h,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Ok,
    /// Evaluated, with operating notes in `warnings`.
    Warning,
    /// No flow reached the unit.
    Idle,
}

/// Final state of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitState {
    #[serde(rename = "type")]
    pub type_key: String,
    /// Parameters after the defaults merge.
    pub params: BTreeMap<String, Value>,
    pub ports: BTreeMap<String, PortState>,
    pub duty: UnitDuty,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassEnergyBalance {
    pub closure_error_pct: f64,
    pub converged: bool,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictHeating {
    #[serde(rename = "DHN_SOC", default, skip_serializing_if = "Option::is_none")]
    pub soc: Option<f64>,
    #[serde(rename = "heat_supply_C", default, skip_serializing_if = "Option::is_none")]
    pub supply_c: Option<f64>,
    #[serde(rename = "heat_return_C", default, skip_serializing_if = "Option::is_none")]
    pub return_c: Option<f64>,
}

/// Provenance of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    pub timestamp_utc: String,
    pub plant_hash: String,
    pub solver_version: String,
    /// Additional entries such as `optimizer_status`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResultMeta {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }
}
