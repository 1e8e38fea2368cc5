//! Hot-water thermal store on the district-heating network.

use hb_core::{Ambient, Medium};
use hb_fluids::PortState;

use crate::common::{after_drop, is_idle};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitOutputs, input};

pub const TYPE_KEY: &str = "ThermalStorage";

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("supply_in", Medium::HotWater),
    PortSpec::outlet("return_out", Medium::HotWater),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("SOC_init", 0.5, 0.0, 1.0, "State of charge at period start"),
    ParamSpec::number("capacity_MWh", 500.0, 1.0, 50_000.0, "Usable thermal capacity"),
    ParamSpec::number("heat_demand_MW", 120.0, 0.0, 5_000.0, "Network heat demand"),
    ParamSpec::number("return_target_C", 70.0, 20.0, 120.0, "Network return temperature"),
    ParamSpec::number("dp_kPa", 50.0, 0.0, 500.0, "Network pressure loss"),
    ParamSpec::number("period_h", 1.0, 0.0, 168.0, "Balancing period"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::Storage,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: true,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(ThermalStorage::from_params(params)?))
}

/// Absorbs the mismatch between supplied heat and network demand over one
/// balancing period and returns water at the network return temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalStorage {
    pub soc_init: f64,
    pub capacity_mwh: f64,
    pub heat_demand_mw: f64,
    pub return_target_c: f64,
    pub dp_kpa: f64,
    pub period_h: f64,
}

impl ThermalStorage {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            soc_init: p.number("SOC_init")?,
            capacity_mwh: p.number("capacity_MWh")?,
            heat_demand_mw: p.number("heat_demand_MW")?,
            return_target_c: p.number("return_target_C")?,
            dp_kpa: p.number("dp_kPa")?,
            period_h: p.number("period_h")?,
        })
    }
}

impl Unit for ThermalStorage {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::Storage
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn holds_inventory(&self) -> bool {
        true
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let supply = *input(inputs, TYPE_KEY, "supply_in")?;
        let p_return = after_drop(supply.p_kpa, self.dp_kpa);
        let back = PortState::from_tp(self.return_target_c, p_return, supply.m_dot_kg_s, Medium::HotWater)?;

        let supplied_mw = if is_idle(supply.m_dot_kg_s) {
            0.0
        } else {
            (supply.m_dot_kg_s * (supply.h_kj_kg - back.h_kj_kg) / 1_000.0).max(0.0)
        };
        let charge_mw = supplied_mw - self.heat_demand_mw;
        let soc_raw = self.soc_init + charge_mw * self.period_h / self.capacity_mwh;
        let soc = soc_raw.clamp(0.0, 1.0);

        let mut out = UnitOutputs::default()
            .with_port("return_out", back)
            .metric("SOC", soc)
            .metric("supply_C", supply.t_c)
            .metric("return_C", back.t_c)
            .metric("heat_demand_MW", self.heat_demand_mw)
            .metric("charge_MW", charge_mw);
        if soc_raw > 1.0 {
            out.warn(format!(
                "ThermalStorage: full, {:.1} MWh of surplus heat rejected",
                (soc_raw - 1.0) * self.capacity_mwh
            ));
        } else if soc_raw < 0.0 {
            out.warn(format!(
                "ThermalStorage: empty, {:.1} MWh of demand unmet",
                -soc_raw * self.capacity_mwh
            ));
        }
        if !is_idle(supply.m_dot_kg_s) && supply.t_c < self.return_target_c {
            out.warn(format!(
                "ThermalStorage: supply {:.1} C below return {:.1} C",
                supply.t_c, self.return_target_c
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn supply(t_c: f64, m: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert("supply_in", PortState::from_tp(t_c, 1_000.0, m, Medium::HotWater).unwrap());
        ports
    }

    fn store(pairs: &[(&str, f64)]) -> ThermalStorage {
        let params: ParamMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect();
        ThermalStorage::from_params(&params).unwrap()
    }

    #[test]
    fn surplus_charges_the_store() {
        let out = store(&[("heat_demand_MW", 80.0)])
            .evaluate(&supply(120.0, 500.0), &Ambient::default())
            .unwrap();
        let charge = out.metrics["charge_MW"];
        assert!(charge > 20.0 && charge < 30.0, "{charge}");
        assert!((out.metrics["SOC"] - (0.5 + charge / 500.0)).abs() < 1e-12);
        let back = out.ports["return_out"];
        assert!((back.t_c - 70.0).abs() < 1e-9);
        assert_eq!(back.p_kpa, 950.0);
        assert_eq!(back.m_dot_kg_s, 500.0);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn soc_saturates_with_a_warning() {
        let out = store(&[("heat_demand_MW", 0.0), ("capacity_MWh", 10.0), ("SOC_init", 0.9)])
            .evaluate(&supply(120.0, 500.0), &Ambient::default())
            .unwrap();
        assert_eq!(out.metrics["SOC"], 1.0);
        assert!(out.warnings[0].contains("full"));
    }

    #[test]
    fn idle_supply_drains_toward_empty() {
        let out = store(&[]).evaluate(&supply(70.0, 0.0), &Ambient::default()).unwrap();
        assert_eq!(out.metrics["charge_MW"], -120.0);
        assert!((out.metrics["SOC"] - (0.5 - 120.0 / 500.0)).abs() < 1e-12);
    }

    #[test]
    fn storage_holds_inventory() {
        assert!(store(&[]).holds_inventory());
        assert!(DESCRIPTOR.holds_inventory);
    }
}
