//! Steam-to-hot-water exchanger feeding a district-heating network.

use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::{Ambient, Medium};
use hb_fluids::{PortState, evaluate};

use crate::common::{is_idle, saturation_at};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};

pub const TYPE_KEY: &str = "DistrictHeater";

/// Closest approach of supply water to the condensing steam [K].
const TERMINAL_DIFFERENCE_K: f64 = 3.0;

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("steam_in", Medium::Steam),
    PortSpec::outlet("drain_out", Medium::Water),
    PortSpec::inlet("return_in", Medium::HotWater),
    PortSpec::outlet("supply_out", Medium::HotWater),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("supply_set_C", 120.0, 50.0, 180.0, "Network supply set point"),
    ParamSpec::number("return_target_C", 70.0, 20.0, 120.0, "Assumed return when none is connected"),
    ParamSpec::number("m_dot_hot_kg_s", 500.0, 0.0, 5_000.0, "Network circulation"),
    ParamSpec::number("supply_P_kPa_abs", 1_000.0, 200.0, 2_500.0, "Network supply pressure"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::DistrictHeating,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(DistrictHeater::from_params(params)?))
}

/// Condenses extraction steam against network water.
///
/// Heat delivered is the lesser of what lifts the network to its set
/// point and what the steam releases condensing to saturated liquid.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictHeater {
    pub supply_set_c: f64,
    pub return_target_c: f64,
    pub m_dot_hot_kg_s: f64,
    pub supply_p_kpa: f64,
}

impl DistrictHeater {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            supply_set_c: p.number("supply_set_C")?,
            return_target_c: p.number("return_target_C")?,
            m_dot_hot_kg_s: p.number("m_dot_hot_kg_s")?,
            supply_p_kpa: p.number("supply_P_kPa_abs")?,
        })
    }
}

impl Unit for DistrictHeater {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::DistrictHeating
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let steam = *input(inputs, TYPE_KEY, "steam_in")?;
        let ret = *input(inputs, TYPE_KEY, "return_in")?;
        let m_hot = self.m_dot_hot_kg_s;
        let mut warnings = Vec::new();

        let return_c = if is_idle(ret.m_dot_kg_s) {
            self.return_target_c
        } else {
            ret.t_c
        };
        let h_return = evaluate(return_c, self.supply_p_kpa, Medium::HotWater)?.h;

        let sat = saturation_at(steam.p_kpa)?;
        let t_sat_c = sat.t_k - CELSIUS_OFFSET_K;
        let t_max = t_sat_c - TERMINAL_DIFFERENCE_K;
        let t_goal = if self.supply_set_c > t_max {
            warnings.push(format!(
                "DistrictHeater: steam at {:.0} kPa limits supply to {:.1} C",
                steam.p_kpa, t_max
            ));
            t_max
        } else {
            self.supply_set_c
        };
        let h_goal = evaluate(t_goal, self.supply_p_kpa, Medium::HotWater)?.h;

        let required_kw = (m_hot * (h_goal - h_return)).max(0.0);
        let available_kw = if is_idle(steam.m_dot_kg_s) {
            0.0
        } else {
            (steam.m_dot_kg_s * (steam.h_kj_kg - sat.liquid.h)).max(0.0)
        };
        let q_kw = required_kw.min(available_kw);
        let shortfall_mw = (required_kw - q_kw) / 1_000.0;
        if shortfall_mw > 1e-3 * required_kw / 1_000.0 && required_kw > 0.0 {
            warnings.push(format!(
                "DistrictHeater: steam covers {:.1} of {:.1} MWth",
                q_kw / 1_000.0,
                required_kw / 1_000.0
            ));
        }

        let supply = if is_idle(m_hot) {
            PortState::from_tp(return_c, self.supply_p_kpa, 0.0, Medium::HotWater)?
        } else {
            PortState::from_ph(self.supply_p_kpa, h_return + q_kw / m_hot, m_hot, Medium::HotWater)?
        };
        let drain = if is_idle(steam.m_dot_kg_s) {
            PortState {
                t_c: t_sat_c,
                p_kpa: steam.p_kpa,
                h_kj_kg: sat.liquid.h,
                m_dot_kg_s: 0.0,
                medium: Medium::Water,
            }
        } else {
            PortState::from_ph(
                steam.p_kpa,
                steam.h_kj_kg - q_kw / steam.m_dot_kg_s,
                steam.m_dot_kg_s,
                Medium::Water,
            )?
        };

        Ok(UnitOutputs {
            duty: UnitDuty {
                heat_out_mw: q_kw / 1_000.0,
                ..UnitDuty::default()
            },
            warnings,
            ..UnitOutputs::default()
        }
        .with_port("supply_out", supply)
        .with_port("drain_out", drain)
        .metric("heat_MWth", q_kw / 1_000.0)
        .metric("supply_C", supply.t_c)
        .metric("return_C", return_c)
        .metric("steam_kg_s", steam.m_dot_kg_s)
        .metric("shortfall_MWth", shortfall_mw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn inputs(m_steam: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert(
            "steam_in",
            PortState::from_tp(200.0, 500.0, m_steam, Medium::Steam).unwrap(),
        );
        ports.insert(
            "return_in",
            PortState::from_tp(70.0, 950.0, 500.0, Medium::HotWater).unwrap(),
        );
        ports
    }

    fn heater() -> DistrictHeater {
        DistrictHeater::from_params(&ParamMap::new()).unwrap()
    }

    #[test]
    fn ample_steam_reaches_set_point() {
        let out = heater().evaluate(&inputs(60.0), &Ambient::default()).unwrap();
        let supply = out.ports["supply_out"];
        assert!((supply.t_c - 120.0).abs() < 1e-3);
        assert_eq!(out.metrics["shortfall_MWth"], 0.0);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        let heat = out.duty.heat_out_mw;
        assert!(heat > 100.0 && heat < 110.0, "{heat}");
    }

    #[test]
    fn energy_leaving_steam_enters_network() {
        let ins = inputs(60.0);
        let out = heater().evaluate(&ins, &Ambient::default()).unwrap();
        let steam = ins["steam_in"];
        let drain = out.ports["drain_out"];
        let from_steam = steam.m_dot_kg_s * (steam.h_kj_kg - drain.h_kj_kg) / 1_000.0;
        assert!((from_steam - out.duty.heat_out_mw).abs() < 1e-9);
        assert_eq!(drain.medium, Medium::Water);
        assert_eq!(drain.m_dot_kg_s, steam.m_dot_kg_s);
    }

    #[test]
    fn short_steam_reports_shortfall() {
        let out = heater().evaluate(&inputs(20.0), &Ambient::default()).unwrap();
        assert!(out.metrics["shortfall_MWth"] > 10.0);
        assert!(out.ports["supply_out"].t_c < 120.0);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn low_pressure_steam_caps_supply() {
        let mut params = ParamMap::new();
        params.insert("supply_set_C".into(), Value::from(160.0));
        let heater = DistrictHeater::from_params(&params).unwrap();
        let out = heater.evaluate(&inputs(80.0), &Ambient::default()).unwrap();
        assert!(out.ports["supply_out"].t_c < 151.0);
        assert!(out.warnings[0].contains("limits supply"));
    }
}
