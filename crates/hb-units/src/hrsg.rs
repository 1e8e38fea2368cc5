//! Single-pressure heat-recovery steam generator.

use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::{Ambient, Medium};
use hb_fluids::ideal_gas::FLUE_GAS;
use hb_fluids::{PortState, evaluate};

use crate::common::{after_drop, check_finite, is_idle, saturation_at};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitOutputs, input};

pub const TYPE_KEY: &str = "HRSG";

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("gas_in", Medium::Gas),
    PortSpec::inlet("feedwater_in", Medium::Water),
    PortSpec::outlet("steam_out", Medium::Steam),
    PortSpec::outlet("gas_out", Medium::Gas),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("hp_P_kPa_abs", 12_000.0, 500.0, 20_000.0, "Drum pressure"),
    ParamSpec::number("hp_sh_out_T_C", 540.0, 200.0, 620.0, "Superheater outlet set point"),
    ParamSpec::number("pinch_HP_K", 10.0, 1.0, 50.0, "Evaporator pinch"),
    ParamSpec::number("approach_HP_K", 5.0, 0.0, 30.0, "Economizer approach to saturation"),
    ParamSpec::number("sh_approach_K", 25.0, 5.0, 100.0, "Gas-to-superheat approach"),
    ParamSpec::number("stack_T_min_C", 90.0, 40.0, 200.0, "Lowest stack temperature"),
    ParamSpec::number("gas_dp_kPa", 2.5, 0.0, 10.0, "Gas-side pressure drop"),
    ParamSpec::number("heat_loss_pct", 1.0, 0.0, 10.0, "Casing heat loss"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::Hrsg,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(Hrsg::from_params(params)?))
}

/// Pinch-point boiler: superheater and evaporator sized by the gas
/// above `T_sat + pinch`, economizer by what is left.
///
/// ```text
/// ṁ_st = ṁ_g·(h_g,in − h_g(T_sat + pinch))·(1 − loss) / (h_sh − h_w(T_sat − approach))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Hrsg {
    pub hp_p_kpa: f64,
    pub hp_sh_out_t_c: f64,
    pub pinch_k: f64,
    pub approach_k: f64,
    pub sh_approach_k: f64,
    pub stack_t_min_c: f64,
    pub gas_dp_kpa: f64,
    pub heat_loss_pct: f64,
}

impl Hrsg {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            hp_p_kpa: p.number("hp_P_kPa_abs")?,
            hp_sh_out_t_c: p.number("hp_sh_out_T_C")?,
            pinch_k: p.number("pinch_HP_K")?,
            approach_k: p.number("approach_HP_K")?,
            sh_approach_k: p.number("sh_approach_K")?,
            stack_t_min_c: p.number("stack_T_min_C")?,
            gas_dp_kpa: p.number("gas_dp_kPa")?,
            heat_loss_pct: p.number("heat_loss_pct")?,
        })
    }

    fn no_steam(&self, gas_in: PortState, feedwater: PortState, t_sat_c: f64, why: String) -> UnitResult<UnitOutputs> {
        let gas_out = PortState {
            p_kpa: after_drop(gas_in.p_kpa, self.gas_dp_kpa),
            ..gas_in
        };
        let steam = PortState::from_ph(self.hp_p_kpa, feedwater.h_kj_kg, 0.0, Medium::Steam)?;
        let mut out = UnitOutputs::default()
            .with_port("steam_out", steam)
            .with_port("gas_out", gas_out)
            .metric("steam_kg_s", 0.0)
            .metric("duty_MWth", 0.0)
            .metric("stack_T_C", gas_out.t_c)
            .metric("T_sat_C", t_sat_c);
        out.warn(why);
        Ok(out)
    }
}

impl Unit for Hrsg {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::Hrsg
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let gas_in = *input(inputs, TYPE_KEY, "gas_in")?;
        let feedwater = *input(inputs, TYPE_KEY, "feedwater_in")?;
        let sat = saturation_at(self.hp_p_kpa)?;
        let t_sat_c = sat.t_k - CELSIUS_OFFSET_K;
        let m_gas = gas_in.m_dot_kg_s;

        if is_idle(m_gas) {
            return self.no_steam(gas_in, feedwater, t_sat_c, "HRSG: no exhaust gas, no steam raised".into());
        }
        let t_pinch_c = t_sat_c + self.pinch_k;
        if gas_in.t_c <= t_pinch_c {
            return self.no_steam(
                gas_in,
                feedwater,
                t_sat_c,
                format!(
                    "HRSG: gas inlet {:.0} C at or below pinch temperature {:.0} C",
                    gas_in.t_c, t_pinch_c
                ),
            );
        }

        let t_sh_c = self.hp_sh_out_t_c.min(gas_in.t_c - self.sh_approach_k).max(t_sat_c);
        let h_sh = evaluate(t_sh_c, self.hp_p_kpa, Medium::Steam)?.h;
        let h_eco_out = evaluate(t_sat_c - self.approach_k, self.hp_p_kpa, Medium::Water)?.h;
        let h_eco_in = feedwater.h_kj_kg.min(h_eco_out);
        let keep = 1.0 - self.heat_loss_pct / 100.0;

        let h_gas_pinch = FLUE_GAS.h(t_pinch_c + CELSIUS_OFFSET_K);
        let q_high_kw = m_gas * (gas_in.h_kj_kg - h_gas_pinch) * keep;
        let m_steam = check_finite(q_high_kw / (h_sh - h_eco_out), "HRSG steam flow")?;
        let q_eco_kw = m_steam * (h_eco_out - h_eco_in);
        let h_stack = h_gas_pinch - q_eco_kw / (m_gas * keep);

        let gas_out = PortState::from_ph(
            after_drop(gas_in.p_kpa, self.gas_dp_kpa),
            h_stack,
            m_gas,
            Medium::Gas,
        )?;
        let steam = PortState {
            t_c: t_sh_c,
            p_kpa: self.hp_p_kpa,
            h_kj_kg: h_sh,
            m_dot_kg_s: m_steam,
            medium: Medium::Steam,
        };
        let duty_mw = (q_high_kw + q_eco_kw) / 1_000.0;

        let mut out = UnitOutputs::default()
            .with_port("steam_out", steam)
            .with_port("gas_out", gas_out)
            .metric("steam_kg_s", m_steam)
            .metric("duty_MWth", duty_mw)
            .metric("stack_T_C", gas_out.t_c)
            .metric("T_sat_C", t_sat_c)
            .metric("sh_T_C", t_sh_c)
            .metric("pinch_HP_K", self.pinch_k)
            .metric("approach_HP_K", self.approach_k);

        if t_sh_c < self.hp_sh_out_t_c {
            out.warn(format!(
                "HRSG: superheat limited to {:.0} C by gas inlet {:.0} C",
                t_sh_c, gas_in.t_c
            ));
        }
        if gas_out.t_c < self.stack_t_min_c {
            out.warn(format!(
                "HRSG: stack {:.0} C below minimum {:.0} C",
                gas_out.t_c, self.stack_t_min_c
            ));
        }
        if !is_idle(feedwater.m_dot_kg_s) && feedwater.p_kpa < self.hp_p_kpa {
            out.warn(format!(
                "HRSG: feedwater at {:.0} kPa below drum pressure {:.0} kPa",
                feedwater.p_kpa, self.hp_p_kpa
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(t_gas: f64, m_gas: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert("gas_in", PortState::from_tp(t_gas, 104.0, m_gas, Medium::Gas).unwrap());
        ports.insert(
            "feedwater_in",
            PortState::from_tp(44.85, 12_500.0, 50.0, Medium::Water).unwrap(),
        );
        ports
    }

    fn hrsg() -> Hrsg {
        Hrsg::from_params(&ParamMap::new()).unwrap()
    }

    #[test]
    fn pinch_model_matches_hand_calculation() {
        let out = hrsg().evaluate(&inputs(600.0, 400.0), &Ambient::default()).unwrap();
        assert!((out.metrics["T_sat_C"] - 324.68).abs() < 0.05);
        assert!((out.metrics["steam_kg_s"] - 52.86).abs() < 0.1, "{}", out.metrics["steam_kg_s"]);
        assert!((out.metrics["stack_T_C"] - 167.4).abs() < 0.5, "{}", out.metrics["stack_T_C"]);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        let steam = out.ports["steam_out"];
        assert_eq!(steam.t_c, 540.0);
        assert_eq!(steam.medium, Medium::Steam);
    }

    #[test]
    fn water_side_gain_is_gas_side_loss_less_casing_loss() {
        let ins = inputs(600.0, 400.0);
        let out = hrsg().evaluate(&ins, &Ambient::default()).unwrap();
        let gas_in = ins["gas_in"];
        let gas_out = out.ports["gas_out"];
        let released = gas_in.m_dot_kg_s * (gas_in.h_kj_kg - gas_out.h_kj_kg) / 1_000.0;
        assert!((out.metrics["duty_MWth"] - 0.99 * released).abs() < 1e-6);
        assert_eq!(gas_out.m_dot_kg_s, gas_in.m_dot_kg_s);
    }

    #[test]
    fn cool_gas_limits_superheat() {
        let out = hrsg().evaluate(&inputs(500.0, 400.0), &Ambient::default()).unwrap();
        assert_eq!(out.ports["steam_out"].t_c, 475.0);
        assert!(out.warnings.iter().any(|w| w.contains("superheat")));
    }

    #[test]
    fn gas_below_pinch_raises_no_steam() {
        let out = hrsg().evaluate(&inputs(300.0, 400.0), &Ambient::default()).unwrap();
        assert_eq!(out.metrics["steam_kg_s"], 0.0);
        assert_eq!(out.ports["steam_out"].m_dot_kg_s, 0.0);
        assert_eq!(out.warnings.len(), 1);
    }
}
