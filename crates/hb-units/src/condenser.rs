//! Surface condenser on a once-through cooling-water circuit.

use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::{Ambient, Medium};
use hb_fluids::PortState;

use crate::common::{check_finite, is_idle, saturation_at};
use crate::error::{FieldError, UnitResult};
use crate::params::{ParamMap, ParamSpec, check_params, finish};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};

pub const TYPE_KEY: &str = "Condenser";

/// Specific heat of cooling water [kJ/(kg·K)].
const CW_CP: f64 = 4.186;
/// Smallest terminal difference between saturation and cooling-water outlet [K].
const MIN_TTD_K: f64 = 3.0;

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("steam_in", Medium::Steam),
    PortSpec::outlet("condensate_out", Medium::Water),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("vacuum_kPa_abs", 8.0, 2.0, 50.0, "Condenser pressure"),
    ParamSpec::number("cw_in_C", 20.0, 0.0, 40.0, "Cooling-water inlet temperature"),
    ParamSpec::number("cw_out_max_C", 28.0, 1.0, 50.0, "Cooling-water outlet limit"),
    ParamSpec::number("subcool_K", 0.0, 0.0, 10.0, "Condensate subcooling"),
    ParamSpec::number("cw_pump_kJ_kg", 0.25, 0.0, 2.0, "Cooling-water pumping energy"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::Condenser,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(Condenser::from_params(params)?))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condenser {
    pub vacuum_kpa: f64,
    pub cw_in_c: f64,
    pub cw_out_max_c: f64,
    pub subcool_k: f64,
    pub cw_pump_kj_kg: f64,
}

impl Condenser {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let (values, mut errors) = check_params(PARAMS, params);
        if let (Some(cw_in), Some(cw_out)) = (values.opt_number("cw_in_C"), values.opt_number("cw_out_max_C"))
            && cw_out <= cw_in
        {
            errors.push(FieldError::new(
                "cw_out_max_C",
                format!("{} must exceed cw_in_C {}", cw_out, cw_in),
            ));
        }
        let p = finish(TYPE_KEY, values, errors)?;
        Ok(Self {
            vacuum_kpa: p.number("vacuum_kPa_abs")?,
            cw_in_c: p.number("cw_in_C")?,
            cw_out_max_c: p.number("cw_out_max_C")?,
            subcool_k: p.number("subcool_K")?,
            cw_pump_kj_kg: p.number("cw_pump_kJ_kg")?,
        })
    }

    fn condensate(&self, m_dot: f64) -> UnitResult<(PortState, f64)> {
        let sat = saturation_at(self.vacuum_kpa)?;
        let t_sat_c = sat.t_k - CELSIUS_OFFSET_K;
        let state = if self.subcool_k > 0.0 {
            PortState::from_tp(t_sat_c - self.subcool_k, self.vacuum_kpa, m_dot, Medium::Water)?
        } else {
            PortState {
                t_c: t_sat_c,
                p_kpa: self.vacuum_kpa,
                h_kj_kg: sat.liquid.h,
                m_dot_kg_s: m_dot,
                medium: Medium::Water,
            }
        };
        Ok((state, t_sat_c))
    }
}

impl Unit for Condenser {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::Condenser
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let steam = *input(inputs, TYPE_KEY, "steam_in")?;
        let m_dot = steam.m_dot_kg_s;
        let (condensate, t_sat_c) = self.condensate(m_dot)?;

        let duty_kw = if is_idle(m_dot) {
            0.0
        } else {
            (m_dot * (steam.h_kj_kg - condensate.h_kj_kg)).max(0.0)
        };
        let cw_flow = check_finite(
            duty_kw / (CW_CP * (self.cw_out_max_c - self.cw_in_c)),
            "cooling-water flow",
        )?;
        let aux_mw = cw_flow * self.cw_pump_kj_kg / 1_000.0;

        let mut out = UnitOutputs {
            duty: UnitDuty {
                aux_mw,
                ..UnitDuty::default()
            },
            ..UnitOutputs::default()
        }
        .with_port("condensate_out", condensate)
        .metric("duty_MWth", duty_kw / 1_000.0)
        .metric("T_sat_C", t_sat_c)
        .metric("cw_flow_kg_s", cw_flow)
        .metric("aux_MW", aux_mw);

        if t_sat_c - self.cw_out_max_c < MIN_TTD_K {
            out.warn(format!(
                "Condenser: saturation {:.1} C too close to cooling-water outlet {:.1} C",
                t_sat_c, self.cw_out_max_c
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn exhaust(m: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert("steam_in", PortState::from_ph(8.0, 2196.7, m, Medium::Steam).unwrap());
        ports
    }

    #[test]
    fn condensate_leaves_saturated() {
        let cond = Condenser::from_params(&ParamMap::new()).unwrap();
        let out = cond.evaluate(&exhaust(100.0), &Ambient::default()).unwrap();
        let water = out.ports["condensate_out"];
        assert!((water.t_c - 41.51).abs() < 0.05);
        assert!((water.h_kj_kg - 173.85).abs() < 0.1);
        assert_eq!(water.m_dot_kg_s, 100.0);
        assert!((out.metrics["duty_MWth"] - 202.28).abs() < 0.05);
        let cw = out.metrics["cw_flow_kg_s"];
        assert!((cw - 202_285.0 / (4.186 * 8.0)).abs() < 2.0);
        assert!((out.duty.aux_mw - cw * 0.25 / 1_000.0).abs() < 1e-12);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn subcooling_lowers_condensate_temperature() {
        let mut params = ParamMap::new();
        params.insert("subcool_K".into(), Value::from(3.0));
        let cond = Condenser::from_params(&params).unwrap();
        let out = cond.evaluate(&exhaust(100.0), &Ambient::default()).unwrap();
        assert!((out.ports["condensate_out"].t_c - 38.51).abs() < 0.05);
    }

    #[test]
    fn cooling_water_range_must_be_positive() {
        let mut params = ParamMap::new();
        params.insert("cw_out_max_C".into(), Value::from(15.0));
        assert!(Condenser::from_params(&params).is_err());
    }

    #[test]
    fn poor_vacuum_for_warm_water_warns() {
        let mut params = ParamMap::new();
        params.insert("vacuum_kPa_abs".into(), Value::from(4.0));
        params.insert("cw_out_max_C".into(), Value::from(28.0));
        let cond = Condenser::from_params(&params).unwrap();
        let out = cond.evaluate(&exhaust(10.0), &Ambient::default()).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }
}
