//! Boiler feed pump.

use hb_core::{Ambient, Medium};
use hb_fluids::{PortState, evaluate};

use crate::common::{check_finite, is_idle};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};

pub const TYPE_KEY: &str = "FeedwaterPump";

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("water_in", Medium::Water),
    PortSpec::outlet("water_out", Medium::Water),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("outlet_P_kPa_abs", 12_500.0, 100.0, 25_000.0, "Discharge pressure"),
    ParamSpec::number("eta_pump", 0.8, 0.3, 1.0, "Hydraulic efficiency"),
    ParamSpec::number("motor_efficiency", 0.95, 0.5, 1.0, "Drive motor efficiency"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::Pump,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(FeedwaterPump::from_params(params)?))
}

/// Incompressible pump: `Δh = v·ΔP / η`, motor power charged to auxiliaries.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedwaterPump {
    pub outlet_p_kpa: f64,
    pub eta_pump: f64,
    pub motor_efficiency: f64,
}

impl FeedwaterPump {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            outlet_p_kpa: p.number("outlet_P_kPa_abs")?,
            eta_pump: p.number("eta_pump")?,
            motor_efficiency: p.number("motor_efficiency")?,
        })
    }
}

impl Unit for FeedwaterPump {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::Pump
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let inlet = *input(inputs, TYPE_KEY, "water_in")?;
        let dp = self.outlet_p_kpa - inlet.p_kpa;

        if dp <= 0.0 {
            let mut out = UnitOutputs::default()
                .with_port("water_out", inlet)
                .metric("dh_kJ_kg", 0.0);
            out.warn(format!(
                "FeedwaterPump: suction {:.0} kPa at or above discharge {:.0} kPa",
                inlet.p_kpa, self.outlet_p_kpa
            ));
            return Ok(out);
        }

        let rho = evaluate(inlet.t_c, inlet.p_kpa, Medium::Water)?.rho;
        let dh = check_finite(dp / rho / self.eta_pump, "pump enthalpy rise")?;
        let outlet = PortState::from_ph(
            self.outlet_p_kpa,
            inlet.h_kj_kg + dh,
            inlet.m_dot_kg_s,
            Medium::Water,
        )?;
        let aux_mw = if is_idle(inlet.m_dot_kg_s) {
            0.0
        } else {
            inlet.m_dot_kg_s * dh / self.motor_efficiency / 1_000.0
        };

        Ok(UnitOutputs {
            duty: UnitDuty {
                aux_mw,
                ..UnitDuty::default()
            },
            ..UnitOutputs::default()
        }
        .with_port("water_out", outlet)
        .metric("dh_kJ_kg", dh)
        .metric("aux_MW", aux_mw)
        .metric("outlet_T_C", outlet.t_c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condensate(m: f64) -> PortMap {
        let mut ports = PortMap::new();
        ports.insert("water_in", PortState::from_tp(41.0, 8.0, m, Medium::Water).unwrap());
        ports
    }

    #[test]
    fn raises_pressure_and_charges_motor_power() {
        let pump = FeedwaterPump::from_params(&ParamMap::new()).unwrap();
        let out = pump.evaluate(&condensate(50.0), &Ambient::default()).unwrap();
        let dh = out.metrics["dh_kJ_kg"];
        assert!((dh - 15.75).abs() < 0.05, "dh = {dh}");
        let water = out.ports["water_out"];
        assert_eq!(water.p_kpa, 12_500.0);
        assert_eq!(water.m_dot_kg_s, 50.0);
        assert!((out.duty.aux_mw - 50.0 * dh / 0.95 / 1_000.0).abs() < 1e-12);
        assert!(water.t_c > 41.0 && water.t_c < 43.0);
    }

    #[test]
    fn idle_pump_draws_nothing() {
        let pump = FeedwaterPump::from_params(&ParamMap::new()).unwrap();
        let out = pump.evaluate(&condensate(0.0), &Ambient::default()).unwrap();
        assert_eq!(out.duty.aux_mw, 0.0);
    }
}
