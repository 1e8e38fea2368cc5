//! Supplementary firing in the gas path between turbine and HRSG.

use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::{Ambient, Medium};
use hb_fluids::PortState;
use hb_fluids::ideal_gas::FLUE_GAS;

use crate::common::{after_drop, check_finite, is_idle};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs, input};

pub const TYPE_KEY: &str = "DuctBurner";

/// Oxygen left in gas turbine exhaust [mass %].
const EXHAUST_O2_PCT: f64 = 14.0;
/// Oxygen consumed by natural gas [kg O2 per kg fuel].
const O2_PER_KG_FUEL: f64 = 4.0;

pub const PORTS: &[PortSpec] = &[
    PortSpec::inlet("gas_in", Medium::Gas),
    PortSpec::outlet("gas_out", Medium::Gas),
];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("target_T_C", 925.0, 0.0, 1_100.0, "Firing temperature set point"),
    ParamSpec::number("excess_O2_pct", 3.0, 0.0, 14.0, "Minimum oxygen left after firing"),
    ParamSpec::optional("max_fuel_kg_s", 0.0, "Burner fuel capacity"),
    ParamSpec::number("fuel_LHV_kJ_kg", 50_000.0, 10_000.0, 150_000.0, "Fuel lower heating value"),
    ParamSpec::number("efficiency", 0.99, 0.5, 1.0, "Combustion efficiency"),
    ParamSpec::number("dp_kPa", 1.0, 0.0, 10.0, "Gas-side pressure drop"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::DuctBurner,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(DuctBurner::from_params(params)?))
}

/// Fires fuel into the exhaust stream until the outlet reaches
/// `target_T_C`, limited by fuel capacity and the oxygen floor.
#[derive(Debug, Clone, PartialEq)]
pub struct DuctBurner {
    pub target_t_c: f64,
    pub excess_o2_pct: f64,
    pub max_fuel_kg_s: Option<f64>,
    pub fuel_lhv_kj_kg: f64,
    pub efficiency: f64,
    pub dp_kpa: f64,
}

impl DuctBurner {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            target_t_c: p.number("target_T_C")?,
            excess_o2_pct: p.number("excess_O2_pct")?,
            max_fuel_kg_s: p.opt_number("max_fuel_kg_s"),
            fuel_lhv_kj_kg: p.number("fuel_LHV_kJ_kg")?,
            efficiency: p.number("efficiency")?,
            dp_kpa: p.number("dp_kPa")?,
        })
    }

    /// Fuel that keeps exhaust oxygen at `excess_O2_pct` [kg/s].
    fn oxygen_limit(&self, m_gas: f64) -> f64 {
        m_gas * (EXHAUST_O2_PCT - self.excess_o2_pct) / (100.0 * O2_PER_KG_FUEL + self.excess_o2_pct)
    }

    fn outlet_o2_pct(m_gas: f64, fuel: f64) -> f64 {
        (EXHAUST_O2_PCT * m_gas - 100.0 * O2_PER_KG_FUEL * fuel) / (m_gas + fuel)
    }
}

impl Unit for DuctBurner {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::DuctBurner
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let gas_in = *input(inputs, TYPE_KEY, "gas_in")?;
        let p_out = after_drop(gas_in.p_kpa, self.dp_kpa);
        let m_gas = gas_in.m_dot_kg_s;

        if is_idle(m_gas) {
            let mut out = UnitOutputs::default()
                .with_port("gas_out", PortState { p_kpa: p_out, ..gas_in })
                .metric("fuel_kg_s", 0.0);
            out.warn("DuctBurner: no exhaust flow, burner off");
            return Ok(out);
        }

        let h_target = FLUE_GAS.h(self.target_t_c + CELSIUS_OFFSET_K);
        let release = self.fuel_lhv_kj_kg * self.efficiency;
        let mut fuel = if h_target > gas_in.h_kj_kg {
            m_gas * (h_target - gas_in.h_kj_kg) / (release - h_target)
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        if let Some(cap) = self.max_fuel_kg_s
            && fuel > cap
        {
            warnings.push(format!(
                "DuctBurner: fuel trimmed to capacity {:.2} kg/s, target {:.0} C not reached",
                cap, self.target_t_c
            ));
            fuel = cap;
        }
        let o2_cap = self.oxygen_limit(m_gas).max(0.0);
        if fuel > o2_cap {
            warnings.push(format!(
                "DuctBurner: fuel trimmed to {:.2} kg/s to hold {:.1}% excess O2",
                o2_cap, self.excess_o2_pct
            ));
            fuel = o2_cap;
        }

        let m_out = m_gas + fuel;
        let h_out = check_finite(
            (m_gas * gas_in.h_kj_kg + fuel * release) / m_out,
            "duct burner outlet enthalpy",
        )?;
        let gas_out = PortState::from_ph(p_out, h_out, m_out, Medium::Gas)?;
        let fuel_mw = fuel * self.fuel_lhv_kj_kg / 1_000.0;

        let mut out = UnitOutputs {
            duty: UnitDuty {
                fuel_mw,
                ..UnitDuty::default()
            },
            warnings,
            ..UnitOutputs::default()
        }
        .with_port("gas_out", gas_out)
        .metric("fuel_kg_s", fuel)
        .metric("fuel_LHV_MW", fuel_mw)
        .metric("outlet_T_C", gas_out.t_c)
        .metric("O2_out_pct", Self::outlet_o2_pct(m_gas, fuel));
        if fuel == 0.0 && h_target <= gas_in.h_kj_kg {
            out.warn(format!(
                "DuctBurner: inlet {:.0} C already above target {:.0} C, not firing",
                gas_in.t_c, self.target_t_c
            ));
        }
        Ok(out)
    }
}
