//! Gas turbine with ambient derate and part-load efficiency.

use hb_core::units::constants::{ISO_T_C, REFERENCE_P_KPA, REFERENCE_T_K};
use hb_core::{Ambient, Medium};
use hb_fluids::PortState;

use crate::common::{after_drop, check_finite};
use crate::error::UnitResult;
use crate::params::{ParamMap, ParamSpec, validate_params};
use crate::registry::UnitDescriptor;
use crate::traits::{PortMap, PortSpec, Unit, UnitCategory, UnitDuty, UnitOutputs};

pub const TYPE_KEY: &str = "GasTurbine";

/// Output lost per kelvin of ambient above ISO.
const DERATE_PER_K: f64 = 0.0065;
/// Fraction of fuel energy lost to casing, bearings and generator.
const MECHANICAL_LOSS: f64 = 0.015;

pub const PORTS: &[PortSpec] = &[PortSpec::outlet("exhaust_out", Medium::Gas)];

pub const PARAMS: &[ParamSpec] = &[
    ParamSpec::number("load_pct", 100.0, 0.0, 100.0, "Load as percent of rated output"),
    ParamSpec::number("rated_power_MW", 180.0, 1.0, 1_000.0, "ISO rated electrical output"),
    ParamSpec::number("eta_LHV_pct", 38.0, 10.0, 60.0, "Rated electrical efficiency, LHV"),
    ParamSpec::number("exhaust_flow_kg_s", 450.0, 1.0, 2_000.0, "Rated exhaust mass flow"),
    ParamSpec::number("exhaust_dp_kPa", 3.0, 0.0, 20.0, "Exhaust back-pressure above ambient"),
    ParamSpec::number("fuel_LHV_kJ_kg", 50_000.0, 10_000.0, 150_000.0, "Fuel lower heating value"),
];

pub const DESCRIPTOR: UnitDescriptor = UnitDescriptor {
    type_key: TYPE_KEY,
    category: UnitCategory::GasTurbine,
    ports: PORTS,
    params: PARAMS,
    holds_inventory: false,
    factory: build,
};

fn build(params: &ParamMap) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(GasTurbine::from_params(params)?))
}

#[derive(Debug, Clone, PartialEq)]
pub struct GasTurbine {
    pub load_pct: f64,
    pub rated_power_mw: f64,
    pub eta_lhv_pct: f64,
    pub exhaust_flow_kg_s: f64,
    pub exhaust_dp_kpa: f64,
    pub fuel_lhv_kj_kg: f64,
}

impl GasTurbine {
    pub fn from_params(params: &ParamMap) -> UnitResult<Self> {
        let p = validate_params(TYPE_KEY, PARAMS, params)?;
        Ok(Self {
            load_pct: p.number("load_pct")?,
            rated_power_mw: p.number("rated_power_MW")?,
            eta_lhv_pct: p.number("eta_LHV_pct")?,
            exhaust_flow_kg_s: p.number("exhaust_flow_kg_s")?,
            exhaust_dp_kpa: p.number("exhaust_dp_kPa")?,
            fuel_lhv_kj_kg: p.number("fuel_LHV_kJ_kg")?,
        })
    }

    /// Output factor for ambient temperature and pressure relative to ISO.
    pub fn ambient_factor(ambient: &Ambient) -> f64 {
        let thermal = (1.0 - DERATE_PER_K * (ambient.t_c - ISO_T_C)).clamp(0.7, 1.1);
        thermal * ambient.p_kpa / REFERENCE_P_KPA
    }

    /// Electrical efficiency at the current load [fraction].
    pub fn efficiency(&self) -> f64 {
        let load = self.load_pct / 100.0;
        self.eta_lhv_pct / 100.0 * (0.6 + 0.4 * load)
    }
}

impl Unit for GasTurbine {
    fn type_key(&self) -> &'static str {
        TYPE_KEY
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::GasTurbine
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, _inputs: &PortMap, ambient: &Ambient) -> UnitResult<UnitOutputs> {
        let load = self.load_pct / 100.0;
        let power_mw = self.rated_power_mw * load * Self::ambient_factor(ambient);
        let eta = self.efficiency();
        let fuel_mw = check_finite(power_mw / eta, "gas turbine fuel input")?;
        let fuel_kg_s = fuel_mw * 1_000.0 / self.fuel_lhv_kj_kg;

        let density_ratio = (ambient.p_kpa / REFERENCE_P_KPA) * (REFERENCE_T_K / ambient.t_k());
        let m_exh = self.exhaust_flow_kg_s * (0.75 + 0.25 * load) * density_ratio;

        let air = PortState::from_tp(ambient.t_c, ambient.p_kpa, m_exh, Medium::Gas)?;
        let q_exh_kw = fuel_mw * 1_000.0 * (1.0 - MECHANICAL_LOSS) - power_mw * 1_000.0;
        let h_exh = air.h_kj_kg + q_exh_kw / m_exh;
        let exhaust = PortState::from_ph(
            after_drop(ambient.p_kpa + self.exhaust_dp_kpa, 0.0),
            h_exh,
            m_exh,
            Medium::Gas,
        )?;

        Ok(UnitOutputs {
            duty: UnitDuty {
                power_mw,
                fuel_mw,
                ..UnitDuty::default()
            },
            ..UnitOutputs::default()
        }
        .with_port("exhaust_out", exhaust)
        .metric("power_MW", power_mw)
        .metric("fuel_LHV_MW", fuel_mw)
        .metric("fuel_kg_s", fuel_kg_s)
        .metric("eta_LHV_pct", eta * 100.0)
        .metric("exhaust_T_C", exhaust.t_c)
        .metric("exhaust_flow_kg_s", m_exh))
    }
}
