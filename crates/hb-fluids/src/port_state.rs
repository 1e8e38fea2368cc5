//! The flow state exchanged between units.

use hb_core::units::{MassRate, Pressure, Temperature, celsius, k, kgps, kpa};
use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::{Ambient, Medium, MediumFamily};
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, FluidResult};
use crate::properties::{PropertyModel, standard};

/// Coldest temperature a zero-flow water-family port is seeded at [°C].
///
/// Keeps seeds inside the IF97 range when the ambient is below freezing.
pub const WATER_SEED_MIN_C: f64 = 1.0;

/// State at one port: temperature, pressure, enthalpy, flow and medium.
///
/// Constructors keep `h_kj_kg` consistent with (T, P, medium). For wet
/// steam T is the saturation temperature and the state is pinned by (P, h).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortState {
    #[serde(rename = "T_C")]
    pub t_c: f64,
    #[serde(rename = "P_kPa_abs")]
    pub p_kpa: f64,
    #[serde(rename = "h_kJ_kg")]
    pub h_kj_kg: f64,
    #[serde(rename = "m_dot_kg_s")]
    pub m_dot_kg_s: f64,
    pub medium: Medium,
}

fn check_flow(m_dot_kg_s: f64) -> FluidResult<()> {
    if !m_dot_kg_s.is_finite() || m_dot_kg_s < 0.0 {
        return Err(FluidError::NonPhysical {
            what: "mass flow must be finite and non-negative",
        });
    }
    Ok(())
}

impl PortState {
    /// State at (T, P) with enthalpy from the standard model.
    pub fn from_tp(t_c: f64, p_kpa: f64, m_dot_kg_s: f64, medium: Medium) -> FluidResult<Self> {
        Self::from_tp_with(standard(), t_c, p_kpa, m_dot_kg_s, medium)
    }

    pub fn from_tp_with<M: PropertyModel + ?Sized>(
        model: &M,
        t_c: f64,
        p_kpa: f64,
        m_dot_kg_s: f64,
        medium: Medium,
    ) -> FluidResult<Self> {
        check_flow(m_dot_kg_s)?;
        let props = model.evaluate(celsius(t_c), kpa(p_kpa), medium)?;
        Ok(Self {
            t_c,
            p_kpa,
            h_kj_kg: props.h,
            m_dot_kg_s,
            medium,
        })
    }

    /// State at (P, h) with temperature from a flash.
    pub fn from_ph(p_kpa: f64, h_kj_kg: f64, m_dot_kg_s: f64, medium: Medium) -> FluidResult<Self> {
        Self::from_ph_with(standard(), p_kpa, h_kj_kg, m_dot_kg_s, medium)
    }

    pub fn from_ph_with<M: PropertyModel + ?Sized>(
        model: &M,
        p_kpa: f64,
        h_kj_kg: f64,
        m_dot_kg_s: f64,
        medium: Medium,
    ) -> FluidResult<Self> {
        check_flow(m_dot_kg_s)?;
        let state = model.state_ph(kpa(p_kpa), h_kj_kg, medium)?;
        Ok(Self {
            t_c: state.t_k - CELSIUS_OFFSET_K,
            p_kpa,
            h_kj_kg,
            m_dot_kg_s,
            medium,
        })
    }

    /// Zero-flow state at ambient temperature and pressure. Water-family
    /// media are seeded no colder than [`WATER_SEED_MIN_C`].
    pub fn neutral(ambient: &Ambient, medium: Medium) -> FluidResult<Self> {
        let t_c = match medium.family() {
            MediumFamily::Water => ambient.t_c.max(WATER_SEED_MIN_C),
            MediumFamily::FlueGas | MediumFamily::Fuel => ambient.t_c,
        };
        Self::from_tp(t_c, ambient.p_kpa, 0.0, medium)
    }

    pub fn with_flow(self, m_dot_kg_s: f64) -> Self {
        Self { m_dot_kg_s, ..self }
    }

    /// Entropy [kJ/(kg·K)] from (P, h).
    pub fn entropy(&self) -> FluidResult<f64> {
        self.entropy_with(standard())
    }

    pub fn entropy_with<M: PropertyModel + ?Sized>(&self, model: &M) -> FluidResult<f64> {
        Ok(model.state_ph(self.pressure(), self.h_kj_kg, self.medium)?.props.s)
    }

    /// Enthalpy flow m·h [kW].
    pub fn energy_flow_kw(&self) -> f64 {
        self.m_dot_kg_s * self.h_kj_kg
    }

    pub fn temperature(&self) -> Temperature {
        k(self.t_c + CELSIUS_OFFSET_K)
    }

    pub fn pressure(&self) -> Pressure {
        kpa(self.p_kpa)
    }

    pub fn mass_rate(&self) -> MassRate {
        kgps(self.m_dot_kg_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tp_and_from_ph_agree() {
        let a = PortState::from_tp(540.0, 15_000.0, 120.0, Medium::Steam).unwrap();
        let b = PortState::from_ph(15_000.0, a.h_kj_kg, 120.0, Medium::Steam).unwrap();
        assert!((a.t_c - b.t_c).abs() < 1e-6);
        assert_eq!(a.m_dot_kg_s, b.m_dot_kg_s);
    }

    #[test]
    fn negative_flow_is_rejected() {
        let err = PortState::from_tp(30.0, 101.3, -1.0, Medium::Water).unwrap_err();
        assert!(matches!(err, FluidError::NonPhysical { .. }));
    }

    #[test]
    fn neutral_state_is_ambient_with_zero_flow() {
        let ambient = Ambient::default();
        let state = PortState::neutral(&ambient, Medium::Gas).unwrap();
        assert_eq!(state.m_dot_kg_s, 0.0);
        assert_eq!(state.t_c, 30.0);
        assert!((state.h_kj_kg - 30.15).abs() < 1e-9);
    }

    #[test]
    fn freezing_ambient_seeds_water_above_the_floor() {
        let ambient = Ambient::new(-5.0, 80.0, 101.3);
        for medium in [Medium::Water, Medium::Steam, Medium::HotWater] {
            let state = PortState::neutral(&ambient, medium).unwrap();
            assert_eq!(state.t_c, WATER_SEED_MIN_C);
            assert_eq!(state.m_dot_kg_s, 0.0);
        }
        let gas = PortState::neutral(&ambient, Medium::Gas).unwrap();
        assert_eq!(gas.t_c, -5.0);
    }

    #[test]
    fn serializes_with_plant_field_names() {
        let state = PortState::from_tp(25.0, 101.3, 2.0, Medium::HotWater).unwrap();
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["medium"], "hot_water");
        assert_eq!(json["T_C"], 25.0);
        assert!(json.get("P_kPa_abs").is_some());
        assert!(json.get("h_kJ_kg").is_some());
        assert!(json.get("m_dot_kg_s").is_some());
    }
}
