//! Ideal-gas relations for combustion air, flue gas and fuel gas.
//!
//! Enthalpy is zero at 0 °C; entropy is zero at 288.15 K and 101.3 kPa.

use hb_core::Medium;
use hb_core::units::constants::{CELSIUS_OFFSET_K, REFERENCE_P_KPA, REFERENCE_T_K};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdealGas {
    /// Specific heat [kJ/(kg·K)]
    pub cp: f64,
    /// Specific gas constant [kJ/(kg·K)]
    pub r: f64,
}

/// Combustion air and flue gas.
pub const FLUE_GAS: IdealGas = IdealGas { cp: 1.005, r: 0.287 };

/// Natural gas treated as methane.
pub const FUEL_GAS: IdealGas = IdealGas {
    cp: 2.2537,
    r: 0.5183,
};

pub(crate) const T_MIN_K: f64 = 150.0;
pub(crate) const T_MAX_K: f64 = 2_500.0;

impl IdealGas {
    pub fn for_medium(medium: Medium) -> Option<IdealGas> {
        match medium {
            Medium::Gas => Some(FLUE_GAS),
            Medium::FuelGas => Some(FUEL_GAS),
            Medium::Steam | Medium::Water | Medium::HotWater => None,
        }
    }

    pub fn h(&self, t_k: f64) -> f64 {
        self.cp * (t_k - CELSIUS_OFFSET_K)
    }

    pub fn s(&self, t_k: f64, p_kpa: f64) -> f64 {
        self.cp * (t_k / REFERENCE_T_K).ln() - self.r * (p_kpa / REFERENCE_P_KPA).ln()
    }

    pub fn rho(&self, t_k: f64, p_kpa: f64) -> f64 {
        p_kpa / (self.r * t_k)
    }

    pub fn t_from_h(&self, h: f64) -> f64 {
        h / self.cp + CELSIUS_OFFSET_K
    }

    pub fn t_from_s(&self, s: f64, p_kpa: f64) -> f64 {
        REFERENCE_T_K * ((s + self.r * (p_kpa / REFERENCE_P_KPA).ln()) / self.cp).exp()
    }

    /// Outlet temperature of a reversible adiabatic expansion.
    pub fn isentropic_t(&self, t_in_k: f64, p_in_kpa: f64, p_out_kpa: f64) -> f64 {
        t_in_k * (p_out_kpa / p_in_kpa).powf(self.r / self.cp)
    }

    pub(crate) fn in_range(t_k: f64) -> bool {
        t_k.is_finite() && (T_MIN_K..=T_MAX_K).contains(&t_k)
    }
}
