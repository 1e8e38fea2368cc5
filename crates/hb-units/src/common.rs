//! Common utilities for unit calculations.

use hb_core::Medium;
use hb_core::numeric::ensure_finite;
use hb_core::units::kpa;
use hb_fluids::{PropertyModel, Saturation, standard};

use crate::error::{UnitError, UnitResult};

/// Flow below which a port is treated as idle (kg/s).
pub const EPSILON_MDOT: f64 = 1e-9;

/// Minimum absolute pressure a unit may produce (kPa).
pub const MIN_PRESSURE_KPA: f64 = 0.7;

/// Ensure a value is finite, returning UnitError if not.
pub fn check_finite(value: f64, what: &'static str) -> UnitResult<f64> {
    ensure_finite(value, what).map_err(|_| UnitError::NonPhysical { what })
}

pub fn is_idle(m_dot_kg_s: f64) -> bool {
    m_dot_kg_s <= EPSILON_MDOT
}

/// Pressure after a drop, floored at `MIN_PRESSURE_KPA`.
pub fn after_drop(p_kpa: f64, dp_kpa: f64) -> f64 {
    (p_kpa - dp_kpa).max(MIN_PRESSURE_KPA)
}

/// Saturation state of water at `p_kpa`; fails above the critical point.
pub fn saturation_at(p_kpa: f64) -> UnitResult<Saturation> {
    standard()
        .saturation(kpa(p_kpa), Medium::Water)?
        .ok_or(UnitError::NonPhysical {
            what: "no saturation state above the critical pressure",
        })
}
