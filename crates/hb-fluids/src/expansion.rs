//! Isentropic expansion with an efficiency blend.

use hb_core::units::{k, kpa};
use hb_core::units::constants::CELSIUS_OFFSET_K;

use crate::error::{FluidError, FluidResult};
use crate::ideal_gas::IdealGas;
use crate::if97;
use crate::port_state::PortState;
use crate::properties::{PropertyModel, standard};

/// Iteration budget for the isentropic outlet temperature.
pub const MAX_ITERATIONS: usize = 10;
/// Enthalpy tolerance on the isentropic outlet [kJ/kg].
pub const ENTHALPY_TOLERANCE: f64 = 0.1;

const CP_STEP_K: f64 = 0.01;
/// Exponent of the starting guess T_out = T_in·(p_out/p_in)^x for vapour.
const VAPOUR_GUESS_EXPONENT: f64 = 0.23;

/// Outcome of an expansion from an inlet state to a lower pressure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expansion {
    /// Actual outlet state after applying the efficiency.
    pub outlet: PortState,
    /// Ideal outlet enthalpy at the inlet entropy [kJ/kg].
    pub h_isentropic: f64,
    /// Ideal enthalpy drop h_in − h_s [kJ/kg].
    pub dh_isentropic: f64,
    /// Inlet entropy [kJ/(kg·K)].
    pub s_inlet: f64,
    /// Vapour fraction of the ideal outlet when it lies inside the dome.
    pub isentropic_quality: Option<f64>,
    /// Newton iterations spent; zero for closed-form outlets.
    pub iterations: usize,
}

/// Expand `inlet` to `p_out_kpa` with isentropic efficiency `eta`.
pub fn isentropic_expansion(inlet: &PortState, p_out_kpa: f64, eta: f64) -> FluidResult<Expansion> {
    isentropic_expansion_with(standard(), inlet, p_out_kpa, eta)
}

pub fn isentropic_expansion_with<M: PropertyModel + ?Sized>(
    model: &M,
    inlet: &PortState,
    p_out_kpa: f64,
    eta: f64,
) -> FluidResult<Expansion> {
    if !eta.is_finite() || !(0.0..=1.0).contains(&eta) {
        return Err(FluidError::InvalidArg {
            what: "isentropic efficiency must lie in [0, 1]",
        });
    }
    if !p_out_kpa.is_finite() || p_out_kpa <= 0.0 || p_out_kpa > inlet.p_kpa {
        return Err(FluidError::InvalidArg {
            what: "expansion outlet pressure must be positive and not above the inlet",
        });
    }

    let medium = inlet.medium;
    let inlet_state = model.state_ph(inlet.pressure(), inlet.h_kj_kg, medium)?;
    let s_in = inlet_state.props.s;

    let (h_s, quality, iterations) = match IdealGas::for_medium(medium) {
        Some(gas) => {
            let t_s = gas.isentropic_t(inlet_state.t_k, inlet.p_kpa, p_out_kpa);
            (gas.h(t_s), None, 0)
        }
        None => isentropic_water(model, inlet_state.t_k, inlet.p_kpa, p_out_kpa, s_in, inlet)?,
    };

    let dh_s = inlet.h_kj_kg - h_s;
    let h_out = inlet.h_kj_kg - eta * dh_s;
    let outlet = PortState::from_ph_with(model, p_out_kpa, h_out, inlet.m_dot_kg_s, medium)?;

    Ok(Expansion {
        outlet,
        h_isentropic: h_s,
        dh_isentropic: dh_s,
        s_inlet: s_in,
        isentropic_quality: quality,
        iterations,
    })
}

fn isentropic_water<M: PropertyModel + ?Sized>(
    model: &M,
    t_in_k: f64,
    p_in_kpa: f64,
    p_out_kpa: f64,
    s_in: f64,
    inlet: &PortState,
) -> FluidResult<(f64, Option<f64>, usize)> {
    let p_out = kpa(p_out_kpa);
    let (mut lo, mut hi, vapour) = match model.saturation(p_out, inlet.medium)? {
        Some(sat) => {
            if (sat.liquid.s..=sat.vapour.s).contains(&s_in) {
                let x = (s_in - sat.liquid.s) / (sat.vapour.s - sat.liquid.s);
                return Ok((sat.mix(x).h, Some(x), 0));
            }
            if s_in > sat.vapour.s {
                (sat.t_k, if97::T_MAX_K, true)
            } else {
                (if97::T_MIN_K, sat.t_k, false)
            }
        }
        None => (if97::T_MIN_K, if97::T_MAX_K, true),
    };

    let mut t = if vapour {
        t_in_k * (p_out_kpa / p_in_kpa).powf(VAPOUR_GUESS_EXPONENT)
    } else {
        t_in_k
    };
    if !(lo < t && t < hi) {
        t = 0.5 * (lo + hi);
    }

    for iteration in 1..=MAX_ITERATIONS {
        let props = model.evaluate(k(t), p_out, inlet.medium)?;
        let resid = props.s - s_in;
        if (t * resid).abs() <= ENTHALPY_TOLERANCE {
            // first-order correction back onto the inlet isentrope
            return Ok((props.h - t * resid, None, iteration));
        }
        if resid > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        let t_step = (t + CP_STEP_K).min(if97::T_MAX_K);
        let slope = (model.evaluate(k(t_step), p_out, inlet.medium)?.s - props.s) / (t_step - t);
        let next = if slope.is_finite() && slope > 0.0 {
            t - resid / slope
        } else {
            f64::NAN
        };
        t = if lo < next && next < hi { next } else { 0.5 * (lo + hi) };
    }

    Err(FluidError::PropertyConvergence {
        what: "isentropic expansion",
        t_c: t - CELSIUS_OFFSET_K,
        p_kpa: p_out_kpa,
        medium: inlet.medium,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::Medium;

    fn main_steam() -> PortState {
        PortState::from_tp(540.0, 15_000.0, 100.0, Medium::Steam).unwrap()
    }

    #[test]
    fn wet_outlet_is_closed_form() {
        let exp = isentropic_expansion(&main_steam(), 8.0, 1.0).unwrap();
        assert_eq!(exp.iterations, 0);
        let x = exp.isentropic_quality.unwrap();
        assert!((x - 0.7724).abs() < 2e-3, "x = {x}");
        assert!((exp.h_isentropic - 2_029.5).abs() < 1.0);
    }

    #[test]
    fn superheated_outlet_converges_quickly() {
        let exp = isentropic_expansion(&main_steam(), 3_000.0, 0.88).unwrap();
        assert!(exp.iterations >= 1 && exp.iterations <= MAX_ITERATIONS);
        assert!((exp.h_isentropic - 2_965.1).abs() < 1.0);
        let expected = main_steam().h_kj_kg - 0.88 * exp.dh_isentropic;
        assert!((exp.outlet.h_kj_kg - expected).abs() < 1e-9);
        assert_eq!(exp.outlet.m_dot_kg_s, 100.0);
    }

    #[test]
    fn efficiency_must_be_a_fraction() {
        let err = isentropic_expansion(&main_steam(), 3_000.0, 1.2).unwrap_err();
        assert!(matches!(err, FluidError::InvalidArg { .. }));
        let err = isentropic_expansion(&main_steam(), 20_000.0, 0.9).unwrap_err();
        assert!(matches!(err, FluidError::InvalidArg { .. }));
    }

    #[test]
    fn gas_expansion_follows_ideal_relation() {
        let inlet = PortState::from_tp(1_100.0, 1_500.0, 10.0, Medium::Gas).unwrap();
        let exp = isentropic_expansion(&inlet, 105.0, 1.0).unwrap();
        let t_s = 1_373.15 * (105.0_f64 / 1_500.0).powf(0.287 / 1.005);
        assert!((exp.outlet.t_c - (t_s - 273.15)).abs() < 1e-6);
    }
}
