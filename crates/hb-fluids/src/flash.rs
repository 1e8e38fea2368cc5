//! Pressure-enthalpy and pressure-entropy flashes.

use hb_core::units::{Pressure, k, to_kpa};
use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::Medium;

use crate::error::{FluidError, FluidResult};
use crate::ideal_gas::IdealGas;
use crate::if97;
use crate::properties::{FlashState, Properties, PropertyModel, ideal_gas_props};
use crate::solve::regula_falsi;

const MAX_ITER: usize = 200;

#[derive(Clone, Copy)]
enum Target {
    Enthalpy(f64),
    Entropy(f64),
}

impl Target {
    fn value(self) -> f64 {
        match self {
            Target::Enthalpy(v) | Target::Entropy(v) => v,
        }
    }

    fn of(self, props: &Properties) -> f64 {
        match self {
            Target::Enthalpy(_) => props.h,
            Target::Entropy(_) => props.s,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Target::Enthalpy(_) => "enthalpy",
            Target::Entropy(_) => "entropy",
        }
    }
}

pub(crate) fn state_ph<M: PropertyModel + ?Sized>(
    model: &M,
    p: Pressure,
    h: f64,
    medium: Medium,
) -> FluidResult<FlashState> {
    flash(model, p, Target::Enthalpy(h), medium)
}

pub(crate) fn state_ps<M: PropertyModel + ?Sized>(
    model: &M,
    p: Pressure,
    s: f64,
    medium: Medium,
) -> FluidResult<FlashState> {
    flash(model, p, Target::Entropy(s), medium)
}

fn flash<M: PropertyModel + ?Sized>(
    model: &M,
    p: Pressure,
    target: Target,
    medium: Medium,
) -> FluidResult<FlashState> {
    let p_kpa = to_kpa(p);
    if !target.value().is_finite() {
        return Err(FluidError::NonPhysical {
            what: "flash target must be finite",
        });
    }
    if !p_kpa.is_finite() || p_kpa <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }

    if let Some(gas) = IdealGas::for_medium(medium) {
        let t_k = match target {
            Target::Enthalpy(h) => gas.t_from_h(h),
            Target::Entropy(s) => gas.t_from_s(s, p_kpa),
        };
        if !IdealGas::in_range(t_k) {
            return Err(out_of_range(target, p_kpa, medium));
        }
        return Ok(FlashState {
            t_k,
            props: ideal_gas_props(gas, t_k, p_kpa, medium)?,
            quality: None,
        });
    }

    if p_kpa > if97::P_MAX_KPA {
        return Err(out_of_range(target, p_kpa, medium));
    }

    let y = target.value();
    let (lo, hi) = match model.saturation(p, medium)? {
        Some(sat) => {
            let y_f = target.of(&sat.liquid);
            let y_g = target.of(&sat.vapour);
            if (y_f..=y_g).contains(&y) {
                let x = if y_g > y_f { (y - y_f) / (y_g - y_f) } else { 0.0 };
                return Ok(FlashState {
                    t_k: sat.t_k,
                    props: sat.mix(x),
                    quality: Some(x),
                });
            }
            if y < y_f {
                (if97::T_MIN_K, sat.t_k)
            } else {
                (sat.t_k, if97::T_MAX_K)
            }
        }
        None => (if97::T_MIN_K, if97::T_MAX_K),
    };

    let residual = |t_k: f64| -> FluidResult<f64> {
        Ok(target.of(&model.evaluate(k(t_k), p, medium)?) - y)
    };
    if residual(lo)? > 0.0 || residual(hi)? < 0.0 {
        return Err(out_of_range(target, p_kpa, medium));
    }

    let tol = 1e-9 * y.abs().max(1.0);
    let t_k = regula_falsi(residual, lo, hi, tol, MAX_ITER)?.ok_or(
        FluidError::PropertyConvergence {
            what: target.name(),
            t_c: 0.5 * (lo + hi) - CELSIUS_OFFSET_K,
            p_kpa,
            medium,
        },
    )?;

    Ok(FlashState {
        t_k,
        props: model.evaluate(k(t_k), p, medium)?,
        quality: None,
    })
}

fn out_of_range(target: Target, p_kpa: f64, medium: Medium) -> FluidError {
    FluidError::FlashOutOfRange {
        what: target.name(),
        value: target.value(),
        p_kpa,
        medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{evaluate, standard};
    use hb_core::units::kpa;

    #[test]
    fn ph_flash_recovers_superheated_temperature() {
        let props = evaluate(540.0, 15_000.0, Medium::Steam).unwrap();
        let state = standard()
            .state_ph(kpa(15_000.0), props.h, Medium::Steam)
            .unwrap();
        assert!((state.t_c() - 540.0).abs() < 1e-6, "T = {}", state.t_c());
        assert!(state.quality.is_none());
    }

    #[test]
    fn ph_flash_inside_dome_reports_quality() {
        let sat = standard()
            .saturation(kpa(8.0), Medium::Steam)
            .unwrap()
            .unwrap();
        let h = sat.liquid.h + 0.9 * (sat.vapour.h - sat.liquid.h);
        let state = standard().state_ph(kpa(8.0), h, Medium::Steam).unwrap();
        assert!((state.quality.unwrap() - 0.9).abs() < 1e-12);
        assert!((state.t_k - sat.t_k).abs() < 1e-12);
    }

    #[test]
    fn ps_flash_on_compressed_liquid() {
        let props = evaluate(45.0, 13_500.0, Medium::Water).unwrap();
        let state = standard()
            .state_ps(kpa(13_500.0), props.s, Medium::Water)
            .unwrap();
        assert!((state.t_c() - 45.0).abs() < 1e-6);
    }

    #[test]
    fn gas_flash_is_closed_form() {
        let state = standard().state_ph(kpa(101.3), 90.45, Medium::Gas).unwrap();
        assert!((state.t_c() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn enthalpy_beyond_envelope_is_rejected() {
        let err = standard()
            .state_ph(kpa(1_000.0), 9_000.0, Medium::Steam)
            .unwrap_err();
        assert!(matches!(err, FluidError::FlashOutOfRange { what: "enthalpy", .. }));
    }
}
