//! Property model trait and the standard IF97 / ideal-gas implementation.

use hb_core::units::{Pressure, Temperature, k, kpa, to_kelvin, to_kpa};
use hb_core::units::constants::CELSIUS_OFFSET_K;
use hb_core::Medium;

use crate::error::{FluidError, FluidResult};
use crate::flash;
use crate::ideal_gas::IdealGas;
use crate::if97::{self, If97Failure};

/// Specific properties at one state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Properties {
    /// Specific enthalpy [kJ/kg]
    pub h: f64,
    /// Specific entropy [kJ/(kg·K)]
    pub s: f64,
    /// Density [kg/m³]
    pub rho: f64,
}

/// Saturated liquid and vapour at one pressure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Saturation {
    pub t_k: f64,
    pub p_kpa: f64,
    pub liquid: Properties,
    pub vapour: Properties,
}

impl Saturation {
    /// Wet mixture at vapour mass fraction `x`.
    pub fn mix(&self, x: f64) -> Properties {
        let v = (1.0 - x) / self.liquid.rho + x / self.vapour.rho;
        Properties {
            h: self.liquid.h + x * (self.vapour.h - self.liquid.h),
            s: self.liquid.s + x * (self.vapour.s - self.liquid.s),
            rho: 1.0 / v,
        }
    }
}

/// Result of a pressure-enthalpy or pressure-entropy flash.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashState {
    pub t_k: f64,
    pub props: Properties,
    /// Vapour mass fraction when the state lies inside the dome.
    pub quality: Option<f64>,
}

impl FlashState {
    pub fn t_c(&self) -> f64 {
        self.t_k - CELSIUS_OFFSET_K
    }
}

/// Trait for thermodynamic property backends.
///
/// Implementations must be thread-safe (Send + Sync) so independent solves
/// can share one instance.
pub trait PropertyModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Single-phase properties at (T, P).
    fn evaluate(&self, t: Temperature, p: Pressure, medium: Medium) -> FluidResult<Properties>;

    /// Saturation state at `p`, or `None` when the medium has no dome there.
    fn saturation(&self, p: Pressure, medium: Medium) -> FluidResult<Option<Saturation>>;

    /// Solve for the state with enthalpy `h` [kJ/kg] at pressure `p`.
    fn state_ph(&self, p: Pressure, h: f64, medium: Medium) -> FluidResult<FlashState> {
        flash::state_ph(self, p, h, medium)
    }

    /// Solve for the state with entropy `s` [kJ/(kg·K)] at pressure `p`.
    fn state_ps(&self, p: Pressure, s: f64, medium: Medium) -> FluidResult<FlashState> {
        flash::state_ps(self, p, s, medium)
    }
}

/// Native IAPWS-IF97 steam tables for the water family, ideal gas otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardModel;

static STANDARD: StandardModel = StandardModel;

/// Process-wide standard property model.
pub fn standard() -> &'static StandardModel {
    &STANDARD
}

pub(crate) fn check_inputs(t_k: f64, p_kpa: f64) -> FluidResult<()> {
    if !t_k.is_finite() || t_k <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    if !p_kpa.is_finite() || p_kpa <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    Ok(())
}

pub(crate) fn ideal_gas_props(
    gas: IdealGas,
    t_k: f64,
    p_kpa: f64,
    medium: Medium,
) -> FluidResult<Properties> {
    if !IdealGas::in_range(t_k) {
        return Err(FluidError::OutOfRange {
            t_c: t_k - CELSIUS_OFFSET_K,
            p_kpa,
            medium,
        });
    }
    Ok(Properties {
        h: gas.h(t_k),
        s: gas.s(t_k, p_kpa),
        rho: gas.rho(t_k, p_kpa),
    })
}

fn if97_error(err: If97Failure, what: &'static str, t_k: f64, p_kpa: f64, medium: Medium) -> FluidError {
    match err {
        If97Failure::OutOfRange => FluidError::OutOfRange {
            t_c: t_k - CELSIUS_OFFSET_K,
            p_kpa,
            medium,
        },
        If97Failure::NoConvergence => FluidError::PropertyConvergence {
            what,
            t_c: t_k - CELSIUS_OFFSET_K,
            p_kpa,
            medium,
        },
    }
}

impl PropertyModel for StandardModel {
    fn name(&self) -> &str {
        "IAPWS-IF97 / ideal gas"
    }

    fn evaluate(&self, t: Temperature, p: Pressure, medium: Medium) -> FluidResult<Properties> {
        let t_k = to_kelvin(t);
        let p_kpa = to_kpa(p);
        check_inputs(t_k, p_kpa)?;
        match IdealGas::for_medium(medium) {
            Some(gas) => ideal_gas_props(gas, t_k, p_kpa, medium),
            None => if97::props_tp(t_k, p_kpa)
                .map_err(|e| if97_error(e, "region 3 density", t_k, p_kpa, medium)),
        }
    }

    fn saturation(&self, p: Pressure, medium: Medium) -> FluidResult<Option<Saturation>> {
        if !medium.is_water() {
            return Ok(None);
        }
        let p_kpa = to_kpa(p);
        let sat = if97::saturation(p_kpa)
            .map_err(|e| if97_error(e, "saturation density", f64::NAN, p_kpa, medium))?;
        Ok(sat.map(|(t_k, liquid, vapour)| Saturation {
            t_k,
            p_kpa,
            liquid,
            vapour,
        }))
    }
}

/// Evaluate (h, s, rho) at `t_c` [°C] and `p_kpa` [kPa] with the standard model.
pub fn evaluate(t_c: f64, p_kpa: f64, medium: Medium) -> FluidResult<Properties> {
    standard().evaluate(k(t_c + CELSIUS_OFFSET_K), kpa(p_kpa), medium)
}

/// Saturation pressure of water at `t`.
pub fn saturation_pressure(t: Temperature) -> FluidResult<Pressure> {
    let t_k = to_kelvin(t);
    if !(if97::T_MIN_K..=if97::T_CRIT_K).contains(&t_k) {
        return Err(FluidError::OutOfRange {
            t_c: t_k - CELSIUS_OFFSET_K,
            p_kpa: f64::NAN,
            medium: Medium::Water,
        });
    }
    Ok(kpa(if97::saturation_pressure_kpa(t_k)))
}

/// Saturation temperature of water at `p`.
pub fn saturation_temperature(p: Pressure) -> FluidResult<Temperature> {
    let p_kpa = to_kpa(p);
    if !(if97::P_TRIPLE_KPA..=if97::P_CRIT_KPA).contains(&p_kpa) {
        return Err(FluidError::OutOfRange {
            t_c: f64::NAN,
            p_kpa,
            medium: Medium::Water,
        });
    }
    Ok(k(if97::saturation_temperature_k(p_kpa)))
}
