//! CoolProp-based property model for the water family.

use hb_core::Medium;
use hb_core::units::{Pressure, Temperature, to_kelvin, to_kpa};
use rfluids::prelude::*;

use crate::error::{FluidError, FluidResult};
use crate::ideal_gas::IdealGas;
use crate::properties::{
    Properties, PropertyModel, Saturation, StandardModel, check_inputs, ideal_gas_props,
};

/// CoolProp backend (through `rfluids`) for water and steam.
///
/// Gases keep the ideal-gas relations and the saturation line comes from
/// IF97, so only single-phase water properties reach CoolProp.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoolPropModel;

impl CoolPropModel {
    pub fn new() -> Self {
        Self
    }

    fn water_at_pt(&self, p_pa: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(Pure::Water)
            .in_state(FluidInput::pressure(p_pa), FluidInput::temperature(t_k))
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at P={} Pa, T={} K: {}", p_pa, t_k, e),
            })
    }
}

fn backend(what: &str, e: impl std::fmt::Display) -> FluidError {
    FluidError::Backend {
        message: format!("rfluids error getting {}: {}", what, e),
    }
}

impl PropertyModel for CoolPropModel {
    fn name(&self) -> &str {
        "CoolProp / ideal gas"
    }

    fn evaluate(&self, t: Temperature, p: Pressure, medium: Medium) -> FluidResult<Properties> {
        let t_k = to_kelvin(t);
        let p_kpa = to_kpa(p);
        check_inputs(t_k, p_kpa)?;
        if let Some(gas) = IdealGas::for_medium(medium) {
            return ideal_gas_props(gas, t_k, p_kpa, medium);
        }

        let mut fluid = self.water_at_pt(p_kpa * 1_000.0, t_k)?;
        let h = fluid.enthalpy().map_err(|e| backend("enthalpy", e))?;
        let s = fluid.entropy().map_err(|e| backend("entropy", e))?;
        let rho = fluid.density().map_err(|e| backend("density", e))?;
        Ok(Properties {
            h: h / 1_000.0,
            s: s / 1_000.0,
            rho,
        })
    }

    fn saturation(&self, p: Pressure, medium: Medium) -> FluidResult<Option<Saturation>> {
        StandardModel.saturation(p, medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_core::units::{celsius, kpa};

    #[test]
    fn agrees_with_native_steam_tables() {
        let cp = CoolPropModel::new();
        let native = StandardModel;
        let t = celsius(540.0);
        let p = kpa(15_000.0);
        let a = cp.evaluate(t, p, Medium::Steam).unwrap();
        let b = native.evaluate(t, p, Medium::Steam).unwrap();
        assert!((a.h - b.h).abs() < 1.0, "{} vs {}", a.h, b.h);
        assert!((a.s - b.s).abs() < 2e-3);
    }

    #[test]
    fn gases_bypass_the_backend() {
        let p = CoolPropModel::new()
            .evaluate(celsius(500.0), kpa(101.3), Medium::Gas)
            .unwrap();
        assert!((p.h - 502.5).abs() < 1e-9);
    }
}
