//! IAPWS Industrial Formulation 1997 for water and steam.
//!
//! Regions 1 (compressed liquid), 2 (superheated vapour), 3 (near-critical,
//! solved for density) and 4 (saturation line) plus the B23 boundary. The
//! high-temperature region 5 is not implemented, so the envelope ends at
//! 1073.15 K and 100 MPa.
//!
//! Everything in here works in kelvin, kPa, kJ/kg and kJ/(kg·K).

mod region1;
mod region2;
mod region3;
mod region4;

use crate::properties::Properties;

pub(crate) use region4::{b23_pressure_kpa, saturation_pressure_kpa, saturation_temperature_k};

/// Specific gas constant of water [kJ/(kg·K)].
pub const R: f64 = 0.461_526;
pub const T_CRIT_K: f64 = 647.096;
pub const P_CRIT_KPA: f64 = 22_064.0;
pub const RHO_CRIT: f64 = 322.0;
pub const T_MIN_K: f64 = 273.15;
pub const T_MAX_K: f64 = 1_073.15;
pub const P_MAX_KPA: f64 = 100_000.0;
/// Saturation pressure at 273.15 K; the lower end of the saturation line.
pub const P_TRIPLE_KPA: f64 = 0.611_213;

/// Upper temperature of region 1 and lower end of the B23 line.
const T_13_K: f64 = 623.15;
/// Upper end of the B23 line.
const T_23_MAX_K: f64 = 863.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    CompressedLiquid,
    SuperheatedVapour,
    NearCritical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum If97Failure {
    OutOfRange,
    NoConvergence,
}

/// Which side of the saturation dome a region-3 density solve should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Liquid,
    Vapour,
}

pub(crate) fn in_envelope(t_k: f64, p_kpa: f64) -> bool {
    t_k.is_finite()
        && p_kpa.is_finite()
        && (T_MIN_K..=T_MAX_K).contains(&t_k)
        && p_kpa > 0.0
        && p_kpa <= P_MAX_KPA
}

pub(crate) fn region(t_k: f64, p_kpa: f64) -> Result<Region, If97Failure> {
    if !in_envelope(t_k, p_kpa) {
        return Err(If97Failure::OutOfRange);
    }
    if t_k <= T_13_K {
        if p_kpa >= saturation_pressure_kpa(t_k) {
            Ok(Region::CompressedLiquid)
        } else {
            Ok(Region::SuperheatedVapour)
        }
    } else if t_k <= T_23_MAX_K && p_kpa > b23_pressure_kpa(t_k) {
        Ok(Region::NearCritical)
    } else {
        Ok(Region::SuperheatedVapour)
    }
}

/// Properties at a single-phase (T, P) point.
pub(crate) fn props_tp(t_k: f64, p_kpa: f64) -> Result<Properties, If97Failure> {
    match region(t_k, p_kpa)? {
        Region::CompressedLiquid => Ok(region1::props(t_k, p_kpa)),
        Region::SuperheatedVapour => Ok(region2::props(t_k, p_kpa)),
        Region::NearCritical => {
            let branch = if t_k < T_CRIT_K && p_kpa < saturation_pressure_kpa(t_k) {
                Branch::Vapour
            } else if t_k < T_CRIT_K {
                Branch::Liquid
            } else {
                // Above the critical temperature the isotherm is monotonic,
                // so the vapour-side bracket expansion finds the only root.
                Branch::Vapour
            };
            let rho = region3::density(t_k, p_kpa, branch).ok_or(If97Failure::NoConvergence)?;
            Ok(region3::props(rho, t_k))
        }
    }
}

/// Saturated liquid and vapour at `p_kpa`, or `None` outside the saturation line.
pub(crate) fn saturation(p_kpa: f64) -> Result<Option<(f64, Properties, Properties)>, If97Failure> {
    if !(P_TRIPLE_KPA..P_CRIT_KPA).contains(&p_kpa) {
        return Ok(None);
    }
    let t_sat = saturation_temperature_k(p_kpa);
    if t_sat <= T_13_K {
        Ok(Some((
            t_sat,
            region1::props(t_sat, p_kpa),
            region2::props(t_sat, p_kpa),
        )))
    } else {
        let rho_l = region3::density(t_sat, p_kpa, Branch::Liquid).ok_or(If97Failure::NoConvergence)?;
        let rho_v = region3::density(t_sat, p_kpa, Branch::Vapour).ok_or(If97Failure::NoConvergence)?;
        Ok(Some((
            t_sat,
            region3::props(rho_l, t_sat),
            region3::props(rho_v, t_sat),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64, rel: f64) -> bool {
        (actual - expected).abs() <= rel * expected.abs()
    }

    #[test]
    fn region_selection() {
        assert_eq!(region(300.0, 3_000.0), Ok(Region::CompressedLiquid));
        assert_eq!(region(300.0, 3.5), Ok(Region::SuperheatedVapour));
        assert_eq!(region(700.0, 30_000.0), Ok(Region::SuperheatedVapour));
        assert_eq!(region(650.0, 25_583.7), Ok(Region::NearCritical));
        assert_eq!(region(1_200.0, 1_000.0), Err(If97Failure::OutOfRange));
        assert_eq!(region(500.0, 120_000.0), Err(If97Failure::OutOfRange));
    }

    #[test]
    fn region3_inverse_matches_forward_point() {
        // Forward verification point: rho = 500 kg/m3, T = 650 K -> p = 25.5837018 MPa
        let props = props_tp(650.0, 25_583.701_8).unwrap();
        assert!(close(props.rho, 500.0, 1e-6), "rho = {}", props.rho);
        assert!(close(props.h, 1_863.430_19, 1e-6), "h = {}", props.h);
        assert!(close(props.s, 4.054_272_73, 1e-6), "s = {}", props.s);
    }

    #[test]
    fn saturation_at_one_bar() {
        let (t_sat, liq, vap) = saturation(100.0).unwrap().unwrap();
        assert!(close(t_sat, 372.755_919, 1e-8));
        // Latent heat near 2257 kJ/kg at 1 bar
        let latent = vap.h - liq.h;
        assert!((latent - 2_257.5).abs() < 2.0, "latent = {latent}");
    }

    #[test]
    fn saturation_in_region3_has_two_densities() {
        let (_, liq, vap) = saturation(20_000.0).unwrap().unwrap();
        assert!(liq.rho > vap.rho);
        assert!(liq.h < vap.h);
        // IF97 tables: 20 MPa, h' = 1827.1, h'' = 2411.4
        assert!((liq.h - 1_827.1).abs() < 2.0, "h' = {}", liq.h);
        assert!((vap.h - 2_411.4).abs() < 2.0, "h'' = {}", vap.h);
    }

    #[test]
    fn no_saturation_above_critical_pressure() {
        assert_eq!(saturation(25_000.0), Ok(None));
        assert_eq!(saturation(0.1), Ok(None));
    }
}
