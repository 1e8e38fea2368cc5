//! Region 3: near-critical states, Helmholtz free energy in (rho, T).
//!
//! The formulation is explicit in density, so (T, P) lookups solve
//! p(rho, T) = P on the requested branch.

use super::{Branch, R, RHO_CRIT, T_CRIT_K};
use crate::properties::Properties;
use crate::solve::newton_bracketed;

const N1: f64 = 0.106_580_700_285_13e1;

/// (I, J, n) for terms 2..=40; term 1 is `N1 * ln(delta)`.
const COEFFS: [(i32, i32, f64); 39] = [
    (0, 0, -0.157_328_452_902_39e2),
    (0, 1, 0.209_443_969_743_07e2),
    (0, 2, -0.768_677_078_787_16e1),
    (0, 7, 0.261_859_477_879_54e1),
    (0, 10, -0.280_807_811_486_20e1),
    (0, 12, 0.120_533_696_965_17e1),
    (0, 23, -0.845_668_128_125_02e-2),
    (1, 2, -0.126_543_154_777_14e1),
    (1, 6, -0.115_244_078_066_81e1),
    (1, 15, 0.885_210_439_843_18),
    (1, 17, -0.642_077_651_816_07),
    (2, 0, 0.384_934_601_866_71),
    (2, 2, -0.852_147_088_242_06),
    (2, 6, 0.489_722_815_418_77e1),
    (2, 7, -0.305_026_172_569_65e1),
    (2, 22, 0.394_205_368_791_54e-1),
    (2, 26, 0.125_584_084_243_08),
    (3, 0, -0.279_993_296_987_10),
    (3, 2, 0.138_997_995_694_60e1),
    (3, 4, -0.201_899_150_235_70e1),
    (3, 16, -0.821_476_371_739_63e-2),
    (3, 26, -0.475_960_357_349_23),
    (4, 0, 0.439_840_744_735_00e-1),
    (4, 2, -0.444_764_354_287_39),
    (4, 4, 0.905_720_707_197_33),
    (4, 26, 0.705_224_500_879_67),
    (5, 1, 0.107_705_126_263_32),
    (5, 3, -0.329_136_232_589_54),
    (5, 26, -0.508_710_620_411_58),
    (6, 0, -0.221_754_008_730_96e-1),
    (6, 2, 0.942_607_516_650_92e-1),
    (6, 26, 0.164_362_784_479_61),
    (7, 2, -0.135_033_722_413_48e-1),
    (8, 26, -0.148_343_453_524_72e-1),
    (9, 2, 0.579_229_536_280_84e-3),
    (9, 26, 0.323_089_047_037_11e-2),
    (10, 0, 0.809_648_029_962_15e-4),
    (10, 1, -0.165_576_797_950_37e-3),
    (11, 26, -0.449_238_990_618_15e-4),
];

const RHO_MAX: f64 = 1_100.0;
const MAX_ITER: usize = 100;

struct Helmholtz {
    phi: f64,
    phi_d: f64,
    phi_dd: f64,
    phi_t: f64,
}

fn helmholtz(delta: f64, tau: f64) -> Helmholtz {
    let mut out = Helmholtz {
        phi: N1 * delta.ln(),
        phi_d: N1 / delta,
        phi_dd: -N1 / (delta * delta),
        phi_t: 0.0,
    };
    for &(i, j, n) in COEFFS.iter() {
        let fi = f64::from(i);
        let tj = tau.powi(j);
        out.phi += n * delta.powi(i) * tj;
        out.phi_d += n * fi * delta.powi(i - 1) * tj;
        out.phi_dd += n * fi * (fi - 1.0) * delta.powi(i - 2) * tj;
        out.phi_t += n * delta.powi(i) * f64::from(j) * tau.powi(j - 1);
    }
    out
}

/// Pressure [kPa] and dp/drho [kPa·m3/kg] at (rho, T).
fn pressure_and_slope(rho: f64, t_k: f64) -> (f64, f64) {
    let delta = rho / RHO_CRIT;
    let f = helmholtz(delta, T_CRIT_K / t_k);
    let p = rho * R * t_k * delta * f.phi_d;
    let dp = R * t_k * (2.0 * delta * f.phi_d + delta * delta * f.phi_dd);
    (p, dp)
}

pub(super) fn props(rho: f64, t_k: f64) -> Properties {
    let delta = rho / RHO_CRIT;
    let tau = T_CRIT_K / t_k;
    let f = helmholtz(delta, tau);
    Properties {
        h: R * t_k * (tau * f.phi_t + delta * f.phi_d),
        s: R * (tau * f.phi_t - f.phi),
        rho,
    }
}

/// Density on the requested branch such that p(rho, T) = `p_kpa`.
pub(super) fn density(t_k: f64, p_kpa: f64, branch: Branch) -> Option<f64> {
    let residual = |rho: f64| {
        let (p, dp) = pressure_and_slope(rho, t_k);
        (p - p_kpa, dp)
    };

    let (lo, hi) = match branch {
        Branch::Vapour => {
            // Real-gas density is never below the ideal-gas estimate here.
            let mut lo = p_kpa / (R * t_k);
            while residual(lo).0 >= 0.0 {
                lo *= 0.8;
                if lo < 1e-3 {
                    return None;
                }
            }
            let mut hi = lo;
            loop {
                hi *= 1.05;
                if hi > RHO_MAX {
                    return None;
                }
                if residual(hi).0 >= 0.0 {
                    break;
                }
                lo = hi;
            }
            (lo, hi)
        }
        Branch::Liquid => {
            let mut hi = 800.0;
            while residual(hi).0 < 0.0 {
                hi *= 1.05;
                if hi > RHO_MAX {
                    return None;
                }
            }
            let mut lo = hi;
            loop {
                lo *= 0.97;
                if lo < 0.5 * RHO_CRIT {
                    return None;
                }
                if residual(lo).0 < 0.0 {
                    break;
                }
                hi = lo;
            }
            (lo, hi)
        }
    };

    let tol_f = 1e-9 * p_kpa.max(1.0);
    newton_bracketed(residual, lo, hi, 0.5 * (lo + hi), tol_f, 1e-12, MAX_ITER)
}
