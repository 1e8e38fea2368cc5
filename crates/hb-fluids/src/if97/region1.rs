//! Region 1: compressed liquid, Gibbs free energy formulation.

use super::R;
use crate::properties::Properties;

const P_STAR_KPA: f64 = 16_530.0;
const T_STAR_K: f64 = 1_386.0;

/// (I, J, n)
const COEFFS: [(i32, i32, f64); 34] = [
    (0, -2, 0.146_329_712_131_67),
    (0, -1, -0.845_481_871_691_14),
    (0, 0, -0.375_636_036_720_40e1),
    (0, 1, 0.338_551_691_683_85e1),
    (0, 2, -0.957_919_633_878_72),
    (0, 3, 0.157_720_385_132_28),
    (0, 4, -0.166_164_171_995_01e-1),
    (0, 5, 0.812_146_299_835_68e-3),
    (1, -9, 0.283_190_801_238_04e-3),
    (1, -7, -0.607_063_015_658_74e-3),
    (1, -1, -0.189_900_682_184_19e-1),
    (1, 0, -0.325_297_487_705_05e-1),
    (1, 1, -0.218_417_171_754_14e-1),
    (1, 3, -0.528_383_579_699_30e-4),
    (2, -3, -0.471_843_210_732_67e-3),
    (2, 0, -0.300_017_807_930_26e-3),
    (2, 1, 0.476_613_939_069_87e-4),
    (2, 3, -0.441_418_453_308_46e-5),
    (2, 17, -0.726_949_962_975_94e-15),
    (3, -4, -0.316_796_448_450_54e-4),
    (3, 0, -0.282_707_979_853_12e-5),
    (3, 6, -0.852_051_281_201_03e-9),
    (4, -5, -0.224_252_819_080_00e-5),
    (4, -2, -0.651_712_228_956_01e-6),
    (4, 10, -0.143_417_299_379_24e-12),
    (5, -8, -0.405_169_968_601_17e-6),
    (8, -11, -0.127_343_017_416_41e-8),
    (8, -6, -0.174_248_712_306_34e-9),
    (21, -29, -0.687_621_312_955_31e-18),
    (23, -31, 0.144_783_078_285_21e-19),
    (29, -38, 0.263_357_816_627_95e-22),
    (30, -39, -0.119_476_226_400_71e-22),
    (31, -40, 0.182_280_945_814_04e-23),
    (32, -41, -0.935_370_872_924_58e-25),
];

pub(super) fn props(t_k: f64, p_kpa: f64) -> Properties {
    let pi = p_kpa / P_STAR_KPA;
    let tau = T_STAR_K / t_k;
    let a = 7.1 - pi;
    let b = tau - 1.222;

    let mut gamma = 0.0;
    let mut gamma_pi = 0.0;
    let mut gamma_tau = 0.0;
    for &(i, j, n) in COEFFS.iter() {
        let ai = a.powi(i);
        let bj = b.powi(j);
        gamma += n * ai * bj;
        gamma_pi -= n * f64::from(i) * a.powi(i - 1) * bj;
        gamma_tau += n * ai * f64::from(j) * b.powi(j - 1);
    }

    let v = R * t_k * pi * gamma_pi / p_kpa;
    Properties {
        h: R * t_k * tau * gamma_tau,
        s: R * (tau * gamma_tau - gamma),
        rho: 1.0 / v,
    }
}
