//! Region 2: superheated vapour, ideal-gas plus residual Gibbs energy.

use super::R;
use crate::properties::Properties;

const P_STAR_KPA: f64 = 1_000.0;
const T_STAR_K: f64 = 540.0;

/// Ideal-gas part (J, n)
const IDEAL: [(i32, f64); 9] = [
    (0, -0.969_276_865_002_17e1),
    (1, 0.100_866_559_680_18e2),
    (-5, -0.560_879_112_830_20e-2),
    (-4, 0.714_527_380_814_55e-1),
    (-3, -0.407_104_982_239_28),
    (-2, 0.142_408_191_714_44e1),
    (-1, -0.438_395_113_194_50e1),
    (2, -0.284_086_324_607_72),
    (3, 0.212_684_637_533_07e-1),
];

/// Residual part (I, J, n)
const RESIDUAL: [(i32, i32, f64); 43] = [
    (1, 0, -0.177_317_424_732_13e-2),
    (1, 1, -0.178_348_622_923_58e-1),
    (1, 2, -0.459_960_136_963_65e-1),
    (1, 3, -0.575_812_590_834_32e-1),
    (1, 6, -0.503_252_787_279_30e-1),
    (2, 1, -0.330_326_416_702_03e-4),
    (2, 2, -0.189_489_875_163_15e-3),
    (2, 4, -0.393_927_772_433_55e-2),
    (2, 7, -0.437_972_956_505_73e-1),
    (2, 36, -0.266_745_479_140_87e-4),
    (3, 0, 0.204_817_376_923_09e-7),
    (3, 1, 0.438_706_672_844_35e-6),
    (3, 3, -0.322_776_772_385_70e-4),
    (3, 6, -0.150_339_245_421_48e-2),
    (3, 35, -0.406_682_535_626_49e-1),
    (4, 1, -0.788_473_095_593_67e-9),
    (4, 2, 0.127_907_178_522_85e-7),
    (4, 3, 0.482_253_727_185_07e-6),
    (5, 7, 0.229_220_763_376_61e-5),
    (6, 3, -0.167_147_664_510_61e-10),
    (6, 16, -0.211_714_723_213_55e-2),
    (6, 35, -0.238_957_419_341_04e2),
    (7, 0, -0.590_595_643_242_70e-17),
    (7, 11, -0.126_218_088_991_01e-5),
    (7, 25, -0.389_468_424_357_39e-1),
    (8, 8, 0.112_562_113_604_59e-10),
    (8, 36, -0.823_113_408_979_98e1),
    (9, 13, 0.198_097_128_020_88e-7),
    (10, 4, 0.104_069_652_101_74e-18),
    (10, 10, -0.102_347_470_959_29e-12),
    (10, 14, -0.100_181_793_795_11e-8),
    (16, 29, -0.808_829_086_469_85e-10),
    (16, 50, 0.106_930_318_794_09),
    (18, 57, -0.336_622_505_741_71),
    (20, 20, 0.891_858_453_554_21e-24),
    (20, 35, 0.306_293_168_762_32e-12),
    (20, 48, -0.420_024_676_982_08e-5),
    (21, 21, -0.590_560_296_856_39e-25),
    (22, 53, 0.378_269_476_134_57e-5),
    (23, 39, -0.127_686_089_346_81e-14),
    (24, 26, 0.730_876_105_950_61e-28),
    (24, 40, 0.554_147_153_507_78e-16),
    (24, 58, -0.943_697_072_412_10e-6),
];

pub(super) fn props(t_k: f64, p_kpa: f64) -> Properties {
    let pi = p_kpa / P_STAR_KPA;
    let tau = T_STAR_K / t_k;

    let mut g0 = pi.ln();
    let mut g0_tau = 0.0;
    for &(j, n) in IDEAL.iter() {
        g0 += n * tau.powi(j);
        g0_tau += n * f64::from(j) * tau.powi(j - 1);
    }
    let g0_pi = 1.0 / pi;

    let b = tau - 0.5;
    let mut gr = 0.0;
    let mut gr_pi = 0.0;
    let mut gr_tau = 0.0;
    for &(i, j, n) in RESIDUAL.iter() {
        let pi_i = pi.powi(i);
        let bj = b.powi(j);
        gr += n * pi_i * bj;
        gr_pi += n * f64::from(i) * pi.powi(i - 1) * bj;
        gr_tau += n * pi_i * f64::from(j) * b.powi(j - 1);
    }

    let v = R * t_k * pi * (g0_pi + gr_pi) / p_kpa;
    Properties {
        h: R * t_k * tau * (g0_tau + gr_tau),
        s: R * (tau * (g0_tau + gr_tau) - (g0 + gr)),
        rho: 1.0 / v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_points() {
        let p = props(300.0, 3.5);
        assert!((p.h - 2_549.911_45).abs() < 1e-4);
        assert!((p.s - 8.522_389_67).abs() < 1e-7);
        assert!((1.0 / p.rho - 39.491_386_6).abs() < 1e-5);

        let p = props(700.0, 30_000.0);
        assert!((p.h - 2_631.494_74).abs() < 1e-4);
        assert!((p.s - 5.175_402_98).abs() < 1e-7);
        assert!((1.0 / p.rho - 0.005_429_466_19).abs() < 1e-11);
    }
}
