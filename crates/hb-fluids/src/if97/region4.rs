//! Region 4 saturation line and the region 2/3 boundary (B23).

const N: [f64; 10] = [
    0.116_705_214_527_67e4,
    -0.724_213_167_032_06e6,
    -0.170_738_469_400_92e2,
    0.120_208_247_024_70e5,
    -0.323_255_503_223_33e7,
    0.149_151_086_135_30e2,
    -0.482_326_573_615_91e4,
    0.405_113_405_420_57e6,
    -0.238_555_575_678_49,
    0.650_175_348_447_98e3,
];

const B23: [f64; 3] = [
    0.348_051_856_289_69e3,
    -0.116_718_598_799_75e1,
    0.101_929_700_393_26e-2,
];

/// Saturation pressure [kPa] at `t_k`. Valid from 273.15 K to the critical point.
pub(crate) fn saturation_pressure_kpa(t_k: f64) -> f64 {
    let theta = t_k + N[8] / (t_k - N[9]);
    let a = theta * theta + N[0] * theta + N[1];
    let b = N[2] * theta * theta + N[3] * theta + N[4];
    let c = N[5] * theta * theta + N[6] * theta + N[7];
    let p_mpa = (2.0 * c / (-b + (b * b - 4.0 * a * c).sqrt())).powi(4);
    p_mpa * 1_000.0
}

/// Saturation temperature [K] at `p_kpa`. Valid from the triple point to the critical point.
pub(crate) fn saturation_temperature_k(p_kpa: f64) -> f64 {
    let beta = (p_kpa / 1_000.0).powf(0.25);
    let e = beta * beta + N[2] * beta + N[5];
    let f = N[0] * beta * beta + N[3] * beta + N[6];
    let g = N[1] * beta * beta + N[4] * beta + N[7];
    let d = 2.0 * g / (-f - (f * f - 4.0 * e * g).sqrt());
    (N[9] + d - ((N[9] + d).powi(2) - 4.0 * (N[8] + N[9] * d)).sqrt()) / 2.0
}

/// Pressure [kPa] on the boundary between regions 2 and 3.
pub(crate) fn b23_pressure_kpa(t_k: f64) -> f64 {
    (B23[0] + B23[1] * t_k + B23[2] * t_k * t_k) * 1_000.0
}
