//! Halton low-discrepancy sequence for multi-start points.

const PRIMES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Radical inverse of `index` in `base`.
pub fn radical_inverse(mut index: u64, base: u32) -> f64 {
    let base = u64::from(base);
    let inv = 1.0 / base as f64;
    let mut scale = inv;
    let mut value = 0.0;
    while index > 0 {
        value += (index % base) as f64 * scale;
        index /= base;
        scale *= inv;
    }
    value
}

/// `count` points in the unit box of dimension `dims`, skipping index 0.
///
/// Dimensions beyond the prime table reuse it with a shifted index.
pub fn halton_points(count: usize, dims: usize) -> Vec<Vec<f64>> {
    (1..=count as u64)
        .map(|i| {
            (0..dims)
                .map(|d| {
                    let base = PRIMES[d % PRIMES.len()];
                    let shift = (d / PRIMES.len()) as u64 * 7;
                    radical_inverse(i + shift, base)
                })
                .collect()
        })
        .collect()
}
