use crate::HbError;

/// Floating point type used throughout the solver.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HbError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HbError::NonFinite { what, value: v })
    }
}

/// Relative change between two values, guarded by `floor` so near-zero
/// magnitudes do not blow up the ratio.
pub fn relative_change(old: Real, new: Real, floor: Real) -> Real {
    let scale = old.abs().max(new.abs()).max(floor);
    (new - old).abs() / scale
}
