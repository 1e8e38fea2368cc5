//! Scalar root finders shared by the steam tables and the flashes.

/// Safeguarded Newton iteration for an increasing function.
///
/// `f` returns the residual and its derivative. `[lo, hi]` must bracket
/// the root with `f(lo) < 0 < f(hi)`. Steps that leave the bracket fall
/// back to bisection.
pub(crate) fn newton_bracketed(
    mut f: impl FnMut(f64) -> (f64, f64),
    mut lo: f64,
    mut hi: f64,
    x0: f64,
    tol_f: f64,
    tol_x_rel: f64,
    max_iter: usize,
) -> Option<f64> {
    let mut x = x0.clamp(lo, hi);
    for _ in 0..max_iter {
        let (fx, dfx) = f(x);
        if !fx.is_finite() {
            return None;
        }
        if fx.abs() <= tol_f {
            return Some(x);
        }
        if fx < 0.0 {
            lo = x;
        } else {
            hi = x;
        }
        if hi - lo <= tol_x_rel * hi.abs().max(1.0) {
            return Some(0.5 * (lo + hi));
        }
        let step = x - fx / dfx;
        x = if dfx > 0.0 && step > lo && step < hi {
            step
        } else {
            0.5 * (lo + hi)
        };
    }
    None
}

/// Illinois-modified regula falsi on `[a, b]`.
///
/// Returns `Ok(None)` when the interval does not bracket a sign change or
/// the iteration budget runs out; evaluation errors propagate unchanged.
pub(crate) fn regula_falsi<E>(
    mut f: impl FnMut(f64) -> Result<f64, E>,
    mut a: f64,
    mut b: f64,
    tol_f: f64,
    max_iter: usize,
) -> Result<Option<f64>, E> {
    let mut fa = f(a)?;
    let mut fb = f(b)?;
    if fa.abs() <= tol_f {
        return Ok(Some(a));
    }
    if fb.abs() <= tol_f {
        return Ok(Some(b));
    }
    if fa.signum() == fb.signum() {
        return Ok(None);
    }

    let mut side = 0_i8;
    for _ in 0..max_iter {
        let c = (a * fb - b * fa) / (fb - fa);
        let fc = f(c)?;
        if fc.abs() <= tol_f || (b - a).abs() <= 1e-12 * c.abs().max(1.0) {
            return Ok(Some(c));
        }
        if fc.signum() == fb.signum() {
            b = c;
            fb = fc;
            if side == -1 {
                fa *= 0.5;
            }
            side = -1;
        } else {
            a = c;
            fa = fc;
            if side == 1 {
                fb *= 0.5;
            }
            side = 1;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newton_finds_square_root() {
        let root = newton_bracketed(|x| (x * x - 2.0, 2.0 * x), 0.0, 2.0, 1.0, 1e-12, 1e-15, 50)
            .unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn regula_falsi_handles_flat_end() {
        let root = regula_falsi(|x: f64| Ok::<_, ()>(x.powi(3) - 8.0), 0.0, 10.0, 1e-10, 200)
            .unwrap()
            .unwrap();
        assert!((root - 2.0).abs() < 1e-8);
    }

    #[test]
    fn regula_falsi_reports_missing_bracket() {
        let root = regula_falsi(|x: f64| Ok::<_, ()>(x * x + 1.0), -1.0, 1.0, 1e-10, 50).unwrap();
        assert!(root.is_none());
    }
}
