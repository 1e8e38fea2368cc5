//! Projected quasi-Newton search on the unit box.

use nalgebra::{DMatrix, DVector};

use crate::config::OptimizerConfig;
use crate::error::OptimResult;

/// Result of one local search.
#[derive(Debug, Clone)]
pub struct LocalOutcome {
    pub x: DVector<f64>,
    pub merit: f64,
    pub iterations: usize,
    /// Stationary or stalled, as opposed to running out of iterations or
    /// failing the line search.
    pub converged: bool,
}

/// Minimize `f` over `[0, 1]^n` from `x0`.
///
/// BFGS inverse-Hessian updates on forward-difference gradients, with the
/// step projected back into the box and an Armijo backtracking line search.
/// Errors from `f` abort the search.
pub fn minimize_box<F>(mut f: F, x0: DVector<f64>, config: &OptimizerConfig) -> OptimResult<LocalOutcome>
where
    F: FnMut(&DVector<f64>) -> OptimResult<f64>,
{
    let n = x0.len();
    let mut x = x0.map(|v| v.clamp(0.0, 1.0));
    let mut fx = f(&x)?;
    if !fx.is_finite() {
        return Ok(LocalOutcome {
            x,
            merit: fx,
            iterations: 0,
            converged: false,
        });
    }
    let mut g = gradient(&mut f, &x, fx, config.gradient_step)?;
    let mut h = DMatrix::<f64>::identity(n, n);

    for iteration in 0..config.max_iterations {
        let pg = projected(&x, &g);
        if pg.norm() <= config.gradient_tol {
            return Ok(LocalOutcome {
                x,
                merit: fx,
                iterations: iteration,
                converged: true,
            });
        }

        let mut d = -(&h * &g);
        for i in 0..n {
            if (x[i] <= 0.0 && d[i] < 0.0) || (x[i] >= 1.0 && d[i] > 0.0) {
                d[i] = 0.0;
            }
        }
        if d.dot(&g) >= 0.0 {
            h = DMatrix::identity(n, n);
            d = -pg;
        }

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_backtracks {
            let trial = (&x + &d * alpha).map(|v| v.clamp(0.0, 1.0));
            let ft = f(&trial)?;
            if ft.is_finite() && ft <= fx + config.armijo * g.dot(&(&trial - &x)) {
                accepted = Some((trial, ft));
                break;
            }
            alpha *= config.backtrack;
        }
        let Some((x_new, f_new)) = accepted else {
            return Ok(LocalOutcome {
                x,
                merit: fx,
                iterations: iteration + 1,
                converged: false,
            });
        };

        let g_new = gradient(&mut f, &x_new, f_new, config.gradient_step)?;
        let s = &x_new - &x;
        let y = &g_new - &g;
        let sy = s.dot(&y);
        if sy > 1e-12 {
            let rho = 1.0 / sy;
            let a = DMatrix::<f64>::identity(n, n) - (&s * y.transpose()) * rho;
            h = &a * &h * a.transpose() + (&s * s.transpose()) * rho;
        }

        let stalled = (fx - f_new).abs() <= config.merit_tol * (1.0 + fx.abs());
        x = x_new;
        fx = f_new;
        g = g_new;
        if stalled {
            return Ok(LocalOutcome {
                x,
                merit: fx,
                iterations: iteration + 1,
                converged: true,
            });
        }
    }

    Ok(LocalOutcome {
        x,
        merit: fx,
        iterations: config.max_iterations,
        converged: false,
    })
}

/// Forward differences, stepping backward at the upper bound. A component
/// whose neighbour cannot be evaluated is zero.
fn gradient<F>(f: &mut F, x: &DVector<f64>, fx: f64, step: f64) -> OptimResult<DVector<f64>>
where
    F: FnMut(&DVector<f64>) -> OptimResult<f64>,
{
    let mut g = DVector::zeros(x.len());
    for i in 0..x.len() {
        let dx = if x[i] + step <= 1.0 { step } else { -step };
        let mut probe = x.clone();
        probe[i] += dx;
        let fp = f(&probe)?;
        if fp.is_finite() {
            g[i] = (fp - fx) / dx;
        }
    }
    Ok(g)
}

/// Gradient with components that point out of the box at active bounds removed.
fn projected(x: &DVector<f64>, g: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(
        x.len(),
        x.iter().zip(g.iter()).map(|(&xi, &gi)| {
            if (xi <= 0.0 && gi > 0.0) || (xi >= 1.0 && gi < 0.0) {
                0.0
            } else {
                gi
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimError;

    #[test]
    fn finds_interior_minimum() {
        let f = |x: &DVector<f64>| Ok((x[0] - 0.3).powi(2) + 4.0 * (x[1] - 0.8).powi(2));
        let out = minimize_box(f, DVector::from_vec(vec![0.9, 0.1]), &OptimizerConfig::default()).unwrap();
        assert!(out.converged);
        assert!((out.x[0] - 0.3).abs() < 5e-3, "x = {}", out.x);
        assert!((out.x[1] - 0.8).abs() < 5e-3, "x = {}", out.x);
    }

    #[test]
    fn stops_on_active_bound() {
        let f = |x: &DVector<f64>| Ok((x[0] - 1.5).powi(2));
        let out = minimize_box(f, DVector::from_vec(vec![0.2]), &OptimizerConfig::default()).unwrap();
        assert!(out.converged);
        assert_eq!(out.x[0], 1.0);
    }

    #[test]
    fn errors_abort_the_search() {
        let f = |_: &DVector<f64>| -> OptimResult<f64> { Err(OptimError::Cancelled) };
        let err = minimize_box(f, DVector::from_vec(vec![0.5]), &OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, OptimError::Cancelled));
    }

    #[test]
    fn unevaluable_start_is_not_converged() {
        let f = |_: &DVector<f64>| Ok(f64::INFINITY);
        let out = minimize_box(f, DVector::from_vec(vec![0.5]), &OptimizerConfig::default()).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 0);
    }
}
