//! Objective and penalty in minimization form.

use hb_project::Objective;
use hb_results::Summary;
use hb_solver::Evaluation;

/// Merit used when the objective is undefined at a point, e.g. heat rate
/// with no net power.
pub const UNDEFINED_OBJECTIVE: f64 = 1e7;

/// The run's objective, negated where the objective is maximized.
pub fn objective_value(objective: Objective, summary: &Summary) -> f64 {
    match objective {
        Objective::MaxPower => -summary.net_power_mw,
        Objective::MinHeatRate => summary.heat_rate_kj_kwh.unwrap_or(UNDEFINED_OBJECTIVE),
        Objective::MaxEfficiency => -summary.net_eff_lhv_pct,
        Objective::MaxRevenue => summary.revenue_usd_h.map_or(UNDEFINED_OBJECTIVE, |r| -r),
    }
}

/// Quadratic penalty on constraint breaches (scaled by their limits) and on
/// recycle closure beyond the tolerance.
pub fn penalty(evaluation: &Evaluation, tolerance_pct: f64, weight: f64) -> f64 {
    let constraints: f64 = evaluation
        .checks
        .iter()
        .map(|c| {
            let r = c.residual() / c.limit.abs().max(1.0);
            r * r
        })
        .sum();
    let closure = if evaluation.convergence.converged {
        0.0
    } else {
        let excess = (evaluation.convergence.closure_error_pct - tolerance_pct).max(0.0) / 100.0;
        excess * excess
    };
    weight * (constraints + closure)
}

pub fn merit(objective: Objective, evaluation: &Evaluation, tolerance_pct: f64, weight: f64) -> f64 {
    objective_value(objective, &evaluation.summary) + penalty(evaluation, tolerance_pct, weight)
}
