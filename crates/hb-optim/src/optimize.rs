//! Constrained plant optimization over pipeline evaluations.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use hb_project::{PlantGraph, RunCase};
use hb_results::PlantResult;
use hb_solver::{SolveContext, SolverError, evaluate, finalize};
use nalgebra::DVector;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bfgs::{LocalOutcome, minimize_box};
use crate::config::OptimizerConfig;
use crate::error::{OptimError, OptimResult};
use crate::halton::halton_points;
use crate::objective::merit;
use crate::variables::{DecisionVariable, apply, decision_variables, start_point};

/// Toggle that turns the penalty fallback into an error.
pub const STRICT_FEASIBILITY: &str = "strict_feasibility";

/// How the reported optimum was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerStatus {
    /// The single start found a feasible improvement.
    Converged,
    /// A multi-start point gave the best feasible result.
    MultiStart,
    /// No feasible point; the lowest penalized merit is reported.
    PenaltyFallback,
    /// The deadline stopped the search; the best point so far is reported.
    Deadline,
}

impl OptimizerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OptimizerStatus::Converged => "converged",
            OptimizerStatus::MultiStart => "multi_start",
            OptimizerStatus::PenaltyFallback => "penalty_fallback",
            OptimizerStatus::Deadline => "deadline",
        }
    }
}

#[derive(Debug, Clone)]
struct Best {
    x: DVector<f64>,
    merit: f64,
    feasible: bool,
}

/// Shared trial evaluator. Every call builds its own pipeline, so workers
/// share only the read-only context.
struct Problem<'a> {
    plant: &'a PlantGraph,
    run_case: &'a RunCase,
    ctx: &'a SolveContext<'a>,
    vars: &'a [DecisionVariable],
    config: &'a OptimizerConfig,
    trials: AtomicUsize,
    best: Mutex<Option<Best>>,
}

impl Problem<'_> {
    fn trial(&self, x: &DVector<f64>) -> OptimResult<f64> {
        if self.ctx.budget.is_cancelled() {
            return Err(OptimError::Cancelled);
        }
        if self.ctx.budget.is_expired() {
            return Err(OptimError::DeadlineReached);
        }
        self.trials.fetch_add(1, Ordering::Relaxed);

        let candidate = apply(self.plant, self.vars, x);
        let evaluation = match evaluate(&candidate, self.run_case, self.ctx) {
            Ok(e) => e,
            Err(SolverError::Cancelled) => return Err(OptimError::Cancelled),
            Err(err @ (SolverError::Unit { .. } | SolverError::Fluid { .. })) => {
                debug!(error = %err, "trial point could not be evaluated");
                return Ok(f64::INFINITY);
            }
            Err(err) => return Err(err.into()),
        };

        let value = merit(
            self.run_case.objective,
            &evaluation,
            self.ctx.config.tolerance_pct,
            self.config.penalty_weight,
        );
        let feasible = evaluation.is_feasible();
        self.record(x, value, feasible);
        Ok(value)
    }

    fn record(&self, x: &DVector<f64>, merit: f64, feasible: bool) {
        let Ok(mut best) = self.best.lock() else {
            return;
        };
        let better = match best.as_ref() {
            None => merit.is_finite(),
            Some(b) => (feasible && !b.feasible) || (feasible == b.feasible && merit < b.merit),
        };
        if better {
            *best = Some(Best {
                x: x.clone(),
                merit,
                feasible,
            });
        }
    }

    fn best(&self) -> Option<Best> {
        self.best.lock().ok().and_then(|b| b.clone())
    }

    fn trials(&self) -> usize {
        self.trials.load(Ordering::Relaxed)
    }
}

/// Optimize `plant` under `run_case` and return the full result at the
/// optimum, with the search recorded in `meta` and fallbacks in
/// `violations`.
pub fn optimize(
    plant: &PlantGraph,
    run_case: &RunCase,
    ctx: &SolveContext<'_>,
    config: &OptimizerConfig,
) -> OptimResult<PlantResult> {
    if run_case.objective.needs_pricing() && run_case.pricing.is_none() {
        return Err(OptimError::MissingPricing {
            objective: run_case.objective.as_str(),
        });
    }
    let vars = decision_variables(plant, run_case, ctx.registry)?;
    let problem = Problem {
        plant,
        run_case,
        ctx,
        vars: &vars,
        config,
        trials: AtomicUsize::new(0),
        best: Mutex::new(None),
    };

    let x0 = start_point(plant, ctx.defaults, &vars);
    info!(
        objective = run_case.objective.as_str(),
        variables = vars.len(),
        "optimization started"
    );

    let (status, starts) = match search(&problem, x0, config) {
        Ok(outcome) => outcome,
        Err(OptimError::DeadlineReached) => (OptimizerStatus::Deadline, 1),
        Err(err) => return Err(err),
    };

    let Some(best) = problem.best() else {
        return Err(match status {
            OptimizerStatus::Deadline => OptimError::DeadlineReached,
            _ => OptimError::OptimizationDidNotConverge {
                reason: "no trial point could be evaluated".into(),
            },
        });
    };

    let mut notes = Vec::new();
    let status = if best.feasible {
        status
    } else if run_case.toggle(STRICT_FEASIBILITY) {
        return Err(OptimError::OptimizationDidNotConverge {
            reason: format!(
                "no feasible point after {} starts and {} trials",
                starts,
                problem.trials()
            ),
        });
    } else {
        notes.push(format!(
            "Optimizer: no feasible point found; reporting the penalized optimum (penalty weight {})",
            config.penalty_weight
        ));
        OptimizerStatus::PenaltyFallback
    };
    if status == OptimizerStatus::Deadline {
        notes.push("Optimizer: deadline reached; reporting the best point so far".to_string());
    }

    let optimized = apply(plant, &vars, &best.x);
    let evaluation = evaluate(&optimized, run_case, ctx)?;
    let mut result = finalize(plant, evaluation)?;
    result.violations.extend(notes);

    let meta = &mut result.meta;
    meta.insert("optimizer_objective", run_case.objective.as_str());
    meta.insert("optimizer_trials", problem.trials());
    meta.insert("optimizer_starts", starts);
    meta.insert("optimizer_status", status.as_str());
    for (var, &u) in vars.iter().zip(best.x.iter()) {
        meta.insert(format!("optimizer_var.{}", var.path), var.denormalize(u));
    }

    info!(
        status = status.as_str(),
        trials = problem.trials(),
        merit = best.merit,
        "optimization finished"
    );
    Ok(result)
}

/// Single start, then quasi-random multi-start when the first search is
/// infeasible or does not improve on its starting point.
fn search(problem: &Problem<'_>, x0: DVector<f64>, config: &OptimizerConfig) -> OptimResult<(OptimizerStatus, usize)> {
    let baseline = problem.trial(&x0)?;
    let local = minimize_box(|x| problem.trial(x), x0, config)?;
    let improved = local.merit < baseline - config.merit_tol * (1.0 + baseline.abs());
    let feasible = problem.best().is_some_and(|b| b.feasible);
    debug!(
        merit = local.merit,
        baseline,
        iterations = local.iterations,
        converged = local.converged,
        "single start finished"
    );
    if improved && feasible {
        return Ok((OptimizerStatus::Converged, 1));
    }

    let points = halton_points(config.starts, problem.vars.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .map_err(|e| OptimError::WorkerPool(e.to_string()))?;
    let outcomes: Vec<OptimResult<LocalOutcome>> = pool.install(|| {
        points
            .par_iter()
            .map(|p| minimize_box(|x| problem.trial(x), DVector::from_column_slice(p), config))
            .collect()
    });

    let mut deadline = false;
    for outcome in outcomes {
        match outcome {
            Ok(o) => debug!(merit = o.merit, converged = o.converged, "start finished"),
            Err(OptimError::DeadlineReached) => deadline = true,
            Err(err) => return Err(err),
        }
    }
    let starts = 1 + points.len();
    if deadline {
        warn!(starts, "optimization deadline reached during multi-start");
        return Ok((OptimizerStatus::Deadline, starts));
    }
    Ok((OptimizerStatus::MultiStart, starts))
}
