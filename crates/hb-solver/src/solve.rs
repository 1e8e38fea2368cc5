//! High-level solver interface.

use std::collections::BTreeMap;

use hb_project::{PlantGraph, RunCase};
use hb_results::{
    DistrictHeating, MassEnergyBalance, PlantResult, ResultMeta, Summary, UnitState, plant_hash, timestamp_utc,
};
use tracing::{debug, info, warn};

use crate::compile::compile;
use crate::constraints::{ConstraintCheck, check_constraints};
use crate::context::SolveContext;
use crate::error::SolverResult;
use crate::pipeline::{Convergence, Pipeline, PipelineStage};
use crate::summary::{UnitView, district_heating, summarize};

/// Version string stamped into every result.
pub const SOLVER_VERSION: &str = concat!("hb-solver ", env!("CARGO_PKG_VERSION"));

/// A summarized solve, before provenance is attached.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub summary: Summary,
    pub violations: Vec<String>,
    pub checks: Vec<ConstraintCheck>,
    pub convergence: Convergence,
    pub unit_states: BTreeMap<String, UnitState>,
    pub district_heating: Option<DistrictHeating>,
}

impl Evaluation {
    /// Constraint breaches, one per check, for penalty terms.
    pub fn constraint_residuals(&self) -> Vec<f64> {
        self.checks.iter().map(ConstraintCheck::residual).collect()
    }

    pub fn is_feasible(&self) -> bool {
        self.convergence.converged && self.checks.iter().all(|c| c.residual() == 0.0)
    }
}

/// Solve `plant` under `run_case` and attach provenance.
pub fn solve(plant: &PlantGraph, run_case: &RunCase, ctx: &SolveContext<'_>) -> SolverResult<PlantResult> {
    let evaluation = evaluate(plant, run_case, ctx)?;
    finalize(plant, evaluation)
}

/// Compile, initialize, converge and summarize, without provenance.
///
/// This is the objective evaluation the optimizer calls for every trial.
pub fn evaluate(plant: &PlantGraph, run_case: &RunCase, ctx: &SolveContext<'_>) -> SolverResult<Evaluation> {
    let compiled = compile(plant, ctx.registry)?;
    let mut pipeline = Pipeline::initialize(compiled, plant, ctx.defaults)?;

    let convergence = match pipeline.converge(&ctx.config, &ctx.budget) {
        Ok(c) => c,
        Err(e) => {
            let stage = pipeline.stage();
            pipeline.set_stage(PipelineStage::Failed);
            warn!(stage = %stage, error = %e, "solve failed");
            return Err(e);
        }
    };

    let unit_states = pipeline.unit_states();
    let views: Vec<UnitView<'_>> = pipeline
        .plant()
        .units
        .iter()
        .filter_map(|u| {
            unit_states.get(&u.id).map(|state| UnitView {
                id: &u.id,
                category: u.descriptor.category,
                state,
            })
        })
        .collect();

    let summary = summarize(&views, ctx.defaults.auxiliary.aux_load_mw, run_case.pricing.as_ref());
    let checks = check_constraints(&run_case.constraints, &ctx.defaults.constraints, &summary, &views);
    let district_heating = district_heating(&views);

    let mut violations: Vec<String> = convergence.violation().into_iter().collect();
    violations.extend(checks.iter().filter_map(ConstraintCheck::violation));

    pipeline.set_stage(PipelineStage::Summarized);
    info!(
        net_power_mw = summary.net_power_mw,
        converged = convergence.converged,
        iterations = convergence.iterations,
        violations = violations.len(),
        "plant solved"
    );

    Ok(Evaluation {
        summary,
        violations,
        checks,
        convergence,
        unit_states,
        district_heating,
    })
}

/// Attach hash, timestamp and version.
pub fn finalize(plant: &PlantGraph, evaluation: Evaluation) -> SolverResult<PlantResult> {
    let meta = ResultMeta {
        timestamp_utc: timestamp_utc(),
        plant_hash: plant_hash(plant)?,
        solver_version: SOLVER_VERSION.to_string(),
        extra: BTreeMap::new(),
    };
    debug!(stage = %PipelineStage::Done, plant_hash = %meta.plant_hash, "result finalized");
    Ok(PlantResult {
        summary: evaluation.summary,
        violations: evaluation.violations,
        unit_states: evaluation.unit_states,
        mass_energy_balance: MassEnergyBalance {
            closure_error_pct: evaluation.convergence.closure_error_pct,
            converged: evaluation.convergence.converged,
            iterations: evaluation.convergence.iterations,
        },
        district_heating: evaluation.district_heating,
        meta,
    })
}
