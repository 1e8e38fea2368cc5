//! Simulate and optimize entry points.

use std::time::Instant;

use hb_optim::OptimizerConfig;
use hb_project::{Mode, PlantGraph, RunCase};
use hb_results::PlantResult;
use hb_solver::SolveContext;
use tracing::info;

use crate::error::AppResult;

/// Solve once with the process-wide registry and defaults.
pub fn simulate(plant: &PlantGraph, run_case: &RunCase) -> AppResult<PlantResult> {
    let ctx = SolveContext::global()?;
    simulate_with(plant, run_case, &ctx)
}

pub fn simulate_with(plant: &PlantGraph, run_case: &RunCase, ctx: &SolveContext<'_>) -> AppResult<PlantResult> {
    let start = Instant::now();
    let result = hb_solver::solve(plant, run_case, ctx)?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        converged = result.mass_energy_balance.converged,
        "simulate finished"
    );
    Ok(result)
}

/// Optimize with the process-wide registry and defaults. The run case's
/// mode is treated as `optimize` regardless of its value.
pub fn optimize(plant: &PlantGraph, run_case: &RunCase) -> AppResult<PlantResult> {
    let ctx = SolveContext::global()?;
    optimize_with(plant, run_case, &ctx, &OptimizerConfig::default())
}

pub fn optimize_with(
    plant: &PlantGraph,
    run_case: &RunCase,
    ctx: &SolveContext<'_>,
    config: &OptimizerConfig,
) -> AppResult<PlantResult> {
    let run_case = RunCase {
        mode: Mode::Optimize,
        ..run_case.clone()
    };
    let start = Instant::now();
    let result = hb_optim::optimize(plant, &run_case, ctx, config)?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "optimize finished"
    );
    Ok(result)
}

/// Dispatch on the run case's mode.
pub fn run(plant: &PlantGraph, run_case: &RunCase) -> AppResult<PlantResult> {
    match run_case.mode {
        Mode::Simulate => simulate(plant, run_case),
        Mode::Optimize => optimize(plant, run_case),
    }
}
