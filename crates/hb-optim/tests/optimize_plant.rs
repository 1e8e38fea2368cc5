//! End-to-end optimization runs.

use hb_core::Ambient;
use hb_optim::{OptimError, OptimizerConfig, STRICT_FEASIBILITY, optimize};
use hb_project::{Defaults, Mode, Objective, ParamMap, PlantGraph, RunCase};
use hb_solver::SolveContext;
use hb_units::UnitRegistry;

fn gas_turbine_only() -> PlantGraph {
    PlantGraph::new(Ambient::default()).with_unit("GT1", "GasTurbine", ParamMap::new())
}

fn load_case(objective: Objective) -> RunCase {
    let mut rc = RunCase {
        mode: Mode::Optimize,
        objective,
        ..RunCase::default()
    };
    rc.bounds.insert("GT1.load_pct".into(), [50.0, 100.0]);
    rc
}

fn small_config() -> OptimizerConfig {
    OptimizerConfig {
        starts: 3,
        workers: 2,
        ..OptimizerConfig::default()
    }
}

#[test]
fn revenue_without_pricing_fails_before_any_trial() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = SolveContext::new(&registry, &defaults);
    // An unknown unit type would fail the first trial's compile.
    let plant = gas_turbine_only().with_unit("X1", "NoSuchUnit", ParamMap::new());
    let err = optimize(&plant, &load_case(Objective::MaxRevenue), &ctx, &small_config()).unwrap_err();
    assert!(matches!(err, OptimError::MissingPricing { objective: "max_revenue" }));
}

#[test]
fn max_power_drives_gas_turbine_to_full_load() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = SolveContext::new(&registry, &defaults);
    let result = optimize(
        &gas_turbine_only(),
        &load_case(Objective::MaxPower),
        &ctx,
        &small_config(),
    )
    .unwrap();

    let load = result.meta.extra["optimizer_var.GT1.load_pct"].as_f64().unwrap();
    assert!(load > 99.0, "load = {load}");
    assert_eq!(result.meta.extra["optimizer_objective"], "max_power");
    assert!(result.meta.extra["optimizer_trials"].as_u64().unwrap() > 1);
    assert!(result.meta.extra.contains_key("optimizer_status"));
    assert!(result.violations.is_empty(), "{:?}", result.violations);
    assert_eq!(result.unit_states["GT1"].params["load_pct"].as_f64(), Some(load));
}

#[test]
fn infeasible_constraint_falls_back_to_penalty_or_fails_when_strict() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = SolveContext::new(&registry, &defaults);
    let mut rc = load_case(Objective::MaxEfficiency);
    rc.constraints.insert("PLANT.NET_power_MW_min".into(), 10_000.0);

    let result = optimize(&gas_turbine_only(), &rc, &ctx, &small_config()).unwrap();
    assert_eq!(result.meta.extra["optimizer_status"], "penalty_fallback");
    assert!(result.violations.iter().any(|v| v.contains("penalized")));
    assert!(result.violations.iter().any(|v| v.contains("NET_power_MW")));

    rc.toggles.insert(STRICT_FEASIBILITY.into(), true);
    let err = optimize(&gas_turbine_only(), &rc, &ctx, &small_config()).unwrap_err();
    assert!(matches!(err, OptimError::OptimizationDidNotConverge { .. }));
}

#[test]
fn empty_bounds_are_rejected() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = SolveContext::new(&registry, &defaults);
    let rc = RunCase {
        mode: Mode::Optimize,
        ..RunCase::default()
    };
    let err = optimize(&gas_turbine_only(), &rc, &ctx, &small_config()).unwrap_err();
    assert!(matches!(err, OptimError::NoDecisionVariables));
}

#[test]
fn misspelled_parameter_is_rejected_before_searching() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = SolveContext::new(&registry, &defaults);
    let mut rc = load_case(Objective::MaxPower);
    rc.bounds.clear();
    rc.bounds.insert("GT1.lod_pct".into(), [50.0, 100.0]);

    let err = optimize(&gas_turbine_only(), &rc, &ctx, &small_config()).unwrap_err();
    match err {
        OptimError::InvalidDecisionVariable { path, reason } => {
            assert_eq!(path, "GT1.lod_pct");
            assert!(reason.contains("GasTurbine has no parameter"), "{reason}");
        }
        other => panic!("expected InvalidDecisionVariable, got {other:?}"),
    }
}
