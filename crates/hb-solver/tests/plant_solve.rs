//! Full plant solves over the built-in unit library.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use hb_core::Ambient;
use hb_project::{Defaults, ParamMap, PlantGraph, RunCase};
use hb_results::UnitStatus;
use hb_solver::{CompileError, SolveBudget, SolveContext, SolverError, StreamEnd, solve};
use hb_units::{UnitError, UnitRegistry};
use serde_json::json;

fn params(value: serde_json::Value) -> ParamMap {
    serde_json::from_value(value).unwrap()
}

/// GT, HRSG, turbine, condenser and pump with the feedwater loop closed
/// and no storage anywhere in it.
fn feedwater_loop() -> PlantGraph {
    PlantGraph::new(Ambient::default())
        .with_unit("GT1", "GasTurbine", ParamMap::new())
        .with_unit("HRSG1", "HRSG", ParamMap::new())
        .with_unit("ST1", "SteamTurbine", params(json!({"outlet_P_kPa_abs": 8.0})))
        .with_unit("COND1", "Condenser", params(json!({"vacuum_kPa_abs": 8.0})))
        .with_unit("FWP1", "FeedwaterPump", ParamMap::new())
        .with_stream("GT1.exhaust_out", "HRSG1.gas_in")
        .with_stream("HRSG1.steam_out", "ST1.inlet")
        .with_stream("ST1.outlet", "COND1.steam_in")
        .with_stream("COND1.condensate_out", "FWP1.water_in")
        .with_stream("FWP1.water_out", "HRSG1.feedwater_in")
}

fn context<'a>(registry: &'a UnitRegistry, defaults: &'a Defaults) -> SolveContext<'a> {
    SolveContext::new(registry, defaults)
}

#[test]
fn feedwater_recycle_without_storage_iterates() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let result = solve(&feedwater_loop(), &RunCase::default(), &context(&registry, &defaults)).unwrap();

    let balance = result.mass_energy_balance;
    assert!(balance.iterations >= 2);
    if balance.converged {
        assert!(balance.closure_error_pct <= 0.5);
    } else {
        assert!(result.violations.iter().any(|v| v.contains("Recycle")));
    }

    let st = &result.unit_states["ST1"];
    let m_in = st.ports["inlet"].m_dot_kg_s;
    let m_out = st.ports["outlet"].m_dot_kg_s;
    assert!(m_in > 0.0);
    assert!((m_in - m_out).abs() <= 1e-9 * m_in);
    assert!(st.duty.power_mw > 0.0);

    let s = &result.summary;
    assert!((s.net_power_mw - (s.gt_power_mw + s.st_power_mw - s.aux_load_mw)).abs() < 1e-9);
    assert!(s.net_eff_lhv_pct > 0.0 && s.net_eff_lhv_pct < 70.0);
}

#[test]
fn freezing_ambient_still_solves() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let mut plant = feedwater_loop();
    plant.ambient = Some(Ambient::new(-5.0, 80.0, 101.3));

    let result = solve(&plant, &RunCase::default(), &context(&registry, &defaults)).unwrap();
    assert!(result.summary.gt_power_mw > 0.0);
    assert!(result.unit_states["ST1"].duty.power_mw > 0.0);
    assert!(result.unit_states["HRSG1"].ports["steam_out"].m_dot_kg_s > 0.0);
}

#[test]
fn plant_without_ambient_uses_the_defaults_table() {
    let registry = UnitRegistry::builtin().unwrap();
    let gt_power = |site_t_c: f64| {
        let mut defaults = Defaults::builtin();
        defaults.ambient = Ambient::new(site_t_c, 60.0, 101.3);
        let mut plant = feedwater_loop();
        plant.ambient = None;
        let result = solve(&plant, &RunCase::default(), &context(&registry, &defaults)).unwrap();
        result.unit_states["GT1"].duty.power_mw
    };
    assert!(gt_power(0.0) > gt_power(30.0));
}

#[test]
fn iteration_cap_is_reported_not_raised() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = context(&registry, &defaults).with_budget(SolveBudget::default().with_max_iterations(1));
    let result = solve(&feedwater_loop(), &RunCase::default(), &ctx).unwrap();

    assert!(!result.mass_energy_balance.converged);
    assert_eq!(result.mass_energy_balance.iterations, 1);
    assert!(result.mass_energy_balance.closure_error_pct > 0.5);
    assert!(result.violations[0].contains("did not converge"));
}

#[test]
fn cancelled_solve_returns_an_error() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let flag = Arc::new(AtomicBool::new(true));
    let ctx = context(&registry, &defaults).with_budget(SolveBudget::default().with_cancel(flag));
    let err = solve(&feedwater_loop(), &RunCase::default(), &ctx).unwrap_err();
    assert!(matches!(err, SolverError::Cancelled));
}

#[test]
fn solving_twice_gives_the_same_result() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let ctx = context(&registry, &defaults);
    let plant = feedwater_loop();
    let first = solve(&plant, &RunCase::default(), &ctx).unwrap();
    let mut second = solve(&plant, &RunCase::default(), &ctx).unwrap();
    second.meta.timestamp_utc = first.meta.timestamp_utc.clone();
    assert_eq!(first, second);
    assert_eq!(first.meta.plant_hash.len(), 64);
}

#[test]
fn dangling_stream_fails_without_a_result() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let plant = feedwater_loop().with_stream("HRSG1.gas_out", "STACK1.gas_in");
    let err = solve(&plant, &RunCase::default(), &context(&registry, &defaults)).unwrap_err();
    match err {
        SolverError::Compile(CompileError::DanglingStream { unit, end, .. }) => {
            assert_eq!(unit, "STACK1");
            assert_eq!(end, StreamEnd::Destination);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn invalid_parameters_name_the_unit_and_every_field() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let plant = PlantGraph::new(Ambient::default()).with_unit(
        "ST1",
        "SteamTurbineHP",
        params(json!({"eta_isentropic": 1.4, "mech_efficiency": -0.1})),
    );
    let err = solve(&plant, &RunCase::default(), &context(&registry, &defaults)).unwrap_err();
    match err {
        SolverError::Unit {
            unit,
            source: UnitError::InvalidParameter { fields, .. },
        } => {
            assert_eq!(unit, "ST1");
            assert_eq!(fields.len(), 2);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn unfed_turbine_is_idle() {
    let registry = UnitRegistry::builtin().unwrap();
    let defaults = Defaults::builtin();
    let plant = PlantGraph::new(Ambient::default()).with_unit("ST1", "SteamTurbineLP", ParamMap::new());
    let result = solve(&plant, &RunCase::default(), &context(&registry, &defaults)).unwrap();
    let st = &result.unit_states["ST1"];
    assert_eq!(st.duty.power_mw, 0.0);
    assert_ne!(st.status, UnitStatus::Ok);
    assert_eq!(st.type_key, "SteamTurbineLP");
    assert!(st.params.contains_key("eta_isentropic"));
}
