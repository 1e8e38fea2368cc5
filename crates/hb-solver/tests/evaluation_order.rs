//! An acyclic plant is evaluated once per unit, in flow order.

use std::sync::atomic::{AtomicUsize, Ordering};

use hb_core::{Ambient, Medium};
use hb_fluids::PortState;
use hb_project::{Defaults, ParamMap, PlantGraph, RunCase};
use hb_solver::{SolveContext, compile, solve};
use hb_units::{
    ParamMap as UnitParams, PortMap, PortSpec, Unit, UnitCategory, UnitDescriptor, UnitOutputs, UnitRegistry,
    UnitResult,
};

static EVALUATIONS: AtomicUsize = AtomicUsize::new(0);

const PORTS: &[PortSpec] = &[
    PortSpec::inlet("in", Medium::Water),
    PortSpec::outlet("out", Medium::Water),
];

#[derive(Debug)]
struct Relay;

impl Unit for Relay {
    fn type_key(&self) -> &'static str {
        "Relay"
    }

    fn category(&self) -> UnitCategory {
        UnitCategory::Pump
    }

    fn ports(&self) -> &'static [PortSpec] {
        PORTS
    }

    fn evaluate(&self, inputs: &PortMap, _ambient: &Ambient) -> UnitResult<UnitOutputs> {
        EVALUATIONS.fetch_add(1, Ordering::SeqCst);
        let out = match inputs.get("in") {
            Some(state) if state.m_dot_kg_s > 0.0 => *state,
            _ => PortState::from_tp(50.0, 500.0, 10.0, Medium::Water)?,
        };
        Ok(UnitOutputs::default().with_port("out", out))
    }
}

fn build(_: &UnitParams) -> UnitResult<Box<dyn Unit>> {
    Ok(Box::new(Relay))
}

fn registry() -> UnitRegistry {
    let mut registry = UnitRegistry::new();
    registry
        .register(UnitDescriptor {
            type_key: "Relay",
            category: UnitCategory::Pump,
            ports: PORTS,
            params: &[],
            holds_inventory: false,
            factory: build,
        })
        .unwrap();
    registry
}

fn chain() -> PlantGraph {
    PlantGraph::new(Ambient::default())
        .with_unit("C", "Relay", ParamMap::new())
        .with_unit("B", "Relay", ParamMap::new())
        .with_unit("A", "Relay", ParamMap::new())
        .with_stream("A.out", "B.in")
        .with_stream("B.out", "C.in")
}

#[test]
fn acyclic_plant_evaluates_each_unit_once_in_flow_order() {
    let registry = registry();
    let defaults = Defaults::builtin();
    let plant = chain();

    let compiled = compile(&plant, &registry).unwrap();
    let order: Vec<&str> = compiled
        .order
        .order
        .iter()
        .map(|u| compiled.unit(*u).id.as_str())
        .collect();
    assert_eq!(order, ["A", "B", "C"]);

    let ctx = SolveContext::new(&registry, &defaults);
    let result = solve(&plant, &RunCase::default(), &ctx).unwrap();

    assert_eq!(EVALUATIONS.load(Ordering::SeqCst), 3);
    assert_eq!(result.mass_energy_balance.iterations, 1);
    assert_eq!(result.mass_energy_balance.closure_error_pct, 0.0);
    assert!(result.mass_energy_balance.converged);

    let c_in = result.unit_states["C"].ports["in"];
    assert!((c_in.m_dot_kg_s - 10.0).abs() < 1e-12);
    assert!((c_in.t_c - 50.0).abs() < 1e-9);
}
