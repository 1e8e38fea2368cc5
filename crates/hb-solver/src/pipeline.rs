//! Initialization, forward pass and recycle convergence.

use std::collections::BTreeMap;
use std::fmt;

use hb_core::{Ambient, PortId, StreamId, UnitId, relative_change};
use hb_fluids::{FluidResult, PortState};
use hb_graph::PortKind;
use hb_project::{Defaults, ParamMap, PlantGraph};
use hb_results::{UnitState, UnitStatus};
use hb_units::{PortMap, Unit, UnitOutputs};
use tracing::{debug, info};

use crate::compile::CompiledPlant;
use crate::config::{SolveBudget, SolverConfig};
use crate::error::{SolverError, SolverResult};

const MASS_FLOOR_KG_S: f64 = 1e-6;
const ENERGY_FLOOR_KW: f64 = 1e-3;
const IDLE_FLOW_KG_S: f64 = 1e-9;

/// Where a solve currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Compiled,
    Initialized,
    ForwardPass,
    RecycleConverging,
    Summarized,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Compiled => "compiled",
            PipelineStage::Initialized => "initialized",
            PipelineStage::ForwardPass => "forward_pass",
            PipelineStage::RecycleConverging => "recycle_converging",
            PipelineStage::Summarized => "summarized",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        })
    }
}

/// Why iteration ended without meeting the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    IterationCap,
    Deadline,
}

/// Outcome of the recycle loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    pub closure_error_pct: f64,
    pub converged: bool,
    pub iterations: usize,
    pub stop: Option<StopReason>,
}

impl Convergence {
    /// Violation text for an unconverged loop.
    pub fn violation(&self) -> Option<String> {
        match self.stop? {
            StopReason::IterationCap => Some(format!(
                "Recycle loop did not converge within {} iterations (closure error {:.3}%)",
                self.iterations, self.closure_error_pct
            )),
            StopReason::Deadline => Some(format!(
                "Solve deadline reached after {} iterations (closure error {:.3}%)",
                self.iterations, self.closure_error_pct
            )),
        }
    }
}

/// A compiled plant with live units and a port-state table.
#[derive(Debug)]
pub struct Pipeline {
    plant: CompiledPlant,
    ambient: Ambient,
    params: Vec<ParamMap>,
    units: Vec<Box<dyn Unit>>,
    /// Current state of every port, indexed by port.
    ports: Vec<PortState>,
    /// Last evaluation of every unit, indexed by unit.
    outputs: Vec<UnitOutputs>,
    stage: PipelineStage,
}

impl Pipeline {
    /// Merge defaults, construct every unit and seed the port table.
    pub fn initialize(plant: CompiledPlant, document: &PlantGraph, defaults: &Defaults) -> SolverResult<Self> {
        let ambient = document.ambient_or(&defaults.ambient);
        let mut params = Vec::with_capacity(plant.units.len());
        let mut units = Vec::with_capacity(plant.units.len());
        for (compiled, definition) in plant.units.iter().zip(&document.units) {
            let merged = defaults.resolve(compiled.descriptor.type_key, &definition.params);
            let unit = (compiled.descriptor.factory)(&merged).map_err(|source| SolverError::Unit {
                unit: compiled.id.clone(),
                source,
            })?;
            params.push(merged);
            units.push(unit);
        }

        let ports = plant
            .graph
            .ports()
            .iter()
            .map(|port| {
                PortState::neutral(&ambient, port.medium).map_err(|source| SolverError::Fluid {
                    port: plant.graph.qualified_name(port.id),
                    source,
                })
            })
            .collect::<SolverResult<Vec<_>>>()?;

        let outputs = vec![UnitOutputs::default(); units.len()];
        debug!(units = units.len(), ports = ports.len(), "pipeline initialized");
        Ok(Self {
            plant,
            ambient,
            params,
            units,
            ports,
            outputs,
            stage: PipelineStage::Initialized,
        })
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: PipelineStage) {
        debug!(stage = %stage, "pipeline stage");
        self.stage = stage;
    }

    pub fn plant(&self) -> &CompiledPlant {
        &self.plant
    }

    pub fn port_state(&self, port: PortId) -> &PortState {
        &self.ports[port.ix()]
    }

    pub fn outputs(&self, unit: UnitId) -> &UnitOutputs {
        &self.outputs[unit.ix()]
    }

    /// Run the forward pass, iterating on back edges until closure.
    pub fn converge(&mut self, config: &SolverConfig, budget: &SolveBudget) -> SolverResult<Convergence> {
        if budget.is_cancelled() {
            return Err(SolverError::Cancelled);
        }
        let back_edges = self.plant.order.back_edges.clone();
        if back_edges.is_empty() {
            self.set_stage(PipelineStage::ForwardPass);
            self.forward_pass(&BTreeMap::new())?;
            return Ok(Convergence {
                closure_error_pct: 0.0,
                converged: true,
                iterations: 1,
                stop: None,
            });
        }

        let mut fed: BTreeMap<StreamId, PortState> = back_edges
            .iter()
            .map(|&s| (s, self.ports[self.stream_ends(s).1.ix()]))
            .collect();
        let mut closure = f64::INFINITY;

        for iteration in 1..=budget.max_iterations {
            if budget.is_cancelled() {
                return Err(SolverError::Cancelled);
            }
            if iteration > 1 && budget.is_expired() {
                info!(iteration, closure_pct = closure, "solve deadline reached");
                return Ok(Convergence {
                    closure_error_pct: closure,
                    converged: false,
                    iterations: iteration - 1,
                    stop: Some(StopReason::Deadline),
                });
            }

            self.set_stage(if iteration == 1 {
                PipelineStage::ForwardPass
            } else {
                PipelineStage::RecycleConverging
            });
            self.forward_pass(&fed)?;

            let raw: BTreeMap<StreamId, PortState> = back_edges
                .iter()
                .map(|&s| (s, self.ports[self.stream_ends(s).0.ix()]))
                .collect();
            closure = closure_error_pct(&fed, &raw);
            debug!(iteration, closure_pct = closure, "recycle iteration");

            if closure <= config.tolerance_pct {
                info!(iterations = iteration, closure_pct = closure, "recycle converged");
                return Ok(Convergence {
                    closure_error_pct: closure,
                    converged: true,
                    iterations: iteration,
                    stop: None,
                });
            }

            let omega = if iteration == 1 {
                config.first_relaxation
            } else {
                config.relaxation
            };
            for (&stream, state) in fed.iter_mut() {
                let medium = self.plant.graph.port(self.stream_ends(stream).1).map(|p| p.medium);
                let mut next = blend(state, &raw[&stream], omega).map_err(|source| SolverError::Fluid {
                    port: self.plant.graph.qualified_name(self.stream_ends(stream).1),
                    source,
                })?;
                if let Some(medium) = medium {
                    next.medium = medium;
                }
                *state = next;
            }
        }

        info!(
            iterations = budget.max_iterations,
            closure_pct = closure,
            "recycle loop hit the iteration cap"
        );
        Ok(Convergence {
            closure_error_pct: closure,
            converged: false,
            iterations: budget.max_iterations,
            stop: Some(StopReason::IterationCap),
        })
    }

    /// Evaluate every unit once in compiled order. Inlets fed by a back edge
    /// read `fed`; all others read the source's latest outlet state.
    fn forward_pass(&mut self, fed: &BTreeMap<StreamId, PortState>) -> SolverResult<()> {
        for position in 0..self.plant.order.order.len() {
            let uid = self.plant.order.order[position];
            let compiled = &self.plant.units[uid.ix()];

            let mut inputs = PortMap::new();
            for &(spec, port) in &compiled.ports {
                if spec.direction != PortKind::Inlet {
                    continue;
                }
                if let Some(stream) = self.plant.graph.port_stream(port) {
                    let mut state = match fed.get(&stream) {
                        Some(state) => *state,
                        None => match self.plant.graph.stream(stream) {
                            Some(s) => self.ports[s.from.ix()],
                            None => self.ports[port.ix()],
                        },
                    };
                    state.medium = spec.medium;
                    self.ports[port.ix()] = state;
                }
                inputs.insert(spec.name, self.ports[port.ix()]);
            }

            let outputs = self.units[uid.ix()]
                .evaluate(&inputs, &self.ambient)
                .map_err(|source| SolverError::Unit {
                    unit: compiled.id.clone(),
                    source,
                })?;

            for &(spec, port) in &compiled.ports {
                if spec.direction != PortKind::Outlet {
                    continue;
                }
                if let Some(state) = outputs.ports.get(spec.name) {
                    let mut state = *state;
                    state.medium = spec.medium;
                    self.ports[port.ix()] = state;
                }
            }
            self.outputs[uid.ix()] = outputs;
        }
        Ok(())
    }

    fn stream_ends(&self, stream: StreamId) -> (PortId, PortId) {
        let s = &self.plant.graph.streams()[stream.ix()];
        (s.from, s.to)
    }

    /// Snapshot of every unit, keyed by unit id.
    pub fn unit_states(&self) -> BTreeMap<String, UnitState> {
        self.plant
            .units
            .iter()
            .map(|compiled| {
                let outputs = &self.outputs[compiled.graph_id.ix()];
                let ports: BTreeMap<String, PortState> = compiled
                    .ports
                    .iter()
                    .map(|&(spec, port)| (spec.name.to_string(), self.ports[port.ix()]))
                    .collect();
                let idle = ports.values().all(|p| p.m_dot_kg_s.abs() <= IDLE_FLOW_KG_S)
                    && outputs.duty.power_mw == 0.0
                    && outputs.duty.fuel_mw == 0.0
                    && outputs.duty.heat_out_mw == 0.0;
                let status = if !outputs.warnings.is_empty() {
                    UnitStatus::Warning
                } else if idle {
                    UnitStatus::Idle
                } else {
                    UnitStatus::Ok
                };
                let state = UnitState {
                    type_key: compiled.descriptor.type_key.to_string(),
                    params: self.params[compiled.graph_id.ix()].clone(),
                    ports,
                    duty: outputs.duty,
                    metrics: outputs
                        .metrics
                        .iter()
                        .map(|(k, v)| (k.to_string(), *v))
                        .collect(),
                    status,
                    warnings: outputs.warnings.clone(),
                };
                (compiled.id.clone(), state)
            })
            .collect()
    }
}

/// Largest relative change of mass flow or energy flow across back edges [%].
pub fn closure_error_pct(fed: &BTreeMap<StreamId, PortState>, raw: &BTreeMap<StreamId, PortState>) -> f64 {
    let mut worst: f64 = 0.0;
    for (stream, old) in fed {
        let Some(new) = raw.get(stream) else {
            continue;
        };
        let mass = relative_change(old.m_dot_kg_s, new.m_dot_kg_s, MASS_FLOOR_KG_S);
        let energy = relative_change(old.energy_flow_kw(), new.energy_flow_kw(), ENERGY_FLOOR_KW);
        worst = worst.max(mass).max(energy);
    }
    100.0 * worst
}

/// Move `fed` toward `raw` by `omega` in (P, h, m); temperature follows.
pub fn blend(fed: &PortState, raw: &PortState, omega: f64) -> FluidResult<PortState> {
    if omega >= 1.0 {
        return Ok(*raw);
    }
    let mix = |old: f64, new: f64| old + omega * (new - old);
    PortState::from_ph(
        mix(fed.p_kpa, raw.p_kpa),
        mix(fed.h_kj_kg, raw.h_kj_kg),
        mix(fed.m_dot_kg_s, raw.m_dot_kg_s),
        raw.medium,
    )
}
