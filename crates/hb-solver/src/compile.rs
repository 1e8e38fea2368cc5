//! Plant document to executable graph.
//!
//! Checks run in a fixed order so the first error reported is stable:
//! unit ids, type keys, then streams one by one in declaration order.
//! No unit is evaluated until compilation succeeds.

use std::collections::BTreeSet;

use hb_core::{PortId, UnitId};
use hb_graph::{Graph, GraphBuilder, EvaluationOrder, evaluation_order};
use hb_project::{Endpoint, PlantGraph, ValidationError, unit_id_problem};
use hb_units::{PortSpec, UnitDescriptor, UnitRegistry};
use tracing::{debug, warn};

use crate::error::{CompileError, StreamEnd};

/// One unit after compilation.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub id: String,
    pub graph_id: UnitId,
    pub descriptor: UnitDescriptor,
    /// Port specs paired with their graph port, in descriptor order.
    pub ports: Vec<(PortSpec, PortId)>,
}

/// A compiled plant: graph, evaluation plan and unit table.
///
/// `units` is indexed like the graph's unit arena, which follows the
/// document's declaration order.
#[derive(Debug, Clone)]
pub struct CompiledPlant {
    pub graph: Graph,
    pub order: EvaluationOrder,
    pub units: Vec<CompiledUnit>,
}

impl CompiledPlant {
    pub fn unit(&self, id: UnitId) -> &CompiledUnit {
        &self.units[id.ix()]
    }

    pub fn find(&self, id: &str) -> Option<&CompiledUnit> {
        self.graph.find_unit(id).map(|u| self.unit(u))
    }
}

/// Compile `plant` against `registry`.
pub fn compile(plant: &PlantGraph, registry: &UnitRegistry) -> Result<CompiledPlant, CompileError> {
    let mut seen = BTreeSet::new();
    for unit in &plant.units {
        if let Some(reason) = unit_id_problem(&unit.id) {
            return Err(CompileError::InvalidUnitId {
                id: unit.id.clone(),
                reason,
            });
        }
        if !seen.insert(unit.id.as_str()) {
            return Err(CompileError::DuplicateUnitId { id: unit.id.clone() });
        }
    }

    let mut descriptors = Vec::with_capacity(plant.units.len());
    for unit in &plant.units {
        let descriptor = registry
            .get(&unit.type_key)
            .map_err(|_| CompileError::UnknownUnitType {
                unit: unit.id.clone(),
                type_key: unit.type_key.clone(),
            })?;
        descriptors.push(*descriptor);
    }

    let mut builder = GraphBuilder::new();
    let mut units = Vec::with_capacity(plant.units.len());
    for (unit, descriptor) in plant.units.iter().zip(descriptors) {
        let graph_id = builder.add_unit(unit.id.clone(), descriptor.holds_inventory)?;
        let mut ports = Vec::with_capacity(descriptor.ports.len());
        for spec in descriptor.ports {
            let port = builder.add_port(graph_id, spec.name, spec.direction, spec.medium)?;
            ports.push((*spec, port));
        }
        units.push(CompiledUnit {
            id: unit.id.clone(),
            graph_id,
            descriptor,
            ports,
        });
    }

    for stream in &plant.streams {
        let label = format!("{} -> {}", stream.from, stream.to);
        let source = stream.source().map_err(malformed)?;
        let dest = stream.dest().map_err(malformed)?;
        let from = resolve_port(&builder, &units, &label, source, StreamEnd::Source)?;
        let to = resolve_port(&builder, &units, &label, dest, StreamEnd::Destination)?;
        builder.connect(from, to)?;
    }

    let graph = builder.build();
    let order = evaluation_order(&graph);
    debug!(
        units = units.len(),
        streams = graph.streams().len(),
        back_edges = order.back_edges.len(),
        "plant compiled"
    );

    for cycle in &order.cycles {
        if !cycle.iter().any(|u| units[u.ix()].descriptor.holds_inventory) {
            let members: Vec<&str> = cycle.iter().map(|u| units[u.ix()].id.as_str()).collect();
            warn!(units = ?members, "recycle loop has no inventory-holding unit");
        }
    }

    Ok(CompiledPlant { graph, order, units })
}

fn malformed(err: ValidationError) -> CompileError {
    match err {
        ValidationError::MalformedEndpoint { endpoint } => CompileError::MalformedEndpoint { endpoint },
        other => CompileError::MalformedEndpoint {
            endpoint: other.to_string(),
        },
    }
}

fn resolve_port(
    builder: &GraphBuilder,
    units: &[CompiledUnit],
    stream: &str,
    endpoint: Endpoint<'_>,
    end: StreamEnd,
) -> Result<PortId, CompileError> {
    let Some(unit) = units.iter().find(|u| u.id == endpoint.unit) else {
        return Err(CompileError::DanglingStream {
            stream: stream.to_string(),
            unit: endpoint.unit.to_string(),
            end,
        });
    };
    builder
        .find_port(unit.graph_id, endpoint.port)
        .ok_or_else(|| CompileError::UnknownPort {
            unit: unit.id.clone(),
            type_key: unit.descriptor.type_key.to_string(),
            port: endpoint.port.to_string(),
        })
}
