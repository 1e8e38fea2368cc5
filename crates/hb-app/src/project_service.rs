//! Document loading and validation.

use std::path::Path;

use hb_project::{PlantGraph, RunCase, validate_plant, validate_run_case};
use hb_solver::compile;
use hb_units::UnitRegistry;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// What a plant compiles to.
#[derive(Debug, Clone, Serialize)]
pub struct PlantSummary {
    pub units: usize,
    pub streams: usize,
    /// Unit ids in evaluation order.
    pub order: Vec<String>,
    /// Streams iterated as recycles, as `from -> to`.
    pub recycle_streams: Vec<String>,
}

fn check_exists(path: &Path) -> AppResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load a plant document (JSON or YAML by extension).
pub fn load_plant(path: &Path) -> AppResult<PlantGraph> {
    check_exists(path)?;
    Ok(hb_project::load_plant(path)?)
}

pub fn load_run_case(path: &Path) -> AppResult<RunCase> {
    check_exists(path)?;
    Ok(hb_project::load_run_case(path)?)
}

/// Structural checks, then a full compile against `registry`.
pub fn validate(plant: &PlantGraph, run_case: Option<&RunCase>, registry: &UnitRegistry) -> AppResult<PlantSummary> {
    validate_plant(plant).map_err(|e| AppError::Validation(e.to_string()))?;
    if let Some(rc) = run_case {
        validate_run_case(rc).map_err(|e| AppError::Validation(e.to_string()))?;
    }
    let compiled = compile(plant, registry)?;
    let graph = &compiled.graph;
    Ok(PlantSummary {
        units: compiled.units.len(),
        streams: graph.streams().len(),
        order: compiled
            .order
            .order
            .iter()
            .map(|u| compiled.unit(*u).id.clone())
            .collect(),
        recycle_streams: compiled
            .order
            .back_edges
            .iter()
            .filter_map(|s| graph.stream(*s))
            .map(|s| format!("{} -> {}", graph.qualified_name(s.from), graph.qualified_name(s.to)))
            .collect(),
    })
}
