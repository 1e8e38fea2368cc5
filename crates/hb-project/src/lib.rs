//! hb-project: plant and run-case documents, and the defaults table.

pub mod defaults;
pub mod schema;
pub mod validate;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use defaults::{Auxiliary, Defaults};
pub use schema::*;
pub use validate::{ValidationError, unit_id_problem, validate_plant, validate_run_case};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported document format: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => Err(ProjectError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(match format_of(path)? {
        Format::Json => serde_json::from_str(&content)?,
        Format::Yaml => serde_yaml::from_str(&content)?,
    })
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> ProjectResult<()> {
    let content = match format_of(path)? {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Yaml => serde_yaml::to_string(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> ProjectResult<PlantGraph> {
    let content = std::fs::read_to_string(path)?;
    let plant: PlantGraph = serde_yaml::from_str(&content)?;
    validate_plant(&plant)?;
    Ok(plant)
}

pub fn save_yaml(path: &Path, plant: &PlantGraph) -> ProjectResult<()> {
    validate_plant(plant)?;
    let content = serde_yaml::to_string(plant)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<PlantGraph> {
    let content = std::fs::read_to_string(path)?;
    let plant: PlantGraph = serde_json::from_str(&content)?;
    validate_plant(&plant)?;
    Ok(plant)
}

pub fn save_json(path: &Path, plant: &PlantGraph) -> ProjectResult<()> {
    validate_plant(plant)?;
    let content = serde_json::to_string_pretty(plant)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a plant document, JSON or YAML by extension.
pub fn load_plant(path: &Path) -> ProjectResult<PlantGraph> {
    match format_of(path)? {
        Format::Json => load_json(path),
        Format::Yaml => load_yaml(path),
    }
}

/// Load a run case, JSON or YAML by extension.
pub fn load_run_case(path: &Path) -> ProjectResult<RunCase> {
    let run_case: RunCase = read_document(path)?;
    validate_run_case(&run_case)?;
    Ok(run_case)
}

pub fn save_run_case(path: &Path, run_case: &RunCase) -> ProjectResult<()> {
    validate_run_case(run_case)?;
    write_document(path, run_case)
}
