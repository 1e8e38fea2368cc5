//! hb-results: solve result records and their provenance.

pub mod hash;
pub mod types;

use std::path::Path;

pub use hash::{plant_hash, timestamp_utc};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write a result as pretty JSON.
pub fn write_result(path: &Path, result: &PlantResult) -> ResultsResult<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_result(path: &Path) -> ResultsResult<PlantResult> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
