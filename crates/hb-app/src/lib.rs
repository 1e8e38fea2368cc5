//! Shared application service layer for heat-balance runs.
//!
//! This crate gives the CLI (and any transport layer) one interface over
//! document loading, validation, simulation and optimization, and maps
//! core errors to transport status codes.

pub mod catalog;
pub mod error;
pub mod project_service;
pub mod run_service;

pub use catalog::{UnitInfo, unit_catalog};
pub use error::{AppError, AppResult};
pub use project_service::{PlantSummary, load_plant, load_run_case, validate};
pub use run_service::{optimize, optimize_with, run, simulate, simulate_with};
