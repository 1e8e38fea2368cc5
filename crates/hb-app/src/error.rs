//! Error types for the hb-app service layer.

use std::path::PathBuf;

use hb_optim::OptimError;
use hb_project::ProjectError;
use hb_results::ResultsError;
use hb_solver::{CompileError, SolverError};
use hb_units::UnitError;

/// Application error type that wraps errors from the core crates and
/// carries enough text to locate the offending unit, stream or field.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Document not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown unit type: {0}")]
    UnknownUnitType(String),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Property error: {0}")]
    Property(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Missing pricing: {0}")]
    MissingPricing(String),

    #[error("Optimization error: {0}")]
    Optimization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Results error: {0}")]
    Results(String),
}

/// Result type for hb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP-style status for a transport layer: 404 for missing resources
    /// and unknown unit types, 400 for malformed input, 422 for input that
    /// parses but cannot be solved as given.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound { .. } | AppError::UnknownUnitType(_) => 404,
            AppError::Project(_) | AppError::Validation(_) | AppError::Compile(_) | AppError::InvalidInput(_) => 400,
            AppError::Parameter(_)
            | AppError::Property(_)
            | AppError::Solver(_)
            | AppError::Cancelled
            | AppError::MissingPricing(_)
            | AppError::Optimization(_)
            | AppError::Results(_) => 422,
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::UnknownUnitType { .. } => AppError::UnknownUnitType(err.to_string()),
            other => AppError::Compile(other.to_string()),
        }
    }
}

impl From<SolverError> for AppError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Compile(e) => e.into(),
            SolverError::Cancelled => AppError::Cancelled,
            SolverError::Unit {
                source: UnitError::InvalidParameter { .. },
                ..
            } => AppError::Parameter(err.to_string()),
            SolverError::Unit {
                source: UnitError::Fluid(_),
                ..
            }
            | SolverError::Fluid { .. } => AppError::Property(err.to_string()),
            SolverError::Results(e) => e.into(),
            other => AppError::Solver(other.to_string()),
        }
    }
}

impl From<OptimError> for AppError {
    fn from(err: OptimError) -> Self {
        match err {
            OptimError::Solver(e) => e.into(),
            OptimError::Cancelled => AppError::Cancelled,
            OptimError::MissingPricing { .. } => AppError::MissingPricing(err.to_string()),
            OptimError::NoDecisionVariables | OptimError::InvalidDecisionVariable { .. } => {
                AppError::InvalidInput(err.to_string())
            }
            other => AppError::Optimization(other.to_string()),
        }
    }
}

impl From<ResultsError> for AppError {
    fn from(err: ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hb_solver::StreamEnd;

    #[test]
    fn unknown_unit_type_maps_to_404() {
        let err: AppError = SolverError::Compile(CompileError::UnknownUnitType {
            unit: "X1".into(),
            type_key: "Boiler".into(),
        })
        .into();
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("Boiler"));
    }

    #[test]
    fn dangling_stream_maps_to_400() {
        let err: AppError = CompileError::DanglingStream {
            stream: "A.out -> B.in".into(),
            unit: "B".into(),
            end: StreamEnd::Destination,
        }
        .into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn missing_pricing_maps_to_422() {
        let err: AppError = OptimError::MissingPricing {
            objective: "max_revenue",
        }
        .into();
        assert_eq!(err.status_code(), 422);
    }
}
