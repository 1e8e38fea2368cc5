//! Optimizer error types.

use hb_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimError {
    #[error("Objective '{objective}' requires pricing data in the run case")]
    MissingPricing { objective: &'static str },

    #[error("Optimize mode needs at least one decision variable in `bounds`")]
    NoDecisionVariables,

    #[error("Invalid decision variable '{path}': {reason}")]
    InvalidDecisionVariable { path: String, reason: String },

    #[error("Optimization did not converge: {reason}")]
    OptimizationDidNotConverge { reason: String },

    #[error("Optimization deadline reached before any trial completed")]
    DeadlineReached,

    #[error("Optimization cancelled")]
    Cancelled,

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Solver error: {0}")]
    Solver(SolverError),
}

impl From<SolverError> for OptimError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Cancelled => OptimError::Cancelled,
            other => OptimError::Solver(other),
        }
    }
}

pub type OptimResult<T> = Result<T, OptimError>;
