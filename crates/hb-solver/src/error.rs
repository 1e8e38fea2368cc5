//! Error types for compilation and solving.

use std::fmt;

use hb_fluids::FluidError;
use hb_graph::GraphError;
use hb_results::ResultsError;
use hb_units::UnitError;
use thiserror::Error;

/// Which end of a stream a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Source,
    Destination,
}

impl fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamEnd::Source => write!(f, "source"),
            StreamEnd::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that stop a plant from compiling. Nothing is evaluated after one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Duplicate unit id '{id}'")]
    DuplicateUnitId { id: String },

    #[error("Invalid unit id '{id}': {reason}")]
    InvalidUnitId { id: String, reason: &'static str },

    #[error("Unit '{unit}' has unknown type '{type_key}'")]
    UnknownUnitType { unit: String, type_key: String },

    #[error("Stream {stream} references missing {end} unit '{unit}'")]
    DanglingStream {
        stream: String,
        unit: String,
        end: StreamEnd,
    },

    #[error("Malformed endpoint '{endpoint}' (expected unit.port)")]
    MalformedEndpoint { endpoint: String },

    #[error("Unit '{unit}' ({type_key}) has no port '{port}'")]
    UnknownPort {
        unit: String,
        type_key: String,
        port: String,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Errors that can occur while solving a compiled plant.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Unit registry unavailable: {0}")]
    Registry(UnitError),

    #[error("Unit '{unit}': {source}")]
    Unit {
        unit: String,
        #[source]
        source: UnitError,
    },

    #[error("Port {port}: {source}")]
    Fluid {
        port: String,
        #[source]
        source: FluidError,
    },

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),
}

pub type SolverResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_stream_names_the_unit() {
        let err = CompileError::DanglingStream {
            stream: "GT9.exhaust_out -> HRSG1.gas_in".into(),
            unit: "GT9".into(),
            end: StreamEnd::Source,
        };
        assert_eq!(
            err.to_string(),
            "Stream GT9.exhaust_out -> HRSG1.gas_in references missing source unit 'GT9'"
        );
    }

    #[test]
    fn unit_errors_carry_the_unit_id() {
        let err = SolverError::Unit {
            unit: "ST1".into(),
            source: UnitError::NonPhysical { what: "power" },
        };
        assert!(err.to_string().starts_with("Unit 'ST1'"));
    }
}
