//! Graph-specific error types.

use hb_core::{Medium, PortId, UnitId};

use crate::graph::PortKind;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction errors.
///
/// Port names are carried qualified (`unit.port`) so callers can report
/// them without the graph at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two units share a name.
    DuplicateUnit { name: String },

    /// A unit declares the same port name twice.
    DuplicatePort { port: String },

    /// A unit ID that is not in the arena.
    UnknownUnit { unit: UnitId },

    /// A port ID that is not in the arena.
    UnknownPort { port: PortId },

    /// A stream starts at an inlet or ends at an outlet.
    PortDirection { port: String, expected: PortKind },

    /// An inlet already has a feeding stream.
    PortAlreadyFed { port: String },

    /// An outlet already feeds a stream.
    OutletAlreadyConnected { port: String },

    /// The two ends of a stream carry incompatible media.
    MediumMismatch {
        from: String,
        to: String,
        from_medium: Medium,
        to_medium: Medium,
    },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateUnit { name } => write!(f, "Duplicate unit '{}'", name),
            GraphError::DuplicatePort { port } => write!(f, "Duplicate port '{}'", port),
            GraphError::UnknownUnit { unit } => write!(f, "Unit {} not in graph", unit),
            GraphError::UnknownPort { port } => write!(f, "Port {} not in graph", port),
            GraphError::PortDirection { port, expected } => {
                write!(f, "Port '{}' is not an {}", port, expected)
            }
            GraphError::PortAlreadyFed { port } => {
                write!(f, "Inlet '{}' is already fed by another stream", port)
            }
            GraphError::OutletAlreadyConnected { port } => {
                write!(f, "Outlet '{}' already feeds another stream", port)
            }
            GraphError::MediumMismatch {
                from,
                to,
                from_medium,
                to_medium,
            } => {
                write!(
                    f,
                    "Stream {} -> {} connects {} to {}",
                    from, to, from_medium, to_medium
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}
