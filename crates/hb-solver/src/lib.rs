//! Steady-state heat-balance solver for combined-cycle plants.
//!
//! A plant document is compiled against the unit registry into an arena
//! graph with a fixed evaluation order. Units are evaluated in that order;
//! streams that close a loop (back edges) are iterated as a damped
//! fixed point until the mass and energy closure error falls under the
//! tolerance. The final states are summarized into plant figures and
//! checked against the run's constraints.

pub mod compile;
pub mod config;
pub mod constraints;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod solve;
pub mod summary;

pub use compile::{CompiledPlant, CompiledUnit, compile};
pub use config::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE_PCT, SolveBudget, SolverConfig};
pub use constraints::{Bound, ConstraintCheck, ConstraintKey, check_constraints};
pub use context::SolveContext;
pub use error::{CompileError, SolverError, SolverResult, StreamEnd};
pub use pipeline::{Convergence, Pipeline, PipelineStage, StopReason};
pub use solve::{Evaluation, SOLVER_VERSION, evaluate, finalize, solve};
pub use summary::{UnitView, district_heating, summarize};
