//! Plant optimizer.
//!
//! Decision variables are unit parameters (`unit.param`) with box bounds.
//! Each trial assigns a point into a copy of the plant and runs the full
//! solution pipeline; the merit is the objective (in minimization form)
//! plus a quadratic penalty on constraint breaches. The search is a
//! projected BFGS from one start, widened to parallel quasi-random starts
//! when that start is infeasible or does not improve.

pub mod bfgs;
pub mod config;
pub mod error;
pub mod halton;
pub mod objective;
pub mod optimize;
pub mod variables;

pub use bfgs::{LocalOutcome, minimize_box};
pub use config::OptimizerConfig;
pub use error::{OptimError, OptimResult};
pub use objective::{merit, objective_value, penalty};
pub use optimize::{OptimizerStatus, STRICT_FEASIBILITY, optimize};
pub use variables::{DecisionVariable, decision_variables};
