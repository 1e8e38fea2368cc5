//! hb-core: stable foundation for the heat-balance workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact arena IDs for units, ports and streams)
//! - medium / ambient (value types every unit reads)
//! - error (shared error types)

pub mod ambient;
pub mod error;
pub mod ids;
pub mod medium;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use ambient::Ambient;
pub use error::{HbError, HbResult, UnsupportedMedium};
pub use ids::*;
pub use medium::{Medium, MediumFamily};
pub use numeric::*;
pub use units::*;
