//! Property evaluation errors.

use hb_core::{Medium, UnsupportedMedium};
use thiserror::Error;

/// Result type for property operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised by the property evaluator.
///
/// Every state-related variant carries the offending (T, P, medium) triple
/// so callers can locate the port that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    #[error(transparent)]
    UnsupportedMedium(#[from] UnsupportedMedium),

    #[error("Property evaluation out of range for {medium} at T={t_c:.2} °C, P={p_kpa:.3} kPa")]
    OutOfRange { t_c: f64, p_kpa: f64, medium: Medium },

    #[error("No {medium} state with {what} = {value:.4} at P={p_kpa:.3} kPa")]
    FlashOutOfRange {
        what: &'static str,
        value: f64,
        p_kpa: f64,
        medium: Medium,
    },

    #[error(
        "Property iteration for {what} did not converge for {medium} at T={t_c:.2} °C, P={p_kpa:.3} kPa"
    )]
    PropertyConvergence {
        what: &'static str,
        t_c: f64,
        p_kpa: f64,
        medium: Medium,
    },

    /// Non-physical values (negative pressure, NaN inputs, negative flow).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },
}
