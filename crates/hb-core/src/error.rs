use thiserror::Error;

pub type HbResult<T> = Result<T, HbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HbError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

/// Raised when a medium tag does not name one of the supported media.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported medium '{0}'")]
pub struct UnsupportedMedium(pub String);
