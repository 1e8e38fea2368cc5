//! Error types for unit construction and evaluation.

use std::fmt;

use hb_fluids::FluidError;
use thiserror::Error;

/// One violated parameter field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the unit contract and registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Every violated field, not just the first.
    #[error("Invalid parameters for {type_key}: {}", join_fields(.fields))]
    InvalidParameter {
        type_key: String,
        fields: Vec<FieldError>,
    },

    #[error("Unknown unit type '{type_key}'")]
    UnknownUnitType { type_key: String },

    #[error("Unit type '{type_key}' is already registered")]
    DuplicateTypeKey { type_key: String },

    #[error("{type_key} has no input for port '{port}'")]
    MissingPort {
        type_key: &'static str,
        port: &'static str,
    },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error(transparent)]
    Fluid(#[from] FluidError),
}

pub type UnitResult<T> = Result<T, UnitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_lists_every_field() {
        let err = UnitError::InvalidParameter {
            type_key: "SteamTurbine".into(),
            fields: vec![
                FieldError::new("eta_isentropic", "must be <= 1"),
                FieldError::new("outlet_P_kPa_abs", "must be a number"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("eta_isentropic: must be <= 1"));
        assert!(msg.contains("outlet_P_kPa_abs: must be a number"));
    }

    #[test]
    fn fluid_errors_convert() {
        let err: UnitError = FluidError::NonPhysical { what: "pressure" }.into();
        assert!(matches!(err, UnitError::Fluid(_)));
    }
}
