//! Document-level validation.
//!
//! Checks what can be checked without the unit registry: identifier shape,
//! uniqueness and endpoint syntax. Type keys, ports and dangling references
//! are resolved by the solver's compiler.

use std::collections::HashSet;

use crate::schema::{PlantGraph, RunCase};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid ID '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("Malformed endpoint '{endpoint}' (expected unit.port)")]
    MalformedEndpoint { endpoint: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Reason a unit id is rejected, if any.
pub fn unit_id_problem(id: &str) -> Option<&'static str> {
    if id.is_empty() {
        Some("must not be empty")
    } else if id.contains('.') {
        Some("must not contain '.'")
    } else {
        None
    }
}

pub fn validate_plant(plant: &PlantGraph) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for unit in &plant.units {
        if let Some(reason) = unit_id_problem(&unit.id) {
            return Err(ValidationError::InvalidId {
                id: unit.id.clone(),
                reason,
            });
        }
        if !ids.insert(unit.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: unit.id.clone(),
                context: "units".to_string(),
            });
        }
        if unit.type_key.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.type", unit.id),
                value: unit.type_key.clone(),
                reason: "type key must not be empty".to_string(),
            });
        }
    }

    for stream in &plant.streams {
        stream.source()?;
        stream.dest()?;
    }

    let Some(ambient) = &plant.ambient else {
        return Ok(());
    };
    if !ambient.p_kpa.is_finite() || ambient.p_kpa <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "ambient.P_kPa_abs".to_string(),
            value: ambient.p_kpa.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if !ambient.t_c.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: "ambient.T_C".to_string(),
            value: ambient.t_c.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

pub fn validate_run_case(run_case: &RunCase) -> Result<(), ValidationError> {
    for (name, limit) in &run_case.constraints {
        if !limit.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("constraints.{}", name),
                value: limit.to_string(),
                reason: "limit must be finite".to_string(),
            });
        }
    }
    if let Some(pricing) = &run_case.pricing {
        let prices = [
            ("power_USD_MWh", pricing.power_usd_mwh),
            ("heat_USD_MWh", pricing.heat_usd_mwh),
            ("fuel_USD_MMBtu", pricing.fuel_usd_mmbtu),
        ];
        for (field, value) in prices {
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("pricing.{}", field),
                    value: value.to_string(),
                    reason: "price must be finite".to_string(),
                });
            }
        }
    }
    Ok(())
}
