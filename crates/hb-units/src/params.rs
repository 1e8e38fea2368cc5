//! Declarative parameter schemas.
//!
//! Each unit type publishes a static `ParamSpec` table. `check_params`
//! walks the whole table and reports every violated field at once; keys
//! not named in the table are ignored.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{FieldError, UnitError, UnitResult};

/// Unit parameters as supplied after the defaults merge.
pub type ParamMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Number,
    Bool,
    Text,
}

/// One named field of a parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Numeric default; `None` means the field is required or optional.
    pub default: Option<f64>,
    pub required: bool,
    /// Inclusive numeric range.
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: &'static str,
}

impl ParamSpec {
    /// Number with a default and inclusive range.
    pub const fn number(
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Number,
            default: Some(default),
            required: false,
            min: Some(min),
            max: Some(max),
            description,
        }
    }

    /// Number that may be omitted, bounded below.
    pub const fn optional(name: &'static str, min: f64, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Number,
            default: None,
            required: false,
            min: Some(min),
            max: None,
            description,
        }
    }

    /// Free-form text, accepted when present.
    pub const fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            default: None,
            required: false,
            min: None,
            max: None,
            description,
        }
    }
}

/// Parameter values resolved against a schema, defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValues {
    numbers: BTreeMap<&'static str, f64>,
    texts: BTreeMap<&'static str, String>,
}

impl ParamValues {
    /// Value of a numeric field that has a default or is required.
    pub fn number(&self, name: &'static str) -> UnitResult<f64> {
        self.numbers
            .get(name)
            .copied()
            .ok_or(UnitError::NonPhysical {
                what: "numeric parameter read before it was resolved",
            })
    }

    pub fn opt_number(&self, name: &str) -> Option<f64> {
        self.numbers.get(name).copied()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }
}

fn check_number(spec: &ParamSpec, value: &Value, errors: &mut Vec<FieldError>) -> Option<f64> {
    let Some(x) = value.as_f64() else {
        errors.push(FieldError::new(spec.name, "must be a number"));
        return None;
    };
    if !x.is_finite() {
        errors.push(FieldError::new(spec.name, "must be finite"));
        return None;
    }
    let mut ok = true;
    if let Some(min) = spec.min
        && x < min
    {
        errors.push(FieldError::new(spec.name, format!("{} is below minimum {}", x, min)));
        ok = false;
    }
    if let Some(max) = spec.max
        && x > max
    {
        errors.push(FieldError::new(spec.name, format!("{} is above maximum {}", x, max)));
        ok = false;
    }
    ok.then_some(x)
}

/// Resolve `params` against `specs`, collecting every violation.
pub fn check_params(specs: &[ParamSpec], params: &ParamMap) -> (ParamValues, Vec<FieldError>) {
    let mut values = ParamValues::default();
    let mut errors = Vec::new();

    for spec in specs {
        let supplied = params.get(spec.name).filter(|v| !v.is_null());
        match (spec.kind, supplied) {
            (ParamKind::Number, Some(v)) => {
                if let Some(x) = check_number(spec, v, &mut errors) {
                    values.numbers.insert(spec.name, x);
                }
            }
            (ParamKind::Number, None) => match spec.default {
                Some(d) => {
                    values.numbers.insert(spec.name, d);
                }
                None if spec.required => errors.push(FieldError::new(spec.name, "is required")),
                None => {}
            },
            (ParamKind::Bool, Some(v)) => match v.as_bool() {
                Some(b) => {
                    values.numbers.insert(spec.name, if b { 1.0 } else { 0.0 });
                }
                None => errors.push(FieldError::new(spec.name, "must be a boolean")),
            },
            (ParamKind::Text, Some(v)) => match v.as_str() {
                Some(s) => {
                    values.texts.insert(spec.name, s.to_string());
                }
                None => errors.push(FieldError::new(spec.name, "must be a string")),
            },
            (_, None) if spec.required => errors.push(FieldError::new(spec.name, "is required")),
            (_, None) => {}
        }
    }

    (values, errors)
}

/// Turn collected field errors into `InvalidParameter`.
pub fn finish(type_key: &str, values: ParamValues, errors: Vec<FieldError>) -> UnitResult<ParamValues> {
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(UnitError::InvalidParameter {
            type_key: type_key.to_string(),
            fields: errors,
        })
    }
}

/// Validate and resolve in one step.
pub fn validate_params(type_key: &str, specs: &[ParamSpec], params: &ParamMap) -> UnitResult<ParamValues> {
    let (values, errors) = check_params(specs, params);
    finish(type_key, values, errors)
}
