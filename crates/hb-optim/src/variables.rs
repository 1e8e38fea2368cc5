//! Decision variables: `unit.param` paths with box bounds.

use hb_project::{Defaults, PlantGraph, RunCase};
use hb_units::{ParamKind, UnitRegistry};
use nalgebra::DVector;
use serde_json::Value;

use crate::error::{OptimError, OptimResult};

/// One bounded unit parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVariable {
    pub path: String,
    pub unit: String,
    pub param: String,
    pub lo: f64,
    pub hi: f64,
}

impl DecisionVariable {
    /// Map a unit-box coordinate onto the bounds.
    pub fn denormalize(&self, u: f64) -> f64 {
        self.lo + u.clamp(0.0, 1.0) * (self.hi - self.lo)
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.hi - self.lo;
        if width <= 0.0 {
            return 0.5;
        }
        ((value - self.lo) / width).clamp(0.0, 1.0)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> OptimError {
    OptimError::InvalidDecisionVariable {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Parse and check the run case's bounds against the plant.
///
/// Each path must name a numeric parameter in the unit type's schema, and
/// the bounds must lie inside that parameter's range. Port names are
/// rejected: setpoints are driven through the parameters that produce them.
pub fn decision_variables(
    plant: &PlantGraph,
    run_case: &RunCase,
    registry: &UnitRegistry,
) -> OptimResult<Vec<DecisionVariable>> {
    if run_case.bounds.is_empty() {
        return Err(OptimError::NoDecisionVariables);
    }
    run_case
        .bounds
        .iter()
        .map(|(path, &[lo, hi])| {
            let (unit, param) = path
                .split_once('.')
                .filter(|(u, p)| !u.is_empty() && !p.is_empty())
                .ok_or_else(|| invalid(path, "expected unit.param"))?;
            if !lo.is_finite() || !hi.is_finite() {
                return Err(invalid(path, "bounds must be finite"));
            }
            if lo > hi {
                return Err(invalid(path, format!("lower bound {lo} exceeds upper bound {hi}")));
            }
            let definition = plant
                .unit(unit)
                .ok_or_else(|| invalid(path, format!("no unit '{unit}' in the plant")))?;
            let descriptor = registry
                .get(&definition.type_key)
                .map_err(|e| invalid(path, e.to_string()))?;

            if descriptor.ports.iter().any(|p| p.name == param) {
                return Err(invalid(
                    path,
                    format!("'{param}' is a port of {}; bound one of its parameters instead", descriptor.type_key),
                ));
            }
            let spec = descriptor
                .params
                .iter()
                .find(|s| s.name == param)
                .ok_or_else(|| invalid(path, format!("{} has no parameter '{param}'", descriptor.type_key)))?;
            if spec.kind != ParamKind::Number {
                return Err(invalid(path, format!("parameter '{param}' is not numeric")));
            }
            if let Some(min) = spec.min
                && lo < min
            {
                return Err(invalid(path, format!("lower bound {lo} is below the parameter minimum {min}")));
            }
            if let Some(max) = spec.max
                && hi > max
            {
                return Err(invalid(path, format!("upper bound {hi} is above the parameter maximum {max}")));
            }

            Ok(DecisionVariable {
                path: path.clone(),
                unit: unit.to_string(),
                param: param.to_string(),
                lo,
                hi,
            })
        })
        .collect()
}

/// Starting point in the unit box: the effective parameter value when it
/// lies inside the bounds, the box midpoint otherwise.
pub fn start_point(plant: &PlantGraph, defaults: &Defaults, vars: &[DecisionVariable]) -> DVector<f64> {
    DVector::from_iterator(
        vars.len(),
        vars.iter().map(|var| {
            plant
                .unit(&var.unit)
                .and_then(|unit| defaults.resolve(&unit.type_key, &unit.params).get(&var.param).and_then(Value::as_f64))
                .filter(|v| var.contains(*v))
                .map_or(0.5, |v| var.normalize(v))
        }),
    )
}

/// Copy of `plant` with the decision variables set from unit-box `x`.
pub fn apply(plant: &PlantGraph, vars: &[DecisionVariable], x: &DVector<f64>) -> PlantGraph {
    let mut plant = plant.clone();
    for (var, &u) in vars.iter().zip(x.iter()) {
        if let Some(unit) = plant.unit_mut(&var.unit) {
            unit.params.insert(var.param.clone(), Value::from(var.denormalize(u)));
        }
    }
    plant
}
