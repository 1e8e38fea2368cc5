//! Named plant constraints.
//!
//! A constraint name is `<scope>.<metric>` or `<scope>_<metric>`, where the
//! metric may carry a `min` or `max` token (`METAL_max_T_C`,
//! `DHN_supply_min_C`, `ST1.exhaust_quality_min`). Without a token the limit
//! is a lower bound. Scopes:
//!
//! - `METAL`: hottest steam port carrying flow.
//! - `DHN`: district heating network (storage first, then the heater).
//! - `PLANT`: a summary figure such as `NET_power_MW`.
//! - anything else: a unit id and one of its metrics.

use std::collections::BTreeMap;
use std::fmt;

use hb_core::Medium;
use hb_results::Summary;
use hb_units::UnitCategory;
use tracing::debug;

use crate::summary::UnitView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bound::Min => "minimum",
            Bound::Max => "maximum",
        })
    }
}

/// A parsed constraint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintKey<'a> {
    pub scope: &'a str,
    pub metric: String,
    pub bound: Bound,
}

impl<'a> ConstraintKey<'a> {
    pub fn parse(name: &'a str) -> Option<Self> {
        let (scope, rest) = name.split_once('.').or_else(|| name.split_once('_'))?;
        if scope.is_empty() || rest.is_empty() {
            return None;
        }
        let mut bound = Bound::Min;
        let mut tokens: Vec<&str> = rest.split('_').collect();
        if let Some(i) = tokens.iter().position(|t| *t == "min" || *t == "max") {
            if tokens[i] == "max" {
                bound = Bound::Max;
            }
            tokens.remove(i);
        }
        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            scope,
            metric: tokens.join("_"),
            bound,
        })
    }
}

/// One evaluated constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintCheck {
    pub name: String,
    pub bound: Bound,
    pub limit: f64,
    /// `None` when nothing in the plant matches the name.
    pub value: Option<f64>,
}

impl ConstraintCheck {
    /// Amount by which the limit is breached, zero when satisfied.
    pub fn residual(&self) -> f64 {
        match (self.value, self.bound) {
            (Some(v), Bound::Min) => (self.limit - v).max(0.0),
            (Some(v), Bound::Max) => (v - self.limit).max(0.0),
            (None, _) => 0.0,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.value.is_some() && self.residual() == 0.0
    }

    pub fn violation(&self) -> Option<String> {
        match self.value {
            None => Some(format!(
                "Constraint {} ({:.2}): no unit or metric matches this name",
                self.name, self.limit
            )),
            Some(v) if self.residual() > 0.0 => Some(format!(
                "Constraint {}: value {:.2} breaches {} {:.2}",
                self.name, v, self.bound, self.limit
            )),
            Some(_) => None,
        }
    }
}

/// Evaluate the run's constraints merged over the default table.
///
/// Default constraints that resolve to nothing in this plant are skipped;
/// unresolvable run constraints are reported.
pub fn check_constraints(
    user: &BTreeMap<String, f64>,
    defaults: &BTreeMap<String, f64>,
    summary: &Summary,
    units: &[UnitView<'_>],
) -> Vec<ConstraintCheck> {
    let mut merged: BTreeMap<&str, (f64, bool)> = defaults.iter().map(|(k, v)| (k.as_str(), (*v, false))).collect();
    for (k, v) in user {
        merged.insert(k.as_str(), (*v, true));
    }

    let mut checks = Vec::with_capacity(merged.len());
    for (name, (limit, from_run)) in merged {
        let key = ConstraintKey::parse(name);
        let value = key.as_ref().and_then(|k| resolve(k, summary, units));
        if value.is_none() && !from_run {
            debug!(constraint = name, "default constraint does not apply to this plant");
            continue;
        }
        checks.push(ConstraintCheck {
            name: name.to_string(),
            bound: key.map_or(Bound::Min, |k| k.bound),
            limit,
            value,
        });
    }
    checks
}

fn resolve(key: &ConstraintKey<'_>, summary: &Summary, units: &[UnitView<'_>]) -> Option<f64> {
    match key.scope {
        "METAL" => {
            if key.metric != "T_C" {
                return None;
            }
            units
                .iter()
                .flat_map(|u| u.state.ports.values())
                .filter(|p| p.medium == Medium::Steam && p.m_dot_kg_s > 0.0)
                .map(|p| p.t_c)
                .reduce(f64::max)
        }
        "DHN" => {
            let pick = |category: UnitCategory| {
                let values = units
                    .iter()
                    .filter(|u| u.category == category)
                    .filter_map(|u| u.state.metrics.get(&key.metric).copied());
                match key.bound {
                    Bound::Max => values.reduce(f64::max),
                    Bound::Min => values.reduce(f64::min),
                }
            };
            pick(UnitCategory::Storage).or_else(|| pick(UnitCategory::DistrictHeating))
        }
        "PLANT" => summary.field(&key.metric),
        id => units
            .iter()
            .find(|u| u.id == id)
            .and_then(|u| u.state.metrics.get(&key.metric).copied()),
    }
}
