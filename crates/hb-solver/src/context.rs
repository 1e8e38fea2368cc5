//! Shared, read-only inputs of a solve.

use hb_project::Defaults;
use hb_units::UnitRegistry;

use crate::config::{SolveBudget, SolverConfig};
use crate::error::{SolverError, SolverResult};

/// Registry and defaults plus the settings for one solve.
///
/// The registry and defaults are borrowed, so many solves (and optimizer
/// workers) can share the process-wide tables.
#[derive(Debug, Clone)]
pub struct SolveContext<'a> {
    pub registry: &'a UnitRegistry,
    pub defaults: &'a Defaults,
    pub config: SolverConfig,
    pub budget: SolveBudget,
}

impl<'a> SolveContext<'a> {
    pub fn new(registry: &'a UnitRegistry, defaults: &'a Defaults) -> Self {
        Self {
            registry,
            defaults,
            config: SolverConfig::default(),
            budget: SolveBudget::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl SolveContext<'static> {
    /// Context over the process-wide registry and defaults.
    pub fn global() -> SolverResult<Self> {
        let registry = UnitRegistry::global().map_err(SolverError::Registry)?;
        Ok(Self::new(registry, Defaults::global()))
    }
}
