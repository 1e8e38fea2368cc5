//! Solver configuration and the per-solve budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Recycle closure tolerance [%].
pub const DEFAULT_TOLERANCE_PCT: f64 = 0.5;
/// Outer iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Recycle iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Closure error at or below which the recycle loop has converged [%].
    pub tolerance_pct: f64,
    /// Relaxation factor applied after the first pass.
    pub first_relaxation: f64,
    /// Relaxation factor applied after every later pass.
    pub relaxation: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance_pct: DEFAULT_TOLERANCE_PCT,
            first_relaxation: 1.0,
            relaxation: 0.7,
        }
    }
}

/// Limits on one solve: iteration cap, wall-clock deadline and a shared
/// cancellation flag. Checked at the top of every recycle iteration.
#[derive(Debug, Clone)]
pub struct SolveBudget {
    pub max_iterations: usize,
    pub deadline: Option<Instant>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            deadline: None,
            cancel: None,
        }
    }
}

impl SolveBudget {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
