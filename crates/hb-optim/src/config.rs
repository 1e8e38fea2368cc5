//! Optimizer settings.

/// Local search and multi-start configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Quasi-Newton iterations per start.
    pub max_iterations: usize,
    /// Forward-difference step in the unit box.
    pub gradient_step: f64,
    /// Projected-gradient norm treated as stationary.
    pub gradient_tol: f64,
    /// Relative merit change treated as stalled.
    pub merit_tol: f64,
    /// Armijo sufficient-decrease constant.
    pub armijo: f64,
    /// Step shrink factor while backtracking.
    pub backtrack: f64,
    pub max_backtracks: usize,
    /// Quasi-random starts tried when the single start is not good enough.
    pub starts: usize,
    /// Upper bound on parallel workers.
    pub workers: usize,
    /// Weight of the quadratic constraint penalty.
    pub penalty_weight: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            gradient_step: 1e-3,
            gradient_tol: 1e-6,
            merit_tol: 1e-9,
            armijo: 1e-4,
            backtrack: 0.5,
            max_backtracks: 12,
            starts: 8,
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()).min(8),
            penalty_weight: 1e3,
        }
    }
}
