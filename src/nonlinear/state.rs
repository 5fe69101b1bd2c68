//! Per-solve diagnostics and terminal states of the Newton driver.

use crate::error::KError;
use crate::nonlinear::criteria::StatusTest;

/// Counters and norms of the current (or last) `solve` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceState<T> {
    /// Newton iterations completed.
    pub iterations: usize,
    /// ‖F(x₀)‖ in the configured norm.
    pub initial_residual: T,
    /// ‖F(x_k)‖ in the configured norm.
    pub residual: T,
    /// ‖δx‖₂ of the last accepted step.
    pub update_norm: T,
    /// Linear iterations summed over every inner solve of this `solve` call.
    pub lin_iters: usize,
    /// Linear iterations of the most recent inner solve.
    pub last_lin_iters: usize,
    /// Relative residual reached by the most recent inner solve.
    pub achieved_tol: T,
}

impl<T: num_traits::Float> ConvergenceState<T> {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            initial_residual: T::zero(),
            residual: T::zero(),
            update_norm: T::zero(),
            lin_iters: 0,
            last_lin_iters: 0,
            achieved_tol: T::zero(),
        }
    }
}

impl<T: num_traits::Float> Default for ConvergenceState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of one `solve` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverStatus {
    Initialized,
    Iterating,
    Finished(TerminalState),
}

/// How a `solve` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalState {
    /// A convergence test was satisfied.
    Converged(StatusTest),
    /// The iteration budget ran out first.
    Exhausted,
    /// A residual, Jacobian, preconditioner or linear solve failed.
    Failed(KError),
}

impl TerminalState {
    pub fn is_converged(&self) -> bool {
        matches!(self, TerminalState::Converged(_))
    }
}
