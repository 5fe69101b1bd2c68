//! Contracts between a discretized problem and the Newton driver.

use crate::config::linear::ReusePolicy;
use crate::core::traits::Real;
use crate::error::KError;
use crate::matrix::operator::JacobianOperator;
use crate::preconditioner::Preconditioner;

/// A discretized nonlinear system F(x) = 0.
///
/// Implementors provide the residual and Jacobian at a state `x`. Errors are reported
/// as `KError` and are surfaced to the driver as computation failures.
pub trait NonlinearProblem<T: Real> {
    type Jacobian: JacobianOperator<T>;

    /// Number of degrees of freedom (length of x and F(x)).
    fn ndof(&self) -> usize;

    /// Write F(x) into `f`.
    fn residual(&mut self, x: &[T], f: &mut [T]) -> Result<(), KError>;

    /// Assemble J(x).
    fn jacobian(&mut self, x: &[T]) -> Result<Self::Jacobian, KError>;

    /// Problem-specific preconditioner for J(x), already set up.
    ///
    /// Only consulted when the adapter was told to use the problem's preconditioner.
    fn preconditioner(
        &mut self,
        _x: &[T],
        _jac: &Self::Jacobian,
    ) -> Result<Option<Box<dyn Preconditioner<Self::Jacobian, Vec<T>>>>, KError> {
        Ok(None)
    }

    fn set_time(&mut self, _time: T) {}

    fn set_time_step(&mut self, _dt: T) {}
}

/// What the Newton driver needs from the system it solves.
pub trait NewtonSystem<T: Real> {
    type Operator: JacobianOperator<T>;

    fn ndof(&self) -> usize;

    /// F(x) into `f`; NaN or infinite entries are a computation error.
    fn compute_residual(&mut self, x: &[T], f: &mut [T]) -> Result<(), KError>;

    /// Recompute and store J(x).
    fn compute_jacobian(&mut self, x: &[T]) -> Result<(), KError>;

    /// Build or refresh the preconditioner according to `policy`. A no-op when none is
    /// configured.
    fn compute_preconditioner(&mut self, x: &[T], policy: ReusePolicy, max_age: usize) -> Result<(), KError>;

    /// Last computed Jacobian.
    fn jacobian(&self) -> Option<&Self::Operator>;

    /// Current preconditioner, if one is configured and built.
    fn preconditioner(&self) -> Option<&dyn Preconditioner<Self::Operator, Vec<T>>>;

    fn set_time(&mut self, _time: T) {}

    fn set_time_step(&mut self, _dt: T) {}
}
