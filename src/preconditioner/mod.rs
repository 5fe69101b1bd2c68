//! Preconditioners for linear solvers.
//!
//! This module defines the Preconditioner trait and includes implementations of Jacobi, SSOR and ILU(0).

use crate::error::KError;

/// A preconditioner M ≈ A⁻¹.
pub trait Preconditioner<M, V> {
    /// Apply M⁻¹ to r, writing z = M⁻¹ r
    fn apply(&self, r: &V, z: &mut V) -> Result<(), KError>;
    /// Optionally: setup/factorize from A
    fn setup(&mut self, _a: &M) -> Result<(), KError> {
        Ok(())
    }
    /// Refresh the numeric values from A, reusing whatever structure the last
    /// `setup` produced (sparsity pattern, allocations). Falls back to `setup`.
    fn recompute(&mut self, a: &M) -> Result<(), KError> {
        self.setup(a)
    }
}

// Submodules for various preconditioners
pub mod ilu;
pub mod jacobi;
pub mod ssor;

// Re-exports for convenience
pub use ilu::Ilu0;
pub use jacobi::Jacobi;
pub use ssor::Ssor;

/// Unified preconditioner enum for all supported types.
pub use crate::context::pc_context::PC;
