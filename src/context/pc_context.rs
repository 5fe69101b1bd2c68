//! Preconditioner selection for the inner Krylov solve.
//!
//! The `PC` enum names the built-in preconditioners that can be constructed from an
//! assembled Jacobian. Matrix-free operators only support `Jacobi`, which probes the
//! diagonal through matrix-vector products.
//!
//! # Example
//!
//! ```rust
//! use krynox::PC;
//! let pc: PC<f64> = PC::Ssor { omega: 1.2 };
//! assert_eq!(pc.name(), "ssor");
//! ```

/// Built-in preconditioner kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum PC<T> {
    /// Jacobi (diagonal scaling) preconditioner.
    Jacobi,
    /// Symmetric Successive Over-Relaxation with relaxation factor `omega` in (0, 2).
    Ssor { omega: T },
    /// Incomplete LU factorization with zero fill-in (ILU(0)).
    Ilu0,
}

impl<T> PC<T> {
    /// Short lowercase name, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            PC::Jacobi => "jacobi",
            PC::Ssor { .. } => "ssor",
            PC::Ilu0 => "ilu0",
        }
    }
}
