//! krynox: Newton–Krylov nonlinear solver over Faer
//!
//! This crate solves nonlinear systems F(x) = 0 with Newton's method, performing each
//! linearized step J·δx = −F(x) with a preconditioned Krylov method (GMRES, CG, CGS, TFQMR,
//! BiCGStab) or a dense LU factorization. Dot products, norms and sparse matrix-vector
//! products run on Rayon's pool when the `rayon` feature is enabled.
//!
//! A discretization implements [`NonlinearProblem`]; [`ProblemAdapter`] exposes it to the
//! [`NewtonSolver`] driver, which owns the convergence tests, the linear-solver
//! configuration and the preconditioner reuse policy.

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod matrix;
pub mod nonlinear;
pub mod preconditioner;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::*;
pub use core::*;
pub use error::*;
pub use matrix::*;
pub use nonlinear::*;
pub use preconditioner::*;
pub use solver::*;
pub use utils::*;

// Re-export SolveStats at the crate root for convenience
pub use utils::convergence::SolveStats;
