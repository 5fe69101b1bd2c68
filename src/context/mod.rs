//! Context module: linear backend dispatch and preconditioner selection.
//!
//! Modules:
//! - [`ksp_context`]: the `LinearBackend` trait and the default `KspContext` backend.
//! - [`pc_context`]: the `PC` enum naming the built-in preconditioners.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.
//! - PETSc documentation: https://petsc.org/release/docs/manualpages/KSP/

pub mod ksp_context;
pub use ksp_context::{KspContext, LinearBackend};
pub mod pc_context;
