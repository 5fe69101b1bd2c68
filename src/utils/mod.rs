//! Utilities: inner-solver convergence checks and vector norms.

pub mod convergence;
pub mod norm;

pub use convergence::{Convergence, SolveStats};
pub use norm::{NormType, ScaleType, norm, scaled_norm, wrms_norm};
