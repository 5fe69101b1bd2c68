//! Solver configuration: inner linear-solve parameters and output flags.

pub mod linear;
pub mod output;

pub use linear::{LinearMethod, LinearSolverConfig, ReusePolicy};
pub use output::OutputFlags;
