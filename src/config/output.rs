//! Output categories for the Newton driver.
//!
//! Each flag gates one family of `tracing` events emitted by the driver. The flags
//! never change numerical behavior.

use bitflags::bitflags;

bitflags! {
    /// Message categories, combinable with `|`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputFlags: u32 {
        /// Recoverable anomalies (tolerated configuration, failed steps).
        const WARNING = 0x1;
        /// One line per Newton iteration.
        const OUTER_ITERATION = 0x2;
        /// Inner (linear) iteration summaries.
        const INNER_ITERATION = 0x4;
        /// Solver parameters at the start of a solve.
        const PARAMETERS = 0x8;
        /// Extra detail on the Newton loop.
        const DETAILS = 0x10;
        /// Result of each stopping test per iteration.
        const OUTER_ITERATION_STATUS_TEST = 0x20;
        /// Linear solver configuration and statistics.
        const LINEAR_SOLVER_DETAILS = 0x40;
        /// Per-test values (norms, thresholds).
        const TEST_DETAILS = 0x80;
        /// Full step and residual vectors at every iteration.
        const DEBUG = 0x1000;
    }
}

impl Default for OutputFlags {
    fn default() -> Self {
        OutputFlags::WARNING
    }
}
