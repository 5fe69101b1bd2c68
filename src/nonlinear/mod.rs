//! Newton–Krylov nonlinear solver.
//!
//! - [`problem`]: the `NonlinearProblem` contract implemented by discretizations and the
//!   `NewtonSystem` capability trait the driver consumes.
//! - [`adapter`]: `ProblemAdapter`, which owns the Jacobian and the preconditioner.
//! - [`criteria`]: composable stopping tests.
//! - [`state`]: per-solve diagnostics and terminal states.
//! - [`newton`]: the `NewtonSolver` driver.

pub mod adapter;
pub mod criteria;
pub mod newton;
pub mod problem;
pub mod state;

pub use adapter::{PrecondHandle, ProblemAdapter};
pub use criteria::{ConvergenceCriteria, IterationData, Status, StatusTest, WrmsTolerances};
pub use newton::NewtonSolver;
pub use problem::{NewtonSystem, NonlinearProblem};
pub use state::{ConvergenceState, SolverStatus, TerminalState};
