//! Linear backend used by the Newton driver for J·δx = −F(x).
//!
//! `LinearBackend` is the seam between the nonlinear loop and whatever solves the linear
//! systems. `KspContext`, the default backend, dispatches the configured
//! [`LinearMethod`] to the built-in Krylov solvers or to the dense LU solve.
//!
//! # Supported Solvers
//! - GMRES (restarted, right-preconditioned), CG, CGS, TFQMR, BiCGStab, dense LU
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.
//! - Templates for the Solution of Linear Systems: Building Blocks for Iterative Methods, 2nd Edition (Barrett et al.)

use crate::config::linear::{LinearMethod, LinearSolverConfig};
use crate::core::traits::Real;
use crate::error::KError;
use crate::matrix::operator::JacobianOperator;
use crate::preconditioner::Preconditioner;
use crate::solver::{BiCgStabSolver, CgSolver, CgsSolver, GmresSolver, LinearSolver, TfqmrSolver};
use crate::utils::convergence::SolveStats;

/// Anything that can solve A x = b for the Newton driver.
///
/// `x` holds the initial guess on entry. Implementations report a solve that stopped
/// short of the tolerance through `SolveStats::converged` and reserve `Err` for
/// breakdowns and unsupported requests.
pub trait LinearBackend<M, T> {
    fn solve(
        &mut self,
        cfg: &LinearSolverConfig<T>,
        a: &M,
        pc: Option<&dyn Preconditioner<M, Vec<T>>>,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, KError>;
}

/// Default backend over the built-in solvers.
#[derive(Debug, Default, Clone)]
pub struct KspContext {
    solves: usize,
}

impl KspContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of linear solves dispatched so far.
    pub fn num_solves(&self) -> usize {
        self.solves
    }
}

impl<M, T> LinearBackend<M, T> for KspContext
where
    M: JacobianOperator<T>,
    T: Real,
{
    fn solve(
        &mut self,
        cfg: &LinearSolverConfig<T>,
        a: &M,
        pc: Option<&dyn Preconditioner<M, Vec<T>>>,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, KError> {
        self.solves += 1;
        let stats = match cfg.method {
            LinearMethod::Gmres => GmresSolver::new(cfg.krylov_size, cfg.tol, cfg.max_iters).solve(a, pc, b, x),
            LinearMethod::Cg => CgSolver::new(cfg.tol, cfg.max_iters).solve(a, pc, b, x),
            LinearMethod::Cgs => CgsSolver::new(cfg.tol, cfg.max_iters).solve(a, pc, b, x),
            LinearMethod::Tfqmr => TfqmrSolver::new(cfg.tol, cfg.max_iters).solve(a, pc, b, x),
            LinearMethod::BiCgStab => BiCgStabSolver::new(cfg.tol, cfg.max_iters).solve(a, pc, b, x),
            LinearMethod::Lu => a.direct_solve(b, x),
        }?;
        tracing::trace!(
            method = ?cfg.method,
            iterations = stats.iterations,
            residual = %stats.final_residual,
            converged = stats.converged,
            "linear solve finished"
        );
        Ok(stats)
    }
}
