//! Jacobian operators consumed by the Newton driver.
//!
//! A Jacobian only has to provide a matrix-vector product and its dimension; that is
//! enough for every Krylov method and for the diagonal-probing Jacobi preconditioner.
//! Assembled Jacobians (`faer::Mat<f64>`, `CsrMatrix<f64>`) additionally offer the
//! direct LU solve and the entry-based preconditioners (SSOR, ILU(0)).

use crate::context::pc_context::PC;
use crate::core::traits::{Indexing, MatVec, Real};
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::preconditioner::{Ilu0, Jacobi, Preconditioner, Ssor};
use crate::solver::{LinearSolver, LuSolver};
use crate::utils::convergence::SolveStats;
use faer::Mat;

/// Linear operator J(x) produced by a nonlinear problem.
pub trait JacobianOperator<T: Real>: MatVec<Vec<T>> + Indexing + 'static {
    /// Solve J x = b directly. Matrix-free operators cannot.
    fn direct_solve(&self, _b: &Vec<T>, _x: &mut Vec<T>) -> Result<SolveStats<T>, KError> {
        Err(KError::Unsupported("direct solve requires an assembled Jacobian"))
    }

    /// Fresh, not yet set up, built-in preconditioner of the requested kind.
    fn make_preconditioner(&self, kind: &PC<T>) -> Result<Box<dyn Preconditioner<Self, Vec<T>>>, KError>
    where
        Self: Sized,
    {
        match kind {
            PC::Jacobi => Ok(Box::new(Jacobi::<T>::new())),
            PC::Ssor { .. } => Err(KError::Unsupported("ssor requires an assembled Jacobian")),
            PC::Ilu0 => Err(KError::Unsupported("ilu0 requires an assembled Jacobian")),
        }
    }
}

fn assembled_preconditioner<M>(kind: &PC<f64>) -> Result<Box<dyn Preconditioner<M, Vec<f64>>>, KError>
where
    M: JacobianOperator<f64> + crate::core::traits::MatrixGet<f64>,
{
    Ok(match kind {
        PC::Jacobi => Box::new(Jacobi::<f64>::new()),
        PC::Ssor { omega } => {
            if !(*omega > 0.0 && *omega < 2.0) {
                return Err(KError::Configuration(format!("ssor: omega = {omega} is outside (0, 2)")));
            }
            Box::new(Ssor::<f64>::new(*omega))
        }
        PC::Ilu0 => Box::new(Ilu0::<f64>::new()),
    })
}

impl JacobianOperator<f64> for Mat<f64> {
    fn direct_solve(&self, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, KError> {
        LuSolver::new().solve(self, None, b, x)
    }

    fn make_preconditioner(&self, kind: &PC<f64>) -> Result<Box<dyn Preconditioner<Self, Vec<f64>>>, KError> {
        assembled_preconditioner::<Self>(kind)
    }
}

impl JacobianOperator<f64> for CsrMatrix<f64> {
    fn direct_solve(&self, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, KError> {
        LuSolver::new().solve(self, None, b, x)
    }

    fn make_preconditioner(&self, kind: &PC<f64>) -> Result<Box<dyn Preconditioner<Self, Vec<f64>>>, KError> {
        assembled_preconditioner::<Self>(kind)
    }
}
