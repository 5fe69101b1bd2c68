//! Direct dense solver using Faer's full-pivoting LU factorization.
//!
//! Suitable for small to medium systems where forming the dense Jacobian is affordable.
//! Sparse (`CsrMatrix`) operators are densified before factorization.
//!
//! # References
//! - Faer documentation: https://github.com/sarah-ek/faer-rs
//! - Golub & Van Loan, Matrix Computations

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use crate::preconditioner::Preconditioner;
use crate::solver::LinearSolver;
use crate::utils::convergence::SolveStats;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::{Conj, Mat, MatMut, MatRef};

/// LU solver using full pivoting from Faer.
///
/// Stores the last LU factorization so further right-hand sides can reuse it.
pub struct LuSolver {
    /// Cached LU factorization (if computed)
    factor: Option<FullPivLu<f64>>,
}

impl LuSolver {
    /// Create a new LU solver (no factorization yet).
    pub fn new() -> Self {
        LuSolver { factor: None }
    }

    /// Whether a factorization is cached.
    pub fn is_factored(&self) -> bool {
        self.factor.is_some()
    }

    /// Solve using the cached LU factorization.
    pub fn solve_cached(&self, b: &[f64], x: &mut [f64]) -> Result<(), KError> {
        let factor = self
            .factor
            .as_ref()
            .ok_or_else(|| KError::FactorError("lu: solve_cached called before factorization".into()))?;
        if b.len() != x.len() {
            return Err(KError::FactorError("lu: right-hand side and solution lengths differ".into()));
        }
        let n = b.len();
        x.copy_from_slice(b);
        let x_mat = MatMut::from_column_major_slice_mut(x, n, 1);
        factor.solve_in_place_with_conj(Conj::No, x_mat);
        if x.iter().any(|v| !v.is_finite()) {
            return Err(KError::FactorError("lu: matrix is singular".into()));
        }
        Ok(())
    }

    /// Factor `a` and solve a·x = b. The reported residual is the true ‖b − a x‖₂.
    fn factor_and_solve(&mut self, a: MatRef<'_, f64>, b: &Vec<f64>, x: &mut Vec<f64>) -> Result<SolveStats<f64>, KError> {
        if a.nrows() != a.ncols() {
            return Err(KError::FactorError(format!(
                "lu: matrix must be square, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if a.nrows() != b.len() {
            return Err(KError::FactorError(format!(
                "lu: matrix has {} rows but right-hand side has {} entries",
                a.nrows(),
                b.len()
            )));
        }
        self.factor = Some(FullPivLu::new(a));
        x.resize(b.len(), 0.0);
        self.solve_cached(b, x)?;
        let mut ax = vec![0.0; b.len()];
        a.matvec(x, &mut ax);
        let r: Vec<f64> = b.iter().zip(&ax).map(|(bi, axi)| bi - axi).collect();
        let res = ().norm(&r);
        // For direct solvers, always converged in 1 iteration
        Ok(SolveStats {
            iterations: 1,
            final_residual: res,
            converged: true,
        })
    }
}

impl Default for LuSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearSolver<Mat<f64>, Vec<f64>> for LuSolver {
    type Error = KError;
    type Scalar = f64;

    /// Solve Ax = b using LU factorization (full pivoting). The preconditioner is ignored.
    fn solve(
        &mut self,
        a: &Mat<f64>,
        _pc: Option<&dyn Preconditioner<Mat<f64>, Vec<f64>>>,
        b: &Vec<f64>,
        x: &mut Vec<f64>,
    ) -> Result<SolveStats<f64>, KError> {
        self.factor_and_solve(a.as_ref(), b, x)
    }
}

impl LinearSolver<CsrMatrix<f64>, Vec<f64>> for LuSolver {
    type Error = KError;
    type Scalar = f64;

    fn solve(
        &mut self,
        a: &CsrMatrix<f64>,
        _pc: Option<&dyn Preconditioner<CsrMatrix<f64>, Vec<f64>>>,
        b: &Vec<f64>,
        x: &mut Vec<f64>,
    ) -> Result<SolveStats<f64>, KError> {
        let dense = a.to_dense();
        self.factor_and_solve(dense.as_ref(), b, x)
    }
}
