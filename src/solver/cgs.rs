//! Conjugate Gradient Squared (CGS) Solver
//!
//! This module implements the CGS iterative method for solving nonsymmetric linear systems Ax = b.
//! The CGS algorithm is based on the BiConjugate Gradient (BiCG) method, but squares the residual
//! polynomials to achieve faster convergence in some cases. It is suitable for large, sparse, nonsymmetric
//! systems, but may suffer from breakdowns or instability for ill-conditioned problems.
//!
//! Preconditioning is applied on the right, so the monitored residual is the true one.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems, 2nd Edition. SIAM. §7.4.1
//! - https://en.wikipedia.org/wiki/Conjugate_gradient_squared_method

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::{LinearSolver, precondition, residual};
use crate::utils::convergence::{Convergence, SolveStats};

/// CGS solver struct, holding convergence parameters.
///
/// # Type Parameters
/// * `T` - Scalar type (e.g., f32, f64)
pub struct CgsSolver<T> {
    /// Convergence criteria (tolerance and max iterations)
    pub conv: Convergence<T>,
}

impl<T: num_traits::Float> CgsSolver<T> {
    /// Create a new CGS solver with given tolerance and maximum iterations.
    ///
    /// # Arguments
    /// * `tol` - Relative residual tolerance for convergence
    /// * `max_iters` - Maximum number of iterations
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, V, T> LinearSolver<M, V> for CgsSolver<T>
where
    M: MatVec<V>,
    (): InnerProduct<V, Scalar = T>,
    V: AsMut<[T]> + AsRef<[T]> + From<Vec<T>> + Clone,
    T: num_traits::Float + Clone + From<f64>,
{
    type Error = KError;
    type Scalar = T;

    /// Solve Ax = b with CGS.
    ///
    /// # Returns
    /// * `Ok(SolveStats)` when converged or the iteration cap was hit
    /// * `Err(KError::Breakdown)` when the BiCG recurrence breaks down
    fn solve(&mut self, a: &M, pc: Option<&dyn Preconditioner<M, V>>, b: &V, x: &mut V) -> Result<SolveStats<T>, KError> {
        let n = b.as_ref().len();
        let ip = ();
        let eps = T::epsilon();
        let mut xk = x.as_ref().to_vec();
        let mut r = residual(a, b, &xk);
        let r_hat = r.clone();
        let r_hat_norm = ip.norm(&r_hat);
        let res0 = ip.norm(&r);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }

        let zeros = || V::from(vec![T::zero(); n]);
        let mut rho_prev = T::one();
        let mut u = zeros();
        let mut p = zeros();
        let mut q = zeros();
        let mut p_hat = zeros();
        let mut v_hat = zeros();
        let mut u_hat = zeros();
        let mut au_hat = zeros();
        for i in 1..=self.conv.max_iters {
            let rho = ip.dot(&r_hat, &r);
            if rho.abs() <= eps * r_hat_norm * ip.norm(&r) {
                return Err(KError::Breakdown("cgs: rho vanished"));
            }
            if i == 1 {
                u.clone_from(&r);
                p.clone_from(&r);
            } else {
                let beta = rho / rho_prev;
                for ((uj, rj), qj) in u.as_mut().iter_mut().zip(r.as_ref()).zip(q.as_ref()) {
                    *uj = *rj + beta * *qj;
                }
                // p = u + beta * (q + beta * p)
                for ((pj, uj), qj) in p.as_mut().iter_mut().zip(u.as_ref()).zip(q.as_ref()) {
                    *pj = *uj + beta * (*qj + beta * *pj);
                }
            }
            precondition(pc, &p, &mut p_hat)?;
            a.matvec(&p_hat, &mut v_hat);
            let sigma = ip.dot(&r_hat, &v_hat);
            if sigma == T::zero() {
                return Err(KError::Breakdown("cgs: (r_hat, A p) vanished"));
            }
            let alpha = rho / sigma;
            for ((qj, uj), vj) in q.as_mut().iter_mut().zip(u.as_ref()).zip(v_hat.as_ref()) {
                *qj = *uj - alpha * *vj;
            }
            // u_hat = M⁻¹ (u + q)
            let u_plus_q = V::from(u.as_ref().iter().zip(q.as_ref()).map(|(&uj, &qj)| uj + qj).collect::<Vec<_>>());
            precondition(pc, &u_plus_q, &mut u_hat)?;
            a.matvec(&u_hat, &mut au_hat);
            for (xj, uj) in xk.iter_mut().zip(u_hat.as_ref()) {
                *xj = *xj + alpha * *uj;
            }
            for (rj, aj) in r.as_mut().iter_mut().zip(au_hat.as_ref()) {
                *rj = *rj - alpha * *aj;
            }
            let (stop, s) = self.conv.check(ip.norm(&r), res0, i);
            stats = s;
            if stop {
                break;
            }
            rho_prev = rho;
        }
        *x = V::from(xk);
        Ok(stats)
    }
}
