//! Transpose-Free QMR solver (Saad §7.4.3, Algorithm 7.8), right-preconditioned.
//!
//! Each iteration performs two quasi-minimization half-steps. The cheap bound
//! ‖r_m‖ ≤ τ_m·sqrt(m+1) decides when to look at the true residual, which alone
//! decides convergence.

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::{LinearSolver, precondition, residual};
use crate::utils::convergence::{Convergence, SolveStats};

pub struct TfqmrSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: num_traits::Float> TfqmrSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, V, T> LinearSolver<M, V> for TfqmrSolver<T>
where
    M: MatVec<V>,
    (): InnerProduct<V, Scalar = T>,
    V: AsMut<[T]> + AsRef<[T]> + From<Vec<T>> + Clone,
    T: num_traits::Float + Clone + From<f64>,
{
    type Error = KError;
    type Scalar = T;

    fn solve(&mut self, a: &M, pc: Option<&dyn Preconditioner<M, V>>, b: &V, x: &mut V) -> Result<SolveStats<T>, KError> {
        let n = b.as_ref().len();
        let ip = ();
        let eps = T::epsilon();
        let mut xk = x.as_ref().to_vec();
        let r = residual(a, b, &xk);
        let res0 = ip.norm(&r);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }
        let target = self.conv.tol * res0;
        let r_hat = r.clone();
        let r_hat_norm = ip.norm(&r_hat);

        // u lives in the preconditioned space; u_hat = M⁻¹ u and au = A u_hat.
        let mut u = r.clone();
        let mut u_hat = V::from(vec![T::zero(); n]);
        precondition(pc, &u, &mut u_hat)?;
        let mut au = V::from(vec![T::zero(); n]);
        a.matvec(&u_hat, &mut au);
        let mut v = au.clone();
        let mut w = r;
        let mut d_hat = V::from(vec![T::zero(); n]);
        let mut rho = ip.dot(&r_hat, &w);
        let mut tau = res0;
        let mut theta = T::zero();
        let mut eta = T::zero();
        let one = T::one();

        'outer: for k in 1..=self.conv.max_iters {
            let sigma = ip.dot(&r_hat, &v);
            if sigma == T::zero() {
                return Err(KError::Breakdown("tfqmr: (r_hat, v) vanished"));
            }
            let alpha = rho / sigma;
            for half in 0..2 {
                if half == 1 {
                    for (uj, vj) in u.as_mut().iter_mut().zip(v.as_ref()) {
                        *uj = *uj - alpha * *vj;
                    }
                    precondition(pc, &u, &mut u_hat)?;
                    a.matvec(&u_hat, &mut au);
                }
                for (wj, aj) in w.as_mut().iter_mut().zip(au.as_ref()) {
                    *wj = *wj - alpha * *aj;
                }
                let coef = theta * theta * eta / alpha;
                for (dj, uj) in d_hat.as_mut().iter_mut().zip(u_hat.as_ref()) {
                    *dj = *uj + coef * *dj;
                }
                theta = ip.norm(&w) / tau;
                let c = one / (one + theta * theta).sqrt();
                tau = tau * theta * c;
                eta = c * c * alpha;
                for (xj, dj) in xk.iter_mut().zip(d_hat.as_ref()) {
                    *xj = *xj + eta * *dj;
                }
                let m = <T as From<f64>>::from((2 * k - 1 + half) as f64);
                if tau * (m + one).sqrt() <= target {
                    let true_res = ip.norm(&residual(a, b, &xk));
                    if true_res <= target {
                        stats = SolveStats { iterations: k, final_residual: true_res, converged: true };
                        break 'outer;
                    }
                }
            }
            if k == self.conv.max_iters {
                let (_, s) = self.conv.check(ip.norm(&residual(a, b, &xk)), res0, k);
                stats = s;
                break;
            }

            let rho_new = ip.dot(&r_hat, &w);
            if rho_new.abs() <= eps * r_hat_norm * ip.norm(&w) {
                return Err(KError::Breakdown("tfqmr: rho vanished"));
            }
            let beta = rho_new / rho;
            rho = rho_new;
            for (uj, wj) in u.as_mut().iter_mut().zip(w.as_ref()) {
                *uj = *wj + beta * *uj;
            }
            precondition(pc, &u, &mut u_hat)?;
            let mut au_new = V::from(vec![T::zero(); n]);
            a.matvec(&u_hat, &mut au_new);
            // v = A u_{m+1} + beta (A u_m + beta v)
            for ((vj, anj), aj) in v.as_mut().iter_mut().zip(au_new.as_ref()).zip(au.as_ref()) {
                *vj = *anj + beta * (*aj + beta * *vj);
            }
            au = au_new;
        }
        *x = V::from(xk);
        Ok(stats)
    }
}
