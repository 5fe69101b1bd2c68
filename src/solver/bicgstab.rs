//! BiCGStab solver (Saad §7.4.2), right-preconditioned.
//!
//! Breakdown of the underlying Lanczos recurrence (ρ ≈ 0 relative to the vectors involved,
//! or a vanishing stabilization step) is reported as `KError::Breakdown` rather than
//! silently returning a stale iterate.

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::{LinearSolver, precondition, residual};
use crate::utils::convergence::{Convergence, SolveStats};

pub struct BiCgStabSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: num_traits::Float> BiCgStabSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, V, T> LinearSolver<M, V> for BiCgStabSolver<T>
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
        let mut r = residual(a, b, &xk);
        let r_hat = r.clone(); // shadow residual
        let r_hat_norm = ip.norm(&r_hat);
        let res0 = ip.norm(&r);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }

        let mut rho_prev = T::one();
        let mut alpha = T::one();
        let mut omega = T::one();
        let mut v = V::from(vec![T::zero(); n]);
        let mut p = V::from(vec![T::zero(); n]);
        let mut p_hat = V::from(vec![T::zero(); n]);
        let mut s_hat = V::from(vec![T::zero(); n]);
        let mut t = V::from(vec![T::zero(); n]);
        for i in 1..=self.conv.max_iters {
            let rho = ip.dot(&r_hat, &r);
            if rho.abs() <= eps * r_hat_norm * ip.norm(&r) {
                return Err(KError::Breakdown("bicgstab: rho vanished"));
            }
            if i == 1 {
                p.clone_from(&r);
            } else {
                let beta = (rho / rho_prev) * (alpha / omega);
                // p = r + beta * (p - omega * v)
                for ((pj, rj), vj) in p.as_mut().iter_mut().zip(r.as_ref()).zip(v.as_ref()) {
                    *pj = *rj + beta * (*pj - omega * *vj);
                }
            }
            precondition(pc, &p, &mut p_hat)?;
            a.matvec(&p_hat, &mut v);
            let r_hat_v = ip.dot(&r_hat, &v);
            if r_hat_v == T::zero() {
                return Err(KError::Breakdown("bicgstab: (r_hat, v) vanished"));
            }
            alpha = rho / r_hat_v;

            // s = r - alpha * v, stored in r
            for (rj, vj) in r.as_mut().iter_mut().zip(v.as_ref()) {
                *rj = *rj - alpha * *vj;
            }
            for (xj, pj) in xk.iter_mut().zip(p_hat.as_ref()) {
                *xj = *xj + alpha * *pj;
            }
            let (stop, s) = self.conv.check(ip.norm(&r), res0, i);
            stats = s;
            if stop && stats.converged {
                break;
            }

            precondition(pc, &r, &mut s_hat)?;
            a.matvec(&s_hat, &mut t);
            let tt = ip.dot(&t, &t);
            if tt == T::zero() {
                return Err(KError::Breakdown("bicgstab: (t, t) vanished"));
            }
            omega = ip.dot(&t, &r) / tt;
            for (xj, sj) in xk.iter_mut().zip(s_hat.as_ref()) {
                *xj = *xj + omega * *sj;
            }
            for (rj, tj) in r.as_mut().iter_mut().zip(t.as_ref()) {
                *rj = *rj - omega * *tj;
            }
            let (stop, s) = self.conv.check(ip.norm(&r), res0, i);
            stats = s;
            if stop {
                break;
            }
            if omega == T::zero() {
                return Err(KError::Breakdown("bicgstab: omega vanished"));
            }
            rho_prev = rho;
        }
        *x = V::from(xk);
        Ok(stats)
    }
}
