//! Preconditioned Conjugate Gradient per Saad §9.2 (plain CG without a preconditioner).
//!
//! Convergence is measured on the unpreconditioned residual ‖b − A x‖₂ relative to the
//! initial residual. A non-positive curvature p^T A p aborts with `IndefiniteMatrix`.

use crate::core::traits::{InnerProduct, MatVec};
use crate::solver::{LinearSolver, precondition, residual};
use crate::preconditioner::Preconditioner;
use crate::utils::convergence::{Convergence, SolveStats};
use crate::error::KError;

pub struct CgSolver<T> {
    pub conv: Convergence<T>,
}

impl<T: Copy + num_traits::Float> CgSolver<T> {
    pub fn new(tol: T, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }
}

impl<M, V, T> LinearSolver<M, V> for CgSolver<T>
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
        let mut x_vec = x.as_ref().to_vec();
        let mut r = residual(a, b, &x_vec);
        let res0 = ip.norm(&r);
        let (stop, mut stats) = self.conv.check(res0, res0, 0);
        if stop {
            return Ok(stats);
        }
        let mut z = V::from(vec![T::zero(); n]);
        precondition(pc, &r, &mut z)?;
        let mut p = z.clone();
        let mut rz = ip.dot(&r, &z);
        let mut ap = V::from(vec![T::zero(); n]);
        for i in 1..=self.conv.max_iters {
            a.matvec(&p, &mut ap);
            let p_dot_ap = ip.dot(&p, &ap);
            // Indefinite-matrix detection
            if p_dot_ap <= T::zero() {
                return Err(KError::IndefiniteMatrix);
            }
            let alpha = rz / p_dot_ap;
            for (xj, pj) in x_vec.iter_mut().zip(p.as_ref()) {
                *xj = *xj + alpha * *pj;
            }
            for (rj, apj) in r.as_mut().iter_mut().zip(ap.as_ref()) {
                *rj = *rj - alpha * *apj;
            }
            let (stop, s) = self.conv.check(ip.norm(&r), res0, i);
            stats = s;
            if stop {
                break;
            }
            precondition(pc, &r, &mut z)?;
            let rz_new = ip.dot(&r, &z);
            let beta = rz_new / rz;
            for (pj, zj) in p.as_mut().iter_mut().zip(z.as_ref()) {
                *pj = *zj + beta * *pj;
            }
            rz = rz_new;
        }
        *x = V::from(x_vec);
        Ok(stats)
    }
}
