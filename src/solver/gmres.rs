//! Generalized Minimal Residual (GMRES) solver with fixed restart (Saad §6.4)
//!
//! Restarted GMRES for large, possibly nonsymmetric systems Ax = b. Preconditioning is applied
//! on the right (Arnoldi on A M⁻¹), so the residual the least-squares problem minimizes is the
//! true residual b − A x and the convergence test sees the same quantity as the caller.
//!
//! # Features
//! - Right preconditioning, or none
//! - Double (iterative) modified Gram-Schmidt orthogonalization
//! - Happy breakdown detection for early termination
//! - Givens rotations for the least-squares update
//! - True residual recomputed at every restart
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems, 2nd Edition. SIAM. §6.4, §9.3.2
//! - https://en.wikipedia.org/wiki/Generalized_minimal_residual_method

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::{LinearSolver, precondition, residual};
use crate::utils::convergence::{Convergence, SolveStats};
use num_traits::Float;

/// GMRES solver struct with restart length and stopping criteria.
///
/// # Type Parameters
/// * `T` - Scalar type (e.g., f32, f64)
pub struct GmresSolver<T> {
    /// Number of Arnoldi vectors before restart
    pub restart: usize,
    /// Convergence criteria (tolerance and max iterations)
    pub conv: Convergence<T>,
}

impl<T: Copy + Float> GmresSolver<T> {
    /// Create a new GMRES solver with restart, tolerance, and max iterations.
    pub fn new(restart: usize, tol: T, max_iters: usize) -> Self {
        Self {
            restart,
            conv: Convergence { tol, max_iters },
        }
    }

    /// Orthogonalize `w` against the current basis twice (MGS with one refinement pass),
    /// filling column `j` of the Hessenberg matrix. Returns ‖w‖ after orthogonalization.
    fn orthogonalize<V>(ip: &(), v_basis: &[V], w: &mut V, h: &mut [Vec<T>], j: usize) -> T
    where
        (): InnerProduct<V, Scalar = T>,
        V: AsMut<[T]> + AsRef<[T]>,
    {
        for (i, vi) in v_basis.iter().enumerate().take(j + 1) {
            h[i][j] = ip.dot(w, vi);
            for (wk, vik) in w.as_mut().iter_mut().zip(vi.as_ref()) {
                *wk = *wk - h[i][j] * *vik;
            }
        }
        for (i, vi) in v_basis.iter().enumerate().take(j + 1) {
            let tmp = ip.dot(w, vi);
            h[i][j] = h[i][j] + tmp;
            for (wk, vik) in w.as_mut().iter_mut().zip(vi.as_ref()) {
                *wk = *wk - tmp * *vik;
            }
        }
        ip.norm(w)
    }

    // --- Apply Givens rotation and update g together ---
    /// Apply Givens rotations to Hessenberg matrix and update g vector.
    fn apply_givens_and_update_g(h: &mut [Vec<T>], g: &mut [T], cs: &mut [T], sn: &mut [T], j: usize) {
        for i in 0..j {
            let temp = cs[i] * h[i][j] + sn[i] * h[i + 1][j];
            h[i + 1][j] = -sn[i] * h[i][j] + cs[i] * h[i + 1][j];
            h[i][j] = temp;
        }
        let h_kk = h[j][j];
        let h_k1k = h[j + 1][j];
        let r = h_kk.hypot(h_k1k);
        if r == T::zero() {
            cs[j] = T::one();
            sn[j] = T::zero();
        } else {
            cs[j] = h_kk / r;
            sn[j] = h_k1k / r;
        }
        h[j][j] = cs[j] * h_kk + sn[j] * h_k1k;
        h[j + 1][j] = T::zero();
        // Update g
        let temp = cs[j] * g[j] + sn[j] * g[j + 1];
        g[j + 1] = -sn[j] * g[j] + cs[j] * g[j + 1];
        g[j] = temp;
    }

    // --- Back-substitution for least squares ---
    /// Solve the m×m upper-triangular system H y = g.
    fn back_substitution(h: &[Vec<T>], g: &[T], y: &mut [T], m: usize) -> Result<(), KError> {
        for i in (0..m).rev() {
            let mut acc = g[i];
            for j in (i + 1)..m {
                acc = acc - h[i][j] * y[j];
            }
            if h[i][i] == T::zero() {
                return Err(KError::Breakdown("gmres: singular Hessenberg matrix"));
            }
            y[i] = acc / h[i][i];
        }
        Ok(())
    }
}

impl<M, V, T> LinearSolver<M, V> for GmresSolver<T>
where
    M: MatVec<V>,
    (): InnerProduct<V, Scalar = T>,
    V: AsMut<[T]> + AsRef<[T]> + From<Vec<T>> + Clone,
    T: Float + From<f64>,
{
    type Error = KError;
    type Scalar = T;

    /// Solve the linear system Ax = b using restarted, right-preconditioned GMRES.
    ///
    /// # Returns
    /// * `Ok(SolveStats)` if converged or max iterations reached
    /// * `Err(KError)` on a preconditioner failure or a singular least-squares system
    fn solve(&mut self, a: &M, pc: Option<&dyn Preconditioner<M, V>>, b: &V, x: &mut V) -> Result<SolveStats<T>, KError> {
        if self.restart == 0 {
            return Err(KError::Configuration("gmres: restart length must be positive".into()));
        }
        let n = b.as_ref().len();
        let ip = ();
        let eps = T::epsilon();
        let mut xk = x.as_ref().to_vec();
        let mut r = residual(a, b, &xk);
        let mut beta = ip.norm(&r);
        let res0 = beta;
        let (stop, mut stats) = self.conv.check(beta, res0, 0);
        if stop {
            return Ok(stats);
        }

        let mut iteration = 0;
        while iteration < self.conv.max_iters {
            let mut v_basis: Vec<V> = Vec::with_capacity(self.restart + 1);
            // z_j = M⁻¹ v_j, kept for the solution update
            let mut z_basis: Vec<V> = Vec::with_capacity(self.restart);
            v_basis.push(V::from(r.as_ref().iter().map(|&ri| ri / beta).collect::<Vec<_>>()));

            let mut h = vec![vec![T::zero(); self.restart]; self.restart + 1];
            let mut g = vec![T::zero(); self.restart + 1];
            g[0] = beta;
            let mut cs = vec![T::zero(); self.restart];
            let mut sn = vec![T::zero(); self.restart];
            let mut m = 0;
            for j in 0..self.restart {
                iteration += 1;
                let mut zj = V::from(vec![T::zero(); n]);
                precondition(pc, &v_basis[j], &mut zj)?;
                let mut w = V::from(vec![T::zero(); n]);
                a.matvec(&zj, &mut w);
                z_basis.push(zj);
                let h_next = Self::orthogonalize(&ip, &v_basis, &mut w, &mut h, j);
                h[j + 1][j] = h_next;
                Self::apply_givens_and_update_g(&mut h, &mut g, &mut cs, &mut sn, j);
                m = j + 1;
                let (stop, s) = self.conv.check(g[j + 1].abs(), res0, iteration);
                stats = s;
                // Happy breakdown: the Krylov space is invariant, the current iterate is exact.
                let happy = h_next <= eps * beta;
                if stop || happy {
                    break;
                }
                v_basis.push(V::from(w.as_ref().iter().map(|&wi| wi / h_next).collect::<Vec<_>>()));
            }

            let mut y = vec![T::zero(); m];
            Self::back_substitution(&h, &g, &mut y, m)?;
            for (yj, zj) in y.iter().zip(&z_basis) {
                for (xi, zji) in xk.iter_mut().zip(zj.as_ref()) {
                    *xi = *xi + *yj * *zji;
                }
            }

            // Restart from the true residual
            r = residual(a, b, &xk);
            beta = ip.norm(&r);
            let (stop, s) = self.conv.check(beta, res0, iteration);
            stats = s;
            if stop {
                break;
            }
        }
        *x = V::from(xk);
        Ok(stats)
    }
}
