//! Convergence tracking & tolerance checks for the inner iterative solvers.

/// Stopping criteria & stats.
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

#[derive(Clone, Debug)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
}

impl<T: Copy + num_traits::Float> Convergence<T> {
    /// Returns (should_stop, stats) given current `res_norm` and iteration `i`.
    ///
    /// Convergence is relative: `res_norm <= tol * res0_norm`. A zero residual always
    /// converges; a non-finite one stops without converging.
    pub fn check(
        &self,
        res_norm: T,
        res0_norm: T,
        i: usize,
    ) -> (bool, SolveStats<T>) {
        let converged = res_norm == T::zero() || res_norm <= self.tol * res0_norm;
        let stop = converged || i >= self.max_iters || !res_norm.is_finite();
        (
            stop,
            SolveStats {
                iterations: i,
                final_residual: res_norm,
                converged,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_iters_stops_without_converging() {
        let conv = Convergence { tol: 1e-8, max_iters: 5 };
        let (stop, stats) = conv.check(1e-3, 1.0, 5);
        assert!(stop);
        assert!(!stats.converged);
    }

    #[test]
    fn relative_and_zero_residuals() {
        let conv = Convergence { tol: 1e-6, max_iters: 50 };
        assert!(conv.check(1e-7, 1.0, 1).1.converged);
        assert!(!conv.check(1e-5, 1.0, 1).0);
        let (stop, stats) = conv.check(0.0, 0.0, 0);
        assert!(stop && stats.converged);
        let (stop, stats) = conv.check(f64::NAN, 1.0, 2);
        assert!(stop && !stats.converged);
    }
}
