use crate::preconditioner::Preconditioner;
use crate::core::traits::{Indexing, MatrixGet};
use crate::error::KError;
use num_traits::Float;

/// Symmetric Successive Over-Relaxation.
/// M = 1/(ω(2-ω)) (D + ωL) D⁻¹ (D + ωU)
pub struct Ssor<T> {
    omega: T,
    diag: Vec<T>,
    lower: Vec<Vec<(usize, T)>>,
    upper: Vec<Vec<(usize, T)>>,
}

impl<T: Float> Ssor<T> {
    pub fn new(omega: T) -> Self {
        Self { omega, diag: Vec::new(), lower: Vec::new(), upper: Vec::new() }
    }

    pub fn omega(&self) -> T {
        self.omega
    }
}

impl<M, T> Preconditioner<M, Vec<T>> for Ssor<T>
where
    M: MatrixGet<T> + Indexing,
    T: Float,
{
    fn setup(&mut self, a: &M) -> Result<(), KError> {
        let two = T::one() + T::one();
        if !(self.omega > T::zero() && self.omega < two) {
            return Err(KError::Configuration("SSOR relaxation factor must lie in (0, 2)".into()));
        }
        let n = a.nrows();
        self.diag = Vec::with_capacity(n);
        self.lower = Vec::with_capacity(n);
        self.upper = Vec::with_capacity(n);
        for i in 0..n {
            let d = a.get(i, i);
            if d == T::zero() || !d.is_finite() {
                return Err(KError::ZeroPivot(i));
            }
            self.diag.push(d);
            let pattern = a.row_pattern(i);
            self.lower.push(pattern.iter().filter(|&&j| j < i).map(|&j| (j, a.get(i, j))).collect());
            self.upper.push(pattern.iter().filter(|&&j| j > i).map(|&j| (j, a.get(i, j))).collect());
        }
        Ok(())
    }

    fn apply(&self, r: &Vec<T>, z: &mut Vec<T>) -> Result<(), KError> {
        let n = self.diag.len();
        if r.len() != n {
            return Err(KError::Computation("ssor: apply before setup or size mismatch".into()));
        }
        let two = T::one() + T::one();
        let scale = self.omega * (two - self.omega);
        // forward: (D + ωL) y = ω(2-ω) r
        let mut y = vec![T::zero(); n];
        for i in 0..n {
            let s = self.lower[i].iter().fold(T::zero(), |acc, &(j, v)| acc + v * y[j]);
            y[i] = (scale * r[i] - self.omega * s) / self.diag[i];
        }
        // backward: (D + ωU) z = D y
        for i in (0..n).rev() {
            let s = self.upper[i].iter().fold(T::zero(), |acc, &(j, v)| acc + v * z[j]);
            z[i] = (self.diag[i] * y[i] - self.omega * s) / self.diag[i];
        }
        Ok(())
    }
}
