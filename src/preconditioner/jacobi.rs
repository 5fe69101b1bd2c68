// Jacobi preconditioner implementation

use crate::preconditioner::Preconditioner;
use crate::core::traits::{MatVec, Indexing};
use crate::error::KError;
use num_traits::Float;

/// Jacobi preconditioner: M⁻¹ = D⁻¹
///
/// The diagonal is probed through matrix-vector products with unit vectors, so it works
/// for matrix-free Jacobians as well as assembled ones.
pub struct Jacobi<T> {
    pub(crate) inv_diag: Vec<T>,
}

impl<T: Float> Jacobi<T> {
    /// new with empty state; user must call `setup`.
    pub fn new() -> Self {
        Self { inv_diag: Vec::new() }
    }
}

impl<T: num_traits::Float> Default for Jacobi<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, V, T> Preconditioner<M, V> for Jacobi<T>
where
    M: MatVec<V> + Indexing,
    V: AsRef<[T]> + AsMut<[T]> + From<Vec<T>>,
    T: Float + Send + Sync,
{
    fn setup(&mut self, a: &M) -> Result<(), KError> {
        let n = a.nrows();
        let mut inv_diag = Vec::with_capacity(n);
        let mut e = vec![T::zero(); n];
        for i in 0..n {
            e[i] = T::one();
            let e_v = V::from(e.clone());
            let mut col_v = V::from(vec![T::zero(); n]);
            a.matvec(&e_v, &mut col_v);
            e[i] = T::zero();
            let d = col_v.as_ref()[i];
            if d == T::zero() || !d.is_finite() {
                return Err(KError::ZeroPivot(i));
            }
            inv_diag.push(T::one() / d);
        }
        self.inv_diag = inv_diag;
        Ok(())
    }

    fn apply(&self, x: &V, y: &mut V) -> Result<(), KError> {
        let x_ref = x.as_ref();
        if x_ref.len() != self.inv_diag.len() {
            return Err(KError::Computation("jacobi: apply before setup or size mismatch".into()));
        }
        for ((yi, &xi), &di) in y.as_mut().iter_mut().zip(x_ref).zip(&self.inv_diag) {
            *yi = di * xi;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn scales_by_inverse_diagonal() {
        let a = Mat::from_fn(3, 3, |i, j| if i == j { (i + 1) as f64 * 2.0 } else { 1.0 });
        let mut pc = Jacobi::<f64>::new();
        Preconditioner::<Mat<f64>, Vec<f64>>::setup(&mut pc, &a).unwrap();
        let mut z = vec![0.0; 3];
        Preconditioner::<Mat<f64>, Vec<f64>>::apply(&pc, &vec![2.0, 4.0, 6.0], &mut z).unwrap();
        assert_eq!(z, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_diagonal_is_an_error() {
        let a = Mat::from_fn(2, 2, |i, j| if i == j && i == 0 { 1.0 } else { 0.0 });
        let mut pc = Jacobi::<f64>::new();
        let err = Preconditioner::<Mat<f64>, Vec<f64>>::setup(&mut pc, &a).unwrap_err();
        assert_eq!(err, KError::ZeroPivot(1));
    }
}
