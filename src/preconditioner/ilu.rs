//! ILU(0) factorization with zero fill (Saad §10.3).
//!
//! The sparsity pattern is captured once by `setup`; `recompute` refactors new values on
//! the stored pattern without rebuilding it.

use crate::preconditioner::Preconditioner;
use crate::core::traits::{Indexing, MatrixGet};
use crate::error::KError;
use num_traits::Float;

pub struct Ilu0<T> {
    pattern: Vec<Vec<usize>>,
    diag_pos: Vec<usize>,
    lu: Vec<Vec<T>>,
    pattern_builds: usize,
}

impl<T: Float> Ilu0<T> {
    pub fn new() -> Self {
        Self { pattern: Vec::new(), diag_pos: Vec::new(), lu: Vec::new(), pattern_builds: 0 }
    }

    /// How many times the sparsity pattern has been (re)built.
    pub fn pattern_builds(&self) -> usize {
        self.pattern_builds
    }

    fn build_pattern<M: MatrixGet<T> + Indexing>(&mut self, a: &M) {
        let n = a.nrows();
        self.pattern = Vec::with_capacity(n);
        self.diag_pos = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = a.row_pattern(i);
            let pos = match row.binary_search(&i) {
                Ok(p) => p,
                Err(p) => {
                    row.insert(p, i);
                    p
                }
            };
            self.pattern.push(row);
            self.diag_pos.push(pos);
        }
        self.pattern_builds += 1;
    }

    fn factor<M: MatrixGet<T>>(&mut self, a: &M) -> Result<(), KError> {
        self.lu = self
            .pattern
            .iter()
            .enumerate()
            .map(|(i, row)| row.iter().map(|&j| a.get(i, j)).collect())
            .collect();
        for i in 0..self.pattern.len() {
            let (done, rest) = self.lu.split_at_mut(i);
            let row = &mut rest[0];
            let cols = &self.pattern[i];
            for kk in 0..self.diag_pos[i] {
                let k = cols[kk];
                let pivot = done[k][self.diag_pos[k]];
                if pivot == T::zero() {
                    return Err(KError::ZeroPivot(k));
                }
                let lik = row[kk] / pivot;
                row[kk] = lik;
                for jj in (kk + 1)..cols.len() {
                    if let Ok(p) = self.pattern[k].binary_search(&cols[jj]) {
                        row[jj] = row[jj] - lik * done[k][p];
                    }
                }
            }
            let d = row[self.diag_pos[i]];
            if d == T::zero() || !d.is_finite() {
                return Err(KError::ZeroPivot(i));
            }
        }
        Ok(())
    }
}

impl<T: Float> Default for Ilu0<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, T> Preconditioner<M, Vec<T>> for Ilu0<T>
where
    M: MatrixGet<T> + Indexing,
    T: Float,
{
    fn setup(&mut self, a: &M) -> Result<(), KError> {
        self.build_pattern(a);
        self.factor(a)
    }

    fn recompute(&mut self, a: &M) -> Result<(), KError> {
        if self.pattern.len() != a.nrows() {
            return self.setup(a);
        }
        self.factor(a)
    }

    fn apply(&self, x: &Vec<T>, y: &mut Vec<T>) -> Result<(), KError> {
        let n = self.pattern.len();
        if x.len() != n || self.lu.len() != n {
            return Err(KError::Computation("ilu0: apply before setup or size mismatch".into()));
        }
        // solve L y1 = x
        let mut y1 = x.clone();
        for i in 0..n {
            let cols = &self.pattern[i];
            for kk in 0..self.diag_pos[i] {
                y1[i] = y1[i] - self.lu[i][kk] * y1[cols[kk]];
            }
        }
        // solve U y = y1
        for i in (0..n).rev() {
            let cols = &self.pattern[i];
            for jj in (self.diag_pos[i] + 1)..cols.len() {
                y1[i] = y1[i] - self.lu[i][jj] * y1[cols[jj]];
            }
            y1[i] = y1[i] / self.lu[i][self.diag_pos[i]];
        }
        *y = y1;
        Ok(())
    }
}
