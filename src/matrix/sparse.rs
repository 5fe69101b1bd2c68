// Compressed sparse row storage for assembled Jacobians

use crate::core::traits::{Indexing, MatVec, MatrixGet};
use crate::error::KError;
use faer::Mat;
use num_traits::Float;

/// Square or rectangular matrix in CSR format.
///
/// Column indices inside each row are kept sorted so that entry lookup is a binary search.
#[derive(Clone, Debug)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, KError> {
        if row_ptr.len() != nrows + 1 || row_ptr[0] != 0 {
            return Err(KError::Configuration(format!(
                "row_ptr must have {} entries starting at 0",
                nrows + 1
            )));
        }
        if col_idx.len() != values.len() || row_ptr[nrows] != values.len() {
            return Err(KError::Configuration(
                "col_idx, values and row_ptr[nrows] disagree on nnz".into(),
            ));
        }
        for i in 0..nrows {
            if row_ptr[i] > row_ptr[i + 1] {
                return Err(KError::Configuration(format!("row_ptr decreases at row {i}")));
            }
            let cols = &col_idx[row_ptr[i]..row_ptr[i + 1]];
            if cols.windows(2).any(|w| w[0] >= w[1]) || cols.iter().any(|&c| c >= ncols) {
                return Err(KError::Configuration(format!(
                    "row {i} has unsorted, duplicate or out-of-range columns"
                )));
            }
        }
        Ok(Self { nrows, ncols, row_ptr, col_idx, values })
    }

    /// Build from (row, col, value) triplets; duplicates are summed.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, T)]) -> Result<Self, KError> {
        let mut sorted: Vec<(usize, usize, T)> = triplets.to_vec();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;
        for (i, j, v) in sorted {
            if i >= nrows || j >= ncols {
                return Err(KError::Configuration(format!("triplet ({i}, {j}) out of range")));
            }
            if last == Some((i, j)) {
                if let Some(tail) = values.last_mut() {
                    *tail = *tail + v;
                }
                continue;
            }
            col_idx.push(j);
            values.push(v);
            row_ptr[i + 1] += 1;
            last = Some((i, j));
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        Self::from_csr(nrows, ncols, row_ptr, col_idx, values)
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Overwrite the stored values, keeping the sparsity pattern.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Dense copy, used by the direct solve.
    pub fn to_dense(&self) -> Mat<T> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }

    /// Serial SpMV: y = A x.
    pub fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = self.row_dot(i, x);
        }
    }

    fn row_dot(&self, i: usize, x: &[T]) -> T {
        let (lo, hi) = (self.row_ptr[i], self.row_ptr[i + 1]);
        self.col_idx[lo..hi]
            .iter()
            .zip(&self.values[lo..hi])
            .fold(T::zero(), |acc, (&j, &v)| acc + v * x[j])
    }
}

#[cfg(feature = "rayon")]
impl<T: Float + Send + Sync> CsrMatrix<T> {
    /// Parallel SpMV using Rayon
    pub fn spmv_parallel(&self, x: &[T], y: &mut [T]) {
        use rayon::prelude::*;
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        y.par_iter_mut().enumerate().for_each(|(i, yi)| {
            *yi = self.row_dot(i, x);
        });
    }
}

impl<T: Float + Send + Sync> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        #[cfg(feature = "rayon")]
        {
            self.spmv_parallel(x, y);
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.spmv(x, y);
        }
    }
}

impl<T> Indexing for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
}

impl<T: Float> MatrixGet<T> for CsrMatrix<T> {
    fn get(&self, i: usize, j: usize) -> T {
        let (lo, hi) = (self.row_ptr[i], self.row_ptr[i + 1]);
        match self.col_idx[lo..hi].binary_search(&j) {
            Ok(k) => self.values[lo + k],
            Err(_) => T::zero(),
        }
    }

    fn row_pattern(&self, i: usize) -> Vec<usize> {
        self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]].to_vec()
    }
}
