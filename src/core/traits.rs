//! Core linear-algebra traits for krynox.

use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Real scalar type accepted by the solvers (in practice `f64`).
pub trait Real:
    Float
    + FromPrimitive
    + From<f64>
    + Debug
    + Display
    + std::iter::Sum
    + std::ops::AddAssign
    + Send
    + Sync
    + 'static
{
    /// Convert an `f64` literal into `Self`.
    fn lit(v: f64) -> Self {
        <Self as From<f64>>::from(v)
    }
}

impl<T> Real for T where
    T: Float
        + FromPrimitive
        + From<f64>
        + Debug
        + Display
        + std::iter::Sum
        + std::ops::AddAssign
        + Send
        + Sync
        + 'static
{
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Inner products & norms.
pub trait InnerProduct<V> {
    /// Associated scalar type.
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Compute dot(x, y).
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// Uniform indexing into vectors (dense or sparse).
pub trait Indexing {
    /// Number of rows (or length for a vector).
    fn nrows(&self) -> usize;
}

/// Entry access for assembled matrices; missing entries read as zero.
pub trait MatrixGet<T> {
    fn get(&self, i: usize, j: usize) -> T;

    /// Column indices of the stored entries of row `i`, ascending.
    fn row_pattern(&self, i: usize) -> Vec<usize>;
}
