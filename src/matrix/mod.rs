//! Matrix module: dense and sparse matrix types and the Jacobian operator trait.

pub mod dense;
pub use dense::DenseMatrix;
pub mod operator;
pub use operator::JacobianOperator;
pub mod sparse;
pub use sparse::CsrMatrix;
