use thiserror::Error;

// Unified error type for krynox

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KError {
    /// Residual, Jacobian or preconditioner assembly failed.
    #[error("computation error: {0}")]
    Computation(String),
    /// The inner linear solve broke down or did not reach its tolerance.
    #[error("linear solve error: {0}")]
    LinearSolve(String),
    /// Invalid parameter combination, rejected before any solve begins.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("factorization error: {0}")]
    FactorError(String),
    #[error("indefinite matrix detected (p^T A p <= 0)")]
    IndefiniteMatrix,
    #[error("krylov breakdown: {0}")]
    Breakdown(&'static str),
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl KError {
    /// Wrap any error raised while building a residual, Jacobian or preconditioner.
    pub fn computation(err: KError) -> Self {
        match err {
            KError::Computation(_) => err,
            other => KError::Computation(other.to_string()),
        }
    }

    /// Wrap any error raised by the inner linear solve.
    pub fn linear_solve(err: KError) -> Self {
        match err {
            KError::LinearSolve(_) => err,
            other => KError::LinearSolve(other.to_string()),
        }
    }
}
