//! Configuration of the inner linear solve performed at every Newton step.

use crate::core::traits::Real;
use crate::error::KError;

/// Linear solution method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinearMethod {
    /// Restarted GMRES (right-preconditioned).
    #[default]
    Gmres,
    /// Conjugate Gradient (SPD Jacobians only).
    Cg,
    /// Conjugate Gradient Squared.
    Cgs,
    /// Transpose-free QMR.
    Tfqmr,
    /// BiCGStab.
    BiCgStab,
    /// Dense direct LU; needs an assembled Jacobian.
    Lu,
}

/// When the preconditioner is rebuilt between Newton steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReusePolicy {
    /// Rebuild from scratch before every linear solve.
    #[default]
    Rebuild,
    /// Build once and reuse until it reaches `max_age` solves.
    Reuse,
    /// Refresh numeric values before every solve, keeping the structure.
    Recompute,
}

pub const DEFAULT_LINEAR_MAX_ITERS: usize = 800;
pub const DEFAULT_LINEAR_TOL: f64 = 1e-8;
pub const DEFAULT_KRYLOV_SIZE: usize = 50;
pub const DEFAULT_MAX_AGE: usize = 999;

/// Inner-solve parameters.
///
/// `tol` is relative to the norm of the right-hand side. `krylov_size` is the GMRES
/// restart length and is ignored by the other methods.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolverConfig<T> {
    pub method: LinearMethod,
    pub max_iters: usize,
    pub tol: T,
    pub krylov_size: usize,
    pub reuse_policy: ReusePolicy,
    pub max_age: usize,
}

impl<T: Real> Default for LinearSolverConfig<T> {
    fn default() -> Self {
        Self {
            method: LinearMethod::default(),
            max_iters: DEFAULT_LINEAR_MAX_ITERS,
            tol: T::lit(DEFAULT_LINEAR_TOL),
            krylov_size: DEFAULT_KRYLOV_SIZE,
            reuse_policy: ReusePolicy::default(),
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl<T: Real> LinearSolverConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: LinearMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_tol(mut self, tol: T) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_krylov_size(mut self, krylov_size: usize) -> Self {
        self.krylov_size = krylov_size;
        self
    }

    pub fn with_reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }

    /// Max age only matters under [`ReusePolicy::Reuse`]; with any other policy the
    /// value is stored and ignored.
    pub fn with_max_age(mut self, max_age: usize) -> Self {
        self.max_age = max_age;
        self
    }

    /// Reject parameter combinations that cannot drive a solve.
    pub fn validate(&self) -> Result<(), KError> {
        if !self.tol.is_finite() || self.tol <= T::zero() {
            return Err(KError::Configuration(format!(
                "linear tolerance must be finite and positive, got {}",
                self.tol
            )));
        }
        if self.max_iters == 0 {
            return Err(KError::Configuration("linear max iterations must be positive".into()));
        }
        if self.method == LinearMethod::Gmres && self.krylov_size == 0 {
            return Err(KError::Configuration("GMRES krylov subspace size must be positive".into()));
        }
        Ok(())
    }
}
