//! Stopping tests for the Newton iteration.
//!
//! The residual and step tests are combined with a logical OR; `max_iters` is always
//! active and is only consulted after the other tests of the same iteration failed,
//! so a run that converges on its last allowed iteration counts as converged.

use crate::core::traits::Real;
use crate::utils::norm::{NormType, ScaleType, norm, scaled_norm, wrms_norm};

/// Individual stopping tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTest {
    /// ‖F(x)‖ ≤ tol
    AbsResid,
    /// ‖F(x)‖ / ‖F(x₀)‖ ≤ tol
    RelResid,
    /// ‖δx‖ ≤ tol
    Update,
    /// WRMS norm of δx ≤ 1
    Wrms,
    MaxIters,
}

/// Outcome of evaluating the criteria after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unconverged,
    Converged(StatusTest),
    Exhausted,
}

/// Relative and absolute tolerances of the WRMS test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrmsTolerances<T> {
    pub rtol: T,
    pub atol: T,
}

/// Values one check is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct IterationData<'a, T> {
    /// Newton iterations completed (0 before the first step).
    pub iteration: usize,
    /// ‖F(x_k)‖ in the configured norm.
    pub residual_norm: T,
    /// ‖F(x₀)‖ in the configured norm.
    pub initial_residual_norm: T,
    /// Last step δx and the iterate it was applied to; `None` at iteration 0.
    pub step: Option<(&'a [T], &'a [T])>,
}

pub const DEFAULT_MAX_ITERS: usize = 10;
pub const DEFAULT_ABS_RESID: f64 = 1e-6;
pub const DEFAULT_REL_RESID: f64 = 1e-2;
pub const DEFAULT_UPDATE: f64 = 1e-5;
pub const DEFAULT_WRMS_RTOL: f64 = 1e-2;
pub const DEFAULT_WRMS_ATOL: f64 = 1e-8;

/// Composable Newton stopping tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceCriteria<T> {
    pub max_iters: usize,
    pub abs_resid: Option<T>,
    pub rel_resid: Option<T>,
    pub update: Option<T>,
    pub wrms: Option<WrmsTolerances<T>>,
    pub norm_type: NormType,
    pub scale_type: ScaleType,
}

impl<T: Real> Default for ConvergenceCriteria<T> {
    fn default() -> Self {
        Self {
            max_iters: DEFAULT_MAX_ITERS,
            abs_resid: Some(T::lit(DEFAULT_ABS_RESID)),
            rel_resid: Some(T::lit(DEFAULT_REL_RESID)),
            update: None,
            wrms: None,
            norm_type: NormType::default(),
            scale_type: ScaleType::default(),
        }
    }
}

impl<T: Real> ConvergenceCriteria<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_conv_iters(&mut self, iters: usize) {
        self.max_iters = iters;
    }

    pub fn set_conv_abs_resid(&mut self, tol: T) {
        self.abs_resid = Some(tol);
    }

    pub fn set_conv_rel_resid(&mut self, tol: T) {
        self.rel_resid = Some(tol);
    }

    pub fn disable_abs_resid(&mut self) {
        self.abs_resid = None;
    }

    pub fn disable_rel_resid(&mut self) {
        self.rel_resid = None;
    }

    pub fn set_conv_update(&mut self, tol: T) {
        self.update = Some(tol);
    }

    pub fn disable_update(&mut self) {
        self.update = None;
    }

    pub fn set_conv_wrms(&mut self, rtol: T, atol: T) {
        self.wrms = Some(WrmsTolerances { rtol, atol });
    }

    pub fn disable_wrms(&mut self) {
        self.wrms = None;
    }

    pub fn set_norm_type(&mut self, kind: NormType) {
        self.norm_type = kind;
    }

    pub fn set_scale_type(&mut self, scale: ScaleType) {
        self.scale_type = scale;
    }

    /// Residual norm used by the residual tests.
    pub fn residual_norm(&self, f: &[T]) -> T {
        scaled_norm(f, self.norm_type, self.scale_type)
    }

    /// Evaluate a single test. `MaxIters` holds once the iteration budget is spent.
    pub fn test(&self, which: StatusTest, data: &IterationData<'_, T>) -> bool {
        match which {
            StatusTest::AbsResid => self.abs_resid.is_some_and(|tol| data.residual_norm <= tol),
            StatusTest::RelResid => self.rel_resid.is_some_and(|tol| {
                data.initial_residual_norm > T::zero()
                    && data.residual_norm / data.initial_residual_norm <= tol
            }),
            StatusTest::Update => match (self.update, data.step) {
                (Some(tol), Some((delta, _))) => norm(delta, self.norm_type) <= tol,
                _ => false,
            },
            StatusTest::Wrms => match (self.wrms, data.step) {
                (Some(w), Some((delta, x_prev))) => {
                    wrms_norm(delta, x_prev, w.rtol, w.atol).is_ok_and(|v| v <= T::one())
                }
                _ => false,
            },
            StatusTest::MaxIters => data.iteration >= self.max_iters,
        }
    }

    /// Combined status: the first satisfied convergence test wins, then `MaxIters`.
    pub fn check(&self, data: &IterationData<'_, T>) -> Status {
        const ORDER: [StatusTest; 4] = [
            StatusTest::AbsResid,
            StatusTest::RelResid,
            StatusTest::Update,
            StatusTest::Wrms,
        ];
        if let Some(&hit) = ORDER.iter().find(|&&t| self.test(t, data)) {
            return Status::Converged(hit);
        }
        if self.test(StatusTest::MaxIters, data) {
            Status::Exhausted
        } else {
            Status::Unconverged
        }
    }
}
