//! Newton–Krylov driver.
//!
//! Each iteration solves J(x_k)·δx = −F(x_k) with the configured linear backend from a
//! zero initial guess, applies x_{k+1} = x_k + δx and evaluates the stopping tests. The
//! tests are also evaluated once before the first step, so an initial guess that already
//! satisfies them returns without touching the Jacobian.
//!
//! A failing residual, Jacobian, preconditioner or linear solve ends the run in
//! [`TerminalState::Failed`]; the diagnostics gathered up to that point stay readable.

use crate::config::linear::{LinearMethod, LinearSolverConfig, ReusePolicy};
use crate::config::output::OutputFlags;
use crate::context::ksp_context::{KspContext, LinearBackend};
use crate::core::traits::Real;
use crate::error::KError;
use crate::nonlinear::criteria::{ConvergenceCriteria, IterationData, Status, StatusTest};
use crate::nonlinear::problem::NewtonSystem;
use crate::nonlinear::state::{ConvergenceState, SolverStatus, TerminalState};
use crate::utils::norm::{NormType, norm};

/// Newton iteration over a [`NewtonSystem`], generic in the linear backend.
pub struct NewtonSolver<'a, S, T, B = KspContext>
where
    S: NewtonSystem<T>,
    T: Real,
{
    system: &'a mut S,
    backend: B,
    criteria: ConvergenceCriteria<T>,
    linear: LinearSolverConfig<T>,
    flags: OutputFlags,
    state: ConvergenceState<T>,
    status: SolverStatus,
    solution: Vec<T>,
}

impl<'a, S, T> NewtonSolver<'a, S, T, KspContext>
where
    S: NewtonSystem<T>,
    T: Real,
{
    /// Driver with default criteria, the default linear configuration and the built-in
    /// Krylov backend.
    pub fn new(system: &'a mut S) -> Self {
        Self::with_backend(system, KspContext::new())
    }
}

impl<'a, S, T, B> NewtonSolver<'a, S, T, B>
where
    S: NewtonSystem<T>,
    T: Real,
    B: LinearBackend<S::Operator, T>,
{
    pub fn with_backend(system: &'a mut S, backend: B) -> Self {
        Self {
            system,
            backend,
            criteria: ConvergenceCriteria::default(),
            linear: LinearSolverConfig::default(),
            flags: OutputFlags::default(),
            state: ConvergenceState::new(),
            status: SolverStatus::Initialized,
            solution: Vec::new(),
        }
    }

    // --- accessors ---

    pub fn system(&self) -> &S {
        &*self.system
    }

    pub fn system_mut(&mut self) -> &mut S {
        &mut *self.system
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Last accepted iterate of the most recent `solve`.
    pub fn solution(&self) -> &[T] {
        &self.solution
    }

    pub fn num_iters(&self) -> usize {
        self.state.iterations
    }

    /// Residual norm at the last evaluated iterate.
    pub fn residual(&self) -> T {
        self.state.residual
    }

    /// Linear iterations summed over the most recent `solve`.
    pub fn num_lin_iters(&self) -> usize {
        self.state.lin_iters
    }

    pub fn last_lin_iters(&self) -> usize {
        self.state.last_lin_iters
    }

    /// ‖b − J δx‖ / ‖b‖ reached by the most recent linear solve.
    pub fn achieved_tol(&self) -> T {
        self.state.achieved_tol
    }

    pub fn state(&self) -> &ConvergenceState<T> {
        &self.state
    }

    pub fn status(&self) -> &SolverStatus {
        &self.status
    }

    pub fn criteria(&self) -> &ConvergenceCriteria<T> {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut ConvergenceCriteria<T> {
        &mut self.criteria
    }

    pub fn linear_config(&self) -> &LinearSolverConfig<T> {
        &self.linear
    }

    pub fn output_flags(&self) -> OutputFlags {
        self.flags
    }

    // --- configuration ---

    pub fn set_criteria(&mut self, criteria: ConvergenceCriteria<T>) {
        self.criteria = criteria;
    }

    /// Replace the linear configuration; rejected configurations leave the old one in place.
    pub fn set_linear_config(&mut self, cfg: LinearSolverConfig<T>) -> Result<(), KError> {
        cfg.validate()?;
        self.linear = cfg;
        Ok(())
    }

    pub fn set_output_flags(&mut self, flags: OutputFlags) {
        self.flags = flags;
    }

    pub fn set_ls_type(&mut self, method: LinearMethod) {
        self.linear.method = method;
    }

    pub fn set_ls_max_iters(&mut self, iters: usize) {
        self.linear.max_iters = iters;
    }

    pub fn set_ls_tolerance(&mut self, tol: T) {
        self.linear.tol = tol;
    }

    pub fn set_ls_sizeof_krylov_subspace(&mut self, size: usize) {
        self.linear.krylov_size = size;
    }

    pub fn set_precond_reuse(&mut self, policy: ReusePolicy) {
        self.linear.reuse_policy = policy;
    }

    /// Only meaningful with [`ReusePolicy::Reuse`]; otherwise stored and a warning is logged.
    pub fn set_precond_max_age(&mut self, max_age: usize) {
        self.linear.max_age = max_age;
        if self.linear.reuse_policy != ReusePolicy::Reuse && self.flags.contains(OutputFlags::WARNING) {
            tracing::warn!(
                max_age,
                policy = ?self.linear.reuse_policy,
                "preconditioner max age has no effect unless the reuse policy is Reuse"
            );
        }
    }

    pub fn set_conv_iters(&mut self, iters: usize) {
        self.criteria.set_conv_iters(iters);
    }

    pub fn set_conv_abs_resid(&mut self, tol: T) {
        self.criteria.set_conv_abs_resid(tol);
    }

    pub fn set_conv_rel_resid(&mut self, tol: T) {
        self.criteria.set_conv_rel_resid(tol);
    }

    pub fn disable_abs_resid(&mut self) {
        self.criteria.disable_abs_resid();
    }

    pub fn disable_rel_resid(&mut self) {
        self.criteria.disable_rel_resid();
    }

    pub fn set_conv_update(&mut self, tol: T) {
        self.criteria.set_conv_update(tol);
    }

    pub fn set_conv_wrms(&mut self, rtol: T, atol: T) {
        self.criteria.set_conv_wrms(rtol, atol);
    }

    pub fn set_norm_type(&mut self, kind: NormType) {
        self.criteria.set_norm_type(kind);
    }

    pub fn set_scale_type(&mut self, scale: crate::utils::norm::ScaleType) {
        self.criteria.set_scale_type(scale);
    }

    pub fn set_time(&mut self, time: T) {
        self.system.set_time(time);
    }

    pub fn set_time_step(&mut self, dt: T) {
        self.system.set_time_step(dt);
    }

    // --- iteration ---

    /// Run Newton's method from `x`, updating it in place.
    ///
    /// Returns `Err` only for a dimension mismatch or an invalid linear configuration,
    /// both detected before any evaluation. Every other outcome is a [`TerminalState`].
    pub fn solve(&mut self, x: &mut [T]) -> Result<TerminalState, KError> {
        let n = self.system.ndof();
        if x.len() != n {
            return Err(KError::Configuration(format!(
                "state vector has {} entries, system has {} unknowns",
                x.len(),
                n
            )));
        }
        self.linear.validate()?;

        self.state = ConvergenceState::new();
        self.status = SolverStatus::Iterating;
        self.solution = x.to_vec();
        if self.enabled(OutputFlags::PARAMETERS) {
            tracing::info!(
                ndof = n,
                max_iters = self.criteria.max_iters,
                abs_resid = ?self.criteria.abs_resid,
                rel_resid = ?self.criteria.rel_resid,
                update = ?self.criteria.update,
                wrms = ?self.criteria.wrms,
                method = ?self.linear.method,
                linear_tol = %self.linear.tol,
                reuse = ?self.linear.reuse_policy,
                "newton: starting solve"
            );
        }

        let mut f = vec![T::zero(); n];
        if let Err(e) = self.system.compute_residual(x, &mut f) {
            return Ok(self.finish(TerminalState::Failed(e)));
        }
        let r0 = self.criteria.residual_norm(&f);
        self.state.initial_residual = r0;
        self.state.residual = r0;
        let status = self.evaluate(None);
        if let Some(done) = self.terminal(status) {
            return Ok(self.finish(done));
        }

        loop {
            if let Err(e) = self.system.compute_jacobian(x) {
                return Ok(self.finish(TerminalState::Failed(e)));
            }
            if let Err(e) =
                self.system
                    .compute_preconditioner(x, self.linear.reuse_policy, self.linear.max_age)
            {
                return Ok(self.finish(TerminalState::Failed(e)));
            }

            let rhs: Vec<T> = f.iter().map(|&v| -v).collect();
            let mut delta = vec![T::zero(); n];
            let Some(jac) = self.system.jacobian() else {
                let e = KError::Computation("system reported no Jacobian after computing it".into());
                return Ok(self.finish(TerminalState::Failed(e)));
            };
            let pc = self.system.preconditioner();
            let solved = self.backend.solve(&self.linear, jac, pc, &rhs, &mut delta);
            let stats = match solved {
                Ok(stats) => stats,
                Err(e) => return Ok(self.finish(TerminalState::Failed(KError::linear_solve(e)))),
            };
            let b_norm = norm(&rhs, NormType::Two);
            self.state.last_lin_iters = stats.iterations;
            self.state.lin_iters += stats.iterations;
            self.state.achieved_tol = if b_norm > T::zero() {
                stats.final_residual / b_norm
            } else {
                stats.final_residual
            };
            if self.enabled(OutputFlags::INNER_ITERATION) || self.enabled(OutputFlags::LINEAR_SOLVER_DETAILS) {
                tracing::debug!(
                    iteration = self.state.iterations,
                    lin_iters = stats.iterations,
                    achieved_tol = %self.state.achieved_tol,
                    converged = stats.converged,
                    "newton: linear solve"
                );
            }
            if !stats.converged {
                let e = KError::LinearSolve(format!(
                    "linear solve stopped after {} iterations at relative residual {}",
                    stats.iterations, self.state.achieved_tol
                ));
                return Ok(self.finish(TerminalState::Failed(e)));
            }

            let x_prev = x.to_vec();
            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi += *di;
            }
            self.solution.copy_from_slice(x);
            self.state.iterations += 1;
            self.state.update_norm = norm(&delta, NormType::Two);

            if let Err(e) = self.system.compute_residual(x, &mut f) {
                return Ok(self.finish(TerminalState::Failed(e)));
            }
            self.state.residual = self.criteria.residual_norm(&f);
            if self.enabled(OutputFlags::DEBUG) {
                tracing::trace!(iteration = self.state.iterations, ?delta, residual = ?f, "newton: step vectors");
            }
            let status = self.evaluate(Some((&delta[..], &x_prev[..])));
            if self.enabled(OutputFlags::OUTER_ITERATION) {
                tracing::info!(
                    iteration = self.state.iterations,
                    residual = %self.state.residual,
                    update = %self.state.update_norm,
                    lin_iters = stats.iterations,
                    "newton: step"
                );
            }
            if let Some(done) = self.terminal(status) {
                return Ok(self.finish(done));
            }
        }
    }

    fn enabled(&self, flag: OutputFlags) -> bool {
        self.flags.contains(flag)
    }

    fn evaluate(&self, step: Option<(&[T], &[T])>) -> Status {
        let data = IterationData {
            iteration: self.state.iterations,
            residual_norm: self.state.residual,
            initial_residual_norm: self.state.initial_residual,
            step,
        };
        if self.enabled(OutputFlags::OUTER_ITERATION_STATUS_TEST) {
            for test in [
                StatusTest::AbsResid,
                StatusTest::RelResid,
                StatusTest::Update,
                StatusTest::Wrms,
                StatusTest::MaxIters,
            ] {
                tracing::debug!(iteration = data.iteration, ?test, passed = self.criteria.test(test, &data), "newton: status test");
            }
        }
        if self.enabled(OutputFlags::TEST_DETAILS) {
            tracing::debug!(
                residual = %data.residual_norm,
                initial = %data.initial_residual_norm,
                norm = ?self.criteria.norm_type,
                scale = ?self.criteria.scale_type,
                "newton: residual norms"
            );
        }
        self.criteria.check(&data)
    }

    fn terminal(&self, status: Status) -> Option<TerminalState> {
        match status {
            Status::Unconverged => None,
            Status::Converged(test) => Some(TerminalState::Converged(test)),
            Status::Exhausted => Some(TerminalState::Exhausted),
        }
    }

    fn finish(&mut self, done: TerminalState) -> TerminalState {
        match &done {
            TerminalState::Failed(e) if self.enabled(OutputFlags::WARNING) => {
                tracing::warn!(iteration = self.state.iterations, error = %e, "newton: solve failed");
            }
            TerminalState::Exhausted if self.enabled(OutputFlags::WARNING) => {
                tracing::warn!(
                    iterations = self.state.iterations,
                    residual = %self.state.residual,
                    "newton: iteration limit reached"
                );
            }
            _ if self.enabled(OutputFlags::DETAILS) => {
                tracing::debug!(
                    iterations = self.state.iterations,
                    residual = %self.state.residual,
                    lin_iters = self.state.lin_iters,
                    outcome = ?done,
                    "newton: finished"
                );
            }
            _ => {}
        }
        self.status = SolverStatus::Finished(done.clone());
        done
    }
}
