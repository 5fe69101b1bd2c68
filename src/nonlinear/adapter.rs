//! Adapter from a [`NonlinearProblem`] to the [`NewtonSystem`] the driver consumes.
//!
//! The adapter owns the problem, the last computed Jacobian and an optional
//! preconditioner handle. The handle remembers where the preconditioner comes from so
//! that the reuse policy can rebuild it without the driver knowing the source.

use crate::config::linear::ReusePolicy;
use crate::context::pc_context::PC;
use crate::core::traits::{Indexing, Real};
use crate::error::KError;
use crate::matrix::operator::JacobianOperator;
use crate::nonlinear::problem::{NewtonSystem, NonlinearProblem};
use crate::preconditioner::Preconditioner;

enum PcSource<T> {
    Builtin(PC<T>),
    User,
    Problem,
}

/// Preconditioner slot with its bookkeeping.
///
/// `age` counts the linear solves served since the last full build; `builds` counts full
/// builds and `recomputes` counts numeric refreshes.
pub struct PrecondHandle<J, T> {
    source: PcSource<T>,
    pc: Option<Box<dyn Preconditioner<J, Vec<T>>>>,
    built: bool,
    age: usize,
    builds: usize,
    recomputes: usize,
}

impl<J, T> PrecondHandle<J, T>
where
    J: JacobianOperator<T>,
    T: Real,
{
    fn new(source: PcSource<T>, pc: Option<Box<dyn Preconditioner<J, Vec<T>>>>) -> Self {
        Self { source, pc, built: false, age: 0, builds: 0, recomputes: 0 }
    }

    pub fn age(&self) -> usize {
        self.age
    }

    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn recomputes(&self) -> usize {
        self.recomputes
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Built-in kind, when the preconditioner was selected with `set_builtin_precond`.
    pub fn kind(&self) -> Option<&PC<T>> {
        match &self.source {
            PcSource::Builtin(kind) => Some(kind),
            _ => None,
        }
    }

    fn rebuild<P>(&mut self, problem: &mut P, x: &[T], jac: &J) -> Result<(), KError>
    where
        P: NonlinearProblem<T, Jacobian = J>,
    {
        self.built = false;
        match &self.source {
            PcSource::Builtin(kind) => {
                let mut pc = jac.make_preconditioner(kind)?;
                pc.setup(jac)?;
                self.pc = Some(pc);
            }
            PcSource::User => {
                let pc = self
                    .pc
                    .as_mut()
                    .ok_or_else(|| KError::Computation("user preconditioner slot is empty".into()))?;
                pc.setup(jac)?;
            }
            PcSource::Problem => {
                let pc = problem
                    .preconditioner(x, jac)?
                    .ok_or_else(|| KError::Computation("problem did not supply a preconditioner".into()))?;
                self.pc = Some(pc);
            }
        }
        self.built = true;
        self.builds += 1;
        self.age = 0;
        Ok(())
    }

    /// Numeric refresh. Built-in and user preconditioners keep their structure through
    /// `recompute`; a problem-supplied one is requested again from the problem.
    fn refresh<P>(&mut self, problem: &mut P, x: &[T], jac: &J) -> Result<(), KError>
    where
        P: NonlinearProblem<T, Jacobian = J>,
    {
        match &self.source {
            PcSource::Problem => {
                let pc = problem
                    .preconditioner(x, jac)?
                    .ok_or_else(|| KError::Computation("problem did not supply a preconditioner".into()))?;
                self.pc = Some(pc);
            }
            PcSource::Builtin(_) | PcSource::User => {
                let pc = self
                    .pc
                    .as_mut()
                    .ok_or_else(|| KError::Computation("preconditioner refreshed before it was built".into()))?;
                pc.recompute(jac)?;
            }
        }
        self.recomputes += 1;
        self.age = 0;
        Ok(())
    }
}

/// Exposes a [`NonlinearProblem`] to the Newton driver.
pub struct ProblemAdapter<P, T>
where
    P: NonlinearProblem<T>,
    T: Real,
{
    problem: P,
    jacobian: Option<P::Jacobian>,
    precond: Option<PrecondHandle<P::Jacobian, T>>,
    residual_evals: usize,
    jacobian_evals: usize,
}

impl<P, T> ProblemAdapter<P, T>
where
    P: NonlinearProblem<T>,
    T: Real,
{
    /// Wrap `problem`; no preconditioner is configured.
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            jacobian: None,
            precond: None,
            residual_evals: 0,
            jacobian_evals: 0,
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn problem_mut(&mut self) -> &mut P {
        &mut self.problem
    }

    pub fn into_problem(self) -> P {
        self.problem
    }

    pub fn precond_handle(&self) -> Option<&PrecondHandle<P::Jacobian, T>> {
        self.precond.as_ref()
    }

    pub fn num_residual_evals(&self) -> usize {
        self.residual_evals
    }

    pub fn num_jacobian_evals(&self) -> usize {
        self.jacobian_evals
    }

    /// Use a caller-owned preconditioner object; `setup` is called on every full build.
    pub fn set_precond(&mut self, pc: Box<dyn Preconditioner<P::Jacobian, Vec<T>>>) {
        self.precond = Some(PrecondHandle::new(PcSource::User, Some(pc)));
    }

    /// Use a built-in preconditioner constructed from each Jacobian.
    pub fn set_builtin_precond(&mut self, kind: PC<T>) {
        self.precond = Some(PrecondHandle::new(PcSource::Builtin(kind), None));
    }

    /// Use the preconditioner returned by [`NonlinearProblem::preconditioner`].
    pub fn use_problem_precond(&mut self) {
        self.precond = Some(PrecondHandle::new(PcSource::Problem, None));
    }

    pub fn clear_precond(&mut self) {
        self.precond = None;
    }
}

impl<P, T> NewtonSystem<T> for ProblemAdapter<P, T>
where
    P: NonlinearProblem<T>,
    T: Real,
{
    type Operator = P::Jacobian;

    fn ndof(&self) -> usize {
        self.problem.ndof()
    }

    fn compute_residual(&mut self, x: &[T], f: &mut [T]) -> Result<(), KError> {
        self.residual_evals += 1;
        self.problem.residual(x, f).map_err(KError::computation)?;
        if let Some(i) = f.iter().position(|v| !v.is_finite()) {
            return Err(KError::Computation(format!("residual entry {i} is not finite")));
        }
        Ok(())
    }

    fn compute_jacobian(&mut self, x: &[T]) -> Result<(), KError> {
        self.jacobian_evals += 1;
        let jac = self.problem.jacobian(x).map_err(KError::computation)?;
        if jac.nrows() != self.problem.ndof() {
            return Err(KError::Computation(format!(
                "jacobian has {} rows, problem has {} unknowns",
                jac.nrows(),
                self.problem.ndof()
            )));
        }
        self.jacobian = Some(jac);
        Ok(())
    }

    /// Reuse semantics: under [`ReusePolicy::Reuse`] each call ages the preconditioner by
    /// one and a full rebuild happens once the age reaches `max_age`.
    fn compute_preconditioner(&mut self, x: &[T], policy: ReusePolicy, max_age: usize) -> Result<(), KError> {
        let Some(handle) = self.precond.as_mut() else {
            return Ok(());
        };
        let jac = self
            .jacobian
            .as_ref()
            .ok_or_else(|| KError::Computation("preconditioner requested before any Jacobian".into()))?;
        let result = match policy {
            ReusePolicy::Rebuild => handle.rebuild(&mut self.problem, x, jac),
            ReusePolicy::Recompute if handle.is_built() => handle.refresh(&mut self.problem, x, jac),
            ReusePolicy::Reuse if handle.is_built() => {
                handle.age += 1;
                if handle.age >= max_age {
                    handle.rebuild(&mut self.problem, x, jac)
                } else {
                    Ok(())
                }
            }
            ReusePolicy::Recompute | ReusePolicy::Reuse => handle.rebuild(&mut self.problem, x, jac),
        };
        result.map_err(KError::computation)
    }

    fn jacobian(&self) -> Option<&P::Jacobian> {
        self.jacobian.as_ref()
    }

    fn preconditioner(&self) -> Option<&dyn Preconditioner<P::Jacobian, Vec<T>>> {
        self.precond
            .as_ref()
            .filter(|h| h.built)
            .and_then(|h| h.pc.as_deref())
    }

    fn set_time(&mut self, time: T) {
        self.problem.set_time(time);
    }

    fn set_time_step(&mut self, dt: T) {
        self.problem.set_time_step(dt);
    }
}
