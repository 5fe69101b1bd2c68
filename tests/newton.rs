//! Integration tests for the Newton driver.
//!
//! Two model problems are used: a linear system F(x) = A x − b with a dense Jacobian, and a
//! cubic reaction-diffusion chain F(x)_i = 2x_i − x_{i−1} − x_{i+1} + x_i³ − c_i with a CSR
//! Jacobian whose exact solution is x = 0.5 everywhere.

use approx::assert_abs_diff_eq;
use faer::Mat;
use krynox::{
    ConvergenceCriteria, CsrMatrix, Indexing, Jacobi, JacobianOperator, KError, KspContext, LinearBackend,
    LinearMethod, LinearSolverConfig, MatVec, NewtonSolver, NewtonSystem, NonlinearProblem, OutputFlags, PC,
    Preconditioner, ProblemAdapter, ReusePolicy, SolveStats, SolverStatus, StatusTest, TerminalState,
};

// --- model problems ---

struct Linear {
    a: Mat<f64>,
    b: Vec<f64>,
}

impl Linear {
    fn new(n: usize) -> Self {
        let a = Mat::from_fn(n, n, |i, j| {
            if i == j {
                4.0
            } else if j == i + 1 {
                -1.0
            } else if i == j + 1 {
                -2.0
            } else {
                0.0
            }
        });
        let b = (0..n).map(|i| 1.0 + i as f64).collect();
        Self { a, b }
    }
}

impl NonlinearProblem<f64> for Linear {
    type Jacobian = Mat<f64>;

    fn ndof(&self) -> usize {
        self.b.len()
    }

    fn residual(&mut self, x: &[f64], f: &mut [f64]) -> Result<(), KError> {
        let mut ax = vec![0.0; x.len()];
        self.a.matvec(&x.to_vec(), &mut ax);
        for ((fi, axi), bi) in f.iter_mut().zip(&ax).zip(&self.b) {
            *fi = axi - bi;
        }
        Ok(())
    }

    fn jacobian(&mut self, _x: &[f64]) -> Result<Mat<f64>, KError> {
        Ok(self.a.clone())
    }
}

/// Cubic chain with exact solution 0.5. Optionally fails the residual at a given call.
struct Cubic {
    n: usize,
    residual_calls: usize,
    fail_at_call: Option<usize>,
    time: Option<f64>,
    time_step: Option<f64>,
}

impl Cubic {
    fn new(n: usize) -> Self {
        Self { n, residual_calls: 0, fail_at_call: None, time: None, time_step: None }
    }

    fn source(&self, i: usize) -> f64 {
        let boundary = if i == 0 || i + 1 == self.n { 0.5 } else { 0.0 };
        boundary + 0.125
    }
}

impl NonlinearProblem<f64> for Cubic {
    type Jacobian = CsrMatrix<f64>;

    fn ndof(&self) -> usize {
        self.n
    }

    fn residual(&mut self, x: &[f64], f: &mut [f64]) -> Result<(), KError> {
        self.residual_calls += 1;
        if self.fail_at_call == Some(self.residual_calls) {
            return Err(KError::Computation("cubic: residual evaluation failed".into()));
        }
        for i in 0..self.n {
            let left = if i > 0 { x[i - 1] } else { 0.0 };
            let right = if i + 1 < self.n { x[i + 1] } else { 0.0 };
            f[i] = 2.0 * x[i] - left - right + x[i].powi(3) - self.source(i);
        }
        Ok(())
    }

    fn jacobian(&mut self, x: &[f64]) -> Result<CsrMatrix<f64>, KError> {
        let mut triplets = Vec::with_capacity(3 * self.n);
        for i in 0..self.n {
            triplets.push((i, i, 2.0 + 3.0 * x[i] * x[i]));
            if i > 0 {
                triplets.push((i, i - 1, -1.0));
            }
            if i + 1 < self.n {
                triplets.push((i, i + 1, -1.0));
            }
        }
        CsrMatrix::from_triplets(self.n, self.n, &triplets)
    }

    fn set_time(&mut self, time: f64) {
        self.time = Some(time);
    }

    fn set_time_step(&mut self, dt: f64) {
        self.time_step = Some(dt);
    }
}

/// Identity-plus-diagonal operator that only offers a matrix-vector product.
struct Shifted {
    diag: Vec<f64>,
}

impl MatVec<Vec<f64>> for Shifted {
    fn matvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) {
        for ((yi, xi), di) in y.iter_mut().zip(x).zip(&self.diag) {
            *yi = di * xi;
        }
    }
}

impl Indexing for Shifted {
    fn nrows(&self) -> usize {
        self.diag.len()
    }
}

impl JacobianOperator<f64> for Shifted {}

/// F(x)_i = x_i + x_i³ − 2, solution x = 1.
struct MatrixFree {
    n: usize,
}

impl NonlinearProblem<f64> for MatrixFree {
    type Jacobian = Shifted;

    fn ndof(&self) -> usize {
        self.n
    }

    fn residual(&mut self, x: &[f64], f: &mut [f64]) -> Result<(), KError> {
        for (fi, xi) in f.iter_mut().zip(x) {
            *fi = xi + xi.powi(3) - 2.0;
        }
        Ok(())
    }

    fn jacobian(&mut self, x: &[f64]) -> Result<Shifted, KError> {
        Ok(Shifted { diag: x.iter().map(|xi| 1.0 + 3.0 * xi * xi).collect() })
    }
}

/// F(x)_i = x_i³ − 8 with a dense diagonal Jacobian, solution x = 2. Supplies its own
/// Jacobi preconditioner and counts how often it is asked for one.
struct Cubes {
    n: usize,
    precond_calls: usize,
    fail_jacobian: bool,
}

impl Cubes {
    fn new(n: usize) -> Self {
        Self { n, precond_calls: 0, fail_jacobian: false }
    }
}

impl NonlinearProblem<f64> for Cubes {
    type Jacobian = Mat<f64>;

    fn ndof(&self) -> usize {
        self.n
    }

    fn residual(&mut self, x: &[f64], f: &mut [f64]) -> Result<(), KError> {
        for (fi, xi) in f.iter_mut().zip(x) {
            *fi = xi.powi(3) - 8.0;
        }
        Ok(())
    }

    fn jacobian(&mut self, x: &[f64]) -> Result<Mat<f64>, KError> {
        if self.fail_jacobian {
            return Err(KError::FactorError("cubes: jacobian assembly failed".into()));
        }
        Ok(Mat::from_fn(self.n, self.n, |i, j| if i == j { 3.0 * x[i] * x[i] } else { 0.0 }))
    }

    fn preconditioner(
        &mut self,
        _x: &[f64],
        jac: &Mat<f64>,
    ) -> Result<Option<Box<dyn Preconditioner<Mat<f64>, Vec<f64>>>>, KError> {
        self.precond_calls += 1;
        let mut pc = Jacobi::<f64>::new();
        Preconditioner::<Mat<f64>, Vec<f64>>::setup(&mut pc, jac)?;
        Ok(Some(Box::new(pc)))
    }
}

fn tight(solver_crit: &mut ConvergenceCriteria<f64>) {
    solver_crit.set_conv_abs_resid(1e-10);
    solver_crit.disable_rel_resid();
    solver_crit.set_conv_iters(20);
}

// --- convergence ---

#[test]
fn linear_problem_converges_after_one_exact_step() {
    let mut adapter = ProblemAdapter::new(Linear::new(6));
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.set_ls_type(LinearMethod::Lu);
    let mut x = vec![0.0; 6];
    let outcome = newton.solve(&mut x).unwrap();
    assert_eq!(outcome, TerminalState::Converged(StatusTest::AbsResid));
    assert_eq!(newton.num_iters(), 1);
    assert!(newton.residual() < 1e-10);
    assert_eq!(newton.solution(), &x[..]);
    assert_eq!(newton.status(), &SolverStatus::Finished(outcome));
}

#[test]
fn cubic_problem_converges_with_every_method() {
    for method in [
        LinearMethod::Gmres,
        LinearMethod::Cg,
        LinearMethod::Cgs,
        LinearMethod::Tfqmr,
        LinearMethod::BiCgStab,
        LinearMethod::Lu,
    ] {
        let mut adapter = ProblemAdapter::new(Cubic::new(12));
        let mut newton = NewtonSolver::new(&mut adapter);
        tight(newton.criteria_mut());
        newton.set_ls_type(method);
        newton.set_ls_tolerance(1e-10);
        let mut x = vec![0.0; 12];
        let outcome = newton.solve(&mut x).unwrap();
        assert!(outcome.is_converged(), "{method:?}: {outcome:?}");
        assert!(newton.num_iters() <= 10, "{method:?} took {} iterations", newton.num_iters());
        for xi in &x {
            assert_abs_diff_eq!(*xi, 0.5, epsilon = 1e-8);
        }
    }
}

#[test]
fn builtin_preconditioners_rebuild_every_step() {
    for kind in [PC::Jacobi, PC::Ssor { omega: 1.0 }, PC::Ilu0] {
        let mut adapter = ProblemAdapter::new(Cubic::new(20));
        adapter.set_builtin_precond(kind.clone());
        let mut newton = NewtonSolver::new(&mut adapter);
        tight(newton.criteria_mut());
        let mut x = vec![0.0; 20];
        let outcome = newton.solve(&mut x).unwrap();
        assert!(outcome.is_converged(), "{kind:?}: {outcome:?}");
        let iters = newton.num_iters();
        let builds = adapter.precond_handle().unwrap().builds();
        assert_eq!(builds, iters, "Rebuild builds once per linear solve");
    }
}

#[test]
fn ilu0_makes_the_inner_solve_exact_on_a_tridiagonal_jacobian() {
    let mut adapter = ProblemAdapter::new(Cubic::new(30));
    adapter.set_builtin_precond(PC::Ilu0);
    let mut newton = NewtonSolver::new(&mut adapter);
    tight(newton.criteria_mut());
    let mut x = vec![0.0; 30];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    assert!(newton.last_lin_iters() <= 2);
}

#[test]
fn update_and_wrms_tests_stop_the_iteration() {
    let mut adapter = ProblemAdapter::new(Cubic::new(8));
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.disable_abs_resid();
    newton.disable_rel_resid();
    newton.set_conv_update(1e-9);
    newton.set_conv_iters(20);
    let mut x = vec![0.0; 8];
    assert_eq!(newton.solve(&mut x).unwrap(), TerminalState::Converged(StatusTest::Update));
    assert!(newton.state().update_norm <= 1e-9);

    let mut crit = ConvergenceCriteria::<f64>::new();
    crit.disable_abs_resid();
    crit.disable_rel_resid();
    crit.set_conv_wrms(1e-6, 1e-10);
    crit.set_conv_iters(20);
    newton.set_criteria(crit);
    let mut x = vec![0.0; 8];
    assert_eq!(newton.solve(&mut x).unwrap(), TerminalState::Converged(StatusTest::Wrms));
}

#[test]
fn iteration_budget_is_exhausted() {
    let mut adapter = ProblemAdapter::new(Cubic::new(8));
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.set_conv_iters(1);
    newton.set_conv_abs_resid(1e-14);
    newton.disable_rel_resid();
    let mut x = vec![0.0; 8];
    assert_eq!(newton.solve(&mut x).unwrap(), TerminalState::Exhausted);
    assert_eq!(newton.num_iters(), 1);
}

#[test]
fn zero_initial_residual_never_converges_by_relative_test() {
    let mut problem = Linear::new(4);
    problem.b = vec![0.0; 4];
    let mut adapter = ProblemAdapter::new(problem);
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.disable_abs_resid();
    newton.set_conv_iters(3);
    let mut x = vec![0.0; 4];
    assert_eq!(newton.solve(&mut x).unwrap(), TerminalState::Exhausted);
    assert_eq!(newton.num_iters(), 3);
    assert_eq!(x, vec![0.0; 4]);
}

// --- preconditioner reuse ---

#[test]
fn reuse_builds_once_and_ages_across_solves() {
    let mut adapter = ProblemAdapter::new(Cubic::new(10));
    adapter.set_builtin_precond(PC::Ilu0);
    let mut newton = NewtonSolver::new(&mut adapter);
    tight(newton.criteria_mut());
    newton.set_precond_reuse(ReusePolicy::Reuse);
    let mut x = vec![0.0; 10];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let first = newton.num_iters();
    let mut x = vec![0.1; 10];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let second = newton.num_iters();

    let handle = adapter.precond_handle().unwrap();
    assert_eq!(handle.builds(), 1);
    assert_eq!(handle.age(), first + second - 1);
}

#[test]
fn reuse_rebuilds_when_max_age_is_reached() {
    let mut adapter = ProblemAdapter::new(Cubic::new(10));
    adapter.set_builtin_precond(PC::Jacobi);
    let mut newton = NewtonSolver::new(&mut adapter);
    tight(newton.criteria_mut());
    newton.set_precond_reuse(ReusePolicy::Reuse);
    newton.set_precond_max_age(2);
    let mut x = vec![0.0; 10];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let iters = newton.num_iters();
    // builds happen at solves 1, 3, 5, ...
    assert_eq!(adapter.precond_handle().unwrap().builds(), iters.div_ceil(2));
}

#[test]
fn recompute_keeps_structure_and_refreshes_values() {
    let mut adapter = ProblemAdapter::new(Cubic::new(10));
    adapter.set_builtin_precond(PC::Ilu0);
    let mut newton = NewtonSolver::new(&mut adapter);
    tight(newton.criteria_mut());
    newton.set_precond_reuse(ReusePolicy::Recompute);
    let mut x = vec![0.0; 10];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let iters = newton.num_iters();
    let handle = adapter.precond_handle().unwrap();
    assert_eq!(handle.builds(), 1);
    assert_eq!(handle.recomputes(), iters - 1);
    assert_eq!(handle.age(), 0);
}

#[test]
fn recompute_asks_the_problem_for_a_fresh_preconditioner() {
    let mut adapter = ProblemAdapter::new(Cubes::new(4));
    adapter.use_problem_precond();
    let mut newton = NewtonSolver::new(&mut adapter);
    tight(newton.criteria_mut());
    newton.set_precond_reuse(ReusePolicy::Recompute);
    let mut x = vec![1.0; 4];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let iters = newton.num_iters();
    assert!(iters > 1);
    for xi in &x {
        assert_abs_diff_eq!(*xi, 2.0, epsilon = 1e-10);
    }

    let handle = adapter.precond_handle().unwrap();
    assert_eq!(handle.builds(), 1);
    assert_eq!(handle.recomputes(), iters - 1);
    assert_eq!(adapter.problem().precond_calls, iters);
}

#[test]
fn max_age_without_reuse_is_not_an_error() {
    let mut adapter = ProblemAdapter::new(Cubic::new(6));
    adapter.set_builtin_precond(PC::Jacobi);
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.set_precond_reuse(ReusePolicy::Recompute);
    newton.set_precond_max_age(3);
    assert_eq!(newton.linear_config().max_age, 3);
    let mut x = vec![0.0; 6];
    assert!(newton.solve(&mut x).is_ok());
}

// --- failures ---

#[test]
fn first_residual_failure_fails_at_iteration_zero() {
    let mut problem = Cubic::new(5);
    problem.fail_at_call = Some(1);
    let mut adapter = ProblemAdapter::new(problem);
    let mut newton = NewtonSolver::new(&mut adapter);
    let mut x = vec![0.25; 5];
    let outcome = newton.solve(&mut x).unwrap();
    assert!(matches!(outcome, TerminalState::Failed(KError::Computation(_))));
    assert_eq!(newton.num_iters(), 0);
    assert_eq!(x, vec![0.25; 5]);
}

#[test]
fn later_residual_failure_keeps_the_last_update() {
    let mut problem = Cubic::new(5);
    problem.fail_at_call = Some(2);
    let mut adapter = ProblemAdapter::new(problem);
    let mut newton = NewtonSolver::new(&mut adapter);
    let mut x = vec![0.0; 5];
    let outcome = newton.solve(&mut x).unwrap();
    assert!(matches!(outcome, TerminalState::Failed(KError::Computation(_))));
    assert_eq!(newton.num_iters(), 1);
    assert_eq!(newton.solution(), &x[..]);
    assert!(x.iter().any(|&v| v != 0.0));
}

#[test]
fn preconditioner_build_failure_stops_before_the_linear_solve() {
    let mut adapter = ProblemAdapter::new(Cubes::new(3));
    adapter.set_builtin_precond(PC::Jacobi);
    let mut newton = NewtonSolver::new(&mut adapter);
    // J = diag(3x²) has a zero diagonal at x = 0
    let mut x = vec![0.0; 3];
    let outcome = newton.solve(&mut x).unwrap();
    assert!(matches!(outcome, TerminalState::Failed(KError::Computation(_))), "{outcome:?}");
    assert_eq!(newton.num_iters(), 0);
    assert_eq!(newton.backend().num_solves(), 0);
    assert_eq!(x, vec![0.0; 3]);
    assert!(!adapter.precond_handle().unwrap().is_built());
}

#[test]
fn jacobian_failure_fails_the_step() {
    let mut problem = Cubes::new(3);
    problem.fail_jacobian = true;
    let mut adapter = ProblemAdapter::new(problem);
    let mut newton = NewtonSolver::new(&mut adapter);
    let mut x = vec![1.0; 3];
    let outcome = newton.solve(&mut x).unwrap();
    match outcome {
        TerminalState::Failed(KError::Computation(msg)) => assert!(msg.contains("jacobian assembly failed")),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(newton.num_iters(), 0);
    assert_eq!(newton.backend().num_solves(), 0);
    assert_eq!(newton.residual(), newton.state().initial_residual);
    assert_eq!(x, vec![1.0; 3]);
}

struct BrokenBackend;

impl<M> LinearBackend<M, f64> for BrokenBackend {
    fn solve(
        &mut self,
        _cfg: &LinearSolverConfig<f64>,
        _a: &M,
        _pc: Option<&dyn Preconditioner<M, Vec<f64>>>,
        _b: &Vec<f64>,
        _x: &mut Vec<f64>,
    ) -> Result<SolveStats<f64>, KError> {
        Err(KError::Breakdown("injected"))
    }
}

struct StalledBackend;

impl<M> LinearBackend<M, f64> for StalledBackend {
    fn solve(
        &mut self,
        cfg: &LinearSolverConfig<f64>,
        _a: &M,
        _pc: Option<&dyn Preconditioner<M, Vec<f64>>>,
        _b: &Vec<f64>,
        _x: &mut Vec<f64>,
    ) -> Result<SolveStats<f64>, KError> {
        Ok(SolveStats { iterations: cfg.max_iters, final_residual: 0.5, converged: false })
    }
}

#[test]
fn linear_backend_error_fails_the_step() {
    let mut adapter = ProblemAdapter::new(Cubic::new(5));
    let mut newton = NewtonSolver::with_backend(&mut adapter, BrokenBackend);
    let mut x = vec![0.0; 5];
    let outcome = newton.solve(&mut x).unwrap();
    match outcome {
        TerminalState::Failed(KError::LinearSolve(msg)) => assert!(msg.contains("injected")),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(newton.num_iters(), 0);
    assert!(newton.residual() > 0.0);
    assert_eq!(newton.residual(), newton.state().initial_residual);
}

#[test]
fn unconverged_linear_solve_fails_with_diagnostics() {
    let mut adapter = ProblemAdapter::new(Cubic::new(5));
    let mut newton = NewtonSolver::with_backend(&mut adapter, StalledBackend);
    newton.set_ls_max_iters(7);
    let mut x = vec![0.0; 5];
    let outcome = newton.solve(&mut x).unwrap();
    assert!(matches!(outcome, TerminalState::Failed(KError::LinearSolve(_))));
    assert_eq!(newton.last_lin_iters(), 7);
    assert_eq!(newton.num_lin_iters(), 7);
    assert!(newton.achieved_tol() > 0.0);
}

#[test]
fn direct_solve_needs_an_assembled_jacobian() {
    let mut adapter = ProblemAdapter::new(MatrixFree { n: 3 });
    let mut newton = NewtonSolver::new(&mut adapter);
    newton.set_ls_type(LinearMethod::Lu);
    let mut x = vec![0.0; 3];
    let outcome = newton.solve(&mut x).unwrap();
    assert!(matches!(outcome, TerminalState::Failed(KError::LinearSolve(_))));

    newton.set_ls_type(LinearMethod::Gmres);
    newton.set_conv_abs_resid(1e-12);
    newton.disable_rel_resid();
    newton.set_conv_iters(20);
    let mut x = vec![0.0; 3];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    for xi in &x {
        assert_abs_diff_eq!(*xi, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn dimension_mismatch_and_bad_configuration_are_errors() {
    let mut adapter = ProblemAdapter::new(Cubic::new(4));
    let mut newton = NewtonSolver::new(&mut adapter);
    let mut short = vec![0.0; 3];
    assert!(matches!(newton.solve(&mut short), Err(KError::Configuration(_))));
    assert_eq!(newton.status(), &SolverStatus::Initialized);

    newton.set_ls_tolerance(0.0);
    let mut x = vec![0.0; 4];
    assert!(matches!(newton.solve(&mut x), Err(KError::Configuration(_))));
    assert!(newton.set_linear_config(LinearSolverConfig::new().with_max_iters(0)).is_err());
}

// --- diagnostics and forwarding ---

/// Delegates to `KspContext`, remembering every inner iteration count.
struct Recording {
    inner: KspContext,
    iterations: Vec<usize>,
}

impl<M: JacobianOperator<f64>> LinearBackend<M, f64> for Recording {
    fn solve(
        &mut self,
        cfg: &LinearSolverConfig<f64>,
        a: &M,
        pc: Option<&dyn Preconditioner<M, Vec<f64>>>,
        b: &Vec<f64>,
        x: &mut Vec<f64>,
    ) -> Result<SolveStats<f64>, KError> {
        let stats = self.inner.solve(cfg, a, pc, b, x)?;
        self.iterations.push(stats.iterations);
        Ok(stats)
    }
}

#[test]
fn linear_iterations_accumulate_per_solve() {
    let mut adapter = ProblemAdapter::new(Cubic::new(16));
    let backend = Recording { inner: KspContext::new(), iterations: Vec::new() };
    let mut newton = NewtonSolver::with_backend(&mut adapter, backend);
    tight(newton.criteria_mut());
    newton.set_output_flags(OutputFlags::OUTER_ITERATION | OutputFlags::LINEAR_SOLVER_DETAILS);
    let mut x = vec![0.0; 16];
    assert!(newton.solve(&mut x).unwrap().is_converged());
    let recorded = &newton.backend().iterations;
    assert_eq!(recorded.len(), newton.num_iters());
    assert_eq!(newton.num_lin_iters(), recorded.iter().sum::<usize>());
    assert_eq!(newton.last_lin_iters(), *recorded.last().unwrap());
    assert!(newton.achieved_tol() <= 1e-6);

    // a second solve starts the counters over
    let mut x = vec![0.0; 16];
    newton.solve(&mut x).unwrap();
    let total: usize = newton.backend().iterations.iter().sum();
    assert!(newton.num_lin_iters() < total);
}

#[test]
fn output_flags_never_change_the_iteration() {
    let mut quiet = ProblemAdapter::new(Cubic::new(10));
    let mut newton = NewtonSolver::new(&mut quiet);
    tight(newton.criteria_mut());
    newton.set_output_flags(OutputFlags::empty());
    let mut x_quiet = vec![0.0; 10];
    let quiet_outcome = newton.solve(&mut x_quiet).unwrap();
    let quiet_iters = newton.num_iters();

    let mut loud = ProblemAdapter::new(Cubic::new(10));
    let mut newton = NewtonSolver::new(&mut loud);
    tight(newton.criteria_mut());
    newton.set_output_flags(OutputFlags::all());
    let mut x_loud = vec![0.0; 10];
    assert_eq!(newton.solve(&mut x_loud).unwrap(), quiet_outcome);
    assert_eq!(newton.num_iters(), quiet_iters);
    for (a, b) in x_loud.iter().zip(&x_quiet) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn time_information_reaches_the_problem() {
    let mut adapter = ProblemAdapter::new(Cubic::new(3));
    {
        let mut newton = NewtonSolver::new(&mut adapter);
        newton.set_time(0.75);
        newton.set_time_step(0.01);
    }
    assert_eq!(adapter.problem().time, Some(0.75));
    assert_eq!(adapter.problem().time_step, Some(0.01));
    assert_eq!(NewtonSystem::ndof(&adapter), 3);
}
