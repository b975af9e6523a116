//! Solver interfaces, and the time limited solve entry point
#[cfg(feature = "highs")]
pub mod highs;
pub mod microlp;

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Once};
use std::thread;
use std::time::{Duration, Instant};

use cfg_if::cfg_if;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::configuration::{self, SolverBackend};
use crate::optimize::problem::Problem;
use crate::optimize::{OptimizationStatus, ProblemSolution};

pub use self::microlp::MicrolpSolver;
#[cfg(feature = "highs")]
pub use self::highs::HighsSolver;

/// A mixed integer linear programming engine
///
/// Implementations translate a [`Problem`] into the engine's own model, solve it, and report
/// the outcome as a [`ProblemSolution`]. Infeasible or unbounded problems are reported through
/// the solution status, not as errors.
pub trait Solver: Send + Sync {
    /// Short name of the engine
    fn name(&self) -> &'static str;

    /// Whether the engine can restrict variables to integer values
    fn integer_variable_capable(&self) -> bool;

    /// Whether the engine stops itself once the time limit passed to [`Solver::solve`] is
    /// reached
    fn enforces_time_limit(&self) -> bool {
        false
    }

    /// Solve the problem, giving up after `time_limit` if the engine supports it
    fn solve(
        &self,
        problem: &Problem,
        time_limit: Option<Duration>,
    ) -> Result<ProblemSolution, SolverError>;
}

/// Errors raised by a solver backend
#[derive(Error, Debug)]
pub enum SolverError {
    /// The problem uses integer variables, which the solver can't handle
    #[error("Solver {0} does not support integer variables")]
    IntegerVariablesUnsupported(&'static str),
    /// The backend reported a failure unrelated to feasibility
    #[error("Solver backend failed: {0}")]
    Backend(String),
    /// The solve thread couldn't be started
    #[error("Unable to start solver thread: {0}")]
    Spawn(#[source] std::io::Error),
    /// The solve thread stopped without reporting a result
    #[error("Solver thread terminated without a result")]
    WorkerLost,
}

/// Create the solver selected in the global configuration
///
/// HiGHS is only available when the `highs` feature is enabled, otherwise microlp is used.
pub fn default_solver() -> Arc<dyn Solver> {
    let backend = configuration::current().solver;
    cfg_if! {
        if #[cfg(feature = "highs")] {
            match backend {
                SolverBackend::Highs => Arc::new(HighsSolver::new()),
                SolverBackend::Microlp => Arc::new(MicrolpSolver::new()),
            }
        } else {
            if backend == SolverBackend::Highs {
                warn!("HiGHS requested but the highs feature is not enabled, using microlp");
            }
            Arc::new(MicrolpSolver::new())
        }
    }
}

static UNENFORCED_LIMIT_WARNING: Once = Once::new();

/// Solve a problem, waiting at most `time_limit` for the result
///
/// With a time limit the solve runs on its own thread. If no result arrives in time the
/// returned solution has status [`OptimizationStatus::TimedOut`]. Solvers which don't
/// [enforce the limit](Solver::enforces_time_limit) keep running on the abandoned thread until
/// they finish, and their result is discarded. Without a time limit this blocks until the
/// solver finishes.
pub fn solve_with_time_limit(
    solver: Arc<dyn Solver>,
    problem: Arc<Problem>,
    time_limit: Option<Duration>,
) -> Result<ProblemSolution, SolverError> {
    if problem.has_integer_variables() && !solver.integer_variable_capable() {
        return Err(SolverError::IntegerVariablesUnsupported(solver.name()));
    }
    if time_limit.is_some() && !solver.enforces_time_limit() {
        UNENFORCED_LIMIT_WARNING.call_once(|| {
            warn!(
                solver = solver.name(),
                "Solver can't be stopped at the time limit, timed out solves keep running in the background"
            )
        });
    }
    info!(
        solver = solver.name(),
        variables = problem.num_variables(),
        constraints = problem.num_constraints(),
        ?time_limit,
        "Starting solve"
    );
    let start = Instant::now();
    let result = match time_limit {
        None => solver.solve(&problem, None),
        Some(limit) => solve_on_worker(Arc::clone(&solver), problem, limit),
    };
    match &result {
        Ok(solution) if solution.is_optimal() => info!(
            solver = solver.name(),
            objective = solution.objective_value,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Solve finished"
        ),
        Ok(solution) => warn!(
            solver = solver.name(),
            status = %solution.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Solve finished without an optimal solution"
        ),
        Err(err) => warn!(solver = solver.name(), error = %err, "Solve failed"),
    }
    result
}

fn solve_on_worker(
    solver: Arc<dyn Solver>,
    problem: Arc<Problem>,
    limit: Duration,
) -> Result<ProblemSolution, SolverError> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name(format!("{}-solve", solver.name()))
        .spawn(move || {
            // The receiver is gone once the caller has timed out
            let _ = sender.send(solver.solve(&problem, Some(limit)));
        })
        .map_err(SolverError::Spawn)?;
    match receiver.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            debug!(limit_ms = limit.as_millis() as u64, "Solve exceeded time limit");
            Ok(ProblemSolution::without_values(OptimizationStatus::TimedOut))
        }
        Err(RecvTimeoutError::Disconnected) => Err(SolverError::WorkerLost),
    }
}
