//! Module running a complete squad selection: formulate, solve and decode
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use crate::configuration;
use crate::decode::{decode, DecodeError, RosterTable};
use crate::formulation::{Formulation, FormulationError};
use crate::optimize::solvers::{default_solver, solve_with_time_limit, Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};
use crate::roster::fixture::Fixtures;
use crate::roster::player::Player;
use crate::roster::settings::SelectionSettings;

/// Result of a successful selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Average expected points per round, captain counted twice
    pub objective_value: f64,
    /// Squad, team and captain in every round
    pub roster: RosterTable,
    /// Raw solver output
    pub solution: ProblemSolution,
}

/// Errors raised during a selection run
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error(transparent)]
    Formulation(#[from] FormulationError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// The solver finished without an optimal solution
    #[error("No squad could be selected, solver status: {status}")]
    SolveFailed { status: OptimizationStatus },
    #[error("Unable to decode solution: {0}")]
    Decode(#[from] DecodeError),
}

/// Selects the squad maximizing expected points over a range of rounds
///
/// The default microlp solver can't be stopped once started. A time limit still bounds how
/// long [`SquadSelector::select`] waits, but a timed out solve keeps its thread busy until it
/// finishes. Full season problems are best solved with HiGHS, enabled by the `highs` feature
/// and [`SolverBackend::Highs`](crate::configuration::SolverBackend::Highs), which stops at
/// the limit.
///
/// # Examples
/// ```rust
/// use fantasy_core::roster::fixture::Fixtures;
/// use fantasy_core::roster::player::PlayerBuilder;
/// use fantasy_core::roster::settings::{Composition, SelectionSettingsBuilder};
/// use fantasy_core::roster::Position;
/// use fantasy_core::selection::SquadSelector;
///
/// let players = vec![
///     PlayerBuilder::default()
///         .id("Rashid Khan")
///         .team("STR")
///         .cost(10.0)
///         .expected_points(60.0)
///         .positions(vec![Position::Bowler])
///         .build()
///         .unwrap(),
///     PlayerBuilder::default()
///         .id("Adam Zampa")
///         .team("REN")
///         .cost(8.0)
///         .expected_points(45.0)
///         .positions(vec![Position::Bowler])
///         .build()
///         .unwrap(),
/// ];
/// let fixtures: Fixtures = [(1, "STR", 1.0), (1, "REN", 1.0)].into_iter().collect();
/// let settings = SelectionSettingsBuilder::default()
///     .budget(20.0)
///     .last_round(1u32)
///     .squad(Composition::new(1, 0, 0))
///     .team(Composition::new(1, 0, 0))
///     .build()
///     .unwrap();
/// let selection = SquadSelector::new(settings).select(&players, &fixtures).unwrap();
/// assert_eq!(selection.roster.captain(1), Some("Rashid Khan"));
/// ```
pub struct SquadSelector {
    settings: SelectionSettings,
    solver: Arc<dyn Solver>,
    time_limit: Option<Duration>,
    tolerance: f64,
}

impl SquadSelector {
    /// Create a selector using the solver, time limit and tolerance from the global
    /// configuration
    pub fn new(settings: SelectionSettings) -> Self {
        let config = configuration::current();
        SquadSelector {
            settings,
            solver: default_solver(),
            time_limit: config.time_limit,
            tolerance: config.tolerance,
        }
    }

    pub fn with_solver(mut self, solver: Arc<dyn Solver>) -> Self {
        self.solver = solver;
        self
    }

    /// Limit the time spent solving, None waits for the solver to finish
    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Build the selection problem without solving it
    pub fn formulate(
        &self,
        players: &[Player],
        fixtures: &Fixtures,
    ) -> Result<Formulation, FormulationError> {
        Formulation::build(players, fixtures, &self.settings)
    }

    /// Formulate, solve and decode the selection problem
    pub fn select(
        &self,
        players: &[Player],
        fixtures: &Fixtures,
    ) -> Result<Selection, SelectionError> {
        let start = Instant::now();
        let formulation = self.formulate(players, fixtures)?;
        let solution = solve_with_time_limit(
            Arc::clone(&self.solver),
            Arc::clone(&formulation.problem),
            self.time_limit,
        )?;
        let objective_value = match (solution.status, solution.objective_value) {
            (OptimizationStatus::Optimal, Some(value)) => value,
            (status, _) => return Err(SelectionError::SolveFailed { status }),
        };
        let roster = decode(&formulation, players, &solution, self.tolerance)?;
        info!(
            objective = objective_value,
            rows = roster.rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Selected squad"
        );
        Ok(Selection {
            objective_value,
            roster,
            solution,
        })
    }
}
