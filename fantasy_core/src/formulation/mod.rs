//! Module formulating squad selection as a mixed integer linear program.
//!
//! The formulation is built in stages: the [`Index`] sets and [`Parameters`] are derived from
//! the players, fixtures and settings, the [`Variables`] are allocated over the index, and the
//! objective and constraints are built from those and assembled into a single [`Problem`].

pub mod constraints;
pub mod index;
pub mod objective;
pub mod variables;

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::formulation::constraints::build_constraints;
use crate::formulation::index::{Index, Parameters};
use crate::formulation::objective::build_objective;
use crate::formulation::variables::Variables;
use crate::optimize::problem::{Problem, ProblemError};
use crate::roster::fixture::Fixtures;
use crate::roster::player::Player;
use crate::roster::settings::SelectionSettings;
use crate::roster::Round;

/// The selection model for one run, with everything needed to decode its solution
#[derive(Debug, Clone)]
pub struct Formulation {
    pub index: Index,
    pub parameters: Parameters,
    pub variables: Variables,
    pub problem: Arc<Problem>,
}

impl Formulation {
    /// Formulate the selection problem
    ///
    /// Settings are validated before any variable or constraint is built.
    pub fn build(
        players: &[Player],
        fixtures: &Fixtures,
        settings: &SelectionSettings,
    ) -> Result<Self, FormulationError> {
        let index = Index::build(players, settings)?;
        let parameters = Parameters::build(&index, players, fixtures)?;
        let variables = Variables::allocate(&index);
        let objective = build_objective(&index, &parameters, &variables);
        let constraints = build_constraints(&index, &parameters, &variables, settings);
        let problem =
            Problem::from_parts(variables.definitions().to_vec(), objective, constraints)?;
        debug!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            "Formulated selection problem"
        );
        Ok(Formulation {
            index,
            parameters,
            variables,
            problem: Arc::new(problem),
        })
    }
}

/// Settings which can't describe a valid selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("The last round ({last_round}) cannot be above {max_round}")]
    LastRoundTooLate { last_round: Round, max_round: Round },
    #[error("The first round ({first_round}) must be at least 1 and no later than the last round ({last_round})")]
    EmptyRoundRange { first_round: Round, last_round: Round },
    #[error("There are {rounds} rounds and {n_trading_rounds} trading rounds, trading rounds must be fewer than rounds")]
    TooManyTradingRounds {
        rounds: usize,
        n_trading_rounds: usize,
    },
}

/// Player or fixture data the model can't be built from
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Player {0} appears more than once")]
    DuplicatePlayer(String),
    #[error("No fixture for team {team} of player {player} in round {round}")]
    MissingFixture {
        player: String,
        team: String,
        round: Round,
    },
}

/// Errors raised while formulating the selection problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Invalid optimization problem: {0}")]
    Problem(#[from] ProblemError),
}
