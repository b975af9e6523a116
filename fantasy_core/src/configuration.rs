use std::sync::{LazyLock, RwLock};
use std::time::Duration;

/// Process wide defaults used when solving selection problems
pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Largest distance from 0 or 1 accepted for a solved binary variable
    pub tolerance: f64,
    /// Default solver backend
    pub solver: SolverBackend,
    /// Default limit on the time spent in a single solve, None waits for the solver
    pub time_limit: Option<Duration>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            tolerance: 1e-06,
            solver: SolverBackend::Microlp,
            time_limit: None,
        }
    }
}

/// Enum used to specify the default solver to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverBackend {
    /// Use the pure Rust microlp solver
    Microlp,
    /// Use the HiGHS Mixed Integer Solver, requires the highs feature to be enabled
    Highs,
}

/// Snapshot of the current configuration
pub fn current() -> Configuration {
    CONFIGURATION
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
