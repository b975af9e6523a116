//! Module for constructing and solving optimization problems

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

/// Struct representing the solution to an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum,
    ///
    /// Some(IndexMap), keyed by variable id in variable index order, with values
    /// corresponding to variable values at optimum if the problem could be solved,
    /// None otherwise
    pub variable_values: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// A solution carrying only a (non-optimal) status
    pub fn without_values(status: OptimizationStatus) -> Self {
        ProblemSolution {
            status,
            objective_value: None,
            variable_values: None,
        }
    }

    /// Whether the solver proved optimality
    pub fn is_optimal(&self) -> bool {
        self.status == OptimizationStatus::Optimal
    }

    /// Value of a variable, by id
    pub fn value(&self, id: &str) -> Option<f64> {
        self.variable_values.as_ref()?.get(id).copied()
    }

    /// Value of a variable, by its index in the problem
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.variable_values
            .as_ref()?
            .get_index(index)
            .map(|(_, v)| *v)
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Problem has been optimized
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// The solve did not finish within the allowed time
    TimedOut,
    /// The solver hit the maximum allowed iterations, or stopped for another reason
    SolverHalted,
    /// A numerical error occurred during solving
    NumericalError,
}

impl Display for OptimizationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OptimizationStatus::Optimal => "optimal",
            OptimizationStatus::Unbounded => "unbounded",
            OptimizationStatus::Infeasible => "infeasible",
            OptimizationStatus::TimedOut => "timed out",
            OptimizationStatus::SolverHalted => "solver halted",
            OptimizationStatus::NumericalError => "numerical error",
        };
        write!(f, "{}", s)
    }
}
