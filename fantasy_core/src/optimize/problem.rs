//! Provides struct representing an optimization problem
use indexmap::IndexMap;
use thiserror::Error;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::Objective;
use crate::optimize::variable::{Variable, VariableType};

/// An optimization problem
///
/// A problem is assembled in one step from its variables, objective and constraints (see
/// [`Problem::from_parts`]), and is not modified afterwards.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem, keyed by id, in index order
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem, keyed by id
    constraints: IndexMap<String, Constraint>,
    /// Type of problem
    problem_type: ProblemType,
}

impl Problem {
    /// Assemble a problem from its parts
    ///
    /// Variable indices are assigned in the order the variables are given; constraint and
    /// objective terms must refer to those indices.
    ///
    /// # Examples
    /// ```rust
    /// use fantasy_core::optimize::constraint::Constraint;
    /// use fantasy_core::optimize::objective::Objective;
    /// use fantasy_core::optimize::problem::Problem;
    /// use fantasy_core::optimize::variable::Variable;
    /// let mut objective = Objective::new_maximize();
    /// objective.add_linear_terms([(0, 1.0), (1, 2.0)]);
    /// let problem = Problem::from_parts(
    ///     vec![Variable::new_binary("x"), Variable::new_binary("y")],
    ///     objective,
    ///     vec![Constraint::new_less_equal("pick_one", [(0, 1.0), (1, 1.0)], 1.0)],
    /// )
    /// .unwrap();
    /// assert_eq!(problem.num_variables(), 2);
    /// ```
    pub fn from_parts(
        variables: Vec<Variable>,
        objective: Objective,
        constraints: Vec<Constraint>,
    ) -> Result<Self, ProblemError> {
        let mut problem = Problem {
            objective: Objective::new(objective.sense()),
            variables: IndexMap::with_capacity(variables.len()),
            constraints: IndexMap::with_capacity(constraints.len()),
            problem_type: ProblemType::LinearContinuous,
        };
        for variable in variables {
            problem.add_variable(variable)?;
        }
        for constraint in constraints {
            problem.add_constraint(constraint)?;
        }
        problem.validate_objective(&objective)?;
        problem.objective = objective;
        Ok(problem)
    }

    // region Adding Parts
    /// Add a variable to the optimization problem
    fn add_variable(&mut self, mut variable: Variable) -> Result<(), ProblemError> {
        self.validate_variable(&variable)?;
        variable.index = self.variables.len();
        if variable.is_integral() {
            self.problem_type = ProblemType::LinearMixedInteger;
        }
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Add a constraint to the problem
    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.id().to_string(), constraint);
        Ok(())
    }
    // endregion Adding Parts

    // region Accessors
    /// Objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Variables of the problem, in index order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Constraints of the problem, in the order they were given
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Look up a variable by id
    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Look up a constraint by id
    pub fn constraint(&self, id: &str) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    /// Current number of variables in the model
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Current number of constraints in the model
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Type of the problem
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Whether any variable is restricted to integer values
    pub fn has_integer_variables(&self) -> bool {
        self.variables
            .values()
            .any(|v| v.variable_type != VariableType::Continuous)
    }
    // endregion Accessors

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists(variable.id.clone()));
        }
        if variable.lower_bound > variable.upper_bound {
            return Err(ProblemError::InvalidVariableBounds(variable.id.clone()));
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(constraint.id()) {
            return Err(ProblemError::ConstraintAlreadyExists(
                constraint.id().to_string(),
            ));
        }
        if let Constraint::Inequality {
            id,
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds(id.clone()));
            }
        }
        if constraint
            .terms()
            .iter()
            .any(|t| t.variable >= self.variables.len())
        {
            return Err(ProblemError::NonExistentVariablesInConstraint(
                constraint.id().to_string(),
            ));
        }
        Ok(())
    }

    /// Check that the objective only refers to variables in this Problem
    fn validate_objective(&self, objective: &Objective) -> Result<(), ProblemError> {
        if objective
            .terms()
            .iter()
            .any(|t| t.variable >= self.variables.len())
        {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        Ok(())
    }
    // endregion Validation Functions
}

/// Types of optimization problems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    /// Problem with linear objectives and constraints, and continuous variables
    LinearContinuous,
    /// Problem with linear objective and constraints, with integer and continuous variables
    LinearMixedInteger,
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable: {0}")]
    VariableIdAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound > upper_bound: {0}")]
    InvalidVariableBounds(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint: {0}")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound: {0}")]
    InvalidConstraintBounds(String),
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add a constraint with variables not in the model: {0}")]
    NonExistentVariablesInConstraint(String),
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the model")]
    NonExistentVariablesInObjective,
}
