//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// A variable in an optimization problem
///
/// Variables are identified by a unique `id`, and are assigned a position (`index`) when a
/// [`Problem`](crate::optimize::problem::Problem) is assembled, which is how constraints and
/// objective terms refer to them.
///
/// # Examples
/// ```rust
/// use fantasy_core::optimize::variable::{VariableBuilder, VariableType};
/// let x = VariableBuilder::default()
///     .id("x")
///     .variable_type(VariableType::Integer)
///     .lower_bound(0.0)
///     .upper_bound(5.0)
///     .build()
///     .unwrap();
/// assert_eq!(x.upper_bound, 5.0);
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Variable {
    /// Used to identify the variable (must be unique within a problem)
    #[builder(setter(into))]
    pub id: String,
    /// Type of the variable, see [`VariableType`]
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// Lowest value the variable can take
    #[builder(default = "0.0")]
    pub lower_bound: f64,
    /// Highest value the variable can take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Position of the variable in the problem, set when the problem is assembled
    #[builder(setter(skip))]
    pub(crate) index: usize,
}

impl Variable {
    /// Create a new binary variable, bounded in [0, 1]
    pub fn new_binary(id: impl Into<String>) -> Self {
        Variable {
            id: id.into(),
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: 1.0,
            index: 0,
        }
    }

    /// Position of the variable within its problem
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the solver must restrict this variable to integer values
    pub fn is_integral(&self) -> bool {
        !matches!(self.variable_type, VariableType::Continuous)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.variable_type)
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
    /// Binary Variable
    Binary,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
            VariableType::Binary => write!(f, "BINARY"),
        }
    }
}
