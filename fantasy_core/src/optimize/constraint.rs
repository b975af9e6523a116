//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Used to identify the constraint (must be unique within a problem)
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint, `lower_bound` <= `terms` <= `upper_bound`
    Inequality {
        /// Used to identify the constraint (must be unique within a problem)
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: (variable index, coefficient) pairs
    /// - `equals`: The right hand side of the equality
    ///
    /// # Examples
    /// ```rust
    /// use fantasy_core::optimize::constraint::Constraint;
    /// // Represents 3*x0 + 2*x1 = 6
    /// let new_constraint = Constraint::new_equality("c", [(0, 3.0), (1, 2.0)], 6.);
    /// assert_eq!(new_constraint.terms().len(), 2);
    /// ```
    pub fn new_equality(
        id: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        equals: f64,
    ) -> Self {
        Constraint::Equality {
            id: id.into(),
            terms: Constraint::collect_terms(terms),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: (variable index, coefficient) pairs
    /// - `lower_bound`: The lowest value the constraint can take
    /// - `upper_bound`: The highest value the constraint can take
    pub fn new_inequality(
        id: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            id: id.into(),
            terms: Constraint::collect_terms(terms),
            lower_bound,
            upper_bound,
        }
    }

    /// Create a new constraint `terms` <= `upper_bound`
    pub fn new_less_equal(
        id: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        upper_bound: f64,
    ) -> Self {
        Constraint::new_inequality(id, terms, f64::NEG_INFINITY, upper_bound)
    }

    /// Create a new constraint `terms` >= `lower_bound`
    pub fn new_greater_equal(
        id: impl Into<String>,
        terms: impl IntoIterator<Item = (usize, f64)>,
        lower_bound: f64,
    ) -> Self {
        Constraint::new_inequality(id, terms, lower_bound, f64::INFINITY)
    }

    /// Identifier of the constraint
    pub fn id(&self) -> &str {
        match self {
            Constraint::Equality { id, .. } | Constraint::Inequality { id, .. } => id,
        }
    }

    /// Linear terms of the constraint
    pub fn terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } | Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Evaluate the left hand side of the constraint for a set of variable values
    /// (indexed by variable index)
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms()
            .iter()
            .map(|t| t.coefficient * values.get(t.variable).copied().unwrap_or(0.0))
            .sum()
    }

    /// Check whether a set of variable values satisfies the constraint, within `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.evaluate(values);
        match self {
            Constraint::Equality { equals, .. } => (lhs - equals).abs() <= tolerance,
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => lhs >= lower_bound - tolerance && lhs <= upper_bound + tolerance,
        }
    }

    /// Collect (variable, coefficient) pairs into terms, merging repeated variables
    fn collect_terms(terms: impl IntoIterator<Item = (usize, f64)>) -> Vec<ConstraintTerm> {
        let mut merged: IndexMap<usize, f64> = IndexMap::new();
        for (variable, coefficient) in terms {
            *merged.entry(variable).or_insert(0.0) += coefficient;
        }
        merged
            .into_iter()
            .map(|(variable, coefficient)| ConstraintTerm {
                variable,
                coefficient,
            })
            .collect()
    }

    /// Convert a slice of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { id, terms, equals } => {
                write!(f, "{}: {} = {}", id, Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                id,
                terms,
                lower_bound,
                upper_bound,
            } => {
                let terms = Self::terms_to_string(terms);
                match (lower_bound.is_finite(), upper_bound.is_finite()) {
                    (false, true) => write!(f, "{}: {} <= {}", id, terms, upper_bound),
                    (true, false) => write!(f, "{}: {} >= {}", id, terms, lower_bound),
                    _ => write!(f, "{}: {} <= {} <= {}", id, lower_bound, terms, upper_bound),
                }
            }
        }
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    /// Index of the variable in the problem
    pub variable: usize,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*x{}", self.coefficient, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_variables_are_merged() {
        let cons = Constraint::new_equality("c", [(0, 1.0), (1, 2.0), (0, -3.0)], 0.0);
        assert_eq!(cons.terms().len(), 2);
        assert_eq!(cons.terms()[0].coefficient, -2.0);
    }

    #[test]
    fn one_sided_display() {
        let le = Constraint::new_less_equal("budget[1]", [(0, 1.0), (1, 2.0)], 10.0);
        assert_eq!(le.to_string(), "budget[1]: 1*x0 + 2*x1 <= 10");
        let ge = Constraint::new_greater_equal("g", [(2, 1.0)], 1.0);
        assert_eq!(ge.to_string(), "g: 1*x2 >= 1");
    }

    #[test]
    fn satisfaction() {
        let cons = Constraint::new_inequality("c", [(0, 1.0), (1, 1.0)], 1.0, 2.0);
        assert!(cons.is_satisfied(&[1.0, 0.0], 1e-9));
        assert!(cons.is_satisfied(&[1.0, 1.0], 1e-9));
        assert!(!cons.is_satisfied(&[1.0, 2.0], 1e-9));
        let eq = Constraint::new_equality("e", [(0, 2.0)], 2.0);
        assert!(eq.is_satisfied(&[1.0 + 1e-12], 1e-9));
        assert!(!eq.is_satisfied(&[0.0], 1e-9));
    }
}
