//! Provides struct for representing an optimization problem's objective

/// Represents the Objective of an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Terms included in the objective (See [`ObjectiveTerm`])
    terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Terms of the objective
    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: usize, coefficient: f64) {
        self.terms.push(ObjectiveTerm::new(variable, coefficient));
    }

    /// Add a series of linear terms to the objective function
    pub fn add_linear_terms(&mut self, terms: impl IntoIterator<Item = (usize, f64)>) {
        self.terms.extend(
            terms
                .into_iter()
                .map(|(variable, coefficient)| ObjectiveTerm::new(variable, coefficient)),
        );
    }

    /// Multiply every coefficient by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.terms.iter_mut().for_each(|t| t.coefficient *= factor);
    }

    /// Evaluate the objective for a set of variable values (indexed by variable index)
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * values.get(t.variable).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveTerm {
    /// Index of the variable in the problem
    pub variable: usize,
    /// Coefficient for linear term
    pub coefficient: f64,
}

impl ObjectiveTerm {
    /// Create a new linear objective term
    pub fn new(variable: usize, coefficient: f64) -> Self {
        ObjectiveTerm {
            variable,
            coefficient,
        }
    }
}
