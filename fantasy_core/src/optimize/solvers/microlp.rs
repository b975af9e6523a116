//! Implements a solver interface for microlp
//!
//! microlp is a pure Rust simplex solver with branch and bound for integer variables. It has
//! no internal time limit, so time limits are only enforced by
//! [`solve_with_time_limit`](super::solve_with_time_limit).
use std::time::Duration;

use indexmap::IndexMap;
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection};

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solver backed by microlp
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MicrolpSolver {
    pub fn new() -> Self {
        MicrolpSolver {}
    }
}

impl Solver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn integer_variable_capable(&self) -> bool {
        true
    }

    fn solve(
        &self,
        problem: &Problem,
        _time_limit: Option<Duration>,
    ) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        // microlp takes objective coefficients per variable
        let mut coefficients = vec![0.0; problem.num_variables()];
        for term in problem.objective().terms() {
            coefficients[term.variable] += term.coefficient;
        }

        let mut lp = microlp::Problem::new(direction);
        let mut columns = Vec::with_capacity(problem.num_variables());
        for (variable, coefficient) in problem.variables().zip(&coefficients) {
            let column = match variable.variable_type {
                VariableType::Binary => lp.add_integer_var(*coefficient, (0, 1)),
                VariableType::Integer => lp.add_integer_var(
                    *coefficient,
                    (
                        integer_bound(variable.lower_bound),
                        integer_bound(variable.upper_bound),
                    ),
                ),
                VariableType::Continuous => {
                    lp.add_var(*coefficient, (variable.lower_bound, variable.upper_bound))
                }
            };
            columns.push(column);
        }

        for constraint in problem.constraints() {
            if constraint.terms().is_empty() {
                // Nothing for the engine to do, but the bounds must still admit zero
                if !constraint.is_satisfied(&[], 0.0) {
                    return Ok(ProblemSolution::without_values(
                        OptimizationStatus::Infeasible,
                    ));
                }
                continue;
            }
            let expression = || {
                let mut expr = LinearExpr::empty();
                for term in constraint.terms() {
                    expr.add(columns[term.variable], term.coefficient);
                }
                expr
            };
            match constraint {
                Constraint::Equality { equals, .. } => {
                    lp.add_constraint(expression(), ComparisonOp::Eq, *equals);
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if lower_bound.is_finite() {
                        lp.add_constraint(expression(), ComparisonOp::Ge, *lower_bound);
                    }
                    if upper_bound.is_finite() {
                        lp.add_constraint(expression(), ComparisonOp::Le, *upper_bound);
                    }
                }
            }
        }

        match lp.solve() {
            Ok(solution) => {
                let values: IndexMap<String, f64> = problem
                    .variables()
                    .zip(&columns)
                    .map(|(variable, column)| (variable.id.clone(), solution[*column]))
                    .collect();
                Ok(ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(solution.objective()),
                    variable_values: Some(values),
                })
            }
            Err(microlp::Error::Infeasible) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Infeasible,
            )),
            Err(microlp::Error::Unbounded) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Unbounded,
            )),
            #[allow(unreachable_patterns)]
            Err(err) => Err(SolverError::Backend(err.to_string())),
        }
    }
}

/// Clamp a floating point bound into the integer range microlp accepts
fn integer_bound(bound: f64) -> i32 {
    if bound.is_nan() {
        0
    } else {
        bound.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::objective::Objective;
    use crate::optimize::variable::{Variable, VariableBuilder};

    #[test]
    fn test_solver_name() {
        let solver = MicrolpSolver::new();
        assert_eq!(solver.name(), "microlp");
        assert!(solver.integer_variable_capable());
        assert!(!solver.enforces_time_limit());
    }

    #[test]
    fn test_binary_ilp() {
        // Maximize: x + 2y + 3z
        // Subject to: x + y + z <= 2
        //            x, y, z in {0, 1}
        let mut objective = Objective::new_maximize();
        objective.add_linear_terms([(0, 1.0), (1, 2.0), (2, 3.0)]);
        let problem = Problem::from_parts(
            vec![
                Variable::new_binary("x"),
                Variable::new_binary("y"),
                Variable::new_binary("z"),
            ],
            objective,
            vec![Constraint::new_less_equal(
                "two",
                [(0, 1.0), (1, 1.0), (2, 1.0)],
                2.0,
            )],
        )
        .unwrap();

        let solution = MicrolpSolver::new().solve(&problem, None).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 5.0).abs() < 1e-6);
        assert!(solution.value("x").unwrap().abs() < 1e-6);
        assert!((solution.value("y").unwrap() - 1.0).abs() < 1e-6);
        assert!((solution.value("z").unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_sided_and_equality() {
        // Minimize: x + y
        // Subject to: 2 <= x + y <= 4, x = 1.5
        let mut objective = Objective::new_minimize();
        objective.add_linear_terms([(0, 1.0), (1, 1.0)]);
        let continuous = |id: &str| {
            VariableBuilder::default()
                .id(id)
                .upper_bound(10.0)
                .build()
                .unwrap()
        };
        let problem = Problem::from_parts(
            vec![continuous("x"), continuous("y")],
            objective,
            vec![
                Constraint::new_inequality("range", [(0, 1.0), (1, 1.0)], 2.0, 4.0),
                Constraint::new_equality("fix", [(0, 1.0)], 1.5),
            ],
        )
        .unwrap();

        let solution = MicrolpSolver::new().solve(&problem, None).unwrap();
        assert!(solution.is_optimal());
        assert!((solution.value("x").unwrap() - 1.5).abs() < 1e-6);
        assert!((solution.value("y").unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let problem = Problem::from_parts(
            vec![Variable::new_binary("x"), Variable::new_binary("y")],
            Objective::new_maximize(),
            vec![Constraint::new_greater_equal("three", [(0, 1.0), (1, 1.0)], 3.0)],
        )
        .unwrap();
        let solution = MicrolpSolver::new().solve(&problem, None).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(solution.variable_values.is_none());
    }

    #[test]
    fn test_empty_constraint_outside_bounds() {
        let problem = Problem::from_parts(
            vec![Variable::new_binary("x")],
            Objective::new_maximize(),
            vec![Constraint::new_equality("empty", Vec::new(), 1.0)],
        )
        .unwrap();
        let solution = MicrolpSolver::new().solve(&problem, None).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
    }

    #[test]
    fn test_integer_bound_clamping() {
        assert_eq!(integer_bound(f64::INFINITY), i32::MAX);
        assert_eq!(integer_bound(f64::NEG_INFINITY), i32::MIN);
        assert_eq!(integer_bound(2.0), 2);
    }
}
