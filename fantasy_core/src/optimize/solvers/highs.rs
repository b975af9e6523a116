//! Implements a solver interface for HiGHS, requires the highs feature
use std::time::Duration;

use highs::{Col, HighsModelStatus, RowProblem, Sense};
use indexmap::IndexMap;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solver backed by the HiGHS mixed integer solver
#[derive(Clone, Debug, Default)]
pub struct HighsSolver {}

impl HighsSolver {
    pub fn new() -> Self {
        HighsSolver {}
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn integer_variable_capable(&self) -> bool {
        true
    }

    fn enforces_time_limit(&self) -> bool {
        true
    }

    fn solve(
        &self,
        problem: &Problem,
        time_limit: Option<Duration>,
    ) -> Result<ProblemSolution, SolverError> {
        let mut coefficients = vec![0.0; problem.num_variables()];
        for term in problem.objective().terms() {
            coefficients[term.variable] += term.coefficient;
        }

        let mut pb = RowProblem::default();
        let columns: Vec<Col> = problem
            .variables()
            .zip(&coefficients)
            .map(|(variable, coefficient)| {
                let bounds = variable.lower_bound..=variable.upper_bound;
                if variable.is_integral() {
                    pb.add_integer_column(*coefficient, bounds)
                } else {
                    pb.add_column(*coefficient, bounds)
                }
            })
            .collect();

        for constraint in problem.constraints() {
            let row: Vec<(Col, f64)> = constraint
                .terms()
                .iter()
                .map(|t| (columns[t.variable], t.coefficient))
                .collect();
            match constraint {
                Constraint::Equality { equals, .. } => pb.add_row(*equals..=*equals, row),
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => pb.add_row(*lower_bound..=*upper_bound, row),
            }
        }

        let sense = match problem.objective().sense() {
            ObjectiveSense::Maximize => Sense::Maximise,
            ObjectiveSense::Minimize => Sense::Minimise,
        };
        let mut model = pb.optimise(sense);
        model.make_quiet();
        if let Some(limit) = time_limit {
            model.set_option("time_limit", limit.as_secs_f64());
        }
        let solved = model.solve();

        let status = match solved.status() {
            HighsModelStatus::Optimal => OptimizationStatus::Optimal,
            // Every model built here is bounded, so an ambiguous answer means infeasible
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                OptimizationStatus::Infeasible
            }
            HighsModelStatus::Unbounded => OptimizationStatus::Unbounded,
            HighsModelStatus::ReachedTimeLimit => OptimizationStatus::TimedOut,
            HighsModelStatus::ReachedIterationLimit => OptimizationStatus::SolverHalted,
            HighsModelStatus::SolveError | HighsModelStatus::PostsolveError => {
                OptimizationStatus::NumericalError
            }
            other => {
                return Err(SolverError::Backend(format!(
                    "HiGHS finished with status {:?}",
                    other
                )))
            }
        };
        if status != OptimizationStatus::Optimal {
            return Ok(ProblemSolution::without_values(status));
        }

        let solution = solved.get_solution();
        let column_values = solution.columns();
        let values: IndexMap<String, f64> = problem
            .variables()
            .zip(column_values.iter())
            .map(|(variable, value)| (variable.id.clone(), *value))
            .collect();
        Ok(ProblemSolution {
            status,
            objective_value: Some(problem.objective().evaluate(column_values)),
            variable_values: Some(values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::objective::Objective;
    use crate::optimize::variable::Variable;

    #[test]
    fn test_solver_capabilities() {
        let solver = HighsSolver::new();
        assert_eq!(solver.name(), "highs");
        assert!(solver.integer_variable_capable());
        assert!(solver.enforces_time_limit());
    }

    #[test]
    fn test_binary_ilp() {
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

        let solution = HighsSolver::new()
            .solve(&problem, Some(Duration::from_secs(10)))
            .unwrap();
        assert!(solution.is_optimal());
        assert!((solution.objective_value.unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let problem = Problem::from_parts(
            vec![Variable::new_binary("x"), Variable::new_binary("y")],
            Objective::new_maximize(),
            vec![Constraint::new_greater_equal("three", [(0, 1.0), (1, 1.0)], 3.0)],
        )
        .unwrap();
        let solution = HighsSolver::new().solve(&problem, None).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
    }
}
