use crate::optimisation_algorithms::{
    linear_programming::{
        ComparisonOp, LinearProgram, LpSolution, LpStatus, OptimisationDirection, SolverFailure,
    },
    solver::{ConfigurationError, LpSolver},
};

/// The default LP-solving backend, built on the `microlp` crate.
///
/// The adapter translates a [`LinearProgram`] into a `microlp::Problem`,
/// solves it, and maps the outcome onto the fixed result model: infeasible and
/// unbounded runs keep their status, any other solver error is reported as a
/// numerical failure with microlp's message verbatim.
#[derive(Clone, Debug)]
pub struct MicrolpSolver {
    _private: (),
}

impl MicrolpSolver {
    /// microlp implements a single algorithm.
    pub const DEFAULT_METHOD: &'static str = "simplex";

    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Construct the solver for a named algorithm; anything other than
    /// [`Self::DEFAULT_METHOD`] is a configuration error.
    pub fn with_method(method: &str) -> Result<Self, ConfigurationError> {
        if method == Self::DEFAULT_METHOD {
            Ok(Self::new())
        } else {
            Err(ConfigurationError::UnknownMethod {
                method: method.to_owned(),
                known: Self::DEFAULT_METHOD,
            })
        }
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LpSolver for MicrolpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverFailure> {
        let direction = match program.direction() {
            OptimisationDirection::Minimise => microlp::OptimizationDirection::Minimize,
            OptimisationDirection::Maximise => microlp::OptimizationDirection::Maximize,
        };
        let mut problem = microlp::Problem::new(direction);

        let variables: Vec<microlp::Variable> = program
            .variables()
            .map(|(obj_coeff, bounds)| problem.add_var(obj_coeff, bounds))
            .collect();

        for (expr, op, rhs) in program.constraints() {
            let op = match op {
                ComparisonOp::Eq => microlp::ComparisonOp::Eq,
                ComparisonOp::Le => microlp::ComparisonOp::Le,
                ComparisonOp::Ge => microlp::ComparisonOp::Ge,
            };
            let terms: Vec<(microlp::Variable, f64)> = expr
                .vars
                .iter()
                .zip(expr.coeffs.iter())
                .filter(|(_, coeff)| **coeff != 0.0)
                .map(|(var, coeff)| (variables[*var], *coeff))
                .collect();
            if terms.is_empty() {
                // a row with no surviving terms is decided here: `0 op rhs`
                let holds = match op {
                    microlp::ComparisonOp::Eq => *rhs == 0.0,
                    microlp::ComparisonOp::Le => *rhs >= 0.0,
                    microlp::ComparisonOp::Ge => *rhs <= 0.0,
                };
                if holds {
                    continue;
                }
                return Err(SolverFailure::new(
                    LpStatus::Infeasible,
                    "a constraint with all-zero coefficients cannot meet its right-hand side",
                ));
            }
            problem.add_constraint(terms, op, *rhs);
        }

        log::debug!(
            "solving an LP with {} variables and {} constraints",
            program.number_of_variables(),
            program.number_of_constraints()
        );

        match problem.solve() {
            Ok(solution) => {
                let point = variables.iter().map(|var| solution[*var]).collect();
                Ok(LpSolution::new(point, solution.objective()))
            }
            Err(microlp::Error::Infeasible) => Err(SolverFailure::new(
                LpStatus::Infeasible,
                microlp::Error::Infeasible.to_string(),
            )),
            Err(microlp::Error::Unbounded) => Err(SolverFailure::new(
                LpStatus::Unbounded,
                microlp::Error::Unbounded.to_string(),
            )),
            Err(other) => Err(SolverFailure::new(
                LpStatus::NumericalFailure,
                other.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimisation_algorithms::linear_programming::{
        ComparisonOp, LinearProgram, OptimisationDirection,
    };

    #[test]
    fn solves_a_small_program() {
        // maximise x + 2y subject to x + y <= 4, x >= 1, 0 <= y <= 3
        let mut program = LinearProgram::new(OptimisationDirection::Maximise);
        let x = program.add_var(1.0, (1.0, f64::INFINITY));
        let y = program.add_var(2.0, (0.0, 3.0));
        program.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Le, 4.0);

        let solution = MicrolpSolver::new().solve(&program).unwrap();
        assert!((solution.objective() - 7.0).abs() < 1e-9);
        assert!((solution.value(x) - 1.0).abs() < 1e-9);
        assert!((solution.value(y) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn equality_constraints() {
        // minimise x + y subject to x + y = 2, x - y = 0
        let mut program = LinearProgram::new(OptimisationDirection::Minimise);
        let x = program.add_nonnegative_var(1.0);
        let y = program.add_nonnegative_var(1.0);
        program.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Eq, 2.0);
        program.add_constraint(&[(x, 1.0), (y, -1.0)], ComparisonOp::Eq, 0.0);

        let solution = MicrolpSolver::new().solve(&program).unwrap();
        assert!((solution.value(x) - 1.0).abs() < 1e-9);
        assert!((solution.value(y) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reports_infeasibility() {
        let mut program = LinearProgram::new(OptimisationDirection::Minimise);
        let x = program.add_nonnegative_var(1.0);
        program.add_constraint(&[(x, 1.0)], ComparisonOp::Le, -1.0);

        let failure = MicrolpSolver::new().solve(&program).unwrap_err();
        assert_eq!(failure.status, LpStatus::Infeasible);
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn reports_unboundedness() {
        let mut program = LinearProgram::new(OptimisationDirection::Maximise);
        let x = program.add_nonnegative_var(1.0);
        program.add_constraint(&[(x, 1.0)], ComparisonOp::Ge, 1.0);

        let failure = MicrolpSolver::new().solve(&program).unwrap_err();
        assert_eq!(failure.status, LpStatus::Unbounded);
    }

    #[test]
    fn empty_rows_are_decided_without_the_solver() {
        let mut program = LinearProgram::new(OptimisationDirection::Minimise);
        let x = program.add_nonnegative_var(1.0);
        program.add_constraint(&[(x, 0.0)], ComparisonOp::Le, 0.0);
        program.add_constraint(&[(x, 1.0)], ComparisonOp::Ge, 1.0);
        let solution = MicrolpSolver::new().solve(&program).unwrap();
        assert!((solution.value(x) - 1.0).abs() < 1e-9);

        let mut bad = LinearProgram::new(OptimisationDirection::Minimise);
        let y = bad.add_nonnegative_var(1.0);
        bad.add_constraint(&[(y, 0.0)], ComparisonOp::Ge, 1.0);
        let failure = MicrolpSolver::new().solve(&bad).unwrap_err();
        assert_eq!(failure.status, LpStatus::Infeasible);
    }

    #[test]
    fn method_validation() {
        assert!(MicrolpSolver::with_method("simplex").is_ok());
        assert!(MicrolpSolver::with_method("interior-point").is_err());
    }
}
