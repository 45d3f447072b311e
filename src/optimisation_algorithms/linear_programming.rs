/*!
Linear-program descriptions and solver results.

This module only *describes* linear programs: an objective direction, one
coefficient and bound pair per variable, and a list of constraint rows. Solving
is delegated to an [`LpSolver`](crate::optimisation_algorithms::solver::LpSolver)
implementation, by default the one backed by the `microlp` crate.
*/

/// An enum indicating whether to minimise or maximise the objective function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimisationDirection {
    /// Minimise the objective function.
    Minimise,
    /// Maximise the objective function.
    Maximise,
}

/// A reference to a variable in a linear programming problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Sequence number of the variable in the addition order.
    pub fn idx(&self) -> usize {
        self.0
    }
}

/// A sum of variables multiplied by constant coefficients, used as the
/// left-hand side of a constraint.
#[derive(Clone, Debug, Default)]
pub struct LinearExpr {
    pub(crate) vars: Vec<usize>,
    pub(crate) coeffs: Vec<f64>,
}

impl LinearExpr {
    /// Creates an empty linear expression.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a single term to the linear expression.
    ///
    /// Variables can be added in any order; adding the same variable twice is
    /// forbidden and will be rejected by the solver.
    pub fn add(&mut self, var: Variable, coeff: f64) {
        self.vars.push(var.0);
        self.coeffs.push(coeff);
    }
}

/// A single `variable * constant` term in a linear expression.
/// This is an auxiliary struct for specifying conversions.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct LinearTerm(Variable, f64);

impl From<(Variable, f64)> for LinearTerm {
    fn from(term: (Variable, f64)) -> Self {
        LinearTerm(term.0, term.1)
    }
}

impl<'a> From<&'a (Variable, f64)> for LinearTerm {
    fn from(term: &'a (Variable, f64)) -> Self {
        LinearTerm(term.0, term.1)
    }
}

impl<I: IntoIterator<Item = impl Into<LinearTerm>>> From<I> for LinearExpr {
    fn from(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for term in iter {
            let LinearTerm(var, coeff) = term.into();
            expr.add(var, coeff);
        }
        expr
    }
}

impl std::iter::FromIterator<(Variable, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for term in iter {
            expr.add(term.0, term.1)
        }
        expr
    }
}

/// The relation between the left-hand and right-hand sides of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    /// The == operator (equal to)
    Eq,
    /// The <= operator (less than or equal to)
    Le,
    /// The >= operator (greater than or equal to)
    Ge,
}

/// A specification of a linear programming problem.
#[derive(Clone)]
pub struct LinearProgram {
    direction: OptimisationDirection,
    obj_coeffs: Vec<f64>,
    var_mins: Vec<f64>,
    var_maxs: Vec<f64>,
    constraints: Vec<(LinearExpr, ComparisonOp, f64)>,
}

impl std::fmt::Debug for LinearProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only printing lengths here because actual data is probably huge.
        f.debug_struct("LinearProgram")
            .field("direction", &self.direction)
            .field("num_vars", &self.obj_coeffs.len())
            .field("num_constraints", &self.constraints.len())
            .finish()
    }
}

impl LinearProgram {
    /// Create a new, empty program.
    pub fn new(direction: OptimisationDirection) -> Self {
        LinearProgram {
            direction,
            obj_coeffs: vec![],
            var_mins: vec![],
            var_maxs: vec![],
            constraints: vec![],
        }
    }

    /// Add a new variable to the problem.
    ///
    /// `obj_coeff` is the coefficient of this variable in the objective
    /// function; `min` and `max` are its inclusive bounds. Use
    /// `f64::NEG_INFINITY` and `f64::INFINITY` for absent bounds.
    pub fn add_var(&mut self, obj_coeff: f64, (min, max): (f64, f64)) -> Variable {
        let var = Variable(self.obj_coeffs.len());
        self.obj_coeffs.push(obj_coeff);
        self.var_mins.push(min);
        self.var_maxs.push(max);
        var
    }

    /// Add a nonnegative variable, the default domain of every LP variant in
    /// this crate.
    pub fn add_nonnegative_var(&mut self, obj_coeff: f64) -> Variable {
        self.add_var(obj_coeff, (0.0, f64::INFINITY))
    }

    /// Add a linear constraint `expr op rhs` to the problem.
    pub fn add_constraint(&mut self, expr: impl Into<LinearExpr>, op: ComparisonOp, rhs: f64) {
        self.constraints.push((expr.into(), op, rhs));
    }

    pub fn direction(&self) -> OptimisationDirection {
        self.direction
    }

    pub fn number_of_variables(&self) -> usize {
        self.obj_coeffs.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective coefficient and bounds of each variable, in addition order.
    pub fn variables(&self) -> impl Iterator<Item = (f64, (f64, f64))> + '_ {
        self.obj_coeffs
            .iter()
            .zip(self.var_mins.iter().zip(self.var_maxs.iter()))
            .map(|(&obj, (&min, &max))| (obj, (min, max)))
    }

    pub fn constraints(&self) -> impl Iterator<Item = &(LinearExpr, ComparisonOp, f64)> {
        self.constraints.iter()
    }
}

/// Outcome classification of an LP solve, as reported by a solver adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
    NumericalFailure,
}

impl std::fmt::Display for LpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = match self {
            LpStatus::Optimal => "optimal",
            LpStatus::Infeasible => "infeasible",
            LpStatus::Unbounded => "unbounded",
            LpStatus::IterationLimit => "iteration limit reached",
            LpStatus::NumericalFailure => "numerical failure",
        };
        msg.fmt(f)
    }
}

/// A successful solve: the optimal point and the objective value there.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    point: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    pub fn new(point: Vec<f64>, objective: f64) -> Self {
        Self { point, objective }
    }

    /// The optimal variable values, in addition order.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Optimal value of the objective function.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Value of a single variable at the optimum.
    pub fn value(&self, var: Variable) -> f64 {
        self.point[var.0]
    }
}

impl std::ops::Index<Variable> for LpSolution {
    type Output = f64;

    fn index(&self, var: Variable) -> &Self::Output {
        &self.point[var.0]
    }
}

/// A solver run that did not end in an optimal solution. Carries the adapter's
/// status classification and the underlying solver's message verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverFailure {
    pub status: LpStatus,
    pub message: String,
}

impl SolverFailure {
    pub fn new(status: LpStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "the LP solver failed ({}): {}", self.status, self.message)
    }
}

impl std::error::Error for SolverFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_program() {
        let mut program = LinearProgram::new(OptimisationDirection::Maximise);
        let x = program.add_nonnegative_var(1.0);
        let y = program.add_var(2.0, (0.0, 3.0));
        program.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Le, 4.0);
        program.add_constraint(vec![(x, 2.0), (y, 1.0)], ComparisonOp::Ge, 2.0);
        program.add_constraint(LinearExpr::empty(), ComparisonOp::Le, 1.0);

        assert_eq!(program.number_of_variables(), 2);
        assert_eq!(program.number_of_constraints(), 3);
        assert_eq!(x.idx(), 0);
        assert_eq!(y.idx(), 1);

        let vars: Vec<_> = program.variables().collect();
        assert_eq!(vars[0], (1.0, (0.0, f64::INFINITY)));
        assert_eq!(vars[1], (2.0, (0.0, 3.0)));
    }

    #[test]
    fn solution_access() {
        let solution = LpSolution::new(vec![1.0, 3.0], 7.0);
        assert_eq!(solution.objective(), 7.0);
        assert_eq!(solution[Variable(1)], 3.0);
        assert_eq!(solution.point(), &[1.0, 3.0]);
    }

    #[test]
    fn failure_display() {
        let failure = SolverFailure::new(LpStatus::Infeasible, "problem is infeasible");
        assert_eq!(
            failure.to_string(),
            "the LP solver failed (infeasible): problem is infeasible"
        );
    }
}
