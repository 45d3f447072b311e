use anyhow::{Context, Result};
use ndarray::Array2;

use crate::{
    game_theory::{
        game_type::GameType,
        index_sets::restricted_index_set,
        padded_function::PaddedFunctions,
    },
    optimisation_algorithms::{
        linear_programming::{ComparisonOp, LinearProgram, LpSolution, OptimisationDirection},
        solver::{SolverConfig, resolve_config},
    },
};

/**
 * Evaluate the price of anarchy of an atomic congestion / resource-allocation
 * game through the two-variable dual LP.
 *
 * The resource functions are linear combinations of the basis
 * `{b_1(x),...,b_m(x)}` (rows of `basis`), the player functions linear
 * combinations of the rows of `allocations`; both matrices have shape
 * `(m, n)` for `n` players. The dual form is the preferred evaluation path:
 * its size is independent of `n` apart from the number of constraint rows,
 * whereas the primal carries one variable per deviation scenario.
 */
pub fn evaluate_poa(
    n: usize,
    basis: &Array2<f64>,
    allocations: &Array2<f64>,
    game: GameType,
    config: Option<&SolverConfig>,
) -> Result<f64> {
    let config = resolve_config(config)?;
    let w = PaddedFunctions::from_basis(n, basis)?;
    let f = PaddedFunctions::from_basis(n, allocations)?;

    let solution = dual_poa(&w, &f, game, &config)?;
    Ok(game.poa_from_multiplier(solution.point()[1]))
}

/// Price of anarchy of a cost-minimisation game with resource cost functions
/// spanned by `costs` and player cost shares spanned by `allocations`.
pub fn compute_cost_min_poa(
    n: usize,
    costs: &Array2<f64>,
    allocations: &Array2<f64>,
    config: Option<&SolverConfig>,
) -> Result<f64> {
    evaluate_poa(n, costs, allocations, GameType::CostMinimisation, config)
}

/// Price of anarchy of a welfare-maximisation game with resource welfare
/// functions spanned by `welfares` and player utilities spanned by
/// `utilities`.
pub fn compute_welfare_max_poa(
    n: usize,
    welfares: &Array2<f64>,
    utilities: &Array2<f64>,
    config: Option<&SolverConfig>,
) -> Result<f64> {
    evaluate_poa(n, welfares, utilities, GameType::WelfareMaximisation, config)
}

/**
 * Solve the dual LP for padded tables `w` and `f` and return the raw solution
 * point `(λ, μ)`.
 *
 * One constraint row per restricted-index-set triple and basis column:
 * `λ(a f(a+x) - b f(a+x+1)) - μ w(a+x) <= -w(b+x)` for welfare maximisation,
 * the negated row for cost minimisation, plus one explicit `-λ <= 0` row.
 * The objective extremises `μ`: maximised for cost minimisation (`μ` is the
 * reciprocal of the price of anarchy), minimised for welfare maximisation
 * (`μ` is the price of anarchy itself).
 */
pub fn dual_poa(
    w: &PaddedFunctions,
    f: &PaddedFunctions,
    game: GameType,
    config: &SolverConfig,
) -> Result<LpSolution> {
    w.matches(f)?;

    let n = w.number_of_players();
    let program = assemble_dual_program(n, w, f, game);
    log::debug!(
        "assembled the dual {} LP for n = {}: {} constraints",
        game,
        n,
        program.number_of_constraints()
    );

    let solution = config
        .solve(&program)
        .with_context(|| format!("evaluating the {} price of anarchy", game))?;
    Ok(solution)
}

fn assemble_dual_program(
    n: usize,
    w: &PaddedFunctions,
    f: &PaddedFunctions,
    game: GameType,
) -> LinearProgram {
    let direction = match game {
        GameType::CostMinimisation => OptimisationDirection::Maximise,
        GameType::WelfareMaximisation => OptimisationDirection::Minimise,
    };
    let sign = game.row_sign();

    let mut program = LinearProgram::new(direction);
    let lambda = program.add_nonnegative_var(0.0);
    let mu = program.add_nonnegative_var(1.0);

    let triples = restricted_index_set(n);
    for col in 0..w.columns() {
        for t in &triples {
            let lambda_coeff =
                t.a as f64 * f.at(t.a + t.x, col) - t.b as f64 * f.at(t.a + t.x + 1, col);
            let mu_coeff = -w.at(t.a + t.x, col);
            let rhs = -w.at(t.b + t.x, col);

            program.add_constraint(
                &[(lambda, sign * lambda_coeff), (mu, sign * mu_coeff)],
                ComparisonOp::Le,
                sign * rhs,
            );
        }
    }

    // kept alongside the variable bound, as the formulation states it
    program.add_constraint(&[(lambda, -1.0)], ComparisonOp::Le, 0.0);

    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimisation_algorithms::linear_programming::{LpStatus, SolverFailure};
    use crate::optimisation_algorithms::solver::LpSolver;
    use ndarray::{Array1, array};
    use std::sync::Arc;

    /// Basis pair of the polynomial congestion family: resource cost
    /// `x^(d+1)`, equal-share player cost `x^d`.
    fn polynomial_congestion(n: usize, d: u32) -> (Array2<f64>, Array2<f64>) {
        let costs = Array1::from_iter((1..=n).map(|x| (x as f64).powi(d as i32 + 1)))
            .insert_axis(ndarray::Axis(0));
        let shares = Array1::from_iter((1..=n).map(|x| (x as f64).powi(d as i32)))
            .insert_axis(ndarray::Axis(0));
        (costs, shares)
    }

    #[test]
    fn single_player_plays_optimally() {
        let (costs, shares) = polynomial_congestion(1, 1);
        let poa = compute_cost_min_poa(1, &costs, &shares, None).unwrap();
        assert!((poa - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_player_affine_congestion_bound() {
        let _ = env_logger::builder().is_test(true).try_init();

        // equal-share linear congestion with two players is twice as bad as
        // the optimum in the worst case
        let (costs, shares) = polynomial_congestion(2, 1);
        let poa = compute_cost_min_poa(2, &costs, &shares, None).unwrap();
        assert!((poa - 2.0).abs() < 1e-4, "PoA = {}", poa);
    }

    #[test]
    fn poa_is_at_least_one() {
        for n in 1..=5 {
            for d in 1..=3 {
                let (costs, shares) = polynomial_congestion(n, d);
                let poa = compute_cost_min_poa(n, &costs, &shares, None).unwrap();
                assert!(poa >= 1.0 - 1e-6, "n = {}, d = {}: PoA = {}", n, d, poa);
            }
        }
    }

    #[test]
    fn poa_grows_with_the_polynomial_degree() {
        let n = 3;
        let mut previous = 1.0;
        for d in 1..=4 {
            let (costs, shares) = polynomial_congestion(n, d);
            let poa = compute_cost_min_poa(n, &costs, &shares, None).unwrap();
            assert!(
                poa >= previous - 1e-6,
                "d = {}: {} < previous {}",
                d,
                poa,
                previous
            );
            previous = poa;
        }
    }

    #[test]
    fn welfare_maximisation_equal_shares() {
        // probabilistic-objective game: w(x) = 1 - q^x, equal shares w(x)/x
        let n = 4;
        let q: f64 = 0.5;
        let welfare = Array1::from_iter((1..=n).map(|x| 1.0 - q.powi(x as i32)))
            .insert_axis(ndarray::Axis(0));
        let shares = Array1::from_iter((1..=n).map(|x| (1.0 - q.powi(x as i32)) / x as f64))
            .insert_axis(ndarray::Axis(0));

        let poa = compute_welfare_max_poa(n, &welfare, &shares, None).unwrap();
        assert!(poa >= 1.0 - 1e-6);
        assert!(poa.is_finite());
    }

    #[test]
    fn multi_column_superposition() {
        // two basis functions solved in one program
        let costs = array![[1.0, 4.0], [1.0, 2.0]];
        let shares = array![[1.0, 2.0], [1.0, 1.0]];
        let poa = compute_cost_min_poa(2, &costs, &shares, None).unwrap();
        assert!(poa >= 1.0 - 1e-6);
    }

    #[test]
    fn shape_violations_are_reported() {
        let costs = array![[1.0, 4.0]];
        let shares = array![[1.0, 2.0]];

        // basis width must equal the number of players
        assert!(compute_cost_min_poa(3, &costs, &shares, None).is_err());
        // no players at all
        assert!(compute_cost_min_poa(0, &costs, &shares, None).is_err());

        // mismatched column counts between the padded tables
        let w = PaddedFunctions::from_basis(2, &costs).unwrap();
        let f = PaddedFunctions::from_basis(2, &array![[1.0, 2.0], [1.0, 1.0]]).unwrap();
        let config = SolverConfig::try_default().unwrap();
        assert!(dual_poa(&w, &f, GameType::CostMinimisation, &config).is_err());
    }

    struct AlwaysInfeasible;

    impl LpSolver for AlwaysInfeasible {
        fn solve(
            &self,
            _program: &LinearProgram,
        ) -> std::result::Result<LpSolution, SolverFailure> {
            Err(SolverFailure::new(LpStatus::Infeasible, "injected"))
        }
    }

    #[test]
    fn solver_failures_propagate() {
        let config = SolverConfig::new(Arc::new(AlwaysInfeasible), "oracle");
        let (costs, shares) = polynomial_congestion(2, 1);
        let err =
            compute_cost_min_poa(2, &costs, &shares, Some(&config)).unwrap_err();
        let failure = err
            .downcast_ref::<SolverFailure>()
            .expect("the solver failure should be preserved");
        assert_eq!(failure.status, LpStatus::Infeasible);
    }

    #[test]
    fn deterministic() {
        let (costs, shares) = polynomial_congestion(4, 2);
        let first = compute_cost_min_poa(4, &costs, &shares, None).unwrap();
        let second = compute_cost_min_poa(4, &costs, &shares, None).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
