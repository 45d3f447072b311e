use anyhow::{Context, Result, anyhow};
use itertools::iproduct;
use ndarray::{Array1, Array2};

use crate::{
    game_theory::{game_type::GameType, padded_function::PaddedFunctions},
    optimisation_algorithms::{
        linear_programming::{
            ComparisonOp, LinearProgram, LpSolution, OptimisationDirection, Variable,
        },
        solver::{SolverConfig, resolve_config},
    },
};

/**
 * Find the constant toll per basis function that minimises the worst-case
 * price of anarchy over games spanned by the `(m, n)` basis matrix.
 *
 * Unlike the general allocation-rule optimisation, all basis functions share
 * one LP here: the multipliers `ν` and `ρ` are common, and each basis
 * contributes its own toll variable `σ_j`. The reported tolls are the ratios
 * `σ_j / ν`; a solution with `ν = 0` admits no toll interpretation and is
 * reported as an error.
 *
 * Returns the optimal price of anarchy and the `m` tolls.
 */
pub fn optimise_constant_toll_poa(
    n: usize,
    basis: &Array2<f64>,
    game: GameType,
    config: Option<&SolverConfig>,
) -> Result<(f64, Array1<f64>)> {
    let config = resolve_config(config)?;
    let w = PaddedFunctions::from_basis(n, basis)?;
    let m = w.columns();

    let solution = constant_toll_poa(&w, game, &config)?;
    let point = solution.point();

    let nu = point[m];
    if nu.abs() < f64::EPSILON {
        return Err(anyhow!(
            "the toll multiplier ν vanished at the optimum, so no finite tolls realise this price of anarchy"
        ));
    }

    let poa = game.poa_from_multiplier(point[m + 1]);
    let tolls = Array1::from_iter(point[0..m].iter().map(|sigma| sigma / nu));
    Ok((poa, tolls))
}

/// Solve the constant-toll LP and return the raw solution
/// `[σ_1, ..., σ_m, ν, ρ]`.
pub fn constant_toll_poa(
    w: &PaddedFunctions,
    game: GameType,
    config: &SolverConfig,
) -> Result<LpSolution> {
    let program = assemble_toll_program(w, game);
    log::debug!(
        "assembled the constant-toll {} LP for n = {}, m = {}: {} constraints",
        game,
        w.number_of_players(),
        w.columns(),
        program.number_of_constraints()
    );

    let solution = config
        .solve(&program)
        .with_context(|| format!("optimising the {} price of anarchy with constant tolls", game))?;
    Ok(solution)
}

/**
 * Constraints range over the congestion pairs `(x, y)` in `{0..n}²`; with a
 * single resource, `x` is the equilibrium load and `y` the optimal load, and
 * the case split on `x + y <= n` accounts for the players the two profiles
 * must share once their combined load exceeds `n`.
 */
fn assemble_toll_program(w: &PaddedFunctions, game: GameType) -> LinearProgram {
    let n = w.number_of_players();
    let m = w.columns();
    let direction = match game {
        GameType::CostMinimisation => OptimisationDirection::Maximise,
        GameType::WelfareMaximisation => OptimisationDirection::Minimise,
    };
    let sign = game.row_sign();

    let mut program = LinearProgram::new(direction);
    let sigma: Vec<Variable> = (0..m).map(|_| program.add_nonnegative_var(0.0)).collect();
    let nu = program.add_nonnegative_var(0.0);
    let rho = program.add_nonnegative_var(1.0);

    // explicit nonnegativity row for ν, kept alongside the variable bound
    program.add_constraint(&[(nu, -1.0)], ComparisonOp::Le, 0.0);

    for col in 0..m {
        for (x, y) in iproduct!(0..=n, 0..=n) {
            let nu_coeff = if x + y <= n {
                w.at(x, col) * x as f64 - w.at(x + 1, col) * y as f64
            } else {
                w.at(x, col) * (n - y) as f64 - w.at(x + 1, col) * (n - x) as f64
            };

            let row = vec![
                (sigma[col], sign * (x as f64 - y as f64)),
                (nu, sign * nu_coeff),
                (rho, sign * -w.at(x, col) * x as f64),
            ];
            program.add_constraint(row, ComparisonOp::Le, sign * -w.at(y, col) * y as f64);
        }
    }

    program
}
