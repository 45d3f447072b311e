use anyhow::{Context, Result, bail};
use ndarray::Array2;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    game_theory::{
        game_type::GameType,
        index_sets::restricted_index_set,
        padded_function::PaddedFunctions,
    },
    optimisation_algorithms::{
        linear_programming::{
            ComparisonOp, LinearProgram, LpSolution, OptimisationDirection, Variable,
        },
        solver::{SolverConfig, resolve_config},
    },
};

/**
 * Find the utility-allocation (or cost-sharing) rule that minimises the
 * worst-case price of anarchy over games spanned by the `(m, n)` basis
 * matrix.
 *
 * One LP is solved per basis row, each yielding the optimal allocation values
 * `f(1..n)` for that basis function; the reported price of anarchy is the
 * worst (`max`) across rows, since the binding game in the span is the one
 * built on the worst-performing basis function. The per-basis solves are
 * independent and run in parallel; the first failure aborts the whole
 * computation.
 *
 * Returns the optimal price of anarchy and the `(m, n)` matrix of allocation
 * coefficients.
 */
pub fn optimise_poa(
    n: usize,
    basis: &Array2<f64>,
    game: GameType,
    config: Option<&SolverConfig>,
) -> Result<(f64, Array2<f64>)> {
    let config = resolve_config(config)?;
    // validates n and the basis shape before any solve
    PaddedFunctions::from_basis(n, basis)?;
    let padded_rows = basis
        .outer_iter()
        .map(|row| PaddedFunctions::from_basis_row(n, row))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "optimising the {} price of anarchy over {} basis functions, n = {}",
        game,
        padded_rows.len(),
        n
    );

    let per_basis: Vec<(f64, Vec<f64>)> = padded_rows
        .par_iter()
        .map(|w| {
            let solution = optimal_poa(w, game, &config)?;
            let point = solution.point();
            let poa = game.poa_from_multiplier(point[n]);
            Ok((poa, point[0..n].to_vec()))
        })
        .collect::<Result<_>>()?;

    let mut poa = 1.0_f64;
    let mut coefficients = Array2::zeros((per_basis.len(), n));
    for (idx, (basis_poa, values)) in per_basis.iter().enumerate() {
        poa = poa.max(*basis_poa);
        for (col, value) in values.iter().enumerate() {
            coefficients[[idx, col]] = *value;
        }
    }

    Ok((poa, coefficients))
}

/**
 * Solve the allocation-rule optimisation LP for a single padded basis
 * function and return the raw solution `[f(1), ..., f(n), μ]`.
 *
 * The decision variables are the `n` allocation values and the multiplier
 * `μ`; every restricted-index-set triple contributes the row
 * `a f(a+x) - b f(a+x+1) - μ w(a+x) <= -w(b+x)` (welfare maximisation; the
 * cost-minimisation rows are negated). The `a`-term vanishes for `a = 0` and
 * the `b`-term for `b = 0`, which keeps all references inside `f(1..n)`.
 */
pub fn optimal_poa(
    w: &PaddedFunctions,
    game: GameType,
    config: &SolverConfig,
) -> Result<LpSolution> {
    if w.columns() != 1 {
        bail!(
            "the allocation-optimisation LP takes a single basis function, got {} columns",
            w.columns()
        );
    }

    let n = w.number_of_players();
    let program = assemble_optimal_program(n, w, game);
    log::debug!(
        "assembled the allocation-optimisation {} LP for n = {}: {} constraints",
        game,
        n,
        program.number_of_constraints()
    );

    let solution = config
        .solve(&program)
        .with_context(|| format!("optimising the {} price of anarchy", game))?;
    Ok(solution)
}

fn assemble_optimal_program(n: usize, w: &PaddedFunctions, game: GameType) -> LinearProgram {
    let direction = match game {
        GameType::CostMinimisation => OptimisationDirection::Maximise,
        GameType::WelfareMaximisation => OptimisationDirection::Minimise,
    };
    let sign = game.row_sign();

    let mut program = LinearProgram::new(direction);
    let allocation: Vec<Variable> = (0..n)
        .map(|_| program.add_nonnegative_var(0.0))
        .collect();
    let mu = program.add_nonnegative_var(1.0);

    // explicit nonnegativity rows, kept alongside the variable bounds
    for var in &allocation {
        program.add_constraint(&[(*var, -1.0)], ComparisonOp::Le, 0.0);
    }

    for t in restricted_index_set(n) {
        let mut row = Vec::with_capacity(3);
        if t.a > 0 {
            // a f(a+x): variable index a+x-1 holds f(a+x)
            row.push((allocation[t.a + t.x - 1], sign * t.a as f64));
        }
        if t.b > 0 {
            // b f(a+x+1); a+x < n whenever b >= 1, so the index is in range
            row.push((allocation[t.a + t.x], sign * -(t.b as f64)));
        }
        row.push((mu, sign * -w.at(t.a + t.x, 0)));

        program.add_constraint(row, ComparisonOp::Le, sign * -w.at(t.b + t.x, 0));
    }

    program
}
