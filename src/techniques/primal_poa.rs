use anyhow::{Context, Result};
use ndarray::Array2;

use crate::{
    game_theory::{
        game_type::GameType,
        index_sets::full_index_set,
        padded_function::PaddedFunctions,
    },
    optimisation_algorithms::{
        linear_programming::{ComparisonOp, LinearProgram, LpSolution, OptimisationDirection},
        solver::{SolverConfig, resolve_config},
    },
};

/**
 * Evaluate the price of anarchy through the primal LP.
 *
 * The primal is the defining formulation: one probability-like weight
 * `θ(a,b,x)` per deviation scenario and basis column, a normalisation
 * equality on the equilibrium value, and a single aggregated Nash inequality.
 * It carries `O(n³·m)` variables where the dual carries two, so
 * [`evaluate_poa`](crate::techniques::dual_poa::evaluate_poa) is the path to
 * use outside of cross-checks; by strong duality both agree.
 */
pub fn evaluate_poa_primal(
    n: usize,
    basis: &Array2<f64>,
    allocations: &Array2<f64>,
    game: GameType,
    config: Option<&SolverConfig>,
) -> Result<f64> {
    let config = resolve_config(config)?;
    let w = PaddedFunctions::from_basis(n, basis)?;
    let f = PaddedFunctions::from_basis(n, allocations)?;

    let solution = primal_poa(&w, &f, game, &config)?;
    Ok(match game {
        GameType::CostMinimisation => 1.0 / solution.objective(),
        GameType::WelfareMaximisation => solution.objective(),
    })
}

/// Solve the primal LP for padded tables `w` and `f` and return the raw
/// solution over the deviation-scenario weights.
pub fn primal_poa(
    w: &PaddedFunctions,
    f: &PaddedFunctions,
    game: GameType,
    config: &SolverConfig,
) -> Result<LpSolution> {
    w.matches(f)?;

    let n = w.number_of_players();
    let program = assemble_primal_program(n, w, f, game);
    log::debug!(
        "assembled the primal {} LP for n = {}: {} variables",
        game,
        n,
        program.number_of_variables()
    );

    let solution = config
        .solve(&program)
        .with_context(|| format!("evaluating the {} price of anarchy (primal form)", game))?;
    Ok(solution)
}

fn assemble_primal_program(
    n: usize,
    w: &PaddedFunctions,
    f: &PaddedFunctions,
    game: GameType,
) -> LinearProgram {
    let direction = match game {
        GameType::CostMinimisation => OptimisationDirection::Minimise,
        GameType::WelfareMaximisation => OptimisationDirection::Maximise,
    };

    let mut program = LinearProgram::new(direction);
    let triples = full_index_set(n);

    // one weight per (triple, column); the objective is the deviation value
    let mut thetas = Vec::with_capacity(triples.len() * w.columns());
    for col in 0..w.columns() {
        for t in &triples {
            thetas.push(program.add_nonnegative_var(w.at(t.b + t.x, col)));
        }
    }

    // the aggregated Nash row: deviating must not be profitable
    let mut nash_row = Vec::with_capacity(thetas.len());
    // the normalisation: the equilibrium value integrates to one
    let mut normalisation = Vec::with_capacity(thetas.len());

    let sign = match game {
        GameType::CostMinimisation => 1.0,
        GameType::WelfareMaximisation => -1.0,
    };
    let mut var = 0;
    for col in 0..w.columns() {
        for t in &triples {
            let nash_coeff =
                t.a as f64 * f.at(t.a + t.x, col) - t.b as f64 * f.at(t.a + t.x + 1, col);
            nash_row.push((thetas[var], sign * nash_coeff));
            normalisation.push((thetas[var], w.at(t.a + t.x, col)));
            var += 1;
        }
    }

    program.add_constraint(nash_row, ComparisonOp::Le, 0.0);
    program.add_constraint(normalisation, ComparisonOp::Eq, 1.0);

    program
}
