use std::sync::Arc;

use crate::optimisation_algorithms::{
    linear_programming::{LinearProgram, LpSolution, SolverFailure},
    microlp_solver::MicrolpSolver,
};

/// An external linear-programming capability.
///
/// Implementations receive a fully assembled [`LinearProgram`] and either
/// return the optimal point and objective, or a [`SolverFailure`] carrying the
/// solver's status and message. Adapters must never substitute a default
/// result for a failed solve.
pub trait LpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverFailure>;
}

/// A solver configuration could not be constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The requested algorithm is not recognised by the chosen solver.
    UnknownMethod { method: String, known: &'static str },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigurationError::UnknownMethod { method, known } => write!(
                f,
                "unknown LP algorithm `{}`; this solver supports: {}",
                method, known
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// The solver and algorithm used for every LP solve of a computation.
///
/// Entry points take an `Option<&SolverConfig>`; passing `None` selects
/// [`SolverConfig::try_default`], which is backed by the `microlp` crate.
/// The solver is shared behind an [`Arc`] so that the multi-basis facade can
/// run its per-basis solves in parallel.
#[derive(Clone)]
pub struct SolverConfig {
    solver: Arc<dyn LpSolver + Send + Sync>,
    method: String,
}

impl std::fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConfig")
            .field("method", &self.method)
            .finish()
    }
}

impl SolverConfig {
    /// Use a caller-supplied solver implementation.
    pub fn new(solver: Arc<dyn LpSolver + Send + Sync>, method: impl Into<String>) -> Self {
        Self {
            solver,
            method: method.into(),
        }
    }

    /// The default configuration: microlp with its simplex algorithm.
    pub fn try_default() -> Result<Self, ConfigurationError> {
        Self::with_method(MicrolpSolver::DEFAULT_METHOD)
    }

    /// The microlp-backed solver with an explicitly named algorithm.
    pub fn with_method(method: &str) -> Result<Self, ConfigurationError> {
        let solver = MicrolpSolver::with_method(method)?;
        Ok(Self::new(Arc::new(solver), method))
    }

    /// Name of the selected algorithm.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn solve(&self, program: &LinearProgram) -> Result<LpSolution, SolverFailure> {
        self.solver.solve(program)
    }
}

/// Resolve an optional configuration to a concrete one, constructing the
/// default when none was supplied.
pub fn resolve_config(config: Option<&SolverConfig>) -> Result<SolverConfig, ConfigurationError> {
    match config {
        Some(config) => Ok(config.clone()),
        None => SolverConfig::try_default(),
    }
}
