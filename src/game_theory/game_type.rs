/// The two inefficiency semantics supported by the price-of-anarchy machinery.
///
/// In a cost-minimisation game the social objective is a cost that players
/// drive up at equilibrium; in a welfare-maximisation game it is a welfare
/// that players fail to reach. The LP multiplier `μ` equals the reciprocal of
/// the price of anarchy in the first case and the price of anarchy itself in
/// the second, so both game types report on the same `≥ 1`, higher-is-worse
/// scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameType {
    CostMinimisation,
    WelfareMaximisation,
}

impl GameType {
    /// Map the LP multiplier `μ` to the reported price of anarchy.
    pub fn poa_from_multiplier(&self, mu: f64) -> f64 {
        match self {
            GameType::CostMinimisation => 1.0 / mu,
            GameType::WelfareMaximisation => mu,
        }
    }

    /// Sign applied to the equilibrium-constraint rows of every LP variant.
    ///
    /// The base rows are written for welfare maximisation; cost minimisation
    /// negates row and right-hand side.
    pub(crate) fn row_sign(&self) -> f64 {
        match self {
            GameType::CostMinimisation => -1.0,
            GameType::WelfareMaximisation => 1.0,
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameType::CostMinimisation => write!(f, "cost-minimisation"),
            GameType::WelfareMaximisation => write!(f, "welfare-maximisation"),
        }
    }
}
