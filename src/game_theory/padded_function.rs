use ndarray::{Array2, ArrayView1};

/// An input array whose shape violates the contracts of the price-of-anarchy
/// entry points. Raised eagerly, before any LP is assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// The game must have at least one player.
    NoPlayers,
    /// A padded function table needs at least `n + 2` rows.
    TooFewRows { required: usize, got: usize },
    /// Paired tables (`w` and `f`) must have the same number of columns.
    ColumnMismatch { left: usize, right: usize },
    /// Paired tables must be built for the same number of players.
    PlayerCountMismatch { left: usize, right: usize },
    /// A basis matrix must have shape `(m, n)` with `m >= 1`.
    WrongBasisShape { players: usize, rows: usize, columns: usize },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ShapeError::NoPlayers => write!(f, "the number of players must be at least 1"),
            ShapeError::TooFewRows { required, got } => write!(
                f,
                "a padded function table must have at least {} rows, but has {}",
                required, got
            ),
            ShapeError::ColumnMismatch { left, right } => write!(
                f,
                "the number of columns of `w` and `f` must match, but they are {} and {}",
                left, right
            ),
            ShapeError::PlayerCountMismatch { left, right } => write!(
                f,
                "paired function tables must agree on the number of players, but they are for {} and {}",
                left, right
            ),
            ShapeError::WrongBasisShape {
                players,
                rows,
                columns,
            } => write!(
                f,
                "a basis matrix for {} players must have shape (m >= 1, {}), but has shape ({}, {})",
                players, players, rows, columns
            ),
        }
    }
}

impl std::error::Error for ShapeError {}

/// Congestion-indexed function values, one column per basis function, with the
/// zero padding the constraint construction relies on.
///
/// Row `i` holds the values at congestion level `i`; the valid domain is
/// `0..=n+1` and rows `0` and `n+1` are structurally zero when the table is
/// built with [`PaddedFunctions::from_basis`]. Constraint rows may therefore
/// reference `w(a+x+1)` for `a+x = n` and read a zero instead of running off
/// the array.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedFunctions {
    n: usize,
    values: Array2<f64>,
}

impl PaddedFunctions {
    /// Pad an `(m, n)` basis matrix into an `(n+2, m)` table with zero rows at
    /// congestion `0` and `n+1`.
    pub fn from_basis(n: usize, basis: &Array2<f64>) -> Result<Self, ShapeError> {
        if n == 0 {
            return Err(ShapeError::NoPlayers);
        }
        if basis.nrows() == 0 || basis.ncols() != n {
            return Err(ShapeError::WrongBasisShape {
                players: n,
                rows: basis.nrows(),
                columns: basis.ncols(),
            });
        }
        let m = basis.nrows();
        let mut values = Array2::zeros((n + 2, m));
        for (col, row) in basis.outer_iter().enumerate() {
            for i in 0..n {
                values[[i + 1, col]] = row[i];
            }
        }
        Ok(Self { n, values })
    }

    /// Pad a single basis function of length `n` into an `(n+2, 1)` table.
    pub fn from_basis_row(n: usize, basis: ArrayView1<f64>) -> Result<Self, ShapeError> {
        let matrix = basis.to_owned().insert_axis(ndarray::Axis(0));
        Self::from_basis(n, &matrix)
    }

    /// Wrap a caller-supplied table that is already padded. The table must
    /// have at least `n + 2` rows; extra rows are carried along untouched,
    /// matching the inputs the assemblers accept.
    pub fn from_padded(n: usize, values: Array2<f64>) -> Result<Self, ShapeError> {
        if n == 0 {
            return Err(ShapeError::NoPlayers);
        }
        if values.nrows() < n + 2 {
            return Err(ShapeError::TooFewRows {
                required: n + 2,
                got: values.nrows(),
            });
        }
        Ok(Self { n, values })
    }

    pub fn number_of_players(&self) -> usize {
        self.n
    }

    /// Number of basis columns.
    pub fn columns(&self) -> usize {
        self.values.ncols()
    }

    /// Value at congestion level `x` in column `col`; `x` must be at most `n+1`.
    pub fn at(&self, x: usize, col: usize) -> f64 {
        debug_assert!(x <= self.n + 1);
        self.values[[x, col]]
    }

    /// Check that `self` and `other` can be paired in one LP: same number of
    /// players and the same number of basis columns.
    pub fn matches(&self, other: &Self) -> Result<(), ShapeError> {
        if self.n != other.n {
            return Err(ShapeError::PlayerCountMismatch {
                left: self.n,
                right: other.n,
            });
        }
        if self.columns() != other.columns() {
            return Err(ShapeError::ColumnMismatch {
                left: self.columns(),
                right: other.columns(),
            });
        }
        Ok(())
    }
}
