/// A single equilibrium-deviation scenario on one resource: `a` players that
/// follow the equilibrium, `b` players that follow the optimum, and `x`
/// players that do both. All constraint rows of the price-of-anarchy LPs are
/// indexed by such triples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviationTriple {
    pub a: usize,
    pub b: usize,
    pub x: usize,
}

impl DeviationTriple {
    pub fn new(a: usize, b: usize, x: usize) -> Self {
        Self { a, b, x }
    }
}

/// The full index set `I`: every triple with `a + b + x <= n` except the
/// all-zero one, in lexicographic order.
///
/// Contains exactly `(n+1)(n+2)(n+3)/6 - 1` triples. Used by the primal LP,
/// which carries one decision variable per triple and basis column.
pub fn full_index_set(n: usize) -> Vec<DeviationTriple> {
    let mut triples = Vec::with_capacity(full_index_set_len(n));
    for a in 0..=n {
        for b in 0..=(n - a) {
            for x in 0..=(n - a - b) {
                if a == 0 && b == 0 && x == 0 {
                    continue;
                }
                triples.push(DeviationTriple::new(a, b, x));
            }
        }
    }
    triples
}

/// Number of triples in [`full_index_set`].
pub fn full_index_set_len(n: usize) -> usize {
    (n + 1) * (n + 2) * (n + 3) / 6 - 1
}

/// The restricted index set `I_R`: the boundary of the simplex `a + b + x <= n`
/// that the dual and optimisation LPs need.
///
/// Three triangular faces (`x = 0` with `a >= 1`, `a = 0` with `b >= 1`,
/// `b = 0` with `x >= 1`) of `n(n+1)/2` triples each, followed by the interior
/// of the plane `a + b + x = n` where all three coordinates are at least 1.
/// Contains exactly `2n^2 + 1` triples.
pub fn restricted_index_set(n: usize) -> Vec<DeviationTriple> {
    let mut triples = Vec::with_capacity(restricted_index_set_len(n));

    // each face enumerates the pairs (i, j) with i >= 1 and i + j <= n
    for i in 1..=n {
        for j in 0..=(n - i) {
            triples.push(DeviationTriple::new(i, j, 0));
        }
    }
    for i in 1..=n {
        for j in 0..=(n - i) {
            triples.push(DeviationTriple::new(0, i, j));
        }
    }
    for i in 1..=n {
        for j in 0..=(n - i) {
            triples.push(DeviationTriple::new(j, 0, i));
        }
    }

    for a in 1..=n {
        for b in 1..=(n.saturating_sub(a)) {
            let x = n - a - b;
            if x >= 1 {
                triples.push(DeviationTriple::new(a, b, x));
            }
        }
    }

    triples
}

/// Number of triples in [`restricted_index_set`].
pub fn restricted_index_set_len(n: usize) -> usize {
    2 * n * n + 1
}
