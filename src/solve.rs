//! Linear inequation systems over the term algebra.
//!
//! The closure of a parallel composition `L ‖ R` is the least solution
//! of a system `X ≥ A·X + b` whose unknowns are the parallel pairs of
//! `remainders(L) × remainders(R)`. The constant of a pair is its
//! normalized composition; the coefficient from one pair to another
//! collects a preclosure for every way a sequential splicing of both
//! sides steps from the first pair to the second.
//!
//! Solving is variable elimination over a Kleene algebra: the least `X`
//! with `X ≥ aX + b` is `a*b`, which solves a one-unknown system
//! directly and lets a larger system shed one unknown per step.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::closure::{preclosure, ClosureCtx};
use crate::error::TermError;
use crate::splice::{sorted_splicings, sorted_terms};
use crate::term::Term;

/// A system of linear inequations with term coefficients.
///
/// Symbols are raw parallel pairs acting as identifiers; they keep
/// their unnormalized shape so that, say, the pair `1 ‖ b` stays
/// distinct from the pair `b ‖ 1` and from plain `b`. The normalized
/// composition only enters through the constant vector.
pub struct LinearSystem {
    /// The unknowns, in canonical order. The first symbol is the
    /// elimination pivot, so ordering here pins down the output shape.
    symbols: Vec<Term>,
    /// Coefficient of the column symbol in the row symbol's inequation.
    matrix: FxHashMap<(Term, Term), Term>,
    /// Constant part of each symbol's inequation.
    vector: FxHashMap<Term, Term>,
}

impl LinearSystem {
    /// Builds the system whose least solution at the pair
    /// `left ‖ right` is the closure of that parallel composition.
    pub fn new(left: &Term, right: &Term) -> Result<Self, TermError> {
        Self::build(left, right, &mut ClosureCtx::default())
    }

    pub(crate) fn build(
        left: &Term,
        right: &Term,
        ctx: &mut ClosureCtx,
    ) -> Result<Self, TermError> {
        let left_remainders = sorted_terms(left.remainders()?);
        let right_remainders = sorted_terms(right.remainders()?);

        let mut symbols = Vec::with_capacity(left_remainders.len() * right_remainders.len());
        for l in &left_remainders {
            for r in &right_remainders {
                symbols.push(Term::raw_parallel(l.clone(), r.clone()));
            }
        }
        symbols.sort_by_cached_key(|symbol| symbol.to_string());

        let mut vector = FxHashMap::default();
        let mut matrix = FxHashMap::default();
        for s1 in &symbols {
            let (l, r) = s1
                .parallel_sides()
                .expect("every solver symbol is a parallel pair");
            vector.insert(s1.clone(), l.clone().par(r.clone()));
            for s2 in &symbols {
                matrix.insert((s1.clone(), s2.clone()), Term::zero());
            }
        }

        for s1 in &symbols {
            let (l, r) = s1
                .parallel_sides()
                .expect("every solver symbol is a parallel pair");
            let left_splicings = sorted_splicings(l.ssplicings()?);
            let right_splicings = sorted_splicings(r.ssplicings()?);
            for (g1, h1) in &left_splicings {
                for (g2, h2) in &right_splicings {
                    let target = Term::raw_parallel(h1.clone(), h2.clone());
                    let coefficient = preclosure(g1, g2, ctx)?;
                    let entry = matrix
                        .get_mut(&(s1.clone(), target))
                        .expect("splicing remainder escaped the symbol set");
                    *entry = entry.clone().plus(coefficient);
                }
            }
        }

        Ok(LinearSystem {
            symbols,
            matrix,
            vector,
        })
    }

    /// The unknowns of the system, in canonical order.
    pub fn symbols(&self) -> &[Term] {
        &self.symbols
    }

    /// Solves the system, returning the least solution for every
    /// symbol.
    pub fn solve(&self) -> FxHashMap<Term, Term> {
        Self::eliminate(&self.symbols, &self.matrix, &self.vector)
    }

    /// One elimination step: the first symbol is pivoted out, the rest
    /// are solved recursively, and the pivot is recovered by
    /// back-substitution through the fixpoint identity.
    fn eliminate(
        symbols: &[Term],
        matrix: &FxHashMap<(Term, Term), Term>,
        vector: &FxHashMap<Term, Term>,
    ) -> FxHashMap<Term, Term> {
        let (pivot, rest) = symbols
            .split_first()
            .expect("a linear system always has at least one symbol");
        let entry = |row: &Term, column: &Term| -> Term {
            matrix
                .get(&(row.clone(), column.clone()))
                .expect("matrix entry missing for a symbol pair")
                .clone()
        };
        let constant = |symbol: &Term| -> Term {
            vector
                .get(symbol)
                .expect("vector entry missing for a symbol")
                .clone()
        };

        let loop_star = entry(pivot, pivot).star();

        if rest.is_empty() {
            let mut solution = FxHashMap::default();
            solution.insert(pivot.clone(), loop_star.seq(constant(pivot)));
            return solution;
        }

        let mut subvector = FxHashMap::default();
        for row in rest {
            subvector.insert(
                row.clone(),
                constant(row).plus(entry(row, pivot).seq(constant(pivot))),
            );
        }

        let mut submatrix = FxHashMap::default();
        for row in rest {
            for column in rest {
                let through_pivot = entry(row, pivot)
                    .seq(loop_star.clone())
                    .seq(entry(pivot, column));
                submatrix.insert(
                    (row.clone(), column.clone()),
                    through_pivot.plus(entry(row, column)),
                );
            }
        }

        let mut solution = Self::eliminate(rest, &submatrix, &subvector);

        let mut substituted = constant(pivot);
        for column in rest {
            let solved = solution
                .get(column)
                .expect("solution missing an already-eliminated symbol")
                .clone();
            substituted = substituted.plus(entry(pivot, column).seq(solved));
        }
        solution.insert(pivot.clone(), loop_star.seq(substituted));
        solution
    }

    fn unknown(symbol: &Term) -> Term {
        Term::variable("X", symbol.to_string())
    }
}

impl fmt::Display for LinearSystem {
    /// Renders the system as one inequation per symbol, in canonical
    /// symbol order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s1) in self.symbols.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let mut lhs = self
                .vector
                .get(s1)
                .expect("vector entry missing for a symbol")
                .clone();
            for s2 in &self.symbols {
                let coefficient = self
                    .matrix
                    .get(&(s1.clone(), s2.clone()))
                    .expect("matrix entry missing for a symbol pair")
                    .clone();
                lhs = lhs.plus(coefficient.seq(Self::unknown(s2)));
            }
            write!(f, "{} ≤ {}", lhs, Self::unknown(s1))?;
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(letter: char) -> Term {
        Term::primitive(letter)
    }

    fn solved(solution: &FxHashMap<Term, Term>, symbol: &str) -> String {
        solution
            .iter()
            .find(|(key, _)| key.to_string() == symbol)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| panic!("no solution for {symbol}"))
    }

    #[test]
    fn symbols_cover_the_remainder_pairs() {
        let system = LinearSystem::new(&prim('a'), &prim('b')).unwrap();
        let rendered: Vec<String> = system.symbols().iter().map(Term::to_string).collect();
        assert_eq!(rendered, ["1‖1", "1‖b", "a‖1", "a‖b"]);
    }

    #[test]
    fn primitive_pair_solution() {
        let system = LinearSystem::new(&prim('a'), &prim('b')).unwrap();
        let solution = system.solve();
        assert_eq!(solution.len(), 4);
        assert_eq!(solved(&solution, "1‖1"), "1");
        assert_eq!(solved(&solution, "1‖b"), "b");
        assert_eq!(solved(&solution, "a‖1"), "a");
        assert_eq!(solved(&solution, "a‖b"), "a‖b + ab + ba");
    }

    #[test]
    fn variables_stay_out_of_solutions() {
        let system = LinearSystem::new(&prim('a'), &prim('b')).unwrap();
        for value in system.solve().values() {
            assert!(value.is_closed());
        }
    }
}
