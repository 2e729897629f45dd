//! Sequential and parallel decompositions of closed terms.
//!
//! A splicing of a term `t` is a pair `(g, h)` that recombines into
//! something `t` absorbs: `g` followed by `h` for a sequential splicing,
//! `g` alongside `h` for a parallel one. Both sets are finite because
//! the parts are assembled from sub-terms of `t`, and both are the raw
//! material of the closure computation: sequential splicings generate
//! the solver's state space (through [`Term::remainders`]) and parallel
//! splicings generate the width-descending decompositions of
//! preclosure.

use rustc_hash::FxHashSet;

use crate::error::TermError;
use crate::term::{Term, TermKind};

/// A decomposition of a term into two parts.
pub type Splicing = (Term, Term);

impl Term {
    /// All pairs `(g, h)` such that `g · h` is absorbed by this term.
    pub fn ssplicings(&self) -> Result<FxHashSet<Splicing>, TermError> {
        let mut out = FxHashSet::default();
        match &self.kind {
            TermKind::Zero => {}
            TermKind::One => {
                out.insert((Term::one(), Term::one()));
            }
            TermKind::Primitive(_) => {
                out.insert((self.clone(), Term::one()));
                out.insert((Term::one(), self.clone()));
            }
            TermKind::Choice(left, right) => {
                out.extend(left.ssplicings()?);
                out.extend(right.ssplicings()?);
            }
            TermKind::Sequential(left, right) => {
                for (g, h) in right.ssplicings()? {
                    out.insert(((**left).clone().seq(g), h));
                }
                for (g, h) in left.ssplicings()? {
                    out.insert((g, h.seq((**right).clone())));
                }
            }
            TermKind::Parallel(left, right) => {
                let left_pairs = left.ssplicings()?;
                let right_pairs = right.ssplicings()?;
                for (g1, h1) in &left_pairs {
                    for (g2, h2) in &right_pairs {
                        out.insert((
                            g1.clone().par(g2.clone()),
                            h1.clone().par(h2.clone()),
                        ));
                    }
                }
            }
            TermKind::Star(beneath) => {
                // A starred term splits around any split of its body,
                // with the star re-entered on both sides.
                for (g, h) in beneath.ssplicings()? {
                    out.insert((self.clone().seq(g), h.seq(self.clone())));
                }
                out.insert((Term::one(), Term::one()));
            }
            TermKind::Variable { .. } => return Err(self.unexpected_variable()),
        }
        Ok(out)
    }

    /// All pairs `(g, h)` such that `g ‖ h` is absorbed by this term,
    /// including the two unit pairs `(t, 1)` and `(1, t)`.
    pub fn psplicings(&self) -> Result<FxHashSet<Splicing>, TermError> {
        let mut out = self.proper_psplicings()?;
        out.insert((self.clone(), Term::one()));
        out.insert((Term::one(), self.clone()));
        Ok(out)
    }

    /// Parallel splicings other than the unit pairs of this term itself.
    fn proper_psplicings(&self) -> Result<FxHashSet<Splicing>, TermError> {
        let mut out = FxHashSet::default();
        match &self.kind {
            TermKind::Zero | TermKind::One | TermKind::Primitive(_) => {}
            TermKind::Choice(left, right) => {
                out.extend(left.psplicings()?);
                out.extend(right.psplicings()?);
            }
            TermKind::Sequential(left, right) => {
                // A parallel split only crosses a sequence through a
                // nullable counterpart.
                if right.nullable()? {
                    out.extend(left.psplicings()?);
                }
                if left.nullable()? {
                    out.extend(right.psplicings()?);
                }
            }
            TermKind::Parallel(left, right) => {
                let left_pairs = left.psplicings()?;
                let right_pairs = right.psplicings()?;
                for (g1, h1) in &left_pairs {
                    for (g2, h2) in &right_pairs {
                        out.insert((
                            g1.clone().par(g2.clone()),
                            h1.clone().par(h2.clone()),
                        ));
                    }
                }
            }
            TermKind::Star(beneath) => {
                out.extend(beneath.psplicings()?);
            }
            TermKind::Variable { .. } => return Err(self.unexpected_variable()),
        }
        Ok(out)
    }

    /// The set of terms reachable as right components of chained
    /// sequential splicings, this term included. This is the state space
    /// of the linear system built for a parallel composition.
    pub fn remainders(&self) -> Result<FxHashSet<Term>, TermError> {
        let mut seen = FxHashSet::default();
        self.collect_remainders(&mut seen)?;
        Ok(seen)
    }

    fn collect_remainders(&self, seen: &mut FxHashSet<Term>) -> Result<(), TermError> {
        if !seen.insert(self.clone()) {
            return Ok(());
        }
        for (_, rest) in self.ssplicings()? {
            rest.collect_remainders(seen)?;
        }
        Ok(())
    }
}

/// Orders a set of terms by canonical form, for reproducible iteration.
pub(crate) fn sorted_terms(set: FxHashSet<Term>) -> Vec<Term> {
    let mut terms: Vec<Term> = set.into_iter().collect();
    terms.sort_by_cached_key(|t| t.to_string());
    terms
}

/// Orders a set of splicings by the canonical forms of both components.
pub(crate) fn sorted_splicings(set: FxHashSet<Splicing>) -> Vec<Splicing> {
    let mut pairs: Vec<Splicing> = set.into_iter().collect();
    pairs.sort_by_cached_key(|(g, h)| (g.to_string(), h.to_string()));
    pairs
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(letter: char) -> Term {
        Term::primitive(letter)
    }

    fn pair(g: &str, h: &str, set: &FxHashSet<Splicing>) -> bool {
        set.iter()
            .any(|(a, b)| a.to_string() == g && b.to_string() == h)
    }

    #[test]
    fn ssplicings_of_units_and_primitives() {
        assert!(Term::zero().ssplicings().unwrap().is_empty());

        let one = Term::one().ssplicings().unwrap();
        assert_eq!(one.len(), 1);
        assert!(pair("1", "1", &one));

        let a = prim('a').ssplicings().unwrap();
        assert_eq!(a.len(), 2);
        assert!(pair("a", "1", &a));
        assert!(pair("1", "a", &a));
    }

    #[test]
    fn ssplicings_of_a_sequence() {
        let ab = (prim('a') * prim('b')).ssplicings().unwrap();
        assert_eq!(ab.len(), 3);
        assert!(pair("ab", "1", &ab));
        assert!(pair("a", "b", &ab));
        assert!(pair("1", "ab", &ab));
    }

    #[test]
    fn ssplicings_of_a_star() {
        let star = prim('a').star().ssplicings().unwrap();
        assert_eq!(star.len(), 3);
        assert!(pair("a*a", "a*", &star));
        assert!(pair("a*", "aa*", &star));
        assert!(pair("1", "1", &star));
    }

    #[test]
    fn ssplicings_of_a_parallel_pair() {
        let par = (prim('a') | prim('b')).ssplicings().unwrap();
        assert_eq!(par.len(), 4);
        assert!(pair("a‖b", "1", &par));
        assert!(pair("a", "b", &par));
        assert!(pair("b", "a", &par));
        assert!(pair("1", "a‖b", &par));
    }

    #[test]
    fn sequential_splicings_recombine_into_the_term() {
        // Terms whose recombinations land on shapes the structural
        // containment of `+`-normalization recognizes.
        for term in [
            prim('a'),
            prim('a') * prim('b'),
            prim('a') * prim('b') * prim('c'),
            prim('a') + prim('b'),
        ] {
            for (g, h) in term.ssplicings().unwrap() {
                let recombined = g.seq(h);
                assert!(
                    term.contains(&recombined),
                    "{term} does not absorb {recombined}"
                );
            }
        }
    }

    #[test]
    fn psplicings_always_hold_the_unit_pairs() {
        for term in [
            Term::zero(),
            Term::one(),
            prim('a'),
            prim('a') * prim('b'),
            prim('a').star(),
            prim('a') | prim('b'),
        ] {
            let splicings = term.psplicings().unwrap();
            let rendered = term.to_string();
            assert!(pair(&rendered, "1", &splicings));
            assert!(pair("1", &rendered, &splicings));
        }
    }

    #[test]
    fn parallel_splicings_recombine_into_the_term() {
        let term = prim('a') | prim('b');
        for (g, h) in term.psplicings().unwrap() {
            let recombined = g.par(h);
            assert!(
                term.contains(&recombined),
                "{term} does not absorb {recombined}"
            );
        }
    }

    #[test]
    fn psplicings_cross_sequences_only_through_nullable_sides() {
        // In ab neither factor is nullable, so only the unit pairs
        // remain.
        let guarded = (prim('a') * prim('b')).psplicings().unwrap();
        assert_eq!(guarded.len(), 2);

        // In a*b the star is nullable, so b's splittings cross the
        // sequence, but the star's own do not.
        let one_sided = (prim('a').star() * prim('b')).psplicings().unwrap();
        assert_eq!(one_sided.len(), 4);
        assert!(pair("b", "1", &one_sided));
        assert!(!pair("a*", "1", &one_sided));

        // In a*b* both sides are nullable and both contribute.
        let open = (prim('a').star() * prim('b').star()).psplicings().unwrap();
        assert!(pair("a*", "1", &open));
        assert!(pair("b*", "1", &open));
        assert!(pair("a*b*", "1", &open));
    }

    #[test]
    fn remainders_of_simple_terms() {
        let a = prim('a').remainders().unwrap();
        let rendered: Vec<String> = sorted_terms(a).iter().map(Term::to_string).collect();
        assert_eq!(rendered, ["1", "a"]);

        let star = prim('a').star().remainders().unwrap();
        let rendered: Vec<String> = sorted_terms(star).iter().map(Term::to_string).collect();
        assert_eq!(rendered, ["1", "a*", "aa*"]);

        let par = (prim('a') | prim('b')).remainders().unwrap();
        let rendered: Vec<String> = sorted_terms(par).iter().map(Term::to_string).collect();
        assert_eq!(rendered, ["1", "a", "a‖b", "b"]);
    }

    #[test]
    fn remainders_are_closed_under_splicing() {
        for term in [
            prim('a') * prim('b'),
            prim('a').star(),
            prim('a') | prim('b'),
            (prim('a') * prim('b')).star(),
        ] {
            let remainders = term.remainders().unwrap();
            assert!(remainders.contains(&term));
            for member in &remainders {
                for (_, rest) in member.ssplicings().unwrap() {
                    assert!(
                        remainders.contains(&rest),
                        "remainders of {term} are missing {rest}"
                    );
                }
            }
        }
    }

    #[test]
    fn splicings_reject_variables() {
        let wrapped = prim('a').seq(Term::variable("X", "1"));
        assert!(wrapped.ssplicings().is_err());
        assert!(wrapped.psplicings().is_err());
        assert!(wrapped.remainders().is_err());
    }
}
