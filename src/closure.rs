//! Closure of terms under the exchange law.
//!
//! The closure of a term is an equivalent term in which every parallel
//! composition has been unfolded into choice-and-sequence structure.
//! Closure is compositional everywhere except at a parallel node, where
//! it is the least solution of a linear inequation system (built in
//! [`crate::solve`]) over the parallel pairs of the two sides'
//! remainders.
//!
//! The recursion terminates because every recursive closure of a
//! parallel composition happens through [`preclosure`], which only
//! descends into decompositions of strictly smaller width.

use rustc_hash::FxHashMap;

use crate::error::TermError;
use crate::solve::LinearSystem;
use crate::splice::sorted_splicings;
use crate::term::{Term, TermKind};

/// State shared across one closure computation.
///
/// Closure results depend only on the input term, and narrow parallel
/// pairs recur many times across a linear system's coefficients, so
/// results are cached per term.
#[derive(Default)]
pub(crate) struct ClosureCtx {
    cache: FxHashMap<Term, Term>,
}

impl Term {
    /// Rewrites this term into an equivalent one whose parallel
    /// compositions are expressed through choice, sequencing and star.
    ///
    /// The output is deterministic: everywhere an iteration order is
    /// observable (splicing sums, solver pivots), terms are visited in
    /// canonical order.
    pub fn closure(&self) -> Result<Term, TermError> {
        self.closure_with(&mut ClosureCtx::default())
    }

    pub(crate) fn closure_with(&self, ctx: &mut ClosureCtx) -> Result<Term, TermError> {
        if let Some(hit) = ctx.cache.get(self) {
            return Ok(hit.clone());
        }
        let closed = match &self.kind {
            TermKind::Zero | TermKind::One | TermKind::Primitive(_) => self.clone(),
            TermKind::Choice(left, right) => {
                left.closure_with(ctx)?.plus(right.closure_with(ctx)?)
            }
            TermKind::Sequential(left, right) => {
                left.closure_with(ctx)?.seq(right.closure_with(ctx)?)
            }
            TermKind::Star(beneath) => beneath.closure_with(ctx)?.star(),
            TermKind::Parallel(left, right) => {
                let system = LinearSystem::build(left, right, ctx)?;
                let symbol = Term::raw_parallel((**left).clone(), (**right).clone());
                let mut solution = system.solve();
                solution
                    .remove(&symbol)
                    .expect("linear system solution is missing the symbol it was built for")
            }
            TermKind::Variable { .. } => return Err(self.unexpected_variable()),
        };
        ctx.cache.insert(self.clone(), closed.clone());
        Ok(closed)
    }
}

/// The width-descending part of a parallel pair's closure: the pair
/// itself, plus the closures of every parallel decomposition in which
/// both parts are strictly narrower than the whole.
///
/// The width guard is what makes the mutual recursion with
/// [`Term::closure`] well-founded.
pub(crate) fn preclosure(
    left: &Term,
    right: &Term,
    ctx: &mut ClosureCtx,
) -> Result<Term, TermError> {
    let pair = Term::raw_parallel(left.clone(), right.clone());
    let bound = pair.width()?;
    let mut acc = left.clone().par(right.clone());
    for (g, h) in sorted_splicings(pair.psplicings()?) {
        if g.width()? < bound && h.width()? < bound {
            acc = acc.plus(g.closure_with(ctx)?.par(h.closure_with(ctx)?));
        }
    }
    Ok(acc)
}

// ── Tests ──────────────────────────────────────────────────────────────
