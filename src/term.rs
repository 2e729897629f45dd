//! Term representation for Concurrent Kleene Algebra.
//!
//! Defines the core [`Term`] type, its normalizing constructors, the
//! canonical printed form, containment, and the structural measures
//! (`nullable`, `is_trivial`, `width`) the closure computation is built
//! on.
//!
//! Terms are immutable values. The variant tree behind a `Term` is
//! private: every term observable from outside the crate has passed
//! through the constructors below, so unit and annihilation absorption,
//! idempotence of choice, and the star simplifications always hold on
//! the representation. Equality and hashing go through the canonical
//! printed form, which makes terms usable as set elements and map keys
//! throughout the solver.

use std::fmt;
use std::ops::{Add, BitOr, Mul};

use crate::error::TermError;

/// The variant tree behind [`Term`].
///
/// Crate-private so that raw variants cannot be assembled without the
/// normalizing constructors. The solver builds raw `Parallel` pairs as
/// symbol identifiers through [`Term::raw_parallel`]; everything else
/// goes through the public builders.
#[derive(Clone, Debug)]
pub(crate) enum TermKind {
    /// The additive identity; annihilates both compositions.
    Zero,
    /// The multiplicative identity of both compositions.
    One,
    /// An atomic action labeled by a single letter.
    Primitive(char),
    /// Commutative, idempotent sum of two terms.
    Choice(Box<Term>, Box<Term>),
    /// Sequential composition.
    Sequential(Box<Term>, Box<Term>),
    /// Parallel composition. Commutativity is a law of the algebra, not
    /// of the structure; containment accounts for it.
    Parallel(Box<Term>, Box<Term>),
    /// Kleene star.
    Star(Box<Term>),
    /// A solver unknown. Only appears in rendered inequations.
    Variable { name: String, index: String },
}

impl TermKind {
    /// Position in the operator order used for bracketing: a child
    /// prints without brackets iff its position is at most its parent's.
    fn precedence(&self) -> u8 {
        match self {
            TermKind::Zero => 0,
            TermKind::One => 1,
            TermKind::Primitive(_) => 2,
            TermKind::Variable { .. } => 3,
            TermKind::Star(_) => 4,
            TermKind::Sequential(_, _) => 5,
            TermKind::Parallel(_, _) => 6,
            TermKind::Choice(_, _) => 7,
        }
    }
}

/// A term of Concurrent Kleene Algebra.
///
/// Build terms with [`Term::zero`], [`Term::one`], [`Term::primitive`]
/// and combine them with [`Term::plus`], [`Term::seq`], [`Term::par`]
/// and [`Term::star`] (or the `+`, `*`, `|` operators, which delegate
/// to them).
#[derive(Clone, Debug)]
pub struct Term {
    pub(crate) kind: TermKind,
}

// ── Builders ───────────────────────────────────────────────────────────

impl Term {
    /// The term with empty semantics, printed `0`.
    pub fn zero() -> Term {
        Term { kind: TermKind::Zero }
    }

    /// The term containing exactly the empty behavior, printed `1`.
    pub fn one() -> Term {
        Term { kind: TermKind::One }
    }

    /// An atomic action.
    ///
    /// Labels are single characters: the canonical form renders
    /// sequential composition as juxtaposition, so a longer label would
    /// be indistinguishable from a sequence of shorter ones.
    pub fn primitive(letter: char) -> Term {
        Term {
            kind: TermKind::Primitive(letter),
        }
    }

    /// A solver unknown, printed `name[index]`.
    pub(crate) fn variable(name: impl Into<String>, index: impl Into<String>) -> Term {
        Term {
            kind: TermKind::Variable {
                name: name.into(),
                index: index.into(),
            },
        }
    }

    /// A parallel pair built without any folding. The solver uses these
    /// as symbol identifiers; they never escape into closure results.
    pub(crate) fn raw_parallel(left: Term, right: Term) -> Term {
        Term {
            kind: TermKind::Parallel(Box::new(left), Box::new(right)),
        }
    }

    /// The two sides of a parallel pair, if this is one.
    pub(crate) fn parallel_sides(&self) -> Option<(&Term, &Term)> {
        match &self.kind {
            TermKind::Parallel(left, right) => Some((left, right)),
            _ => None,
        }
    }
}

// ── Smart constructors ─────────────────────────────────────────────────

impl Term {
    /// The sum of two terms, normalized for units and absorption.
    ///
    /// `0` is dropped from either side; a summand already contained in
    /// the other is absorbed; `1 + aa*`, `1 + a*a` and their mirror
    /// images fold to `a*`.
    pub fn plus(self, other: Term) -> Term {
        if let Some(folded) = Term::fold_unit_star(&self, &other) {
            return folded;
        }
        if matches!(other.kind, TermKind::Zero) {
            return self;
        }
        if matches!(self.kind, TermKind::Zero) {
            return other;
        }
        if self.contains(&other) {
            return self;
        }
        if other.contains(&self) {
            return other;
        }
        Term {
            kind: TermKind::Choice(Box::new(self), Box::new(other)),
        }
    }

    /// Recognizes `1 + aa*` / `1 + a*a` (in either summand order) and
    /// folds the sum to the star.
    fn fold_unit_star(left: &Term, right: &Term) -> Option<Term> {
        let sequential = match (&left.kind, &right.kind) {
            (TermKind::One, TermKind::Sequential(l, r)) => (l, r),
            (TermKind::Sequential(l, r), TermKind::One) => (l, r),
            _ => return None,
        };
        let (l, r) = sequential;
        if let TermKind::Star(beneath) = &l.kind {
            if **beneath == **r {
                return Some((**l).clone());
            }
        }
        if let TermKind::Star(beneath) = &r.kind {
            if **beneath == **l {
                return Some((**r).clone());
            }
        }
        None
    }

    /// Sequential composition, normalized for units and annihilation.
    pub fn seq(self, other: Term) -> Term {
        if matches!(other.kind, TermKind::One) {
            return self;
        }
        if matches!(self.kind, TermKind::One) {
            return other;
        }
        if matches!(self.kind, TermKind::Zero) || matches!(other.kind, TermKind::Zero) {
            return Term::zero();
        }
        Term {
            kind: TermKind::Sequential(Box::new(self), Box::new(other)),
        }
    }

    /// Parallel composition, normalized for units and annihilation.
    pub fn par(self, other: Term) -> Term {
        if matches!(other.kind, TermKind::One) {
            return self;
        }
        if matches!(self.kind, TermKind::One) {
            return other;
        }
        if matches!(self.kind, TermKind::Zero) || matches!(other.kind, TermKind::Zero) {
            return Term::zero();
        }
        Term {
            kind: TermKind::Parallel(Box::new(self), Box::new(other)),
        }
    }

    /// Kleene star. `0* = 1* = 1`, and starring a star is the identity.
    pub fn star(self) -> Term {
        if matches!(self.kind, TermKind::Zero | TermKind::One) {
            return Term::one();
        }
        if matches!(self.kind, TermKind::Star(_)) {
            return self;
        }
        Term {
            kind: TermKind::Star(Box::new(self)),
        }
    }
}

impl Add for Term {
    type Output = Term;

    fn add(self, rhs: Term) -> Term {
        self.plus(rhs)
    }
}

impl Mul for Term {
    type Output = Term;

    fn mul(self, rhs: Term) -> Term {
        self.seq(rhs)
    }
}

impl BitOr for Term {
    type Output = Term;

    fn bitor(self, rhs: Term) -> Term {
        self.par(rhs)
    }
}

// ── Containment ────────────────────────────────────────────────────────

impl Term {
    /// Whether `other` is absorbed by this term when the two are summed.
    ///
    /// A term absorbs anything equal to it, a choice absorbs whatever
    /// either summand absorbs, a star absorbs `1` and whatever its body
    /// absorbs, and a parallel pair absorbs another parallel pair
    /// side-wise in either orientation.
    pub fn contains(&self, other: &Term) -> bool {
        match &self.kind {
            TermKind::Choice(left, right) => {
                self == other || left.contains(other) || right.contains(other)
            }
            TermKind::Star(beneath) => {
                matches!(other.kind, TermKind::One)
                    || beneath.contains(other)
                    || self == other
            }
            TermKind::Parallel(left, right) => match &other.kind {
                TermKind::Parallel(other_left, other_right) => {
                    (left.contains(other_left) && right.contains(other_right))
                        || (right.contains(other_left) && left.contains(other_right))
                }
                _ => self == other,
            },
            _ => self == other,
        }
    }

    /// Whether the term is free of solver variables.
    pub fn is_closed(&self) -> bool {
        match &self.kind {
            TermKind::Zero | TermKind::One | TermKind::Primitive(_) => true,
            TermKind::Variable { .. } => false,
            TermKind::Choice(left, right)
            | TermKind::Sequential(left, right)
            | TermKind::Parallel(left, right) => left.is_closed() && right.is_closed(),
            TermKind::Star(beneath) => beneath.is_closed(),
        }
    }
}

// ── Measures ───────────────────────────────────────────────────────────

impl Term {
    /// Whether the empty behavior belongs to this term's semantics.
    pub fn nullable(&self) -> Result<bool, TermError> {
        match &self.kind {
            TermKind::Zero | TermKind::Primitive(_) => Ok(false),
            TermKind::One | TermKind::Star(_) => Ok(true),
            TermKind::Choice(left, right) => Ok(left.nullable()? || right.nullable()?),
            TermKind::Sequential(left, right) | TermKind::Parallel(left, right) => {
                Ok(left.nullable()? && right.nullable()?)
            }
            TermKind::Variable { .. } => Err(self.unexpected_variable()),
        }
    }

    /// Whether this term's semantics is empty.
    pub fn is_trivial(&self) -> Result<bool, TermError> {
        match &self.kind {
            TermKind::Zero => Ok(true),
            TermKind::One | TermKind::Primitive(_) | TermKind::Star(_) => Ok(false),
            TermKind::Choice(left, right) => Ok(left.is_trivial()? && right.is_trivial()?),
            TermKind::Sequential(left, right) | TermKind::Parallel(left, right) => {
                Ok(left.is_trivial()? || right.is_trivial()?)
            }
            TermKind::Variable { .. } => Err(self.unexpected_variable()),
        }
    }

    /// The maximum degree of parallelism the term can exhibit. Trivial
    /// terms have width zero; the closure recursion descends on this
    /// measure.
    pub fn width(&self) -> Result<usize, TermError> {
        if self.is_trivial()? {
            return Ok(0);
        }
        match &self.kind {
            TermKind::Zero | TermKind::One => Ok(0),
            TermKind::Primitive(_) => Ok(1),
            TermKind::Star(beneath) => beneath.width(),
            TermKind::Choice(left, right) | TermKind::Sequential(left, right) => {
                Ok(left.width()?.max(right.width()?))
            }
            TermKind::Parallel(left, right) => Ok(left.width()? + right.width()?),
            TermKind::Variable { .. } => Err(self.unexpected_variable()),
        }
    }

    pub(crate) fn unexpected_variable(&self) -> TermError {
        TermError::UnexpectedVariable {
            variable: self.to_string(),
        }
    }
}

// ── Canonical form ─────────────────────────────────────────────────────

impl Term {
    fn fmt_child(&self, parent: &TermKind, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.precedence() <= parent.precedence() {
            write!(f, "{}", self)
        } else {
            write!(f, "({})", self)
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TermKind::Zero => write!(f, "0"),
            TermKind::One => write!(f, "1"),
            TermKind::Primitive(letter) => write!(f, "{letter}"),
            TermKind::Variable { name, index } => write!(f, "{name}[{index}]"),
            TermKind::Star(beneath) => {
                beneath.fmt_child(&self.kind, f)?;
                write!(f, "*")
            }
            TermKind::Sequential(left, right) => {
                left.fmt_child(&self.kind, f)?;
                right.fmt_child(&self.kind, f)
            }
            TermKind::Parallel(left, right) => {
                left.fmt_child(&self.kind, f)?;
                write!(f, "‖")?;
                right.fmt_child(&self.kind, f)
            }
            TermKind::Choice(left, right) => {
                left.fmt_child(&self.kind, f)?;
                write!(f, " + ")?;
                right.fmt_child(&self.kind, f)
            }
        }
    }
}

// Identity follows the canonical printed form, so structurally distinct
// spellings of the same normalized shape (e.g. the two associations of a
// sequence) compare and hash alike.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Term {}

impl std::hash::Hash for Term {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
