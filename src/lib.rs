//! Closure of Concurrent Kleene Algebra terms.
//!
//! Concurrent Kleene Algebra extends Kleene algebra with a commutative
//! parallel operator `‖` tied to sequential composition by the exchange
//! law. For any term built from choice (`+`), sequencing, parallel
//! composition and iteration (`*`), this crate computes an equivalent
//! term that is closed under that law: every behavior obtainable by
//! interleaving a parallel composition is present in the result's
//! choice-and-sequence structure.
//!
//! The computation reduces each parallel composition to a system of
//! linear inequations over the term algebra, with unknowns drawn from
//! the sequential remainders of the two sides, and solves it by
//! variable elimination using the Kleene algebra fixpoint identity
//! (the least `X` with `X ≥ aX + b` is `a*b`).
//!
//! # Architecture
//!
//! - [`term`]: term representation, normalizing constructors, canonical
//!   form, containment, structural measures
//! - [`splice`]: sequential and parallel decompositions, remainders
//! - [`closure`]: the width-descending closure computation
//! - [`solve`]: linear inequation systems and their least solutions
//! - [`error`]: the error for operations that need closed terms
//!
//! # Example
//!
//! ```
//! use cka_closure::Term;
//!
//! let a = Term::primitive('a');
//! let b = Term::primitive('b');
//! let closed = (a | b).closure()?;
//! assert_eq!(closed.to_string(), "a‖b + ab + ba");
//! # Ok::<(), cka_closure::TermError>(())
//! ```

pub mod closure;
pub mod error;
pub mod solve;
pub mod splice;
pub mod term;

pub use crate::error::TermError;
pub use crate::solve::LinearSystem;
pub use crate::splice::Splicing;
pub use crate::term::Term;
