//! Random K-SAT instances.
//!
//! A K-SAT formula is a conjunction of `M` clauses, each a disjunction of `K`
//! literals over `N` Boolean variables. Variables are represented as spins in
//! `{-1, +1}` and a literal is true when `sign * x > 0`. The cost of a
//! configuration is the number of violated clauses.
//!
//! [`KSat`] implements [`SaProblem`](crate::sa::SaProblem) with single-spin
//! flip moves whose cost change is evaluated incrementally from the clauses
//! adjacent to the flipped variable.
//!
//! # References
//!
//! - Mézard, Parisi & Zecchina (2002), "Analytic and Algorithmic Solution of
//!   Random Satisfiability Problems"
//! - Selman, Mitchell & Levesque (1996), "Generating Hard Satisfiability Problems"

mod instance;
mod types;

pub use instance::KSat;
pub use types::{is_spin, Clause, Literal, Spin};
