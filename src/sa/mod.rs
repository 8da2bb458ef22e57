//! Simulated Annealing (SA) with the Metropolis acceptance rule.
//!
//! A single-chain Markov walk that accepts non-worsening moves always and
//! worsening moves with probability `exp(-beta * delta)`. The inverse
//! temperature `beta` rises linearly over the stages of the schedule, and the
//! last stage runs at `beta = inf`, so every run ends in pure greedy descent.
//!
//! Problems expose an incremental move contract ([`SaProblem`]): the exact
//! cost change of a candidate move is computed without applying it, and the
//! runner maintains the cost from those deltas.
//!
//! # References
//!
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;
mod types;

pub use config::SaConfig;
pub use runner::{AcceptedMove, SaResult, SaRunner, StageStats};
pub use types::SaProblem;
