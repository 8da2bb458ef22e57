//! Empirical solvability of random K-SAT under annealing.
//!
//! For a given `(N, M)`, many random instances are drawn and annealed; the
//! fraction that ends at cost 0 estimates the probability `P(N, M)` that the
//! algorithm solves a random instance. Sweeping `M` locates the algorithmic
//! threshold, the clause count at which `P` crosses one half.
//!
//! Plotting and reporting are left to callers.

mod config;
mod runner;

pub use config::ExperimentConfig;
pub use runner::{algorithmic_threshold, ExperimentRunner, SolvabilityPoint};
