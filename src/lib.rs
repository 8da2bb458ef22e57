//! Random K-SAT instances and Metropolis simulated annealing.
//!
//! Provides the pieces needed to estimate empirical solvability near the
//! satisfiability phase transition:
//!
//! - **K-SAT instances** ([`ksat`]): uniformly random formulas with `M`
//!   clauses of `K` distinct variables over `N` spins, a mutable
//!   configuration, exact cost evaluation and `O(degree * K)` incremental
//!   delta evaluation for single-spin flips.
//! - **Simulated Annealing** ([`sa`]): a Metropolis chain driven through a
//!   linear inverse-temperature schedule that always ends with a
//!   zero-temperature (greedy) stage.
//! - **Experiments** ([`experiment`]): batches of independent trials that
//!   estimate the solvability probability `P(N, M)` and interpolate the
//!   algorithmic threshold.
//!
//! # Example
//!
//! ```
//! use u_ksat::ksat::KSat;
//! use u_ksat::sa::{SaConfig, SaRunner};
//!
//! let ksat = KSat::with_seed(200, 200, 3, Some(42)).unwrap();
//! let config = SaConfig::default()
//!     .with_mcmc_steps(500)
//!     .with_anneal_steps(10)
//!     .with_betas(1.0, 10.0)
//!     .with_seed(42);
//!
//! let result = SaRunner::run(ksat, &config).unwrap();
//! assert_eq!(result.instance.cost(), result.cost);
//! ```
//!
//! # Reproducibility
//!
//! Every run owns its random stream. Instances and runs built from the same
//! seed are identical, and parallel trials never share state.

pub mod error;
pub mod experiment;
pub mod ksat;
pub mod sa;

pub use error::{KsatError, Result};
