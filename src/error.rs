//! Error type shared by instance construction and the annealing runner.

use thiserror::Error;

/// Errors raised by `u-ksat`.
///
/// A run that ends with unsatisfied clauses is not an error; callers inspect
/// the reported cost instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KsatError {
    /// A construction or configuration parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Incremental cost bookkeeping diverged from a full recomputation.
    #[error("delta cost mismatch at step {step}: running cost {expected}, recomputed {actual}")]
    DeltaMismatch {
        /// Global proposal index at which the mismatch was detected.
        step: usize,
        /// Cost maintained incrementally by the runner.
        expected: usize,
        /// Cost obtained from a full re-evaluation.
        actual: usize,
    },
}

/// Result alias for fallible `u-ksat` operations.
pub type Result<T> = std::result::Result<T, KsatError>;
