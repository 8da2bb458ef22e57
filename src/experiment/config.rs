//! Experiment configuration.

use crate::error::{KsatError, Result};
use crate::sa::SaConfig;

/// Configuration of a solvability experiment.
///
/// `sa.seed` is ignored: every trial receives its own annealing seed drawn
/// from the experiment's master stream.
///
/// # Examples
///
/// ```
/// use u_ksat::experiment::ExperimentConfig;
/// use u_ksat::sa::SaConfig;
///
/// let config = ExperimentConfig::default()
///     .with_trials(30)
///     .with_k(3)
///     .with_sa(SaConfig::default().with_mcmc_steps(500))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Number of random instances per `(N, M)` point.
    pub trials: usize,

    /// Clause width.
    pub k: usize,

    /// Annealing parameters applied to every trial.
    pub sa: SaConfig,

    /// Master seed from which instance and annealing seeds are drawn.
    pub seed: Option<u64>,

    /// Run trials in parallel. Only effective with the `parallel` feature.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials: 30,
            k: 3,
            sa: SaConfig::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    pub fn with_trials(mut self, n: usize) -> Self {
        self.trials = n;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    /// Validates the configuration, including the nested [`SaConfig`].
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(KsatError::InvalidParameter(
                "trials must be at least 1".into(),
            ));
        }
        if self.k < 2 {
            return Err(KsatError::InvalidParameter(format!(
                "k must be >= 2, got {}",
                self.k
            )));
        }
        self.sa.validate()
    }
}
