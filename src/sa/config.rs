//! SA configuration and the inverse-temperature schedule.

use crate::error::{KsatError, Result};

/// Configuration for the annealing runner.
///
/// The schedule has `anneal_steps` stages of `mcmc_steps` proposals each.
/// The first `anneal_steps - 1` stages use inverse temperatures linearly
/// spaced from `beta0` to `beta1`; the last stage is at `beta = inf`
/// (greedy descent).
///
/// # Examples
///
/// ```
/// use u_ksat::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_mcmc_steps(500)
///     .with_anneal_steps(10)
///     .with_betas(1.0, 10.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.schedule().len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Proposals per temperature stage.
    pub mcmc_steps: usize,

    /// Number of temperature stages, including the final greedy stage.
    pub anneal_steps: usize,

    /// Initial inverse temperature. Must be positive.
    pub beta0: f64,

    /// Last finite inverse temperature. Must be `>= beta0`.
    pub beta1: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Report the lowest-cost state of the whole trajectory instead of the
    /// final state.
    pub track_best: bool,

    /// Recompute the full cost after every accepted move and fail on any
    /// divergence from the incremental cost.
    pub check_delta_cost: bool,

    /// Record every accepted move in [`SaResult::trajectory`](super::SaResult).
    pub record_trajectory: bool,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            mcmc_steps: 500,
            anneal_steps: 10,
            beta0: 1.0,
            beta1: 10.0,
            seed: None,
            track_best: false,
            check_delta_cost: false,
            record_trajectory: false,
        }
    }
}

impl SaConfig {
    pub fn with_mcmc_steps(mut self, n: usize) -> Self {
        self.mcmc_steps = n;
        self
    }

    pub fn with_anneal_steps(mut self, n: usize) -> Self {
        self.anneal_steps = n;
        self
    }

    pub fn with_betas(mut self, beta0: f64, beta1: f64) -> Self {
        self.beta0 = beta0;
        self.beta1 = beta1;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_track_best(mut self, on: bool) -> Self {
        self.track_best = on;
        self
    }

    pub fn with_check_delta_cost(mut self, on: bool) -> Self {
        self.check_delta_cost = on;
        self
    }

    pub fn with_record_trajectory(mut self, on: bool) -> Self {
        self.record_trajectory = on;
        self
    }

    /// Total number of proposals a run performs.
    pub fn total_steps(&self) -> usize {
        self.mcmc_steps * self.anneal_steps
    }

    /// The inverse-temperature schedule.
    ///
    /// `anneal_steps - 1` values linearly spaced from `beta0` to `beta1`
    /// inclusive, followed by `f64::INFINITY`. With a single finite stage
    /// only `beta0` is used; with `anneal_steps == 1` the run is purely greedy.
    pub fn schedule(&self) -> Vec<f64> {
        let finite = self.anneal_steps.saturating_sub(1);
        let mut betas: Vec<f64> = match finite {
            0 => Vec::new(),
            1 => vec![self.beta0],
            _ => {
                let span = self.beta1 - self.beta0;
                let last = (finite - 1) as f64;
                (0..finite)
                    .map(|i| {
                        if i + 1 == finite {
                            self.beta1
                        } else {
                            self.beta0 + span * i as f64 / last
                        }
                    })
                    .collect()
            }
        };
        if self.anneal_steps > 0 {
            betas.push(f64::INFINITY);
        }
        betas
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.mcmc_steps == 0 {
            return Err(KsatError::InvalidParameter(
                "mcmc_steps must be at least 1".into(),
            ));
        }
        if self.anneal_steps == 0 {
            return Err(KsatError::InvalidParameter(
                "anneal_steps must be at least 1".into(),
            ));
        }
        if !self.beta0.is_finite() || self.beta0 <= 0.0 {
            return Err(KsatError::InvalidParameter(format!(
                "beta0 must be positive and finite, got {}",
                self.beta0
            )));
        }
        if self.beta1.is_nan() || self.beta1 < self.beta0 {
            return Err(KsatError::InvalidParameter(format!(
                "beta1 ({}) must be >= beta0 ({})",
                self.beta1, self.beta0
            )));
        }
        Ok(())
    }
}
