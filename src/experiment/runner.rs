//! Solvability estimation and threshold interpolation.

use super::config::ExperimentConfig;
use crate::error::Result;
use crate::ksat::KSat;
use crate::sa::SaRunner;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use u_numflow::random::create_rng;

/// Empirical solvability at one `(N, M)` point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolvabilityPoint {
    /// Number of variables.
    pub n: usize,
    /// Number of clauses.
    pub m: usize,
    /// Number of annealed instances.
    pub trials: usize,
    /// Number of instances that ended at cost 0.
    pub solved: usize,
    /// `solved / trials`.
    pub probability: f64,
}

impl SolvabilityPoint {
    /// Clause density `M / N`.
    pub fn ratio(&self) -> f64 {
        self.m as f64 / self.n as f64
    }
}

/// Runs batches of annealing trials over random instances.
pub struct ExperimentRunner;

impl ExperimentRunner {
    /// Estimates `P(N, M)` from `config.trials` random instances.
    pub fn solvability(n: usize, m: usize, config: &ExperimentConfig) -> Result<SolvabilityPoint> {
        config.validate()?;
        let mut rng = master_rng(config);
        Self::solvability_with_rng(n, m, config, &mut rng)
    }

    /// Estimates `P(N, M)` for each `M`, drawing all trial seeds from a single
    /// master stream.
    pub fn sweep(
        n: usize,
        m_values: &[usize],
        config: &ExperimentConfig,
    ) -> Result<Vec<SolvabilityPoint>> {
        config.validate()?;
        let mut rng = master_rng(config);
        m_values
            .iter()
            .map(|&m| Self::solvability_with_rng(n, m, config, &mut rng))
            .collect()
    }

    /// Runs [`sweep`](Self::sweep) for each `N`. Every row restarts the master
    /// stream from `config.seed`.
    pub fn sweep_grid(
        n_values: &[usize],
        m_values: &[usize],
        config: &ExperimentConfig,
    ) -> Result<Vec<Vec<SolvabilityPoint>>> {
        n_values
            .iter()
            .map(|&n| Self::sweep(n, m_values, config))
            .collect()
    }

    fn solvability_with_rng<R: Rng>(
        n: usize,
        m: usize,
        config: &ExperimentConfig,
        rng: &mut R,
    ) -> Result<SolvabilityPoint> {
        // Seeds are drawn up front so the outcome does not depend on
        // whether trials run in parallel.
        let seeds: Vec<(u64, u64)> = (0..config.trials)
            .map(|_| (rng.random(), rng.random()))
            .collect();

        let solved = run_trials(n, m, config, &seeds)?
            .into_iter()
            .filter(|&ok| ok)
            .count();
        let probability = solved as f64 / config.trials as f64;

        tracing::info!(n, m, solved, trials = config.trials, probability, "solvability estimate");

        Ok(SolvabilityPoint {
            n,
            m,
            trials: config.trials,
            solved,
            probability,
        })
    }
}

/// Clause count at which the solvability curve crosses `level`, by linear
/// interpolation between neighbouring points.
///
/// Points are taken in the given order (normally increasing `M`). The first
/// crossing is returned; `None` if the curve never reaches `level`.
pub fn algorithmic_threshold(points: &[SolvabilityPoint], level: f64) -> Option<f64> {
    for pair in points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.probability == level {
            return Some(a.m as f64);
        }
        let crosses = (a.probability < level && level < b.probability)
            || (a.probability > level && level > b.probability);
        if crosses {
            let t = (level - a.probability) / (b.probability - a.probability);
            return Some(a.m as f64 + t * (b.m as f64 - a.m as f64));
        }
    }
    points
        .last()
        .filter(|p| p.probability == level)
        .map(|p| p.m as f64)
}

fn master_rng(config: &ExperimentConfig) -> impl Rng {
    create_rng(config.seed.unwrap_or_else(rand::random))
}

fn run_trial(n: usize, m: usize, config: &ExperimentConfig, seeds: (u64, u64)) -> Result<bool> {
    let ksat = KSat::with_seed(n, m, config.k, Some(seeds.0))?;
    let sa = config.sa.clone().with_seed(seeds.1);
    Ok(SaRunner::run(ksat, &sa)?.is_solved())
}

#[cfg(feature = "parallel")]
fn run_trials(
    n: usize,
    m: usize,
    config: &ExperimentConfig,
    seeds: &[(u64, u64)],
) -> Result<Vec<bool>> {
    if config.parallel {
        seeds
            .par_iter()
            .map(|&s| run_trial(n, m, config, s))
            .collect()
    } else {
        seeds.iter().map(|&s| run_trial(n, m, config, s)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    n: usize,
    m: usize,
    config: &ExperimentConfig,
    seeds: &[(u64, u64)],
) -> Result<Vec<bool>> {
    seeds.iter().map(|&s| run_trial(n, m, config, s)).collect()
}
