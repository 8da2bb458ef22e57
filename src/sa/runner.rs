//! SA execution loop.

use super::config::SaConfig;
use super::types::SaProblem;
use crate::error::{KsatError, Result};
use rand::Rng;
use u_numflow::random::create_rng;

/// Statistics of one temperature stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageStats {
    /// Inverse temperature of the stage (`inf` for the greedy stage).
    pub beta: f64,
    /// Number of proposals made.
    pub proposed: usize,
    /// Number of accepted proposals.
    pub accepted: usize,
    /// Current cost at the end of the stage.
    pub cost: usize,
}

impl StageStats {
    /// Fraction of accepted proposals.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// One accepted move, as recorded when
/// [`SaConfig::record_trajectory`] is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedMove<M> {
    /// Global proposal index, `0..total_steps`.
    pub step: usize,
    /// Index into the schedule.
    pub stage: usize,
    /// The applied move.
    pub mv: M,
    /// Cost change caused by the move.
    pub delta: isize,
    /// Cost after the move.
    pub cost: usize,
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<P: SaProblem> {
    /// The reported state: the best one seen if `track_best` was set,
    /// otherwise the state after the last stage.
    pub instance: P,

    /// Cost of `instance`.
    pub cost: usize,

    /// Cost after the last stage.
    pub final_cost: usize,

    /// Lowest cost seen over the trajectory, including the initial state.
    pub best_cost: usize,

    /// Total number of proposals.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted moves with negative delta.
    pub improving_moves: usize,

    /// Per-stage statistics, in schedule order.
    pub stages: Vec<StageStats>,

    /// Current cost at the start of the run and after each stage.
    pub cost_history: Vec<usize>,

    /// Accepted moves, empty unless `record_trajectory` was set.
    pub trajectory: Vec<AcceptedMove<P::Move>>,
}

impl<P: SaProblem> SaResult<P> {
    /// Whether the reported state has zero cost.
    pub fn is_solved(&self) -> bool {
        self.cost == 0
    }
}

/// Executes Metropolis simulated annealing.
///
/// # Algorithm
///
/// For each `beta` in [`SaConfig::schedule`], `mcmc_steps` times:
///
/// 1. propose a move and compute its exact `delta`
/// 2. accept if `delta <= 0`, or, for finite `beta`, if a uniform draw in
///    `[0, 1)` falls below `exp(-beta * delta)`
/// 3. on acceptance apply the move and add `delta` to the running cost
///
/// The state carries over between stages and the run never stops early,
/// even after reaching cost 0, so every run performs exactly
/// `anneal_steps * mcmc_steps` proposals.
pub struct SaRunner;

impl SaRunner {
    /// Runs annealing on `problem`, which is consumed and returned in the
    /// result.
    ///
    /// # Errors
    ///
    /// [`KsatError::InvalidParameter`] if the config fails
    /// [`SaConfig::validate`]; [`KsatError::DeltaMismatch`] if
    /// `check_delta_cost` is set and the incremental cost diverges.
    pub fn run<P: SaProblem>(problem: P, config: &SaConfig) -> Result<SaResult<P>> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs annealing drawing from an explicit random stream; `config.seed`
    /// is ignored.
    pub fn run_with_rng<P: SaProblem, R: Rng>(
        mut problem: P,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P>> {
        config.validate()?;

        let schedule = config.schedule();
        let mut current_cost = problem.cost();
        let mut best: Option<P> = config.track_best.then(|| problem.clone());
        let mut best_cost = current_cost;

        let mut step = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut stages = Vec::with_capacity(schedule.len());
        let mut cost_history = Vec::with_capacity(schedule.len() + 1);
        cost_history.push(current_cost);
        let mut trajectory = Vec::new();

        for (stage, &beta) in schedule.iter().enumerate() {
            let mut accepted = 0usize;

            for _ in 0..config.mcmc_steps {
                let mv = problem.propose_move(rng);
                let delta = problem.compute_delta_cost(mv);

                // Metropolis acceptance criterion; infinite beta is greedy.
                let accept = delta <= 0
                    || (beta.is_finite()
                        && rng.random::<f64>() < (-beta * delta as f64).exp());

                if accept {
                    problem.accept_move(mv);
                    current_cost = current_cost
                        .checked_add_signed(delta)
                        .ok_or_else(|| KsatError::DeltaMismatch {
                            step,
                            expected: current_cost,
                            actual: problem.cost(),
                        })?;
                    accepted += 1;
                    if delta < 0 {
                        improving_moves += 1;
                    }

                    if config.check_delta_cost {
                        let actual = problem.cost();
                        tracing::trace!(step, delta, current_cost, actual, "delta check");
                        if actual != current_cost {
                            return Err(KsatError::DeltaMismatch {
                                step,
                                expected: current_cost,
                                actual,
                            });
                        }
                    }

                    if config.record_trajectory {
                        trajectory.push(AcceptedMove {
                            step,
                            stage,
                            mv,
                            delta,
                            cost: current_cost,
                        });
                    }

                    if current_cost < best_cost {
                        best_cost = current_cost;
                        if config.track_best {
                            best = Some(problem.clone());
                        }
                    }
                }

                step += 1;
            }

            accepted_moves += accepted;
            tracing::debug!(
                stage,
                beta,
                accepted,
                proposed = config.mcmc_steps,
                cost = current_cost,
                "annealing stage complete"
            );
            stages.push(StageStats {
                beta,
                proposed: config.mcmc_steps,
                accepted,
                cost: current_cost,
            });
            cost_history.push(current_cost);
        }

        let final_cost = current_cost;
        tracing::debug!(
            iterations = step,
            accepted_moves,
            final_cost,
            best_cost,
            "annealing run complete"
        );

        let (instance, cost) = match best {
            Some(best) => (best, best_cost),
            None => (problem, final_cost),
        };

        Ok(SaResult {
            instance,
            cost,
            final_cost,
            best_cost,
            iterations: step,
            accepted_moves,
            improving_moves,
            stages,
            cost_history,
            trajectory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ksat::KSat;

    fn config() -> SaConfig {
        SaConfig::default()
            .with_mcmc_steps(200)
            .with_anneal_steps(10)
            .with_betas(1.0, 10.0)
            .with_seed(42)
    }

    // ---- Toy problem: minimize the number of set bits ----

    #[derive(Clone, Debug)]
    struct OneMin {
        bits: Vec<bool>,
    }

    impl SaProblem for OneMin {
        type Move = usize;

        fn cost(&self) -> usize {
            self.bits.iter().filter(|&&b| b).count()
        }

        fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
            rng.random_range(0..self.bits.len())
        }

        fn compute_delta_cost(&self, mv: usize) -> isize {
            if self.bits[mv] {
                -1
            } else {
                1
            }
        }

        fn accept_move(&mut self, mv: usize) {
            self.bits[mv] = !self.bits[mv];
        }
    }

    #[test]
    fn test_sa_onemin_solves() {
        let problem = OneMin {
            bits: vec![true; 32],
        };
        let result = SaRunner::run(problem, &config()).unwrap();
        assert_eq!(result.cost, 0);
        assert!(result.is_solved());
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_sa_step_count_fixed() {
        let ksat = KSat::with_seed(50, 100, 3, Some(1)).unwrap();
        let result = SaRunner::run(ksat, &config()).unwrap();
        assert_eq!(result.iterations, 200 * 10);
        assert_eq!(result.stages.len(), 10);
        assert_eq!(result.cost_history.len(), 11);
        assert!(result.stages.iter().all(|s| s.proposed == 200));
        assert_eq!(
            result.stages.iter().map(|s| s.accepted).sum::<usize>(),
            result.accepted_moves
        );
    }

    #[test]
    fn test_sa_no_early_stop_when_solved() {
        // Easy instance: satisfied long before the schedule ends.
        let ksat = KSat::with_seed(100, 5, 3, Some(4)).unwrap();
        let cfg = config().with_mcmc_steps(1000).with_record_trajectory(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        assert_eq!(result.final_cost, 0);
        assert_eq!(result.iterations, cfg.total_steps());

        let first_zero = result
            .trajectory
            .iter()
            .find(|a| a.cost == 0)
            .map(|a| a.step)
            .expect("run should reach cost 0");
        // Most variables appear in no clause, so zero-delta flips keep being
        // accepted after the instance is satisfied.
        assert!(result
            .trajectory
            .iter()
            .any(|a| a.step > first_zero && a.delta == 0));
        assert!(result.stages.last().is_some_and(|s| s.accepted > 0));
    }

    #[test]
    fn test_sa_state_carries_over_between_stages() {
        let ksat = KSat::with_seed(60, 240, 3, Some(23)).unwrap();
        let cfg = config().with_record_trajectory(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();

        assert_eq!(result.cost_history.len(), result.stages.len() + 1);
        for (i, stage) in result.stages.iter().enumerate() {
            assert_eq!(stage.cost, result.cost_history[i + 1]);
        }

        for i in 1..result.stages.len() {
            // Cost entering stage i is the cost after the last move accepted
            // before it, or the initial cost if nothing was accepted yet.
            let entering = result
                .trajectory
                .iter()
                .filter(|a| a.stage < i)
                .last()
                .map_or(result.cost_history[0], |a| a.cost);
            assert_eq!(result.stages[i - 1].cost, entering);

            if let Some(first) = result.trajectory.iter().find(|a| a.stage == i) {
                let before = first.cost.checked_add_signed(-first.delta).unwrap();
                assert_eq!(before, result.stages[i - 1].cost);
            }
        }
    }

    #[test]
    fn test_sa_reported_cost_matches_instance() {
        let ksat = KSat::with_seed(80, 300, 3, Some(9)).unwrap();
        let result = SaRunner::run(ksat, &config()).unwrap();
        assert_eq!(result.instance.cost(), result.cost);
        assert_eq!(result.cost, result.final_cost);
        assert!(result.best_cost <= result.final_cost);
    }

    #[test]
    fn test_sa_track_best_snapshot() {
        let ksat = KSat::with_seed(80, 360, 3, Some(13)).unwrap();
        let cfg = config().with_track_best(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        assert_eq!(result.cost, result.best_cost);
        assert_eq!(result.instance.cost(), result.best_cost);
        assert!(result.best_cost <= result.final_cost);
    }

    #[test]
    fn test_sa_delta_check_passes() {
        let ksat = KSat::with_seed(40, 170, 3, Some(21)).unwrap();
        let cfg = config().with_check_delta_cost(true);
        assert!(SaRunner::run(ksat, &cfg).is_ok());
    }

    #[test]
    fn test_sa_delta_check_detects_bad_delta() {
        #[derive(Clone, Debug)]
        struct Lying(OneMin);

        impl SaProblem for Lying {
            type Move = usize;
            fn cost(&self) -> usize {
                self.0.cost()
            }
            fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
                self.0.propose_move(rng)
            }
            fn compute_delta_cost(&self, _mv: usize) -> isize {
                0
            }
            fn accept_move(&mut self, mv: usize) {
                self.0.accept_move(mv)
            }
        }

        let problem = Lying(OneMin {
            bits: vec![false; 8],
        });
        let cfg = config().with_check_delta_cost(true);
        let err = SaRunner::run(problem, &cfg).unwrap_err();
        assert!(matches!(err, KsatError::DeltaMismatch { step: 0, .. }));
    }

    #[test]
    fn test_sa_greedy_stage_never_worsens() {
        let ksat = KSat::with_seed(60, 250, 3, Some(17)).unwrap();
        let cfg = config().with_record_trajectory(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        let last = cfg.anneal_steps - 1;

        let greedy: Vec<_> = result.trajectory.iter().filter(|a| a.stage == last).collect();
        assert!(greedy.iter().all(|a| a.delta <= 0));
        for w in greedy.windows(2) {
            assert!(w[1].cost <= w[0].cost);
        }
        let before_greedy = result.stages[last - 1].cost;
        assert!(result.final_cost <= before_greedy);
    }

    #[test]
    fn test_sa_trajectory_consistent_with_counts() {
        let ksat = KSat::with_seed(30, 120, 3, Some(2)).unwrap();
        let cfg = config().with_record_trajectory(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        assert_eq!(result.trajectory.len(), result.accepted_moves);
        if let Some(last) = result.trajectory.last() {
            assert_eq!(last.cost, result.final_cost);
        }
        assert!(result.trajectory.windows(2).all(|w| w[0].step < w[1].step));
    }

    #[test]
    fn test_sa_deterministic_with_seed() {
        let cfg = config().with_record_trajectory(true);
        let a = SaRunner::run(KSat::with_seed(50, 200, 3, Some(5)).unwrap(), &cfg).unwrap();
        let b = SaRunner::run(KSat::with_seed(50, 200, 3, Some(5)).unwrap(), &cfg).unwrap();
        assert_eq!(a.final_cost, b.final_cost);
        assert_eq!(a.trajectory, b.trajectory);
        assert_eq!(a.instance, b.instance);
    }

    #[test]
    fn test_sa_high_beta_accepts_less() {
        let ksat = KSat::with_seed(100, 400, 3, Some(8)).unwrap();
        let cfg = SaConfig::default()
            .with_mcmc_steps(2000)
            .with_anneal_steps(3)
            .with_betas(0.01, 20.0)
            .with_seed(3);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        assert!(result.stages[0].acceptance_rate() > result.stages[1].acceptance_rate());
    }

    #[test]
    fn test_sa_invalid_config() {
        let ksat = KSat::with_seed(10, 10, 3, Some(1)).unwrap();
        let err = SaRunner::run(ksat, &config().with_mcmc_steps(0)).unwrap_err();
        assert!(matches!(err, KsatError::InvalidParameter(_)));
    }

    #[test]
    fn test_sa_pure_greedy_run() {
        let ksat = KSat::with_seed(40, 100, 3, Some(6)).unwrap();
        let initial = ksat.cost();
        let cfg = config().with_anneal_steps(1).with_record_trajectory(true);
        let result = SaRunner::run(ksat, &cfg).unwrap();
        assert!(result.stages[0].beta.is_infinite());
        assert!(result.trajectory.iter().all(|a| a.delta <= 0));
        assert!(result.final_cost <= initial);
    }

    #[test]
    fn test_stage_acceptance_rate() {
        let stats = StageStats {
            beta: 1.0,
            proposed: 4,
            accepted: 1,
            cost: 0,
        };
        assert!((stats.acceptance_rate() - 0.25).abs() < 1e-12);
    }
}
