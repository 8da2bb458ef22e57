//! Core trait for Metropolis simulated annealing with incremental moves.

use rand::Rng;

/// Defines a problem the annealing runner can drive.
///
/// The problem owns its current state. The runner proposes a move, asks for
/// the exact cost change, and applies the move only if the Metropolis
/// criterion accepts it. Because the delta is exact, the runner tracks the
/// cost without re-evaluating the whole state.
///
/// `Clone` must produce an independent deep copy; it is used to snapshot the
/// best state seen during a run.
///
/// # Examples
///
/// ```
/// use u_ksat::sa::SaProblem;
/// use rand::Rng;
///
/// /// Minimize the number of `true` bits.
/// #[derive(Clone)]
/// struct OneMin { bits: Vec<bool> }
///
/// impl SaProblem for OneMin {
///     type Move = usize;
///
///     fn cost(&self) -> usize {
///         self.bits.iter().filter(|&&b| b).count()
///     }
///
///     fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
///         rng.random_range(0..self.bits.len())
///     }
///
///     fn compute_delta_cost(&self, mv: usize) -> isize {
///         if self.bits[mv] { -1 } else { 1 }
///     }
///
///     fn accept_move(&mut self, mv: usize) {
///         self.bits[mv] = !self.bits[mv];
///     }
/// }
/// ```
pub trait SaProblem: Clone + Send {
    /// A candidate modification of the current state.
    type Move: Copy + Send + std::fmt::Debug + PartialEq;

    /// Cost of the current state, evaluated from scratch. Lower is better.
    fn cost(&self) -> usize;

    /// Draws a candidate move without mutating the state.
    fn propose_move<R: Rng>(&self, rng: &mut R) -> Self::Move;

    /// Exact `cost_after - cost_before` for applying `mv`, without applying it.
    fn compute_delta_cost(&self, mv: Self::Move) -> isize;

    /// Applies `mv` unconditionally.
    fn accept_move(&mut self, mv: Self::Move);
}
