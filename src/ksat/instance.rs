//! Random K-SAT instance with a live spin configuration.

use super::types::{is_spin, Clause, Spin};
use crate::error::{KsatError, Result};
use crate::sa::SaProblem;
use rand::Rng;
use u_numflow::random::create_rng;

/// A random K-SAT formula over `N` variables with `M` clauses of width `K`,
/// together with the current assignment.
///
/// Clauses are stored in a flat arena: clause `m` occupies positions
/// `m*K..(m+1)*K` of both the variable and the sign arrays. The per-variable
/// membership lists are the exact inverse of that arena and are never
/// modified after construction. The configuration is the only mutable state.
///
/// Cloning yields a fully independent deep copy.
///
/// # Examples
///
/// ```
/// use u_ksat::ksat::KSat;
///
/// let ksat = KSat::with_seed(50, 100, 3, Some(42)).unwrap();
/// assert_eq!(ksat.num_clauses(), 100);
/// assert!(ksat.cost() <= 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KSat {
    n: usize,
    m: usize,
    k: usize,
    vars: Vec<usize>,
    signs: Vec<Spin>,
    membership: Vec<Vec<usize>>,
    x: Vec<Spin>,
}

impl KSat {
    /// Draws a random instance from `rng`.
    ///
    /// Each clause samples `k` distinct variables uniformly without
    /// replacement and a uniform sign per literal. The configuration is then
    /// drawn uniformly from `{-1, +1}^n`.
    ///
    /// # Errors
    ///
    /// [`KsatError::InvalidParameter`] if `k < 2`, `n == 0` or `k > n`.
    pub fn new<R: Rng>(n: usize, m: usize, k: usize, rng: &mut R) -> Result<Self> {
        if k < 2 {
            return Err(KsatError::InvalidParameter(format!(
                "k must be >= 2, got {k}"
            )));
        }
        if n == 0 {
            return Err(KsatError::InvalidParameter(
                "n must be positive".into(),
            ));
        }
        if k > n {
            return Err(KsatError::InvalidParameter(format!(
                "k ({k}) cannot exceed the number of variables ({n})"
            )));
        }

        let mut vars = Vec::with_capacity(m * k);
        let mut signs = Vec::with_capacity(m * k);
        for _ in 0..m {
            vars.extend(rand::seq::index::sample(rng, n, k).into_iter());
            signs.extend((0..k).map(|_| random_spin(rng)));
        }

        let mut ksat = Self {
            n,
            m,
            k,
            membership: build_membership(n, k, &vars),
            vars,
            signs,
            x: vec![1; n],
        };
        ksat.reset_configuration(rng);
        Ok(ksat)
    }

    /// Draws a random instance from a fresh stream seeded with `seed`
    /// (a random seed when `None`).
    pub fn with_seed(n: usize, m: usize, k: usize, seed: Option<u64>) -> Result<Self> {
        let mut rng = create_rng(seed.unwrap_or_else(rand::random));
        Self::new(n, m, k, &mut rng)
    }

    /// Builds an instance from explicit clauses.
    ///
    /// `vars[m]` and `signs[m]` describe clause `m`. All clauses must have the
    /// same width `k >= 2`, variable indices must be distinct within a clause
    /// and lie in `0..n`, and signs must be `-1` or `+1`. The configuration
    /// starts at all `+1`.
    pub fn from_clauses(n: usize, vars: &[Vec<usize>], signs: &[Vec<Spin>]) -> Result<Self> {
        if n == 0 {
            return Err(KsatError::InvalidParameter(
                "n must be positive".into(),
            ));
        }
        if vars.len() != signs.len() {
            return Err(KsatError::InvalidParameter(format!(
                "{} variable rows but {} sign rows",
                vars.len(),
                signs.len()
            )));
        }
        let m = vars.len();
        let k = vars.first().map_or(2, Vec::len);
        if k < 2 {
            return Err(KsatError::InvalidParameter(format!(
                "k must be >= 2, got {k}"
            )));
        }

        let mut flat_vars = Vec::with_capacity(m * k);
        let mut flat_signs = Vec::with_capacity(m * k);
        for (c, (row_vars, row_signs)) in vars.iter().zip(signs).enumerate() {
            if row_vars.len() != k || row_signs.len() != k {
                return Err(KsatError::InvalidParameter(format!(
                    "clause {c} does not have width {k}"
                )));
            }
            for (i, &v) in row_vars.iter().enumerate() {
                if v >= n {
                    return Err(KsatError::InvalidParameter(format!(
                        "clause {c} references variable {v} out of range 0..{n}"
                    )));
                }
                if row_vars[..i].contains(&v) {
                    return Err(KsatError::InvalidParameter(format!(
                        "clause {c} repeats variable {v}"
                    )));
                }
            }
            if let Some(&s) = row_signs.iter().find(|&&s| !is_spin(s)) {
                return Err(KsatError::InvalidParameter(format!(
                    "clause {c} has sign {s}, expected -1 or +1"
                )));
            }
            flat_vars.extend_from_slice(row_vars);
            flat_signs.extend_from_slice(row_signs);
        }

        Ok(Self {
            n,
            m,
            k,
            membership: build_membership(n, k, &flat_vars),
            vars: flat_vars,
            signs: flat_signs,
            x: vec![1; n],
        })
    }

    /// Redraws the configuration uniformly at random. Clauses are unchanged.
    pub fn reset_configuration<R: Rng>(&mut self, rng: &mut R) {
        for xi in self.x.iter_mut() {
            *xi = random_spin(rng);
        }
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// [`KsatError::InvalidParameter`] on a length mismatch or a value other
    /// than `-1`/`+1`.
    pub fn set_configuration(&mut self, x: &[Spin]) -> Result<()> {
        if x.len() != self.n {
            return Err(KsatError::InvalidParameter(format!(
                "configuration has length {}, expected {}",
                x.len(),
                self.n
            )));
        }
        if let Some(&s) = x.iter().find(|&&s| !is_spin(s)) {
            return Err(KsatError::InvalidParameter(format!(
                "configuration value {s}, expected -1 or +1"
            )));
        }
        self.x.copy_from_slice(x);
        Ok(())
    }

    /// Number of unsatisfied clauses, evaluated from scratch in `O(M*K)`.
    pub fn cost(&self) -> usize {
        (0..self.m)
            .filter(|&c| !self.clause(c).is_satisfied(&self.x))
            .count()
    }

    /// Proposes flipping a variable drawn uniformly from `0..N`.
    pub fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.n)
    }

    /// Exact change in [`cost`](Self::cost) if variable `mv` were flipped.
    ///
    /// Only the clauses containing `mv` are visited, so this runs in
    /// `O(degree(mv) * K)`. Nothing is mutated.
    pub fn compute_delta_cost(&self, mv: usize) -> isize {
        let mut delta = 0isize;
        for &c in &self.membership[mv] {
            let clause = self.clause(c);
            let mut before = false;
            let mut after = false;
            for (&v, &s) in clause.vars.iter().zip(clause.signs) {
                let lit = s * self.x[v];
                before |= lit > 0;
                after |= if v == mv { lit < 0 } else { lit > 0 };
            }
            match (before, after) {
                (true, false) => delta += 1,
                (false, true) => delta -= 1,
                _ => {}
            }
        }
        delta
    }

    /// Flips variable `mv` in place, unconditionally.
    pub fn accept_move(&mut self, mv: usize) {
        self.x[mv] = -self.x[mv];
    }

    /// Whether every clause is satisfied.
    pub fn is_satisfied(&self) -> bool {
        (0..self.m).all(|c| self.clause(c).is_satisfied(&self.x))
    }

    /// Indices of the clauses violated by the current configuration.
    pub fn unsatisfied_clauses(&self) -> Vec<usize> {
        (0..self.m)
            .filter(|&c| !self.clause(c).is_satisfied(&self.x))
            .collect()
    }

    /// Clause `c` as a borrowed view. Panics if `c >= M`.
    pub fn clause(&self, c: usize) -> Clause<'_> {
        let range = c * self.k..(c + 1) * self.k;
        Clause {
            vars: &self.vars[range.clone()],
            signs: &self.signs[range],
        }
    }

    /// Indices of the clauses in which variable `v` appears, ascending.
    pub fn clause_membership(&self, v: usize) -> &[usize] {
        &self.membership[v]
    }

    /// Current assignment.
    pub fn configuration(&self) -> &[Spin] {
        &self.x
    }

    pub fn num_variables(&self) -> usize {
        self.n
    }

    pub fn num_clauses(&self) -> usize {
        self.m
    }

    pub fn clause_width(&self) -> usize {
        self.k
    }
}

impl SaProblem for KSat {
    type Move = usize;

    fn cost(&self) -> usize {
        KSat::cost(self)
    }

    fn propose_move<R: Rng>(&self, rng: &mut R) -> usize {
        KSat::propose_move(self, rng)
    }

    fn compute_delta_cost(&self, mv: usize) -> isize {
        KSat::compute_delta_cost(self, mv)
    }

    fn accept_move(&mut self, mv: usize) {
        KSat::accept_move(self, mv)
    }
}

#[inline]
fn random_spin<R: Rng>(rng: &mut R) -> Spin {
    if rng.random::<bool>() {
        1
    } else {
        -1
    }
}

/// Inverse of the clause arena: for each variable, the clauses it occurs in.
fn build_membership(n: usize, k: usize, vars: &[usize]) -> Vec<Vec<usize>> {
    let mut membership = vec![Vec::new(); n];
    for (pos, &v) in vars.iter().enumerate() {
        membership[v].push(pos / k);
    }
    membership
}
