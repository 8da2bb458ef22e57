//! Literal and clause views over a [`KSat`](super::KSat) instance.

/// Spin value of a variable or polarity of a literal: `-1` or `+1`.
pub type Spin = i8;

/// Returns `true` if `s` is a valid spin (`-1` or `+1`).
#[inline]
pub fn is_spin(s: Spin) -> bool {
    s == 1 || s == -1
}

/// A single literal: variable index and polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    /// Variable index in `0..N`.
    pub var: usize,
    /// Polarity, `+1` for the plain variable and `-1` for its negation.
    pub sign: Spin,
}

impl Literal {
    /// Whether the literal is true when its variable takes value `x`.
    #[inline]
    pub fn is_true(&self, x: Spin) -> bool {
        self.sign * x > 0
    }
}

/// Borrowed view of one clause stored in the instance arena.
#[derive(Debug, Clone, Copy)]
pub struct Clause<'a> {
    pub(crate) vars: &'a [usize],
    pub(crate) signs: &'a [Spin],
}

impl<'a> Clause<'a> {
    /// Variable indices of the clause, pairwise distinct.
    pub fn vars(&self) -> &'a [usize] {
        self.vars
    }

    /// Literal polarities, aligned with [`vars`](Self::vars).
    pub fn signs(&self) -> &'a [Spin] {
        self.signs
    }

    /// Iterates the clause's literals.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + 'a {
        self.vars
            .iter()
            .zip(self.signs)
            .map(|(&var, &sign)| Literal { var, sign })
    }

    /// A clause is satisfied if at least one literal is true under `x`.
    pub fn is_satisfied(&self, x: &[Spin]) -> bool {
        self.vars
            .iter()
            .zip(self.signs)
            .any(|(&v, &s)| s * x[v] > 0)
    }
}
