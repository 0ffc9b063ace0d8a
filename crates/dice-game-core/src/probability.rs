//! Pairwise win probabilities for a set of dice.

use crate::dice::Die;
use crate::error::{GameError, Result};
use serde::Serialize;

/// Outcome counts for one ordered pair of dice over all face pairings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PairOdds {
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
}

impl PairOdds {
    pub fn total(&self) -> u64 {
        self.wins + self.losses + self.ties
    }

    pub fn win_probability(&self) -> f64 {
        self.wins as f64 / self.total() as f64
    }

    pub fn tie_probability(&self) -> f64 {
        self.ties as f64 / self.total() as f64
    }
}

/// Count how often a face of `a` beats, loses to, or ties a face of `b`
pub fn pair_odds(a: &Die, b: &Die) -> PairOdds {
    let mut odds = PairOdds {
        wins: 0,
        losses: 0,
        ties: 0,
    };
    for x in a.faces() {
        for y in b.faces() {
            match x.cmp(y) {
                std::cmp::Ordering::Greater => odds.wins += 1,
                std::cmp::Ordering::Less => odds.losses += 1,
                std::cmp::Ordering::Equal => odds.ties += 1,
            }
        }
    }
    odds
}

/// `n × n` table where entry `(i, j)` is the probability die `i` beats die `j`.
///
/// The diagonal is `0.0`. Ties are not counted for either side, so
/// `get(i, j) + get(j, i)` is `1 - P(tie)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbabilityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl ProbabilityMatrix {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Probability that die `i` beats die `j`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.values[i * self.size + j])
        } else {
            None
        }
    }

    /// Rows in input die order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size.max(1))
    }
}

/// Compute the win probability of every ordered pair of dice
pub fn win_probabilities(dice: &[Die]) -> Result<ProbabilityMatrix> {
    if dice.is_empty() {
        return Err(GameError::invalid("Dice list cannot be empty."));
    }

    let n = dice.len();
    let mut values = vec![0.0; n * n];
    for (i, a) in dice.iter().enumerate() {
        for (j, b) in dice.iter().enumerate() {
            if i != j {
                values[i * n + j] = pair_odds(a, b).win_probability();
            }
        }
    }

    Ok(ProbabilityMatrix { size: n, values })
}
