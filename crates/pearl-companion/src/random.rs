//! Injectable randomness for probabilistic mechanics.
//!
//! Every roll in the simulation (soft rejections, play success, comfort
//! approach, rare unlocks, clip choice) goes through [`RandomSource`], so a
//! seeded generator or a [`ScriptedRolls`] sequence makes outcomes
//! reproducible.
//!
//! Any [`rand::Rng`] is a `RandomSource`. Tests that need to force a branch
//! use [`ScriptedRolls`].

/// Source of uniform rolls consumed by the simulation.
pub trait RandomSource {
    /// Roll once and return `true` with the given probability.
    ///
    /// A roll `r` in `[0, 1)` succeeds when `r < probability`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick an index in `0..len`. Returns 0 when `len` is 0.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: rand::Rng> RandomSource for R {
    fn chance(&mut self, probability: f64) -> bool {
        self.random::<f64>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.random_range(0..len)
    }
}

/// A fixed sequence of rolls in `[0, 1)`, replayed in order and cycled.
///
/// An empty sequence always rolls `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: Vec<f64>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Replay the given rolls in order, wrapping around at the end.
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// A source whose every roll is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    fn next_roll(&mut self) -> f64 {
        let Some(roll) = self.rolls.get(self.cursor).copied() else {
            return 0.0;
        };
        let next = self.cursor.saturating_add(1);
        self.cursor = if next < self.rolls.len() { next } else { 0 };
        roll
    }
}

impl RandomSource for ScriptedRolls {
    fn chance(&mut self, probability: f64) -> bool {
        self.next_roll() < probability
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let roll = self.next_roll().clamp(0.0, 1.0);
        ((roll * len as f64) as usize).min(len.saturating_sub(1))
    }
}
