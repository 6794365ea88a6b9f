//! Randomness seam for the battle engine.
//!
//! Every random decision an encounter makes goes through [`BattleRng`], so a seed (or a
//! scripted sequence) fully determines the outcome.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub const DAMAGE_FACTOR_MIN: f64 = 0.85;
pub const DAMAGE_FACTOR_MAX: f64 = 1.0;

pub trait BattleRng {
    /// Damage spread, uniform in `[DAMAGE_FACTOR_MIN, DAMAGE_FACTOR_MAX)`.
    fn damage_factor(&mut self) -> f64;

    /// True when an attack with the given miss chance misses.
    fn misses(&mut self, miss_chance: f64) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Seedable generator used for real encounters.
#[derive(Clone, Debug)]
pub struct SeededRng {
    rng: SmallRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        SeededRng {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl BattleRng for SeededRng {
    fn damage_factor(&mut self) -> f64 {
        self.rng.gen_range(DAMAGE_FACTOR_MIN..DAMAGE_FACTOR_MAX)
    }

    fn misses(&mut self, miss_chance: f64) -> bool {
        if miss_chance <= 0.0 {
            return false;
        }
        self.rng.gen::<f64>() < miss_chance
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Replays fixed rolls in order. Exhausted queues fall back to the lowest damage factor,
/// never missing, and index 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    factors: VecDeque<f64>,
    miss_rolls: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factors(mut self, factors: impl IntoIterator<Item = f64>) -> Self {
        self.factors.extend(factors);
        self
    }

    pub fn with_miss_rolls(mut self, rolls: impl IntoIterator<Item = bool>) -> Self {
        self.miss_rolls.extend(rolls);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl BattleRng for ScriptedRng {
    fn damage_factor(&mut self) -> f64 {
        self.factors
            .pop_front()
            .unwrap_or(DAMAGE_FACTOR_MIN)
            .clamp(DAMAGE_FACTOR_MIN, DAMAGE_FACTOR_MAX)
    }

    fn misses(&mut self, miss_chance: f64) -> bool {
        // Rolls are only consumed by moves that can miss.
        if miss_chance <= 0.0 {
            return false;
        }
        self.miss_rolls.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }
}
