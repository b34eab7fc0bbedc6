//! Injectable random source.
//!
//! Вся случайность unit'а (jitter частиц, chance rolls статусов) идёт через
//! `RandomSource`, чтобы тесты могли подставить заранее заданную последовательность.

use std::collections::VecDeque;

use rand::Rng;

use crate::DeterministicRng;

pub trait RandomSource {
    /// Bernoulli draw. `p >= 1` always succeeds, `p <= 0` always fails.
    fn roll_chance(&mut self, p: f32) -> bool;

    /// Uniform integer in `lo..=hi`.
    fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32;
}

impl RandomSource for DeterministicRng {
    fn roll_chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 || p.is_nan() {
            return false;
        }
        self.rng.gen_bool(p as f64)
    }

    fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

/// Replays fixed sequences of outcomes.
///
/// Empty queues fall back to `default_roll` for chances and `lo` for ranges,
/// so a test only scripts the draws it cares about.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    rolls: VecDeque<bool>,
    ints: VecDeque<i32>,
    pub default_roll: bool,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = bool>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn always(roll: bool) -> Self {
        Self {
            default_roll: roll,
            ..Self::default()
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_chance(&mut self, p: f32) -> bool {
        // Граничные вероятности не тратят скрипт
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 {
            return false;
        }
        self.rolls.pop_front().unwrap_or(self.default_roll)
    }

    fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        let value = self.ints.pop_front().unwrap_or(lo);
        value.clamp(lo, hi.max(lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_rng_bounds() {
        let mut rng = DeterministicRng::new(7);
        for _ in 0..200 {
            let v = rng.range_inclusive(-5, 5);
            assert!((-5..=5).contains(&v));
        }
        assert!(rng.roll_chance(1.0));
        assert!(!rng.roll_chance(0.0));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = DeterministicRng::new(99);
        let mut b = DeterministicRng::new(99);
        let seq_a: Vec<i32> = (0..32).map(|_| a.range_inclusive(0, 1000)).collect();
        let seq_b: Vec<i32> = (0..32).map(|_| b.range_inclusive(0, 1000)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_scripted_replays_then_falls_back() {
        let mut rng = ScriptedRandom::new()
            .with_rolls([false, true])
            .with_ints([4, 99]);

        assert!(!rng.roll_chance(0.5));
        assert!(rng.roll_chance(0.5));
        assert!(!rng.roll_chance(0.5)); // default_roll = false

        assert_eq!(rng.range_inclusive(3, 5), 4);
        assert_eq!(rng.range_inclusive(3, 5), 5); // clamped
        assert_eq!(rng.range_inclusive(3, 5), 3); // пусто → lo
    }
}
