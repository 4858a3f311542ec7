// src/engine/steal.rs

//! Probabilistic steal heuristic and its random source.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::types::CardIndex;

/// Source of the uniform `[0, 100)` draws behind steal decisions.
///
/// Owned by one simulation, so runs are replayable and tests can script the
/// outcome.
pub trait StealDraw {
    /// Uniform integer in `[0, 100)`.
    fn draw_percent(&mut self) -> u32;

    /// Return to the initial state; called on every simulation reset.
    fn reset(&mut self) {}
}

/// Seeded ChaCha8 draws.
#[derive(Debug, Clone)]
pub struct SeededDraw {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDraw {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl StealDraw for SeededDraw {
    fn draw_percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }

    fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

/// Constants of the steal probability curve.
///
/// `p = p_min + (p_max - p_min) * (min_distance / dist_max)^2`, clamped to
/// `[p_min, p_max]`. Tasks far from their horizon are stolen more often, so
/// near-critical work tends to stay local.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StealPolicy {
    pub p_min: f64,
    pub p_max: f64,
    pub dist_max: f64,
}

impl Default for StealPolicy {
    fn default() -> Self {
        Self {
            p_min: 0.02,
            p_max: 0.4,
            dist_max: 50.0,
        }
    }
}

impl StealPolicy {
    /// Steal probability for a task with the given `min_distance`.
    pub fn probability(&self, min_distance: u32) -> f64 {
        let dist = f64::from(min_distance);
        if dist >= self.dist_max {
            return self.p_max;
        }
        let ratio = dist / self.dist_max;
        let p = self.p_min + (self.p_max - self.p_min) * ratio * ratio;
        p.max(self.p_min).min(self.p_max)
    }

    /// Roll for a steal. Never steals on a single-card machine (and then
    /// consumes no draw).
    pub fn should_steal(
        &self,
        min_distance: u32,
        card_count: usize,
        draw: &mut impl StealDraw,
    ) -> bool {
        if card_count < 2 {
            return false;
        }
        let p = self.probability(min_distance);
        f64::from(draw.draw_percent()) < p * 100.0
    }
}

/// Destination of a probabilistic steal away from `owner`.
///
/// Plain round-robin to the next card. This only balances load for two
/// cards; with more cards work always drifts to the owner's right-hand
/// neighbour.
pub fn steal_target(owner: CardIndex, card_count: usize) -> CardIndex {
    (owner + 1) % card_count
}
