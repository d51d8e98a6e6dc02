use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod battle;
pub mod content;
pub mod currency;
pub mod energy;
pub mod events;
pub mod level;
pub mod progress;
pub mod stats;
pub mod store;
pub mod weapons;

pub use battle::{AttackOutcome, Battle, Phase, Side};
pub use events::{Notice, Outbox};
pub use stats::{Character, Stats};
pub use store::{KvStore, MemoryStore, StoreError};
pub use weapons::Weapon;

enum RollSource {
    Seeded(Box<ChaCha8Rng>),
    Scripted(VecDeque<f64>),
}

/// Randomness handle for battle resolution: a seeded stream for play,
/// a scripted queue of unit-interval draws for tests.
pub struct Rolls {
    source: RollSource,
}

impl Rolls {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RollSource::Seeded(Box::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Draws are consumed in order; once exhausted, every draw is 0.5.
    pub fn from_scripted(draws: Vec<f64>) -> Self {
        Self {
            source: RollSource::Scripted(draws.into()),
        }
    }

    /// Uniform draw in [0, 1).
    pub fn unit(&mut self) -> f64 {
        match &mut self.source {
            RollSource::Seeded(rng) => rng.r#gen(),
            RollSource::Scripted(queue) => queue.pop_front().unwrap_or(0.5),
        }
    }

    /// True with probability `p` (anything >= 1.0 always passes).
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    pub fn coin_flip(&mut self) -> bool {
        self.chance(0.5)
    }
}
