//! Per-character durable progression record.
//!
//! Level and experience are the durable state; combat stats are recomputed
//! from the NFT seed plus the stored level (see [`crate::stats`]).

use serde::{Deserialize, Serialize};

use crate::energy::MAX_ENERGY;
use crate::events::{Notice, Outbox};
use crate::level::level_for;
use crate::store::{KvStore, progress_key, read_or_default, write_record};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterProgress {
    pub experience: u64,
    pub level: u32,
    pub energy: i32,
    pub last_refill_ms: i64,
    pub last_reset_ms: i64,
}

impl CharacterProgress {
    pub fn fresh(now_ms: i64) -> Self {
        Self {
            experience: 0,
            level: 1,
            energy: MAX_ENERGY,
            last_refill_ms: now_ms,
            last_reset_ms: now_ms,
        }
    }
}

/// Lazily created on first read: an unknown character is a fresh level-1
/// record with full energy. Records are never deleted.
pub fn get_progress(store: &dyn KvStore, character_id: u64, now_ms: i64) -> CharacterProgress {
    read_or_default(store, &progress_key(character_id))
        .unwrap_or_else(|| CharacterProgress::fresh(now_ms))
}

pub fn save_progress(
    store: &mut dyn KvStore,
    character_id: u64,
    progress: &CharacterProgress,
) -> bool {
    write_record(store, &progress_key(character_id), progress)
}

/// Add experience, recompute the level, and persist. A level increase
/// pushes a [`Notice::LevelUp`] for the presentation layer.
pub fn add_experience(
    store: &mut dyn KvStore,
    outbox: &mut Outbox,
    character_id: u64,
    gained: u64,
    now_ms: i64,
) -> CharacterProgress {
    let mut progress = get_progress(store, character_id, now_ms);
    progress.experience = progress.experience.saturating_add(gained);
    let new_level = level_for(progress.experience);
    if new_level > progress.level {
        outbox.push(Notice::LevelUp { level: new_level });
    }
    // Experience only grows, so level_for never moves the level down.
    progress.level = new_level;
    save_progress(store, character_id, &progress);
    progress
}
