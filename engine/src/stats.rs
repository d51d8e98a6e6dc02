//! Deterministic stat derivation and per-level growth.
//!
//! A character's level-1 stats are a pure function of its NFT id, so the
//! same token always yields the same base rolls. Combat stats are never
//! stored: they are rederived from the seed plus the persisted level.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::energy::MAX_ENERGY;
use crate::progress::get_progress;
use crate::store::{KvStore, STATS_HISTORY_KEY, read_or_default, write_record};

pub const BASE_HEALTH: i32 = 100;
/// Base rolls land in 5..=50.
pub const BASE_STAT_MIN: u32 = 5;
pub const BASE_STAT_SPAN: u32 = 46;
const SEED_MULTIPLIER: u64 = 1337;

pub const STRENGTH_PER_LEVEL: f64 = 2.0;
pub const SPEED_PER_LEVEL: f64 = 1.5;
pub const AGILITY_PER_LEVEL: f64 = 1.5;

const STATS_HISTORY_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: i32,
    pub strength: i32,
    pub agility: i32,
    pub speed: i32,
    pub energy: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    pub stats: Stats,
    /// Presentation-only; the engine never dereferences it.
    pub image_url: String,
}

/// Level-1 rolls for an NFT id. The modulo reduction is slightly biased
/// toward the low end of the range; that bias is part of the published
/// stat distribution and callers must tolerate it rather than correct it.
pub fn derive_base_stats(nft_id: u64) -> Stats {
    let mut rng = ChaCha8Rng::seed_from_u64(nft_id.wrapping_mul(SEED_MULTIPLIER));
    let mut roll = || (BASE_STAT_MIN + rng.next_u32() % BASE_STAT_SPAN) as i32;
    Stats {
        health: BASE_HEALTH,
        strength: roll(),
        agility: roll(),
        speed: roll(),
        energy: MAX_ENERGY,
    }
}

/// Apply per-level growth to level-1 base stats, flooring each attribute
/// after summation. Health and energy do not grow.
pub fn stats_at_level(base: Stats, level: u32) -> Stats {
    let steps = level.saturating_sub(1) as f64;
    Stats {
        strength: (base.strength as f64 + STRENGTH_PER_LEVEL * steps).floor() as i32,
        speed: (base.speed as f64 + SPEED_PER_LEVEL * steps).floor() as i32,
        agility: (base.agility as f64 + AGILITY_PER_LEVEL * steps).floor() as i32,
        ..base
    }
}

pub fn image_url_for(nft_id: u64) -> String {
    format!("images/{nft_id}.png")
}

/// Build a playable character: stored progress plus seed-derived stats
/// grown to the stored level. Also appends a stats-history audit entry.
pub fn character_from_nft(
    store: &mut dyn KvStore,
    nft_id: u64,
    name: &str,
    now_ms: i64,
) -> Character {
    let progress = get_progress(store, nft_id, now_ms);
    let mut stats = stats_at_level(derive_base_stats(nft_id), progress.level);
    stats.energy = progress.energy;
    record_stats_history(store, progress.level, stats, now_ms);
    Character {
        id: nft_id,
        name: name.to_string(),
        level: progress.level,
        experience: progress.experience,
        stats,
        image_url: image_url_for(nft_id),
    }
}

/// Level-match an adversary: force its level to the player's and reapply
/// the same growth curve to its level-1 base stats, so evasion, crits,
/// and weaponry decide the fight rather than a stat gap.
pub fn scale_opponent(base: &Character, player_level: u32) -> Character {
    let mut scaled = base.clone();
    scaled.level = player_level;
    scaled.stats = stats_at_level(base.stats, player_level);
    scaled
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsHistoryEntry {
    pub timestamp_ms: i64,
    pub level: u32,
    pub stats: Stats,
}

/// Bounded audit log of derived stats, most recent last.
pub fn stats_history(store: &dyn KvStore) -> Vec<StatsHistoryEntry> {
    read_or_default(store, STATS_HISTORY_KEY).unwrap_or_default()
}

fn record_stats_history(store: &mut dyn KvStore, level: u32, stats: Stats, now_ms: i64) {
    let mut history = stats_history(store);
    history.push(StatsHistoryEntry {
        timestamp_ms: now_ms,
        level,
        stats,
    });
    while history.len() > STATS_HISTORY_CAP {
        history.remove(0);
    }
    write_record(store, STATS_HISTORY_KEY, &history);
}
