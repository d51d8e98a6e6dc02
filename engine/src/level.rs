//! Experience-to-level mapping and battle experience awards.

use serde::Serialize;

/// Cumulative experience required to reach each level. The table is the
/// whole progression: experience past the last entry stays at level 10.
pub const LEVEL_THRESHOLDS: [(u32, u64); 10] = [
    (1, 0),
    (2, 100),
    (3, 250),
    (4, 500),
    (5, 1000),
    (6, 2000),
    (7, 4000),
    (8, 8000),
    (9, 16000),
    (10, 32000),
];

pub const MAX_LEVEL: u32 = 10;

const BASE_BATTLE_XP: f64 = 50.0;
const LEVEL_DIFF_COEFF: f64 = 0.2;
const DEFEAT_SHARE: f64 = 0.25;

/// Highest level whose threshold is at or below `experience`.
pub fn level_for(experience: u64) -> u32 {
    let mut level = 1;
    for (candidate, threshold) in LEVEL_THRESHOLDS {
        if experience >= threshold {
            level = candidate;
        } else {
            break;
        }
    }
    level
}

fn threshold_for(level: u32) -> u64 {
    LEVEL_THRESHOLDS
        .iter()
        .find(|(candidate, _)| *candidate == level)
        .map(|(_, xp)| *xp)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current_level: u32,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    /// Position within the current level's band, 0..=100.
    pub progress_pct: f64,
}

/// Progress within the current level. At level 10 the next threshold is
/// defined as the current one, which reads as 100% rather than dividing
/// by zero.
pub fn progress_to_next(experience: u64) -> LevelProgress {
    let current_level = level_for(experience);
    let current_level_xp = threshold_for(current_level);
    let next_level_xp = if current_level >= MAX_LEVEL {
        current_level_xp
    } else {
        threshold_for(current_level + 1)
    };

    let progress_pct = if next_level_xp == current_level_xp {
        100.0
    } else {
        let into_band = (experience - current_level_xp) as f64;
        let band = (next_level_xp - current_level_xp) as f64;
        (into_band / band * 100.0).clamp(0.0, 100.0)
    };

    LevelProgress {
        current_level,
        current_level_xp,
        next_level_xp,
        progress_pct,
    }
}

/// Experience paid out for one battle. Base 50, scaled by the level gap
/// (floor 0.5x); a defeat still pays a quarter of the scaled award.
pub fn battle_experience(player_level: u32, opponent_level: u32, victory: bool) -> u64 {
    let diff = opponent_level as f64 - player_level as f64;
    let multiplier = (1.0 + LEVEL_DIFF_COEFF * diff).max(0.5);
    let award = BASE_BATTLE_XP * multiplier;
    if victory {
        award.floor() as u64
    } else {
        (award * DEFEAT_SHARE).floor() as u64
    }
}
