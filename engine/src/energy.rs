//! Daily energy: the stamina pool that gates battle eligibility.
//!
//! Two recovery notions exist and must stay separate: the daily reset is
//! the only mechanism that actually restores energy, while
//! [`recovery_time`] is a display-only hourly-linear estimate.

use chrono::{DateTime, Duration, Local, TimeZone};
use serde::Serialize;

use crate::events::{Notice, Outbox};
use crate::progress::{get_progress, save_progress};
use crate::stats::Character;
use crate::store::KvStore;

pub const MAX_ENERGY: i32 = 20;
pub const RECOVERY_PER_HOUR: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyStatus {
    Empty,
    Low,
    Medium,
    High,
}

/// UI bucket for an energy value; no state change.
pub fn status_of(energy: i32) -> EnergyStatus {
    match energy {
        i32::MIN..=0 => EnergyStatus::Empty,
        1..=5 => EnergyStatus::Low,
        6..=10 => EnergyStatus::Medium,
        _ => EnergyStatus::High,
    }
}

pub fn can_battle(character: &Character) -> bool {
    character.stats.energy > 0
}

/// Spend `amount` energy. False (no mutation) when the pool is short or
/// the write fails.
pub fn consume(
    store: &mut dyn KvStore,
    character_id: u64,
    amount: i32,
    now: DateTime<Local>,
) -> bool {
    let now_ms = now.timestamp_millis();
    let mut progress = get_progress(store, character_id, now_ms);
    if progress.energy < amount {
        return false;
    }
    progress.energy = (progress.energy - amount).max(0);
    progress.last_refill_ms = now_ms;
    save_progress(store, character_id, &progress)
}

/// Reset the pool to full once per local calendar day (first touch past
/// midnight). Emits [`Notice::EnergyRestored`] when a reset happens.
pub fn refill_if_new_day(
    store: &mut dyn KvStore,
    outbox: &mut Outbox,
    character_id: u64,
    now: DateTime<Local>,
) {
    let now_ms = now.timestamp_millis();
    let mut progress = get_progress(store, character_id, now_ms);
    let last_reset = Local.timestamp_millis_opt(progress.last_reset_ms).single();
    let new_day = match last_reset {
        Some(last) => last.date_naive() != now.date_naive(),
        None => true,
    };
    if !new_day {
        return;
    }
    progress.energy = MAX_ENERGY;
    progress.last_reset_ms = now_ms;
    progress.last_refill_ms = now_ms;
    if save_progress(store, character_id, &progress) {
        outbox.push(Notice::EnergyRestored);
    }
}

/// When the pool would be full under 1-point-per-hour linear recovery
/// from the last refill; `None` when already full. Informational only:
/// nothing in the engine restores energy on this schedule.
pub fn recovery_time(
    store: &dyn KvStore,
    character_id: u64,
    now: DateTime<Local>,
) -> Option<DateTime<Local>> {
    let progress = get_progress(store, character_id, now.timestamp_millis());
    if progress.energy >= MAX_ENERGY {
        return None;
    }
    let missing = MAX_ENERGY - progress.energy;
    let hours_needed = (missing + RECOVERY_PER_HOUR - 1) / RECOVERY_PER_HOUR;
    let last_refill = Local.timestamp_millis_opt(progress.last_refill_ms).single()?;
    Some(last_refill + Duration::hours(hours_needed as i64))
}
