use chrono::{Duration, Local};
use engine::energy::{
    EnergyStatus, MAX_ENERGY, consume, recovery_time, refill_if_new_day, status_of,
};
use engine::progress::{get_progress, save_progress};
use engine::{MemoryStore, Notice, Outbox};

#[test]
fn status_buckets() {
    assert_eq!(status_of(0), EnergyStatus::Empty);
    assert_eq!(status_of(1), EnergyStatus::Low);
    assert_eq!(status_of(5), EnergyStatus::Low);
    assert_eq!(status_of(6), EnergyStatus::Medium);
    assert_eq!(status_of(10), EnergyStatus::Medium);
    assert_eq!(status_of(11), EnergyStatus::High);
    assert_eq!(status_of(20), EnergyStatus::High);
}

#[test]
fn consume_decrements_and_stamps_refill() {
    let mut store = MemoryStore::new();
    let now = Local::now();
    assert!(consume(&mut store, 7, 1, now));
    let progress = get_progress(&store, 7, now.timestamp_millis());
    assert_eq!(progress.energy, MAX_ENERGY - 1);
    assert_eq!(progress.last_refill_ms, now.timestamp_millis());
}

#[test]
fn consume_refuses_when_short_and_never_goes_negative() {
    let mut store = MemoryStore::new();
    let now = Local::now();
    let now_ms = now.timestamp_millis();

    let mut progress = get_progress(&store, 7, now_ms);
    progress.energy = 0;
    save_progress(&mut store, 7, &progress);

    assert!(!consume(&mut store, 7, 1, now));
    assert_eq!(get_progress(&store, 7, now_ms).energy, 0);

    // Also short when asking for more than the whole pool.
    assert!(!consume(&mut store, 8, MAX_ENERGY + 1, now));
    assert_eq!(get_progress(&store, 8, now_ms).energy, MAX_ENERGY);
}

#[test]
fn refill_triggers_on_a_new_calendar_day() {
    let mut store = MemoryStore::new();
    let mut outbox = Outbox::new();
    let now = Local::now();
    let now_ms = now.timestamp_millis();

    let mut progress = get_progress(&store, 7, now_ms);
    progress.energy = 3;
    progress.last_reset_ms = (now - Duration::days(2)).timestamp_millis();
    save_progress(&mut store, 7, &progress);

    refill_if_new_day(&mut store, &mut outbox, 7, now);
    let after = get_progress(&store, 7, now_ms);
    assert_eq!(after.energy, MAX_ENERGY);
    assert_eq!(after.last_reset_ms, now_ms);
    assert_eq!(after.last_refill_ms, now_ms);
    assert_eq!(outbox.drain(), vec![Notice::EnergyRestored]);
}

#[test]
fn refill_is_a_no_op_within_the_same_day() {
    let mut store = MemoryStore::new();
    let mut outbox = Outbox::new();
    let now = Local::now();
    let now_ms = now.timestamp_millis();

    let mut progress = get_progress(&store, 7, now_ms);
    progress.energy = 3;
    progress.last_reset_ms = now_ms;
    save_progress(&mut store, 7, &progress);

    refill_if_new_day(&mut store, &mut outbox, 7, now);
    assert_eq!(get_progress(&store, 7, now_ms).energy, 3);
    assert!(outbox.is_empty());
}

#[test]
fn recovery_estimate_is_hourly_linear_and_none_when_full() {
    let mut store = MemoryStore::new();
    let now = Local::now();
    let now_ms = now.timestamp_millis();

    assert!(recovery_time(&store, 7, now).is_none());

    let mut progress = get_progress(&store, 7, now_ms);
    progress.energy = MAX_ENERGY - 2;
    progress.last_refill_ms = now_ms;
    save_progress(&mut store, 7, &progress);

    let eta = recovery_time(&store, 7, now).expect("pool is short");
    assert_eq!(eta.timestamp_millis(), now_ms + 2 * 60 * 60 * 1000);
}
