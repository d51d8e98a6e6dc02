use anyhow::Result;
use chrono::Local;
use clap::Parser;
use engine::api::{ArenaConfig, builtin_catalog, simulate_battle};
use engine::progress::{CharacterProgress, save_progress};
use engine::{MemoryStore, Outbox};

#[derive(Parser)]
#[command(name = "simulate-arena")]
#[command(about = "Monte Carlo sim: many battles against a scaled opponent")]
struct Args {
    /// Player NFT token id
    #[arg(long, default_value_t = 7)]
    id: u64,

    /// Opponent NFT token id
    #[arg(long, default_value_t = 21)]
    opponent_id: u64,

    /// Player level (progress is seeded to this before each trial)
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Weapon id to pre-own and equip for the player (optional)
    #[arg(long)]
    weapon: Option<u64>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let catalog = builtin_catalog()?;
    let now = Local::now();
    let xp_for_level = engine::level::LEVEL_THRESHOLDS
        .iter()
        .find(|(level, _)| *level == args.level)
        .map(|(_, xp)| *xp)
        .unwrap_or(0);

    let mut wins = 0u32;
    let mut total_turns = 0u64;
    for trial in 0..args.trials {
        // Fresh store per trial so settlements cannot leak across trials.
        let mut store = MemoryStore::new();
        let mut outbox = Outbox::new();
        let progress = CharacterProgress {
            experience: xp_for_level,
            level: args.level,
            ..CharacterProgress::fresh(now.timestamp_millis())
        };
        save_progress(&mut store, args.id, &progress);
        if let Some(weapon_id) = args.weapon {
            engine::weapons::save_inventory(
                &mut store,
                args.id,
                &engine::weapons::WeaponInventory {
                    owned: vec![weapon_id],
                    equipped: Some(weapon_id),
                },
            );
        }

        let cfg = ArenaConfig {
            nft_id: args.id,
            name: format!("Punk #{}", args.id),
            opponent_id: args.opponent_id,
            opponent_name: format!("Punk #{}", args.opponent_id),
            wallet: "0xsim".to_string(),
            seed: args.seed + trial as u64,
        };
        let result = simulate_battle(&mut store, &mut outbox, &catalog, &cfg, now)?;
        if result.victory {
            wins += 1;
        }
        total_turns += result.turns as u64;
    }

    let win_rate = wins as f64 / args.trials.max(1) as f64 * 100.0;
    let avg_turns = total_turns as f64 / args.trials.max(1) as f64;
    println!(
        "#{} (level {}) vs #{}: {}/{} wins ({:.1}%), avg {:.1} turns",
        args.id, args.level, args.opponent_id, wins, args.trials, win_rate, avg_turns
    );
    Ok(())
}
