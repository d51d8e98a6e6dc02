use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use engine::api::{
    ArenaConfig, builtin_catalog, ensure_starting_balance, load_catalog, purchase_weapon,
    simulate_battle,
};
use engine::currency::balance_of;
use engine::energy::{recovery_time, status_of};
use engine::progress::get_progress;
use engine::stats::{character_from_nft, derive_base_stats, image_url_for, scale_opponent,
    stats_history};
use engine::weapons::{equip_weapon, inventory_of};
use engine::{Character, Outbox};

mod file_store;
use file_store::FileStore;

#[derive(Subcommand)]
enum Cmd {
    /// Derive and show the character for an NFT id
    Character {
        /// NFT token id
        #[arg(long)]
        id: u64,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Preview the level-matched opponent an NFT would face
    Opponent {
        /// Opponent NFT token id
        #[arg(long)]
        id: u64,
        /// Opponent display name
        #[arg(long)]
        name: String,
        /// Player level to scale to
        #[arg(long, default_value_t = 1)]
        player_level: u32,
    },
    /// Fight a seeded battle and settle the outcome
    Battle {
        /// Player NFT token id
        #[arg(long)]
        id: u64,
        /// Player display name
        #[arg(long)]
        name: String,
        /// Opponent NFT token id
        #[arg(long)]
        opponent_id: u64,
        /// Opponent display name
        #[arg(long)]
        opponent_name: String,
        /// Wallet address for SPK settlement
        #[arg(long)]
        wallet: String,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// List the weapon catalog
    Shop,
    /// Buy a weapon for a character
    Buy {
        /// Character NFT token id
        #[arg(long)]
        id: u64,
        /// Weapon id from the catalog
        #[arg(long)]
        weapon: u64,
        /// Wallet address to debit
        #[arg(long)]
        wallet: String,
    },
    /// Equip an owned weapon
    Equip {
        /// Character NFT token id
        #[arg(long)]
        id: u64,
        /// Weapon id from the catalog
        #[arg(long)]
        weapon: u64,
    },
    /// Show a wallet's SPK balance (granting the starting SPK if new)
    Balance {
        /// Wallet address
        #[arg(long)]
        wallet: String,
    },
    /// Show a character's energy pool and recovery estimate
    Energy {
        /// Character NFT token id
        #[arg(long)]
        id: u64,
    },
    /// Show the recent stats-history audit log
    History,
}

#[derive(Parser)]
#[command(name = "arena-cli")]
#[command(about = "NFT arena battle harness")]
struct Cli {
    /// Path to the JSON store file
    #[arg(long, default_value = "arena_store.json")]
    store: PathBuf,

    /// Optional weapon catalog JSON (defaults to the built-in three tiers)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

fn print_character(character: &Character) {
    println!(
        "#{} {} — level {} ({} xp)",
        character.id, character.name, character.level, character.experience
    );
    println!(
        "  health={} strength={} agility={} speed={} energy={}",
        character.stats.health,
        character.stats.strength,
        character.stats.agility,
        character.stats.speed,
        character.stats.energy
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(&path.to_string_lossy())?,
        None => builtin_catalog()?,
    };
    let mut store = FileStore::open(&cli.store)?;
    let mut outbox = Outbox::new();
    let now = Local::now();

    match cli.cmd {
        Cmd::Character { id, name } => {
            let character = character_from_nft(&mut store, id, &name, now.timestamp_millis());
            print_character(&character);
        }
        Cmd::Opponent {
            id,
            name,
            player_level,
        } => {
            let base = Character {
                id,
                name,
                level: 1,
                experience: 0,
                stats: derive_base_stats(id),
                image_url: image_url_for(id),
            };
            print_character(&scale_opponent(&base, player_level));
        }
        Cmd::Battle {
            id,
            name,
            opponent_id,
            opponent_name,
            wallet,
            seed,
        } => {
            ensure_starting_balance(&mut store, &wallet);
            let cfg = ArenaConfig {
                nft_id: id,
                name,
                opponent_id,
                opponent_name,
                wallet: wallet.clone(),
                seed,
            };
            let result = simulate_battle(&mut store, &mut outbox, &catalog, &cfg, now)?;
            for line in &result.log {
                println!("{line}");
            }
            println!(
                "{} after {} turns: +{} xp, +{} SPK, level {}, {} energy left",
                if result.victory { "VICTORY" } else { "DEFEAT" },
                result.turns,
                result.experience_gained,
                result.spk_gained,
                result.level_after,
                result.energy_left
            );
            for notice in outbox.drain() {
                println!("notice: {}", serde_json::to_string(&notice)?);
            }
        }
        Cmd::Shop => {
            for weapon in &catalog {
                println!(
                    "[{}] {} (+{} damage) — {} SPK: {}",
                    weapon.id, weapon.name, weapon.damage, weapon.price, weapon.description
                );
            }
        }
        Cmd::Buy { id, weapon, wallet } => {
            ensure_starting_balance(&mut store, &wallet);
            if purchase_weapon(&mut store, &catalog, id, weapon, &wallet) {
                println!(
                    "bought weapon {} — balance now {} SPK",
                    weapon,
                    balance_of(&store, &wallet)
                );
            } else {
                println!("purchase failed (unknown weapon, insufficient SPK, or already owned)");
            }
        }
        Cmd::Equip { id, weapon } => {
            if equip_weapon(&mut store, id, weapon) {
                println!("equipped weapon {weapon}");
            } else {
                println!("equip failed (weapon not owned)");
            }
            let inventory = inventory_of(&store, id);
            println!("owned: {:?}, equipped: {:?}", inventory.owned, inventory.equipped);
        }
        Cmd::Balance { wallet } => {
            let balance = ensure_starting_balance(&mut store, &wallet);
            println!("{wallet}: {balance} SPK");
        }
        Cmd::Energy { id } => {
            let progress = get_progress(&store, id, now.timestamp_millis());
            println!(
                "energy {}/20 ({:?})",
                progress.energy,
                status_of(progress.energy)
            );
            match recovery_time(&store, id, now) {
                Some(at) => println!("full (informational estimate) at {at}"),
                None => println!("pool is full"),
            }
        }
        Cmd::History => {
            for entry in stats_history(&store) {
                println!(
                    "{} level={} strength={} agility={} speed={}",
                    entry.timestamp_ms,
                    entry.level,
                    entry.stats.strength,
                    entry.stats.agility,
                    entry.stats.speed
                );
            }
        }
    }

    store.persist().context("failed to persist store")?;
    Ok(())
}
