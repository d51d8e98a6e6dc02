//! High-level game operations: battle sessions with their settlement
//! rules, the weapon-shop purchase flow, and catalog loading.

use std::fs;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Rolls;
use crate::battle::{Battle, Phase};
use crate::content;
use crate::currency::{STARTING_GRANT, VICTORY_REWARD, adjust_balance, balance_of};
use crate::energy::{self, EnergyStatus, can_battle, refill_if_new_day, status_of};
use crate::events::{Notice, Outbox};
use crate::level::battle_experience;
use crate::progress::{add_experience, get_progress};
use crate::stats::{Character, character_from_nft, derive_base_stats, image_url_for, scale_opponent};
use crate::store::KvStore;
use crate::weapons::{Weapon, buy_weapon, equipped_weapon, find_weapon};

/// Safety cap for the non-interactive loop. The damage floor makes
/// endless battles impossible in practice; this only guards a logic bug.
const MAX_TURNS: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaConfig {
    pub nft_id: u64,
    pub name: String,
    pub opponent_id: u64,
    pub opponent_name: String,
    pub wallet: String,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaResult {
    pub victory: bool,
    pub turns: u32,
    pub player_health_end: i32,
    pub opponent_health_end: i32,
    pub experience_gained: u64,
    pub spk_gained: u64,
    pub level_after: u32,
    pub energy_left: i32,
    pub log: Vec<String>,
}

/// One in-progress battle for one player session.
///
/// Nothing is persisted while the battle runs; dropping the session at any
/// non-terminal point discards it completely. Only a terminal outcome is
/// settled: experience applied, one energy spent win or lose, currency
/// credited on victory.
pub struct BattleSession<'a> {
    store: &'a mut dyn KvStore,
    outbox: &'a mut Outbox,
    rolls: Rolls,
    wallet: String,
    battle: Battle,
    turns: u32,
    result: Option<ArenaResult>,
}

impl<'a> BattleSession<'a> {
    /// Try the daily refill, derive both combatants, and open the battle.
    /// Fails when the character has no energy left. If the opponent is
    /// faster it lands its opening attack before control returns.
    pub fn begin(
        store: &'a mut dyn KvStore,
        outbox: &'a mut Outbox,
        catalog: &[Weapon],
        cfg: &ArenaConfig,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let now_ms = now.timestamp_millis();
        refill_if_new_day(store, outbox, cfg.nft_id, now);

        let player = character_from_nft(store, cfg.nft_id, &cfg.name, now_ms);
        if !can_battle(&player) {
            bail!("{} has no energy left to battle", player.name);
        }

        let base_opponent = Character {
            id: cfg.opponent_id,
            name: cfg.opponent_name.clone(),
            level: 1,
            experience: 0,
            stats: derive_base_stats(cfg.opponent_id),
            image_url: image_url_for(cfg.opponent_id),
        };
        let opponent = scale_opponent(&base_opponent, player.level);

        let player_bonus = equipped_weapon(store, catalog, player.id)
            .map(|weapon| weapon.damage)
            .unwrap_or(0);
        let opponent_bonus = equipped_weapon(store, catalog, opponent.id)
            .map(|weapon| weapon.damage)
            .unwrap_or(0);

        let mut rolls = Rolls::from_seed(cfg.seed);
        let battle = Battle::new(&mut rolls, player, opponent, player_bonus, opponent_bonus);
        let mut session = Self {
            store,
            outbox,
            rolls,
            wallet: cfg.wallet.clone(),
            battle,
            turns: 0,
            result: None,
        };
        if session.battle.phase() == Phase::OpponentTurn {
            session.battle.step(&mut session.rolls);
            session.turns += 1;
            session.settle_if_finished(now);
        }
        Ok(session)
    }

    /// The single external input. Ignored (returns false, no state
    /// change) unless it is the player's turn and the battle is live; a
    /// non-terminal player attack is answered by the opponent's
    /// counterattack before control returns.
    pub fn submit_attack(&mut self, now: DateTime<Local>) -> bool {
        if self.battle.phase() != Phase::PlayerTurn {
            return false;
        }
        self.battle.step(&mut self.rolls);
        self.turns += 1;
        if !self.battle.is_finished() {
            self.battle.step(&mut self.rolls);
            self.turns += 1;
        }
        self.settle_if_finished(now);
        true
    }

    /// Walk away mid-battle: nothing was persisted, nothing is.
    pub fn abandon(self) {}

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// `Some` once the battle has been settled.
    pub fn result(&self) -> Option<&ArenaResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<ArenaResult> {
        self.result
    }

    fn settle_if_finished(&mut self, now: DateTime<Local>) {
        if self.result.is_some() {
            return;
        }
        let Some(victory) = self.battle.victory() else {
            return;
        };

        let player_id = self.battle.player().id;
        let gained = battle_experience(
            self.battle.player().level,
            self.battle.opponent().level,
            victory,
        );
        let progress = add_experience(self.store, self.outbox, player_id, gained, now.timestamp_millis());
        energy::consume(self.store, player_id, 1, now);

        let energy_left = get_progress(self.store, player_id, now.timestamp_millis()).energy;
        match status_of(energy_left) {
            EnergyStatus::Empty => self.outbox.push(Notice::EnergyEmpty),
            EnergyStatus::Low => self.outbox.push(Notice::EnergyLow {
                energy: energy_left,
            }),
            _ => {}
        }

        let spk_gained = if victory {
            adjust_balance(self.store, &self.wallet, VICTORY_REWARD as i64);
            VICTORY_REWARD
        } else {
            0
        };

        debug!(
            player_id,
            victory, gained, spk_gained, energy_left, "battle settled"
        );
        self.result = Some(ArenaResult {
            victory,
            turns: self.turns,
            player_health_end: self.battle.player_health(),
            opponent_health_end: self.battle.opponent_health(),
            experience_gained: gained,
            spk_gained,
            level_after: progress.level,
            energy_left,
            log: self.battle.log().to_vec(),
        });
    }
}

/// Run a whole battle non-interactively (the player attacks whenever it
/// is their turn). Used by the CLI and the Monte Carlo harness.
pub fn simulate_battle(
    store: &mut dyn KvStore,
    outbox: &mut Outbox,
    catalog: &[Weapon],
    cfg: &ArenaConfig,
    now: DateTime<Local>,
) -> Result<ArenaResult> {
    let mut session = BattleSession::begin(store, outbox, catalog, cfg, now)?;
    while session.result().is_none() {
        if session.turns >= MAX_TURNS {
            bail!("battle failed to terminate within {MAX_TURNS} turns");
        }
        session.submit_attack(now);
    }
    session
        .into_result()
        .context("finished battle must carry a result")
}

/// Credit the starting grant to a wallet seen with a zero balance, as the
/// reference client does on connect. Returns the balance afterwards.
pub fn ensure_starting_balance(store: &mut dyn KvStore, address: &str) -> u64 {
    let balance = balance_of(store, address);
    if balance == 0 {
        adjust_balance(store, address, STARTING_GRANT as i64);
        return balance_of(store, address);
    }
    balance
}

/// Shop purchase: grant the weapon, then debit the wallet, in the
/// reference order. The two writes are independent; a storage failure
/// between them can leave the pair inconsistent, accepted for a
/// single-session store.
pub fn purchase_weapon(
    store: &mut dyn KvStore,
    catalog: &[Weapon],
    character_id: u64,
    weapon_id: u64,
    wallet: &str,
) -> bool {
    let Some(price) = find_weapon(catalog, weapon_id).map(|weapon| weapon.price) else {
        return false;
    };
    let balance = balance_of(store, wallet);
    if !buy_weapon(store, catalog, character_id, weapon_id, balance) {
        return false;
    }
    adjust_balance(store, wallet, -(price as i64))
}

/// The embedded three-tier catalog.
pub fn builtin_catalog() -> Result<Vec<Weapon>> {
    serde_json::from_str(content::builtin_weapons()).context("parse built-in weapon catalog")
}

/// Load a replacement catalog from a JSON file.
pub fn load_catalog(path: &str) -> Result<Vec<Weapon>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read catalog JSON: {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse catalog JSON: {path}"))
}
