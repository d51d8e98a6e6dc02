//! Turn-based battle resolution.
//!
//! [`Battle`] is a pure state machine over the two combatants' current
//! stats plus one random draw per stochastic check. It never touches
//! persistence or currency; settlement belongs to [`crate::api`].

use serde::Serialize;

use crate::Rolls;
use crate::stats::Character;

/// Per-battle health scalar, independent of the persisted health stat.
pub const BATTLE_HEALTH: i32 = 100;

const EVASION_DIVISOR: f64 = 150.0;
const CRIT_DIVISOR: f64 = 200.0;
const STRENGTH_MULTIPLIER: f64 = 1.5;
const CRIT_MULTIPLIER: f64 = 1.8;
const MITIGATION_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub evaded: bool,
    pub critical: bool,
}

/// Resolve one attack: evasion check, strength-based damage plus the flat
/// weapon bonus, critical check, then flat mitigation with a floor of 1
/// so every landed hit makes progress and no battle can stall.
pub fn resolve_attack(
    rolls: &mut Rolls,
    attacker: &Character,
    defender: &Character,
    weapon_bonus: i32,
) -> AttackOutcome {
    let evasion_chance = defender.stats.agility as f64 / EVASION_DIVISOR;
    if rolls.chance(evasion_chance) {
        return AttackOutcome {
            damage: 0,
            evaded: true,
            critical: false,
        };
    }

    let mut damage = attacker.stats.strength as f64 * STRENGTH_MULTIPLIER + weapon_bonus as f64;
    let critical = rolls.chance(attacker.stats.speed as f64 / CRIT_DIVISOR);
    if critical {
        damage *= CRIT_MULTIPLIER;
    }

    let mitigated = damage - defender.stats.agility as f64 * MITIGATION_FACTOR;
    AttackOutcome {
        damage: (mitigated.floor() as i32).max(1),
        evaded: false,
        critical,
    }
}

/// Strictly higher speed attacks first; equal speed is an unbiased coin
/// flip.
pub fn first_attacker(rolls: &mut Rolls, player: &Character, opponent: &Character) -> Side {
    use std::cmp::Ordering;
    match player.stats.speed.cmp(&opponent.stats.speed) {
        Ordering::Greater => Side::Player,
        Ordering::Less => Side::Opponent,
        Ordering::Equal => {
            if rolls.coin_flip() {
                Side::Player
            } else {
                Side::Opponent
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerTurn,
    OpponentTurn,
    Finished { victory: bool },
}

#[derive(Debug)]
pub struct Battle {
    player: Character,
    opponent: Character,
    player_bonus: i32,
    opponent_bonus: i32,
    player_health: i32,
    opponent_health: i32,
    phase: Phase,
    log: Vec<String>,
}

impl Battle {
    pub fn new(
        rolls: &mut Rolls,
        player: Character,
        opponent: Character,
        player_bonus: i32,
        opponent_bonus: i32,
    ) -> Self {
        let first = first_attacker(rolls, &player, &opponent);
        let mut log = Vec::new();
        log.push(format!(
            "{} (Lv {}) vs {} (Lv {})",
            player.name, player.level, opponent.name, opponent.level
        ));
        if player_bonus > 0 {
            log.push(format!(
                "{} enters with a weapon (+{} damage)",
                player.name, player_bonus
            ));
        }
        log.push(format!(
            "{} attacks first",
            match first {
                Side::Player => &player.name,
                Side::Opponent => &opponent.name,
            }
        ));
        Self {
            player,
            opponent,
            player_bonus,
            opponent_bonus,
            player_health: BATTLE_HEALTH,
            opponent_health: BATTLE_HEALTH,
            phase: match first {
                Side::Player => Phase::PlayerTurn,
                Side::Opponent => Phase::OpponentTurn,
            },
            log,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn opponent(&self) -> &Character {
        &self.opponent
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn opponent_health(&self) -> i32 {
        self.opponent_health
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    /// `Some(victory)` once terminal.
    pub fn victory(&self) -> Option<bool> {
        match self.phase {
            Phase::Finished { victory } => Some(victory),
            _ => None,
        }
    }

    /// Resolve one attack for whichever side holds the turn. A call in a
    /// terminal state is a no-op, not an error.
    pub fn step(&mut self, rolls: &mut Rolls) -> Option<AttackOutcome> {
        let attacker_side = match self.phase {
            Phase::PlayerTurn => Side::Player,
            Phase::OpponentTurn => Side::Opponent,
            Phase::Finished { .. } => return None,
        };

        let (attacker, defender, bonus) = match attacker_side {
            Side::Player => (&self.player, &self.opponent, self.player_bonus),
            Side::Opponent => (&self.opponent, &self.player, self.opponent_bonus),
        };
        let outcome = resolve_attack(rolls, attacker, defender, bonus);

        if outcome.evaded {
            self.log
                .push(format!("{} evades the attack!", defender.name));
            self.phase = match attacker_side.other() {
                Side::Player => Phase::PlayerTurn,
                Side::Opponent => Phase::OpponentTurn,
            };
            return Some(outcome);
        }

        self.log.push(if outcome.critical {
            format!(
                "CRITICAL! {} deals {} damage",
                attacker.name, outcome.damage
            )
        } else {
            format!("{} deals {} damage", attacker.name, outcome.damage)
        });

        let defender_health = match attacker_side {
            Side::Player => &mut self.opponent_health,
            Side::Opponent => &mut self.player_health,
        };
        *defender_health = (*defender_health - outcome.damage).max(0);

        if *defender_health == 0 {
            let victory = attacker_side == Side::Player;
            let (winner, loser) = match attacker_side {
                Side::Player => (&self.player.name, &self.opponent.name),
                Side::Opponent => (&self.opponent.name, &self.player.name),
            };
            self.log.push(format!("{loser} is defeated, {winner} wins"));
            self.phase = Phase::Finished { victory };
        } else {
            self.phase = match attacker_side.other() {
                Side::Player => Phase::PlayerTurn,
                Side::Opponent => Phase::OpponentTurn,
            };
        }
        Some(outcome)
    }
}
