//! Weapon catalog and per-character inventory.
//!
//! The catalog is static and shared; ownership and the single equipped
//! slot live in the store under `weapons:<characterId>`.

use serde::{Deserialize, Serialize};

use crate::store::{KvStore, read_or_default, weapons_key, write_record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: u64,
    pub name: String,
    /// Flat additive damage bonus; weapons touch nothing else.
    pub damage: i32,
    pub price: u64,
    pub description: String,
    pub image_url: String,
}

pub fn find_weapon(catalog: &[Weapon], weapon_id: u64) -> Option<&Weapon> {
    catalog.iter().find(|weapon| weapon.id == weapon_id)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponInventory {
    #[serde(default)]
    pub owned: Vec<u64>,
    /// Must be a member of `owned` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipped: Option<u64>,
}

/// Lazily empty for unknown characters.
pub fn inventory_of(store: &dyn KvStore, character_id: u64) -> WeaponInventory {
    read_or_default(store, &weapons_key(character_id)).unwrap_or_default()
}

pub fn save_inventory(
    store: &mut dyn KvStore,
    character_id: u64,
    inventory: &WeaponInventory,
) -> bool {
    write_record(store, &weapons_key(character_id), inventory)
}

/// Grant ownership if the weapon exists, is affordable, and is not yet
/// owned. The currency debit is the caller's separate write.
pub fn buy_weapon(
    store: &mut dyn KvStore,
    catalog: &[Weapon],
    character_id: u64,
    weapon_id: u64,
    balance: u64,
) -> bool {
    let Some(weapon) = find_weapon(catalog, weapon_id) else {
        return false;
    };
    if weapon.price > balance {
        return false;
    }
    let mut inventory = inventory_of(store, character_id);
    if inventory.owned.contains(&weapon_id) {
        return false;
    }
    inventory.owned.push(weapon_id);
    save_inventory(store, character_id, &inventory)
}

/// Point the single equipped slot at an owned weapon, replacing any
/// previous equip. False when the weapon is not owned.
pub fn equip_weapon(store: &mut dyn KvStore, character_id: u64, weapon_id: u64) -> bool {
    let mut inventory = inventory_of(store, character_id);
    if !inventory.owned.contains(&weapon_id) {
        return false;
    }
    inventory.equipped = Some(weapon_id);
    save_inventory(store, character_id, &inventory)
}

pub fn equipped_weapon<'a>(
    store: &dyn KvStore,
    catalog: &'a [Weapon],
    character_id: u64,
) -> Option<&'a Weapon> {
    let inventory = inventory_of(store, character_id);
    find_weapon(catalog, inventory.equipped?)
}
