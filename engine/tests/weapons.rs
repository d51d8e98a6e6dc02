use engine::MemoryStore;
use engine::api::builtin_catalog;
use engine::weapons::{buy_weapon, equip_weapon, equipped_weapon, find_weapon, inventory_of};

#[test]
fn builtin_catalog_has_three_tiers() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    assert_eq!(catalog.len(), 3);
    let damages: Vec<i32> = catalog.iter().map(|w| w.damage).collect();
    assert_eq!(damages, vec![5, 8, 15]);
    let prices: Vec<u64> = catalog.iter().map(|w| w.price).collect();
    assert_eq!(prices, vec![100, 200, 500]);
    assert!(find_weapon(&catalog, 2).is_some());
    assert!(find_weapon(&catalog, 99).is_none());
}

#[test]
fn purchase_succeeds_exactly_once() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    let mut store = MemoryStore::new();

    assert!(buy_weapon(&mut store, &catalog, 7, 1, 100));
    assert!(inventory_of(&store, 7).owned.contains(&1));

    // Same weapon again: already owned.
    assert!(!buy_weapon(&mut store, &catalog, 7, 1, 1000));
    assert_eq!(inventory_of(&store, 7).owned, vec![1]);
}

#[test]
fn purchase_fails_without_granting() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    let mut store = MemoryStore::new();

    // Price above balance.
    assert!(!buy_weapon(&mut store, &catalog, 7, 3, 499));
    // Unknown weapon id.
    assert!(!buy_weapon(&mut store, &catalog, 7, 99, 10_000));
    assert!(inventory_of(&store, 7).owned.is_empty());
}

#[test]
fn equip_requires_ownership() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    let mut store = MemoryStore::new();

    assert!(!equip_weapon(&mut store, 7, 1));
    assert_eq!(inventory_of(&store, 7).equipped, None);

    assert!(buy_weapon(&mut store, &catalog, 7, 1, 100));
    assert!(equip_weapon(&mut store, 7, 1));
    assert_eq!(inventory_of(&store, 7).equipped, Some(1));
}

#[test]
fn equipping_replaces_the_previous_weapon() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    let mut store = MemoryStore::new();

    assert!(buy_weapon(&mut store, &catalog, 7, 1, 1000));
    assert!(buy_weapon(&mut store, &catalog, 7, 2, 1000));
    assert!(equip_weapon(&mut store, 7, 1));
    assert!(equip_weapon(&mut store, 7, 2));

    let inventory = inventory_of(&store, 7);
    assert_eq!(inventory.equipped, Some(2));
    assert_eq!(inventory.owned, vec![1, 2]);
    assert_eq!(equipped_weapon(&store, &catalog, 7).map(|w| w.damage), Some(8));
}

#[test]
fn inventories_are_per_character() {
    let catalog = builtin_catalog().expect("built-in catalog parses");
    let mut store = MemoryStore::new();

    assert!(buy_weapon(&mut store, &catalog, 7, 1, 100));
    assert!(inventory_of(&store, 8).owned.is_empty());
    assert!(equipped_weapon(&store, &catalog, 8).is_none());
}
