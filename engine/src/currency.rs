//! SPK balances: per-wallet non-negative counters, nothing on-chain.

use serde::{Deserialize, Serialize};

use crate::store::{BALANCES_KEY, KvStore, read_or_default, write_record};

/// Credited once when a wallet is first observed with a zero balance.
pub const STARTING_GRANT: u64 = 1000;
/// Credited per battle victory.
pub const VICTORY_REWARD: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub address: String,
    pub balance: u64,
}

fn load_balances(store: &dyn KvStore) -> Vec<WalletBalance> {
    read_or_default(store, BALANCES_KEY).unwrap_or_default()
}

/// Zero for unknown wallets. Addresses match case-insensitively.
pub fn balance_of(store: &dyn KvStore, address: &str) -> u64 {
    load_balances(store)
        .iter()
        .find(|entry| entry.address.eq_ignore_ascii_case(address))
        .map(|entry| entry.balance)
        .unwrap_or(0)
}

/// Credit (positive delta) or debit (negative delta); debits clamp the
/// balance at zero rather than failing.
pub fn adjust_balance(store: &mut dyn KvStore, address: &str, delta: i64) -> bool {
    let mut balances = load_balances(store);
    match balances
        .iter_mut()
        .find(|entry| entry.address.eq_ignore_ascii_case(address))
    {
        Some(entry) => entry.balance = apply_delta(entry.balance, delta),
        None => balances.push(WalletBalance {
            address: address.to_string(),
            balance: apply_delta(0, delta),
        }),
    }
    write_record(store, BALANCES_KEY, &balances)
}

fn apply_delta(balance: u64, delta: i64) -> u64 {
    if delta >= 0 {
        balance.saturating_add(delta as u64)
    } else {
        balance.saturating_sub(delta.unsigned_abs())
    }
}
