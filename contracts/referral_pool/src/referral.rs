//! Referral side ledger: who brought whom, recorded once per account.

use common::{fixed_point, ttl, CommonError, ONE};
use soroban_sdk::{log, symbol_short, Address, Env, Symbol};

use crate::events;

/// Share of every paid reward credited to the referrer: 1 %.
pub const REFERRAL_PERCENTAGE: i128 = ONE / 100;

const REFERRER: Symbol = symbol_short!("REFERRER");

pub fn referrer_of(env: &Env, account: &Address) -> Option<Address> {
    env.storage().persistent().get(&(REFERRER, account.clone()))
}

/// Record `referrer` for `account` unless one is already recorded.
///
/// Returns whether the referrer was stored. Self-referral is rejected by the
/// caller before reaching this point.
pub fn record(env: &Env, account: &Address, referrer: &Address) -> bool {
    let key = (REFERRER, account.clone());
    if env.storage().persistent().has(&key) {
        log!(env, "referrer already recorded", account);
        return false;
    }
    env.storage().persistent().set(&key, referrer);
    ttl::extend_persistent(env, &key);
    events::publish_referral_set(env, account.clone(), referrer.clone());
    true
}

/// Amount owed to the referrer of an account that was paid `reward`.
pub fn referral_reward(env: &Env, reward: i128) -> Result<i128, CommonError> {
    fixed_point::apply_percentage(env, reward, REFERRAL_PERCENTAGE)
}
