//! Interface of the external shares time-lock (veDOUGH) that escrowed
//! balances can be migrated into.

use soroban_sdk::{contractclient, Address, Env};

/// Lock duration requested for migrated balances.
pub const MIGRATION_LOCK_MONTHS: u32 = 36;

#[contractclient(name = "SharesTimeLockClient")]
pub trait SharesTimeLock {
    /// Pull `amount` tokens from `from` and lock them for `months` on behalf
    /// of `receiver`. `from` must have approved the time-lock beforehand.
    fn deposit_by_months(env: Env, from: Address, amount: i128, months: u32, receiver: Address);
}
