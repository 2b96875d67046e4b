#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the escrow is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub dough: Address,
    pub timestamp: u64,
}

/// Fired when a reward contract is allowed to create vesting entries.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsContractEvent {
    pub rewards_contract: Address,
    pub timestamp: u64,
}

/// Fired when a quantity is appended to (or merged into) a schedule.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingEntryCreatedEvent {
    pub beneficiary: Address,
    pub index: u32,
    pub end_time: u64,
    pub quantity: i128,
    pub timestamp: u64,
}

/// Fired when matured entries are paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestedEvent {
    pub beneficiary: Address,
    pub value: i128,
    pub timestamp: u64,
}

/// Fired when the remaining escrow is moved into the shares time-lock.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MigratedEvent {
    pub beneficiary: Address,
    pub value: i128,
    pub timestamp: u64,
}

/// Fired when the owner changes the escrowed token or the time-lock.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressUpdatedEvent {
    pub value: Option<Address>,
    pub timestamp: u64,
}

/// Fired when ownership moves to a new address.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipEvent {
    pub previous: Address,
    pub next: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, dough: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            dough,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_contract_added(env: &Env, rewards_contract: Address) {
    env.events().publish(
        (symbol_short!("RWD_ADD"), rewards_contract.clone()),
        RewardsContractEvent {
            rewards_contract,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_contract_removed(env: &Env, rewards_contract: Address) {
    env.events().publish(
        (symbol_short!("RWD_REM"), rewards_contract.clone()),
        RewardsContractEvent {
            rewards_contract,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vesting_entry_created(
    env: &Env,
    beneficiary: Address,
    index: u32,
    end_time: u64,
    quantity: i128,
) {
    env.events().publish(
        (symbol_short!("ENTRY"), beneficiary.clone()),
        VestingEntryCreatedEvent {
            beneficiary,
            index,
            end_time,
            quantity,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vested(env: &Env, beneficiary: Address, value: i128) {
    env.events().publish(
        (symbol_short!("VESTED"), beneficiary.clone()),
        VestedEvent {
            beneficiary,
            value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_migrated(env: &Env, beneficiary: Address, value: i128) {
    env.events().publish(
        (symbol_short!("MIGRATED"), beneficiary.clone()),
        MigratedEvent {
            beneficiary,
            value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_dough_updated(env: &Env, dough: Address) {
    env.events().publish(
        (symbol_short!("DOUGH"),),
        AddressUpdatedEvent {
            value: Some(dough),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_timelock_updated(env: &Env, timelock: Option<Address>) {
    env.events().publish(
        (symbol_short!("TIMELOCK"),),
        AddressUpdatedEvent {
            value: timelock,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_proposed(env: &Env, previous: Address, next: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), previous.clone()),
        OwnershipEvent {
            previous,
            next,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_accepted(env: &Env, previous: Address, next: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), next.clone()),
        OwnershipEvent {
            previous,
            next,
            timestamp: env.ledger().timestamp(),
        },
    );
}
