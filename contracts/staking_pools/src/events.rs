#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub governance: Address,
    pub reward_token: Address,
    pub reward_source: Address,
    pub exit_fee_receiver: Address,
    pub reward_escrow: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreatedEvent {
    pub pool_id: u32,
    pub token: Address,
    pub timestamp: u64,
}

/// Emitted for any per-pool parameter change (weight, escrow or exit-fee
/// percentage). The topic tells which one.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolParameterUpdatedEvent {
    pub pool_id: u32,
    pub value: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardRateUpdatedEvent {
    pub reward_rate: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitFeeReceiverUpdatedEvent {
    pub receiver: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceEvent {
    pub previous: Address,
    pub next: Address,
    pub timestamp: u64,
}

/// Deposit, withdrawal and emergency exit of principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub user: Address,
    pub pool_id: u32,
    /// Full reward, including the escrowed part.
    pub amount: i128,
    pub escrowed: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitedEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub exit_fee: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferrerSetEvent {
    pub user: Address,
    pub referrer: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    governance: Address,
    reward_token: Address,
    reward_source: Address,
    exit_fee_receiver: Address,
    reward_escrow: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            governance,
            reward_token,
            reward_source,
            exit_fee_receiver,
            reward_escrow,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_created(env: &Env, pool_id: u32, token: Address) {
    env.events().publish(
        (symbol_short!("POOL_NEW"), pool_id),
        PoolCreatedEvent {
            pool_id,
            token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_weight_updated(env: &Env, pool_id: u32, weight: i128) {
    publish_pool_parameter(env, symbol_short!("WEIGHT"), pool_id, weight);
}

pub fn publish_escrow_percentage_updated(env: &Env, pool_id: u32, percentage: i128) {
    publish_pool_parameter(env, symbol_short!("ESC_PCT"), pool_id, percentage);
}

pub fn publish_exit_fee_percentage_updated(env: &Env, pool_id: u32, percentage: i128) {
    publish_pool_parameter(env, symbol_short!("FEE_PCT"), pool_id, percentage);
}

fn publish_pool_parameter(env: &Env, topic: soroban_sdk::Symbol, pool_id: u32, value: i128) {
    env.events().publish(
        (topic, pool_id),
        PoolParameterUpdatedEvent {
            pool_id,
            value,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_rate_updated(env: &Env, reward_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE"),),
        RewardRateUpdatedEvent {
            reward_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_exit_fee_receiver_updated(env: &Env, receiver: Address) {
    env.events().publish(
        (symbol_short!("FEE_RCV"),),
        ExitFeeReceiverUpdatedEvent {
            receiver,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pending_governance_updated(env: &Env, previous: Address, next: Address) {
    env.events().publish(
        (symbol_short!("GOV_PEND"), next.clone()),
        GovernanceEvent {
            previous,
            next,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_governance_updated(env: &Env, previous: Address, next: Address) {
    env.events().publish(
        (symbol_short!("GOV_UPD"), next.clone()),
        GovernanceEvent {
            previous,
            next,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, user: Address, pool_id: u32, amount: i128) {
    publish_tokens(env, symbol_short!("DEPOSIT"), user, pool_id, amount);
}

pub fn publish_withdrawn(env: &Env, user: Address, pool_id: u32, amount: i128) {
    publish_tokens(env, symbol_short!("WITHDRAW"), user, pool_id, amount);
}

pub fn publish_emergency_exited(env: &Env, user: Address, pool_id: u32, amount: i128) {
    publish_tokens(env, symbol_short!("EMERG"), user, pool_id, amount);
}

fn publish_tokens(env: &Env, topic: soroban_sdk::Symbol, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (topic, user.clone()),
        TokensEvent {
            user,
            pool_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_claimed(env: &Env, user: Address, pool_id: u32, amount: i128, escrowed: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), user.clone()),
        ClaimedEvent {
            user,
            pool_id,
            amount,
            escrowed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_exited(env: &Env, user: Address, pool_id: u32, amount: i128, exit_fee: i128) {
    env.events().publish(
        (symbol_short!("EXITED"), user.clone()),
        ExitedEvent {
            user,
            pool_id,
            amount,
            exit_fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_referrer_set(env: &Env, user: Address, referrer: Address) {
    env.events().publish(
        (symbol_short!("REF_SET"), user.clone()),
        ReferrerSetEvent {
            user,
            referrer,
            timestamp: env.ledger().timestamp(),
        },
    );
}
