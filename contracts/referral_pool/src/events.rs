#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_escrow: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub reward: i128,
    pub reward_rate: i128,
    pub period_finish: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeEvent {
    pub user: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub user: Address,
    pub reward: i128,
    pub escrowed: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralSetEvent {
    pub user: Address,
    pub referrer: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralRewardEvent {
    pub user: Address,
    pub referrer: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardDistributionUpdatedEvent {
    pub distribution: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowPercentageUpdatedEvent {
    pub percentage: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipEvent {
    pub previous: Address,
    pub next: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    stake_token: Address,
    reward_token: Address,
    reward_escrow: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token,
            reward_token,
            reward_escrow,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_added(env: &Env, reward: i128, reward_rate: i128, period_finish: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADD"),),
        RewardAddedEvent {
            reward,
            reward_rate,
            period_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), user.clone()),
        StakeEvent {
            user,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, user: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), user.clone()),
        StakeEvent {
            user,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, user: Address, reward: i128, escrowed: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), user.clone()),
        RewardPaidEvent {
            user,
            reward,
            escrowed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_referral_set(env: &Env, user: Address, referrer: Address) {
    env.events().publish(
        (symbol_short!("REF_SET"), user.clone()),
        ReferralSetEvent {
            user,
            referrer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_referral_reward(env: &Env, user: Address, referrer: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("REF_RWD"), referrer.clone()),
        ReferralRewardEvent {
            user,
            referrer,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_distribution_updated(env: &Env, distribution: Address) {
    env.events().publish(
        (symbol_short!("DISTRIB"),),
        RewardDistributionUpdatedEvent {
            distribution,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_escrow_percentage_updated(env: &Env, percentage: i128) {
    env.events().publish(
        (symbol_short!("ESC_PCT"),),
        EscrowPercentageUpdatedEvent {
            percentage,
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
