//! Pool and stake bookkeeping.
//!
//! Each pool carries its own reward-per-share accumulator, advanced per
//! ledger sequence number at the pool's share of the global reward rate.
//! Stakes snapshot the accumulator whenever they are touched.

use common::{fixed_point, CommonError};
use soroban_sdk::{contracttype, Address, Env, I256};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    /// Token staked in this pool. Never changes once the pool exists.
    pub token: Address,
    pub total_deposited: i128,
    pub reward_weight: i128,
    /// Share of claimed rewards sent to the escrow, as a fraction of 1e18.
    pub escrow_percentage: i128,
    /// Share of the principal kept on `exit`, as a fraction of 1e18.
    pub exit_fee_percentage: i128,
    /// Reward per deposited unit, 1e18 scale. Unbounded by token supply, so
    /// kept in 256 bits.
    pub accumulated_reward_weight: I256,
    pub last_updated_block: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stake {
    pub total_deposited: i128,
    pub last_accumulated_weight: I256,
    pub total_unclaimed: i128,
}

/// Global reward parameters every pool rate is derived from.
#[derive(Clone, Copy, Debug)]
pub struct RewardContext {
    pub reward_rate: i128,
    pub total_reward_weight: i128,
}

impl RewardContext {
    /// Reward emitted per block to a pool with `reward_weight`.
    pub fn pool_rate(&self, env: &Env, reward_weight: i128) -> Result<i128, CommonError> {
        fixed_point::split_by_weight(
            env,
            self.reward_rate,
            reward_weight,
            self.total_reward_weight,
        )
    }
}

impl Pool {
    pub fn new(env: &Env, token: Address, block: u32) -> Self {
        Pool {
            token,
            total_deposited: 0,
            reward_weight: 0,
            escrow_percentage: 0,
            exit_fee_percentage: 0,
            accumulated_reward_weight: fixed_point::zero(env),
            last_updated_block: block,
        }
    }

    /// Accumulator value at `block`, without mutating the pool.
    pub fn accumulated_at(
        &self,
        env: &Env,
        ctx: &RewardContext,
        block: u32,
    ) -> Result<I256, CommonError> {
        let elapsed = block.saturating_sub(self.last_updated_block);
        let rate = ctx.pool_rate(env, self.reward_weight)?;
        let delta =
            fixed_point::reward_per_share_delta(env, elapsed.into(), rate, self.total_deposited);
        Ok(self.accumulated_reward_weight.add(&delta))
    }

    /// Bring the accumulator up to `block`.
    pub fn update(&mut self, env: &Env, ctx: &RewardContext, block: u32) -> Result<(), CommonError> {
        self.accumulated_reward_weight = self.accumulated_at(env, ctx, block)?;
        self.last_updated_block = block;
        Ok(())
    }
}

impl Stake {
    /// An account with nothing deposited in the pool.
    pub fn new(env: &Env) -> Self {
        Stake {
            total_deposited: 0,
            last_accumulated_weight: fixed_point::zero(env),
            total_unclaimed: 0,
        }
    }

    /// Credit what the deposit earned since the last snapshot.
    pub fn update(&mut self, env: &Env, accumulated: &I256) -> Result<(), CommonError> {
        self.total_unclaimed = self.unclaimed_at(env, accumulated)?;
        self.last_accumulated_weight = accumulated.clone();
        Ok(())
    }

    pub fn unclaimed_at(&self, env: &Env, accumulated: &I256) -> Result<i128, CommonError> {
        fixed_point::earned(
            env,
            self.total_deposited,
            accumulated,
            &self.last_accumulated_weight,
            self.total_unclaimed,
        )
    }
}
