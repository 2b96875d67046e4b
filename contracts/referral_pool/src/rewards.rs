//! Reward period accounting.
//!
//! A notified amount is released linearly over [`DURATION`] seconds. Any
//! amount still undistributed when a new notification arrives is rolled into
//! the new period.

use common::{fixed_point, CommonError};
use soroban_sdk::{contracttype, Env, I256};

/// Length of a reward period: one week.
pub const DURATION: u64 = 7 * 24 * 60 * 60;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardState {
    /// Tokens released per second in the current period.
    pub reward_rate: i128,
    pub period_finish: u64,
    pub last_update_time: u64,
    /// 1e18 scale. Grows without bound when the supply is tiny.
    pub reward_per_token_stored: I256,
}

impl RewardState {
    /// No period running yet.
    pub fn new(env: &Env) -> Self {
        RewardState {
            reward_rate: 0,
            period_finish: 0,
            last_update_time: 0,
            reward_per_token_stored: fixed_point::zero(env),
        }
    }

    /// Rewards stop accruing once the period has finished.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    pub fn reward_per_token(&self, env: &Env, now: u64, total_supply: i128) -> I256 {
        let elapsed = self
            .last_time_reward_applicable(now)
            .saturating_sub(self.last_update_time);
        let delta =
            fixed_point::reward_per_share_delta(env, elapsed, self.reward_rate, total_supply);
        self.reward_per_token_stored.add(&delta)
    }

    /// Fold everything accrued so far into the stored accumulator.
    pub fn checkpoint(&mut self, env: &Env, now: u64, total_supply: i128) {
        self.reward_per_token_stored = self.reward_per_token(env, now, total_supply);
        self.last_update_time = self.last_time_reward_applicable(now);
    }

    /// Start a new period at `now` distributing `reward` plus whatever the
    /// running period has not released yet.
    ///
    /// Must be called right after [`RewardState::checkpoint`].
    pub fn notify(&mut self, now: u64, reward: i128) -> Result<(), CommonError> {
        let duration = i128::from(DURATION);
        self.reward_rate = if now >= self.period_finish {
            reward / duration
        } else {
            let remaining = i128::from(self.period_finish - now);
            let leftover = remaining
                .checked_mul(self.reward_rate)
                .ok_or(CommonError::ArithmeticOverflow)?;
            reward
                .checked_add(leftover)
                .ok_or(CommonError::ArithmeticOverflow)?
                / duration
        };
        self.last_update_time = now;
        self.period_finish = now.saturating_add(DURATION);
        Ok(())
    }
}
