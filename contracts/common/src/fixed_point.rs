//! Reward-per-share accrual math on a 1e18 fixed-point scale.
//!
//! Reward-per-share accumulators are 256-bit host integers (`I256`). Token
//! amounts stay `i128`; their products are computed natively when they fit
//! and fall back to `I256` otherwise. Division always truncates, so rounding
//! never pays out more than was emitted.

use soroban_sdk::{Env, I256};

use crate::CommonError;

/// 1.0 in fixed-point representation (also 100 % for percentages).
pub const ONE: i128 = 1_000_000_000_000_000_000;

/// `a * b / denominator` with a 256-bit intermediate product.
///
/// A zero `denominator` is rejected with `InvalidInput`; callers that treat
/// an empty denominator as "nothing to distribute" check for it first.
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> Result<i128, CommonError> {
    if denominator == 0 {
        return Err(CommonError::InvalidInput);
    }
    if a == 0 || b == 0 {
        return Ok(0);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denominator);
    }

    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, denominator))
        .to_i128()
        .ok_or(CommonError::ArithmeticOverflow)
}

/// Zero accumulator, the starting value of every pool and snapshot.
pub fn zero(env: &Env) -> I256 {
    I256::from_i128(env, 0)
}

/// Increase of the accumulated reward-per-share after `elapsed` units at
/// `rate` tokens per unit, shared across `total_deposited`.
///
/// Computed and returned in 256 bits: a dust deposit against an 18-decimal
/// rate grows the accumulator far past `i128::MAX`. An empty pool yields a
/// zero delta instead of dividing by zero.
pub fn reward_per_share_delta(env: &Env, elapsed: u64, rate: i128, total_deposited: i128) -> I256 {
    if elapsed == 0 || rate <= 0 || total_deposited <= 0 {
        return zero(env);
    }
    I256::from_i128(env, rate)
        .mul(&I256::from_i128(env, i128::from(elapsed)))
        .mul(&I256::from_i128(env, ONE))
        .div(&I256::from_i128(env, total_deposited))
}

/// Settle an account: previously unclaimed rewards plus what `deposited`
/// earned while the accumulator moved from `snapshot` to `accumulator`.
///
/// Only the settled amount must fit in an `i128`; it is bounded by what the
/// pool emitted.
pub fn earned(
    env: &Env,
    deposited: i128,
    accumulator: &I256,
    snapshot: &I256,
    unclaimed: i128,
) -> Result<i128, CommonError> {
    if deposited <= 0 {
        return Ok(unclaimed);
    }
    let owed = I256::from_i128(env, deposited)
        .mul(&accumulator.sub(snapshot))
        .div(&I256::from_i128(env, ONE))
        .to_i128()
        .ok_or(CommonError::ArithmeticOverflow)?;
    if owed <= 0 {
        return Ok(unclaimed);
    }
    unclaimed
        .checked_add(owed)
        .ok_or(CommonError::ArithmeticOverflow)
}

/// `amount * percentage / 1e18`.
pub fn apply_percentage(env: &Env, amount: i128, percentage: i128) -> Result<i128, CommonError> {
    mul_div(env, amount, percentage, ONE)
}

/// Share of `total_rate` owed to a pool with `weight` out of `total_weight`.
pub fn split_by_weight(
    env: &Env,
    total_rate: i128,
    weight: i128,
    total_weight: i128,
) -> Result<i128, CommonError> {
    if total_weight <= 0 {
        return Ok(0);
    }
    mul_div(env, total_rate, weight, total_weight)
}

/// Percentages are fractions of [`ONE`] and may not exceed 100 %.
pub fn is_valid_percentage(percentage: i128) -> bool {
    (0..=ONE).contains(&percentage)
}
