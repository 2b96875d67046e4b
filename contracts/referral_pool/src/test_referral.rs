extern crate std;

use common::ONE;
use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{assert_almost_eq, jump_to_week, notify, setup, wallet};
use crate::ContractError;

#[test]
fn test_referrer_earns_one_percent_of_paid_reward() {
    let ctx = setup();
    let wallet1 = wallet(&ctx);
    let referrer = Address::generate(&ctx.env);

    notify(&ctx, 72_000);
    ctx.pool.stake_with_referrer(&wallet1, &ONE, &referrer);
    assert_eq!(ctx.pool.get_referrer(&wallet1), Some(referrer.clone()));

    jump_to_week(&ctx, 2);
    assert_almost_eq(ctx.pool.earned(&wallet1), 72_000);

    notify(&ctx, 72_000);
    jump_to_week(&ctx, 3);
    assert_almost_eq(ctx.pool.earned(&wallet1), 144_000);

    let paid = ctx.pool.get_reward(&wallet1);
    assert_almost_eq(paid, 144_000);
    assert_eq!(ctx.reward.balance(&wallet1), paid);

    // The referral share comes on top of the staker's reward.
    assert_eq!(ctx.reward.balance(&referrer), paid / 100);
    assert_almost_eq(ctx.reward.balance(&referrer), 1_440);
}

#[test]
fn test_no_referral_payment_without_referrer() {
    let ctx = setup();
    let wallet1 = wallet(&ctx);

    notify(&ctx, 72_000);
    ctx.pool.stake(&wallet1, &ONE);
    jump_to_week(&ctx, 1);

    let before = ctx.reward.balance(&ctx.pool.address);
    let paid = ctx.pool.get_reward(&wallet1);
    assert_eq!(ctx.reward.balance(&ctx.pool.address), before - paid);
    assert_eq!(ctx.pool.get_referrer(&wallet1), None);
}

#[test]
fn test_self_referral_rejected() {
    let ctx = setup();
    let wallet4 = wallet(&ctx);

    match ctx.pool.try_stake_with_referrer(&wallet4, &ONE, &wallet4) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidReferrer),
        _ => unreachable!("Expected InvalidReferrer error"),
    }
    assert_eq!(ctx.pool.balance_of(&wallet4), 0);
    assert_eq!(ctx.pool.get_referrer(&wallet4), None);
}

#[test]
fn test_first_referrer_is_kept() {
    let ctx = setup();
    let wallet2 = Address::generate(&ctx.env);
    let wallet3 = Address::generate(&ctx.env);
    let wallet4 = wallet(&ctx);

    ctx.pool.stake_with_referrer(&wallet4, &ONE, &wallet2);
    assert_eq!(ctx.pool.get_referrer(&wallet4), Some(wallet2.clone()));

    // A later referrer does not replace the first one, but the stake goes through.
    ctx.pool.stake_with_referrer(&wallet4, &ONE, &wallet3);
    assert_eq!(ctx.pool.get_referrer(&wallet4), Some(wallet2));
    assert_eq!(ctx.pool.balance_of(&wallet4), 2 * ONE);

    // Plain stakes leave the referrer untouched too.
    ctx.pool.stake(&wallet4, &ONE);
    assert_eq!(ctx.pool.balance_of(&wallet4), 3 * ONE);
}

#[test]
fn test_referrer_paid_on_exit() {
    let ctx = setup();
    let wallet1 = wallet(&ctx);
    let referrer = wallet(&ctx);

    notify(&ctx, 10_000);
    ctx.pool.stake_with_referrer(&wallet1, &(2 * ONE), &referrer);
    jump_to_week(&ctx, 1);

    let paid = ctx.pool.exit(&wallet1);
    assert_almost_eq(paid, 10_000);
    assert_eq!(ctx.pool.balance_of(&wallet1), 0);
    assert_eq!(ctx.pool.total_supply(), 0);
    assert_eq!(ctx.reward.balance(&referrer), paid / 100);
}
