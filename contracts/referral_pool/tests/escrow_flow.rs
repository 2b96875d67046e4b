//! Referral pool paying part of every reward through the reward escrow.

use common::ONE;
use referral_pool::{ReferralPoolContract, ReferralPoolContractClient, DURATION};
use reward_escrow::{RewardEscrowContract, RewardEscrowContractClient, VESTING_PERIOD};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env, String};

const START: u64 = 1_700_000_000;

struct Deployment {
    env: Env,
    pool: ReferralPoolContractClient<'static>,
    escrow: RewardEscrowContractClient<'static>,
    owner: Address,
    distribution: Address,
    stake_token: Address,
    reward: TokenClient<'static>,
}

fn deploy() -> Deployment {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let owner = Address::generate(&env);
    let distribution = Address::generate(&env);

    let escrow = RewardEscrowContractClient::new(&env, &env.register(RewardEscrowContract, ()));
    escrow.initialize(
        &owner,
        &reward_token,
        &String::from_str(&env, "Escrowed DOUGH"),
        &String::from_str(&env, "eDOUGH"),
    );

    let pool = ReferralPoolContractClient::new(&env, &env.register(ReferralPoolContract, ()));
    pool.initialize(&owner, &stake_token, &reward_token, &escrow.address);
    pool.set_reward_distribution(&owner, &distribution);
    escrow.add_rewards_contract(&owner, &pool.address);

    StellarAssetClient::new(&env, &reward_token).mint(&pool.address, &(1_000_000 * ONE));

    Deployment {
        reward: TokenClient::new(&env, &reward_token),
        env,
        pool,
        escrow,
        owner,
        distribution,
        stake_token,
    }
}

fn staker(d: &Deployment, amount: i128) -> Address {
    let user = Address::generate(&d.env);
    StellarAssetClient::new(&d.env, &d.stake_token).mint(&user, &amount);
    d.pool.stake(&user, &amount);
    user
}

#[test]
fn escrowed_share_vests_after_a_year() {
    let d = deploy();
    d.pool.set_escrow_percentage(&d.owner, &(ONE / 2));

    let user = staker(&d, ONE);
    d.pool
        .notify_reward_amount(&d.distribution, &(72_000 * ONE));
    d.env.ledger().set_timestamp(START + DURATION);

    let paid = d.pool.get_reward(&user);
    let escrowed = paid / 2;
    assert_eq!(d.reward.balance(&user), paid - escrowed);
    assert_eq!(d.escrow.balance_of(&user), escrowed);
    assert_eq!(d.escrow.total_escrowed_balance(), escrowed);
    assert_eq!(d.reward.balance(&d.escrow.address), escrowed);
    assert_eq!(d.escrow.num_vesting_entries(&user), 1);
    assert_eq!(
        d.escrow.get_vesting_time(&user, &0),
        START + DURATION + VESTING_PERIOD
    );

    // Still locked one second before maturity.
    d.env
        .ledger()
        .set_timestamp(START + DURATION + VESTING_PERIOD - 1);
    assert_eq!(d.escrow.vest(&user), 0);

    d.env
        .ledger()
        .set_timestamp(START + DURATION + VESTING_PERIOD);
    assert_eq!(d.escrow.vest(&user), escrowed);
    assert_eq!(d.reward.balance(&user), paid);
    assert_eq!(d.escrow.balance_of(&user), 0);
}

#[test]
fn full_escrow_pays_nothing_directly() {
    let d = deploy();
    d.pool.set_escrow_percentage(&d.owner, &ONE);

    let user = staker(&d, 2 * ONE);
    d.pool
        .notify_reward_amount(&d.distribution, &(10_000 * ONE));
    d.env.ledger().set_timestamp(START + DURATION);

    let paid = d.pool.exit(&user);
    assert!(paid > 9_998 * ONE);
    assert_eq!(d.reward.balance(&user), 0);
    assert_eq!(d.escrow.balance_of(&user), paid);
    assert_eq!(
        TokenClient::new(&d.env, &d.stake_token).balance(&user),
        2 * ONE
    );
}

#[test]
fn referral_share_is_not_escrowed() {
    let d = deploy();
    d.pool.set_escrow_percentage(&d.owner, &(ONE / 2));

    let referrer = Address::generate(&d.env);
    let user = Address::generate(&d.env);
    StellarAssetClient::new(&d.env, &d.stake_token).mint(&user, &ONE);
    d.pool.stake_with_referrer(&user, &ONE, &referrer);

    d.pool
        .notify_reward_amount(&d.distribution, &(72_000 * ONE));
    d.env.ledger().set_timestamp(START + DURATION);

    let paid = d.pool.get_reward(&user);
    assert_eq!(d.reward.balance(&referrer), paid / 100);
    assert_eq!(d.escrow.balance_of(&referrer), 0);
    assert_eq!(d.escrow.balance_of(&user), paid / 2);
}
