//! Reward accrual properties of a single pool.

use common::ONE;
use proptest::prelude::*;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::StellarAssetClient;
use soroban_sdk::{vec, Address, Env};
use staking_pools::{StakingPoolsContract, StakingPoolsContractClient};

fn setup(rate: i128) -> (Env, StakingPoolsContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let governance = Address::generate(&env);

    let pools = StakingPoolsContractClient::new(&env, &env.register(StakingPoolsContract, ()));
    pools.initialize(
        &Address::generate(&env),
        &Address::generate(&env),
        &Address::generate(&env),
        &Address::generate(&env),
        &governance,
    );
    pools.create_pool(&governance, &stake_token);
    pools.set_reward_weights(&governance, &vec![&env, 1i128]);
    pools.set_reward_rate(&governance, &rate);

    (env, pools, stake_token)
}

fn depositor(env: &Env, token: &Address, amount: i128) -> Address {
    let user = Address::generate(env);
    StellarAssetClient::new(env, token).mint(&user, &amount);
    user
}

fn mine(env: &Env, blocks: u32) {
    let sequence = env.ledger().sequence();
    env.ledger().set_sequence_number(sequence + blocks);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A pool with a zero reward rate never owes anything.
    #[test]
    fn prop_zero_rate_never_accrues(
        amounts in prop::collection::vec(1i128..1_000_000_000, 1..5),
        blocks in 1u32..2_000,
    ) {
        let (env, pools, token) = setup(0);
        let users: std::vec::Vec<Address> = amounts
            .iter()
            .map(|amount| {
                let user = depositor(&env, &token, *amount);
                pools.deposit(&user, &0, amount);
                user
            })
            .collect();

        mine(&env, blocks);

        for user in users.iter() {
            prop_assert_eq!(pools.get_stake_total_unclaimed(user, &0), 0);
        }
    }

    /// A lone depositor receives the full emission, whatever its size.
    #[test]
    fn prop_single_depositor_earns_everything(
        rate in prop_oneof![1i128..1_000_000, ONE / 1_000..1_000 * ONE],
        amount in 1i128..1_000_000_000,
        blocks in 1u32..2_000,
    ) {
        let (env, pools, token) = setup(rate);
        let user = depositor(&env, &token, amount);
        pools.deposit(&user, &0, &amount);

        mine(&env, blocks);

        let emitted = rate * i128::from(blocks);
        let owed = pools.get_stake_total_unclaimed(&user, &0);
        prop_assert!(owed <= emitted);
        // Truncation loses less than one token unit per share.
        prop_assert!(emitted - owed <= 1);
    }

    /// Stakes of 1 and 3 units share the emission 1:3.
    #[test]
    fn prop_rewards_split_pro_rata(
        rate in 1i128..1_000_000,
        unit in 1i128..1_000_000,
        blocks in 1u32..2_000,
    ) {
        let (env, pools, token) = setup(rate);
        let small = depositor(&env, &token, unit);
        let large = depositor(&env, &token, 3 * unit);
        pools.deposit(&small, &0, &unit);
        pools.deposit(&large, &0, &(3 * unit));

        mine(&env, blocks);

        let a = pools.get_stake_total_unclaimed(&small, &0);
        let b = pools.get_stake_total_unclaimed(&large, &0);
        prop_assert!(b >= 3 * a);
        prop_assert!(b - 3 * a <= 2);
    }

    /// Dust stakes under 18-decimal rates never lock the pool: later
    /// depositors get in and everybody can leave with their principal.
    #[test]
    fn prop_dust_stake_never_blocks_exit(
        rate in ONE / 1_000..1_000 * ONE,
        dust in 1i128..1_000,
        amount in 1i128..1_000_000 * ONE,
        blocks in 1u32..2_000,
    ) {
        let (env, pools, token) = setup(rate);
        let small = depositor(&env, &token, dust);
        let large = depositor(&env, &token, amount);
        pools.deposit(&small, &0, &dust);

        mine(&env, blocks);

        prop_assert!(pools.try_deposit(&large, &0, &amount).is_ok());
        let emitted = rate * i128::from(blocks);
        let owed = pools.get_stake_total_unclaimed(&small, &0);
        prop_assert!(owed <= emitted);
        prop_assert!(emitted - owed <= 1);

        mine(&env, blocks);

        let returned = pools.try_emergency_exit(&small, &0);
        prop_assert!(matches!(returned, Ok(Ok(n)) if n == dust));
        let returned = pools.try_emergency_exit(&large, &0);
        prop_assert!(matches!(returned, Ok(Ok(n)) if n == amount));
        prop_assert_eq!(pools.get_pool_total_deposited(&0), 0);
    }
}
