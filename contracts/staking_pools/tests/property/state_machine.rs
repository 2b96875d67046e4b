//! Random action sequences against a single pool.
//!
//! Invariants checked after every step:
//! - the sum of stake deposits equals the pool total and the tokens held
//! - rewards paid plus rewards owed never exceed what the pool emitted
//! - emergency exit always succeeds

use common::ONE;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{vec, Address, Env};
use staking_pools::{StakingPoolsContract, StakingPoolsContractClient};

const USERS: usize = 3;
const BALANCE: i128 = 10_000_000;
const REWARD_SUPPLY: i128 = i128::MAX / 4;

#[derive(Debug, Clone, Arbitrary)]
enum Action {
    Deposit {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "prop_oneof![1i128..100, 1i128..100_000]")]
        amount: i128,
    },
    Withdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "1i128..100_000")]
        amount: i128,
    },
    Claim {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    Exit {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    EmergencyExit {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    Mine {
        #[proptest(strategy = "1u32..50")]
        blocks: u32,
    },
}

struct Harness {
    env: Env,
    pools: StakingPoolsContractClient<'static>,
    stake_token: TokenClient<'static>,
    reward: TokenClient<'static>,
    users: std::vec::Vec<Address>,
}

fn setup(rate: i128) -> Harness {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let governance = Address::generate(&env);
    let source = Address::generate(&env);

    let pools = StakingPoolsContractClient::new(&env, &env.register(StakingPoolsContract, ()));
    pools.initialize(
        &reward_token,
        &source,
        &Address::generate(&env),
        // Escrow stays unused: every pool keeps a zero escrow percentage.
        &Address::generate(&env),
        &governance,
    );
    pools.create_pool(&governance, &stake_token);
    pools.set_reward_weights(&governance, &vec![&env, 1i128]);
    pools.set_reward_rate(&governance, &rate);

    StellarAssetClient::new(&env, &reward_token).mint(&source, &REWARD_SUPPLY);
    let reward = TokenClient::new(&env, &reward_token);
    reward.approve(&source, &pools.address, &REWARD_SUPPLY, &50_000);

    let users = (0..USERS)
        .map(|_| {
            let user = Address::generate(&env);
            StellarAssetClient::new(&env, &stake_token).mint(&user, &BALANCE);
            user
        })
        .collect();

    Harness {
        stake_token: TokenClient::new(&env, &stake_token),
        env,
        pools,
        reward,
        users,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_bookkeeping_stays_consistent(
        rate in prop_oneof![0i128..10_000, ONE / 1_000..1_000 * ONE],
        actions in prop::collection::vec(any::<Action>(), 1..40),
    ) {
        let h = setup(rate);
        let mut deposits = [0i128; USERS];
        let mut mined: i128 = 0;

        for action in actions {
            match action {
                Action::Deposit { user, amount } => {
                    h.pools.deposit(&h.users[user], &0, &amount);
                    deposits[user] += amount;
                }
                Action::Withdraw { user, amount } => {
                    let result = h.pools.try_withdraw(&h.users[user], &0, &amount);
                    if amount <= deposits[user] {
                        prop_assert!(result.is_ok());
                        deposits[user] -= amount;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Action::Claim { user } => {
                    h.pools.claim(&h.users[user], &0);
                    prop_assert_eq!(h.pools.get_stake_total_unclaimed(&h.users[user], &0), 0);
                }
                Action::Exit { user } => {
                    h.pools.exit(&h.users[user], &0);
                    deposits[user] = 0;
                }
                Action::EmergencyExit { user } => {
                    let result = h.pools.try_emergency_exit(&h.users[user], &0);
                    prop_assert!(matches!(result, Ok(Ok(n)) if n == deposits[user]));
                    deposits[user] = 0;
                }
                Action::Mine { blocks } => {
                    let sequence = h.env.ledger().sequence();
                    h.env.ledger().set_sequence_number(sequence + blocks);
                    mined += i128::from(blocks);
                }
            }

            let mut staked = 0;
            let mut rewarded = 0;
            for (i, user) in h.users.iter().enumerate() {
                let deposited = h.pools.get_stake_total_deposited(user, &0);
                prop_assert_eq!(deposited, deposits[i]);
                staked += deposited;
                rewarded += h.reward.balance(user) + h.pools.get_stake_total_unclaimed(user, &0);
            }
            prop_assert_eq!(h.pools.get_pool_total_deposited(&0), staked);
            prop_assert_eq!(h.stake_token.balance(&h.pools.address), staked);
            prop_assert!(rewarded <= rate * mined);
        }
    }
}
