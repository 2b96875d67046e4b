#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{vec, Address, Env};
use staking_pools::{StakingPoolsContract, StakingPoolsContractClient};

const USERS: usize = 4;
const POOLS: u32 = 2;
const MAX_MINED: u32 = 3_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, pool: u8, amount: u32 },
    Withdraw { user: u8, pool: u8, amount: u32 },
    Claim { user: u8, pool: u8 },
    Exit { user: u8, pool: u8 },
    EmergencyExit { user: u8, pool: u8 },
    SetRewardRate { rate: u16, whole_tokens: bool },
    SetRewardWeights { first: u8, second: u8 },
    SetExitFee { pool: u8, percentage: u8 },
    Mine { blocks: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let governance = Address::generate(&env);
    let source = Address::generate(&env);
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let client = StakingPoolsContractClient::new(&env, &env.register(StakingPoolsContract, ()));
    // Escrow percentages stay at zero, so the escrow address is never called.
    client.initialize(
        &reward_token,
        &source,
        &Address::generate(&env),
        &Address::generate(&env),
        &governance,
    );

    let supply = i128::MAX / 4;
    StellarAssetClient::new(&env, &reward_token).mint(&source, &supply);
    TokenClient::new(&env, &reward_token).approve(&source, &client.address, &supply, &50_000);

    let mut stake_tokens = std::vec::Vec::new();
    for _ in 0..POOLS {
        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        client.create_pool(&governance, &token);
        stake_tokens.push(token);
    }

    let users: std::vec::Vec<Address> = (0..USERS)
        .map(|_| {
            let user = Address::generate(&env);
            for token in &stake_tokens {
                StellarAssetClient::new(&env, token).mint(&user, &i128::from(u32::MAX));
            }
            user
        })
        .collect();

    let mut mined = 0u32;
    for action in actions {
        match action {
            FuzzAction::Deposit { user, pool, amount } => {
                let _ = client.try_deposit(
                    &users[user as usize % USERS],
                    &(u32::from(pool) % POOLS),
                    &i128::from(amount),
                );
            }
            FuzzAction::Withdraw { user, pool, amount } => {
                let _ = client.try_withdraw(
                    &users[user as usize % USERS],
                    &(u32::from(pool) % POOLS),
                    &i128::from(amount),
                );
            }
            FuzzAction::Claim { user, pool } => {
                let _ = client.try_claim(&users[user as usize % USERS], &(u32::from(pool) % POOLS));
            }
            FuzzAction::Exit { user, pool } => {
                let _ = client.try_exit(&users[user as usize % USERS], &(u32::from(pool) % POOLS));
            }
            FuzzAction::EmergencyExit { user, pool } => {
                let account = &users[user as usize % USERS];
                let pool_id = u32::from(pool) % POOLS;
                let deposited = client.get_stake_total_deposited(account, &pool_id);
                // Principal must always come back, however far accrual has run.
                let returned = client.try_emergency_exit(account, &pool_id);
                assert!(matches!(returned, Ok(Ok(n)) if n == deposited));
            }
            FuzzAction::SetRewardRate { rate, whole_tokens } => {
                // 18-decimal rates against dust deposits stress the accumulator.
                let rate = if whole_tokens {
                    i128::from(rate) * common::ONE
                } else {
                    i128::from(rate)
                };
                let _ = client.try_set_reward_rate(&governance, &rate);
            }
            FuzzAction::SetRewardWeights { first, second } => {
                let _ = client.try_set_reward_weights(
                    &governance,
                    &vec![&env, i128::from(first), i128::from(second)],
                );
            }
            FuzzAction::SetExitFee { pool, percentage } => {
                // Only the targeted pool gets a fee; 0..=255 % covers rejected values.
                let mut fees = vec![&env, 0i128, 0i128];
                let pct = i128::from(percentage) * common::ONE / 100;
                fees.set(u32::from(pool) % POOLS, pct);
                let _ = client.try_set_exit_fee_percentages(&governance, &fees);
            }
            FuzzAction::Mine { blocks } => {
                if mined < MAX_MINED {
                    let sequence = env.ledger().sequence();
                    env.ledger().set_sequence_number(sequence + u32::from(blocks));
                    mined += u32::from(blocks);
                }
            }
        }

        for pool_id in 0..POOLS {
            let staked: i128 = users
                .iter()
                .map(|user| client.get_stake_total_deposited(user, &pool_id))
                .sum();
            assert_eq!(client.get_pool_total_deposited(&pool_id), staked);
            assert_eq!(
                TokenClient::new(&env, &stake_tokens[pool_id as usize]).balance(&client.address),
                staked
            );
        }
    }
});
