#![no_main]

use arbitrary::Arbitrary;
use common::ONE;
use libfuzzer_sys::fuzz_target;
use referral_pool::{ReferralPoolContract, ReferralPoolContractClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

const USERS: usize = 4;
const START: u64 = 1_700_000_000;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, amount: u32 },
    StakeWithReferrer { user: u8, referrer: u8, amount: u32 },
    Withdraw { user: u8, amount: u32 },
    GetReward { user: u8 },
    Exit { user: u8 },
    Notify { reward: u32 },
    Wait { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let owner = Address::generate(&env);
    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let client = ReferralPoolContractClient::new(&env, &env.register(ReferralPoolContract, ()));
    client.initialize(&owner, &stake_token, &reward_token, &Address::generate(&env));
    client.set_reward_distribution(&owner, &owner);

    let users: std::vec::Vec<Address> = (0..USERS)
        .map(|_| {
            let user = Address::generate(&env);
            StellarAssetClient::new(&env, &stake_token).mint(&user, &i128::from(u32::MAX));
            user
        })
        .collect();
    let reward = TokenClient::new(&env, &reward_token);

    let mut notified: i128 = 0;
    for action in actions {
        match action {
            FuzzAction::Stake { user, amount } => {
                let _ = client.try_stake(&users[user as usize % USERS], &i128::from(amount));
            }
            FuzzAction::StakeWithReferrer { user, referrer, amount } => {
                let _ = client.try_stake_with_referrer(
                    &users[user as usize % USERS],
                    &i128::from(amount),
                    &users[referrer as usize % USERS],
                );
            }
            FuzzAction::Withdraw { user, amount } => {
                let _ = client.try_withdraw(&users[user as usize % USERS], &i128::from(amount));
            }
            FuzzAction::GetReward { user } => {
                let _ = client.try_get_reward(&users[user as usize % USERS]);
            }
            FuzzAction::Exit { user } => {
                let _ = client.try_exit(&users[user as usize % USERS]);
            }
            FuzzAction::Notify { reward: amount } => {
                // Fund the reward plus the largest possible referral share.
                let amount = i128::from(amount) * ONE;
                StellarAssetClient::new(&env, &reward_token)
                    .mint(&client.address, &(amount + amount / 100));
                if client.try_notify_reward_amount(&owner, &amount).is_ok() {
                    notified += amount;
                }
            }
            FuzzAction::Wait { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(seconds));
            }
        }

        let staked: i128 = users.iter().map(|user| client.balance_of(user)).sum();
        assert_eq!(client.total_supply(), staked);
        assert_eq!(TokenClient::new(&env, &stake_token).balance(&client.address), staked);

        let paid: i128 = users.iter().map(|user| reward.balance(user)).sum();
        assert!(paid <= notified + notified / 100);
    }
});
