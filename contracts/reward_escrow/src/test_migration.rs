extern crate std;

use soroban_sdk::{
    contract, contractimpl, symbol_short,
    testutils::{Address as _, Ledger as _},
    token::{self, Client as TokenClient, StellarAssetClient},
    Address, Env, String, Symbol,
};

use crate::{ContractError, RewardEscrowContract, RewardEscrowContractClient};

const LOCKED_TOKEN: Symbol = symbol_short!("TOKEN");
const LAST_DEPOSIT: Symbol = symbol_short!("LAST_DEP");

/// Stand-in for the shares time-lock: pulls the approved tokens and
/// remembers the last deposit it received.
#[contract]
pub struct MockTimeLock;

#[contractimpl]
impl MockTimeLock {
    pub fn init(env: Env, token: Address) {
        env.storage().instance().set(&LOCKED_TOKEN, &token);
    }

    pub fn deposit_by_months(env: Env, from: Address, amount: i128, months: u32, receiver: Address) {
        from.require_auth();
        let token: Address = env.storage().instance().get(&LOCKED_TOKEN).unwrap();
        let this = env.current_contract_address();
        token::Client::new(&env, &token).transfer_from(&this, &from, &this, &amount);
        env.storage()
            .instance()
            .set(&LAST_DEPOSIT, &(amount, months, receiver));
    }

    pub fn last_deposit(env: Env) -> Option<(i128, u32, Address)> {
        env.storage().instance().get(&LAST_DEPOSIT)
    }
}

struct Ctx {
    env: Env,
    escrow: RewardEscrowContractClient<'static>,
    timelock: MockTimeLockClient<'static>,
    owner: Address,
    dough: Address,
    rewards: Address,
}

fn setup() -> Ctx {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000_000);

    let dough = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let escrow = RewardEscrowContractClient::new(&env, &env.register(RewardEscrowContract, ()));
    let timelock = MockTimeLockClient::new(&env, &env.register(MockTimeLock, ()));
    timelock.init(&dough);

    let owner = Address::generate(&env);
    let rewards = Address::generate(&env);
    escrow.initialize(
        &owner,
        &dough,
        &String::from_str(&env, "Escrowed DOUGH"),
        &String::from_str(&env, "eDOUGH"),
    );
    escrow.add_rewards_contract(&owner, &rewards);

    Ctx {
        env,
        escrow,
        timelock,
        owner,
        dough,
        rewards,
    }
}

fn escrow_for(ctx: &Ctx, account: &Address, quantity: i128) {
    StellarAssetClient::new(&ctx.env, &ctx.dough).mint(&ctx.escrow.address, &quantity);
    ctx.escrow
        .append_vesting_entry(&ctx.rewards, account, &quantity);
}

#[test]
fn test_migrate_without_timelock_fails() {
    let ctx = setup();
    let account = Address::generate(&ctx.env);
    escrow_for(&ctx, &account, 1_000);

    match ctx.escrow.try_migrate_to_ve_dough(&account) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TimelockNotSet),
        _ => unreachable!("Expected TimelockNotSet error"),
    }
    assert_eq!(ctx.escrow.balance_of(&account), 1_000);
}

#[test]
fn test_migrate_moves_whole_remaining_balance() {
    let ctx = setup();
    let account = Address::generate(&ctx.env);
    ctx.escrow
        .set_timelock(&ctx.owner, &Some(ctx.timelock.address.clone()));

    escrow_for(&ctx, &account, 1_000);
    ctx.env.ledger().set_timestamp(1_000_000 + 8 * 86_400);
    escrow_for(&ctx, &account, 2_000);
    assert_eq!(ctx.escrow.num_vesting_entries(&account), 2);

    // Nothing has matured, yet everything is migrated.
    assert_eq!(ctx.escrow.migrate_to_ve_dough(&account), 3_000);

    // The time-lock pulled exactly the approved amount.
    let token = TokenClient::new(&ctx.env, &ctx.dough);
    assert_eq!(token.balance(&ctx.timelock.address), 3_000);
    assert_eq!(token.balance(&ctx.escrow.address), 0);
    assert_eq!(token.allowance(&ctx.escrow.address, &ctx.timelock.address), 0);
    assert_eq!(
        ctx.timelock.last_deposit(),
        Some((3_000, 36, account.clone()))
    );

    assert_eq!(ctx.escrow.balance_of(&account), 0);
    assert_eq!(ctx.escrow.total_vested_account_balance(&account), 3_000);
    assert_eq!(ctx.escrow.total_escrowed_balance(), 0);
    assert_eq!(ctx.escrow.get_next_vesting_index(&account), 2);
}

#[test]
fn test_rewards_after_migration_start_a_new_entry() {
    let ctx = setup();
    let account = Address::generate(&ctx.env);
    ctx.escrow
        .set_timelock(&ctx.owner, &Some(ctx.timelock.address.clone()));

    escrow_for(&ctx, &account, 500);
    ctx.escrow.migrate_to_ve_dough(&account);

    // Still inside the merge window of the migrated entry.
    ctx.env.ledger().set_timestamp(1_000_000 + 60);
    escrow_for(&ctx, &account, 70);

    assert_eq!(ctx.escrow.num_vesting_entries(&account), 2);
    assert_eq!(ctx.escrow.get_vesting_quantity(&account, &0), 500);
    assert_eq!(ctx.escrow.get_next_vesting_quantity(&account), 70);
    assert_eq!(ctx.escrow.balance_of(&account), 70);
}

#[test]
fn test_migrate_with_nothing_escrowed_is_noop() {
    let ctx = setup();
    let account = Address::generate(&ctx.env);
    ctx.escrow
        .set_timelock(&ctx.owner, &Some(ctx.timelock.address.clone()));

    assert_eq!(ctx.escrow.migrate_to_ve_dough(&account), 0);
    assert_eq!(ctx.timelock.last_deposit(), None);
}
