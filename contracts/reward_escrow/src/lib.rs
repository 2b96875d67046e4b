#![no_std]

pub mod events;
pub mod schedule;
pub mod timelock;

use common::{governance, ttl, CommonError};
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, String, Symbol, Vec,
};

pub use schedule::{VestingEntry, MAX_VESTING_ENTRIES, MERGE_WINDOW, VESTING_PERIOD};
use timelock::{SharesTimeLockClient, MIGRATION_LOCK_MONTHS};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const DOUGH: Symbol = symbol_short!("DOUGH");
const TIMELOCK: Symbol = symbol_short!("TIMELOCK");
const NAME: Symbol = symbol_short!("NAME");
const SYMBOL: Symbol = symbol_short!("SYMBOL");
const TOTAL_ESCROWED: Symbol = symbol_short!("TOT_ESC");

// Per-account persistent storage uses tuple keys:  (prefix, address)
const SCHEDULE: Symbol = symbol_short!("SCHED");
const NEXT_INDEX: Symbol = symbol_short!("NXT_IDX");
const ACCOUNT_ESCROWED: Symbol = symbol_short!("ACC_ESC");
const ACCOUNT_VESTED: Symbol = symbol_short!("ACC_VEST");
const REWARDS_CONTRACT: Symbol = symbol_short!("RWD_CTR");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NotPendingOwner = 5,
    NoPendingOwner = 6,
    ArithmeticOverflow = 7,
    NotRewardContract = 100,
    ZeroQuantity = 101,
    InsufficientEscrowBalance = 102,
    ScheduleTooLong = 103,
    EntryNotFound = 104,
    TimelockNotSet = 105,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::NotPendingGovernance => ContractError::NotPendingOwner,
            CommonError::NoPendingGovernance => ContractError::NoPendingOwner,
            CommonError::InvalidInput => ContractError::InvalidInput,
            CommonError::ArithmeticOverflow => ContractError::ArithmeticOverflow,
        }
    }
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Time-locks reward tokens for one year on behalf of beneficiaries.
///
/// Reward contracts transfer tokens in and call `append_vesting_entry`;
/// beneficiaries later pull matured entries with `vest`.
#[contract]
pub struct RewardEscrowContract;

#[contractimpl]
impl RewardEscrowContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the escrow.
    ///
    /// * `owner` – manages the reward-contract allow-list and settings.
    /// * `dough` – token held in escrow and paid out on vesting.
    /// * `name` / `symbol` – display metadata of the escrowed balance.
    pub fn initialize(
        env: Env,
        owner: Address,
        dough: Address,
        name: String,
        symbol: String,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&DOUGH, &dough);
        env.storage().instance().set(&NAME, &name);
        env.storage().instance().set(&SYMBOL, &symbol);
        governance::init(&env, &owner);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, owner, dough);

        Ok(())
    }

    // ── Reward-contract allow-list ───────────────────────────────────────────

    pub fn add_rewards_contract(
        env: Env,
        caller: Address,
        rewards_contract: Address,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;

        let key = (REWARDS_CONTRACT, rewards_contract.clone());
        env.storage().persistent().set(&key, &true);
        ttl::extend_persistent(&env, &key);

        events::publish_rewards_contract_added(&env, rewards_contract);
        Ok(())
    }

    pub fn remove_rewards_contract(
        env: Env,
        caller: Address,
        rewards_contract: Address,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;

        env.storage()
            .persistent()
            .remove(&(REWARDS_CONTRACT, rewards_contract.clone()));

        events::publish_rewards_contract_removed(&env, rewards_contract);
        Ok(())
    }

    pub fn is_reward_contract(env: Env, rewards_contract: Address) -> bool {
        env.storage()
            .persistent()
            .get(&(REWARDS_CONTRACT, rewards_contract))
            .unwrap_or(false)
    }

    // ── Vesting schedule writes ──────────────────────────────────────────────

    /// Escrow `quantity` for `account`.
    ///
    /// The tokens must already sit in the escrow: the call fails unless the
    /// escrow's balance covers every outstanding entry plus this one.
    pub fn append_vesting_entry(
        env: Env,
        caller: Address,
        account: Address,
        quantity: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        if !Self::is_reward_contract(env.clone(), caller) {
            return Err(ContractError::NotRewardContract);
        }
        if quantity == 0 {
            return Err(ContractError::ZeroQuantity);
        }
        if quantity < 0 {
            return Err(ContractError::InvalidInput);
        }

        // 1. The escrow must be able to honour every outstanding entry.
        let new_total_escrowed = Self::total_escrowed_balance(env.clone())
            .checked_add(quantity)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let held = token::Client::new(&env, &Self::load_dough(&env)?)
            .balance(&env.current_contract_address());
        if new_total_escrowed > held {
            return Err(ContractError::InsufficientEscrowBalance);
        }

        // 2. Append or merge into the account's schedule.
        let now = env.ledger().timestamp();
        let cursor = Self::get_next_vesting_index(env.clone(), account.clone());
        let mut schedule = Self::load_schedule(&env, &account);
        let index = schedule::append_or_merge(&mut schedule, cursor, now, quantity)?;
        let end_time = schedule.get(index).map(|e| e.end_time).unwrap_or_default();
        Self::store_schedule(&env, &account, &schedule);

        // 3. Totals.
        let escrowed = Self::total_escrowed_account_balance(env.clone(), account.clone())
            .checked_add(quantity)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::write_balance(&env, ACCOUNT_ESCROWED, &account, escrowed);
        env.storage()
            .instance()
            .set(&TOTAL_ESCROWED, &new_total_escrowed);
        ttl::extend_instance(&env);

        events::publish_vesting_entry_created(&env, account, index, end_time, quantity);

        Ok(())
    }

    // ── Vesting ─────────────────────────────────────────────────────────────

    /// Pay out every matured entry of `account`. Returns the vested amount.
    ///
    /// Succeeds without effect when nothing has matured.
    pub fn vest(env: Env, account: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();

        let cursor = Self::get_next_vesting_index(env.clone(), account.clone());
        let schedule = Self::load_schedule(&env, &account);
        let (total, next) =
            schedule::collect_matured(&schedule, cursor, env.ledger().timestamp())?;

        if total <= 0 {
            log!(&env, "vest: nothing matured", account);
            return Ok(0);
        }

        // Effects before the transfer.
        Self::release(&env, &account, total, next)?;

        token::Client::new(&env, &Self::load_dough(&env)?).transfer(
            &env.current_contract_address(),
            &account,
            &total,
        );

        events::publish_vested(&env, account, total);

        Ok(total)
    }

    /// Move the whole remaining escrow of `account`, matured or not, into the
    /// shares time-lock. Returns the migrated amount.
    pub fn migrate_to_ve_dough(env: Env, account: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        account.require_auth();

        let timelock: Address = env
            .storage()
            .instance()
            .get(&TIMELOCK)
            .ok_or(ContractError::TimelockNotSet)?;

        let cursor = Self::get_next_vesting_index(env.clone(), account.clone());
        let schedule = Self::load_schedule(&env, &account);
        let total = schedule::collect_remaining(&schedule, cursor)?;

        if total <= 0 {
            log!(&env, "migrate: nothing escrowed", account);
            return Ok(0);
        }

        Self::release(&env, &account, total, schedule.len())?;

        // The allowance only lives for this ledger; the time-lock pulls it now.
        let this = env.current_contract_address();
        token::Client::new(&env, &Self::load_dough(&env)?).approve(
            &this,
            &timelock,
            &total,
            &env.ledger().sequence(),
        );
        SharesTimeLockClient::new(&env, &timelock).deposit_by_months(
            &this,
            &total,
            &MIGRATION_LOCK_MONTHS,
            &account,
        );

        events::publish_migrated(&env, account, total);

        Ok(total)
    }

    // ── Owner settings ──────────────────────────────────────────────────────

    pub fn set_dough(env: Env, caller: Address, dough: Address) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;
        env.storage().instance().set(&DOUGH, &dough);
        events::publish_dough_updated(&env, dough);
        Ok(())
    }

    /// Set or clear (`None`) the shares time-lock used by migrations.
    pub fn set_timelock(
        env: Env,
        caller: Address,
        timelock: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;
        match &timelock {
            Some(addr) => env.storage().instance().set(&TIMELOCK, addr),
            None => env.storage().instance().remove(&TIMELOCK),
        }
        events::publish_timelock_updated(&env, timelock);
        Ok(())
    }

    /// Nominate a new owner. The nominee completes the transfer with
    /// `accept_ownership`.
    pub fn set_pending_owner(
        env: Env,
        caller: Address,
        pending: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        governance::set_pending(&env, &caller, &pending)?;
        events::publish_ownership_proposed(&env, caller, pending);
        Ok(())
    }

    pub fn accept_ownership(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let previous = governance::accept(&env, &caller)?;
        events::publish_ownership_accepted(&env, previous, caller);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(governance::governance(&env)?)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        governance::pending_governance(&env)
    }

    pub fn dough(env: Env) -> Result<Address, ContractError> {
        Self::load_dough(&env)
    }

    pub fn timelock(env: Env) -> Option<Address> {
        env.storage().instance().get(&TIMELOCK)
    }

    pub fn name(env: Env) -> Result<String, ContractError> {
        env.storage()
            .instance()
            .get(&NAME)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, ContractError> {
        env.storage()
            .instance()
            .get(&SYMBOL)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn num_vesting_entries(env: Env, account: Address) -> u32 {
        Self::load_schedule(&env, &account).len()
    }

    pub fn get_vesting_schedule_entry(
        env: Env,
        account: Address,
        index: u32,
    ) -> Result<VestingEntry, ContractError> {
        Self::load_schedule(&env, &account)
            .get(index)
            .ok_or(ContractError::EntryNotFound)
    }

    pub fn get_vesting_time(env: Env, account: Address, index: u32) -> Result<u64, ContractError> {
        Ok(Self::get_vesting_schedule_entry(env, account, index)?.end_time)
    }

    pub fn get_vesting_quantity(
        env: Env,
        account: Address,
        index: u32,
    ) -> Result<i128, ContractError> {
        Ok(Self::get_vesting_schedule_entry(env, account, index)?.quantity)
    }

    /// Index of the first entry that has not been paid out. Equals
    /// `num_vesting_entries` once everything is vested.
    pub fn get_next_vesting_index(env: Env, account: Address) -> u32 {
        env.storage()
            .persistent()
            .get(&(NEXT_INDEX, account))
            .unwrap_or(0)
    }

    /// The next entry to vest, or a zeroed entry when nothing is left.
    pub fn get_next_vesting_entry(env: Env, account: Address) -> VestingEntry {
        let index = Self::get_next_vesting_index(env.clone(), account.clone());
        Self::load_schedule(&env, &account)
            .get(index)
            .unwrap_or_default()
    }

    pub fn get_next_vesting_time(env: Env, account: Address) -> u64 {
        Self::get_next_vesting_entry(env, account).end_time
    }

    pub fn get_next_vesting_quantity(env: Env, account: Address) -> i128 {
        Self::get_next_vesting_entry(env, account).quantity
    }

    /// The full schedule of `account`, including entries already vested.
    pub fn check_account_schedule(env: Env, account: Address) -> Vec<VestingEntry> {
        Self::load_schedule(&env, &account)
    }

    /// Escrowed balance of `account` that has not been vested yet.
    pub fn balance_of(env: Env, account: Address) -> i128 {
        Self::total_escrowed_account_balance(env, account)
    }

    pub fn total_escrowed_account_balance(env: Env, account: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&(ACCOUNT_ESCROWED, account))
            .unwrap_or(0)
    }

    pub fn total_vested_account_balance(env: Env, account: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&(ACCOUNT_VESTED, account))
            .unwrap_or(0)
    }

    pub fn total_escrowed_balance(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_ESCROWED).unwrap_or(0)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: authenticate `caller` and check it is the owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        governance::require_governance(env, caller)?;
        Ok(())
    }

    fn load_dough(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&DOUGH)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_schedule(env: &Env, account: &Address) -> Vec<VestingEntry> {
        env.storage()
            .persistent()
            .get(&(SCHEDULE, account.clone()))
            .unwrap_or(Vec::new(env))
    }

    fn store_schedule(env: &Env, account: &Address, schedule: &Vec<VestingEntry>) {
        let key = (SCHEDULE, account.clone());
        env.storage().persistent().set(&key, schedule);
        ttl::extend_persistent(env, &key);
    }

    fn write_balance(env: &Env, prefix: Symbol, account: &Address, value: i128) {
        let key = (prefix, account.clone());
        env.storage().persistent().set(&key, &value);
        ttl::extend_persistent(env, &key);
    }

    /// Book `amount` as paid out to `account` and move its cursor to `next`.
    fn release(env: &Env, account: &Address, amount: i128, next: u32) -> Result<(), ContractError> {
        let escrowed = Self::total_escrowed_account_balance(env.clone(), account.clone())
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let vested = Self::total_vested_account_balance(env.clone(), account.clone())
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let total = Self::total_escrowed_balance(env.clone())
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let index_key = (NEXT_INDEX, account.clone());
        env.storage().persistent().set(&index_key, &next);
        ttl::extend_persistent(env, &index_key);
        Self::write_balance(env, ACCOUNT_ESCROWED, account, escrowed);
        Self::write_balance(env, ACCOUNT_VESTED, account, vested);
        env.storage().instance().set(&TOTAL_ESCROWED, &total);
        ttl::extend_instance(env);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_migration;
