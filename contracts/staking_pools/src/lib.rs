#![no_std]

pub mod events;
pub mod pool;

use common::{fixed_point, governance, ttl, CommonError, RewardEscrowClient};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, token, Address, Env, Symbol, Vec,
};

pub use pool::{Pool, RewardContext, Stake};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const REWARD_SOURCE: Symbol = symbol_short!("RWD_SRC");
const EXIT_FEE_RECEIVER: Symbol = symbol_short!("FEE_RCV");
const REWARD_ESCROW: Symbol = symbol_short!("ESCROW");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");
const TOTAL_REWARD_WEIGHT: Symbol = symbol_short!("TOT_WGT");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");

// Persistent storage uses tuple keys:
//   (POOL, pool_id)            -> Pool
//   (POOL_ID, token)           -> u32
//   (STAKE, account, pool_id)  -> Stake
//   (REFERRER, account)        -> Address
const POOL: Symbol = symbol_short!("POOL");
const POOL_ID: Symbol = symbol_short!("POOL_ID");
const STAKE: Symbol = symbol_short!("STAKE");
const REFERRER: Symbol = symbol_short!("REFERRER");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NotPendingGovernance = 5,
    NoPendingGovernance = 6,
    ArithmeticOverflow = 7,
    InsufficientBalance = 8,
    PoolNotFound = 100,
    TokenAlreadyHasPool = 101,
    WeightsLengthMismatch = 102,
    EscrowPercentagesLengthMismatch = 103,
    ExitFeePercentagesLengthMismatch = 104,
    EscrowPercentageTooHigh = 105,
    ExitFeePercentageTooHigh = 106,
    InvalidReferrer = 107,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::NotPendingGovernance => ContractError::NotPendingGovernance,
            CommonError::NoPendingGovernance => ContractError::NoPendingGovernance,
            CommonError::InvalidInput => ContractError::InvalidInput,
            CommonError::ArithmeticOverflow => ContractError::ArithmeticOverflow,
        }
    }
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// One row of `get_pools`: pool parameters plus the account's position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub pool_id: u32,
    pub token: Address,
    pub total_deposited: i128,
    pub reward_weight: i128,
    /// Reward emitted to the pool per ledger.
    pub reward_rate: i128,
    pub escrow_percentage: i128,
    pub exit_fee_percentage: i128,
    pub deposited: i128,
    pub unclaimed: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

/// Multi-pool staking with a weight-split global reward rate.
///
/// Rewards are emitted per ledger. Each pool receives
/// `reward_rate * weight / total_weight` and shares it pro rata between its
/// depositors. Claimed rewards are pulled from `reward_source` through an
/// allowance; the escrowed part goes to the reward escrow.
#[contract]
pub struct StakingPoolsContract;

#[contractimpl]
impl StakingPoolsContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token`      – token paid out as rewards.
    /// * `reward_source`     – account holding rewards; must approve this contract.
    /// * `exit_fee_receiver` – receives the fee taken on `exit`.
    /// * `reward_escrow`     – escrow that vests the escrowed share of claims.
    /// * `governance`        – controls pools and reward parameters.
    pub fn initialize(
        env: Env,
        reward_token: Address,
        reward_source: Address,
        exit_fee_receiver: Address,
        reward_escrow: Address,
        governance: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&REWARD_SOURCE, &reward_source);
        env.storage()
            .instance()
            .set(&EXIT_FEE_RECEIVER, &exit_fee_receiver);
        env.storage().instance().set(&REWARD_ESCROW, &reward_escrow);
        governance::init(&env, &governance);
        // REWARD_RATE, TOTAL_REWARD_WEIGHT and POOL_COUNT start at zero.
        ttl::extend_instance(&env);

        events::publish_initialized(
            &env,
            governance,
            reward_token,
            reward_source,
            exit_fee_receiver,
            reward_escrow,
        );

        Ok(())
    }

    // ── Pool management ─────────────────────────────────────────────────────

    /// Register a pool for `token`. Returns the new pool id.
    ///
    /// Pools start with zero weight and zero fees; ids are sequential.
    pub fn create_pool(env: Env, caller: Address, token: Address) -> Result<u32, ContractError> {
        Self::require_governance(&env, &caller)?;

        let id_key = (POOL_ID, token.clone());
        if env.storage().persistent().has(&id_key) {
            return Err(ContractError::TokenAlreadyHasPool);
        }

        let pool_id = Self::pool_count(env.clone());
        Self::store_pool(&env, pool_id, &Pool::new(&env, token.clone(), env.ledger().sequence()));
        env.storage().persistent().set(&id_key, &pool_id);
        ttl::extend_persistent(&env, &id_key);
        env.storage().instance().set(&POOL_COUNT, &(pool_id + 1));
        ttl::extend_instance(&env);

        events::publish_pool_created(&env, pool_id, token);

        Ok(pool_id)
    }

    /// Replace every pool's reward weight.
    ///
    /// All pools are settled at the old weights first so no depositor gains
    /// or loses rewards retroactively.
    pub fn set_reward_weights(
        env: Env,
        caller: Address,
        weights: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::require_governance(&env, &caller)?;

        let count = Self::pool_count(env.clone());
        if weights.len() != count {
            return Err(ContractError::WeightsLengthMismatch);
        }

        let mut total_weight: i128 = 0;
        for weight in weights.iter() {
            if weight < 0 {
                return Err(ContractError::InvalidInput);
            }
            total_weight = total_weight
                .checked_add(weight)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }

        let ctx = Self::load_context(&env);
        let block = env.ledger().sequence();
        for (pool_id, weight) in weights.iter().enumerate() {
            let pool_id = pool_id as u32;
            let mut pool = Self::load_pool(&env, pool_id)?;
            pool.update(&env, &ctx, block)?;
            if pool.reward_weight != weight {
                pool.reward_weight = weight;
                events::publish_reward_weight_updated(&env, pool_id, weight);
            }
            Self::store_pool(&env, pool_id, &pool);
        }

        env.storage()
            .instance()
            .set(&TOTAL_REWARD_WEIGHT, &total_weight);
        ttl::extend_instance(&env);

        Ok(())
    }

    /// Replace every pool's escrow percentage (fractions of 1e18).
    pub fn set_escrow_percentages(
        env: Env,
        caller: Address,
        percentages: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::require_governance(&env, &caller)?;

        if percentages.len() != Self::pool_count(env.clone()) {
            return Err(ContractError::EscrowPercentagesLengthMismatch);
        }
        Self::validate_percentages(&percentages, ContractError::EscrowPercentageTooHigh)?;

        for (pool_id, percentage) in percentages.iter().enumerate() {
            let pool_id = pool_id as u32;
            let mut pool = Self::load_pool(&env, pool_id)?;
            if pool.escrow_percentage != percentage {
                pool.escrow_percentage = percentage;
                Self::store_pool(&env, pool_id, &pool);
                events::publish_escrow_percentage_updated(&env, pool_id, percentage);
            }
        }
        ttl::extend_instance(&env);

        Ok(())
    }

    /// Replace every pool's exit-fee percentage (fractions of 1e18).
    pub fn set_exit_fee_percentages(
        env: Env,
        caller: Address,
        percentages: Vec<i128>,
    ) -> Result<(), ContractError> {
        Self::require_governance(&env, &caller)?;

        if percentages.len() != Self::pool_count(env.clone()) {
            return Err(ContractError::ExitFeePercentagesLengthMismatch);
        }
        Self::validate_percentages(&percentages, ContractError::ExitFeePercentageTooHigh)?;

        for (pool_id, percentage) in percentages.iter().enumerate() {
            let pool_id = pool_id as u32;
            let mut pool = Self::load_pool(&env, pool_id)?;
            if pool.exit_fee_percentage != percentage {
                pool.exit_fee_percentage = percentage;
                Self::store_pool(&env, pool_id, &pool);
                events::publish_exit_fee_percentage_updated(&env, pool_id, percentage);
            }
        }
        ttl::extend_instance(&env);

        Ok(())
    }

    /// Update the global reward rate (tokens per ledger).
    ///
    /// Every pool is flushed at the old rate before the change.
    pub fn set_reward_rate(env: Env, caller: Address, reward_rate: i128) -> Result<(), ContractError> {
        Self::require_governance(&env, &caller)?;

        if reward_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::update_all_pools(&env)?;
        env.storage().instance().set(&REWARD_RATE, &reward_rate);
        ttl::extend_instance(&env);

        events::publish_reward_rate_updated(&env, reward_rate);

        Ok(())
    }

    pub fn set_exit_fee_receiver(
        env: Env,
        caller: Address,
        receiver: Address,
    ) -> Result<(), ContractError> {
        Self::require_governance(&env, &caller)?;
        env.storage().instance().set(&EXIT_FEE_RECEIVER, &receiver);
        ttl::extend_instance(&env);
        events::publish_exit_fee_receiver_updated(&env, receiver);
        Ok(())
    }

    // ── Governance transfer (two-step) ──────────────────────────────────────

    pub fn set_pending_governance(
        env: Env,
        caller: Address,
        pending: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        governance::set_pending(&env, &caller, &pending)?;
        events::publish_pending_governance_updated(&env, caller, pending);
        Ok(())
    }

    pub fn accept_governance(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        let previous = governance::accept(&env, &caller)?;
        events::publish_governance_updated(&env, previous, caller);
        Ok(())
    }

    // ── Depositing and withdrawing ──────────────────────────────────────────

    /// Stake `amount` of the pool token.
    pub fn deposit(
        env: Env,
        depositor: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();
        Self::deposit_tokens(&env, &depositor, pool_id, amount)
    }

    /// Stake and attribute the depositor to `referrer`.
    ///
    /// The first referrer recorded for an account is permanent; later ones
    /// are ignored.
    pub fn deposit_with_referrer(
        env: Env,
        depositor: Address,
        pool_id: u32,
        amount: i128,
        referrer: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();

        if referrer == depositor {
            return Err(ContractError::InvalidReferrer);
        }
        Self::record_referrer(&env, &depositor, &referrer);

        Self::deposit_tokens(&env, &depositor, pool_id, amount)
    }

    /// Return `amount` of staked tokens. Rewards stay unclaimed.
    pub fn withdraw(
        env: Env,
        depositor: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = Self::update_pool(&env, pool_id)?;
        let mut stake = Self::settle_stake(&env, &pool, &depositor, pool_id)?;
        if stake.total_deposited < amount {
            return Err(ContractError::InsufficientBalance);
        }

        stake.total_deposited -= amount;
        pool.total_deposited = pool
            .total_deposited
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::store_pool(&env, pool_id, &pool);
        Self::store_stake(&env, &depositor, pool_id, &stake);

        token::Client::new(&env, &pool.token).transfer(
            &env.current_contract_address(),
            &depositor,
            &amount,
        );

        events::publish_withdrawn(&env, depositor, pool_id, amount);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out the unclaimed reward. Returns the full reward, escrowed part
    /// included.
    pub fn claim(env: Env, depositor: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();

        let pool = Self::update_pool(&env, pool_id)?;
        let mut stake = Self::settle_stake(&env, &pool, &depositor, pool_id)?;
        let reward = stake.total_unclaimed;

        if reward <= 0 {
            log!(&env, "claim: nothing to claim", depositor, pool_id);
            return Ok(0);
        }

        stake.total_unclaimed = 0;
        Self::store_pool(&env, pool_id, &pool);
        Self::store_stake(&env, &depositor, pool_id, &stake);

        Self::pay_reward(&env, &depositor, pool_id, &pool, reward)?;

        Ok(reward)
    }

    /// Withdraw the whole deposit and claim. The pool's exit fee is taken
    /// from the principal. Returns the claimed reward.
    pub fn exit(env: Env, depositor: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();

        let mut pool = Self::update_pool(&env, pool_id)?;
        let mut stake = Self::settle_stake(&env, &pool, &depositor, pool_id)?;

        let amount = stake.total_deposited;
        let reward = stake.total_unclaimed;
        let exit_fee = fixed_point::apply_percentage(&env, amount, pool.exit_fee_percentage)?;

        pool.total_deposited = pool
            .total_deposited
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        stake.total_deposited = 0;
        stake.total_unclaimed = 0;
        Self::store_pool(&env, pool_id, &pool);
        Self::store_stake(&env, &depositor, pool_id, &stake);

        let this = env.current_contract_address();
        let pool_token = token::Client::new(&env, &pool.token);
        if exit_fee > 0 {
            pool_token.transfer(&this, &Self::load_exit_fee_receiver(&env)?, &exit_fee);
        }
        if amount > exit_fee {
            pool_token.transfer(&this, &depositor, &(amount - exit_fee));
        }

        Self::pay_reward(&env, &depositor, pool_id, &pool, reward)?;

        events::publish_exited(&env, depositor, pool_id, amount, exit_fee);

        Ok(reward)
    }

    /// Return the full deposit without touching the reward source. Unclaimed
    /// rewards are forfeited. Accrual failures never block the principal.
    pub fn emergency_exit(env: Env, depositor: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();

        let mut pool = match Self::update_pool(&env, pool_id) {
            Ok(pool) => pool,
            Err(err) => {
                log!(&env, "emergency exit without settling pool", pool_id, err as u32);
                Self::load_pool(&env, pool_id)?
            }
        };
        let stake = Self::load_stake(&env, &depositor, pool_id);
        let amount = stake.total_deposited;

        pool.total_deposited = pool
            .total_deposited
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::store_pool(&env, pool_id, &pool);
        Self::store_stake(
            &env,
            &depositor,
            pool_id,
            &Stake {
                total_deposited: 0,
                last_accumulated_weight: pool.accumulated_reward_weight.clone(),
                total_unclaimed: 0,
            },
        );

        if stake.total_unclaimed > 0 {
            log!(&env, "emergency exit forfeits", depositor, stake.total_unclaimed);
        }

        if amount > 0 {
            token::Client::new(&env, &pool.token).transfer(
                &env.current_contract_address(),
                &depositor,
                &amount,
            );
        }

        events::publish_emergency_exited(&env, depositor, pool_id, amount);

        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_governance(env: Env) -> Result<Address, ContractError> {
        Ok(governance::governance(&env)?)
    }

    pub fn get_pending_governance(env: Env) -> Option<Address> {
        governance::pending_governance(&env)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &REWARD_TOKEN)
    }

    pub fn get_reward_source(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &REWARD_SOURCE)
    }

    pub fn get_exit_fee_receiver(env: Env) -> Result<Address, ContractError> {
        Self::load_exit_fee_receiver(&env)
    }

    pub fn get_reward_escrow(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &REWARD_ESCROW)
    }

    /// Global reward emitted per ledger, across all pools.
    pub fn get_reward_rate(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
    }

    pub fn get_total_reward_weight(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&TOTAL_REWARD_WEIGHT)
            .unwrap_or(0)
    }

    pub fn pool_count(env: Env) -> u32 {
        env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
    }

    pub fn get_pool_id(env: Env, token: Address) -> Result<u32, ContractError> {
        env.storage()
            .persistent()
            .get(&(POOL_ID, token))
            .ok_or(ContractError::PoolNotFound)
    }

    pub fn get_pool_token(env: Env, pool_id: u32) -> Result<Address, ContractError> {
        Ok(Self::load_pool(&env, pool_id)?.token)
    }

    pub fn get_pool_total_deposited(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env, pool_id)?.total_deposited)
    }

    pub fn get_pool_reward_weight(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env, pool_id)?.reward_weight)
    }

    /// Reward emitted to this pool per ledger.
    pub fn get_pool_reward_rate(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        let pool = Self::load_pool(&env, pool_id)?;
        Ok(Self::load_context(&env).pool_rate(&env, pool.reward_weight)?)
    }

    pub fn get_pool_escrow_percentage(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env, pool_id)?.escrow_percentage)
    }

    pub fn get_pool_exit_fee_percentage(env: Env, pool_id: u32) -> Result<i128, ContractError> {
        Ok(Self::load_pool(&env, pool_id)?.exit_fee_percentage)
    }

    pub fn get_stake_total_deposited(
        env: Env,
        account: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        Self::load_pool(&env, pool_id)?;
        Ok(Self::load_stake(&env, &account, pool_id).total_deposited)
    }

    /// Unclaimed reward including what accrued up to the current ledger.
    pub fn get_stake_total_unclaimed(
        env: Env,
        account: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        let pool = Self::load_pool(&env, pool_id)?;
        let accumulated =
            pool.accumulated_at(&env, &Self::load_context(&env), env.ledger().sequence())?;
        Ok(Self::load_stake(&env, &account, pool_id).unclaimed_at(&env, &accumulated)?)
    }

    pub fn get_referrer(env: Env, account: Address) -> Option<Address> {
        env.storage().persistent().get(&(REFERRER, account))
    }

    /// Summary of every pool together with `account`'s position in it.
    pub fn get_pools(env: Env, account: Address) -> Result<Vec<PoolInfo>, ContractError> {
        let ctx = Self::load_context(&env);
        let block = env.ledger().sequence();
        let mut rows = Vec::new(&env);

        for pool_id in 0..Self::pool_count(env.clone()) {
            let pool = Self::load_pool(&env, pool_id)?;
            let stake = Self::load_stake(&env, &account, pool_id);
            let accumulated = pool.accumulated_at(&env, &ctx, block)?;
            rows.push_back(PoolInfo {
                pool_id,
                token: pool.token.clone(),
                total_deposited: pool.total_deposited,
                reward_weight: pool.reward_weight,
                reward_rate: ctx.pool_rate(&env, pool.reward_weight)?,
                escrow_percentage: pool.escrow_percentage,
                exit_fee_percentage: pool.exit_fee_percentage,
                deposited: stake.total_deposited,
                unclaimed: stake.unclaimed_at(&env, &accumulated)?,
            });
        }

        Ok(rows)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: authenticate `caller` and check it is the governance.
    fn require_governance(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        governance::require_governance(env, caller)?;
        Ok(())
    }

    fn validate_percentages(
        percentages: &Vec<i128>,
        too_high: ContractError,
    ) -> Result<(), ContractError> {
        for percentage in percentages.iter() {
            if percentage < 0 {
                return Err(ContractError::InvalidInput);
            }
            if !fixed_point::is_valid_percentage(percentage) {
                return Err(too_high);
            }
        }
        Ok(())
    }

    fn load_address(env: &Env, key: &Symbol) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(key)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_exit_fee_receiver(env: &Env) -> Result<Address, ContractError> {
        Self::load_address(env, &EXIT_FEE_RECEIVER)
    }

    fn load_context(env: &Env) -> RewardContext {
        RewardContext {
            reward_rate: Self::get_reward_rate(env.clone()),
            total_reward_weight: Self::get_total_reward_weight(env.clone()),
        }
    }

    fn load_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
        env.storage()
            .persistent()
            .get(&(POOL, pool_id))
            .ok_or(ContractError::PoolNotFound)
    }

    fn store_pool(env: &Env, pool_id: u32, pool: &Pool) {
        let key = (POOL, pool_id);
        env.storage().persistent().set(&key, pool);
        ttl::extend_persistent(env, &key);
    }

    fn load_stake(env: &Env, account: &Address, pool_id: u32) -> Stake {
        env.storage()
            .persistent()
            .get(&(STAKE, account.clone(), pool_id))
            .unwrap_or_else(|| Stake::new(env))
    }

    fn store_stake(env: &Env, account: &Address, pool_id: u32, stake: &Stake) {
        let key = (STAKE, account.clone(), pool_id);
        env.storage().persistent().set(&key, stake);
        ttl::extend_persistent(env, &key);
        ttl::extend_instance(env);
    }

    /// Bring one pool's accumulator up to the current ledger. The caller
    /// stores the returned pool.
    fn update_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
        let mut pool = Self::load_pool(env, pool_id)?;
        pool.update(env, &Self::load_context(env), env.ledger().sequence())?;
        Ok(pool)
    }

    fn update_all_pools(env: &Env) -> Result<(), ContractError> {
        let ctx = Self::load_context(env);
        let block = env.ledger().sequence();
        for pool_id in 0..Self::pool_count(env.clone()) {
            let mut pool = Self::load_pool(env, pool_id)?;
            pool.update(env, &ctx, block)?;
            Self::store_pool(env, pool_id, &pool);
        }
        Ok(())
    }

    /// Credit `account` with everything earned up to `pool`'s accumulator.
    fn settle_stake(
        env: &Env,
        pool: &Pool,
        account: &Address,
        pool_id: u32,
    ) -> Result<Stake, ContractError> {
        let mut stake = Self::load_stake(env, account, pool_id);
        stake.update(env, &pool.accumulated_reward_weight)?;
        Ok(stake)
    }

    fn deposit_tokens(
        env: &Env,
        depositor: &Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = Self::update_pool(env, pool_id)?;
        let mut stake = Self::settle_stake(env, &pool, depositor, pool_id)?;

        pool.total_deposited = pool
            .total_deposited
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        stake.total_deposited = stake
            .total_deposited
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::store_pool(env, pool_id, &pool);
        Self::store_stake(env, depositor, pool_id, &stake);

        token::Client::new(env, &pool.token).transfer(
            depositor,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_deposited(env, depositor.clone(), pool_id, amount);

        Ok(())
    }

    fn record_referrer(env: &Env, account: &Address, referrer: &Address) {
        let key = (REFERRER, account.clone());
        if env.storage().persistent().has(&key) {
            log!(env, "referrer already recorded", account);
            return;
        }
        env.storage().persistent().set(&key, referrer);
        ttl::extend_persistent(env, &key);
        events::publish_referrer_set(env, account.clone(), referrer.clone());
    }

    /// Send `reward` to `account`: the escrowed share through the reward
    /// escrow, the rest directly. Both legs are pulled from the reward source.
    fn pay_reward(
        env: &Env,
        account: &Address,
        pool_id: u32,
        pool: &Pool,
        reward: i128,
    ) -> Result<(), ContractError> {
        if reward <= 0 {
            return Ok(());
        }

        let escrowed = fixed_point::apply_percentage(env, reward, pool.escrow_percentage)?;
        let direct = reward - escrowed;

        let this = env.current_contract_address();
        let source = Self::load_address(env, &REWARD_SOURCE)?;
        let reward_token = token::Client::new(env, &Self::load_address(env, &REWARD_TOKEN)?);

        if direct > 0 {
            reward_token.transfer_from(&this, &source, account, &direct);
        }
        if escrowed > 0 {
            let escrow = Self::load_address(env, &REWARD_ESCROW)?;
            reward_token.transfer_from(&this, &source, &escrow, &escrowed);
            RewardEscrowClient::new(env, &escrow).append_vesting_entry(&this, account, &escrowed);
        }

        events::publish_claimed(env, account.clone(), pool_id, reward, escrowed);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_governance;
