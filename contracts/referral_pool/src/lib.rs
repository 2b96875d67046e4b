#![no_std]

pub mod events;
pub mod referral;
pub mod rewards;

use common::{fixed_point, governance, ttl, CommonError, RewardEscrowClient};
use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env, Symbol, I256};

pub use referral::REFERRAL_PERCENTAGE;
pub use rewards::{RewardState, DURATION};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const REWARD_ESCROW: Symbol = symbol_short!("ESCROW");
const REWARD_DISTRIBUTION: Symbol = symbol_short!("RWD_DIST");
const ESCROW_PERCENTAGE: Symbol = symbol_short!("ESC_PCT");
const REWARD_STATE: Symbol = symbol_short!("RWD_STATE");
const TOTAL_SUPPLY: Symbol = symbol_short!("TOT_SUP");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const USER_BALANCE: Symbol = symbol_short!("BAL");
const USER_RPT_PAID: Symbol = symbol_short!("RPT_PAID");
const USER_REWARDS: Symbol = symbol_short!("RWDS");

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
    InsufficientBalance = 8,
    NotRewardDistribution = 100,
    InvalidReferrer = 101,
    EscrowPercentageTooHigh = 102,
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

/// Single-token staking pool fed by weekly reward notifications.
///
/// The pool holds the reward tokens it distributes. Every paid reward is
/// split into a direct and an escrowed part, and the staker's referrer (if
/// any) receives an extra 1 % on top.
#[contract]
pub struct ReferralPoolContract;

#[contractimpl]
impl ReferralPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
        reward_escrow: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&REWARD_ESCROW, &reward_escrow);
        env.storage()
            .instance()
            .set(&REWARD_STATE, &RewardState::new(&env));
        governance::init(&env, &owner);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, owner, stake_token, reward_token, reward_escrow);

        Ok(())
    }

    // ── Owner settings ──────────────────────────────────────────────────────

    /// Set the account allowed to call `notify_reward_amount`.
    pub fn set_reward_distribution(
        env: Env,
        caller: Address,
        distribution: Address,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;
        env.storage()
            .instance()
            .set(&REWARD_DISTRIBUTION, &distribution);
        events::publish_reward_distribution_updated(&env, distribution);
        Ok(())
    }

    /// Share of each paid reward sent to the escrow, as a fraction of 1e18.
    pub fn set_escrow_percentage(
        env: Env,
        caller: Address,
        percentage: i128,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;
        if percentage < 0 {
            return Err(ContractError::InvalidInput);
        }
        if !fixed_point::is_valid_percentage(percentage) {
            return Err(ContractError::EscrowPercentageTooHigh);
        }
        env.storage()
            .instance()
            .set(&ESCROW_PERCENTAGE, &percentage);
        events::publish_escrow_percentage_updated(&env, percentage);
        Ok(())
    }

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

    // ── Reward funding ──────────────────────────────────────────────────────

    /// Release `reward` over the next week, together with whatever the
    /// running period has not distributed yet.
    ///
    /// The reward tokens must already be held by the pool.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        reward: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let distribution: Option<Address> = env.storage().instance().get(&REWARD_DISTRIBUTION);
        if distribution.as_ref() != Some(&caller) {
            return Err(ContractError::NotRewardDistribution);
        }
        if reward < 0 {
            return Err(ContractError::InvalidInput);
        }

        let now = env.ledger().timestamp();
        let mut state = Self::checkpoint(&env);
        state.notify(now, reward)?;
        env.storage().instance().set(&REWARD_STATE, &state);
        ttl::extend_instance(&env);

        events::publish_reward_added(&env, reward, state.reward_rate, state.period_finish);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    pub fn stake(env: Env, user: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::stake_tokens(&env, &user, amount)
    }

    /// Stake and attribute `user` to `referrer`.
    ///
    /// Only the first referrer is kept; later ones are ignored without
    /// failing. Referring oneself fails with `InvalidReferrer`.
    pub fn stake_with_referrer(
        env: Env,
        user: Address,
        amount: i128,
        referrer: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if referrer == user {
            return Err(ContractError::InvalidReferrer);
        }
        referral::record(&env, &user, &referrer);

        Self::stake_tokens(&env, &user, amount)
    }

    pub fn withdraw(env: Env, user: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::withdraw_tokens(&env, &user, amount)
    }

    /// Pay out everything `user` has earned. Returns the paid reward.
    pub fn get_reward(env: Env, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();
        Self::pay_reward(&env, &user)
    }

    /// Withdraw the whole balance and collect the reward.
    pub fn exit(env: Env, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let balance = Self::balance_of(env.clone(), user.clone());
        if balance > 0 {
            Self::withdraw_tokens(&env, &user, balance)?;
        }
        Self::pay_reward(&env, &user)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(governance::governance(&env)?)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        governance::pending_governance(&env)
    }

    pub fn stake_token(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &STAKE_TOKEN)
    }

    pub fn reward_token(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &REWARD_TOKEN)
    }

    pub fn reward_escrow(env: Env) -> Result<Address, ContractError> {
        Self::load_address(&env, &REWARD_ESCROW)
    }

    pub fn get_reward_distribution(env: Env) -> Option<Address> {
        env.storage().instance().get(&REWARD_DISTRIBUTION)
    }

    pub fn get_escrow_percentage(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&ESCROW_PERCENTAGE)
            .unwrap_or(0)
    }

    pub fn get_referrer(env: Env, user: Address) -> Option<Address> {
        referral::referrer_of(&env, &user)
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_SUPPLY).unwrap_or(0)
    }

    pub fn balance_of(env: Env, user: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&(USER_BALANCE, user))
            .unwrap_or(0)
    }

    /// Tokens released per second in the current period.
    pub fn reward_rate(env: Env) -> i128 {
        Self::load_state(&env).reward_rate
    }

    pub fn period_finish(env: Env) -> u64 {
        Self::load_state(&env).period_finish
    }

    pub fn last_time_reward_applicable(env: Env) -> u64 {
        Self::load_state(&env).last_time_reward_applicable(env.ledger().timestamp())
    }

    /// Accumulated reward per staked token, 1e18 scale, up to now.
    pub fn reward_per_token(env: Env) -> I256 {
        let total_supply = Self::total_supply(env.clone());
        Self::load_state(&env).reward_per_token(&env, env.ledger().timestamp(), total_supply)
    }

    /// Reward owed to `user` up to now, not yet paid.
    pub fn earned(env: Env, user: Address) -> Result<i128, ContractError> {
        let reward_per_token = Self::reward_per_token(env.clone());
        Self::earned_at(&env, &user, &reward_per_token)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        governance::require_governance(env, caller)?;
        Ok(())
    }

    fn load_address(env: &Env, key: &Symbol) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(key)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_state(env: &Env) -> RewardState {
        env.storage()
            .instance()
            .get(&REWARD_STATE)
            .unwrap_or_else(|| RewardState::new(env))
    }

    fn read_user(env: &Env, prefix: Symbol, user: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&(prefix, user.clone()))
            .unwrap_or(0)
    }

    fn write_user(env: &Env, prefix: Symbol, user: &Address, value: i128) {
        let key = (prefix, user.clone());
        env.storage().persistent().set(&key, &value);
        ttl::extend_persistent(env, &key);
    }

    /// Accumulator value `user` was last settled at.
    fn read_paid_snapshot(env: &Env, user: &Address) -> I256 {
        env.storage()
            .persistent()
            .get(&(USER_RPT_PAID, user.clone()))
            .unwrap_or_else(|| fixed_point::zero(env))
    }

    fn write_paid_snapshot(env: &Env, user: &Address, value: &I256) {
        let key = (USER_RPT_PAID, user.clone());
        env.storage().persistent().set(&key, value);
        ttl::extend_persistent(env, &key);
    }

    fn earned_at(env: &Env, user: &Address, reward_per_token: &I256) -> Result<i128, ContractError> {
        Ok(fixed_point::earned(
            env,
            Self::read_user(env, USER_BALANCE, user),
            reward_per_token,
            &Self::read_paid_snapshot(env, user),
            Self::read_user(env, USER_REWARDS, user),
        )?)
    }

    /// Fold accrued rewards into the stored accumulator and return the
    /// updated state. The state is stored by this call.
    fn checkpoint(env: &Env) -> RewardState {
        let mut state = Self::load_state(env);
        state.checkpoint(env, env.ledger().timestamp(), Self::total_supply(env.clone()));
        env.storage().instance().set(&REWARD_STATE, &state);
        state
    }

    /// Checkpoint the pool and credit `user` with everything earned so far.
    fn update_reward(env: &Env, user: &Address) -> Result<(), ContractError> {
        let state = Self::checkpoint(env);
        let earned = Self::earned_at(env, user, &state.reward_per_token_stored)?;
        Self::write_user(env, USER_REWARDS, user, earned);
        Self::write_paid_snapshot(env, user, &state.reward_per_token_stored);
        Ok(())
    }

    fn stake_tokens(env: &Env, user: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::update_reward(env, user)?;

        let balance = Self::read_user(env, USER_BALANCE, user)
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        let total = Self::total_supply(env.clone())
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::write_user(env, USER_BALANCE, user, balance);
        env.storage().instance().set(&TOTAL_SUPPLY, &total);
        ttl::extend_instance(env);

        token::Client::new(env, &Self::load_address(env, &STAKE_TOKEN)?).transfer(
            user,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_staked(env, user.clone(), amount);

        Ok(())
    }

    fn withdraw_tokens(env: &Env, user: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        Self::update_reward(env, user)?;

        let balance = Self::read_user(env, USER_BALANCE, user);
        if balance < amount {
            return Err(ContractError::InsufficientBalance);
        }
        let total = Self::total_supply(env.clone())
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Self::write_user(env, USER_BALANCE, user, balance - amount);
        env.storage().instance().set(&TOTAL_SUPPLY, &total);
        ttl::extend_instance(env);

        token::Client::new(env, &Self::load_address(env, &STAKE_TOKEN)?).transfer(
            &env.current_contract_address(),
            user,
            &amount,
        );

        events::publish_withdrawn(env, user.clone(), amount);

        Ok(())
    }

    /// Pay the user's reward: escrowed share to the escrow, the rest
    /// directly, plus the referral share to the recorded referrer.
    fn pay_reward(env: &Env, user: &Address) -> Result<i128, ContractError> {
        Self::update_reward(env, user)?;

        let reward = Self::read_user(env, USER_REWARDS, user);
        if reward <= 0 {
            log!(env, "get_reward: nothing earned", user);
            return Ok(0);
        }
        Self::write_user(env, USER_REWARDS, user, 0);
        ttl::extend_instance(env);

        let escrowed = fixed_point::apply_percentage(
            env,
            reward,
            Self::get_escrow_percentage(env.clone()),
        )?;
        let direct = reward - escrowed;
        let referrer = referral::referrer_of(env, user);
        let referral_amount = match referrer {
            Some(_) => referral::referral_reward(env, reward)?,
            None => 0,
        };

        let this = env.current_contract_address();
        let reward_token = token::Client::new(env, &Self::load_address(env, &REWARD_TOKEN)?);

        if direct > 0 {
            reward_token.transfer(&this, user, &direct);
        }
        if escrowed > 0 {
            let escrow = Self::load_address(env, &REWARD_ESCROW)?;
            reward_token.transfer(&this, &escrow, &escrowed);
            RewardEscrowClient::new(env, &escrow).append_vesting_entry(&this, user, &escrowed);
        }
        events::publish_reward_paid(env, user.clone(), reward, escrowed);

        if let Some(referrer) = referrer {
            if referral_amount > 0 {
                reward_token.transfer(&this, &referrer, &referral_amount);
                events::publish_referral_reward(env, user.clone(), referrer, referral_amount);
            }
        }

        Ok(reward)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_referral;
