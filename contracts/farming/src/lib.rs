#![no_std]

pub mod accountant;
pub mod events;
pub mod ledger;
pub mod math;
pub mod registry;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec};

use ledger::TokenLedger;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InsufficientBalance = 5,
    PoolAlreadyExists = 6,
    PoolNotFound = 7,
    NotStrayToken = 8,
    TransferFailed = 9,
    InsufficientRewardReserve = 10,
    MathOverflow = 11,
    InvariantViolation = 12,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Reward-bearing deposit bucket for one token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    /// Registration index; also the `mass_update` order.
    pub id: u32,
    pub token: Address,
    pub allocation_weight: u32,
    pub total_staked: i128,
    /// Cumulative reward per staked unit, scaled by `math::ACC_PRECISION`.
    pub acc_reward_per_share: i128,
    pub last_reward_block: u32,
}

/// A user's stake in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    /// Reward already priced in at the last settlement.
    pub reward_debt: i128,
    /// Settled but not yet paid out.
    pub pending_reward: i128,
}

/// Emission rate and the aggregate weight it is split across.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardState {
    pub reward_per_block: i128,
    pub total_allocation_weight: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct FarmingContract;

#[contractimpl]
impl FarmingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the farm.
    ///
    /// * `reward_token`     – token paid out as farming reward.
    /// * `reward_per_block` – reward emitted per ledger across all pools.
    /// * `start_block`      – first ledger at which any pool accrues.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        reward_per_block: i128,
        start_block: u32,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_per_block < 0 {
            return Err(ContractError::InvalidInput);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        registry::set_start_block(&env, start_block);
        registry::save_state(
            &env,
            &RewardState {
                reward_per_block,
                total_allocation_weight: 0,
            },
        );

        events::publish_initialized(&env, admin, reward_token, reward_per_block, start_block);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Register a pool for `token` with the given allocation weight.
    ///
    /// With `with_update`, all existing pools are brought current first so
    /// the new aggregate weight does not dilute reward they already earned.
    pub fn add_pool(
        env: Env,
        caller: Address,
        token: Address,
        allocation_weight: u32,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let pool = registry::add_pool(
            &env,
            &token,
            allocation_weight,
            with_update,
            env.ledger().sequence(),
        )?;
        let state = registry::load_state(&env);

        events::publish_pool_added(
            &env,
            pool.id,
            token,
            allocation_weight,
            state.total_allocation_weight,
        );

        Ok(pool.id)
    }

    /// Change the allocation weight of a registered pool.
    pub fn set_weight(
        env: Env,
        caller: Address,
        token: Address,
        allocation_weight: u32,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let (previous, _) = registry::set_weight(
            &env,
            &token,
            allocation_weight,
            with_update,
            env.ledger().sequence(),
        )?;
        let state = registry::load_state(&env);

        events::publish_pool_weight_set(
            &env,
            token,
            previous,
            allocation_weight,
            state.total_allocation_weight,
        );

        Ok(())
    }

    /// Bring every pool's accumulator up to the current ledger.
    pub fn mass_update(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        registry::mass_update(&env, env.ledger().sequence())
    }

    /// Bring one pool's accumulator up to the current ledger.
    pub fn update_pool(env: Env, token: Address) -> Result<Pool, ContractError> {
        Self::require_initialized(&env)?;
        registry::update_one(&env, &token, env.ledger().sequence())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of `token` into its pool.
    ///
    /// The position is settled before the stake changes. With
    /// `harvest_first`, reward owed on an existing stake is paid out in the
    /// same call. A zero `amount` only settles (and harvests). Returns the
    /// harvested reward.
    pub fn deposit(
        env: Env,
        user: Address,
        token: Address,
        amount: i128,
        harvest_first: bool,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = registry::load_pool(&env, &token)?;
        let deposit_ledger = TokenLedger::new(&env, &token);
        if deposit_ledger.balance_of(&user) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        // 1. Settle against the current accumulator.
        let state = registry::load_state(&env);
        let mut position = registry::load_position(&env, &token, &user);
        accountant::settle(&env, &mut pool, &mut position, &state, env.ledger().sequence())?;

        // 2. Optional harvest on the stake held so far.
        let mut harvested = 0i128;
        if harvest_first && position.amount > 0 {
            harvested = position.pending_reward;
            Self::pay_reward(&env, &user, harvested)?;
            position.pending_reward = 0;
        }

        // 3. Pull the deposit and grow the stake.
        deposit_ledger.transfer_in(&user, amount)?;
        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        accountant::sync_debt(&env, &pool, &mut position)?;

        registry::save_pool(&env, &pool);
        registry::save_position(&env, &token, &user, &position);

        if harvested > 0 {
            events::publish_claimed(&env, user.clone(), token.clone(), harvested);
        }
        events::publish_deposit(&env, user, token, amount);

        Ok(harvested)
    }

    /// Withdraw `amount` of staked `token`.
    ///
    /// Mirrors `deposit`: settle, optional harvest, shrink the stake, then
    /// return the principal. Returns the harvested reward.
    pub fn withdraw(
        env: Env,
        user: Address,
        token: Address,
        amount: i128,
        harvest_first: bool,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = registry::load_pool(&env, &token)?;
        let mut position = registry::load_position(&env, &token, &user);
        if amount > position.amount {
            return Err(ContractError::InsufficientBalance);
        }

        // 1. Settle before the stake shrinks.
        let state = registry::load_state(&env);
        accountant::settle(&env, &mut pool, &mut position, &state, env.ledger().sequence())?;

        // 2. Optional harvest.
        let mut harvested = 0i128;
        if harvest_first {
            harvested = position.pending_reward;
            Self::pay_reward(&env, &user, harvested)?;
            position.pending_reward = 0;
        }

        // 3. Shrink the stake and persist before returning principal.
        position.amount -= amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        accountant::sync_debt(&env, &pool, &mut position)?;
        registry::save_pool(&env, &pool);
        registry::save_position(&env, &token, &user, &position);

        TokenLedger::new(&env, &token).transfer_out(&user, amount)?;

        if harvested > 0 {
            events::publish_claimed(&env, user.clone(), token.clone(), harvested);
        }
        events::publish_withdraw(&env, user, token, amount);

        Ok(harvested)
    }

    /// Pay out everything `user` has earned in the `token` pool.
    ///
    /// Returns 0 without moving tokens when nothing is owed.
    pub fn claim(env: Env, user: Address, token: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let mut pool = registry::load_pool(&env, &token)?;
        let mut position = registry::load_position(&env, &token, &user);
        let state = registry::load_state(&env);
        accountant::settle(&env, &mut pool, &mut position, &state, env.ledger().sequence())?;

        let owed = position.pending_reward;
        position.pending_reward = 0;
        Self::pay_reward(&env, &user, owed)?;

        registry::save_pool(&env, &pool);
        registry::save_position(&env, &token, &user, &position);

        if owed > 0 {
            events::publish_claimed(&env, user, token, owed);
        }

        Ok(owed)
    }

    /// Return the whole stake without settling; unclaimed reward is
    /// forfeited.
    pub fn emergency_withdraw(
        env: Env,
        user: Address,
        token: Address,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        user.require_auth();

        let mut pool = registry::load_pool(&env, &token)?;
        let position = registry::load_position(&env, &token, &user);
        let amount = position.amount;

        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        registry::save_pool(&env, &pool);
        registry::save_position(
            &env,
            &token,
            &user,
            &UserPosition {
                amount: 0,
                reward_debt: 0,
                pending_reward: 0,
            },
        );

        TokenLedger::new(&env, &token).transfer_out(&user, amount)?;

        events::publish_emergency_withdraw(&env, user, token, amount);

        Ok(amount)
    }

    /// Top up the reward reserve. Anyone may fund the farm.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        funder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let reward_token = Self::load_reward_token(&env)?;
        TokenLedger::new(&env, &reward_token).transfer_in(&funder, amount)?;

        events::publish_rewards_funded(&env, funder, amount);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn pool_count(env: Env) -> u32 {
        registry::pool_count(&env)
    }

    /// Deposit tokens in registration order.
    pub fn pool_tokens(env: Env) -> Vec<Address> {
        registry::pool_tokens(&env)
    }

    pub fn get_pool(env: Env, token: Address) -> Result<Pool, ContractError> {
        registry::load_pool(&env, &token)
    }

    pub fn get_pool_by_id(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        let token = registry::pool_tokens(&env)
            .get(pool_id)
            .ok_or(ContractError::PoolNotFound)?;
        registry::load_pool(&env, &token)
    }

    /// Stored position of `user` in the `token` pool (all zero if the user
    /// never deposited).
    pub fn get_user_position(
        env: Env,
        token: Address,
        user: Address,
    ) -> Result<UserPosition, ContractError> {
        if !registry::is_registered(&env, &token) {
            return Err(ContractError::PoolNotFound);
        }
        Ok(registry::load_position(&env, &token, &user))
    }

    /// Real-time claimable reward for `user` without mutating state.
    pub fn pending_reward(env: Env, token: Address, user: Address) -> Result<i128, ContractError> {
        let pool = registry::load_pool(&env, &token)?;
        let position = registry::load_position(&env, &token, &user);
        let state = registry::load_state(&env);
        accountant::pending_reward(&env, &pool, &position, &state, env.ledger().sequence())
    }

    pub fn get_reward_per_block(env: Env) -> i128 {
        registry::load_state(&env).reward_per_block
    }

    pub fn get_total_allocation_weight(env: Env) -> u64 {
        registry::load_state(&env).total_allocation_weight
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::load_reward_token(&env)
    }

    pub fn get_start_block(env: Env) -> u32 {
        registry::start_block(&env)
    }

    /// Reward tokens available for payouts.
    ///
    /// When the reward token is also a pool's deposit token, that pool's
    /// staked principal is not counted.
    pub fn reward_reserve(env: Env) -> Result<i128, ContractError> {
        let reward_token = Self::load_reward_token(&env)?;
        Self::available_reserve(&env, &reward_token)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        if new_admin != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;

        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)?;

        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Update the reward emitted per ledger.
    ///
    /// Every pool is flushed at the old rate first, so blocks up to and
    /// including the current one are priced at the old rate and only later
    /// blocks at the new one.
    pub fn set_reward_per_block(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        registry::mass_update(&env, env.ledger().sequence())?;

        let mut state = registry::load_state(&env);
        state.reward_per_block = new_rate;
        registry::save_state(&env, &state);

        events::publish_block_reward(&env, caller, new_rate);

        Ok(())
    }

    /// Sweep `amount` of a token that no pool accepts to `to`.
    ///
    /// Registered deposit tokens are refused for every caller, so staked
    /// principal can never leave through this path.
    pub fn withdraw_stray_token(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if registry::is_registered(&env, &token) {
            return Err(ContractError::NotStrayToken);
        }
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        TokenLedger::new(&env, &token).transfer_out(&to, amount)?;

        events::publish_stray_token_withdrawn(&env, caller, token, to, amount);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn load_reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    fn available_reserve(env: &Env, reward_token: &Address) -> Result<i128, ContractError> {
        let held = TokenLedger::new(env, reward_token).held();
        let principal = if registry::is_registered(env, reward_token) {
            registry::load_pool(env, reward_token)?.total_staked
        } else {
            0
        };
        Ok(held.saturating_sub(principal).max(0))
    }

    /// Send `amount` of reward to `user` out of the reserve.
    fn pay_reward(env: &Env, user: &Address, amount: i128) -> Result<(), ContractError> {
        if amount == 0 {
            return Ok(());
        }
        let reward_token = Self::load_reward_token(env)?;
        if amount > Self::available_reserve(env, &reward_token)? {
            return Err(ContractError::InsufficientRewardReserve);
        }
        TokenLedger::new(env, &reward_token).transfer_out(user, amount)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
