//! Pool and position storage.
//!
//! Pools live in persistent storage keyed by `(POOL, token)`; the
//! registration order is kept in a separate `Vec<Address>` so that
//! `mass_update` walks pools deterministically. Positions are keyed by
//! `(POS, token, user)` and are created on first deposit.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{accountant, ContractError, Pool, RewardState, UserPosition};

// ── Storage keys ─────────────────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const POSITION: Symbol = symbol_short!("POS");
const POOL_TOKENS: Symbol = symbol_short!("POOLS");
const REWARD_STATE: Symbol = symbol_short!("RWD_ST");
const START_BLOCK: Symbol = symbol_short!("START_BLK");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

fn pool_key(token: &Address) -> (Symbol, Address) {
    (POOL, token.clone())
}

fn position_key(token: &Address, user: &Address) -> (Symbol, Address, Address) {
    (POSITION, token.clone(), user.clone())
}

fn extend_ttl_pool_key(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_position_key(env: &Env, key: &(Symbol, Address, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Global reward state ──────────────────────────────────────────────────────

pub fn load_state(env: &Env) -> RewardState {
    env.storage()
        .instance()
        .get(&REWARD_STATE)
        .unwrap_or(RewardState {
            reward_per_block: 0,
            total_allocation_weight: 0,
        })
}

pub fn save_state(env: &Env, state: &RewardState) {
    env.storage().instance().set(&REWARD_STATE, state);
    extend_ttl_instance(env);
}

pub fn start_block(env: &Env) -> u32 {
    env.storage().instance().get(&START_BLOCK).unwrap_or(0)
}

pub fn set_start_block(env: &Env, block: u32) {
    env.storage().instance().set(&START_BLOCK, &block);
}

// ── Pools ────────────────────────────────────────────────────────────────────

/// Deposit tokens in registration order.
pub fn pool_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&POOL_TOKENS)
        .unwrap_or(Vec::new(env))
}

pub fn pool_count(env: &Env) -> u32 {
    pool_tokens(env).len()
}

pub fn is_registered(env: &Env, token: &Address) -> bool {
    env.storage().persistent().has(&pool_key(token))
}

pub fn load_pool(env: &Env, token: &Address) -> Result<Pool, ContractError> {
    let key = pool_key(token);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PoolNotFound)?;
    extend_ttl_pool_key(env, &key);
    Ok(pool)
}

pub fn save_pool(env: &Env, pool: &Pool) {
    let key = pool_key(&pool.token);
    env.storage().persistent().set(&key, pool);
    extend_ttl_pool_key(env, &key);
}

// ── Positions ────────────────────────────────────────────────────────────────

/// Position of `user` in the `token` pool; all-zero if they never deposited.
pub fn load_position(env: &Env, token: &Address, user: &Address) -> UserPosition {
    let key = position_key(token, user);
    match env.storage().persistent().get::<_, UserPosition>(&key) {
        Some(position) => {
            extend_ttl_position_key(env, &key);
            position
        }
        None => UserPosition {
            amount: 0,
            reward_debt: 0,
            pending_reward: 0,
        },
    }
}

pub fn save_position(env: &Env, token: &Address, user: &Address, position: &UserPosition) {
    let key = position_key(token, user);
    env.storage().persistent().set(&key, position);
    extend_ttl_position_key(env, &key);
    extend_ttl_instance(env);
}

// ── Registry operations ──────────────────────────────────────────────────────

/// Refresh a single pool's accumulator and persist it.
pub fn update_one(env: &Env, token: &Address, current_block: u32) -> Result<Pool, ContractError> {
    let state = load_state(env);
    let mut pool = load_pool(env, token)?;
    accountant::update_pool(env, &mut pool, &state, current_block)?;
    save_pool(env, &pool);
    Ok(pool)
}

/// Refresh every pool in registration order.
pub fn mass_update(env: &Env, current_block: u32) -> Result<(), ContractError> {
    let state = load_state(env);
    for token in pool_tokens(env).iter() {
        let mut pool = load_pool(env, &token)?;
        accountant::update_pool(env, &mut pool, &state, current_block)?;
        save_pool(env, &pool);
    }
    Ok(())
}

/// Register a new pool for `token`.
///
/// With `with_update`, every existing pool is brought current first so the
/// larger aggregate weight only applies to blocks after the join.
pub fn add_pool(
    env: &Env,
    token: &Address,
    weight: u32,
    with_update: bool,
    current_block: u32,
) -> Result<Pool, ContractError> {
    if is_registered(env, token) {
        return Err(ContractError::PoolAlreadyExists);
    }
    if with_update {
        mass_update(env, current_block)?;
    }

    let mut tokens = pool_tokens(env);
    let pool = Pool {
        id: tokens.len(),
        token: token.clone(),
        allocation_weight: weight,
        total_staked: 0,
        acc_reward_per_share: 0,
        last_reward_block: current_block.max(start_block(env)),
    };
    save_pool(env, &pool);
    tokens.push_back(token.clone());
    env.storage().instance().set(&POOL_TOKENS, &tokens);

    let mut state = load_state(env);
    state.total_allocation_weight = state
        .total_allocation_weight
        .checked_add(weight as u64)
        .ok_or(ContractError::MathOverflow)?;
    save_state(env, &state);

    Ok(pool)
}

/// Change the allocation weight of an existing pool.
///
/// Returns the previous weight alongside the updated pool.
pub fn set_weight(
    env: &Env,
    token: &Address,
    weight: u32,
    with_update: bool,
    current_block: u32,
) -> Result<(u32, Pool), ContractError> {
    let mut pool = load_pool(env, token)?;
    if with_update {
        mass_update(env, current_block)?;
        pool = load_pool(env, token)?;
    }

    let previous = pool.allocation_weight;
    let mut state = load_state(env);
    state.total_allocation_weight = state
        .total_allocation_weight
        .checked_sub(previous as u64)
        .and_then(|rest| rest.checked_add(weight as u64))
        .ok_or(ContractError::MathOverflow)?;
    pool.allocation_weight = weight;

    save_pool(env, &pool);
    save_state(env, &state);

    Ok((previous, pool))
}
