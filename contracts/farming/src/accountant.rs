//! Reward accounting for a single pool and its positions.
//!
//! The accountant never touches storage: callers load a [`Pool`] and a
//! [`UserPosition`], hand mutable references in for the duration of one
//! operation, and persist whatever comes back.

use soroban_sdk::{log, panic_with_error, Env};

use crate::{math, ContractError, Pool, RewardState, UserPosition};

/// Bring `pool.acc_reward_per_share` up to date as of `current_block`.
///
/// Idempotent: a second call at the same block is a no-op. Intervals during
/// which the pool held no stake advance `last_reward_block` without banking
/// any reward.
pub fn update_pool(
    env: &Env,
    pool: &mut Pool,
    state: &RewardState,
    current_block: u32,
) -> Result<(), ContractError> {
    if current_block <= pool.last_reward_block {
        return Ok(());
    }
    if pool.total_staked == 0 {
        pool.last_reward_block = current_block;
        return Ok(());
    }

    let blocks = current_block - pool.last_reward_block;
    let reward = math::pool_reward(
        env,
        blocks,
        state.reward_per_block,
        pool.allocation_weight,
        state.total_allocation_weight,
    )
    .map_err(|err| halt_on_invariant(env, pool, state, err))?;
    let increment = math::per_share_increment(env, reward, pool.total_staked)
        .map_err(|err| halt_on_invariant(env, pool, state, err))?;

    pool.acc_reward_per_share = pool
        .acc_reward_per_share
        .checked_add(increment)
        .ok_or(ContractError::MathOverflow)?;
    pool.last_reward_block = current_block;
    Ok(())
}

/// Reward `user` could claim from `pool` at `current_block`, without
/// mutating either.
///
/// Runs the same accumulator update on a copy of the pool, so the result is
/// exactly what a subsequent [`settle`] would credit.
pub fn pending_reward(
    env: &Env,
    pool: &Pool,
    user: &UserPosition,
    state: &RewardState,
    current_block: u32,
) -> Result<i128, ContractError> {
    let mut snapshot = pool.clone();
    update_pool(env, &mut snapshot, state, current_block)?;
    math::claimable(
        env,
        user.amount,
        snapshot.acc_reward_per_share,
        user.reward_debt,
        user.pending_reward,
    )
}

/// Move everything `user` has accrued since their last settlement into
/// `user.pending_reward` and re-price `user.reward_debt`.
///
/// Must run before any change to `user.amount` and before any payout.
/// Returns the newly credited amount.
pub fn settle(
    env: &Env,
    pool: &mut Pool,
    user: &mut UserPosition,
    state: &RewardState,
    current_block: u32,
) -> Result<i128, ContractError> {
    update_pool(env, pool, state, current_block)?;

    let priced = math::accrued(env, user.amount, pool.acc_reward_per_share)?;
    let fresh = priced
        .checked_sub(user.reward_debt)
        .ok_or(ContractError::MathOverflow)?;
    user.pending_reward = user
        .pending_reward
        .checked_add(fresh)
        .ok_or(ContractError::MathOverflow)?;
    user.reward_debt = priced;
    Ok(fresh)
}

/// Re-price `user.reward_debt` after `user.amount` changed.
pub fn sync_debt(env: &Env, pool: &Pool, user: &mut UserPosition) -> Result<(), ContractError> {
    user.reward_debt = math::accrued(env, user.amount, pool.acc_reward_per_share)?;
    Ok(())
}

/// A weighted pool under an empty aggregate weight means the admin
/// configuration logic is broken; stop the invocation instead of
/// producing a number.
fn halt_on_invariant(
    env: &Env,
    pool: &Pool,
    state: &RewardState,
    err: ContractError,
) -> ContractError {
    if err == ContractError::InvariantViolation {
        log!(
            env,
            "reward invariant violated: pool id, weight, total weight, staked",
            pool.id,
            pool.allocation_weight,
            state.total_allocation_weight,
            pool.total_staked
        );
        panic_with_error!(env, err);
    }
    err
}
