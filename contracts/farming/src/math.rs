use soroban_sdk::{Env, I256};

use crate::ContractError;

/// Fixed-point scaling factor applied to `acc_reward_per_share`.
///
/// Every accumulator value is stored multiplied by this constant so that
/// per-share rewards smaller than one base unit survive integer division.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

fn wide(env: &Env, value: i128) -> I256 {
    I256::from_i128(env, value)
}

/// `a × b / denom`, floored, with the product held in 256 bits.
///
/// Only a quotient that does not fit back into `i128` is an overflow.
fn mul_div_floor(env: &Env, a: i128, b: i128, denom: i128) -> Result<i128, ContractError> {
    if denom <= 0 || a < 0 || b < 0 {
        return Err(ContractError::MathOverflow);
    }
    wide(env, a)
        .mul(&wide(env, b))
        .div(&wide(env, denom))
        .to_i128()
        .ok_or(ContractError::MathOverflow)
}

/// Reward emitted to one pool over `blocks` blocks.
///
/// ```text
/// pool_reward = blocks × reward_per_block × weight / total_weight
/// ```
///
/// Multiplication happens before the single floor division. A zero-weight
/// pool earns nothing; a weighted pool with an empty aggregate weight is an
/// invariant violation and is reported as such.
pub fn pool_reward(
    env: &Env,
    blocks: u32,
    reward_per_block: i128,
    weight: u32,
    total_weight: u64,
) -> Result<i128, ContractError> {
    if weight == 0 {
        return Ok(0);
    }
    if total_weight == 0 {
        return Err(ContractError::InvariantViolation);
    }
    if reward_per_block < 0 {
        return Err(ContractError::MathOverflow);
    }

    wide(env, blocks as i128)
        .mul(&wide(env, reward_per_block))
        .mul(&wide(env, weight as i128))
        .div(&wide(env, total_weight as i128))
        .to_i128()
        .ok_or(ContractError::MathOverflow)
}

/// Increment of `acc_reward_per_share` for `reward` spread over `total_staked`.
///
/// Callers must not pass an empty pool; the accountant forfeits the reward
/// for those intervals instead.
pub fn per_share_increment(
    env: &Env,
    reward: i128,
    total_staked: i128,
) -> Result<i128, ContractError> {
    if total_staked <= 0 {
        return Err(ContractError::InvariantViolation);
    }
    mul_div_floor(env, reward, ACC_PRECISION, total_staked)
}

/// Reward already priced in for `amount` at accumulator value `acc`.
///
/// ```text
/// accrued = amount × acc / ACC_PRECISION
/// ```
pub fn accrued(env: &Env, amount: i128, acc: i128) -> Result<i128, ContractError> {
    mul_div_floor(env, amount, acc, ACC_PRECISION)
}

/// Claimable reward for a position:
/// `amount × acc / ACC_PRECISION − reward_debt + pending`.
pub fn claimable(
    env: &Env,
    amount: i128,
    acc: i128,
    reward_debt: i128,
    pending: i128,
) -> Result<i128, ContractError> {
    accrued(env, amount, acc)?
        .checked_sub(reward_debt)
        .and_then(|fresh| fresh.checked_add(pending))
        .ok_or(ContractError::MathOverflow)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure arithmetic, no Soroban environment required.
