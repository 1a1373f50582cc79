#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the farm is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub reward_per_block: i128,
    pub start_block: u32,
    pub block: u32,
}

/// Fired when a pool is registered for a new deposit token.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub token: Address,
    pub allocation_weight: u32,
    pub total_allocation_weight: u64,
    pub block: u32,
}

/// Fired when a pool's allocation weight changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub token: Address,
    pub previous_weight: u32,
    pub new_weight: u32,
    pub total_allocation_weight: u64,
    pub block: u32,
}

/// Fired when a user deposits into a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    pub token: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when a user withdraws principal from a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub token: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired whenever reward tokens are paid out to a user.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedEvent {
    pub user: Address,
    pub token: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when a user pulls their principal and forfeits unclaimed reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub user: Address,
    pub token: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when the admin changes the emission rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockRewardEvent {
    pub admin: Address,
    pub new_rate: i128,
    pub block: u32,
}

/// Fired when reward tokens are added to the payout reserve.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when the admin sweeps a token that no pool accepts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrayTokenWithdrawnEvent {
    pub admin: Address,
    pub token: Address,
    pub to: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub block: u32,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub block: u32,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub block: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    reward_token: Address,
    reward_per_block: i128,
    start_block: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            reward_per_block,
            start_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    token: Address,
    allocation_weight: u32,
    total_allocation_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), token.clone()),
        PoolAddedEvent {
            pool_id,
            token,
            allocation_weight,
            total_allocation_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_weight_set(
    env: &Env,
    token: Address,
    previous_weight: u32,
    new_weight: u32,
    total_allocation_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_WGT"), token.clone()),
        PoolWeightSetEvent {
            token,
            previous_weight,
            new_weight,
            total_allocation_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(env: &Env, user: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositEvent {
            user,
            token,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, user: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawEvent {
            user,
            token,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_claimed(env: &Env, user: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIMED"), user.clone()),
        ClaimedEvent {
            user,
            token,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, user: Address, token: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WDR"), user.clone()),
        EmergencyWithdrawEvent {
            user,
            token,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_block_reward(env: &Env, admin: Address, new_rate: i128) {
    env.events().publish(
        (symbol_short!("BLK_RWD"),),
        BlockRewardEvent {
            admin,
            new_rate,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        RewardsFundedEvent {
            funder,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_stray_token_withdrawn(
    env: &Env,
    admin: Address,
    token: Address,
    to: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("STRAY"), token.clone()),
        StrayTokenWithdrawnEvent {
            admin,
            token,
            to,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            block: env.ledger().sequence(),
        },
    );
}
