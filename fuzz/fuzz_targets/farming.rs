#![no_main]

use arbitrary::Arbitrary;
use farming::{FarmingContract, FarmingContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const POOLS: usize = 3;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { pool: u8, amount: u32, harvest: bool },
    Withdraw { pool: u8, amount: u32, harvest: bool },
    Claim { pool: u8 },
    EmergencyWithdraw { pool: u8 },
    SetWeight { pool: u8, weight: u16, with_update: bool },
    SetRate { rate: u32 },
    Advance { blocks: u8 },
}

fuzz_target!(|input: (u32, Vec<FuzzAction>)| {
    let (rate, actions) = input;
    let env = Env::default();
    env.mock_all_auths();

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(FarmingContract, ());
    let client = FarmingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward_token, &(rate as i128), &0);
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &(i64::MAX as i128));

    let mut tokens = Vec::new();
    for weight in 1..=POOLS as u32 {
        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        client.add_pool(&admin, &token, &weight, &false);
        tokens.push(token);
    }

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        for token in &tokens {
            StellarAssetClient::new(&env, token).mint(&user, &(u32::MAX as i128));
        }
        users.push(user);
    }

    let mut block = 0u32;
    for (i, action) in actions.into_iter().enumerate() {
        let user = &users[i % users.len()];
        // Errors are expected here; a panic or a broken invariant below is not.
        match action {
            FuzzAction::Deposit { pool, amount, harvest } => {
                let token = &tokens[pool as usize % POOLS];
                let _ = client.try_deposit(user, token, &(amount as i128), &harvest);
            }
            FuzzAction::Withdraw { pool, amount, harvest } => {
                let token = &tokens[pool as usize % POOLS];
                let _ = client.try_withdraw(user, token, &(amount as i128), &harvest);
            }
            FuzzAction::Claim { pool } => {
                let _ = client.try_claim(user, &tokens[pool as usize % POOLS]);
            }
            FuzzAction::EmergencyWithdraw { pool } => {
                let _ = client.try_emergency_withdraw(user, &tokens[pool as usize % POOLS]);
            }
            FuzzAction::SetWeight { pool, weight, with_update } => {
                let token = &tokens[pool as usize % POOLS];
                let _ = client.try_set_weight(&admin, token, &(weight as u32), &with_update);
            }
            FuzzAction::SetRate { rate } => {
                let _ = client.try_set_reward_per_block(&admin, &(rate as i128));
            }
            FuzzAction::Advance { blocks } => {
                block = block.saturating_add(blocks as u32);
                env.ledger().set_sequence_number(block);
            }
        }

        // Every pool's principal stays fully backed.
        for token in &tokens {
            let pool = client.get_pool(token);
            let staked: i128 = users
                .iter()
                .map(|u| client.get_user_position(token, u).amount)
                .sum();
            assert_eq!(staked, pool.total_staked);
            assert_eq!(TokenClient::new(&env, token).balance(&contract_id), pool.total_staked);
            for u in &users {
                if let Ok(Ok(pending)) = client.try_pending_reward(token, u) {
                    assert!(pending >= 0);
                }
            }
        }
    }
});
