//! Shared fixtures for the property suites.

use farming::{FarmingContract, FarmingContractClient};
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};

pub const RESERVE: i128 = 1_000_000_000_000_000_000_000_000_000;

pub struct Farm {
    pub env: Env,
    pub client: FarmingContractClient<'static>,
    pub admin: Address,
    pub reward_token: Address,
}

/// A funded farm at block 0 with no pools.
pub fn farm(reward_per_block: i128) -> Farm {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(0);

    let reward_token = token(&env);
    let contract_id = env.register(FarmingContract, ());
    let client = FarmingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward_token, &reward_per_block, &0);
    mint(&env, &reward_token, &contract_id, RESERVE);

    Farm {
        env,
        client,
        admin,
        reward_token,
    }
}

pub fn token(env: &Env) -> Address {
    env.register_stellar_asset_contract_v2(Address::generate(env))
        .address()
}

pub fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    StellarAssetClient::new(env, token).mint(to, &amount);
}

pub fn balance(env: &Env, token: &Address, holder: &Address) -> i128 {
    TokenClient::new(env, token).balance(holder)
}

pub fn set_block(env: &Env, block: u32) {
    env.ledger().set_sequence_number(block);
}
