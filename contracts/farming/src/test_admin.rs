extern crate std;

use soroban_sdk::{
    testutils::Address as _,
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

use crate::{ContractError, FarmingContract, FarmingContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, FarmingContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(FarmingContract, ());
    let client = FarmingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &reward_token, &10, &0);

    // Pre-fund the reward reserve
    StellarAssetClient::new(&env, &reward_token)
        .mock_all_auths()
        .mint(&contract_id, &1_000_000_000i128);

    (env, client, admin, reward_token)
}

fn create_token(env: &Env) -> Address {
    env.register_stellar_asset_contract_v2(Address::generate(env))
        .address()
}

fn expect_error<T, E>(result: Result<T, Result<ContractError, E>>, expected: ContractError) {
    match result {
        Err(Ok(e)) => assert_eq!(e, expected),
        _ => unreachable!("Expected {:?}", expected),
    }
}

// ── Admin-only operations reject everyone else ───────────────────────────────

#[test]
fn test_non_admin_cannot_add_pool() {
    let (env, client, _admin, _) = setup();
    let intruder = Address::generate(&env);
    let lp = create_token(&env);

    expect_error(
        client.try_add_pool(&intruder, &lp, &10, &false),
        ContractError::Unauthorized,
    );
    assert_eq!(client.pool_count(), 0);
}

#[test]
fn test_non_admin_cannot_set_weight() {
    let (env, client, admin, _) = setup();
    let intruder = Address::generate(&env);
    let lp = create_token(&env);
    client.add_pool(&admin, &lp, &10, &false);

    expect_error(
        client.try_set_weight(&intruder, &lp, &0, &false),
        ContractError::Unauthorized,
    );
    assert_eq!(client.get_pool(&lp).allocation_weight, 10);
}

#[test]
fn test_non_admin_cannot_set_reward_per_block() {
    let (env, client, _admin, _) = setup();
    let intruder = Address::generate(&env);

    expect_error(
        client.try_set_reward_per_block(&intruder, &999),
        ContractError::Unauthorized,
    );
    assert_eq!(client.get_reward_per_block(), 10);
}

#[test]
fn test_set_reward_per_block_rejects_negative_rate() {
    let (_env, client, admin, _) = setup();
    expect_error(
        client.try_set_reward_per_block(&admin, &-1),
        ContractError::InvalidInput,
    );
}

// ── Stray-token sweep ────────────────────────────────────────────────────────

#[test]
fn test_withdraw_stray_token() {
    let (env, client, admin, _) = setup();
    let stray = create_token(&env);
    let recipient = Address::generate(&env);
    StellarAssetClient::new(&env, &stray).mint(&client.address, &15);

    client.withdraw_stray_token(&admin, &stray, &recipient, &15);

    let token = TokenClient::new(&env, &stray);
    assert_eq!(token.balance(&recipient), 15);
    assert_eq!(token.balance(&client.address), 0);
}

#[test]
fn test_only_admin_can_withdraw_stray_tokens() {
    let (env, client, _admin, _) = setup();
    let stray = create_token(&env);
    let intruder = Address::generate(&env);
    StellarAssetClient::new(&env, &stray).mint(&client.address, &15);

    expect_error(
        client.try_withdraw_stray_token(&intruder, &stray, &intruder, &15),
        ContractError::Unauthorized,
    );
    assert_eq!(TokenClient::new(&env, &stray).balance(&client.address), 15);
}

#[test]
fn test_pool_token_is_never_stray() {
    let (env, client, admin, _) = setup();
    let lp = create_token(&env);
    let recipient = Address::generate(&env);
    client.add_pool(&admin, &lp, &15, &false);
    StellarAssetClient::new(&env, &lp).mint(&client.address, &15);

    expect_error(
        client.try_withdraw_stray_token(&admin, &lp, &recipient, &15),
        ContractError::NotStrayToken,
    );
    assert_eq!(TokenClient::new(&env, &lp).balance(&client.address), 15);

    // A zero-weight pool still protects its principal.
    client.set_weight(&admin, &lp, &0, &false);
    expect_error(
        client.try_withdraw_stray_token(&admin, &lp, &recipient, &1),
        ContractError::NotStrayToken,
    );

    // And so does every later admin.
    let successor = Address::generate(&env);
    client.propose_admin(&admin, &successor);
    client.accept_admin(&successor);
    expect_error(
        client.try_withdraw_stray_token(&successor, &lp, &recipient, &15),
        ContractError::NotStrayToken,
    );
}

#[test]
fn test_stray_sweep_beyond_balance_reports_transfer_failure() {
    let (env, client, admin, _) = setup();
    let stray = create_token(&env);
    let recipient = Address::generate(&env);
    StellarAssetClient::new(&env, &stray).mint(&client.address, &5);

    expect_error(
        client.try_withdraw_stray_token(&admin, &stray, &recipient, &50),
        ContractError::TransferFailed,
    );
    assert_eq!(TokenClient::new(&env, &stray).balance(&client.address), 5);
}

// ── Two-step admin transfer ──────────────────────────────────────────────────

#[test]
fn test_admin_transfer_two_step() {
    let (env, client, admin, _) = setup();
    let successor = Address::generate(&env);
    let lp = create_token(&env);

    client.propose_admin(&admin, &successor);
    assert_eq!(client.get_pending_admin(), Some(successor.clone()));
    // Proposal alone changes nothing.
    assert_eq!(client.get_admin(), admin);

    client.accept_admin(&successor);
    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);

    expect_error(
        client.try_add_pool(&admin, &lp, &1, &false),
        ContractError::Unauthorized,
    );
    client.add_pool(&successor, &lp, &1, &false);
    assert_eq!(client.pool_count(), 1);
}

#[test]
fn test_accept_admin_by_wrong_address_fails() {
    let (env, client, admin, _) = setup();
    let successor = Address::generate(&env);
    let impostor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    expect_error(client.try_accept_admin(&impostor), ContractError::Unauthorized);
    assert_eq!(client.get_admin(), admin);
}

#[test]
fn test_accept_admin_without_proposal_fails() {
    let (env, client, _admin, _) = setup();
    let someone = Address::generate(&env);
    expect_error(client.try_accept_admin(&someone), ContractError::InvalidInput);
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin, _) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);
    assert_eq!(client.get_pending_admin(), None);

    expect_error(client.try_accept_admin(&successor), ContractError::InvalidInput);
    expect_error(
        client.try_cancel_admin_transfer(&admin),
        ContractError::InvalidInput,
    );
}

#[test]
fn test_non_admin_cannot_propose_admin() {
    let (env, client, _admin, _) = setup();
    let intruder = Address::generate(&env);
    expect_error(
        client.try_propose_admin(&intruder, &intruder),
        ContractError::Unauthorized,
    );
}
