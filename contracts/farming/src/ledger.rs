use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Moves one token between holders and this contract.
///
/// Transfers go through the token's `try_transfer` entry point so that a
/// rejected movement comes back as [`ContractError::TransferFailed`] instead
/// of trapping; the caller's own error return then rolls the whole
/// invocation back.
pub struct TokenLedger<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> TokenLedger<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        Self {
            env,
            client: token::Client::new(env, token),
        }
    }

    pub fn balance_of(&self, holder: &Address) -> i128 {
        self.client.balance(holder)
    }

    /// Balance held by the contract itself.
    pub fn held(&self) -> i128 {
        self.balance_of(&self.env.current_contract_address())
    }

    /// Pull `amount` from `from` into the contract.
    pub fn transfer_in(&self, from: &Address, amount: i128) -> Result<(), ContractError> {
        self.transfer(from, &self.env.current_contract_address(), amount)
    }

    /// Push `amount` from the contract to `to`.
    pub fn transfer_out(&self, to: &Address, amount: i128) -> Result<(), ContractError> {
        self.transfer(&self.env.current_contract_address(), to, amount)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        if amount == 0 {
            return Ok(());
        }
        match self.client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}
