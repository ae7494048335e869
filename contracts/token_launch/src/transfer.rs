use crate::errors::Error;
use soroban_sdk::{token, Address, Env};

/// Atomic debit/credit of a fungible balance.
///
/// Callers must treat every `Err` as "nothing moved".
pub trait AssetLedger {
    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), Error>;
}

/// [`AssetLedger`] over a Soroban token contract.
pub struct TokenLedger<'a> {
    client: token::Client<'a>,
}

impl<'a> TokenLedger<'a> {
    pub fn new(env: &Env, token: &Address) -> Self {
        TokenLedger {
            client: token::Client::new(env, token),
        }
    }
}

impl AssetLedger for TokenLedger<'_> {
    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        if amount == 0 {
            return Ok(());
        }
        // try_ keeps a failing token from aborting the whole invocation
        match self.client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::TransferFailed),
        }
    }
}
