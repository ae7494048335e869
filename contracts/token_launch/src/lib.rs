#![no_std]

mod contract;
mod errors;
mod events;
mod guard;
mod ledger;
mod lifecycle;
mod settlement;
mod storage;
mod transfer;
mod types;
mod validation;
mod vesting;

#[cfg(test)]
mod test_vesting;

pub use contract::{TokenLaunchContract, TokenLaunchContractClient};
pub use errors::Error;
pub use settlement::DEFAULT_SETTLEMENT_BATCH;
pub use transfer::{AssetLedger, TokenLedger};
pub use types::*;
