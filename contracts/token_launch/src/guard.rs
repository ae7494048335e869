//! Per-sale mutation guard.
//!
//! Soroban already serializes invocations touching the same keys. The guard
//! covers the remaining case: a token contract called mid-operation calling
//! back into the same sale. Operations on different sales never contend.

use crate::errors::Error;
use crate::types::DataKey;
use soroban_sdk::Env;

fn acquire(env: &Env, sale_id: u64) -> Result<(), Error> {
    let key = DataKey::SaleLock(sale_id);
    let locked: bool = env.storage().temporary().get(&key).unwrap_or(false);
    if locked {
        return Err(Error::SaleBusy);
    }
    env.storage().temporary().set(&key, &true);
    Ok(())
}

fn release(env: &Env, sale_id: u64) {
    env.storage().temporary().remove(&DataKey::SaleLock(sale_id));
}

/// Runs `f` as the single writer of `sale_id`.
pub fn with_sale_lock<T, F>(env: &Env, sale_id: u64, f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error>,
{
    acquire(env, sale_id)?;
    let result = f();
    release(env, sale_id);
    result
}
