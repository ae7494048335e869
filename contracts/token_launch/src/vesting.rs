use crate::errors::Error;
use crate::events;
use crate::storage::*;
use crate::transfer::AssetLedger;
use crate::types::*;
use fp_math::claimable_amount;
use soroban_sdk::{Address, Env};

/// Schedule that gates `holder`'s allocation in `category`.
pub fn vesting_for(sale: &Sale, holder: &Address, category: AllocationCategory) -> VestingConfig {
    if category == AllocationCategory::PublicSale {
        return sale.vesting.clone();
    }
    sale.grants
        .iter()
        .find(|grant| grant.category == category && grant.beneficiary == *holder)
        .map(|grant| grant.vesting)
        .unwrap_or_default()
}

pub fn claimable(allocation: &Allocation, vesting: &VestingConfig, now: u64) -> i128 {
    claimable_amount(
        allocation.token_amount,
        allocation.claimed_amount,
        allocation.grant_time,
        vesting.schedule(),
        now,
    )
}

pub fn allocation_view(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
) -> Result<AllocationView, Error> {
    let sale = get_sale(env, sale_id)?;
    let allocation =
        get_allocation(env, sale_id, holder, category).ok_or(Error::AllocationNotFound)?;
    let vesting = vesting_for(&sale, holder, category);
    Ok(AllocationView {
        token_amount: allocation.token_amount,
        claimed_amount: allocation.claimed_amount,
        claimable: claimable(&allocation, &vesting, get_ledger_timestamp(env)),
    })
}

/// Releases whatever has vested since the last claim. Returns the amount
/// transferred; zero when nothing new has unlocked.
pub fn claim<L: AssetLedger>(
    env: &Env,
    ledger: &L,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
) -> Result<i128, Error> {
    let sale = get_sale(env, sale_id)?;
    let mut allocation =
        get_allocation(env, sale_id, holder, category).ok_or(Error::AllocationNotFound)?;
    let vesting = vesting_for(&sale, holder, category);

    let amount = claimable(&allocation, &vesting, get_ledger_timestamp(env));
    if amount <= 0 {
        return Ok(0);
    }
    let claimed_amount = allocation
        .claimed_amount
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    if claimed_amount > allocation.token_amount {
        return Err(Error::ArithmeticOverflow);
    }

    ledger.transfer(&env.current_contract_address(), holder, amount)?;

    allocation.claimed_amount = claimed_amount;
    set_allocation(env, &allocation);
    events::claimed(env, sale_id, holder, category, amount, claimed_amount);
    Ok(amount)
}
