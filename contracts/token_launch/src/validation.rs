//! # Sale configuration checks
//!
//! Every cap, fraction and schedule is checked once, when the sale is
//! created. A sale that passes here can always be settled: the pool covers
//! every token the caps allow to be sold, and genesis fractions fit inside
//! the declared supply.

use crate::errors::Error;
use crate::types::{AllocationCategory, GenesisTerms, SaleKind, SaleParams, VestingConfig};
use fp_math::BPS_DENOMINATOR;

fn validate_vesting(vesting: &VestingConfig) -> Result<(), Error> {
    if !vesting.schedule().is_valid() {
        return Err(Error::InvalidConfiguration);
    }
    Ok(())
}

fn validate_genesis(terms: &GenesisTerms, sale_tokens: i128) -> Result<(), Error> {
    let bps_range = 1..=BPS_DENOMINATOR as u32;
    if terms.total_supply <= 0
        || !bps_range.contains(&terms.max_supply_fraction_bps)
        || !bps_range.contains(&terms.per_participant_cap_bps)
        || terms.point_ceiling <= 0
    {
        return Err(Error::InvalidConfiguration);
    }
    if sale_tokens > terms.total_supply {
        return Err(Error::InvalidConfiguration);
    }
    Ok(())
}

/// Validates `params` and returns the sale-token deposit the sale needs:
/// the allocable pool plus every category grant.
pub fn validate_sale_params(params: &SaleParams, now: u64) -> Result<i128, Error> {
    if params.price <= 0 || params.hard_cap <= 0 || params.allocable_pool <= 0 {
        return Err(Error::InvalidConfiguration);
    }
    if params.soft_cap < 0 || params.soft_cap > params.hard_cap {
        return Err(Error::InvalidConfiguration);
    }
    if params.min_purchase <= 0 || params.min_purchase > params.max_purchase {
        return Err(Error::InvalidConfiguration);
    }
    if params.start_time >= params.end_time || params.end_time <= now {
        return Err(Error::InvalidConfiguration);
    }
    validate_vesting(&params.vesting)?;

    let mut grant_total: i128 = 0;
    for (index, grant) in params.grants.iter().enumerate() {
        if grant.amount <= 0 || grant.category == AllocationCategory::PublicSale {
            return Err(Error::InvalidConfiguration);
        }
        // One allocation per (beneficiary, category).
        let duplicate = params
            .grants
            .iter()
            .skip(index + 1)
            .any(|other| other.category == grant.category && other.beneficiary == grant.beneficiary);
        if duplicate {
            return Err(Error::InvalidConfiguration);
        }
        validate_vesting(&grant.vesting)?;
        grant_total = grant_total
            .checked_add(grant.amount)
            .ok_or(Error::ArithmeticOverflow)?;
    }
    let deposit = params
        .allocable_pool
        .checked_add(grant_total)
        .ok_or(Error::ArithmeticOverflow)?;

    match &params.kind {
        SaleKind::Genesis(terms) => validate_genesis(terms, deposit)?,
        SaleKind::Standard => {
            // Everything the hard cap can buy must fit in the pool.
            if params.hard_cap / params.price > params.allocable_pool {
                return Err(Error::InvalidConfiguration);
            }
        }
    }

    Ok(deposit)
}
