//! Sale ledger: the only code that writes `raised`, commitments and point
//! pledges. Every check runs before the first write, so a rejected command
//! leaves the sale untouched.

use crate::errors::Error;
use crate::events;
use crate::lifecycle;
use crate::storage::*;
use crate::transfer::{AssetLedger, TokenLedger};
use crate::types::*;
use crate::validation::validate_sale_params;
use soroban_sdk::{Address, Env};

pub fn open_sale(env: &Env, creator: &Address, params: SaleParams) -> Result<u64, Error> {
    let now = get_ledger_timestamp(env);
    let deposit = validate_sale_params(&params, now)?;

    // Sale tokens for the pool and every grant are escrowed up front.
    TokenLedger::new(env, &params.sale_token).transfer(
        creator,
        &env.current_contract_address(),
        deposit,
    )?;

    let sale_id = get_sale_count(env) + 1;
    let status = if now >= params.start_time {
        SaleStatus::Active
    } else {
        SaleStatus::Pending
    };
    let sale = Sale {
        id: sale_id,
        agent_id: params.agent_id,
        creator: creator.clone(),
        treasury: params.treasury,
        commit_token: params.commit_token,
        sale_token: params.sale_token,
        kind: params.kind,
        price: params.price,
        hard_cap: params.hard_cap,
        soft_cap: params.soft_cap,
        min_purchase: params.min_purchase,
        max_purchase: params.max_purchase,
        start_time: params.start_time,
        end_time: params.end_time,
        raised: 0,
        total_points: 0,
        participant_count: 0,
        status,
        hard_cap_reached: false,
        close_on_hard_cap: params.close_on_hard_cap,
        allocable_pool: params.allocable_pool,
        vesting: params.vesting,
        grants: params.grants,
        created_at: now,
        closed_at: 0,
    };

    set_sale(env, &sale);
    set_sale_count(env, sale_id);
    events::sale_created(env, &sale);
    Ok(sale_id)
}

/// Records a genesis point pledge and returns the participant's total for
/// this sale. Points are intent only; no external balance is debited.
pub fn pledge_points(
    env: &Env,
    sale_id: u64,
    participant: &Address,
    points: i128,
) -> Result<i128, Error> {
    if points <= 0 {
        return Err(Error::InvalidAmount);
    }
    let mut sale = get_sale(env, sale_id)?;
    let terms = sale.kind.terms().cloned().ok_or(Error::NotGenesisSale)?;
    let now = get_ledger_timestamp(env);
    lifecycle::sync_status(env, &mut sale, now);
    lifecycle::ensure_accepting(&sale, now)?;

    let prior = get_pledge(env, sale_id, participant);
    let pledged = prior.checked_add(points).ok_or(Error::ArithmeticOverflow)?;
    if pledged > terms.point_ceiling {
        return Err(Error::AboveMaximum);
    }
    let total_points = sale
        .total_points
        .checked_add(points)
        .ok_or(Error::ArithmeticOverflow)?;

    set_pledge(env, sale_id, participant, pledged);
    sale.total_points = total_points;
    set_sale(env, &sale);

    events::points_pledged(env, sale_id, participant, points, pledged);
    Ok(pledged)
}

/// Escrows `amount` of the commit token and returns the participant's
/// committed total. Over-cap commits are rejected whole, never truncated.
pub fn commit(
    env: &Env,
    sale_id: u64,
    participant: &Address,
    amount: i128,
) -> Result<i128, Error> {
    commit_with(
        env,
        &TokenLedger::new(env, &get_sale(env, sale_id)?.commit_token),
        sale_id,
        participant,
        amount,
    )
}

pub fn commit_with<L: AssetLedger>(
    env: &Env,
    ledger: &L,
    sale_id: u64,
    participant: &Address,
    amount: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let mut sale = get_sale(env, sale_id)?;
    let now = get_ledger_timestamp(env);
    lifecycle::sync_status(env, &mut sale, now);
    lifecycle::ensure_accepting(&sale, now)?;

    if sale.is_genesis() && get_pledge(env, sale_id, participant) == 0 {
        return Err(Error::NoPointsPledged);
    }

    let prior = get_commitment(env, sale_id, participant);
    if prior == 0 && amount < sale.min_purchase {
        return Err(Error::BelowMinimum);
    }
    let committed = prior.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;
    if committed > sale.max_purchase {
        return Err(Error::AboveMaximum);
    }
    let raised = sale
        .raised
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    if raised > sale.hard_cap {
        return Err(Error::HardCapExceeded);
    }

    ledger.transfer(participant, &env.current_contract_address(), amount)?;

    if prior == 0 {
        set_participant_at(env, sale_id, sale.participant_count, participant);
        sale.participant_count += 1;
    }
    set_commitment(env, sale_id, participant, committed);
    sale.raised = raised;
    events::committed(env, sale_id, participant, amount, raised);

    if raised == sale.hard_cap && !sale.hard_cap_reached {
        sale.hard_cap_reached = true;
        events::hard_cap_reached(env, sale_id, raised);
    }
    set_sale(env, &sale);
    Ok(committed)
}

/// Idempotent: returns the status after the call whether or not it changed.
pub fn close_if_due(env: &Env, sale_id: u64) -> Result<SaleStatus, Error> {
    let mut sale = get_sale(env, sale_id)?;
    let now = get_ledger_timestamp(env);
    let activated = lifecycle::sync_status(env, &mut sale, now);
    let closed = lifecycle::close_if_due(env, &mut sale, now)?;
    if activated || closed {
        set_sale(env, &sale);
    }
    Ok(sale.status)
}

pub fn participant_view(
    env: &Env,
    sale_id: u64,
    participant: &Address,
) -> Result<ParticipantView, Error> {
    get_sale(env, sale_id)?;
    Ok(ParticipantView {
        committed: get_commitment(env, sale_id, participant),
        points_pledged: get_pledge(env, sale_id, participant),
    })
}
