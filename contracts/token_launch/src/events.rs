// Event stream for indexers. Topics are (name, sale_id) except contract-wide ones.

use crate::types::{AllocationCategory, ParticipantOutcome, Sale, SaleStatus, Settlement};
use soroban_sdk::{symbol_short, Address, Env};

pub fn initialized(env: &Env, admin: &Address, operator: &Address) {
    env.events()
        .publish((symbol_short!("init"),), (admin.clone(), operator.clone()));
}

pub fn operator_set(env: &Env, operator: &Address) {
    env.events()
        .publish((symbol_short!("op_set"),), (operator.clone(),));
}

pub fn sale_created(env: &Env, sale: &Sale) {
    env.events().publish(
        (symbol_short!("sale_new"), sale.id),
        (
            sale.creator.clone(),
            sale.is_genesis(),
            sale.hard_cap,
            sale.soft_cap,
            sale.start_time,
            sale.end_time,
        ),
    );
}

pub fn activated(env: &Env, sale_id: u64, now: u64) {
    env.events()
        .publish((symbol_short!("activated"), sale_id), now);
}

pub fn points_pledged(env: &Env, sale_id: u64, participant: &Address, points: i128, total: i128) {
    env.events().publish(
        (symbol_short!("pledge"), sale_id),
        (participant.clone(), points, total),
    );
}

pub fn committed(env: &Env, sale_id: u64, participant: &Address, amount: i128, raised: i128) {
    env.events().publish(
        (symbol_short!("commit"), sale_id),
        (participant.clone(), amount, raised),
    );
}

pub fn hard_cap_reached(env: &Env, sale_id: u64, raised: i128) {
    env.events()
        .publish((symbol_short!("capped"), sale_id), raised);
}

pub fn closed(env: &Env, sale_id: u64, status: SaleStatus, raised: i128) {
    env.events()
        .publish((symbol_short!("closed"), sale_id), (status, raised));
}

pub fn participant_settled(
    env: &Env,
    sale_id: u64,
    participant: &Address,
    outcome: &ParticipantOutcome,
) {
    env.events().publish(
        (symbol_short!("settle"), sale_id),
        (participant.clone(), outcome.tokens, outcome.refund),
    );
}

pub fn settlement_retry(env: &Env, sale_id: u64, participant: &Address) {
    env.events()
        .publish((symbol_short!("retry"), sale_id), participant.clone());
}

pub fn allocation_granted(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("grant"), sale_id),
        (holder.clone(), category, amount),
    );
}

pub fn proceeds_released(env: &Env, sale_id: u64, treasury: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("proceeds"), sale_id),
        (treasury.clone(), amount),
    );
}

pub fn unsold_returned(env: &Env, sale_id: u64, treasury: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("unsold"), sale_id),
        (treasury.clone(), amount),
    );
}

pub fn settlement_completed(env: &Env, sale_id: u64, settlement: &Settlement) {
    env.events().publish(
        (symbol_short!("set_done"), sale_id),
        (
            settlement.outcome,
            settlement.total_allocated,
            settlement.total_refunded,
            settlement.proceeds,
        ),
    );
}

pub fn claimed(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
    amount: i128,
    claimed_total: i128,
) {
    env.events().publish(
        (symbol_short!("claim"), sale_id),
        (holder.clone(), category, amount, claimed_total),
    );
}
