use crate::errors::Error;
use crate::types::*;
use soroban_sdk::{Address, Env};

pub fn get_config(env: &Env) -> Result<Config, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_sale_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::SaleCount)
        .unwrap_or(0)
}

pub fn set_sale_count(env: &Env, count: u64) {
    env.storage().instance().set(&DataKey::SaleCount, &count);
}

pub fn get_sale(env: &Env, sale_id: u64) -> Result<Sale, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Sale(sale_id))
        .ok_or(Error::SaleNotFound)
}

pub fn set_sale(env: &Env, sale: &Sale) {
    env.storage()
        .persistent()
        .set(&DataKey::Sale(sale.id), sale);
}

/// Participants are stored one per key, in join order; `Sale::participant_count`
/// is the length.
pub fn get_participant_at(env: &Env, sale_id: u64, index: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Participant(sale_id, index))
}

pub fn set_participant_at(env: &Env, sale_id: u64, index: u32, participant: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Participant(sale_id, index), participant);
}

pub fn get_commitment(env: &Env, sale_id: u64, participant: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Commitment(sale_id, participant.clone()))
        .unwrap_or(0)
}

pub fn set_commitment(env: &Env, sale_id: u64, participant: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Commitment(sale_id, participant.clone()), &amount);
}

pub fn get_pledge(env: &Env, sale_id: u64, participant: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Pledge(sale_id, participant.clone()))
        .unwrap_or(0)
}

pub fn set_pledge(env: &Env, sale_id: u64, participant: &Address, points: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Pledge(sale_id, participant.clone()), &points);
}

pub fn get_outcome(env: &Env, sale_id: u64, participant: &Address) -> Option<ParticipantOutcome> {
    env.storage()
        .persistent()
        .get(&DataKey::Outcome(sale_id, participant.clone()))
}

pub fn set_outcome(env: &Env, sale_id: u64, participant: &Address, outcome: &ParticipantOutcome) {
    env.storage()
        .persistent()
        .set(&DataKey::Outcome(sale_id, participant.clone()), outcome);
}

pub fn remove_outcome(env: &Env, sale_id: u64, participant: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Outcome(sale_id, participant.clone()));
}

pub fn get_allocation(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
) -> Option<Allocation> {
    env.storage()
        .persistent()
        .get(&DataKey::Allocation(sale_id, holder.clone(), category))
}

pub fn has_allocation(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Allocation(sale_id, holder.clone(), category))
}

pub fn set_allocation(env: &Env, allocation: &Allocation) {
    env.storage().persistent().set(
        &DataKey::Allocation(
            allocation.sale_id,
            allocation.holder.clone(),
            allocation.category,
        ),
        allocation,
    );
}

pub fn remove_allocation(
    env: &Env,
    sale_id: u64,
    holder: &Address,
    category: AllocationCategory,
) {
    env.storage()
        .persistent()
        .remove(&DataKey::Allocation(sale_id, holder.clone(), category));
}

pub fn get_settlement(env: &Env, sale_id: u64) -> Option<Settlement> {
    env.storage()
        .persistent()
        .get(&DataKey::Settlement(sale_id))
}

pub fn set_settlement(env: &Env, sale_id: u64, settlement: &Settlement) {
    env.storage()
        .persistent()
        .set(&DataKey::Settlement(sale_id), settlement);
}
