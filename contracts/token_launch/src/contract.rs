use crate::errors::Error;
use crate::events;
use crate::guard::with_sale_lock;
use crate::ledger;
use crate::lifecycle;
use crate::settlement::SettlementEngine;
use crate::storage::*;
use crate::transfer::TokenLedger;
use crate::types::*;
use crate::vesting;
use soroban_sdk::{contract, contractimpl, contractmeta, Address, Env, Vec};

// Metadata that is added on to every WASM custom section
contractmeta!(
    key = "Description",
    val = "Genesis and standard token launches with settlement and vesting"
);

#[contract]
pub struct TokenLaunchContract;

fn require_operator(env: &Env) -> Result<(), Error> {
    let config = get_config(env)?;
    config.operator.require_auth();
    Ok(())
}

#[contractimpl]
impl TokenLaunchContract {
    /// Initialize the launch contract
    pub fn initialize(env: Env, admin: Address, operator: Address) -> Result<(), Error> {
        if has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        set_config(
            &env,
            &Config {
                admin: admin.clone(),
                operator: operator.clone(),
            },
        );
        set_sale_count(&env, 0);
        events::initialized(&env, &admin, &operator);
        Ok(())
    }

    /// Replace the scheduler allowed to close and settle sales
    pub fn set_operator(env: Env, operator: Address) -> Result<(), Error> {
        let mut config = get_config(&env)?;
        config.admin.require_auth();

        config.operator = operator.clone();
        set_config(&env, &config);
        events::operator_set(&env, &operator);
        Ok(())
    }

    /// Launch a sale; escrows the pool and grant reserve from the creator
    pub fn create_sale(env: Env, creator: Address, params: SaleParams) -> Result<u64, Error> {
        get_config(&env)?;
        creator.require_auth();
        ledger::open_sale(&env, &creator, params)
    }

    /// Pledge genesis points; returns the participant's pledged total
    pub fn pledge_points(
        env: Env,
        sale_id: u64,
        participant: Address,
        points: i128,
    ) -> Result<i128, Error> {
        participant.require_auth();
        with_sale_lock(&env, sale_id, || {
            ledger::pledge_points(&env, sale_id, &participant, points)
        })
    }

    /// Commit funds; returns the participant's committed total
    pub fn commit(
        env: Env,
        sale_id: u64,
        participant: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        participant.require_auth();
        with_sale_lock(&env, sale_id, || {
            ledger::commit(&env, sale_id, &participant, amount)
        })
    }

    pub fn close_if_due(env: Env, sale_id: u64) -> Result<SaleStatus, Error> {
        require_operator(&env)?;
        with_sale_lock(&env, sale_id, || ledger::close_if_due(&env, sale_id))
    }

    /// Settle up to `max_batch` participants (0 = default batch)
    pub fn run_settlement(
        env: Env,
        sale_id: u64,
        max_batch: u32,
    ) -> Result<SettlementReport, Error> {
        require_operator(&env)?;
        with_sale_lock(&env, sale_id, || {
            let sale = get_sale(&env, sale_id)?;
            let engine = SettlementEngine::new(
                &env,
                TokenLedger::new(&env, &sale.commit_token),
                TokenLedger::new(&env, &sale.sale_token),
            );
            engine.run(sale_id, max_batch)
        })
    }

    /// Claim vested tokens; returns 0 when nothing new has unlocked
    pub fn claim(
        env: Env,
        sale_id: u64,
        holder: Address,
        category: AllocationCategory,
    ) -> Result<i128, Error> {
        holder.require_auth();
        with_sale_lock(&env, sale_id, || {
            let sale = get_sale(&env, sale_id)?;
            let ledger = TokenLedger::new(&env, &sale.sale_token);
            vesting::claim(&env, &ledger, sale_id, &holder, category)
        })
    }

    // View functions
    pub fn get_config(env: Env) -> Result<Config, Error> {
        get_config(&env)
    }

    pub fn sale_count(env: Env) -> u64 {
        get_sale_count(&env)
    }

    /// Sale as of the current ledger time; a sale whose window has opened
    /// reads as Active before any command has touched it.
    pub fn get_sale(env: Env, sale_id: u64) -> Result<Sale, Error> {
        let mut sale = get_sale(&env, sale_id)?;
        sale.status = lifecycle::effective_status(&sale, get_ledger_timestamp(&env));
        Ok(sale)
    }

    /// Up to `limit` participants in join order, starting at `start`.
    pub fn get_participants(env: Env, sale_id: u64, start: u32, limit: u32) -> Vec<Address> {
        let mut page = Vec::new(&env);
        let count = get_sale(&env, sale_id)
            .map(|sale| sale.participant_count)
            .unwrap_or(0);
        let end = start.saturating_add(limit).min(count);
        for index in start..end {
            if let Some(participant) = get_participant_at(&env, sale_id, index) {
                page.push_back(participant);
            }
        }
        page
    }

    pub fn get_participant(
        env: Env,
        sale_id: u64,
        participant: Address,
    ) -> Result<ParticipantView, Error> {
        ledger::participant_view(&env, sale_id, &participant)
    }

    pub fn get_allocation(
        env: Env,
        sale_id: u64,
        holder: Address,
        category: AllocationCategory,
    ) -> Result<AllocationView, Error> {
        vesting::allocation_view(&env, sale_id, &holder, category)
    }

    pub fn get_settlement(env: Env, sale_id: u64) -> Option<Settlement> {
        get_settlement(&env, sale_id)
    }

    pub fn get_outcome(env: Env, sale_id: u64, participant: Address) -> Option<ParticipantOutcome> {
        get_outcome(&env, sale_id, &participant)
    }
}
