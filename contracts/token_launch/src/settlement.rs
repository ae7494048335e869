//! # Settlement
//!
//! Turns a closed sale into final allocations and refunds, in batches, so a
//! sale with any number of participants settles across several invocations.
//!
//! Each participant is an atomic unit: the outcome marker (and allocation) is
//! written first, then the refund leaves escrow. If the refund transfer fails
//! the marker is removed again and the participant is picked up on the next
//! pass; nobody else is rolled back. A participant with a marker is skipped,
//! which is what makes re-running settlement after a crash safe.
//!
//! Successful genesis sales first measure demand: the raw entitlements of
//! everyone who committed are summed, a batch at a time, and the resulting
//! dilution factor is persisted with the progress record so every later pass
//! scales entitlements identically. Distribution starts only once the factor
//! is fixed.

use crate::errors::Error;
use crate::events;
use crate::lifecycle;
use crate::storage::*;
use crate::transfer::AssetLedger;
use crate::types::*;
use fp_math::{
    apply_dilution, dilution_factor, proportional_share, split_commitment, Dilution, Fill,
};
use soroban_sdk::{Address, Env};

/// Participants scanned per call when the caller passes zero.
pub const DEFAULT_SETTLEMENT_BATCH: u32 = 50;

pub struct SettlementEngine<'a, C: AssetLedger, T: AssetLedger> {
    env: &'a Env,
    escrow: Address,
    commit_ledger: C,
    sale_ledger: T,
}

impl<'a, C: AssetLedger, T: AssetLedger> SettlementEngine<'a, C, T> {
    pub fn new(env: &'a Env, commit_ledger: C, sale_ledger: T) -> Self {
        SettlementEngine {
            env,
            escrow: env.current_contract_address(),
            commit_ledger,
            sale_ledger,
        }
    }

    /// Runs one settlement pass of at most `max_batch` participants.
    pub fn run(&self, sale_id: u64, max_batch: u32) -> Result<SettlementReport, Error> {
        let mut sale = get_sale(self.env, sale_id)?;
        match lifecycle::ensure_settleable(&sale) {
            Err(Error::AlreadySettled) => {
                return Ok(SettlementReport {
                    state: SettlementState::AlreadySettled,
                    processed: 0,
                    pending_retry: 0,
                    remaining: 0,
                })
            }
            other => other?,
        }

        let now = get_ledger_timestamp(self.env);
        let mut settlement = match get_settlement(self.env, sale_id) {
            Some(settlement) => settlement,
            None => self.begin(&sale, now)?,
        };
        let batch = if max_batch == 0 {
            DEFAULT_SETTLEMENT_BATCH
        } else {
            max_batch
        };

        let count = sale.participant_count;
        let mut scanned = 0u32;
        if !settlement.demand_measured {
            scanned = self.measure_demand(&sale, &mut settlement, batch)?;
            if !settlement.demand_measured {
                set_settlement(self.env, sale_id, &settlement);
                return Ok(SettlementReport {
                    state: SettlementState::InProgress,
                    processed: 0,
                    pending_retry: 0,
                    remaining: count,
                });
            }
        }

        let mut processed = 0u32;
        let mut pending_retry = 0u32;
        while scanned < batch && settlement.cursor < count {
            let index = settlement.cursor;
            settlement.cursor += 1;
            scanned += 1;

            let participant = match get_participant_at(self.env, sale_id, index) {
                Some(participant) => participant,
                None => break,
            };
            match self.settle_participant(&sale, &mut settlement, &participant, now) {
                Ok(_) => processed += 1,
                Err(Error::AlreadySettled) => {}
                Err(Error::TransferFailed) => {
                    pending_retry += 1;
                    events::settlement_retry(self.env, sale_id, &participant);
                }
                Err(err) => return Err(err),
            }
        }
        // Wrapped with stragglers left: the next pass starts over.
        if settlement.cursor >= count && settlement.settled_count < count {
            settlement.cursor = 0;
        }

        let mut state = SettlementState::InProgress;
        if settlement.settled_count == count {
            let failed_steps = self.complete(&sale, &mut settlement);
            pending_retry += failed_steps;
            if failed_steps == 0 {
                lifecycle::transition(&mut sale, SaleStatus::Settled)?;
                settlement.completed_at = now;
                set_sale(self.env, &sale);
                events::settlement_completed(self.env, sale_id, &settlement);
                state = SettlementState::Completed;
            }
        }
        set_settlement(self.env, sale_id, &settlement);

        Ok(SettlementReport {
            state,
            processed,
            pending_retry,
            remaining: count - settlement.settled_count,
        })
    }

    fn begin(&self, sale: &Sale, now: u64) -> Result<Settlement, Error> {
        // Only successful genesis sales can be diluted.
        let needs_measuring = sale.is_genesis() && sale.status == SaleStatus::Successful;
        Ok(Settlement {
            outcome: sale.status,
            cursor: 0,
            settled_count: 0,
            demand_measured: !needs_measuring,
            raw_demand: 0,
            dilution: Dilution::NONE.into(),
            total_allocated: 0,
            total_refunded: 0,
            proceeds: 0,
            proceeds_released: false,
            unsold_returned: false,
            grants_issued: false,
            started_at: now,
            completed_at: 0,
        })
    }

    /// Sums raw entitlements of committed participants, at most `batch` per
    /// call, then fixes the dilution factor. Pledgers who never committed
    /// hold no demand. Returns how many participants were scanned.
    fn measure_demand(
        &self,
        sale: &Sale,
        settlement: &mut Settlement,
        batch: u32,
    ) -> Result<u32, Error> {
        let mut scanned = 0u32;
        while scanned < batch && settlement.cursor < sale.participant_count {
            let index = settlement.cursor;
            settlement.cursor += 1;
            scanned += 1;

            let participant = match get_participant_at(self.env, sale.id, index) {
                Some(participant) => participant,
                None => continue,
            };
            let raw = self.raw_entitlement(sale, &participant)?.unwrap_or(0);
            settlement.raw_demand = settlement
                .raw_demand
                .checked_add(raw)
                .ok_or(Error::ArithmeticOverflow)?;
        }

        if settlement.cursor >= sale.participant_count {
            settlement.dilution =
                dilution_factor(sale.allocable_pool, settlement.raw_demand)?.into();
            settlement.demand_measured = true;
            settlement.cursor = 0;
        }
        Ok(scanned)
    }

    fn raw_entitlement(&self, sale: &Sale, participant: &Address) -> Result<Option<i128>, Error> {
        let terms = match sale.kind.terms() {
            Some(terms) => terms,
            None => return Ok(None),
        };
        let raw = proportional_share(
            get_pledge(self.env, sale.id, participant),
            sale.total_points,
            terms.max_supply_fraction_bps,
            terms.total_supply,
            terms.per_participant_cap_bps,
        )?;
        Ok(Some(raw))
    }

    fn entitlement(
        &self,
        sale: &Sale,
        settlement: &Settlement,
        participant: &Address,
    ) -> Result<Option<i128>, Error> {
        match self.raw_entitlement(sale, participant)? {
            Some(raw) => Ok(Some(apply_dilution(raw, &settlement.dilution.into())?)),
            None => Ok(None),
        }
    }

    pub fn settle_participant(
        &self,
        sale: &Sale,
        settlement: &mut Settlement,
        participant: &Address,
        now: u64,
    ) -> Result<ParticipantOutcome, Error> {
        if get_outcome(self.env, sale.id, participant).is_some() {
            return Err(Error::AlreadySettled);
        }

        let committed = get_commitment(self.env, sale.id, participant);
        let fill = match settlement.outcome {
            SaleStatus::Successful => {
                let entitlement = self.entitlement(sale, settlement, participant)?;
                split_commitment(committed, sale.price, entitlement)?
            }
            _ => Fill {
                tokens: 0,
                cost: 0,
                refund: committed,
            },
        };
        let total_allocated = settlement
            .total_allocated
            .checked_add(fill.tokens)
            .ok_or(Error::ArithmeticOverflow)?;
        let total_refunded = settlement
            .total_refunded
            .checked_add(fill.refund)
            .ok_or(Error::ArithmeticOverflow)?;
        let proceeds = settlement
            .proceeds
            .checked_add(fill.cost)
            .ok_or(Error::ArithmeticOverflow)?;

        let outcome = ParticipantOutcome {
            committed,
            tokens: fill.tokens,
            cost: fill.cost,
            refund: fill.refund,
            settled_at: now,
        };
        set_outcome(self.env, sale.id, participant, &outcome);
        if fill.tokens > 0 {
            set_allocation(
                self.env,
                &Allocation {
                    holder: participant.clone(),
                    sale_id: sale.id,
                    category: AllocationCategory::PublicSale,
                    token_amount: fill.tokens,
                    claimed_amount: 0,
                    grant_time: sale.closed_at,
                },
            );
        }

        if let Err(err) = self
            .commit_ledger
            .transfer(&self.escrow, participant, fill.refund)
        {
            remove_outcome(self.env, sale.id, participant);
            if fill.tokens > 0 {
                remove_allocation(
                    self.env,
                    sale.id,
                    participant,
                    AllocationCategory::PublicSale,
                );
            }
            return Err(err);
        }

        settlement.settled_count += 1;
        settlement.total_allocated = total_allocated;
        settlement.total_refunded = total_refunded;
        settlement.proceeds = proceeds;
        events::participant_settled(self.env, sale.id, participant, &outcome);
        Ok(outcome)
    }

    /// Sale-level steps once every participant is settled. Each step has its
    /// own flag; returns how many are still outstanding.
    fn complete(&self, sale: &Sale, settlement: &mut Settlement) -> u32 {
        let mut outstanding = 0u32;
        let succeeded = settlement.outcome == SaleStatus::Successful;

        if !settlement.proceeds_released {
            let proceeds = if succeeded { settlement.proceeds } else { 0 };
            match self
                .commit_ledger
                .transfer(&self.escrow, &sale.treasury, proceeds)
            {
                Ok(()) => {
                    settlement.proceeds_released = true;
                    if proceeds > 0 {
                        events::proceeds_released(self.env, sale.id, &sale.treasury, proceeds);
                    }
                }
                Err(_) => outstanding += 1,
            }
        }

        if !settlement.grants_issued {
            if succeeded {
                self.issue_grants(sale);
            }
            settlement.grants_issued = true;
        }

        if !settlement.unsold_returned {
            // Failed sales hand back the grant reserve as well.
            let unsold = if succeeded {
                sale.allocable_pool - settlement.total_allocated
            } else {
                sale.allocable_pool + sale.grant_reserve()
            };
            match self.sale_ledger.transfer(&self.escrow, &sale.treasury, unsold) {
                Ok(()) => {
                    settlement.unsold_returned = true;
                    if unsold > 0 {
                        events::unsold_returned(self.env, sale.id, &sale.treasury, unsold);
                    }
                }
                Err(_) => outstanding += 1,
            }
        }

        outstanding
    }

    fn issue_grants(&self, sale: &Sale) {
        for grant in sale.grants.iter() {
            if has_allocation(self.env, sale.id, &grant.beneficiary, grant.category) {
                continue;
            }
            set_allocation(
                self.env,
                &Allocation {
                    holder: grant.beneficiary.clone(),
                    sale_id: sale.id,
                    category: grant.category,
                    token_amount: grant.amount,
                    claimed_amount: 0,
                    grant_time: sale.closed_at,
                },
            );
            events::allocation_granted(
                self.env,
                sale.id,
                &grant.beneficiary,
                grant.category,
                grant.amount,
            );
        }
    }
}
