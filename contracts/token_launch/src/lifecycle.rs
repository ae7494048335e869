//! Sale lifecycle.
//!
//! ```text
//! Pending --start_time--> Active --close--> Successful | Failed --settle--> Settled
//! ```
//!
//! Pending is promoted lazily by the first call that observes
//! `now >= start_time`. A Pending sale whose window has passed untouched
//! closes directly.

use crate::errors::Error;
use crate::events;
use crate::types::{Sale, SaleStatus};
use soroban_sdk::Env;

fn can_transition(from: SaleStatus, to: SaleStatus) -> bool {
    matches!(
        (from, to),
        (SaleStatus::Pending, SaleStatus::Active)
            | (SaleStatus::Pending, SaleStatus::Successful)
            | (SaleStatus::Pending, SaleStatus::Failed)
            | (SaleStatus::Active, SaleStatus::Successful)
            | (SaleStatus::Active, SaleStatus::Failed)
            | (SaleStatus::Successful, SaleStatus::Settled)
            | (SaleStatus::Failed, SaleStatus::Settled)
    )
}

pub fn transition(sale: &mut Sale, to: SaleStatus) -> Result<(), Error> {
    if !can_transition(sale.status, to) {
        return match to {
            SaleStatus::Settled => Err(Error::SaleNotClosed),
            _ => Err(Error::SaleNotActive),
        };
    }
    sale.status = to;
    Ok(())
}

fn opens(sale: &Sale, now: u64) -> bool {
    sale.status == SaleStatus::Pending && sale.in_window(now)
}

/// Status as observed at `now`, without writing anything. Views report this
/// so a sale nobody has touched since `start_time` reads as Active.
pub fn effective_status(sale: &Sale, now: u64) -> SaleStatus {
    if opens(sale, now) {
        SaleStatus::Active
    } else {
        sale.status
    }
}

/// Promotes Pending to Active once the window has opened.
pub fn sync_status(env: &Env, sale: &mut Sale, now: u64) -> bool {
    if opens(sale, now) {
        sale.status = SaleStatus::Active;
        events::activated(env, sale.id, now);
        return true;
    }
    false
}

/// Guard shared by `pledge_points` and `commit`. A full sale takes neither
/// money nor points, even while its window is still open.
pub fn ensure_accepting(sale: &Sale, now: u64) -> Result<(), Error> {
    if sale.is_closed() || sale.hard_cap_reached {
        return Err(Error::SaleNotActive);
    }
    if !sale.in_window(now) {
        return Err(Error::OutOfWindow);
    }
    if sale.status != SaleStatus::Active {
        return Err(Error::SaleNotActive);
    }
    Ok(())
}

pub fn is_due(sale: &Sale, now: u64) -> bool {
    now >= sale.end_time || (sale.hard_cap_reached && sale.close_on_hard_cap)
}

pub fn closing_status(sale: &Sale) -> SaleStatus {
    if sale.raised >= sale.soft_cap {
        SaleStatus::Successful
    } else {
        SaleStatus::Failed
    }
}

/// Closes the sale if it is open and due. Returns whether anything changed;
/// closed or not-yet-due sales are left alone.
pub fn close_if_due(env: &Env, sale: &mut Sale, now: u64) -> Result<bool, Error> {
    if sale.is_closed() || !is_due(sale, now) {
        return Ok(false);
    }
    let status = closing_status(sale);
    transition(sale, status)?;
    sale.closed_at = now;
    events::closed(env, sale.id, status, sale.raised);
    Ok(true)
}

pub fn ensure_settleable(sale: &Sale) -> Result<(), Error> {
    match sale.status {
        SaleStatus::Successful | SaleStatus::Failed => Ok(()),
        SaleStatus::Settled => Err(Error::AlreadySettled),
        SaleStatus::Pending | SaleStatus::Active => Err(Error::SaleNotClosed),
    }
}
