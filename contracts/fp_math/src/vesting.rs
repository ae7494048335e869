//! Cliff + linear vesting.
//!
//! Nothing unlocks before `grant_time + cliff`. After the cliff the total
//! unlocks linearly over `vesting_months`, at second granularity. With
//! `vesting_months == 0` everything unlocks at the cliff, and with both at
//! zero everything unlocks at grant time.

/// Calendar-agnostic month used by every schedule.
pub const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

/// Upper bound accepted for cliffs and vesting periods (100 years).
pub const MAX_VESTING_MONTHS: u32 = 1_200;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Schedule {
    pub cliff_months: u32,
    pub vesting_months: u32,
}

impl Schedule {
    pub fn new(cliff_months: u32, vesting_months: u32) -> Self {
        Schedule {
            cliff_months,
            vesting_months,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.cliff_months <= MAX_VESTING_MONTHS && self.vesting_months <= MAX_VESTING_MONTHS
    }

    pub fn cliff_end(&self, grant_time: u64) -> u64 {
        grant_time.saturating_add(self.cliff_months as u64 * SECONDS_PER_MONTH)
    }

    pub fn duration(&self) -> u64 {
        self.vesting_months as u64 * SECONDS_PER_MONTH
    }

    pub fn fully_vested_at(&self, grant_time: u64) -> u64 {
        self.cliff_end(grant_time).saturating_add(self.duration())
    }
}

/// Amount of `total` unlocked at `now`. Non-decreasing in `now`, never above
/// `total`.
pub fn vested_amount(total: i128, grant_time: u64, schedule: Schedule, now: u64) -> i128 {
    if total <= 0 {
        return 0;
    }
    let cliff_end = schedule.cliff_end(grant_time);
    if now < cliff_end {
        return 0;
    }
    let duration = schedule.duration();
    let elapsed = now - cliff_end;
    if duration == 0 || elapsed >= duration {
        return total;
    }
    scale_floor(total, elapsed, duration)
}

/// Unlocked amount not yet claimed; zero when nothing new has vested.
pub fn claimable_amount(
    total: i128,
    claimed: i128,
    grant_time: u64,
    schedule: Schedule,
    now: u64,
) -> i128 {
    let vested = vested_amount(total, grant_time, schedule, now);
    vested.saturating_sub(claimed).max(0)
}

// floor(total * part / whole) for part < whole, without the wide product.
fn scale_floor(total: i128, part: u64, whole: u64) -> i128 {
    let part = part as i128;
    let whole = whole as i128;
    (total / whole) * part + (total % whole) * part / whole
}
