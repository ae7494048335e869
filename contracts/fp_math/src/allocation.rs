//! Sale allocation arithmetic.
//!
//! Genesis sales allocate by points: each pledger is entitled to a slice of
//! `total_supply * max_supply_fraction` proportional to their points, capped
//! per participant. When the entitlements add up to more than the pool, one
//! shared [`Dilution`] factor scales every entitlement down. Standard sales
//! allocate `committed / price`.

use crate::{bps_of, mul_div_floor, MathError, MathResult, BPS_DENOMINATOR};

/// Shared scale factor `numerator / denominator`, never above one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dilution {
    pub numerator: i128,
    pub denominator: i128,
}

impl Dilution {
    pub const NONE: Dilution = Dilution {
        numerator: 1,
        denominator: 1,
    };

    pub fn is_diluted(&self) -> bool {
        self.numerator < self.denominator
    }
}

/// What one participant ends up with out of their commitment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Fill {
    pub tokens: i128,
    pub cost: i128,
    pub refund: i128,
}

/// Raw (pre-dilution) genesis entitlement of a pledger.
///
/// `total_supply * max_supply_fraction * points / total_points`, with the
/// single truncating division done last, then capped at
/// `total_supply * per_participant_cap`.
pub fn proportional_share(
    points: i128,
    total_points: i128,
    max_supply_fraction_bps: u32,
    total_supply: i128,
    per_participant_cap_bps: u32,
) -> MathResult<i128> {
    if points < 0 || total_points < 0 || total_supply < 0 {
        return Err(MathError::Underflow);
    }
    if points == 0 || total_points == 0 {
        return Ok(0);
    }
    if points > total_points {
        return Err(MathError::Overflow);
    }

    let numerator = total_supply
        .checked_mul(max_supply_fraction_bps as i128)
        .and_then(|v| v.checked_mul(points))
        .ok_or(MathError::Overflow)?;
    let denominator = BPS_DENOMINATOR
        .checked_mul(total_points)
        .ok_or(MathError::Overflow)?;
    let raw = numerator / denominator;

    let cap = bps_of(total_supply, per_participant_cap_bps)?;
    Ok(raw.min(cap))
}

/// Scale factor bringing `total_raw` down to `pool`, or [`Dilution::NONE`]
/// when the pool already covers every entitlement.
pub fn dilution_factor(pool: i128, total_raw: i128) -> MathResult<Dilution> {
    if pool < 0 || total_raw < 0 {
        return Err(MathError::Underflow);
    }
    if total_raw > pool {
        Ok(Dilution {
            numerator: pool,
            denominator: total_raw,
        })
    } else {
        Ok(Dilution::NONE)
    }
}

/// Rounds down; the dust stays in the pool.
pub fn apply_dilution(raw: i128, dilution: &Dilution) -> MathResult<i128> {
    mul_div_floor(raw, dilution.numerator, dilution.denominator)
}

/// Whole tokens bought by `amount` at `price`, plus the unspent residual.
pub fn tokens_for_commitment(amount: i128, price: i128) -> MathResult<(i128, i128)> {
    if price <= 0 {
        return Err(MathError::DivisionByZero);
    }
    if amount < 0 {
        return Err(MathError::Underflow);
    }
    Ok((amount / price, amount % price))
}

pub fn allocation_cost(tokens: i128, price: i128) -> MathResult<i128> {
    if tokens < 0 || price < 0 {
        return Err(MathError::Underflow);
    }
    tokens.checked_mul(price).ok_or(MathError::Overflow)
}

pub fn refund_amount(committed: i128, cost: i128) -> MathResult<i128> {
    if cost < 0 || cost > committed {
        return Err(MathError::Underflow);
    }
    Ok(committed - cost)
}

/// Splits a commitment into tokens, spent cost and refund.
///
/// `entitlement` is the diluted genesis entitlement; `None` for standard
/// sales, where the commitment alone decides the token amount.
pub fn split_commitment(
    committed: i128,
    price: i128,
    entitlement: Option<i128>,
) -> MathResult<Fill> {
    let (affordable, _) = tokens_for_commitment(committed, price)?;
    let tokens = match entitlement {
        Some(entitled) => affordable.min(entitled.max(0)),
        None => affordable,
    };
    let cost = allocation_cost(tokens, price)?;
    let refund = refund_amount(committed, cost)?;
    Ok(Fill {
        tokens,
        cost,
        refund,
    })
}
