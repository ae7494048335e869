//! # fp-math
//!
//! Integer fixed-point arithmetic for token launches: proportional shares,
//! dilution, price conversion and vesting schedules.
//!
//! Amounts are `i128` base units (the Soroban token convention). Fractions are
//! basis points over [`BPS_DENOMINATOR`]. Every division rounds down, so a
//! computed allocation never exceeds its exact rational value.
#![cfg_attr(not(test), no_std)]

pub mod allocation;
pub mod vesting;

pub use allocation::{
    allocation_cost, apply_dilution, dilution_factor, proportional_share, refund_amount,
    split_commitment, tokens_for_commitment, Dilution, Fill,
};
pub use vesting::{claimable_amount, vested_amount, Schedule, MAX_VESTING_MONTHS, SECONDS_PER_MONTH};

/// 100% expressed in basis points.
pub const BPS_DENOMINATOR: i128 = 10_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MathError {
    Overflow,
    DivisionByZero,
    /// A negative operand, or a result that would go below zero.
    Underflow,
}

pub type MathResult<T> = Result<T, MathError>;

/// `a * b / denominator`, rounded down. All operands must be non-negative.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> MathResult<i128> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    if a < 0 || b < 0 || denominator < 0 {
        return Err(MathError::Underflow);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    Ok(product / denominator)
}

/// `amount * bps / 10_000`, rounded down.
pub fn bps_of(amount: i128, bps: u32) -> MathResult<i128> {
    mul_div_floor(amount, bps as i128, BPS_DENOMINATOR)
}
