//! Fixed-point helpers for b-token accounting and yield splitting.
//!
//! b-token conversions mirror the lending pool's exchange rate model:
//! `underlying = b_tokens * b_rate / B_RATE_SCALE`.

use odra::casper_types::U256;
use crate::types::BPS_SCALE;

/// b_rate scale (1e12 = 1 underlying per b-token)
pub const B_RATE_SCALE: u128 = 1_000_000_000_000;

/// Result of splitting an amount between the treasury and members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldSplit {
    pub treasury_amount: U256,
    pub member_amount: U256,
    pub per_member: U256,
    /// Left over from integer division, kept by the distributor
    pub remainder: U256,
}

/// Splits `amount` into the treasury cut and equal member shares.
///
/// Rounds down everywhere: the treasury gets `floor(amount * bps / 10000)`,
/// every member gets `floor(member_amount / member_count)`.
pub fn split_yield(amount: U256, treasury_share_bps: u32, member_count: u32) -> YieldSplit {
    let treasury_amount = amount * U256::from(treasury_share_bps) / U256::from(BPS_SCALE);
    let member_amount = amount - treasury_amount;

    if member_count == 0 {
        return YieldSplit {
            treasury_amount,
            member_amount,
            per_member: U256::zero(),
            remainder: member_amount,
        };
    }

    let per_member = member_amount / U256::from(member_count);
    let remainder = member_amount - per_member * U256::from(member_count);

    YieldSplit {
        treasury_amount,
        member_amount,
        per_member,
        remainder,
    }
}

/// Underlying value of `b_tokens`, rounded down
pub fn b_tokens_to_underlying(b_tokens: U256, b_rate: U256) -> U256 {
    b_tokens * b_rate / U256::from(B_RATE_SCALE)
}

/// b-tokens minted for `amount` of underlying, rounded down
pub fn underlying_to_b_tokens_floor(amount: U256, b_rate: U256) -> U256 {
    if b_rate.is_zero() {
        return U256::zero();
    }
    amount * U256::from(B_RATE_SCALE) / b_rate
}

/// b-tokens burned to release `amount` of underlying, rounded up
pub fn underlying_to_b_tokens_ceil(amount: U256, b_rate: U256) -> U256 {
    if b_rate.is_zero() {
        return U256::zero();
    }
    let numerator = amount * U256::from(B_RATE_SCALE);
    let quotient = numerator / b_rate;
    if (numerator % b_rate).is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}

/// Yield held by a position: value of the b-tokens not needed to back
/// `principal`. Never negative.
pub fn position_yield(b_tokens: U256, b_rate: U256, principal: U256) -> U256 {
    let backing = underlying_to_b_tokens_ceil(principal, b_rate);
    if b_tokens <= backing {
        return U256::zero();
    }
    b_tokens_to_underlying(b_tokens - backing, b_rate)
}
