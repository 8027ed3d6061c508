//! Pure sizing math for borrow and repay amounts.
//!
//! All arithmetic runs in `U256` and truncates toward zero, so a plan never
//! rounds up past what the position can support.

use alloy::primitives::{Address, I256, U256};
use tracing::warn;

use crate::core::{
    error::{FlowError, FlowResult},
    types::{BorrowPlan, LendingPosition, PriceQuote, RepayPlan, SafetyMargin},
};

/// Size a borrow against the position's remaining capacity.
///
/// Computes `floor(available * margin / rate)` where `rate` is the quote's
/// fixed-point value, yielding an amount in the borrow token's smallest unit.
pub fn plan_borrow(
    position: &LendingPosition,
    quote: &PriceQuote,
    margin: SafetyMargin,
    token: Address,
) -> FlowResult<BorrowPlan> {
    let rate = positive_rate(quote)?;
    let scale = rate_scale(quote.decimals)?;

    if margin.is_full() {
        warn!(
            margin = %margin,
            "planning with no safety margin, position will sit at its borrow limit"
        );
    }

    let numerator = position
        .available_borrow_value
        .checked_mul(U256::from(margin.bps()))
        .ok_or(FlowError::MathOverflow)?
        .checked_mul(scale)
        .ok_or(FlowError::MathOverflow)?;
    let denominator = rate
        .checked_mul(U256::from(SafetyMargin::SCALE))
        .ok_or(FlowError::MathOverflow)?;

    Ok(BorrowPlan {
        token,
        amount: numerator / denominator,
        margin,
    })
}

/// Convert outstanding debt value into the token amount that clears it.
///
/// Computes `floor(total_debt * rate_scale / rate)`. Combined with the
/// pool's clamp-at-zero repayment semantics the truncation can only leave
/// dust behind, never over-draw the payer.
pub fn plan_repay(
    position: &LendingPosition,
    quote: &PriceQuote,
    token: Address,
) -> FlowResult<RepayPlan> {
    let rate = positive_rate(quote)?;
    let scale = rate_scale(quote.decimals)?;

    let numerator = position
        .total_debt_value
        .checked_mul(scale)
        .ok_or(FlowError::MathOverflow)?;

    Ok(RepayPlan {
        token,
        amount: numerator / rate,
    })
}

/// Reject non-positive oracle answers before they reach any division.
fn positive_rate(quote: &PriceQuote) -> FlowResult<U256> {
    if quote.rate <= I256::ZERO {
        return Err(FlowError::InvalidQuote(format!(
            "oracle answer {} is not positive",
            quote.rate
        )));
    }
    Ok(quote.rate.unsigned_abs())
}

fn rate_scale(decimals: u8) -> FlowResult<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(FlowError::MathOverflow)
}
