use alloy::primitives::Address;
use tracing::info;

use crate::{
    chain::Pool,
    core::{
        BorrowPlan, Confirmation, FlowError, FlowResult, DEFAULT_REFERRAL_CODE,
        INTEREST_RATE_MODE_STABLE,
    },
};

/// Service for borrow execution
pub struct BorrowService {
    account: Address,
}

impl BorrowService {
    pub fn new(account: Address) -> Self {
        Self { account }
    }

    /// Draw the planned amount from the pool as stable-rate debt.
    ///
    /// Zero-sized plans are rejected up front; the pool would revert on
    /// them anyway, this just names the real problem.
    pub async fn execute(&self, pool: &dyn Pool, plan: &BorrowPlan) -> FlowResult<Confirmation> {
        if plan.amount.is_zero() {
            return Err(FlowError::BorrowFailure(
                "planned amount is zero, position has no spare capacity".to_string(),
            ));
        }

        let confirmation = pool
            .borrow(
                plan.token,
                plan.amount,
                INTEREST_RATE_MODE_STABLE,
                DEFAULT_REFERRAL_CODE,
                self.account,
            )
            .await?;

        info!(
            token = %plan.token,
            amount = %plan.amount,
            margin = %plan.margin,
            block = confirmation.block_number,
            "borrow confirmed"
        );

        Ok(confirmation)
    }
}
