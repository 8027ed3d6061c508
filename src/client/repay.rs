use std::sync::Arc;

use alloy::primitives::Address;
use tracing::info;

use crate::{
    chain::{ChainPort, Pool},
    client::ApprovalService,
    core::{Confirmation, FlowError, FlowResult, RepayPlan, INTEREST_RATE_MODE_STABLE},
};

/// Service for debt repayment
pub struct RepayService {
    account: Address,
    approvals: ApprovalService,
}

impl RepayService {
    pub fn new(chain: Arc<dyn ChainPort>, account: Address) -> Self {
        Self {
            account,
            approvals: ApprovalService::new(chain, account),
        }
    }

    /// Approve the pool for the planned amount, then pay the debt down.
    ///
    /// The pool clamps amounts past the outstanding debt, so a plan sized
    /// off a slightly stale debt read settles the position instead of
    /// failing.
    pub async fn execute(&self, pool: &dyn Pool, plan: &RepayPlan) -> FlowResult<Confirmation> {
        if plan.amount.is_zero() {
            return Err(FlowError::RepayFailure(
                "planned amount is zero, no outstanding debt".to_string(),
            ));
        }

        self.approvals
            .approve(plan.token, pool.address(), plan.amount)
            .await?;

        let confirmation = pool
            .repay(plan.token, plan.amount, INTEREST_RATE_MODE_STABLE, self.account)
            .await?;

        info!(
            token = %plan.token,
            amount = %plan.amount,
            block = confirmation.block_number,
            "repay confirmed"
        );

        Ok(confirmation)
    }
}
