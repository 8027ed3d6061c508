use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    chain::{ChainPort, Pool},
    client::ApprovalService,
    core::{Confirmation, FlowResult, TokenAmount, DEFAULT_REFERRAL_CODE},
};

/// Service for locking collateral into the pool
pub struct CollateralService {
    account: Address,
    approvals: ApprovalService,
}

impl CollateralService {
    pub fn new(chain: Arc<dyn ChainPort>, account: Address) -> Self {
        Self {
            account,
            approvals: ApprovalService::new(chain, account),
        }
    }

    /// Deposit `amount` of `token` as collateral.
    ///
    /// The pool pulls the tokens itself, so it must already hold an
    /// allowance covering `amount`.
    pub async fn deposit(
        &self,
        pool: &dyn Pool,
        token: Address,
        amount: U256,
    ) -> FlowResult<Confirmation> {
        let confirmation = pool
            .deposit(token, amount, self.account, DEFAULT_REFERRAL_CODE)
            .await?;

        info!(
            %token,
            %amount,
            block = confirmation.block_number,
            "collateral deposited"
        );

        Ok(confirmation)
    }

    /// Approve and deposit a batch of collateral entries in order.
    ///
    /// Entries settle one at a time and the batch stops at the first entry
    /// that cannot be locked; earlier deposits stay in place.
    pub async fn deposit_many(
        &self,
        pool: &dyn Pool,
        entries: &[TokenAmount],
    ) -> FlowResult<Vec<Confirmation>> {
        let mut confirmations = Vec::with_capacity(entries.len());

        for entry in entries {
            self.approvals
                .approve(entry.token, pool.address(), entry.amount)
                .await?;
            confirmations.push(self.deposit(pool, entry.token, entry.amount).await?);
        }

        Ok(confirmations)
    }
}
