use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    chain::ChainPort,
    core::{Confirmation, FlowResult},
};

/// Service for ERC-20 spending grants
pub struct ApprovalService {
    chain: Arc<dyn ChainPort>,
    account: Address,
}

impl ApprovalService {
    pub fn new(chain: Arc<dyn ChainPort>, account: Address) -> Self {
        Self { chain, account }
    }

    /// Grant `spender` the right to move `amount` of `token` from the
    /// signer's balance.
    ///
    /// Grants overwrite rather than accumulate: the allowance after this
    /// call is exactly `amount` no matter what was approved before.
    pub async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> FlowResult<Confirmation> {
        let confirmation = self.chain.token(token).approve(spender, amount).await?;

        info!(
            %token,
            owner = %self.account,
            %spender,
            %amount,
            block = confirmation.block_number,
            "approval confirmed"
        );

        Ok(confirmation)
    }
}
