use std::sync::Arc;

use alloy::primitives::{aliases::U160, Address, U256};
use tracing::info;

use crate::{
    chain::ChainPort,
    core::{Confirmation, FlowResult, SwapOrder},
};

/// Seconds between reading the chain clock and the deadline stamped on an
/// order. An order that has not landed within this window is dropped by the
/// router instead of executing at whatever the price has drifted to.
pub const SWAP_DEADLINE_WINDOW_SECS: u64 = 1_200;

/// Service for single-hop exact-input swaps
pub struct SwapService {
    chain: Arc<dyn ChainPort>,
    account: Address,
}

impl SwapService {
    pub fn new(chain: Arc<dyn ChainPort>, account: Address) -> Self {
        Self { chain, account }
    }

    /// Build and execute an exact-input order against `router`.
    ///
    /// The deadline is the latest block timestamp plus the fixed window,
    /// computed fresh for every order. Output goes to the signer account.
    pub async fn swap_exact_in(
        &self,
        router: Address,
        token_in: Address,
        token_out: Address,
        fee_tier: u32,
        amount_in: U256,
        amount_out_minimum: U256,
    ) -> FlowResult<Confirmation> {
        let now = self.chain.latest_block_timestamp().await?;

        let order = SwapOrder {
            token_in,
            token_out,
            fee_tier,
            recipient: self.account,
            deadline: now + SWAP_DEADLINE_WINDOW_SECS,
            amount_in,
            amount_out_minimum,
            price_limit: U160::ZERO,
        };

        info!(
            %token_in,
            %token_out,
            amount_in = %amount_in,
            deadline = order.deadline,
            "submitting swap"
        );

        let confirmation = self
            .chain
            .swap_router(router)
            .exact_input_single(&order)
            .await?;

        info!(
            tx = %confirmation.tx_hash,
            block = confirmation.block_number,
            "swap confirmed"
        );

        Ok(confirmation)
    }
}
