use std::sync::Arc;

use alloy::primitives::Address;
use tracing::info;

use crate::{
    chain::{ChainPort, Pool},
    core::{FlowError, FlowResult, LendingPosition},
};

/// Service for pool resolution and account health queries
pub struct PoolService {
    chain: Arc<dyn ChainPort>,
}

impl PoolService {
    pub fn new(chain: Arc<dyn ChainPort>) -> Self {
        Self { chain }
    }

    /// Resolve the market's current pool through its registry.
    ///
    /// The pool address is never configured directly; the registry is the
    /// single source of truth so upgrades do not strand clients on a stale
    /// deployment.
    pub async fn resolve(&self, addresses_provider: Address) -> FlowResult<Arc<dyn Pool>> {
        let registry = self.chain.addresses_provider(addresses_provider);
        let address = registry.get_pool().await?;

        if address == Address::ZERO {
            return Err(FlowError::ResolutionFailure(format!(
                "registry {} returned the zero address",
                addresses_provider
            )));
        }

        info!(pool = %address, registry = %addresses_provider, "resolved lending pool");
        Ok(self.chain.pool(address))
    }

    /// Snapshot of the account's collateral, debt and remaining borrow
    /// capacity, in the market's base currency.
    pub async fn position(
        &self,
        pool: &dyn Pool,
        account: Address,
    ) -> FlowResult<LendingPosition> {
        let position = pool.get_user_account_data(account).await?;

        info!(
            collateral = %position.total_collateral_value,
            debt = %position.total_debt_value,
            available = %position.available_borrow_value,
            health_factor = %position.health_factor,
            "account position"
        );

        Ok(position)
    }
}
