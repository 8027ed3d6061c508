//! Live chain adapter over an alloy provider.
//!
//! Each role handle wraps a typed contract instance bound to one address.
//! State-changing calls block until the transaction has accumulated
//! [`REQUIRED_CONFIRMATIONS`](super::REQUIRED_CONFIRMATIONS) and surface
//! reverts as the failing operation's error.

use std::sync::Arc;

use alloy::{
    eips::BlockNumberOrTag,
    network::Ethereum,
    primitives::{aliases::U24, Address, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider},
};
use async_trait::async_trait;

use crate::{
    chain::{
        AddressesProvider, ChainPort, FungibleToken, Pool, PriceFeed, SwapRouter, WrappedNative,
        REQUIRED_CONFIRMATIONS,
    },
    contracts::{IAddressesProvider, IAggregatorV3, IERC20, IPool, ISwapRouter, IWrappedNative},
    core::{Confirmation, FeedRound, FlowError, FlowResult, LendingPosition, SwapOrder},
};

/// Chain port implementation backed by a JSON-RPC provider with a local
/// signer attached.
#[derive(Clone)]
pub struct EvmChain {
    provider: DynProvider,
}

impl EvmChain {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ChainPort for EvmChain {
    fn addresses_provider(&self, address: Address) -> Arc<dyn AddressesProvider> {
        Arc::new(EvmAddressesProvider {
            inner: IAddressesProvider::new(address, self.provider.clone()),
        })
    }

    fn pool(&self, address: Address) -> Arc<dyn Pool> {
        Arc::new(EvmPool {
            inner: IPool::new(address, self.provider.clone()),
        })
    }

    fn token(&self, address: Address) -> Arc<dyn FungibleToken> {
        Arc::new(EvmToken {
            inner: IERC20::new(address, self.provider.clone()),
        })
    }

    fn wrapped_native(&self, address: Address) -> Arc<dyn WrappedNative> {
        Arc::new(EvmWrappedNative {
            inner: IWrappedNative::new(address, self.provider.clone()),
        })
    }

    fn price_feed(&self, address: Address) -> Arc<dyn PriceFeed> {
        Arc::new(EvmFeed {
            inner: IAggregatorV3::new(address, self.provider.clone()),
        })
    }

    fn swap_router(&self, address: Address) -> Arc<dyn SwapRouter> {
        Arc::new(EvmRouter {
            inner: ISwapRouter::new(address, self.provider.clone()),
        })
    }

    async fn latest_block_timestamp(&self) -> FlowResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| FlowError::Rpc(format!("latest block: {}", e)))?
            .ok_or_else(|| FlowError::Rpc("latest block not available".to_string()))?;
        Ok(block.header.timestamp)
    }
}

/// Drive a submitted transaction to the confirmation depth dependent steps
/// require, mapping every failure through the operation's error constructor.
async fn wait_confirmed(
    sent: Result<PendingTransactionBuilder<Ethereum>, alloy::contract::Error>,
    label: &str,
    err: fn(String) -> FlowError,
) -> FlowResult<Confirmation> {
    let receipt = sent
        .map_err(|e| err(format!("{}: {}", label, e)))?
        .with_required_confirmations(REQUIRED_CONFIRMATIONS)
        .get_receipt()
        .await
        .map_err(|e| err(format!("{}: {}", label, e)))?;

    if !receipt.status() {
        return Err(err(format!(
            "{}: transaction {} reverted",
            label, receipt.transaction_hash
        )));
    }

    Ok(Confirmation {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number.unwrap_or_default(),
        confirmations: REQUIRED_CONFIRMATIONS,
    })
}

struct EvmAddressesProvider {
    inner: IAddressesProvider::IAddressesProviderInstance<DynProvider>,
}

#[async_trait]
impl AddressesProvider for EvmAddressesProvider {
    async fn get_pool(&self) -> FlowResult<Address> {
        self.inner
            .getLendingPool()
            .call()
            .await
            .map_err(|e| FlowError::ResolutionFailure(format!("getLendingPool: {}", e)))
    }
}

struct EvmPool {
    inner: IPool::IPoolInstance<DynProvider>,
}

#[async_trait]
impl Pool for EvmPool {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    async fn deposit(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> FlowResult<Confirmation> {
        wait_confirmed(
            self.inner
                .deposit(asset, amount, on_behalf_of, referral_code)
                .send()
                .await,
            "deposit",
            FlowError::DepositFailure,
        )
        .await
    }

    async fn borrow(
        &self,
        asset: Address,
        amount: U256,
        interest_rate_mode: u64,
        referral_code: u16,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation> {
        wait_confirmed(
            self.inner
                .borrow(
                    asset,
                    amount,
                    U256::from(interest_rate_mode),
                    referral_code,
                    on_behalf_of,
                )
                .send()
                .await,
            "borrow",
            FlowError::BorrowFailure,
        )
        .await
    }

    async fn repay(
        &self,
        asset: Address,
        amount: U256,
        interest_rate_mode: u64,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation> {
        wait_confirmed(
            self.inner
                .repay(asset, amount, U256::from(interest_rate_mode), on_behalf_of)
                .send()
                .await,
            "repay",
            FlowError::RepayFailure,
        )
        .await
    }

    async fn get_user_account_data(&self, account: Address) -> FlowResult<LendingPosition> {
        let data = self
            .inner
            .getUserAccountData(account)
            .call()
            .await
            .map_err(|e| FlowError::Rpc(format!("getUserAccountData: {}", e)))?;

        Ok(LendingPosition {
            total_collateral_value: data.totalCollateralETH,
            total_debt_value: data.totalDebtETH,
            available_borrow_value: data.availableBorrowsETH,
            current_liquidation_threshold: data.currentLiquidationThreshold,
            ltv: data.ltv,
            health_factor: data.healthFactor,
        })
    }
}

struct EvmToken {
    inner: IERC20::IERC20Instance<DynProvider>,
}

#[async_trait]
impl FungibleToken for EvmToken {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    async fn approve(&self, spender: Address, amount: U256) -> FlowResult<Confirmation> {
        wait_confirmed(
            self.inner.approve(spender, amount).send().await,
            "approve",
            FlowError::ApprovalFailure,
        )
        .await
    }

    async fn balance_of(&self, account: Address) -> FlowResult<U256> {
        self.inner
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| FlowError::Rpc(format!("balanceOf: {}", e)))
    }
}

struct EvmWrappedNative {
    inner: IWrappedNative::IWrappedNativeInstance<DynProvider>,
}

#[async_trait]
impl FungibleToken for EvmWrappedNative {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    async fn approve(&self, spender: Address, amount: U256) -> FlowResult<Confirmation> {
        wait_confirmed(
            self.inner.approve(spender, amount).send().await,
            "approve",
            FlowError::ApprovalFailure,
        )
        .await
    }

    async fn balance_of(&self, account: Address) -> FlowResult<U256> {
        self.inner
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| FlowError::Rpc(format!("balanceOf: {}", e)))
    }
}

#[async_trait]
impl WrappedNative for EvmWrappedNative {
    async fn wrap(&self, amount: U256) -> FlowResult<Confirmation> {
        // Wrapping is a payable no-arg call; the minted amount rides along
        // as transaction value.
        wait_confirmed(
            self.inner.deposit().value(amount).send().await,
            "wrap",
            FlowError::Rpc,
        )
        .await
    }
}

struct EvmFeed {
    inner: IAggregatorV3::IAggregatorV3Instance<DynProvider>,
}

#[async_trait]
impl PriceFeed for EvmFeed {
    async fn latest_round(&self) -> FlowResult<FeedRound> {
        let round = self
            .inner
            .latestRoundData()
            .call()
            .await
            .map_err(|e| FlowError::OracleUnavailable(format!("latestRoundData: {}", e)))?;

        Ok(FeedRound {
            round_id: round.roundId.to::<u128>(),
            answer: round.answer,
            updated_at: round.updatedAt.saturating_to::<u64>(),
        })
    }

    async fn decimals(&self) -> FlowResult<u8> {
        self.inner
            .decimals()
            .call()
            .await
            .map_err(|e| FlowError::OracleUnavailable(format!("decimals: {}", e)))
    }
}

struct EvmRouter {
    inner: ISwapRouter::ISwapRouterInstance<DynProvider>,
}

#[async_trait]
impl SwapRouter for EvmRouter {
    fn address(&self) -> Address {
        *self.inner.address()
    }

    async fn exact_input_single(&self, order: &SwapOrder) -> FlowResult<Confirmation> {
        let fee = U24::try_from(order.fee_tier).map_err(|_| {
            FlowError::SwapFailure(format!("fee tier {} does not fit uint24", order.fee_tier))
        })?;

        let params = ISwapRouter::ExactInputSingleParams {
            tokenIn: order.token_in,
            tokenOut: order.token_out,
            fee,
            recipient: order.recipient,
            deadline: U256::from(order.deadline),
            amountIn: order.amount_in,
            amountOutMinimum: order.amount_out_minimum,
            sqrtPriceLimitX96: order.price_limit,
        };

        wait_confirmed(
            self.inner.exactInputSingle(params).send().await,
            "exactInputSingle",
            FlowError::SwapFailure,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use alloy::{primitives::aliases::U160, providers::ProviderBuilder};

    use super::*;

    /// Provider over a lazy HTTP transport; the checks under test fail
    /// before any request is sent.
    fn detached_chain() -> EvmChain {
        let provider = ProviderBuilder::new()
            .connect_http("http://127.0.0.1:1".parse().unwrap())
            .erased();
        EvmChain::new(provider)
    }

    #[tokio::test]
    async fn test_fee_tier_wider_than_uint24_is_rejected() {
        let chain = detached_chain();
        let router = chain.swap_router(Address::repeat_byte(0x90));

        let order = SwapOrder {
            token_in: Address::repeat_byte(0x1e),
            token_out: Address::repeat_byte(0xda),
            fee_tier: 1 << 24,
            recipient: Address::repeat_byte(0x5a),
            deadline: 0,
            amount_in: U256::from(1u64),
            amount_out_minimum: U256::ZERO,
            price_limit: U160::ZERO,
        };

        let err = router.exact_input_single(&order).await.unwrap_err();
        match err {
            FlowError::SwapFailure(msg) => assert!(msg.contains("uint24")),
            other => panic!("expected a swap failure, got {other}"),
        }
    }
}
