//! Contract role abstractions (Ports in Hexagonal Architecture)
//!
//! Each deployed contract the workflows touch is modeled as a narrow role
//! trait. Services and workflows only ever see these traits, so the same
//! orchestration runs against a live chain adapter or an in-memory one.

pub mod evm;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::core::{Confirmation, FeedRound, FlowResult, LendingPosition, SwapOrder};

pub use evm::EvmChain;

/// Confirmations a state-changing call must accumulate before any dependent
/// step may run.
pub const REQUIRED_CONFIRMATIONS: u64 = 1;

/// Registry role - resolves the market's current pool address
#[async_trait]
pub trait AddressesProvider: Send + Sync {
    /// Address of the currently deployed pool
    async fn get_pool(&self) -> FlowResult<Address>;
}

/// Lending pool role
#[async_trait]
pub trait Pool: Send + Sync {
    /// Address dependent approvals must target
    fn address(&self) -> Address;

    /// Lock `amount` of `asset` as collateral for `on_behalf_of`
    async fn deposit(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u16,
    ) -> FlowResult<Confirmation>;

    /// Draw a loan against deposited collateral
    async fn borrow(
        &self,
        asset: Address,
        amount: U256,
        interest_rate_mode: u64,
        referral_code: u16,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation>;

    /// Pay down outstanding debt; amounts past the debt are clamped, the
    /// balance never goes negative
    async fn repay(
        &self,
        asset: Address,
        amount: U256,
        interest_rate_mode: u64,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation>;

    /// Aggregated account snapshot in the market's base currency
    async fn get_user_account_data(&self, account: Address) -> FlowResult<LendingPosition>;
}

/// ERC-20 token role
#[async_trait]
pub trait FungibleToken: Send + Sync {
    fn address(&self) -> Address;

    /// Grant `spender` the right to move `amount`; overwrites any prior grant
    async fn approve(&self, spender: Address, amount: U256) -> FlowResult<Confirmation>;

    async fn balance_of(&self, account: Address) -> FlowResult<U256>;
}

/// Wrapped native token role
#[async_trait]
pub trait WrappedNative: FungibleToken {
    /// Mint wrapped units one-for-one against attached native value
    async fn wrap(&self, amount: U256) -> FlowResult<Confirmation>;
}

/// Price feed role
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Most recent round, unvalidated
    async fn latest_round(&self) -> FlowResult<FeedRound>;

    /// Fixed-point scale of the feed's answers
    async fn decimals(&self) -> FlowResult<u8>;
}

/// Swap router role
#[async_trait]
pub trait SwapRouter: Send + Sync {
    fn address(&self) -> Address;

    /// Execute a single-hop exact-input swap
    async fn exact_input_single(&self, order: &SwapOrder) -> FlowResult<Confirmation>;
}

/// Chain port - binds contract addresses to role handles and answers
/// chain-level queries that belong to no single contract
#[async_trait]
pub trait ChainPort: Send + Sync {
    fn addresses_provider(&self, address: Address) -> Arc<dyn AddressesProvider>;

    fn pool(&self, address: Address) -> Arc<dyn Pool>;

    fn token(&self, address: Address) -> Arc<dyn FungibleToken>;

    fn wrapped_native(&self, address: Address) -> Arc<dyn WrappedNative>;

    fn price_feed(&self, address: Address) -> Arc<dyn PriceFeed>;

    fn swap_router(&self, address: Address) -> Arc<dyn SwapRouter>;

    /// Timestamp of the latest block, used for staleness checks and
    /// deadline computation
    async fn latest_block_timestamp(&self) -> FlowResult<u64>;
}
