//! In-memory chain double for workflow tests.
//!
//! Implements every contract role over one shared ledger: token balances,
//! overwrite-style allowances, a pool that values collateral one-to-one in
//! its base currency, a settable price feed, and a constant-rate router.
//! Every landed transaction advances the block clock, so confirmation
//! ordering and deadline behavior are observable from tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lendflow::{
    chain::{
        AddressesProvider, ChainPort, FungibleToken, Pool, PriceFeed, SwapRouter, WrappedNative,
        REQUIRED_CONFIRMATIONS,
    },
    prelude::{Address, B256, I256, U256},
    Allowance, Confirmation, FeedRound, FlowError, FlowResult, LendingPosition, NetworkConfig,
    SwapOrder, WorkflowSettings,
};

pub const SIGNER: Address = Address::repeat_byte(0x5A);
pub const REGISTRY: Address = Address::repeat_byte(0xAA);
pub const POOL: Address = Address::repeat_byte(0xB0);
pub const WETH: Address = Address::repeat_byte(0x1E);
pub const DAI: Address = Address::repeat_byte(0xDA);
pub const FEED: Address = Address::repeat_byte(0xFE);
pub const ROUTER: Address = Address::repeat_byte(0x90);

pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
pub const BLOCK_INTERVAL_SECS: u64 = 12;

/// Loan-to-value the mock pool grants on deposited collateral.
pub const LTV_BPS: u64 = 8_000;
const LIQUIDATION_THRESHOLD_BPS: u64 = 8_250;

/// Output tokens per input token quoted by the mock router.
pub const SWAP_RATE: u64 = 2_000;

/// Default feed answer: 0.0005 base-currency per borrow token, 18 decimals.
pub const FEED_ANSWER: i64 = 500_000_000_000_000;
pub const FEED_DECIMALS: u8 = 18;

pub fn test_network() -> NetworkConfig {
    NetworkConfig {
        chain_id: 31_337,
        addresses_provider: REGISTRY,
        collateral_token: WETH,
        borrow_token: DAI,
        price_feed: FEED,
        swap_router: ROUTER,
        pool_fee: 3_000,
    }
}

pub fn test_settings() -> WorkflowSettings {
    WorkflowSettings {
        deposit_amount: U256::from(100_000_000_000_000_000u128),
        safety_margin_bps: 9_500,
        oracle_max_age_secs: 3_600,
        swap_amount_in: U256::from(100_000_000_000_000_000u128),
        swap_amount_out_minimum: U256::ZERO,
    }
}

struct ChainState {
    signer: Address,
    pool_address: Address,
    timestamp: u64,
    block_number: u64,
    /// Extra seconds between submission and landing, on top of the block
    /// interval.
    latency_secs: u64,
    nonce: u64,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    collateral_value: HashMap<Address, U256>,
    debt_value: HashMap<Address, U256>,
    feed_answer: I256,
    feed_decimals: u8,
    feed_updated_at: u64,
    feed_round_id: u128,
    borrow_calls: u64,
    orders: Vec<SwapOrder>,
}

impl ChainState {
    fn land(&mut self) -> Confirmation {
        self.block_number += 1;
        self.timestamp += BLOCK_INTERVAL_SECS + self.latency_secs;
        self.nonce += 1;

        Confirmation {
            tx_hash: B256::from(U256::from(self.nonce).to_be_bytes::<32>()),
            block_number: self.block_number,
            confirmations: REQUIRED_CONFIRMATIONS,
        }
    }

    fn balance(&self, token: Address, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn credit(&mut self, token: Address, holder: Address, amount: U256) {
        *self.balances.entry((token, holder)).or_default() += amount;
    }

    fn debit(&mut self, token: Address, holder: Address, amount: U256) {
        let entry = self.balances.entry((token, holder)).or_default();
        *entry -= amount;
    }

    fn spend_allowance(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        let entry = self.allowances.entry((token, owner, spender)).or_default();
        *entry -= amount;
    }

    fn capacity(&self, account: Address) -> U256 {
        let collateral = self
            .collateral_value
            .get(&account)
            .copied()
            .unwrap_or_default();
        let debt = self.debt_value.get(&account).copied().unwrap_or_default();
        (collateral * U256::from(LTV_BPS) / U256::from(10_000u64)).saturating_sub(debt)
    }

    fn rate(&self) -> U256 {
        self.feed_answer.unsigned_abs()
    }

    fn rate_scale(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.feed_decimals))
    }

    fn value_of(&self, amount: U256) -> U256 {
        amount * self.rate() / self.rate_scale()
    }

    fn tokens_for_value(&self, value: U256) -> U256 {
        value * self.rate_scale() / self.rate()
    }
}

#[derive(Clone)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                signer: SIGNER,
                pool_address: POOL,
                timestamp: GENESIS_TIMESTAMP,
                block_number: 100,
                latency_secs: 0,
                nonce: 0,
                balances: HashMap::new(),
                allowances: HashMap::new(),
                collateral_value: HashMap::new(),
                debt_value: HashMap::new(),
                feed_answer: I256::try_from(FEED_ANSWER).unwrap(),
                feed_decimals: FEED_DECIMALS,
                feed_updated_at: GENESIS_TIMESTAMP,
                feed_round_id: 1,
                borrow_calls: 0,
                orders: Vec::new(),
            })),
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.state.lock().unwrap().timestamp
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.state.lock().unwrap().balance(token, holder)
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Allowance {
        Allowance {
            token,
            owner,
            spender,
            amount: self.state.lock().unwrap().allowance(token, owner, spender),
        }
    }

    /// Mint tokens straight into a balance, bypassing any transaction.
    pub fn mint(&self, token: Address, holder: Address, amount: U256) {
        self.state.lock().unwrap().credit(token, holder, amount);
    }

    pub fn position_values(&self, account: Address) -> (U256, U256) {
        let state = self.state.lock().unwrap();
        (
            state
                .collateral_value
                .get(&account)
                .copied()
                .unwrap_or_default(),
            state.debt_value.get(&account).copied().unwrap_or_default(),
        )
    }

    pub fn set_feed_answer(&self, answer: I256) {
        self.state.lock().unwrap().feed_answer = answer;
    }

    pub fn set_feed_updated_at(&self, updated_at: u64) {
        self.state.lock().unwrap().feed_updated_at = updated_at;
    }

    pub fn set_latency(&self, secs: u64) {
        self.state.lock().unwrap().latency_secs = secs;
    }

    pub fn set_pool_address(&self, address: Address) {
        self.state.lock().unwrap().pool_address = address;
    }

    pub fn borrow_calls(&self) -> u64 {
        self.state.lock().unwrap().borrow_calls
    }

    pub fn orders(&self) -> Vec<SwapOrder> {
        self.state.lock().unwrap().orders.clone()
    }
}

#[async_trait]
impl ChainPort for MockChain {
    fn addresses_provider(&self, _address: Address) -> Arc<dyn AddressesProvider> {
        Arc::new(MockAddressesProvider {
            state: self.state.clone(),
        })
    }

    fn pool(&self, address: Address) -> Arc<dyn Pool> {
        Arc::new(MockPool {
            state: self.state.clone(),
            address,
        })
    }

    fn token(&self, address: Address) -> Arc<dyn FungibleToken> {
        Arc::new(MockToken {
            state: self.state.clone(),
            address,
        })
    }

    fn wrapped_native(&self, address: Address) -> Arc<dyn WrappedNative> {
        Arc::new(MockToken {
            state: self.state.clone(),
            address,
        })
    }

    fn price_feed(&self, _address: Address) -> Arc<dyn PriceFeed> {
        Arc::new(MockFeed {
            state: self.state.clone(),
        })
    }

    fn swap_router(&self, address: Address) -> Arc<dyn SwapRouter> {
        Arc::new(MockRouter {
            state: self.state.clone(),
            address,
        })
    }

    async fn latest_block_timestamp(&self) -> FlowResult<u64> {
        Ok(self.state.lock().unwrap().timestamp)
    }
}

struct MockAddressesProvider {
    state: Arc<Mutex<ChainState>>,
}

#[async_trait]
impl AddressesProvider for MockAddressesProvider {
    async fn get_pool(&self) -> FlowResult<Address> {
        Ok(self.state.lock().unwrap().pool_address)
    }
}

struct MockToken {
    state: Arc<Mutex<ChainState>>,
    address: Address,
}

#[async_trait]
impl FungibleToken for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn approve(&self, spender: Address, amount: U256) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        let owner = state.signer;
        state.allowances.insert((self.address, owner, spender), amount);
        Ok(state.land())
    }

    async fn balance_of(&self, account: Address) -> FlowResult<U256> {
        Ok(self.state.lock().unwrap().balance(self.address, account))
    }
}

#[async_trait]
impl WrappedNative for MockToken {
    async fn wrap(&self, amount: U256) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        let signer = state.signer;
        state.credit(self.address, signer, amount);
        Ok(state.land())
    }
}

struct MockPool {
    state: Arc<Mutex<ChainState>>,
    address: Address,
}

#[async_trait]
impl Pool for MockPool {
    fn address(&self) -> Address {
        self.address
    }

    async fn deposit(
        &self,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        _referral_code: u16,
    ) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        let sender = state.signer;

        if state.allowance(asset, sender, self.address) < amount {
            return Err(FlowError::DepositFailure(format!(
                "allowance below {}",
                amount
            )));
        }
        if state.balance(asset, sender) < amount {
            return Err(FlowError::DepositFailure(format!(
                "balance below {}",
                amount
            )));
        }

        state.spend_allowance(asset, sender, self.address, amount);
        state.debit(asset, sender, amount);
        *state.collateral_value.entry(on_behalf_of).or_default() += amount;

        Ok(state.land())
    }

    async fn borrow(
        &self,
        asset: Address,
        amount: U256,
        _interest_rate_mode: u64,
        _referral_code: u16,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        state.borrow_calls += 1;

        let value = state.value_of(amount);
        if value > state.capacity(on_behalf_of) {
            return Err(FlowError::BorrowFailure(format!(
                "requested value {} exceeds capacity",
                value
            )));
        }

        *state.debt_value.entry(on_behalf_of).or_default() += value;
        let sender = state.signer;
        state.credit(asset, sender, amount);

        Ok(state.land())
    }

    async fn repay(
        &self,
        asset: Address,
        amount: U256,
        _interest_rate_mode: u64,
        on_behalf_of: Address,
    ) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        let sender = state.signer;

        let debt = state
            .debt_value
            .get(&on_behalf_of)
            .copied()
            .unwrap_or_default();
        let value = state.value_of(amount);

        // Payments past the outstanding debt are clamped; only the tokens
        // covering the debt are pulled.
        let (tokens_used, remaining_debt) = if value >= debt {
            (state.tokens_for_value(debt), U256::ZERO)
        } else {
            (amount, debt - value)
        };

        if state.allowance(asset, sender, self.address) < tokens_used {
            return Err(FlowError::RepayFailure(format!(
                "allowance below {}",
                tokens_used
            )));
        }
        if state.balance(asset, sender) < tokens_used {
            return Err(FlowError::RepayFailure(format!(
                "balance below {}",
                tokens_used
            )));
        }

        state.spend_allowance(asset, sender, self.address, tokens_used);
        state.debit(asset, sender, tokens_used);
        state.debt_value.insert(on_behalf_of, remaining_debt);

        Ok(state.land())
    }

    async fn get_user_account_data(&self, account: Address) -> FlowResult<LendingPosition> {
        let state = self.state.lock().unwrap();
        let collateral = state
            .collateral_value
            .get(&account)
            .copied()
            .unwrap_or_default();
        let debt = state.debt_value.get(&account).copied().unwrap_or_default();

        let health_factor = if debt.is_zero() {
            U256::MAX
        } else {
            collateral * U256::from(LIQUIDATION_THRESHOLD_BPS)
                * U256::from(10u64).pow(U256::from(18u64))
                / (U256::from(10_000u64) * debt)
        };

        Ok(LendingPosition {
            total_collateral_value: collateral,
            total_debt_value: debt,
            available_borrow_value: state.capacity(account),
            current_liquidation_threshold: U256::from(LIQUIDATION_THRESHOLD_BPS),
            ltv: U256::from(LTV_BPS),
            health_factor,
        })
    }
}

struct MockFeed {
    state: Arc<Mutex<ChainState>>,
}

#[async_trait]
impl PriceFeed for MockFeed {
    async fn latest_round(&self) -> FlowResult<FeedRound> {
        let state = self.state.lock().unwrap();
        Ok(FeedRound {
            round_id: state.feed_round_id,
            answer: state.feed_answer,
            updated_at: state.feed_updated_at,
        })
    }

    async fn decimals(&self) -> FlowResult<u8> {
        Ok(self.state.lock().unwrap().feed_decimals)
    }
}

struct MockRouter {
    state: Arc<Mutex<ChainState>>,
    address: Address,
}

#[async_trait]
impl SwapRouter for MockRouter {
    fn address(&self) -> Address {
        self.address
    }

    async fn exact_input_single(&self, order: &SwapOrder) -> FlowResult<Confirmation> {
        let mut state = self.state.lock().unwrap();
        state.orders.push(*order);

        let landing_timestamp = state.timestamp + BLOCK_INTERVAL_SECS + state.latency_secs;
        if landing_timestamp >= order.deadline {
            return Err(FlowError::DeadlineExpired {
                deadline: order.deadline,
                landed_at: landing_timestamp,
            });
        }

        let sender = state.signer;
        if state.allowance(order.token_in, sender, self.address) < order.amount_in {
            return Err(FlowError::SwapFailure(format!(
                "allowance below {}",
                order.amount_in
            )));
        }
        if state.balance(order.token_in, sender) < order.amount_in {
            return Err(FlowError::SwapFailure(format!(
                "balance below {}",
                order.amount_in
            )));
        }

        let amount_out = order.amount_in * U256::from(SWAP_RATE);
        if amount_out < order.amount_out_minimum {
            return Err(FlowError::SwapFailure(format!(
                "output {} below minimum {}",
                amount_out, order.amount_out_minimum
            )));
        }

        state.spend_allowance(order.token_in, sender, self.address, order.amount_in);
        state.debit(order.token_in, sender, order.amount_in);
        state.credit(order.token_out, order.recipient, amount_out);

        Ok(state.land())
    }
}
