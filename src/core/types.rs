use std::fmt;

use alloy::primitives::{aliases::U160, Address, B256, I256, U256};

use crate::core::error::{FlowError, FlowResult};

/// Interest rate mode passed to the pool for borrow and repay.
///
/// The lending protocol encodes stable-rate debt as mode 1; this client only
/// ever opens stable positions.
pub const INTEREST_RATE_MODE_STABLE: u64 = 1;

/// Referral code sent with deposits and borrows. Retired by the protocol,
/// always zero.
pub const DEFAULT_REFERRAL_CODE: u16 = 0;

/// A quantity of a specific ERC-20 token, in the token's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub token: Address,
    pub amount: U256,
}

impl TokenAmount {
    pub fn new(token: Address, amount: U256) -> Self {
        Self { token, amount }
    }
}

/// A spending grant from `owner` to `spender` on `token`.
///
/// Grants overwrite: approving a new amount replaces whatever was in place,
/// it never accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// Account-level snapshot returned by the pool, all values denominated in
/// the protocol's base currency (wei of the quote asset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LendingPosition {
    pub total_collateral_value: U256,
    pub total_debt_value: U256,
    pub available_borrow_value: U256,
    pub current_liquidation_threshold: U256,
    pub ltv: U256,
    pub health_factor: U256,
}

impl LendingPosition {
    /// Whether the account carries any outstanding debt.
    pub fn has_debt(&self) -> bool {
        !self.total_debt_value.is_zero()
    }
}

/// Raw readout of a price feed's most recent round, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRound {
    pub round_id: u128,
    pub answer: I256,
    pub updated_at: u64,
}

/// A validated price observation: `rate` is a fixed-point value scaled by
/// `10^decimals`, quoting the borrow asset in the collateral's base currency.
///
/// `rate` keeps the feed's signed representation; anything dividing by it
/// must reject non-positive values first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub rate: I256,
    pub decimals: u8,
    pub round_id: u128,
    pub updated_at: u64,
}

/// Fraction of borrowing capacity to actually use, in basis points.
///
/// Zero is rejected outright; the full 10000 is accepted but leaves no
/// buffer against liquidation, so callers get warned when they plan with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyMargin(u32);

impl SafetyMargin {
    /// Basis points in a whole.
    pub const SCALE: u32 = 10_000;

    pub fn new(bps: u32) -> FlowResult<Self> {
        if bps == 0 || bps > Self::SCALE {
            return Err(FlowError::InvalidConfig(format!(
                "safety margin must be within (0, {}] basis points, got {}",
                Self::SCALE,
                bps
            )));
        }
        Ok(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    /// True when the margin consumes the entire borrowing capacity.
    pub fn is_full(&self) -> bool {
        self.0 == Self::SCALE
    }
}

impl fmt::Display for SafetyMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// Planned borrow: how much of `token` to draw, and the margin it was
/// planned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowPlan {
    pub token: Address,
    pub amount: U256,
    pub margin: SafetyMargin,
}

/// Planned repayment covering the full outstanding debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepayPlan {
    pub token: Address,
    pub amount: U256,
}

/// Parameters for a single-hop exact-input swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOrder {
    pub token_in: Address,
    pub token_out: Address,
    /// Fee tier of the target pool, in hundredths of a basis point.
    pub fee_tier: u32,
    pub recipient: Address,
    /// Unix timestamp the swap must land strictly before.
    pub deadline: u64,
    pub amount_in: U256,
    /// Minimum acceptable output; zero disables slippage protection.
    pub amount_out_minimum: U256,
    /// Price bound for the pool; zero disables the limit.
    pub price_limit: U160,
}

/// Proof that a state-changing transaction landed with the required number
/// of confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: B256,
    pub block_number: u64,
    pub confirmations: u64,
}

/// Identifies where in a workflow an operation ran, for failure attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    AcquireFunds,
    ResolvePool,
    ApproveCollateral,
    DepositCollateral,
    QueryPosition,
    FetchQuote,
    PlanBorrow,
    ExecuteBorrow,
    PlanRepay,
    ExecuteRepay,
    ReportBalances,
    ApproveRouter,
    ExecuteSwap,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::AcquireFunds => "acquire-funds",
            WorkflowStep::ResolvePool => "resolve-pool",
            WorkflowStep::ApproveCollateral => "approve-collateral",
            WorkflowStep::DepositCollateral => "deposit-collateral",
            WorkflowStep::QueryPosition => "query-position",
            WorkflowStep::FetchQuote => "fetch-quote",
            WorkflowStep::PlanBorrow => "plan-borrow",
            WorkflowStep::ExecuteBorrow => "execute-borrow",
            WorkflowStep::PlanRepay => "plan-repay",
            WorkflowStep::ExecuteRepay => "execute-repay",
            WorkflowStep::ReportBalances => "report-balances",
            WorkflowStep::ApproveRouter => "approve-router",
            WorkflowStep::ExecuteSwap => "execute-swap",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
