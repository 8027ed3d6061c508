/// Lending workflow client
///
/// A client SDK for running collateralized-borrow and token-swap workflows
/// against an EVM lending market. Provides high-level abstractions for:
/// - Pool resolution through the market's registry
/// - Collateral approval and deposit
/// - Oracle-priced borrow sizing with a safety margin
/// - Full-debt repayment
/// - Single-hop exact-input swaps
pub mod chain;
pub mod client;
pub mod config;
pub mod contracts;
pub mod core;
pub mod prelude;
pub mod workflow;

pub use chain::{ChainPort, EvmChain, REQUIRED_CONFIRMATIONS};
pub use client::{FlowClient, SWAP_DEADLINE_WINDOW_SECS};
pub use config::{FlowConfig, NetworkConfig, WorkflowSettings};
pub use core::{
    Allowance, BorrowPlan, Confirmation, FeedRound, FlowError, FlowResult, LendingPosition,
    PriceQuote, RepayPlan, SafetyMargin, SwapOrder, TokenAmount, WorkflowStep,
};
pub use workflow::{BorrowReport, BorrowWorkflow, SwapReport, SwapWorkflow};
