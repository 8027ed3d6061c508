pub mod error;
pub mod planner;
pub mod types;

pub use error::{FlowError, FlowResult};
pub use types::{
    Allowance, BorrowPlan, Confirmation, FeedRound, LendingPosition, PriceQuote, RepayPlan,
    SafetyMargin, SwapOrder, TokenAmount, WorkflowStep, DEFAULT_REFERRAL_CODE,
    INTEREST_RATE_MODE_STABLE,
};
