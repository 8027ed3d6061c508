pub mod approval;
pub mod borrow;
pub mod collateral;
pub mod oracle;
pub mod pool;
pub mod repay;
pub mod swap;

use std::sync::Arc;

use alloy::primitives::Address;

use crate::{chain::ChainPort, config::WorkflowSettings};

pub use approval::ApprovalService;
pub use borrow::BorrowService;
pub use collateral::CollateralService;
pub use oracle::OracleService;
pub use pool::PoolService;
pub use repay::RepayService;
pub use swap::{SwapService, SWAP_DEADLINE_WINDOW_SECS};

/// Main workflow client with service-based architecture
pub struct FlowClient {
    /// Chain binding shared by every service
    chain: Arc<dyn ChainPort>,
    /// Signer account every operation acts for
    account: Address,
    /// Spending grant service
    pub approvals: ApprovalService,
    /// Pool resolution and health query service
    pub pools: PoolService,
    /// Collateral deposit service
    pub collateral: CollateralService,
    /// Price observation service
    pub oracle: OracleService,
    /// Borrow execution service
    pub borrows: BorrowService,
    /// Debt repayment service
    pub repayments: RepayService,
    /// Swap execution service
    pub swaps: SwapService,
}

impl FlowClient {
    /// Create a client for `account` over the given chain binding.
    pub fn new(chain: Arc<dyn ChainPort>, account: Address, settings: &WorkflowSettings) -> Self {
        Self {
            approvals: ApprovalService::new(chain.clone(), account),
            pools: PoolService::new(chain.clone()),
            collateral: CollateralService::new(chain.clone(), account),
            oracle: OracleService::new(chain.clone(), settings.oracle_max_age_secs),
            borrows: BorrowService::new(account),
            repayments: RepayService::new(chain.clone(), account),
            swaps: SwapService::new(chain.clone(), account),
            chain,
            account,
        }
    }

    /// The signer account this client acts for
    pub fn account(&self) -> Address {
        self.account
    }

    /// The underlying chain binding, for callers that need direct role
    /// handles (token balances, wrapping)
    pub fn chain(&self) -> Arc<dyn ChainPort> {
        self.chain.clone()
    }
}
