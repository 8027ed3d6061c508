//! End-to-end workflow orchestration.
//!
//! Workflows are linear: every step runs once, each on-chain step waits for
//! its confirmation before the next step starts, and the first failure
//! aborts the run carrying the step it happened in. There are no retries
//! and no rollback; collateral whose follow-on steps never ran stays in
//! place for the operator to deal with.

use std::future::Future;

use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::{
    client::FlowClient,
    config::{NetworkConfig, WorkflowSettings},
    core::{
        planner, BorrowPlan, FlowResult, LendingPosition, PriceQuote, RepayPlan, SafetyMargin,
        TokenAmount, WorkflowStep,
    },
};

/// Run one step, attributing any failure to it.
async fn step<T>(id: WorkflowStep, fut: impl Future<Output = FlowResult<T>>) -> FlowResult<T> {
    debug!(step = %id, "step starting");
    fut.await.map_err(|e| e.at_step(id))
}

/// Outcome of a completed borrow workflow run.
#[derive(Debug, Clone)]
pub struct BorrowReport {
    /// Collateral wrapped and deposited
    pub collateral: TokenAmount,
    /// Position right after the deposit confirmed
    pub position_after_deposit: LendingPosition,
    /// Quote both plans were sized from
    pub quote: PriceQuote,
    /// Borrow sizing
    pub borrow_plan: BorrowPlan,
    /// Position right after the borrow confirmed
    pub position_after_borrow: LendingPosition,
    /// Repay sizing
    pub repay_plan: RepayPlan,
    /// Position after the repayment settled
    pub final_position: LendingPosition,
}

/// Collateralized borrow workflow: wrap native value, deposit it as
/// collateral, borrow against it within a safety margin, then settle the
/// debt in full.
pub struct BorrowWorkflow<'a> {
    client: &'a FlowClient,
    network: &'a NetworkConfig,
    settings: &'a WorkflowSettings,
}

impl<'a> BorrowWorkflow<'a> {
    pub fn new(
        client: &'a FlowClient,
        network: &'a NetworkConfig,
        settings: &'a WorkflowSettings,
    ) -> Self {
        Self {
            client,
            network,
            settings,
        }
    }

    /// Run the workflow start to finish.
    pub async fn run(&self) -> FlowResult<BorrowReport> {
        let account = self.client.account();
        let collateral =
            TokenAmount::new(self.network.collateral_token, self.settings.deposit_amount);

        info!(
            %account,
            token = %collateral.token,
            amount = %collateral.amount,
            "starting borrow workflow"
        );

        let wrapped = self.client.chain().wrapped_native(collateral.token);
        step(WorkflowStep::AcquireFunds, async {
            wrapped.wrap(collateral.amount).await?;
            let balance = wrapped.balance_of(account).await?;
            info!(%balance, "collateral balance after wrap");
            Ok(())
        })
        .await?;

        let pool = step(
            WorkflowStep::ResolvePool,
            self.client.pools.resolve(self.network.addresses_provider),
        )
        .await?;

        step(
            WorkflowStep::ApproveCollateral,
            self.client
                .approvals
                .approve(collateral.token, pool.address(), collateral.amount),
        )
        .await?;

        step(
            WorkflowStep::DepositCollateral,
            self.client
                .collateral
                .deposit(&*pool, collateral.token, collateral.amount),
        )
        .await?;

        let position_after_deposit = step(
            WorkflowStep::QueryPosition,
            self.client.pools.position(&*pool, account),
        )
        .await?;

        let quote = step(
            WorkflowStep::FetchQuote,
            self.client.oracle.latest_quote(self.network.price_feed),
        )
        .await?;

        let borrow_plan = step(WorkflowStep::PlanBorrow, async {
            let margin = SafetyMargin::new(self.settings.safety_margin_bps)?;
            planner::plan_borrow(
                &position_after_deposit,
                &quote,
                margin,
                self.network.borrow_token,
            )
        })
        .await?;
        info!(amount = %borrow_plan.amount, "borrow sized against capacity");

        step(
            WorkflowStep::ExecuteBorrow,
            self.client.borrows.execute(&*pool, &borrow_plan),
        )
        .await?;

        let position_after_borrow = step(
            WorkflowStep::QueryPosition,
            self.client.pools.position(&*pool, account),
        )
        .await?;

        let repay_plan = step(WorkflowStep::PlanRepay, async {
            planner::plan_repay(&position_after_borrow, &quote, self.network.borrow_token)
        })
        .await?;

        step(
            WorkflowStep::ExecuteRepay,
            self.client.repayments.execute(&*pool, &repay_plan),
        )
        .await?;

        let final_position = step(
            WorkflowStep::QueryPosition,
            self.client.pools.position(&*pool, account),
        )
        .await?;

        if final_position.has_debt() {
            // Interest accrued between the debt read and the repayment
            // lands here as dust.
            warn!(
                residual = %final_position.total_debt_value,
                "debt remaining after repayment"
            );
        }
        info!("borrow workflow complete");

        Ok(BorrowReport {
            collateral,
            position_after_deposit,
            quote,
            borrow_plan,
            position_after_borrow,
            repay_plan,
            final_position,
        })
    }
}

/// Outcome of a completed swap workflow run.
#[derive(Debug, Clone)]
pub struct SwapReport {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub token_in_before: U256,
    pub token_out_before: U256,
    pub token_in_after: U256,
    pub token_out_after: U256,
}

/// Single-hop swap workflow: wrap native value, approve the router, sell
/// the whole amount for the counter-asset.
///
/// Independent of the borrow workflow; shares only the client and the
/// network's token addresses.
pub struct SwapWorkflow<'a> {
    client: &'a FlowClient,
    network: &'a NetworkConfig,
    settings: &'a WorkflowSettings,
}

impl<'a> SwapWorkflow<'a> {
    pub fn new(
        client: &'a FlowClient,
        network: &'a NetworkConfig,
        settings: &'a WorkflowSettings,
    ) -> Self {
        Self {
            client,
            network,
            settings,
        }
    }

    /// Run the workflow start to finish.
    pub async fn run(&self) -> FlowResult<SwapReport> {
        let account = self.client.account();
        let token_in = self.network.collateral_token;
        let token_out = self.network.borrow_token;
        let amount_in = self.settings.swap_amount_in;

        info!(
            %account,
            %token_in,
            %token_out,
            %amount_in,
            "starting swap workflow"
        );

        let chain = self.client.chain();
        let wrapped = chain.wrapped_native(token_in);
        let counter = chain.token(token_out);

        step(WorkflowStep::AcquireFunds, wrapped.wrap(amount_in)).await?;

        let (token_in_before, token_out_before) = step(WorkflowStep::ReportBalances, async {
            let sold = wrapped.balance_of(account).await?;
            let bought = counter.balance_of(account).await?;
            Ok((sold, bought))
        })
        .await?;
        info!(%token_in_before, %token_out_before, "balances before swap");

        step(
            WorkflowStep::ApproveRouter,
            self.client
                .approvals
                .approve(token_in, self.network.swap_router, amount_in),
        )
        .await?;

        step(
            WorkflowStep::ExecuteSwap,
            self.client.swaps.swap_exact_in(
                self.network.swap_router,
                token_in,
                token_out,
                self.network.pool_fee,
                amount_in,
                self.settings.swap_amount_out_minimum,
            ),
        )
        .await?;

        let (token_in_after, token_out_after) = step(WorkflowStep::ReportBalances, async {
            let sold = wrapped.balance_of(account).await?;
            let bought = counter.balance_of(account).await?;
            Ok((sold, bought))
        })
        .await?;
        info!(%token_in_after, %token_out_after, "balances after swap");
        info!("swap workflow complete");

        Ok(SwapReport {
            token_in,
            token_out,
            amount_in,
            token_in_before,
            token_out_before,
            token_in_after,
            token_out_after,
        })
    }
}
