// Collateralized borrow workflow command

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::Args;

use lendflow::{BorrowWorkflow, FlowConfig};

use super::utils::{connect, info, success};

#[derive(Args, Default)]
pub struct BorrowCmd {
    /// Collateral to wrap and deposit, in wei (overrides the config)
    #[arg(long)]
    amount: Option<String>,

    /// Safety margin in basis points (overrides the config)
    #[arg(long)]
    safety_margin_bps: Option<u32>,
}

pub async fn execute(
    cmd: BorrowCmd,
    rpc_url: &str,
    keypair_path: Option<&str>,
    mut config: FlowConfig,
) -> Result<()> {
    if let Some(amount) = cmd.amount.as_deref() {
        config.workflow.deposit_amount = amount.parse::<U256>().context("Invalid --amount")?;
    }
    if let Some(bps) = cmd.safety_margin_bps {
        config.workflow.safety_margin_bps = bps;
    }

    let network = config.active_network()?.clone();
    let (client, account) = connect(rpc_url, keypair_path, &config)?;

    info(&format!("Account: {}", account));
    info(&format!(
        "Network: {} (chain {})",
        config.network, network.chain_id
    ));

    let report = BorrowWorkflow::new(&client, &network, &config.workflow)
        .run()
        .await
        .context("Borrow workflow failed")?;

    success("Borrow workflow complete");
    info(&format!(
        "Deposited: {} wei of {}",
        report.collateral.amount, report.collateral.token
    ));
    info(&format!(
        "Borrowed: {} units of {} at {}",
        report.borrow_plan.amount, report.borrow_plan.token, report.borrow_plan.margin
    ));
    info(&format!("Repaid: {} units", report.repay_plan.amount));
    info(&format!(
        "Final debt: {} (health factor {})",
        report.final_position.total_debt_value, report.final_position.health_factor
    ));

    Ok(())
}
