// Single-hop swap workflow command

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::Args;

use lendflow::{FlowConfig, SwapWorkflow};

use super::utils::{connect, info, success};

#[derive(Args, Default)]
pub struct SwapCmd {
    /// Amount to sell, in wei (overrides the config)
    #[arg(long)]
    amount: Option<String>,

    /// Minimum acceptable output in the counter-asset's smallest unit
    /// (overrides the config; zero disables slippage protection)
    #[arg(long)]
    min_amount_out: Option<String>,
}

pub async fn execute(
    cmd: SwapCmd,
    rpc_url: &str,
    keypair_path: Option<&str>,
    mut config: FlowConfig,
) -> Result<()> {
    if let Some(amount) = cmd.amount.as_deref() {
        config.workflow.swap_amount_in = amount.parse::<U256>().context("Invalid --amount")?;
    }
    if let Some(min_out) = cmd.min_amount_out.as_deref() {
        config.workflow.swap_amount_out_minimum =
            min_out.parse::<U256>().context("Invalid --min-amount-out")?;
    }

    let network = config.active_network()?.clone();
    let (client, account) = connect(rpc_url, keypair_path, &config)?;

    info(&format!("Account: {}", account));
    info(&format!(
        "Network: {} (chain {})",
        config.network, network.chain_id
    ));

    let report = SwapWorkflow::new(&client, &network, &config.workflow)
        .run()
        .await
        .context("Swap workflow failed")?;

    success("Swap workflow complete");
    info(&format!(
        "Sold {} of {} for {}",
        report.amount_in, report.token_in, report.token_out
    ));
    info(&format!(
        "Sell-side balance: {} -> {}",
        report.token_in_before, report.token_in_after
    ));
    info(&format!(
        "Buy-side balance: {} -> {}",
        report.token_out_before, report.token_out_after
    ));

    Ok(())
}
