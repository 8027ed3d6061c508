// Utility functions for CLI commands

use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use anyhow::{Context, Result};

use lendflow::{EvmChain, FlowClient, FlowConfig};

/// Environment variable holding the signer key when no keypair file is given
pub const PRIVATE_KEY_ENV: &str = "LENDFLOW_PRIVATE_KEY";

/// Load the signer's private key from a file, falling back to the
/// environment
pub fn load_signer(keypair_path: Option<&str>) -> Result<PrivateKeySigner> {
    let raw = match keypair_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keypair file {}", path))?,
        None => std::env::var(PRIVATE_KEY_ENV).with_context(|| {
            format!("No --keypair given and {} is not set", PRIVATE_KEY_ENV)
        })?,
    };

    raw.trim()
        .parse::<PrivateKeySigner>()
        .context("Invalid private key")
}

/// Build a signing provider over `rpc_url` and the workflow client on top
/// of it
pub fn connect(
    rpc_url: &str,
    keypair_path: Option<&str>,
    config: &FlowConfig,
) -> Result<(FlowClient, Address)> {
    let signer = load_signer(keypair_path)?;
    let account = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url = rpc_url.parse().context("Invalid RPC URL")?;
    let provider: DynProvider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(url)
        .erased();

    let chain = Arc::new(EvmChain::new(provider));
    let client = FlowClient::new(chain, account, &config.workflow);

    Ok((client, account))
}

/// Print success message with checkmark
pub fn success(msg: &str) {
    println!("[OK] {}", msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("[INFO] {}", msg);
}
