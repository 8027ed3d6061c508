use std::collections::HashMap;
use std::fs;

use alloy::primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

use crate::core::{FlowError, FlowResult, SafetyMargin};

/// Client configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowConfig {
    /// Name of the network entry to run against
    pub network: String,

    /// Known deployments, keyed by network name
    pub networks: HashMap<String, NetworkConfig>,

    /// Workflow tuning knobs
    pub workflow: WorkflowSettings,
}

/// Contract addresses for one deployment of the protocol stack
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Chain ID the addresses belong to
    pub chain_id: u64,

    /// Registry that resolves the market's current pool
    #[serde(with = "address_serde")]
    pub addresses_provider: Address,

    /// Wrapped-native token deposited as collateral
    #[serde(with = "address_serde")]
    pub collateral_token: Address,

    /// Token borrowed against the collateral, also the swap counter-asset
    #[serde(with = "address_serde")]
    pub borrow_token: Address,

    /// Price feed quoting the borrow token in the collateral's base currency
    #[serde(with = "address_serde")]
    pub price_feed: Address,

    /// Single-hop swap router
    #[serde(with = "address_serde")]
    pub swap_router: Address,

    /// Fee tier of the swap pool, in hundredths of a basis point
    pub pool_fee: u32,
}

/// Workflow tuning knobs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowSettings {
    /// Collateral wrapped and deposited by the borrow workflow (wei)
    #[serde(with = "amount_serde")]
    pub deposit_amount: U256,

    /// Fraction of borrowing capacity to use, in basis points
    pub safety_margin_bps: u32,

    /// Maximum age of a price observation before it is treated as stale (seconds)
    pub oracle_max_age_secs: u64,

    /// Amount sold by the swap workflow (wei)
    #[serde(with = "amount_serde")]
    pub swap_amount_in: U256,

    /// Minimum acceptable swap output; zero disables slippage protection
    #[serde(with = "amount_serde")]
    pub swap_amount_out_minimum: U256,
}

impl FlowConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> FlowResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FlowError::InvalidConfig(format!("failed to read config file {}: {}", path, e))
        })?;

        let config: FlowConfig = toml::from_str(&content).map_err(|e| {
            FlowError::InvalidConfig(format!("failed to parse config file {}: {}", path, e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> FlowResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            FlowError::InvalidConfig(format!("failed to serialize config: {}", e))
        })?;
        fs::write(path, content).map_err(|e| {
            FlowError::InvalidConfig(format!("failed to write config file {}: {}", path, e))
        })?;
        Ok(())
    }

    /// The network entry selected by `network`
    pub fn active_network(&self) -> FlowResult<&NetworkConfig> {
        self.networks.get(&self.network).ok_or_else(|| {
            FlowError::InvalidConfig(format!(
                "network {} is not defined in the networks table",
                self.network
            ))
        })
    }

    fn validate(&self) -> FlowResult<()> {
        if self.networks.is_empty() {
            return Err(FlowError::InvalidConfig(
                "networks table is empty".to_string(),
            ));
        }

        self.active_network()?;

        for (name, network) in &self.networks {
            network.validate(name)?;
        }

        self.workflow.validate()?;

        Ok(())
    }
}

impl NetworkConfig {
    fn validate(&self, name: &str) -> FlowResult<()> {
        if self.chain_id == 0 {
            return Err(FlowError::InvalidConfig(format!(
                "network {}: chain_id must be non-zero",
                name
            )));
        }

        for (field, value) in [
            ("addresses_provider", self.addresses_provider),
            ("collateral_token", self.collateral_token),
            ("borrow_token", self.borrow_token),
            ("price_feed", self.price_feed),
            ("swap_router", self.swap_router),
        ] {
            if value == Address::ZERO {
                return Err(FlowError::InvalidConfig(format!(
                    "network {}: {} must not be the zero address",
                    name, field
                )));
            }
        }

        if self.pool_fee == 0 || self.pool_fee > 1_000_000 {
            return Err(FlowError::InvalidConfig(format!(
                "network {}: pool_fee {} is outside (0, 1000000]",
                name, self.pool_fee
            )));
        }

        Ok(())
    }
}

impl WorkflowSettings {
    fn validate(&self) -> FlowResult<()> {
        if self.deposit_amount.is_zero() {
            return Err(FlowError::InvalidConfig(
                "deposit_amount must be greater than 0".to_string(),
            ));
        }

        // Reject out-of-range margins at load time; the planner only sees
        // already constructed values.
        SafetyMargin::new(self.safety_margin_bps)?;

        if self.oracle_max_age_secs == 0 {
            return Err(FlowError::InvalidConfig(
                "oracle_max_age_secs must be greater than 0".to_string(),
            ));
        }

        if self.swap_amount_in.is_zero() {
            return Err(FlowError::InvalidConfig(
                "swap_amount_in must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        let mainnet = NetworkConfig::mainnet();
        // A local fork serves the same mainnet deployment on a dev chain ID.
        let localhost = NetworkConfig {
            chain_id: 31337,
            ..mainnet.clone()
        };

        Self {
            network: "localhost".to_string(),
            networks: HashMap::from([
                ("mainnet".to_string(), mainnet),
                ("localhost".to_string(), localhost),
            ]),
            workflow: WorkflowSettings::default(),
        }
    }
}

impl NetworkConfig {
    /// Canonical Ethereum mainnet deployment of the whole stack.
    pub fn mainnet() -> Self {
        Self {
            chain_id: 1,
            addresses_provider: address!("b53c1a33016b2dc2ff3653530bff1848a515c8c5"),
            collateral_token: address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            borrow_token: address!("6b175474e89094c44da98b954eedeac495271d0f"),
            price_feed: address!("773616e4d11a78f511299002da57a0a94577f1f4"),
            swap_router: address!("e592427a0aece92de3edee1f18e0157c05861564"),
            pool_fee: 3_000,
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            deposit_amount: U256::from(100_000_000_000_000_000u128), // 0.1 ETH
            safety_margin_bps: 9_500,
            oracle_max_age_secs: 3_600,
            swap_amount_in: U256::from(100_000_000_000_000_000u128), // 0.1 ETH
            swap_amount_out_minimum: U256::ZERO,
        }
    }
}

// Custom serde module for Address
mod address_serde {
    use std::str::FromStr;

    use alloy::primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&address.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// Custom serde module for U256 amounts, written as decimal strings so TOML
// integer limits never truncate them
mod amount_serde {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<U256>().map_err(serde::de::Error::custom)
    }
}
