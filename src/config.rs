//! Environment configuration.

use std::env;
use std::time::Duration;

use crate::consts::SupportedChainId;
use crate::flow::{ControllerSettings, DepositStrategy, DEFAULT_AGGREGATOR_TIMEOUT};
use crate::fund_kit::FundKitConfig;
use crate::prelude::Result;
use crate::Error;

pub const DEFAULT_RPC_URL: &str = "https://arb1.arbitrum.io/rpc";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq)]
pub struct DepositConfig {
    pub aarc_api_key: String,
    pub rpc_url: String,
    pub chain: SupportedChainId,
    pub strategy: DepositStrategy,
    pub aggregator_timeout: Duration,
    pub origin: String,
}

impl DepositConfig {
    /// Reads `AARC_API_KEY`, `ARBITRUM_RPC_URL`, `DEPOSIT_CHAIN_ID`,
    /// `DEPOSIT_STRATEGY`, `AGGREGATOR_TIMEOUT_SECS` and `APP_ORIGIN`,
    /// loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let aarc_api_key = lookup("AARC_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("AARC_API_KEY is not set".to_string()))?;

        let chain = match lookup("DEPOSIT_CHAIN_ID") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("DEPOSIT_CHAIN_ID {raw:?}: {e}")))?
                .try_into()?,
            None => SupportedChainId::Arbitrum,
        };

        let strategy = match lookup("DEPOSIT_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => DepositStrategy::Permit,
        };

        let aggregator_timeout = match lookup("AGGREGATOR_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|e| Error::Config(format!("AGGREGATOR_TIMEOUT_SECS {raw:?}: {e}")))?,
            ),
            None => DEFAULT_AGGREGATOR_TIMEOUT,
        };

        Ok(Self {
            aarc_api_key,
            rpc_url: lookup("ARBITRUM_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            chain,
            strategy,
            aggregator_timeout,
            origin: lookup("APP_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        })
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            strategy: self.strategy,
            chain: self.chain,
            aggregator_timeout: self.aggregator_timeout,
        }
    }

    pub fn fund_kit_config(&self) -> Result<FundKitConfig> {
        FundKitConfig::hyperliquid(&self.aarc_api_key, &self.origin, self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DepositConfig::from_lookup(lookup(&[("AARC_API_KEY", "abc")])).unwrap();
        assert_eq!(config.chain, SupportedChainId::Arbitrum);
        assert_eq!(config.strategy, DepositStrategy::Permit);
        assert_eq!(config.aggregator_timeout, DEFAULT_AGGREGATOR_TIMEOUT);
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.fund_kit_config().unwrap().api_keys.aarc_sdk, "abc");
    }

    #[test]
    fn test_overrides() {
        let config = DepositConfig::from_lookup(lookup(&[
            ("AARC_API_KEY", "abc"),
            ("DEPOSIT_CHAIN_ID", "421614"),
            ("DEPOSIT_STRATEGY", "direct"),
            ("AGGREGATOR_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        let settings = config.controller_settings();
        assert_eq!(settings.chain, SupportedChainId::ArbitrumSepolia);
        assert_eq!(settings.strategy, DepositStrategy::DirectTransfer);
        assert_eq!(settings.aggregator_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            DepositConfig::from_lookup(lookup(&[])),
            Err(Error::Config(_))
        ));
        assert_eq!(
            DepositConfig::from_lookup(lookup(&[
                ("AARC_API_KEY", "abc"),
                ("DEPOSIT_CHAIN_ID", "1")
            ])),
            Err(Error::UnsupportedChain(1))
        );
        assert!(DepositConfig::from_lookup(lookup(&[
            ("AARC_API_KEY", "abc"),
            ("AGGREGATOR_TIMEOUT_SECS", "soon")
        ]))
        .is_err());
    }
}
