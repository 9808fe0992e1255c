use ethers::types::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::consts::{
    bridge_address, usdc_address, SupportedChainId, DESTINATION_CONTRACT_NAME,
    DESTINATION_GAS_LIMIT, DESTINATION_LOGO_URI,
};
use crate::prelude::Result;
use crate::Error;

pub const APP_NAME: &str = "Hyperliquid x Aarc";

/// Configuration object handed to the Aarc fund kit widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundKitConfig {
    pub app_name: String,
    pub module: ModuleConfig,
    pub destination: DestinationConfig,
    pub appearance: Appearance,
    pub api_keys: ApiKeys,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub exchange: Toggle,
    pub on_ramp: OnRamp,
    pub bridge_and_swap: BridgeAndSwap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRamp {
    pub enabled: bool,
    pub on_ramp_config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAndSwap {
    pub enabled: bool,
    pub fetch_only_destination_balance: bool,
    pub route_type: String,
    pub connectors: Vec<String>,
}

/// Where the aggregator delivers the USDC it assembles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<DestinationContract>,
    pub wallet_address: Address,
    pub chain_id: u64,
    pub token_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_amount: Option<f64>,
}

/// A contract call the aggregator executes as its last step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationContract {
    pub contract_address: Address,
    pub contract_name: String,
    pub contract_gas_limit: String,
    pub contract_payload: Bytes,
    #[serde(
        rename = "contractLogoURI",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_logo_uri: Option<String>,
}

impl DestinationContract {
    /// The bridge call used by permit deposits.
    pub fn hyperliquid_deposit(bridge: Address, payload: Bytes) -> Self {
        Self {
            contract_address: bridge,
            contract_name: DESTINATION_CONTRACT_NAME.to_string(),
            contract_gas_limit: DESTINATION_GAS_LIMIT.to_string(),
            contract_payload: payload,
            contract_logo_uri: Some(DESTINATION_LOGO_URI.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub roundness: u32,
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "aarcSDK")]
    pub aarc_sdk: String,
}

impl FundKitConfig {
    /// Default widget setup: every source module on, USDC delivered to the bridge.
    pub fn hyperliquid(api_key: &str, origin: &str, chain: SupportedChainId) -> Result<Self> {
        let bridge = bridge_address(chain)?;
        Ok(Self {
            app_name: APP_NAME.to_string(),
            module: ModuleConfig {
                exchange: Toggle { enabled: true },
                on_ramp: OnRamp {
                    enabled: true,
                    on_ramp_config: serde_json::Map::new(),
                },
                bridge_and_swap: BridgeAndSwap {
                    enabled: true,
                    fetch_only_destination_balance: false,
                    route_type: "Value".to_string(),
                    connectors: vec!["ETHEREUM".to_string()],
                },
            },
            destination: DestinationConfig {
                contract: Some(DestinationContract {
                    contract_gas_limit: "300000".to_string(),
                    ..DestinationContract::hyperliquid_deposit(bridge, Bytes::default())
                }),
                wallet_address: bridge,
                chain_id: chain.id(),
                token_address: usdc_address(chain)?,
                requested_amount: None,
            },
            appearance: Appearance {
                roundness: 42,
                theme: Theme::Dark,
            },
            api_keys: ApiKeys {
                aarc_sdk: api_key.to_string(),
            },
            origin: origin.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::JsonParse(e.to_string()))
    }
}
