//! Addressing and amount constants for Arbitrum <> Hyperliquid deposits

use std::str::FromStr;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::prelude::Result;
use crate::Error;

/// Hyperliquid bridge contract addresses
pub const BRIDGE_MAINNET: &str = "0x2df1c51e09aecf9cacb7bc98cb1742757f163df7";
pub const BRIDGE_TESTNET: &str = "0x08cfc1B6b2dCF36A1480b99353A354AA8AC56f89";

/// USDC contract addresses
pub const USDC_MAINNET: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";
pub const USDC_TESTNET: &str = "0x1baAbB04529D43a73232B713C0FE471f7c7334d5";

pub const LIQUIDITY_ROUTER_MAINNET: &str = "0xA7Ae401c37b786B9bD96Db5D4BDbD2b1df882A90";

/// Minimum deposit in whole USDC. Smaller bridge deposits are lost.
pub const MIN_DEPOSIT: u64 = 5;
pub const USDC_DECIMALS: u32 = 6;

pub const DEFAULT_AMOUNT: &str = "20";
pub const QUICK_AMOUNTS: [&str; 4] = ["1", "5", "10", "20"];

/// Seconds a signed permit stays valid.
pub const PERMIT_VALIDITY_SECS: u64 = 3600;

pub const DESTINATION_CONTRACT_NAME: &str = "Hyperliquid Deposit";
pub const DESTINATION_GAS_LIMIT: &str = "800000";
pub const DESTINATION_LOGO_URI: &str = "https://app.hyperliquid.xyz/coins/HYPE_USDC.svg";

/// UI preference cleared when the wallet disconnects.
pub const SELECTED_ACCOUNT_KEY: &str = "selectedAccount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum SupportedChainId {
    Arbitrum = 42161,
    ArbitrumSepolia = 421614,
}

impl SupportedChainId {
    pub fn id(self) -> u64 {
        self as u64
    }

    pub fn is_mainnet(self) -> bool {
        matches!(self, SupportedChainId::Arbitrum)
    }

    /// EIP-712 domain name and version of the USDC deployment on this chain.
    pub fn usdc_domain(self) -> (&'static str, &'static str) {
        match self {
            SupportedChainId::Arbitrum => ("USD Coin", "2"),
            SupportedChainId::ArbitrumSepolia => ("USDC2", "1"),
        }
    }
}

impl TryFrom<u64> for SupportedChainId {
    type Error = Error;

    fn try_from(id: u64) -> Result<Self> {
        match id {
            42161 => Ok(SupportedChainId::Arbitrum),
            421614 => Ok(SupportedChainId::ArbitrumSepolia),
            other => Err(Error::UnsupportedChain(other)),
        }
    }
}

/// Contract addresses keyed by chain id.
#[derive(Debug, Clone, Copy)]
pub struct AddressMap(&'static [(SupportedChainId, &'static str)]);

impl AddressMap {
    pub fn get(&self, chain: SupportedChainId) -> Result<Address> {
        let (_, raw) = self
            .0
            .iter()
            .find(|(id, _)| *id == chain)
            .ok_or(Error::UnsupportedChain(chain.id()))?;
        Address::from_str(raw).map_err(|e| Error::AddressParse(format!("{raw}: {e}")))
    }
}

pub const HYPERLIQUID_DEPOSIT_ADDRESS: AddressMap = AddressMap(&[
    (SupportedChainId::Arbitrum, BRIDGE_MAINNET),
    (SupportedChainId::ArbitrumSepolia, BRIDGE_TESTNET),
]);

pub const USDC_ADDRESS: AddressMap = AddressMap(&[
    (SupportedChainId::Arbitrum, USDC_MAINNET),
    (SupportedChainId::ArbitrumSepolia, USDC_TESTNET),
]);

pub const LIQUIDITY_ROUTER_ADDRESS: AddressMap =
    AddressMap(&[(SupportedChainId::Arbitrum, LIQUIDITY_ROUTER_MAINNET)]);

/// Get bridge contract address for the given chain
pub fn bridge_address(chain: SupportedChainId) -> Result<Address> {
    HYPERLIQUID_DEPOSIT_ADDRESS.get(chain)
}

/// Get USDC contract address for the given chain
pub fn usdc_address(chain: SupportedChainId) -> Result<Address> {
    USDC_ADDRESS.get(chain)
}
