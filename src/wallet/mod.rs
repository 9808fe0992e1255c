//! Wallet and token contract collaborators.

mod ethers_wallet;

pub use ethers_wallet::EthersWallet;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, Signature, H256, U256};

use crate::permit::Permit;
use crate::prelude::Result;

/// A connected (or not) user wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The connected account, `None` when disconnected.
    fn address(&self) -> Option<Address>;

    async fn sign_permit(&self, permit: &Permit) -> Result<Signature>;

    /// Submits a call from the connected account and waits for it to land.
    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<H256>;

    fn disconnect(&mut self);
}

/// Read access to an EIP-2612 token.
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn nonces(&self, token: Address, owner: Address) -> Result<U256>;
}
