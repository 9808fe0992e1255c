use std::str::FromStr;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Signature, TransactionRequest, H256, U256, U64};
use log::{debug, info};

use crate::consts::SupportedChainId;
use crate::deposit::encode_nonces_call;
use crate::permit::Permit;
use crate::prelude::Result;
use crate::wallet::{TokenReader, WalletProvider};
use crate::Error;

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// A local private key wallet talking to an Arbitrum JSON-RPC endpoint.
#[derive(Debug)]
pub struct EthersWallet {
    provider: Provider<Http>,
    client: Option<Client>,
}

impl EthersWallet {
    pub fn new(rpc_url: &str, private_key: &str, chain: SupportedChainId) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(rpc_url).map_err(|e| Error::Config(e.to_string()))?;
        let wallet = LocalWallet::from_str(private_key)
            .map_err(|e| Error::PrivateKeyParse(e.to_string()))?
            .with_chain_id(chain.id());
        info!("Wallet {:?} connected on chain {}", wallet.address(), chain.id());

        Ok(Self {
            client: Some(SignerMiddleware::new(provider.clone(), wallet)),
            provider,
        })
    }

    /// Read-only provider sharing this wallet's endpoint.
    pub fn provider(&self) -> Provider<Http> {
        self.provider.clone()
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(Error::NotConnected)
    }
}

#[async_trait]
impl WalletProvider for EthersWallet {
    fn address(&self) -> Option<Address> {
        self.client.as_ref().map(|client| client.signer().address())
    }

    async fn sign_permit(&self, permit: &Permit) -> Result<Signature> {
        self.client()?
            .signer()
            .sign_typed_data(permit)
            .await
            .map_err(|e| Error::SignatureFailure(e.to_string()))
    }

    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<H256> {
        let client = self.client()?;
        let tx = TransactionRequest::new()
            .from(client.signer().address())
            .to(to)
            .data(data);

        let pending = client
            .send_transaction(tx, None)
            .await
            .map_err(|e| Error::Transaction(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!("Submitted transaction {tx_hash:?}");

        match pending
            .await
            .map_err(|e| Error::Transaction(e.to_string()))?
        {
            Some(receipt) if receipt.status == Some(U64::from(1)) => Ok(tx_hash),
            Some(_) => Err(Error::Transaction(format!("{tx_hash:?} reverted"))),
            None => Err(Error::Transaction(format!("{tx_hash:?} dropped from mempool"))),
        }
    }

    fn disconnect(&mut self) {
        if let Some(client) = self.client.take() {
            info!("Wallet {:?} disconnected", client.signer().address());
        }
    }
}

#[async_trait]
impl TokenReader for Provider<Http> {
    async fn nonces(&self, token: Address, owner: Address) -> Result<U256> {
        let call: TypedTransaction = TransactionRequest::new()
            .to(token)
            .data(encode_nonces_call(owner))
            .into();
        let out = self
            .call(&call, None)
            .await
            .map_err(|e| Error::Transaction(e.to_string()))?;
        if out.len() < 32 {
            return Err(Error::Transaction(format!(
                "nonces returned {} bytes",
                out.len()
            )));
        }
        Ok(U256::from_big_endian(&out[..32]))
    }
}

#[async_trait]
impl TokenReader for EthersWallet {
    async fn nonces(&self, token: Address, owner: Address) -> Result<U256> {
        self.provider.nonces(token, owner).await
    }
}
