//! EIP-2612 permits authorising the Hyperliquid bridge to pull USDC.

mod signature;

pub use signature::SplitSignature;

use chrono::Utc;
use ethers::abi::{encode, ParamType, Token};
use ethers::types::transaction::eip712::{make_type_hash, EIP712Domain, Eip712, Eip712Error};
use ethers::types::{Address, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

use crate::consts::{bridge_address, usdc_address, SupportedChainId, PERMIT_VALIDITY_SECS};
use crate::prelude::Result;

/// A USDC `Permit` message.
///
/// The domain is derived from `chain`, so a permit signed for one chain is
/// never valid on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub nonce: U256,
    pub deadline: u64,
    pub chain: SupportedChainId,
    pub verifying_contract: Address,
}

impl Permit {
    /// Builds a permit letting the bridge on `chain` move `value` from `owner`.
    pub fn for_bridge(
        owner: Address,
        value: U256,
        nonce: U256,
        deadline: u64,
        chain: SupportedChainId,
    ) -> Result<Self> {
        Ok(Self {
            owner,
            spender: bridge_address(chain)?,
            value,
            nonce,
            deadline,
            chain,
            verifying_contract: usdc_address(chain)?,
        })
    }

    /// Unix timestamp one validity window from now.
    pub fn deadline_from_now() -> u64 {
        Utc::now().timestamp().max(0) as u64 + PERMIT_VALIDITY_SECS
    }
}

impl Eip712 for Permit {
    type Error = Eip712Error;

    fn domain(&self) -> std::result::Result<EIP712Domain, Self::Error> {
        let (name, version) = self.chain.usdc_domain();
        Ok(EIP712Domain {
            name: Some(name.to_string()),
            version: Some(version.to_string()),
            chain_id: Some(U256::from(self.chain.id())),
            verifying_contract: Some(self.verifying_contract),
            salt: None,
        })
    }

    fn type_hash() -> std::result::Result<[u8; 32], Self::Error> {
        Ok(make_type_hash(
            "Permit".to_string(),
            &[
                ("owner".to_string(), ParamType::Address),
                ("spender".to_string(), ParamType::Address),
                ("value".to_string(), ParamType::Uint(256)),
                ("nonce".to_string(), ParamType::Uint(256)),
                ("deadline".to_string(), ParamType::Uint(256)),
            ],
        ))
    }

    fn struct_hash(&self) -> std::result::Result<[u8; 32], Self::Error> {
        let items = vec![
            Token::Uint(Self::type_hash()?.into()),
            Token::Address(self.owner),
            Token::Address(self.spender),
            Token::Uint(self.value),
            Token::Uint(self.nonce),
            Token::Uint(self.deadline.into()),
        ];
        Ok(keccak256(encode(&items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BRIDGE_MAINNET, USDC_MAINNET};
    use ethers::signers::{LocalWallet, Signer};
    use ethers::types::H256;

    const TEST_KEY: &str = "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e";

    fn permit_for(owner: Address) -> Permit {
        Permit::for_bridge(
            owner,
            U256::from(20_000_000u64),
            U256::from(3),
            1_700_003_600,
            SupportedChainId::Arbitrum,
        )
        .unwrap()
    }

    #[test]
    fn test_permit_type_hash() {
        let expected: H256 = "0x6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9"
            .parse()
            .unwrap();
        assert_eq!(H256::from(Permit::type_hash().unwrap()), expected);
    }

    #[test]
    fn test_mainnet_domain() {
        let permit = permit_for(Address::zero());
        let domain = permit.domain().unwrap();

        assert_eq!(domain.name.as_deref(), Some("USD Coin"));
        assert_eq!(domain.version.as_deref(), Some("2"));
        assert_eq!(domain.chain_id, Some(U256::from(42161)));
        assert_eq!(
            domain.verifying_contract,
            Some(USDC_MAINNET.parse().unwrap())
        );
        assert_eq!(permit.spender, BRIDGE_MAINNET.parse::<Address>().unwrap());
    }

    #[test]
    fn test_digest_depends_on_nonce() {
        let permit = permit_for(Address::zero());
        let mut bumped = permit.clone();
        bumped.nonce = U256::from(4);

        assert_eq!(
            permit.encode_eip712().unwrap(),
            permit.clone().encode_eip712().unwrap()
        );
        assert_ne!(
            permit.encode_eip712().unwrap(),
            bumped.encode_eip712().unwrap()
        );
    }

    #[test]
    fn test_deadline_is_an_hour_out() {
        let now = Utc::now().timestamp() as u64;
        let deadline = Permit::deadline_from_now();
        assert!(deadline >= now + PERMIT_VALIDITY_SECS);
        assert!(deadline <= now + PERMIT_VALIDITY_SECS + 5);
    }

    #[tokio::test]
    async fn test_signed_permit_recovers_owner() {
        let wallet: LocalWallet = TEST_KEY.parse().unwrap();
        let permit = permit_for(wallet.address());

        let signature = wallet.sign_typed_data(&permit).await.unwrap();
        let split = SplitSignature::try_from(signature).unwrap();
        let digest = H256::from(permit.encode_eip712().unwrap());

        assert!(split.v == 27 || split.v == 28);
        assert_eq!(
            split.to_signature().recover(digest).unwrap(),
            wallet.address()
        );
    }
}
