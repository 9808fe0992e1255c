use ethers::types::transaction::eip712::Eip712;
use ethers::types::{Address, Bytes, H256, U256};

use crate::amount::to_u64;
use crate::deposit::calldata::{encode_batched_deposit, DepositWithPermit};
use crate::permit::{Permit, SplitSignature};
use crate::prelude::Result;
use crate::Error;

/// Everything produced by a signed permit deposit, ready for the aggregator.
#[derive(Debug, Clone)]
pub struct DepositPayload {
    pub calldata: Bytes,        // `batchedDepositWithPermit` input handed to the aggregator
    pub bridge: Address,        // Contract the aggregator calls
    pub permit_digest: H256,    // The EIP-712 digest the owner signed
    pub signature: SplitSignature,
    pub value: U256,            // 6-decimal USDC amount
    pub nonce: U256,            // Token nonce the permit consumed
    pub deadline: u64,
}

impl DepositPayload {
    /// Pairs a permit with the owner's signature and encodes the single-entry batch.
    pub fn from_signed_permit(permit: &Permit, signature: SplitSignature) -> Result<Self> {
        let deposit = DepositWithPermit {
            user: permit.owner,
            usd: to_u64(permit.value)?,
            deadline: permit.deadline,
            signature,
        };
        let permit_digest = permit
            .encode_eip712()
            .map_err(|e| Error::Eip712(e.to_string()))?;

        Ok(Self {
            calldata: encode_batched_deposit(&[deposit]),
            bridge: permit.spender,
            permit_digest: H256::from(permit_digest),
            signature,
            value: permit.value,
            nonce: permit.nonce,
            deadline: permit.deadline,
        })
    }

    pub fn calldata_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.calldata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SupportedChainId;
    use crate::deposit::calldata::batched_deposit_selector;

    fn signature() -> SplitSignature {
        SplitSignature {
            r: U256::from(10),
            s: U256::from(11),
            v: 28,
        }
    }

    #[test]
    fn test_payload_from_signed_permit() {
        let owner: Address = "0x0000000000000000000000000000000000000abc".parse().unwrap();
        let permit = Permit::for_bridge(
            owner,
            U256::from(20_000_000u64),
            U256::from(3),
            1_700_003_600,
            SupportedChainId::Arbitrum,
        )
        .unwrap();

        let payload = DepositPayload::from_signed_permit(&permit, signature()).unwrap();

        assert_eq!(payload.value, U256::from(20_000_000u64));
        assert_eq!(payload.nonce, U256::from(3));
        assert_eq!(payload.bridge, permit.spender);
        assert_eq!(&payload.calldata[..4], &batched_deposit_selector());
        assert!(payload.calldata_hex().starts_with("0x"));
    }

    #[test]
    fn test_payload_rejects_value_wider_than_uint64() {
        let permit = Permit::for_bridge(
            Address::zero(),
            U256::from(u64::MAX) + 1,
            U256::zero(),
            0,
            SupportedChainId::Arbitrum,
        )
        .unwrap();

        assert!(matches!(
            DepositPayload::from_signed_permit(&permit, signature()),
            Err(Error::AmountOverflow(_))
        ));
    }
}
