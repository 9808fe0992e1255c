use ethers::contract::EthAbiType;
use ethers::types::{Signature, U256};

use crate::prelude::Result;
use crate::Error;

const SIGNATURE_LEN: usize = 65;

/// An ECDSA signature in the `(uint256 r, uint256 s, uint8 v)` shape the bridge expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EthAbiType)]
pub struct SplitSignature {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

impl SplitSignature {
    /// Splits a 65-byte hex signature into r (bytes 0..32), s (32..64) and v (byte 64).
    ///
    /// `v` is kept as the raw byte, no normalisation to 27/28 happens here.
    pub fn from_hex(signature: &str) -> Result<Self> {
        let raw = signature.strip_prefix("0x").unwrap_or(signature);
        let bytes = hex::decode(raw).map_err(|e| Error::SignatureFormat(e.to_string()))?;
        if bytes.len() != SIGNATURE_LEN {
            return Err(Error::SignatureFormat(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            r: U256::from_big_endian(&bytes[..32]),
            s: U256::from_big_endian(&bytes[32..64]),
            v: bytes[64],
        })
    }

    pub fn r_hex(&self) -> String {
        word_hex(self.r)
    }

    pub fn s_hex(&self) -> String {
        word_hex(self.s)
    }

    pub fn to_signature(&self) -> Signature {
        Signature {
            r: self.r,
            s: self.s,
            v: self.v.into(),
        }
    }
}

impl TryFrom<Signature> for SplitSignature {
    type Error = Error;

    fn try_from(signature: Signature) -> Result<Self> {
        let v = u8::try_from(signature.v)
            .map_err(|_| Error::SignatureFormat(format!("v out of range: {}", signature.v)))?;
        Ok(Self {
            r: signature.r,
            s: signature.s,
            v,
        })
    }
}

fn word_hex(word: U256) -> String {
    let mut buf = [0u8; 32];
    word.to_big_endian(&mut buf);
    format!("0x{}", hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signature() -> String {
        format!("0x{}{}1c", "11".repeat(32), "00".repeat(31) + "2a")
    }

    #[test]
    fn test_split_known_signature() {
        let split = SplitSignature::from_hex(&sample_signature()).unwrap();

        assert_eq!(split.r_hex().len(), 66);
        assert_eq!(split.s_hex().len(), 66);
        assert_eq!(split.r_hex(), format!("0x{}", "11".repeat(32)));
        assert_eq!(split.s, U256::from(0x2a));
        assert_eq!(split.v, 28);
    }

    #[test]
    fn test_split_matches_string_slicing() {
        let sig = sample_signature();
        let split = SplitSignature::from_hex(&sig).unwrap();

        assert_eq!(split.r_hex(), sig[..66]);
        assert_eq!(split.s_hex(), format!("0x{}", &sig[66..130]));
        assert_eq!(split.v, u8::from_str_radix(&sig[130..132], 16).unwrap());
    }

    #[test]
    fn test_split_keeps_raw_v() {
        let sig = format!("{}{}", "ab".repeat(64), "01");
        let split = SplitSignature::from_hex(&sig).unwrap();
        assert_eq!(split.v, 1);
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(matches!(
            SplitSignature::from_hex("0x1234"),
            Err(Error::SignatureFormat(_))
        ));
        assert!(matches!(
            SplitSignature::from_hex(&"zz".repeat(65)),
            Err(Error::SignatureFormat(_))
        ));
    }

    #[test]
    fn test_from_ethers_signature() {
        let signature = Signature {
            r: U256::from(7),
            s: U256::from(9),
            v: 27,
        };
        let split = SplitSignature::try_from(signature).unwrap();
        assert_eq!(split.v, 27);
        assert_eq!(split.to_signature(), signature);

        let bad = Signature { v: 300, ..signature };
        assert!(SplitSignature::try_from(bad).is_err());
    }
}
