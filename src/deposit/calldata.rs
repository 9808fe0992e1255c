use ethers::abi::{encode, short_signature, AbiType, ParamType, Token, Tokenizable};
use ethers::contract::EthAbiType;
use ethers::types::{Address, Bytes, U256};
use lazy_static::lazy_static;

use crate::permit::SplitSignature;

pub const BATCHED_DEPOSIT_FN: &str = "batchedDepositWithPermit";
pub const TRANSFER_FN: &str = "transfer";
pub const NONCES_FN: &str = "nonces";

lazy_static! {
    static ref BATCHED_DEPOSIT_SELECTOR: [u8; 4] = short_signature(
        BATCHED_DEPOSIT_FN,
        &[ParamType::Array(Box::new(DepositWithPermit::param_type()))]
    );
    static ref TRANSFER_SELECTOR: [u8; 4] =
        short_signature(TRANSFER_FN, &[ParamType::Address, ParamType::Uint(256)]);
    static ref NONCES_SELECTOR: [u8; 4] = short_signature(NONCES_FN, &[ParamType::Address]);
}

/// One entry of `batchedDepositWithPermit`.
///
/// Field order and widths are part of the bridge ABI:
/// `(address user, uint64 usd, uint64 deadline, (uint256 r, uint256 s, uint8 v) signature)`.
#[derive(Debug, Clone, PartialEq, Eq, EthAbiType)]
pub struct DepositWithPermit {
    pub user: Address,
    pub usd: u64,
    pub deadline: u64,
    pub signature: SplitSignature,
}

pub fn batched_deposit_selector() -> [u8; 4] {
    *BATCHED_DEPOSIT_SELECTOR
}

/// Calldata for `batchedDepositWithPermit(deposits)`.
pub fn encode_batched_deposit(deposits: &[DepositWithPermit]) -> Bytes {
    let entries = deposits.iter().cloned().map(Tokenizable::into_token).collect();
    with_selector(*BATCHED_DEPOSIT_SELECTOR, &[Token::Array(entries)])
}

/// Calldata for the ERC-20 `transfer(address,uint256)`.
pub fn encode_usdc_transfer(to: Address, amount: U256) -> Bytes {
    with_selector(
        *TRANSFER_SELECTOR,
        &[Token::Address(to), Token::Uint(amount)],
    )
}

/// Calldata for the EIP-2612 `nonces(address)` view.
pub fn encode_nonces_call(owner: Address) -> Bytes {
    with_selector(*NONCES_SELECTOR, &[Token::Address(owner)])
}

fn with_selector(selector: [u8; 4], tokens: &[Token]) -> Bytes {
    let mut data = selector.to_vec();
    data.extend(encode(tokens));
    data.into()
}
