//! Hyperliquid bridge deposit payloads.

pub mod calldata;
mod components;

pub use calldata::{
    batched_deposit_selector, encode_batched_deposit, encode_nonces_call, encode_usdc_transfer,
    DepositWithPermit,
};
pub use components::DepositPayload;
