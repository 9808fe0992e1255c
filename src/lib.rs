#![deny(unreachable_pub)]
pub mod amount;
pub mod config;
pub mod consts;
pub mod deposit;
mod errors;
pub mod flow;
pub mod fund_kit;
pub mod permit;
pub mod prelude;
pub mod wallet;

pub use config::DepositConfig;
pub use consts::{SupportedChainId, MIN_DEPOSIT};
pub use deposit::{DepositPayload, DepositWithPermit};
pub use errors::Error;
pub use flow::{
    AbortToken, ControllerSettings, DepositController, DepositState, DepositStrategy,
    FailureReason, Submission,
};
pub use fund_kit::{
    DestinationContract, FundKit, FundKitConfig, FundKitEvent, FundKitEvents, FundKitHandle,
    FundKitModal,
};
pub use permit::{Permit, SplitSignature};
pub use wallet::{EthersWallet, TokenReader, WalletProvider};
