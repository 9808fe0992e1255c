use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("Amount {amount} is below the minimum deposit of {minimum} USDC")]
    BelowMinimum { amount: String, minimum: u64 },
    #[error("Amount overflow: {0:?}")]
    AmountOverflow(String),
    #[error("No wallet account connected")]
    NotConnected,
    #[error("A deposit is already being processed")]
    Busy,
    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(u64),
    #[error("Address parse error: {0:?}")]
    AddressParse(String),
    #[error("Signature format error: {0:?}")]
    SignatureFormat(String),
    #[error("Signature failure: {0:?}")]
    SignatureFailure(String),
    #[error("Wallet error: {0:?}")]
    Wallet(String),
    #[error("Private key parse error: {0:?}")]
    PrivateKeyParse(String),
    #[error("Transaction error: {0:?}")]
    Transaction(String),
    #[error("EIP-712 error: {0:?}")]
    Eip712(String),
    #[error("Abi encoding error: {0:?}")]
    Abi(String),
    #[error("Aggregator error: {0:?}")]
    Aggregator(String),
    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
    #[error("Deposit attempt cancelled")]
    Cancelled,
    #[error("Timed out after {0}s waiting for the aggregator")]
    Timeout(u64),
    #[error("Config error: {0:?}")]
    Config(String),
    #[error("Json parse error: {0:?}")]
    JsonParse(String),
}
