use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Verifier: invalid signer")]
    InvalidSigner,

    #[error("Verifier: request expired (expire_at {expire_at}, current {current})")]
    RequestExpired { expire_at: U256, current: U256 },

    #[error("Verifier: request already consumed by {signer} (digest {digest})")]
    RequestReplayed { signer: Address, digest: B256 },

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by a [`TransferDispatcher`](crate::context::TransferDispatcher).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: U256, requested: U256 },

    #[error("recipient {0} rejected the transfer")]
    RecipientRejected(Address),

    #[error("dispatcher unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, VerifierError>;
