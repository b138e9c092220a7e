use alloy::primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The message a signer authorizes: an expiry bound and an amount.
///
/// Field order is part of the signed encoding (`expireAt` first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub expire_at: U256,
    pub transfer_amount: U256,
}

impl TransferRequest {
    pub fn new(expire_at: U256, transfer_amount: U256) -> Self {
        Self {
            expire_at,
            transfer_amount,
        }
    }
}

/// A request as submitted by a caller, together with its signature and the
/// identity the caller claims produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransferRequest {
    pub signature: Bytes,
    pub signer: Address,
    pub expire_at: U256,
    pub transfer_amount: U256,
}

impl SignedTransferRequest {
    pub fn request(&self) -> TransferRequest {
        TransferRequest {
            expire_at: self.expire_at,
            transfer_amount: self.transfer_amount,
        }
    }
}

/// Proof of a completed `verify_and_transfer` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub id: Uuid,
    pub recipient: Address,
    pub amount: U256,
    pub digest: B256,
    pub block: u64,
    pub dispatched_at: DateTime<Utc>,
}

impl TransferReceipt {
    pub fn new(recipient: Address, amount: U256, digest: B256, block: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            amount,
            digest,
            block,
            dispatched_at: Utc::now(),
        }
    }
}

/// Stages a single verification call moves through. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStage {
    Received,
    SignerChecked,
    ExpiryChecked,
    TransferDispatched,
}

impl VerificationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStage::Received => "received",
            VerificationStage::SignerChecked => "signer_checked",
            VerificationStage::ExpiryChecked => "expiry_checked",
            VerificationStage::TransferDispatched => "transfer_dispatched",
        }
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
