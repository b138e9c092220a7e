use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::types::TransferError;

/// Moves `amount` to `recipient` once a request has been authorized.
///
/// A failed dispatch must leave no effect behind.
pub trait TransferDispatcher: Send + Sync {
    fn dispatch(&self, recipient: Address, amount: U256) -> Result<(), TransferError>;
}

impl<T: TransferDispatcher + ?Sized> TransferDispatcher for std::sync::Arc<T> {
    fn dispatch(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
        (**self).dispatch(recipient, amount)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    treasury: U256,
    credited: HashMap<Address, U256>,
    rejected: HashSet<Address>,
    transfers: u64,
}

/// A funded treasury paying out of an in-process balance.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub treasury: U256,
    pub recipients: usize,
    pub transfers: u64,
}

impl InMemoryLedger {
    pub fn new(treasury: U256) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                treasury,
                ..Default::default()
            }),
        }
    }

    /// Refuses every future transfer to `recipient`.
    pub fn reject(&self, recipient: Address) -> Result<(), TransferError> {
        self.lock()?.rejected.insert(recipient);
        Ok(())
    }

    pub fn treasury(&self) -> Result<U256, TransferError> {
        Ok(self.lock()?.treasury)
    }

    pub fn balance_of(&self, recipient: Address) -> Result<U256, TransferError> {
        Ok(self
            .lock()?
            .credited
            .get(&recipient)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    pub fn stats(&self) -> Result<LedgerStats, TransferError> {
        let state = self.lock()?;
        Ok(LedgerStats {
            treasury: state.treasury,
            recipients: state.credited.len(),
            transfers: state.transfers,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LedgerState>, TransferError> {
        self.state
            .lock()
            .map_err(|e| TransferError::Unavailable(e.to_string()))
    }
}

impl TransferDispatcher for InMemoryLedger {
    fn dispatch(&self, recipient: Address, amount: U256) -> Result<(), TransferError> {
        let mut state = self.lock()?;

        if state.rejected.contains(&recipient) {
            warn!(%recipient, "recipient rejected transfer");
            return Err(TransferError::RecipientRejected(recipient));
        }

        let remaining = state.treasury.checked_sub(amount).ok_or(
            TransferError::InsufficientFunds {
                available: state.treasury,
                requested: amount,
            },
        )?;

        let credited = state.credited.entry(recipient).or_insert(U256::ZERO);
        *credited = credited.saturating_add(amount);
        state.treasury = remaining;
        state.transfers += 1;

        debug!(%recipient, %amount, treasury = %remaining, "transfer dispatched");
        Ok(())
    }
}
