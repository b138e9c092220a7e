use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::{Result, VerifierError};

/// Records which `(signer, digest)` pairs have already been honored, together
/// with the expiry bound of the request each one authorized.
///
/// Keyed by digest rather than signature bytes, so a re-encoded signature
/// over the same request cannot be honored twice. Entries are dropped once
/// their request has expired, since expired requests are rejected before
/// they ever reach the guard. Clones share the same ledger.
#[derive(Debug, Clone, Default)]
pub struct ReplayGuard {
    claimed: Arc<Mutex<HashMap<(Address, B256), U256>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayGuardStats {
    pub claimed: usize,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks the pair as consumed until `expire_at`. Exactly one of
    /// any number of concurrent claims on the same pair succeeds.
    ///
    /// Entries that expired at or before `current` are pruned first.
    pub fn claim(&self, signer: Address, digest: B256, expire_at: U256, current: U256) -> Result<()> {
        let mut claimed = self
            .claimed
            .lock()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;

        claimed.retain(|_, bound| *bound > current);

        if claimed.contains_key(&(signer, digest)) {
            return Err(VerifierError::RequestReplayed { signer, digest });
        }
        claimed.insert((signer, digest), expire_at);

        Ok(())
    }

    /// Undoes a claim whose transfer could not be dispatched.
    pub fn release(&self, signer: Address, digest: B256) -> Result<()> {
        let mut claimed = self
            .claimed
            .lock()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;
        claimed.remove(&(signer, digest));
        Ok(())
    }

    /// Drops every entry whose expiry bound is not after `current`. Returns
    /// how many were removed.
    pub fn prune(&self, current: U256) -> Result<usize> {
        let mut claimed = self
            .claimed
            .lock()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;
        let before = claimed.len();
        claimed.retain(|_, bound| *bound > current);
        Ok(before - claimed.len())
    }

    pub fn is_claimed(&self, signer: Address, digest: B256) -> Result<bool> {
        let claimed = self
            .claimed
            .lock()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;
        Ok(claimed.contains_key(&(signer, digest)))
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let claimed = Arc::clone(&self.claimed);
        let _ = std::thread::spawn(move || {
            let _held = claimed.lock();
            panic!("ledger lock poisoned");
        })
        .join();
    }

    pub fn stats(&self) -> Result<ReplayGuardStats> {
        let claimed = self
            .claimed
            .lock()
            .map_err(|e| VerifierError::Internal(e.to_string()))?;
        Ok(ReplayGuardStats {
            claimed: claimed.len(),
        })
    }
}
