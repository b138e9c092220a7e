use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::context::{BlockContext, TransferDispatcher};
use crate::security::typed_data::{build_domain, digest_with_separator, DomainDescriptor};
use crate::security::{EcdsaRecovery, ReplayGuard, SignatureRecovery};
use crate::types::{Result, TransferReceipt, TransferRequest, VerificationStage, VerifierError};

/// Where a verifier is deployed. Bound into the domain at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl Deployment {
    pub fn new(chain_id: U256, verifying_contract: Address) -> Self {
        Self {
            chain_id,
            verifying_contract,
        }
    }
}

/// Checks signed transfer requests and dispatches the authorized transfers.
///
/// The domain is fixed at construction. Without a [`ReplayGuard`] the same
/// signed request is honored every time it is presented until it expires.
pub struct Verifier<T, C, R = EcdsaRecovery> {
    domain: DomainDescriptor,
    separator: B256,
    recovery: R,
    dispatcher: T,
    clock: C,
    replay_guard: Option<ReplayGuard>,
}

impl<T, C> Verifier<T, C, EcdsaRecovery>
where
    T: TransferDispatcher,
    C: BlockContext,
{
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        deployment: &Deployment,
        dispatcher: T,
        clock: C,
    ) -> Self {
        let domain = build_domain(
            name,
            version,
            deployment.chain_id,
            deployment.verifying_contract,
        );
        let separator = domain.separator();

        debug!(
            name = %domain.name,
            version = %domain.version,
            chain_id = %domain.chain_id,
            verifying_contract = %domain.verifying_contract,
            %separator,
            "verifier domain bound"
        );

        Self {
            domain,
            separator,
            recovery: EcdsaRecovery,
            dispatcher,
            clock,
            replay_guard: None,
        }
    }

    pub fn from_config(config: &Config, dispatcher: T, clock: C) -> Result<Self> {
        config.validate()?;

        let deployment = Deployment::new(
            U256::from(config.domain.chain_id),
            config.domain.verifying_contract,
        );
        let verifier = Self::new(
            config.domain.name.clone(),
            config.domain.version.clone(),
            &deployment,
            dispatcher,
            clock,
        );

        if config.security.enable_replay_protection {
            info!("replay protection enabled");
            Ok(verifier.with_replay_guard(ReplayGuard::new()))
        } else {
            Ok(verifier)
        }
    }
}

impl<T, C, R> Verifier<T, C, R> {
    pub fn with_recovery<S: SignatureRecovery>(self, recovery: S) -> Verifier<T, C, S> {
        Verifier {
            domain: self.domain,
            separator: self.separator,
            recovery,
            dispatcher: self.dispatcher,
            clock: self.clock,
            replay_guard: self.replay_guard,
        }
    }

    pub fn with_replay_guard(mut self, guard: ReplayGuard) -> Self {
        self.replay_guard = Some(guard);
        self
    }

    pub fn domain(&self) -> &DomainDescriptor {
        &self.domain
    }

    pub fn domain_separator(&self) -> B256 {
        self.separator
    }

    pub fn replay_guard(&self) -> Option<&ReplayGuard> {
        self.replay_guard.as_ref()
    }

    pub fn dispatcher(&self) -> &T {
        &self.dispatcher
    }

    /// Digest a signer must sign for `request` to be accepted here.
    pub fn signing_hash(&self, request: &TransferRequest) -> B256 {
        digest_with_separator(&self.separator, request)
    }
}

impl<T, C, R: SignatureRecovery> Verifier<T, C, R> {
    /// True iff `signature` over `request` in this domain recovers to
    /// `claimed_signer`. Malformed signatures are simply a mismatch.
    pub fn is_correct_signer(
        &self,
        signature: &[u8],
        claimed_signer: Address,
        request: &TransferRequest,
    ) -> bool {
        let digest = self.signing_hash(request);
        self.signer_matches(&digest, signature, claimed_signer)
    }

    fn signer_matches(&self, digest: &B256, signature: &[u8], claimed_signer: Address) -> bool {
        match self.recovery.recover(digest, signature) {
            Some(recovered) => recovered == claimed_signer,
            None => false,
        }
    }
}

impl<T, C, R> Verifier<T, C, R>
where
    T: TransferDispatcher,
    C: BlockContext,
    R: SignatureRecovery,
{
    /// Authorizes and dispatches a transfer of `transfer_amount` to
    /// `claimed_signer`.
    ///
    /// The signer is checked before the expiry, so a wrongly signed request
    /// always fails with [`VerifierError::InvalidSigner`]. A request is
    /// expired once `expire_at` is not strictly greater than the current
    /// context value.
    pub fn verify_and_transfer(
        &self,
        signature: &[u8],
        claimed_signer: Address,
        expire_at: U256,
        transfer_amount: U256,
    ) -> Result<TransferReceipt> {
        let request = TransferRequest::new(expire_at, transfer_amount);
        let digest = self.signing_hash(&request);

        debug!(
            stage = %VerificationStage::Received,
            %claimed_signer,
            %expire_at,
            %transfer_amount,
            %digest,
            "verifying transfer request"
        );

        if !self.signer_matches(&digest, signature, claimed_signer) {
            warn!(%claimed_signer, %digest, "rejected transfer request: invalid signer");
            return Err(VerifierError::InvalidSigner);
        }
        debug!(stage = %VerificationStage::SignerChecked, %claimed_signer);

        let block = self.clock.current();
        let current = U256::from(block);
        if expire_at <= current {
            warn!(%claimed_signer, %expire_at, %current, "rejected transfer request: expired");
            return Err(VerifierError::RequestExpired { expire_at, current });
        }
        debug!(stage = %VerificationStage::ExpiryChecked, %expire_at, %current);

        if let Some(guard) = &self.replay_guard {
            if let Err(e) = guard.claim(claimed_signer, digest, expire_at, current) {
                warn!(%claimed_signer, %digest, "rejected transfer request: {}", e);
                return Err(e);
            }
        }

        if let Err(e) = self.dispatcher.dispatch(claimed_signer, transfer_amount) {
            warn!(%claimed_signer, %transfer_amount, error = %e, "transfer dispatch failed");
            if let Some(guard) = &self.replay_guard {
                if let Err(release_err) = guard.release(claimed_signer, digest) {
                    error!(%claimed_signer, %digest, error = %release_err, "failed to release replay claim");
                }
            }
            return Err(e.into());
        }

        info!(
            stage = %VerificationStage::TransferDispatched,
            recipient = %claimed_signer,
            amount = %transfer_amount,
            block,
            "transfer authorized"
        );

        Ok(TransferReceipt::new(claimed_signer, transfer_amount, digest, block))
    }
}

impl<T, C, R> fmt::Debug for Verifier<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("domain", &self.domain)
            .field("separator", &self.separator)
            .field("replay_protection", &self.replay_guard.is_some())
            .finish()
    }
}
