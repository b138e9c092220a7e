use alloy::primitives::{Address, Signature, B256, U256};
use tracing::trace;

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1 curve order n / 2. Signatures with `s` above this are the
/// malleable twin of a low-s signature (EIP-2).
const SECP256K1_N_DIV_2: U256 = U256::from_limbs([
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
]);

/// Derives the signer of `digest` from `signature`.
///
/// Returns `None` when no signer can be derived. Implementations must not
/// panic on malformed input.
pub trait SignatureRecovery: Send + Sync {
    fn recover(&self, digest: &B256, signature: &[u8]) -> Option<Address>;
}

/// secp256k1 public key recovery over a 65-byte `r || s || v` signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaRecovery;

impl SignatureRecovery for EcdsaRecovery {
    fn recover(&self, digest: &B256, signature: &[u8]) -> Option<Address> {
        if signature.len() != SIGNATURE_LENGTH {
            trace!(len = signature.len(), "signature has wrong length");
            return None;
        }

        // ecrecover only honors the Electrum encoding.
        let v = signature[SIGNATURE_LENGTH - 1];
        if !matches!(v, 27 | 28) {
            trace!(v, "invalid recovery id");
            return None;
        }

        let signature = match Signature::from_raw(signature) {
            Ok(signature) => signature,
            Err(e) => {
                trace!(error = %e, "signature could not be parsed");
                return None;
            }
        };

        if signature.s() > SECP256K1_N_DIV_2 {
            trace!("high-s signature rejected");
            return None;
        }

        match signature.recover_address_from_prehash(digest) {
            Ok(address) => Some(address),
            Err(e) => {
                trace!(error = %e, "signer recovery failed");
                None
            }
        }
    }
}

impl<T: SignatureRecovery + ?Sized> SignatureRecovery for std::sync::Arc<T> {
    fn recover(&self, digest: &B256, signature: &[u8]) -> Option<Address> {
        (**self).recover(digest, signature)
    }
}
