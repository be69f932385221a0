//! Caller authentication.

use crate::{derive_address, PUBLIC_KEY_BYTES, SIGNATURE_BYTES};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use issuer_types::Address;

/// Answers whether the current caller controls `identity`.
pub trait Witness {
    fn check_witness(&self, identity: &Address) -> bool;
}

/// An anonymous caller. Authenticates as nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWitness;

impl Witness for NoWitness {
    fn check_witness(&self, _identity: &Address) -> bool {
        false
    }
}

/// Proof that the holder of `public_key` signed `message`.
///
/// The witness covers exactly one address: the one derived from the key.
#[derive(Debug, Clone)]
pub struct SignatureWitness {
    public_key: [u8; PUBLIC_KEY_BYTES],
    signature: Vec<u8>,
    message: Vec<u8>,
}

impl SignatureWitness {
    pub fn new(
        public_key: [u8; PUBLIC_KEY_BYTES],
        signature: impl Into<Vec<u8>>,
        message: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            public_key,
            signature: signature.into(),
            message: message.into(),
        }
    }

    pub fn signer(&self) -> Address {
        derive_address(&self.public_key)
    }

    fn verify_signature(&self) -> bool {
        if self.signature.len() != SIGNATURE_BYTES {
            return false;
        }

        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.public_key) else {
            return false;
        };

        let Ok(signature) = Signature::from_slice(&self.signature) else {
            return false;
        };

        verifying_key.verify(&self.message, &signature).is_ok()
    }
}

impl Witness for SignatureWitness {
    fn check_witness(&self, identity: &Address) -> bool {
        if self.signer() != *identity {
            return false;
        }
        let verified = self.verify_signature();
        if !verified {
            tracing::debug!(signer = %self.signer(), "signature did not verify");
        }
        verified
    }
}
