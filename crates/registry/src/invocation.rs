//! Requests as they arrive from a transport.
//!
//! A signed invocation authenticates its signer for that exact operation and
//! argument list; replaying the signature with different arguments fails.

use issuer_crypto::{KeyPair, NoWitness, SignatureWitness, Witness, PUBLIC_KEY_BYTES};
use sha2::{Digest, Sha256};

const INVOCATION_DOMAIN: &[u8] = b"ISSUER_REGISTRY_INVOCATION";

/// SHA-256 over the domain tag, the operation name and each argument, all
/// length-prefixed.
pub fn invocation_digest(operation: &str, args: &[Vec<u8>]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(INVOCATION_DOMAIN);
    hasher.update((operation.len() as u64).to_le_bytes());
    hasher.update(operation.as_bytes());
    hasher.update((args.len() as u64).to_le_bytes());
    for arg in args {
        hasher.update((arg.len() as u64).to_le_bytes());
        hasher.update(arg);
    }
    hasher.finalize().into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSignature {
    pub public_key: [u8; PUBLIC_KEY_BYTES],
    pub signature: Vec<u8>,
}

/// An operation name with its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: String,
    pub args: Vec<Vec<u8>>,
    pub signature: Option<InvocationSignature>,
}

impl Invocation {
    pub fn new(operation: impl Into<String>, args: Vec<Vec<u8>>) -> Self {
        Self {
            operation: operation.into(),
            args,
            signature: None,
        }
    }

    pub fn digest(&self) -> [u8; 32] {
        invocation_digest(&self.operation, &self.args)
    }

    pub fn signed_by(mut self, keypair: &KeyPair) -> Self {
        let signature = keypair.sign(&self.digest());
        self.signature = Some(InvocationSignature {
            public_key: keypair.public_key(),
            signature: signature.to_vec(),
        });
        self
    }

    /// The authentication capability this request carries.
    pub fn witness(&self) -> Box<dyn Witness> {
        match &self.signature {
            Some(sig) => Box::new(SignatureWitness::new(
                sig.public_key,
                sig.signature.clone(),
                self.digest().to_vec(),
            )),
            None => Box::new(NoWitness),
        }
    }
}
