//! Cryptographic identity for the issuer registry.
//!
//! The owner of a registry is the address derived from an Ed25519 public key.
//! Mutating operations ask a [`Witness`] whether the caller controls that
//! address.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use issuer_types::Address;
use rand_core::{OsRng, RngCore};

pub mod witness;

pub use witness::{NoWitness, SignatureWitness, Witness};

pub const PUBLIC_KEY_BYTES: usize = 32;
pub const SECRET_KEY_BYTES: usize = 32;
pub const SIGNATURE_BYTES: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("expected {expected} key bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("public key is not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// Derive the address controlled by an Ed25519 public key.
pub fn derive_address(public_key: &[u8; PUBLIC_KEY_BYTES]) -> Address {
    Address(*blake3::hash(public_key).as_bytes())
}

/// Parse a hex-encoded Ed25519 public key and check it is a curve point.
pub fn parse_public_key(hex_key: &str) -> Result<[u8; PUBLIC_KEY_BYTES], CryptoError> {
    let bytes = decode_fixed::<PUBLIC_KEY_BYTES>(hex_key)?;
    check_public_key(&bytes)?;
    Ok(bytes)
}

pub fn check_public_key(bytes: &[u8; PUBLIC_KEY_BYTES]) -> Result<(), CryptoError> {
    VerifyingKey::from_bytes(bytes)
        .map(|_| ())
        .map_err(|_| CryptoError::InvalidPublicKey)
}

fn decode_fixed<const N: usize>(hex_value: &str) -> Result<[u8; N], CryptoError> {
    let raw = hex::decode(hex_value.trim())?;
    let actual = raw.len();
    raw.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        expected: N,
        actual,
    })
}

/// Ed25519 key pair held by the registry owner.
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a new key pair
    pub fn generate() -> Self {
        let mut secret_key = [0u8; SECRET_KEY_BYTES];
        OsRng.fill_bytes(&mut secret_key);
        Self::from_secret(&secret_key)
    }

    pub fn from_secret(secret: &[u8; SECRET_KEY_BYTES]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn from_secret_hex(hex_key: &str) -> Result<Self, CryptoError> {
        let secret = decode_fixed::<SECRET_KEY_BYTES>(hex_key)?;
        Ok(Self::from_secret(&secret))
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_BYTES] {
        self.verifying_key.to_bytes()
    }

    pub fn secret_key(&self) -> [u8; SECRET_KEY_BYTES] {
        self.signing_key.to_bytes()
    }

    pub fn address(&self) -> Address {
        derive_address(&self.public_key())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_BYTES] {
        self.signing_key.sign(message).to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let keypair = KeyPair::generate();
        assert_ne!(keypair.public_key(), [0u8; 32]);
        assert_ne!(keypair.secret_key(), [0u8; 32]);
    }

    #[test]
    fn test_address_is_deterministic() {
        let keypair = KeyPair::from_secret(&[42u8; 32]);
        let again = KeyPair::from_secret_hex(&hex::encode([42u8; 32])).unwrap();
        assert_eq!(keypair.address(), again.address());
        assert_eq!(keypair.address(), derive_address(&keypair.public_key()));
        assert_ne!(
            keypair.address(),
            KeyPair::from_secret(&[43u8; 32]).address()
        );
    }

    #[test]
    fn test_parse_public_key() {
        let keypair = KeyPair::from_secret(&[9u8; 32]);
        let parsed = parse_public_key(&hex::encode(keypair.public_key())).unwrap();
        assert_eq!(parsed, keypair.public_key());

        assert!(matches!(
            parse_public_key("abcd"),
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 2 })
        ));
        assert!(matches!(
            parse_public_key("zz"),
            Err(CryptoError::InvalidHex(_))
        ));
    }
}
