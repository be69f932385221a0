use crate::errors::ConfigError;
use issuer_crypto::{check_public_key, derive_address, parse_public_key, PUBLIC_KEY_BYTES};
use issuer_types::Address;

/// Deployment-time settings of a registry.
///
/// Built once and never changed; the owner address is derived from the
/// public key so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerConfig {
    name: String,
    public_key: [u8; PUBLIC_KEY_BYTES],
    owner: Address,
}

impl IssuerConfig {
    pub fn new(
        name: impl Into<String>,
        public_key: [u8; PUBLIC_KEY_BYTES],
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        check_public_key(&public_key)?;

        Ok(Self {
            name,
            public_key,
            owner: derive_address(&public_key),
        })
    }

    pub fn from_public_key_hex(
        name: impl Into<String>,
        public_key_hex: &str,
    ) -> Result<Self, ConfigError> {
        let public_key = parse_public_key(public_key_hex)?;
        Self::new(name, public_key)
    }

    /// Display name returned by the `Name` operation.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_BYTES] {
        &self.public_key
    }

    /// Hex form returned by the `PublicKey` operation.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuer_crypto::KeyPair;

    #[test]
    fn test_owner_derived_from_public_key() {
        let keypair = KeyPair::from_secret(&[5u8; 32]);
        let config = IssuerConfig::new("Example Issuer", keypair.public_key()).unwrap();

        assert_eq!(config.owner(), &keypair.address());
        assert_eq!(config.public_key_hex(), hex::encode(keypair.public_key()));
        assert_eq!(config.name(), "Example Issuer");
    }

    #[test]
    fn test_hex_constructor_matches_bytes() {
        let keypair = KeyPair::from_secret(&[5u8; 32]);
        let from_hex =
            IssuerConfig::from_public_key_hex("Example Issuer", &hex::encode(keypair.public_key()))
                .unwrap();
        let from_bytes = IssuerConfig::new("Example Issuer", keypair.public_key()).unwrap();
        assert_eq!(from_hex, from_bytes);
    }

    #[test]
    fn test_empty_name_rejected() {
        let keypair = KeyPair::from_secret(&[5u8; 32]);
        assert!(matches!(
            IssuerConfig::new("  ", keypair.public_key()),
            Err(ConfigError::EmptyName)
        ));
    }

    #[test]
    fn test_bad_public_key_rejected() {
        assert!(matches!(
            IssuerConfig::from_public_key_hex("Example Issuer", "1234"),
            Err(ConfigError::InvalidPublicKey(_))
        ));
    }
}
