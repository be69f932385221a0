//! Error types for the claim registry

use issuer_crypto::CryptoError;
use issuer_storage::StorageError;
use issuer_types::CodecError;
use thiserror::Error;

/// Failures of a single invocation.
///
/// The display strings of the variants before `Storage` are what callers see
/// in the response envelope and must not change.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Incorrect number of parameters")]
    IncorrectParameterCount { expected: usize, actual: usize },

    #[error("Only SmartContract owner can call this operation")]
    Unauthorized,

    #[error("Schema already exists")]
    SchemaAlreadyExists,

    #[error("Schema does not exist")]
    SchemaNotFound,

    #[error("Schema definition must be valid UTF-8")]
    InvalidSchemaDefinition,

    #[error("Claim already exists")]
    ClaimAlreadyExists,

    #[error("Claim does not exist")]
    ClaimNotFound,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Registry storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Corrupt registry record: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("issuer name must not be empty")]
    EmptyName,

    #[error("invalid owner public key: {0}")]
    InvalidPublicKey(#[from] CryptoError),
}
