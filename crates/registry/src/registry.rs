//! Claim registry implementation
//!
//! Three maps back the registry: schema definitions and revocability flags,
//! both keyed by schema name, and claim statuses keyed by claim id. Schemas
//! are create-only. Claims only move forward through
//! `Nonexistent -> Valid -> Revoked` and a revoked claim stays on record.

use crate::config::IssuerConfig;
use crate::errors::{RegistryError, Result};
use crate::invocation::Invocation;
use crate::operation::Operation;
use crate::response::{Outcome, Payload, Response};
use issuer_crypto::Witness;
use issuer_storage::{MapId, RegistryStore, Write};
use issuer_types::{decode_bool, decode_string, ClaimStatus, SchemaRecord};
use tracing::{debug, error, info, warn};

/// Single-owner registry of schemas and claims.
pub struct ClaimRegistry<S> {
    config: IssuerConfig,
    store: S,
}

fn expect_args<const N: usize>(args: &[Vec<u8>]) -> Result<[&[u8]; N]> {
    if args.len() != N {
        return Err(RegistryError::IncorrectParameterCount {
            expected: N,
            actual: args.len(),
        });
    }
    Ok(std::array::from_fn(|i| args[i].as_slice()))
}

fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

impl<S: RegistryStore> ClaimRegistry<S> {
    pub fn new(config: IssuerConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a request, authenticating with the signature it carries.
    pub fn execute(&self, invocation: &Invocation) -> Outcome {
        let witness = invocation.witness();
        self.invoke(&invocation.operation, &invocation.args, witness.as_ref())
    }

    /// Route `operation` to its handler.
    ///
    /// Never fails: every error, including store failures, is folded into
    /// the returned outcome.
    pub fn invoke(&self, operation: &str, args: &[Vec<u8>], witness: &dyn Witness) -> Outcome {
        let operation = Operation::parse(operation);
        debug!(%operation, args = args.len(), "dispatching");

        let result = match &operation {
            Operation::IsValidClaim => return Outcome::Bare(self.is_valid_claim_args(args)),
            Operation::Name => Ok(Payload::Text(self.config.name().to_string())),
            Operation::PublicKey => Ok(Payload::Text(self.config.public_key_hex())),
            Operation::GetSchemaDetails => expect_args::<1>(args)
                .and_then(|[schema_name]| self.get_schema_details(schema_name))
                .map(Payload::Text),
            Operation::RegisterSchema => expect_args::<3>(args)
                .and_then(|[schema_name, definition, revocable]| {
                    self.register_schema(schema_name, definition, revocable, witness)
                })
                .map(Payload::Bool),
            Operation::InjectClaim => expect_args::<1>(args)
                .and_then(|[claim_id]| self.inject_claim(claim_id, witness))
                .map(Payload::Bool),
            Operation::RevokeClaim => expect_args::<1>(args)
                .and_then(|[claim_id]| self.revoke_claim(claim_id, witness))
                .map(Payload::Bool),
            Operation::Unknown(name) => Err(RegistryError::InvalidOperation(name.clone())),
        };

        if let Err(err) = &result {
            match err {
                RegistryError::Storage(_) | RegistryError::Codec(_) => {
                    error!(%operation, error = %err, "operation failed")
                }
                RegistryError::Unauthorized => {
                    warn!(%operation, "rejected caller without owner witness")
                }
                _ => debug!(%operation, error = %err, "operation rejected"),
            }
        }
        Outcome::Envelope(Response::from(result))
    }

    fn require_owner(&self, witness: &dyn Witness) -> Result<()> {
        if witness.check_witness(self.config.owner()) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized)
        }
    }

    /// Public read of a schema definition.
    pub fn get_schema_details(&self, schema_name: impl AsRef<[u8]>) -> Result<String> {
        let raw = self.store.get(MapId::SchemaDefinitions, schema_name.as_ref())?;
        decode_string(raw.as_deref())?.ok_or(RegistryError::SchemaNotFound)
    }

    /// Definition and revocability of a schema, if registered.
    pub fn schema_record(&self, schema_name: impl AsRef<[u8]>) -> Result<Option<SchemaRecord>> {
        let key = schema_name.as_ref();
        let raw = self.store.get(MapId::SchemaDefinitions, key)?;
        let Some(definition) = decode_string(raw.as_deref())? else {
            return Ok(None);
        };
        let revocable = self
            .store
            .get(MapId::RevocableSchemas, key)?
            .map(|raw| decode_bool(&raw))
            .unwrap_or(false);

        Ok(Some(SchemaRecord {
            name: display_key(key),
            definition,
            revocable,
        }))
    }

    /// Create a schema. Owner only; an existing schema is never overwritten.
    pub fn register_schema(
        &self,
        schema_name: impl AsRef<[u8]>,
        definition: impl AsRef<[u8]>,
        revocable: impl AsRef<[u8]>,
        witness: &dyn Witness,
    ) -> Result<bool> {
        self.require_owner(witness)?;

        let key = schema_name.as_ref();
        let existing = self.store.get(MapId::SchemaDefinitions, key)?;
        if decode_string(existing.as_deref())?.is_some() {
            return Err(RegistryError::SchemaAlreadyExists);
        }
        if std::str::from_utf8(definition.as_ref()).is_err() {
            return Err(RegistryError::InvalidSchemaDefinition);
        }

        self.store.put_all(&[
            Write::new(MapId::SchemaDefinitions, key, definition.as_ref()),
            Write::new(MapId::RevocableSchemas, key, revocable.as_ref()),
        ])?;

        info!(
            schema = %display_key(key),
            revocable = decode_bool(revocable.as_ref()),
            "registered schema"
        );
        Ok(true)
    }

    pub fn claim_status(&self, claim_id: impl AsRef<[u8]>) -> Result<ClaimStatus> {
        let raw = self.store.get(MapId::Claims, claim_id.as_ref())?;
        Ok(ClaimStatus::decode(raw.as_deref())?)
    }

    /// Issue a claim. Owner only; a claim id can be issued once, even after
    /// revocation.
    pub fn inject_claim(&self, claim_id: impl AsRef<[u8]>, witness: &dyn Witness) -> Result<bool> {
        self.require_owner(witness)?;

        let key = claim_id.as_ref();
        if self.claim_status(key)? != ClaimStatus::Nonexistent {
            return Err(RegistryError::ClaimAlreadyExists);
        }

        self.store.put(MapId::Claims, key, &ClaimStatus::Valid.encode())?;
        info!(claim = %display_key(key), "injected claim");
        Ok(true)
    }

    /// Revoke a claim. Owner only; revoking twice is a successful no-op.
    pub fn revoke_claim(&self, claim_id: impl AsRef<[u8]>, witness: &dyn Witness) -> Result<bool> {
        self.require_owner(witness)?;

        let key = claim_id.as_ref();
        match self.claim_status(key)? {
            ClaimStatus::Nonexistent => Err(RegistryError::ClaimNotFound),
            ClaimStatus::Revoked => {
                debug!(claim = %display_key(key), "claim already revoked");
                Ok(true)
            }
            ClaimStatus::Valid => {
                self.store.put(MapId::Claims, key, &ClaimStatus::Revoked.encode())?;
                info!(claim = %display_key(key), "revoked claim");
                Ok(true)
            }
        }
    }

    /// Public check: `true` only for an issued, unrevoked claim.
    pub fn is_valid_claim(&self, claim_id: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.claim_status(claim_id)?.is_valid())
    }

    fn is_valid_claim_args(&self, args: &[Vec<u8>]) -> bool {
        let Ok([claim_id]) = expect_args::<1>(args) else {
            return false;
        };
        match self.is_valid_claim(claim_id) {
            Ok(valid) => valid,
            Err(err) => {
                error!(claim = %display_key(claim_id), error = %err, "validity check failed");
                false
            }
        }
    }
}
