//! Caller-visible result shapes.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};

/// Value carried by a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Bool(bool),
    Text(String),
}

/// The `(success, payload)` envelope.
///
/// On failure the payload is the error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub payload: Payload,
}

impl Response {
    pub fn ok(payload: Payload) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    pub fn fail(error: &RegistryError) -> Self {
        Self {
            success: false,
            payload: Payload::Text(error.to_string()),
        }
    }
}

impl From<Result<Payload, RegistryError>> for Response {
    fn from(result: Result<Payload, RegistryError>) -> Self {
        match result {
            Ok(payload) => Response::ok(payload),
            Err(err) => Response::fail(&err),
        }
    }
}

/// What an invocation hands back.
///
/// `IsValidClaim` answers with a bare boolean; every other operation uses
/// the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Envelope(Response),
    Bare(bool),
}

impl Outcome {
    pub fn envelope(&self) -> Option<&Response> {
        match self {
            Outcome::Envelope(response) => Some(response),
            Outcome::Bare(_) => None,
        }
    }
}
