//! Issuer claim registry
//!
//! The owner registers credential schemas, injects claims against them and
//! revokes claims. Anyone may read a schema definition or ask whether a claim
//! is currently valid.
//!
//! Every operation runs to completion before the next starts; the host is
//! responsible for serialising invocations. Mutating handlers finish all of
//! their checks before the first write.

pub mod config;
pub mod errors;
pub mod invocation;
pub mod operation;
pub mod registry;
pub mod response;

pub use config::IssuerConfig;
pub use errors::*;
pub use invocation::{invocation_digest, Invocation, InvocationSignature};
pub use operation::Operation;
pub use registry::ClaimRegistry;
pub use response::{Outcome, Payload, Response};
