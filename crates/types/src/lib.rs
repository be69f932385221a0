//! Core types shared by the issuer registry crates.
//!
//! Records live in the key-value store as raw bytes; this crate owns the
//! conversions between those bytes and the typed values the registry reasons
//! about.

pub mod address;
pub mod codec;
pub mod schema;
pub mod status;

pub use address::*;
pub use codec::*;
pub use schema::*;
pub use status::*;
