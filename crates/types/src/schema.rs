use serde::{Deserialize, Serialize};

/// A registered credential schema as read back from the store.
///
/// The definition is opaque to the registry; `revocable` is fixed at
/// registration and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub name: String,
    pub definition: String,
    pub revocable: bool,
}
