use serde::Serialize;
use std::fmt;

/// Identity of a caller or of the registry owner: a 32-byte digest.
///
/// Rendered as `i` followed by lowercase hex in logs and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Address(pub [u8; 32]);

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", hex::encode(self.0))
    }
}
