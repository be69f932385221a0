use crate::codec::{decode_integer, encode_integer, CodecError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an issued claim.
///
/// Transitions only move forward: `Nonexistent -> Valid -> Revoked`.
/// `Nonexistent` is never written; it is what an absent record decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClaimStatus {
    Nonexistent = 0,
    Valid = 1,
    Revoked = 2,
}

impl ClaimStatus {
    pub fn encode(self) -> Vec<u8> {
        encode_integer(self as i128)
    }

    /// Fails closed on values outside the known set.
    pub fn decode(bytes: Option<&[u8]>) -> Result<Self, CodecError> {
        let value = match bytes {
            None => return Ok(ClaimStatus::Nonexistent),
            Some(raw) => decode_integer(raw)?,
        };

        match value {
            0 => Ok(ClaimStatus::Nonexistent),
            1 => Ok(ClaimStatus::Valid),
            2 => Ok(ClaimStatus::Revoked),
            other => Err(CodecError::UnknownStatus(other)),
        }
    }

    pub fn is_valid(self) -> bool {
        self == ClaimStatus::Valid
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClaimStatus::Nonexistent => "nonexistent",
            ClaimStatus::Valid => "valid",
            ClaimStatus::Revoked => "revoked",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bytes_match_numeric_values() {
        assert_eq!(ClaimStatus::Nonexistent.encode(), Vec::<u8>::new());
        assert_eq!(ClaimStatus::Valid.encode(), vec![0x01]);
        assert_eq!(ClaimStatus::Revoked.encode(), vec![0x02]);
    }

    #[test]
    fn absent_or_empty_record_is_nonexistent() {
        assert_eq!(ClaimStatus::decode(None).unwrap(), ClaimStatus::Nonexistent);
        assert_eq!(
            ClaimStatus::decode(Some(&[])).unwrap(),
            ClaimStatus::Nonexistent
        );
    }

    #[test]
    fn out_of_range_status_fails_closed() {
        assert_eq!(
            ClaimStatus::decode(Some(&[0x03])).unwrap_err(),
            CodecError::UnknownStatus(3)
        );
        assert_eq!(
            ClaimStatus::decode(Some(&[0xff])).unwrap_err(),
            CodecError::UnknownStatus(-1)
        );
    }

    #[test]
    fn only_valid_status_is_valid() {
        assert!(ClaimStatus::Valid.is_valid());
        assert!(!ClaimStatus::Revoked.is_valid());
        assert!(!ClaimStatus::Nonexistent.is_valid());
    }
}
