//! Byte-level encodings for values kept in the registry maps.
//!
//! Integers use the minimal little-endian two's complement form: zero is the
//! empty byte string and no redundant sign-extension bytes are emitted.

/// Widest integer accepted by [`decode_integer`].
pub const MAX_INTEGER_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("integer of {0} bytes exceeds {MAX_INTEGER_BYTES} byte limit")]
    IntegerOverflow(usize),
    #[error("unknown claim status value {0}")]
    UnknownStatus(i128),
    #[error("stored value is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub fn encode_integer(value: i128) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let bytes = value.to_le_bytes();
    let mut len = bytes.len();
    while len > 1 {
        let last = bytes[len - 1];
        let sign_bit = bytes[len - 2] & 0x80 != 0;
        let redundant = (last == 0x00 && !sign_bit) || (last == 0xff && sign_bit);
        if !redundant {
            break;
        }
        len -= 1;
    }

    bytes[..len].to_vec()
}

pub fn decode_integer(bytes: &[u8]) -> Result<i128, CodecError> {
    let Some(&last) = bytes.last() else {
        return Ok(0);
    };
    if bytes.len() > MAX_INTEGER_BYTES {
        return Err(CodecError::IntegerOverflow(bytes.len()));
    }

    let fill = if last & 0x80 != 0 { 0xff } else { 0x00 };
    let mut buf = [fill; MAX_INTEGER_BYTES];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(i128::from_le_bytes(buf))
}

/// Decode a stored string record.
///
/// A missing record and an empty one both decode to `None`, so a string that
/// was stored empty cannot be told apart from one that was never stored.
pub fn decode_string(bytes: Option<&[u8]>) -> Result<Option<String>, CodecError> {
    match bytes {
        None | Some([]) => Ok(None),
        Some(raw) => Ok(Some(String::from_utf8(raw.to_vec())?)),
    }
}

pub fn encode_bool(value: bool) -> Vec<u8> {
    if value {
        vec![0x01]
    } else {
        Vec::new()
    }
}

/// Any non-zero byte counts as `true`.
pub fn decode_bool(bytes: &[u8]) -> bool {
    bytes.iter().any(|b| *b != 0)
}
