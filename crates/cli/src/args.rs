//! Positional argument syntax for `invoke`.
//!
//! `hex:<hex>` is raw bytes, `bool:true|false` an encoded flag, anything else
//! the UTF-8 bytes of the text.

use anyhow::{Context, Result};
use issuer_types::encode_bool;

pub fn parse_argument(raw: &str) -> Result<Vec<u8>> {
    if let Some(hex_value) = raw.strip_prefix("hex:") {
        return hex::decode(hex_value).with_context(|| format!("invalid hex argument '{raw}'"));
    }
    if let Some(flag) = raw.strip_prefix("bool:") {
        let value: bool = flag
            .parse()
            .with_context(|| format!("invalid boolean argument '{raw}'"))?;
        return Ok(encode_bool(value));
    }
    Ok(raw.as_bytes().to_vec())
}

pub fn parse_arguments(raw: &[String]) -> Result<Vec<Vec<u8>>> {
    raw.iter().map(|arg| parse_argument(arg)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_utf8() {
        assert_eq!(parse_argument("claim-1").unwrap(), b"claim-1".to_vec());
        assert_eq!(parse_argument("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_prefixed_arguments() {
        assert_eq!(parse_argument("hex:00ff").unwrap(), vec![0x00, 0xff]);
        assert_eq!(parse_argument("bool:true").unwrap(), vec![0x01]);
        assert_eq!(parse_argument("bool:false").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_malformed_prefixed_arguments() {
        assert!(parse_argument("hex:zz").is_err());
        assert!(parse_argument("bool:maybe").is_err());
    }
}
