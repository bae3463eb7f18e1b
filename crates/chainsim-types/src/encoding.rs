//! Encoding utilities for hex, base64 and big-endian integers.
//!
//! These are the argument encodings used by the chain's `@`-delimited call
//! payloads, plus the decoders applied to base64 values returned by VM
//! queries and event topics.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::DecodeError;

// =============================================================================
// Argument Encoding
// =============================================================================

/// Encode an unsigned integer as minimal big-endian hex of even length.
///
/// Odd-length hex is left-padded with a single `0`; zero encodes as `"00"`.
///
/// ```
/// use chainsim_types::encoding::decimal_to_hex;
/// use num_bigint::BigUint;
///
/// assert_eq!(decimal_to_hex(&BigUint::from(0u32)), "00");
/// assert_eq!(decimal_to_hex(&BigUint::from(255u32)), "ff");
/// assert_eq!(decimal_to_hex(&BigUint::from(256u32)), "0100");
/// ```
pub fn decimal_to_hex(value: &BigUint) -> String {
    let hex = value.to_str_radix(16);
    if hex.len() % 2 == 1 {
        format!("0{}", hex)
    } else {
        hex
    }
}

/// [`decimal_to_hex`] for machine integers.
pub fn u64_to_hex(value: u64) -> String {
    decimal_to_hex(&BigUint::from(value))
}

/// Hex of the UTF-8 bytes of `s`.
pub fn string_to_hex(s: &str) -> String {
    hex::encode(s.as_bytes())
}

/// Encode a boolean property as `hex(name)@hex("true"|"false")`.
pub fn flag_to_hex(name: &str, value: bool) -> String {
    let value = if value { "true" } else { "false" };
    format!("{}@{}", string_to_hex(name), string_to_hex(value))
}

/// Parse a hex string to raw bytes. Accepts an optional `0x` prefix.
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>, DecodeError> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(hex_str).map_err(|e| DecodeError::new(context, e))
}

/// Decode hex into a UTF-8 string.
pub fn hex_to_string(hex_str: &str, context: &str) -> Result<String, DecodeError> {
    let bytes = parse_hex_bytes(hex_str, context)?;
    String::from_utf8(bytes).map_err(|e| DecodeError::new(context, e))
}

/// Decode big-endian hex into an unsigned integer. Empty input is zero.
pub fn hex_to_decimal(hex_str: &str, context: &str) -> Result<BigUint, DecodeError> {
    let bytes = parse_hex_bytes(hex_str, context)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

// =============================================================================
// Base64 Encoding/Decoding
// =============================================================================

/// Encode bytes to a standard (padded) base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64 with a context-aware error.
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>, DecodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| DecodeError::new(context, format!("invalid base64: {}", e)))
}

/// Decode base64 and interpret the bytes as UTF-8.
pub fn base64_to_string(b64: &str, context: &str) -> Result<String, DecodeError> {
    let bytes = base64_decode(b64, context)?;
    String::from_utf8(bytes).map_err(|e| DecodeError::new(context, format!("invalid UTF-8: {}", e)))
}

/// Decode base64 and interpret the bytes as a big-endian unsigned integer.
///
/// An empty value decodes to zero, matching how the VM returns a zero amount.
pub fn base64_to_decimal(b64: &str, context: &str) -> Result<BigUint, DecodeError> {
    let bytes = base64_decode(b64, context)?;
    if bytes.is_empty() {
        return Ok(BigUint::zero());
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Decode base64 and re-encode the bytes as lowercase hex.
pub fn base64_to_hex(b64: &str, context: &str) -> Result<String, DecodeError> {
    Ok(hex::encode(base64_decode(b64, context)?))
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Serialize a `BigUint` as a decimal string, the way the node's JSON API
/// carries balances and transaction values.
pub mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_decimal(&raw).map_err(de::Error::custom)
    }

    pub(crate) fn parse_decimal(raw: &str) -> Result<BigUint, String> {
        BigUint::parse_bytes(raw.trim().as_bytes(), 10)
            .ok_or_else(|| format!("'{}' is not a decimal integer", raw))
    }
}

/// Parse a decimal amount string such as a balance.
pub fn parse_decimal(raw: &str, context: &str) -> Result<BigUint, DecodeError> {
    biguint_string::parse_decimal(raw).map_err(|e| DecodeError::new(context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_to_hex_even_length() {
        for v in [0u64, 1, 15, 16, 255, 256, 4095, 4096, u64::MAX] {
            let hex = u64_to_hex(v);
            assert_eq!(hex.len() % 2, 0, "odd hex for {}: {}", v, hex);
            assert_eq!(u64::from_str_radix(&hex, 16).unwrap(), v);
        }
        assert_eq!(u64_to_hex(0), "00");
        assert_eq!(u64_to_hex(10), "0a");
        assert_eq!(u64_to_hex(256), "0100");
    }

    #[test]
    fn test_decimal_to_hex_large_amount() {
        // 2500 EGLD in base units
        let amount = BigUint::parse_bytes(b"2500000000000000000000", 10).unwrap();
        assert_eq!(decimal_to_hex(&amount), "878678326eac900000");
    }

    #[test]
    fn test_string_and_flag_hex() {
        assert_eq!(string_to_hex("TKN"), "544b4e");
        assert_eq!(
            flag_to_hex("canFreeze", true),
            format!("{}@{}", string_to_hex("canFreeze"), "74727565")
        );
        assert!(flag_to_hex("canWipe", false).ends_with("@66616c7365"));
    }

    #[test]
    fn test_base64_decoders() {
        assert_eq!(base64_to_string("aGVsbG8=", "t").unwrap(), "hello");
        assert_eq!(base64_to_decimal("AQA=", "t").unwrap(), BigUint::from(256u32));
        assert_eq!(base64_to_decimal("", "t").unwrap(), BigUint::zero());
        assert_eq!(base64_to_hex("AQA=", "t").unwrap(), "0100");
    }

    #[test]
    fn test_base64_decode_errors() {
        let err = base64_to_string("not base64!", "return data").unwrap_err();
        assert_eq!(err.context, "return data");
        // 0xff is not valid UTF-8
        assert!(base64_to_string("/w==", "name").is_err());
    }

    #[test]
    fn test_hex_decoders() {
        assert_eq!(hex_to_string("544b4e", "t").unwrap(), "TKN");
        assert_eq!(hex_to_decimal("0100", "t").unwrap(), BigUint::from(256u32));
        assert_eq!(parse_hex_bytes("0x0a0b", "t").unwrap(), vec![0x0a, 0x0b]);
        assert!(parse_hex_bytes("zz", "t").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1000", "balance").unwrap(), BigUint::from(1000u32));
        assert!(parse_decimal("12a", "balance").is_err());
    }
}
