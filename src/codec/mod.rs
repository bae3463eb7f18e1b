//! Payload Codec
//!
//! Encodes operations into the chain's call payload format,
//! `function@hexArg@hexArg...`, and parses such payloads back into their
//! segments. Everything here is pure.
//!
//! - [`PayloadBuilder`]: fluent encoder with one method per argument type
//! - [`Payload`]: parsed payload with typed argument readers
//! - [`esdt`]: token issuance, roles and NFT lifecycle payloads
//! - [`staking`]: staking and delegation payloads
//!
//! ```
//! use chainsim_harness::codec::PayloadBuilder;
//!
//! let data = PayloadBuilder::new("ESDTModifyRoyalties")
//!     .str_arg("NFT-abcdef")
//!     .u64_arg(1)
//!     .u64_arg(2500)
//!     .build();
//! assert_eq!(data, "ESDTModifyRoyalties@4e46542d616263646566@01@09c4");
//! ```

pub mod esdt;
pub mod staking;

use chainsim_types::encoding::{
    decimal_to_hex, flag_to_hex, hex_to_decimal, hex_to_string, parse_hex_bytes, string_to_hex,
    u64_to_hex,
};
use chainsim_types::{Address, DecodeError};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

pub const ARG_SEPARATOR: char = '@';

// =============================================================================
// Encoding
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBuilder {
    function: String,
    args: Vec<String>,
}

impl PayloadBuilder {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// UTF-8 string, hex of its bytes.
    pub fn str_arg(mut self, value: &str) -> Self {
        self.args.push(string_to_hex(value));
        self
    }

    pub fn u64_arg(mut self, value: u64) -> Self {
        self.args.push(u64_to_hex(value));
        self
    }

    /// Unsigned integer as minimal even-length big-endian hex.
    pub fn uint_arg(mut self, value: &BigUint) -> Self {
        self.args.push(decimal_to_hex(value));
        self
    }

    /// Boolean property: two segments, the name and `"true"`/`"false"`.
    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.args.push(flag_to_hex(name, value));
        self
    }

    /// Address as hex of its public key.
    pub fn address_arg(mut self, address: &Address) -> Self {
        self.args.push(address.to_hex());
        self
    }

    /// Already-hex argument, inserted verbatim (BLS keys, signatures, raw hashes).
    pub fn hex_arg(mut self, hex: impl Into<String>) -> Self {
        self.args.push(hex.into());
        self
    }

    /// Each element as a string argument.
    pub fn str_list<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.args
            .extend(values.iter().map(|v| string_to_hex(v.as_ref())));
        self
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Everything after the function name, without the leading separator.
    pub fn args_string(&self) -> String {
        self.args.join("@")
    }

    pub fn build(self) -> String {
        if self.args.is_empty() {
            return self.function;
        }
        format!("{}@{}", self.function, self.args.join("@"))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.build().into_bytes()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// A payload split into its function name and raw hex segments.
///
/// A flag encoded by [`PayloadBuilder::flag`] occupies two segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub function: String,
    pub args: Vec<String>,
}

impl Payload {
    pub fn parse(data: &str) -> Result<Self, DecodeError> {
        let mut parts = data.split(ARG_SEPARATOR);
        let function = parts
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| DecodeError::new("payload", "missing function name"))?
            .to_string();
        Ok(Self {
            function,
            args: parts.map(str::to_string).collect(),
        })
    }

    pub fn parse_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| DecodeError::new("payload", format!("invalid UTF-8: {}", e)))?;
        Self::parse(text)
    }

    pub fn arg(&self, index: usize) -> Result<&str, DecodeError> {
        self.args.get(index).map(String::as_str).ok_or_else(|| {
            DecodeError::new(
                format!("{} argument {}", self.function, index),
                "missing argument",
            )
        })
    }

    pub fn str_at(&self, index: usize) -> Result<String, DecodeError> {
        hex_to_string(self.arg(index)?, &self.context(index))
    }

    pub fn uint_at(&self, index: usize) -> Result<BigUint, DecodeError> {
        hex_to_decimal(self.arg(index)?, &self.context(index))
    }

    pub fn u64_at(&self, index: usize) -> Result<u64, DecodeError> {
        self.uint_at(index)?
            .to_u64()
            .ok_or_else(|| DecodeError::new(self.context(index), "value exceeds u64"))
    }

    pub fn address_at(&self, index: usize) -> Result<Address, DecodeError> {
        Address::from_hex(self.arg(index)?)
    }

    pub fn bytes_at(&self, index: usize) -> Result<Vec<u8>, DecodeError> {
        parse_hex_bytes(self.arg(index)?, &self.context(index))
    }

    /// Read the flag whose name starts at `index`; returns `(name, value)`.
    pub fn flag_at(&self, index: usize) -> Result<(String, bool), DecodeError> {
        let name = self.str_at(index)?;
        let value = match self.str_at(index + 1)?.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(DecodeError::new(
                    self.context(index + 1),
                    format!("'{}' is not a boolean flag", other),
                ))
            }
        };
        Ok((name, value))
    }

    fn context(&self, index: usize) -> String {
        format!("{} argument {}", self.function, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_without_args() {
        assert_eq!(PayloadBuilder::new("delegate").build(), "delegate");
    }

    #[test]
    fn test_flag_takes_two_segments() {
        let data = PayloadBuilder::new("f").flag("canPause", false).build();
        let payload = Payload::parse(&data).unwrap();
        assert_eq!(payload.args.len(), 2);
        assert_eq!(payload.flag_at(0).unwrap(), ("canPause".to_string(), false));
    }

    #[test]
    fn test_typed_readers() {
        let addr = Address::new([4u8; 32]);
        let data = PayloadBuilder::new("f")
            .str_arg("héllo")
            .u64_arg(0)
            .uint_arg(&BigUint::from(65_536u32))
            .address_arg(&addr)
            .hex_arg("beef")
            .build();
        let p = Payload::parse(&data).unwrap();
        assert_eq!(p.function, "f");
        assert_eq!(p.str_at(0).unwrap(), "héllo");
        assert_eq!(p.arg(1).unwrap(), "00");
        assert_eq!(p.u64_at(1).unwrap(), 0);
        assert_eq!(p.uint_at(2).unwrap(), BigUint::from(65_536u32));
        assert_eq!(p.address_at(3).unwrap(), addr);
        assert_eq!(p.bytes_at(4).unwrap(), vec![0xbe, 0xef]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Payload::parse("").is_err());
        assert!(Payload::parse("@00").is_err());
        let p = Payload::parse("f@zz").unwrap();
        assert!(p.str_at(0).is_err());
        assert!(p.arg(3).is_err());
        assert!(Payload::parse_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_non_boolean_flag_value_rejected() {
        let data = format!("f@{}@{}", string_to_hex("canWipe"), string_to_hex("maybe"));
        assert!(Payload::parse(&data).unwrap().flag_at(0).is_err());
    }
}
