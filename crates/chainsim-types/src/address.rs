//! Account addresses.
//!
//! An address is a 32-byte public key rendered as bech32 with the `erd`
//! human-readable part. Smart-contract addresses start with 8 zero bytes;
//! system contracts living on the metachain additionally carry the
//! metachain marker right after that prefix.
//!
//! Shard routing follows the chain's last-byte mask rule:
//!
//! ```
//! use chainsim_types::address::{Address, METACHAIN_SHARD_ID};
//!
//! let staking: Address = "erd1qqqqqqqqqqqqqqqpqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqllls0lczs7"
//!     .parse()
//!     .unwrap();
//! assert!(staking.is_smart_contract());
//! assert_eq!(staking.shard(3), METACHAIN_SHARD_ID);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::bech32;
use crate::error::DecodeError;

/// Human-readable part of every account address.
pub const ADDRESS_HRP: &str = "erd";

/// Length of an address public key in bytes.
pub const PUBKEY_LEN: usize = 32;

/// Shard identifier of the metachain.
pub const METACHAIN_SHARD_ID: u32 = 4_294_967_295;

/// Leading zero bytes that mark a smart-contract address.
const SC_PREFIX_LEN: usize = 8;

/// Prefix shared by the metachain system contracts: 9 zero bytes, `0x01`, then 6 zero bytes.
const METACHAIN_SC_PREFIX: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0];

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; PUBKEY_LEN]);

impl Address {
    pub const fn new(pubkey: [u8; PUBKEY_LEN]) -> Self {
        Self(pubkey)
    }

    /// Build from a public key slice; fails unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let arr: [u8; PUBKEY_LEN] = bytes.try_into().map_err(|_| {
            DecodeError::new(
                "address",
                format!("expected {} bytes, got {}", PUBKEY_LEN, bytes.len()),
            )
        })?;
        Ok(Self(arr))
    }

    pub fn from_bech32(s: &str) -> Result<Self, DecodeError> {
        let (hrp, data) = bech32::decode(s.trim())?;
        if hrp != ADDRESS_HRP {
            return Err(DecodeError::new(
                "address",
                format!("unexpected prefix '{}', want '{}'", hrp, ADDRESS_HRP),
            ));
        }
        Self::from_slice(&data)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, DecodeError> {
        let bytes = crate::encoding::parse_hex_bytes(hex_str, "address")?;
        Self::from_slice(&bytes)
    }

    pub fn to_bech32(&self) -> String {
        // 32 bytes always regroup cleanly into 5-bit words, so encode cannot fail
        bech32::encode(ADDRESS_HRP, &self.0).unwrap_or_default()
    }

    /// Lowercase hex of the public key, the form call payloads expect.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn is_smart_contract(&self) -> bool {
        self.0[..SC_PREFIX_LEN].iter().all(|b| *b == 0)
    }

    /// System contracts (staking, validator, ESDT, delegation manager) live on the metachain.
    pub fn is_on_metachain(&self) -> bool {
        self.0[..METACHAIN_SC_PREFIX.len()] == METACHAIN_SC_PREFIX || self.is_zero()
    }

    /// Shard that owns this address for a network with `num_shards` shards.
    pub fn shard(&self, num_shards: u32) -> u32 {
        if self.is_on_metachain() {
            return METACHAIN_SHARD_ID;
        }
        if num_shards <= 1 {
            return 0;
        }
        let bits = 32 - (num_shards - 1).leading_zeros();
        let mask_high = (1u32 << bits) - 1;
        let mask_low = (1u32 << (bits - 1)) - 1;
        let last = u32::from(self.0[PUBKEY_LEN - 1]);
        let shard = last & mask_high;
        if shard > num_shards - 1 {
            last & mask_low
        } else {
            shard
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_bech32())
    }
}

impl FromStr for Address {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_bech32(&s).map_err(de::Error::custom)
    }
}
