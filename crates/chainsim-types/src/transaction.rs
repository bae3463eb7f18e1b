//! The transaction record and its canonical serializations.
//!
//! A [`Transaction`] is built in memory, serialized to its signing bytes
//! (every field except the signature, as compact JSON with a fixed key order),
//! signed, and finally rendered as [`TransactionWire`] for `/transaction/send`.
//!
//! Relayed transactions carry their fully-signed inner transactions; the
//! inner list is part of the outer signing bytes.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::encoding::{base64_encode, biguint_string};
use crate::error::SigningError;

/// Version written into every transaction.
pub const TX_VERSION: u32 = 2;

/// Minimum gas charged for a plain value transfer.
pub const MIN_GAS_LIMIT: u64 = 50_000;

// =============================================================================
// Transaction
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub value: BigUint,
    pub receiver: Address,
    pub sender: Address,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// Raw payload bytes, conventionally `function@hexArg@hexArg`.
    pub data: Vec<u8>,
    pub chain_id: String,
    pub version: u32,
    pub options: u32,
    /// Set on inner transactions; must equal the wrapping transaction's sender.
    pub relayer: Option<Address>,
    /// Already-signed inner transactions, only on a relayed transaction.
    pub inner_transactions: Vec<Transaction>,
    pub signature: Option<Vec<u8>>,
}

impl Transaction {
    /// Value transfer with an empty payload. Everything else takes defaults.
    pub fn new(sender: Address, receiver: Address, nonce: u64, chain_id: impl Into<String>) -> Self {
        Self {
            nonce,
            value: BigUint::zero(),
            receiver,
            sender,
            gas_price: 0,
            gas_limit: MIN_GAS_LIMIT,
            data: Vec::new(),
            chain_id: chain_id.into(),
            version: TX_VERSION,
            options: 0,
            relayer: None,
            inner_transactions: Vec::new(),
            signature: None,
        }
    }

    pub fn with_value(mut self, value: BigUint) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Mark as an inner transaction paid for by `relayer`.
    pub fn with_relayer(mut self, relayer: Address) -> Self {
        self.relayer = Some(relayer);
        self
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn is_relayed(&self) -> bool {
        !self.inner_transactions.is_empty()
    }

    /// Payload as text, lossy for non-UTF-8 bytes.
    pub fn data_str(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Canonical bytes the sender signs: all fields except `signature`.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, SigningError> {
        serde_json::to_vec(&self.view(false)).map_err(|e| SigningError::Payload(e.to_string()))
    }

    /// Body posted to `/transaction/send`.
    pub fn to_wire(&self) -> TransactionWire {
        self.view(true)
    }

    /// Attach a signature. Only the signature slot changes.
    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.signature = Some(signature);
    }

    fn view(&self, with_signature: bool) -> TransactionWire {
        TransactionWire {
            nonce: self.nonce,
            value: self.value.clone(),
            receiver: self.receiver.to_bech32(),
            sender: self.sender.to_bech32(),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: if self.data.is_empty() {
                None
            } else {
                Some(base64_encode(&self.data))
            },
            chain_id: self.chain_id.clone(),
            version: self.version,
            options: self.options,
            relayer: self.relayer.map(|r| r.to_bech32()),
            // Inner transactions are always serialized with their signatures
            inner_transactions: self.inner_transactions.iter().map(|t| t.view(true)).collect(),
            signature: if with_signature {
                self.signature.as_ref().map(hex::encode)
            } else {
                None
            },
        }
    }
}

// =============================================================================
// Wire format
// =============================================================================

/// JSON form of a transaction. Field order is the canonical signing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWire {
    pub nonce: u64,
    #[serde(with = "biguint_string")]
    pub value: BigUint,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub options: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relayer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner_transactions: Vec<TransactionWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

impl TransactionWire {
    /// Decoded payload bytes; an absent or undecodable field yields an empty payload.
    pub fn data_bytes(&self) -> Vec<u8> {
        self.data
            .as_deref()
            .and_then(|d| crate::encoding::base64_decode(d, "transaction data").ok())
            .unwrap_or_default()
    }
}

// =============================================================================
// Status
// =============================================================================

/// Processing status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Fail,
    /// Not confirmed within the wait budget, or never seen by the node.
    Expired,
}

impl TxStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TxStatus::Pending)
    }

    /// Map a node `process-status` string. Unknown strings return `None`.
    pub fn from_node_status(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" | "successful" | "executed" => Some(TxStatus::Success),
            "fail" | "failed" | "invalid" => Some(TxStatus::Fail),
            "pending" | "received" | "partially-executed" => Some(TxStatus::Pending),
            "expired" => Some(TxStatus::Expired),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Success => "success",
            TxStatus::Fail => "fail",
            TxStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; 32])
    }

    #[test]
    fn test_signing_bytes_key_order_and_omissions() {
        let mut tx = Transaction::new(addr(1), addr(2), 7, "chain");
        tx.value = BigUint::from(10u32);
        tx.gas_price = 1_000_000_000;
        let json = String::from_utf8(tx.signing_bytes().unwrap()).unwrap();
        let expected = format!(
            "{{\"nonce\":7,\"value\":\"10\",\"receiver\":\"{}\",\"sender\":\"{}\",\"gasPrice\":1000000000,\"gasLimit\":50000,\"chainID\":\"chain\",\"version\":2}}",
            addr(2),
            addr(1)
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_signing_bytes_include_data_and_relayer() {
        let mut tx = Transaction::new(addr(1), addr(2), 0, "chain");
        tx.data = b"delegate".to_vec();
        tx.relayer = Some(addr(3));
        let json = String::from_utf8(tx.signing_bytes().unwrap()).unwrap();
        assert!(json.contains("\"data\":\"ZGVsZWdhdGU=\""));
        assert!(json.ends_with(&format!("\"relayer\":\"{}\"}}", addr(3))));
    }

    #[test]
    fn test_signature_excluded_from_signing_bytes() {
        let mut tx = Transaction::new(addr(1), addr(2), 0, "chain");
        let before = tx.signing_bytes().unwrap();
        tx.set_signature(vec![0xab; 64]);
        assert_eq!(tx.signing_bytes().unwrap(), before);
        let wire = serde_json::to_string(&tx.to_wire()).unwrap();
        assert!(wire.ends_with(&format!("\"signature\":\"{}\"}}", "ab".repeat(64))));
    }

    #[test]
    fn test_inner_transactions_carry_signatures() {
        let mut inner = Transaction::new(addr(1), addr(2), 0, "chain");
        inner.relayer = Some(addr(3));
        inner.set_signature(vec![1; 64]);
        let mut outer = Transaction::new(addr(3), addr(3), 5, "chain");
        outer.inner_transactions.push(inner);
        assert!(outer.is_relayed());
        let json = String::from_utf8(outer.signing_bytes().unwrap()).unwrap();
        assert!(json.contains("\"innerTransactions\":[{"));
        assert!(json.contains(&"01".repeat(64)));
        assert!(!json.contains("\"signature\":\"\""));
    }

    #[test]
    fn test_wire_deserialize() {
        let mut tx = Transaction::new(addr(1), addr(2), 3, "chain");
        tx.data = b"issue@41".to_vec();
        let wire = tx.to_wire();
        let json = serde_json::to_string(&wire).unwrap();
        let back: TransactionWire = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data_bytes(), b"issue@41".to_vec());
        assert_eq!(back.nonce, 3);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(TxStatus::from_node_status("success"), Some(TxStatus::Success));
        assert_eq!(TxStatus::from_node_status("invalid"), Some(TxStatus::Fail));
        assert_eq!(TxStatus::from_node_status("pending"), Some(TxStatus::Pending));
        assert_eq!(TxStatus::from_node_status("weird"), None);
        assert!(!TxStatus::Pending.is_terminal());
        assert!(TxStatus::Expired.is_terminal());
        assert_eq!(TxStatus::Fail.to_string(), "fail");
    }
}
