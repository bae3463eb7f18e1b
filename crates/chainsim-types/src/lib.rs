//! Shared types for the chainsim-harness workspace.
//!
//! This crate holds what both the transport layer and the harness need
//! without depending on either:
//!
//! - [`address`]: bech32 account addresses with shard routing
//! - [`encoding`]: hex/base64/big-endian argument encodings
//! - [`transaction`]: the [`Transaction`] record, its signing bytes and wire form
//! - [`error`]: the error taxonomy shared across layers
//! - [`env_utils`]: environment-variable configuration helpers

pub mod address;
pub mod bech32;
pub mod encoding;
pub mod env_utils;
pub mod error;
pub mod transaction;

pub use address::{Address, METACHAIN_SHARD_ID};
pub use error::{DecodeError, HarnessError, NodeQueryError, SigningError, SubmissionError};
pub use transaction::{Transaction, TransactionWire, TxStatus};

/// Convenience alias for harness operations.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
