//! The node handle every harness component talks through.
//!
//! [`ChainNode`] is the full RPC surface the harness consumes. The production
//! implementation is [`ProxyClient`](crate::proxy::ProxyClient); tests inject
//! an in-memory implementation instead. All calls are blocking.

use std::collections::BTreeMap;

use chainsim_types::{Address, NodeQueryError, SubmissionError, TransactionWire};
use num_bigint::BigUint;

use crate::responses::{
    AccountDetail, EsdtToken, NetworkStatus, StateEntry, TransactionOnChain, ValidatorStatistic,
    VmQuery, VmQueryResult,
};

/// Marker text the node uses for an unknown transaction hash.
pub const TX_NOT_FOUND: &str = "transaction not found";

/// Result of `GET /transaction/{hash}/process-status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Raw status string as reported by the node.
    Found(String),
    /// The node has never seen this hash.
    NotFound,
}

pub trait ChainNode {
    /// Network status as seen from `shard` (use the metachain id for epoch data).
    fn network_status(&self, shard: u32) -> Result<NetworkStatus, NodeQueryError>;

    fn nonce(&self, address: &Address) -> Result<u64, NodeQueryError>;

    fn balance(&self, address: &Address) -> Result<BigUint, NodeQueryError>;

    fn account(&self, address: &Address) -> Result<AccountDetail, NodeQueryError>;

    /// Token identifier -> roles held by `address`.
    fn esdt_roles(&self, address: &Address)
        -> Result<BTreeMap<String, Vec<String>>, NodeQueryError>;

    /// Every token balance / NFT instance held by `address`, keyed by full identifier.
    fn esdt_tokens(&self, address: &Address) -> Result<BTreeMap<String, EsdtToken>, NodeQueryError>;

    fn registered_nfts(&self, address: &Address) -> Result<Vec<String>, NodeQueryError>;

    fn vm_query(&self, query: &VmQuery) -> Result<VmQueryResult, NodeQueryError>;

    /// Submit a signed transaction and return its hash.
    fn send_transaction(&self, tx: &TransactionWire) -> Result<String, SubmissionError>;

    fn process_status(&self, hash: &str) -> Result<ProcessStatus, NodeQueryError>;

    fn transaction_with_results(&self, hash: &str) -> Result<TransactionOnChain, NodeQueryError>;

    /// Ask the simulator for `count` blocks. `Ok` only when the node acknowledged them.
    fn generate_blocks(&self, count: u64) -> Result<(), NodeQueryError>;

    fn add_keys(&self, private_keys_base64: &[String]) -> Result<(), NodeQueryError>;

    fn set_state(&self, entries: &[StateEntry]) -> Result<(), NodeQueryError>;

    fn force_reset_validator_statistics(&self) -> Result<(), NodeQueryError>;

    /// BLS public key hex -> consensus statistics.
    fn validator_statistics(&self) -> Result<BTreeMap<String, ValidatorStatistic>, NodeQueryError>;
}
