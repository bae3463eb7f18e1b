//! Chain Simulator Transport Layer
//!
//! Node access for the harness over the proxy's HTTP/JSON API.
//!
//! This crate provides:
//! - [`node`]: the [`ChainNode`] trait, the handle injected into every harness component
//! - [`proxy`]: [`ProxyClient`], the blocking `ureq` implementation
//! - [`responses`]: typed structures for each endpoint's response
//! - [`network`]: proxy URL resolution and route construction
//!
//! # Example
//!
//! ```ignore
//! use chainsim_transport::{ChainNode, ProxyClient};
//!
//! let client = ProxyClient::new("http://localhost:8085");
//! let status = client.network_status(chainsim_types::METACHAIN_SHARD_ID)?;
//! println!("epoch {}", status.erd_epoch_number);
//! ```

pub mod network;
pub mod node;
pub mod proxy;
pub mod responses;

pub use node::{ChainNode, ProcessStatus, TX_NOT_FOUND};
pub use proxy::ProxyClient;
pub use responses::{
    AccountDetail, EsdtToken, LogEvent, NetworkStatus, SmartContractResult, StateEntry,
    TransactionOnChain, ValidatorStatistic, VmQuery, VmQueryResult,
};

use std::time::Duration;

/// Build a [`ProxyClient`] from explicit settings, falling back to the environment.
pub fn create_proxy_client(
    explicit_url: Option<&str>,
    timeout: Duration,
    connect_timeout: Duration,
) -> ProxyClient {
    let url = network::resolve_proxy_url(explicit_url);
    ProxyClient::with_timeouts(&url, timeout, connect_timeout)
}
