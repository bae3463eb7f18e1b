//! Account Nonce Tracker
//!
//! A [`NonceCache`] is owned by one account handle. It is empty until first
//! used, then advances only by local increment; the node is consulted again
//! only on an explicit [`NonceCache::refresh`]. The fetch-then-increment
//! sequence is not atomic, so a cache must not be shared across threads.

use chainsim_transport::ChainNode;
use chainsim_types::{Address, HarnessError, NodeQueryError};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceCache {
    address: Address,
    cached: Option<u64>,
}

impl NonceCache {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            cached: None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Cached value without touching the node.
    pub fn cached(&self) -> Option<u64> {
        self.cached
    }

    /// Nonce the next transaction will use. Fetches only while the cache is empty.
    pub fn current(&mut self, node: &dyn ChainNode) -> Result<u64, NodeQueryError> {
        match self.cached {
            Some(nonce) => Ok(nonce),
            None => self.refresh(node),
        }
    }

    /// Allocate a nonce: return the current value and advance the cache by one.
    ///
    /// Fails without allocating when the nonce cannot advance past `u64::MAX`.
    pub fn next(&mut self, node: &dyn ChainNode) -> Result<u64, HarnessError> {
        let nonce = self.current(node)?;
        let following = nonce.checked_add(1).ok_or_else(|| {
            HarnessError::Build(format!("nonce of {} is exhausted at {}", self.address, nonce))
        })?;
        self.cached = Some(following);
        info!(address = %self.address, nonce, "allocated nonce");
        Ok(nonce)
    }

    /// Overwrite the cache with the node's value, whatever it held before.
    pub fn refresh(&mut self, node: &dyn ChainNode) -> Result<u64, NodeQueryError> {
        let nonce = node.nonce(&self.address)?;
        debug!(address = %self.address, nonce, previous = ?self.cached, "nonce fetched");
        self.cached = Some(nonce);
        Ok(nonce)
    }
}
