//! Block-Advancement Controller
//!
//! The simulator only moves forward when asked. [`BlockController`] asks for
//! blocks and walks the network through epochs. Any block-production request
//! the node does not acknowledge aborts the calling scenario with
//! [`HarnessError::BlockProduction`]; nothing is retried.

use chainsim_transport::{ChainNode, NetworkStatus};
use chainsim_types::{HarnessError, NodeQueryError, METACHAIN_SHARD_ID};
use tracing::{debug, info};

/// Largest number of blocks requested in one call.
pub const BLOCK_BATCH_SIZE: u64 = 10;

pub struct BlockController<'a> {
    node: &'a dyn ChainNode,
    rounds_per_epoch: u64,
    max_epoch_attempts: usize,
}

impl<'a> BlockController<'a> {
    pub fn new(node: &'a dyn ChainNode, rounds_per_epoch: u64, max_epoch_attempts: usize) -> Self {
        Self {
            node,
            rounds_per_epoch: rounds_per_epoch.max(1),
            max_epoch_attempts,
        }
    }

    /// Produce exactly `count` blocks, in batches.
    pub fn produce_blocks(&self, count: u64) -> Result<(), HarnessError> {
        let mut produced = 0;
        while produced < count {
            let batch = (count - produced).min(BLOCK_BATCH_SIZE);
            self.node
                .generate_blocks(batch)
                .map_err(|source| HarnessError::BlockProduction {
                    requested: count,
                    produced,
                    source,
                })?;
            produced += batch;
        }
        if count > 0 {
            debug!(count, "blocks produced");
        }
        Ok(())
    }

    /// Network status from the metachain, which owns epoch data.
    pub fn network_status(&self) -> Result<NetworkStatus, NodeQueryError> {
        self.node.network_status(METACHAIN_SHARD_ID)
    }

    pub fn current_epoch(&self) -> Result<u32, NodeQueryError> {
        Ok(self.network_status()?.erd_epoch_number)
    }

    /// Produce blocks until the current epoch is at least `target`.
    ///
    /// Each attempt produces the rounds left in the current epoch. Returns the
    /// epoch reached.
    pub fn advance_to_epoch(&self, target: u32) -> Result<u32, HarnessError> {
        let mut current = 0;
        for attempt in 0..=self.max_epoch_attempts {
            let status = self.network_status()?;
            current = status.erd_epoch_number;
            if current >= target {
                info!(epoch = current, target, attempts = attempt, "epoch reached");
                return Ok(current);
            }
            if attempt == self.max_epoch_attempts {
                break;
            }
            self.produce_blocks(self.rounds_left(&status))?;
        }
        Err(HarnessError::EpochNotReached {
            target,
            current,
            attempts: self.max_epoch_attempts,
        })
    }

    /// Produce the rest of the current epoch's rounds and confirm the epoch rolled over.
    pub fn advance_to_end_of_epoch(&self) -> Result<u32, HarnessError> {
        let status = self.network_status()?;
        let start = status.erd_epoch_number;
        self.produce_blocks(self.rounds_left(&status))?;
        let mut current = self.current_epoch()?;
        if current <= start {
            // The epoch change is reported one round late on some setups
            self.produce_blocks(1)?;
            current = self.current_epoch()?;
        }
        if current <= start {
            return Err(HarnessError::EpochNotReached {
                target: start + 1,
                current,
                attempts: 1,
            });
        }
        info!(from = start, to = current, "epoch ended");
        Ok(current)
    }

    /// Rounds until the next epoch, at least one.
    fn rounds_left(&self, status: &NetworkStatus) -> u64 {
        let per_epoch = if status.erd_rounds_per_epoch > 0 {
            status.erd_rounds_per_epoch
        } else {
            self.rounds_per_epoch
        };
        per_epoch
            .saturating_sub(status.erd_rounds_passed_in_current_epoch)
            .max(1)
    }
}
