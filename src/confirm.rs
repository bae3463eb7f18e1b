//! Submission & Confirmation Engine
//!
//! A submitted transaction moves `Submitted -> Pending -> {Success, Fail, Expired}`.
//! Waiting is bounded by blocks, not wall-clock time: every unresolved check
//! produces one block and pauses for the poll interval. A hash that stays
//! pending or unknown after `max_blocks` blocks is `Expired`.
//!
//! Submission is never retried. A rejection at submit time is a
//! [`SubmissionError`](chainsim_types::SubmissionError) from [`Submitter::submit`];
//! [`Submitter::execute`] folds it into a `fail` outcome carrying the node's text.

use std::time::Duration;

use chainsim_transport::{ChainNode, LogEvent, ProcessStatus};
use chainsim_types::encoding::base64_to_string;
use chainsim_types::{HarnessError, NodeQueryError, Transaction, TxStatus};
use tracing::{debug, info, warn};

use crate::chain::BlockController;
use crate::config::HarnessConfig;

const SIGNAL_ERROR: &str = "signalError";
const INTERNAL_VM_ERRORS: &str = "internalVMErrors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub max_blocks: u64,
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            max_blocks: config.max_blocks,
            poll_interval: config.poll_interval,
        }
    }
}

/// Terminal result of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// `None` when the node refused the transaction at submission.
    pub hash: Option<String>,
    pub status: TxStatus,
    /// Failure text reported by the node, when there is one.
    pub error: Option<String>,
}

impl TxOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }

    /// True when the failure text mentions `needle`.
    pub fn error_contains(&self, needle: &str) -> bool {
        self.error.as_deref().is_some_and(|e| e.contains(needle))
    }
}

pub struct Submitter<'a> {
    node: &'a dyn ChainNode,
    blocks: BlockController<'a>,
    policy: ConfirmationPolicy,
}

impl<'a> Submitter<'a> {
    pub fn new(node: &'a dyn ChainNode, blocks: BlockController<'a>, policy: ConfirmationPolicy) -> Self {
        Self {
            node,
            blocks,
            policy,
        }
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    /// Send a signed transaction and return the node-assigned hash.
    pub fn submit(&self, tx: &Transaction) -> Result<String, HarnessError> {
        if !tx.is_signed() {
            return Err(HarnessError::Build(format!(
                "transaction from {} with nonce {} is not signed",
                tx.sender, tx.nonce
            )));
        }
        let hash = self.node.send_transaction(&tx.to_wire())?;
        info!(hash = %hash, sender = %tx.sender, nonce = tx.nonce, "transaction submitted");
        Ok(hash)
    }

    /// Current status. Unknown hashes and unrecognized strings count as pending.
    pub fn status(&self, hash: &str) -> Result<TxStatus, NodeQueryError> {
        match self.node.process_status(hash)? {
            ProcessStatus::NotFound => Ok(TxStatus::Pending),
            ProcessStatus::Found(raw) => Ok(TxStatus::from_node_status(&raw).unwrap_or_else(|| {
                warn!(hash = %hash, status = %raw, "unrecognized process status, treating as pending");
                TxStatus::Pending
            })),
        }
    }

    pub fn await_terminal(&self, hash: &str) -> Result<TxStatus, HarnessError> {
        self.await_terminal_within(hash, self.policy.max_blocks)
    }

    /// Wait for a terminal status, producing at most `max_blocks` blocks.
    pub fn await_terminal_within(&self, hash: &str, max_blocks: u64) -> Result<TxStatus, HarnessError> {
        let mut produced = 0;
        loop {
            let status = self.status(hash)?;
            if status.is_terminal() {
                info!(hash = %hash, status = %status, blocks = produced, "transaction finished");
                return Ok(status);
            }
            if produced >= max_blocks {
                info!(hash = %hash, blocks = produced, "transaction expired");
                return Ok(TxStatus::Expired);
            }
            self.blocks.produce_blocks(1)?;
            produced += 1;
            if !self.policy.poll_interval.is_zero() {
                std::thread::sleep(self.policy.poll_interval);
            }
        }
    }

    /// Submit, wait, and on failure collect the node's error text.
    pub fn execute(&self, tx: &Transaction) -> Result<TxOutcome, HarnessError> {
        let hash = match self.submit(tx) {
            Ok(hash) => hash,
            Err(HarnessError::Submission(e)) => {
                warn!(sender = %tx.sender, nonce = tx.nonce, error = %e, "transaction rejected at submission");
                return Ok(TxOutcome {
                    hash: None,
                    status: TxStatus::Fail,
                    error: Some(e.message),
                });
            }
            Err(e) => return Err(e),
        };
        let status = self.await_terminal(&hash)?;
        let error = if status == TxStatus::Fail {
            self.failure_reason(&hash)?
        } else {
            None
        };
        Ok(TxOutcome {
            hash: Some(hash),
            status,
            error,
        })
    }

    /// Like [`execute`](Self::execute) but anything other than `success` is an error.
    pub fn execute_expect_success(&self, tx: &Transaction) -> Result<TxOutcome, HarnessError> {
        let outcome = self.execute(tx)?;
        if outcome.is_success() {
            return Ok(outcome);
        }
        Err(HarnessError::TxFailed {
            hash: outcome.hash,
            status: outcome.status.to_string(),
            message: outcome.error.unwrap_or_default(),
        })
    }

    /// First error text found in the transaction's events or contract results.
    pub fn failure_reason(&self, hash: &str) -> Result<Option<String>, HarnessError> {
        let tx = self.node.transaction_with_results(hash)?;
        if let Some(reason) = event_error(tx.events())? {
            return Ok(Some(reason));
        }
        for scr in &tx.smart_contract_results {
            if let Some(reason) = event_error(scr.events())? {
                return Ok(Some(reason));
            }
            if !scr.return_message.is_empty() {
                return Ok(Some(scr.return_message.clone()));
            }
        }
        debug!(hash = %hash, "no failure reason recorded");
        Ok(None)
    }
}

fn event_error(events: &[LogEvent]) -> Result<Option<String>, HarnessError> {
    for event in events {
        match event.identifier.as_str() {
            SIGNAL_ERROR => {
                if let Some(topic) = event.topics.get(1) {
                    return Ok(Some(base64_to_string(topic, "signalError reason")?));
                }
            }
            INTERNAL_VM_ERRORS if !event.data.is_empty() => {
                return Ok(Some(base64_to_string(&event.data, "internal VM error")?));
            }
            _ => {}
        }
    }
    Ok(None)
}
