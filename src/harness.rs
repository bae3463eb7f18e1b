//! Scenario-level entry point: one node handle plus configuration.

use std::rc::Rc;

use chainsim_transport::{create_proxy_client, ChainNode, StateEntry};
use chainsim_types::{HarnessError, NodeQueryError, Transaction};
use tracing::info;

use crate::builder::TransactionBuilder;
use crate::chain::BlockController;
use crate::config::HarnessConfig;
use crate::confirm::{ConfirmationPolicy, Submitter, TxOutcome};
use crate::constants::BLOCKS_AFTER_EPOCH_CHANGE;
use crate::poll::{poll_until, PollOutcome, PollPolicy};
use crate::validator_key::ValidatorKey;
use crate::wallet::Wallet;

const ELIGIBLE: &str = "eligible";

pub struct Harness {
    node: Rc<dyn ChainNode>,
    config: HarnessConfig,
    builder: TransactionBuilder,
}

impl Harness {
    /// Talk to the proxy at `config.proxy_url`.
    pub fn connect(config: HarnessConfig) -> Self {
        let client = create_proxy_client(
            Some(&config.proxy_url),
            config.http_timeout,
            config.http_connect_timeout,
        );
        Self::with_node(Rc::new(client), config)
    }

    pub fn with_node(node: Rc<dyn ChainNode>, config: HarnessConfig) -> Self {
        let builder = TransactionBuilder::from_config(&config);
        Self {
            node,
            config,
            builder,
        }
    }

    pub fn node(&self) -> &dyn ChainNode {
        self.node.as_ref()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn builder(&self) -> &TransactionBuilder {
        &self.builder
    }

    pub fn blocks(&self) -> BlockController<'_> {
        BlockController::new(
            self.node(),
            self.config.rounds_per_epoch,
            self.config.max_epoch_attempts,
        )
    }

    pub fn submitter(&self) -> Submitter<'_> {
        Submitter::new(
            self.node(),
            self.blocks(),
            ConfirmationPolicy::from_config(&self.config),
        )
    }

    /// Sign `tx` with `wallet` and run it to a terminal status.
    pub fn execute(&self, wallet: &Wallet, mut tx: Transaction) -> Result<TxOutcome, HarnessError> {
        wallet.sign(&mut tx)?;
        self.submitter().execute(&tx)
    }

    pub fn execute_expect_success(
        &self,
        wallet: &Wallet,
        mut tx: Transaction,
    ) -> Result<TxOutcome, HarnessError> {
        wallet.sign(&mut tx)?;
        self.submitter().execute_expect_success(&tx)
    }

    // =========================================================================
    // Simulator commands
    // =========================================================================

    /// Register validator keys with the simulator so it can sign blocks with them.
    pub fn add_keys(&self, keys: &[ValidatorKey]) -> Result<(), NodeQueryError> {
        let bodies: Vec<String> = keys.iter().map(|k| k.private_key_base64.clone()).collect();
        self.node.add_keys(&bodies)?;
        info!(count = keys.len(), "validator keys added");
        Ok(())
    }

    pub fn set_state(&self, entries: &[StateEntry]) -> Result<(), NodeQueryError> {
        self.node.set_state(entries)
    }

    /// Reset validator statistics, then produce one block so the reset takes effect.
    pub fn force_reset_validator_statistics(&self) -> Result<(), HarnessError> {
        self.node.force_reset_validator_statistics()?;
        self.blocks().produce_blocks(1)?;
        info!("validator statistics reset");
        Ok(())
    }

    /// Advance epoch by epoch until every key in `keys` is `eligible`.
    ///
    /// Returns the epoch at which that happened, or `TimedOut` after
    /// `max_epoch_attempts` checks. The last check does not advance the chain.
    pub fn wait_for_eligible(&self, keys: &[ValidatorKey]) -> Result<PollOutcome<u32>, HarnessError> {
        let blocks = self.blocks();
        let policy = PollPolicy::new(self.config.max_epoch_attempts, self.config.poll_interval);
        let last_attempt = policy.max_attempts.saturating_sub(1);
        poll_until("validator keys eligible", policy, |attempt| {
            let stats = self.node.validator_statistics()?;
            let all_eligible = keys.iter().all(|k| {
                stats
                    .get(&k.bls_public_key)
                    .is_some_and(|s| s.validator_status == ELIGIBLE)
            });
            let epoch = blocks.current_epoch()?;
            if all_eligible {
                return Ok(Some(epoch));
            }
            if attempt == last_attempt {
                return Ok(None);
            }
            blocks.advance_to_epoch(epoch + 1)?;
            blocks.produce_blocks(BLOCKS_AFTER_EPOCH_CHANGE)?;
            Ok(None)
        })
    }
}
