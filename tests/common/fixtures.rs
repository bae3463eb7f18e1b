//! In-memory scenarios.
//!
//! A [`Scenario`] pairs a [`FakeNode`] with a [`Harness`] configured for
//! instant polling, and hands out wallets funded on that node.

use std::rc::Rc;
use std::time::Duration;

use chainsim_harness::config::HarnessConfig;
use chainsim_harness::test_utils::FakeNode;
use chainsim_harness::{egld, Harness, Wallet};
use num_bigint::BigUint;

pub const ROUNDS_PER_EPOCH: u64 = 20;

#[allow(dead_code)]
pub fn one_egld() -> BigUint {
    egld(1)
}

pub struct Scenario {
    pub node: Rc<FakeNode>,
    pub harness: Harness,
}

#[allow(dead_code)]
impl Scenario {
    pub fn new() -> Self {
        Self::with_config(|c| c)
    }

    /// Start from the test config and adjust it.
    pub fn with_config(adjust: impl FnOnce(HarnessConfig) -> HarnessConfig) -> Self {
        let node = Rc::new(FakeNode::with_rounds_per_epoch(ROUNDS_PER_EPOCH));
        let config = adjust(
            HarnessConfig::default()
                .with_poll_interval(Duration::ZERO)
                .with_rounds_per_epoch(ROUNDS_PER_EPOCH),
        );
        let harness = Harness::with_node(node.clone(), config);
        Self { node, harness }
    }

    /// Wallet derived from `seed`, credited with `amount_egld` EGLD.
    pub fn wallet(&self, seed: u8, amount_egld: u64) -> Wallet {
        let wallet = Wallet::from_seed([seed; 32]);
        if amount_egld > 0 {
            self.node.fund(&wallet.address(), egld(amount_egld));
        }
        wallet
    }
}
