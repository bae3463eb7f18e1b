//! Chain Simulator Test Harness
//!
//! Drives transactions through a locally running chain simulator and observes
//! their outcome deterministically:
//!
//! - **Payload codec**: `function@arg@arg` strings for ESDT, NFT, staking and
//!   delegation calls ([`codec`])
//! - **Transactions**: construction with the right receiver, value and gas
//!   ([`builder`]), nonce tracking ([`nonce`]) and signing ([`signer`], [`wallet`])
//! - **Confirmation**: submission, then block-driven polling to a terminal
//!   status ([`confirm`])
//! - **Block control**: producing blocks and advancing epochs on demand ([`chain`])
//! - **Scenarios**: validator keys, simulator commands, chain queries and the
//!   NFT lifecycle ([`harness`], [`validator_key`], [`queries`], [`nft`])
//!
//! The node itself sits behind the [`ChainNode`](chainsim_transport::ChainNode)
//! trait. `test_utils::FakeNode`, behind the `test-utils` feature, is an
//! in-memory implementation for tests.

#![allow(clippy::result_large_err)]
#![allow(clippy::too_many_arguments)]

pub mod builder;
pub mod chain;
pub mod codec;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod harness;
pub mod nft;
pub mod nonce;
pub mod poll;
pub mod queries;
pub mod signer;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod validator_key;
pub mod wallet;

pub use builder::{egld, StakeFaults, TransactionBuilder};
pub use chain::BlockController;
pub use config::HarnessConfig;
pub use confirm::{ConfirmationPolicy, Submitter, TxOutcome};
pub use harness::Harness;
pub use nft::NftManager;
pub use nonce::NonceCache;
pub use poll::{poll_until, PollOutcome, PollPolicy};
pub use signer::{sign_transaction, Ed25519Signer, MessageSigner};
pub use validator_key::ValidatorKey;
pub use wallet::Wallet;

pub use chainsim_types::{Address, HarnessError, Transaction, TxStatus};
