//! Harness configuration.
//!
//! Defaults target a local chain simulator; every field can be overridden
//! from the environment (see [`HarnessConfig::from_env`]).

use std::path::PathBuf;
use std::time::Duration;

use chainsim_types::env_utils::{env_millis_or, env_path_or, env_secs_or, env_string_or, env_var_or};

use crate::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_GAS_PRICE, DEFAULT_MAX_EPOCH_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_PROXY_URL, DEFAULT_ROUNDS_PER_EPOCH, ESDT_ACTIVATION_EPOCH,
    MAX_NUM_OF_BLOCKS_UNTIL_TX_SHOULD_BE_EXECUTED,
};

pub const ENV_PROXY_URL: &str = "CHAINSIM_PROXY_URL";
pub const ENV_CHAIN_ID: &str = "CHAINSIM_CHAIN_ID";
pub const ENV_GAS_PRICE: &str = "CHAINSIM_GAS_PRICE";
pub const ENV_ROUNDS_PER_EPOCH: &str = "CHAINSIM_ROUNDS_PER_EPOCH";
pub const ENV_MAX_BLOCKS: &str = "CHAINSIM_MAX_BLOCKS";
pub const ENV_POLL_INTERVAL_MS: &str = "CHAINSIM_POLL_INTERVAL_MS";
pub const ENV_MAX_EPOCH_ATTEMPTS: &str = "CHAINSIM_MAX_EPOCH_ATTEMPTS";
pub const ENV_ESDT_MIN_EPOCH: &str = "CHAINSIM_ESDT_MIN_EPOCH";
pub const ENV_WALLETS_DIR: &str = "CHAINSIM_WALLETS_DIR";
pub const ENV_VALIDATOR_KEYS_DIR: &str = "CHAINSIM_VALIDATOR_KEYS_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "CHAINSIM_HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "CHAINSIM_HTTP_CONNECT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub proxy_url: String,
    pub chain_id: String,
    pub gas_price: u64,
    pub rounds_per_epoch: u64,
    /// Blocks produced while waiting for a transaction before it is `expired`.
    pub max_blocks: u64,
    /// Pause between status checks.
    pub poll_interval: Duration,
    pub max_epoch_attempts: usize,
    /// Epoch to reach before any ESDT operation is sent.
    pub esdt_min_epoch: u32,
    pub wallets_dir: PathBuf,
    pub validator_keys_dir: PathBuf,
    pub http_timeout: Duration,
    pub http_connect_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            gas_price: DEFAULT_GAS_PRICE,
            rounds_per_epoch: DEFAULT_ROUNDS_PER_EPOCH,
            max_blocks: MAX_NUM_OF_BLOCKS_UNTIL_TX_SHOULD_BE_EXECUTED,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_epoch_attempts: DEFAULT_MAX_EPOCH_ATTEMPTS,
            esdt_min_epoch: ESDT_ACTIVATION_EPOCH,
            wallets_dir: PathBuf::from("./data/wallets"),
            validator_keys_dir: PathBuf::from("./data/validator_keys"),
            http_timeout: Duration::from_secs(30),
            http_connect_timeout: Duration::from_secs(10),
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by any `CHAINSIM_*` variables that are set and parse.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            proxy_url: env_string_or(ENV_PROXY_URL, &d.proxy_url),
            chain_id: env_string_or(ENV_CHAIN_ID, &d.chain_id),
            gas_price: env_var_or(ENV_GAS_PRICE, d.gas_price),
            rounds_per_epoch: env_var_or(ENV_ROUNDS_PER_EPOCH, d.rounds_per_epoch),
            max_blocks: env_var_or(ENV_MAX_BLOCKS, d.max_blocks),
            poll_interval: env_millis_or(ENV_POLL_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS),
            max_epoch_attempts: env_var_or(ENV_MAX_EPOCH_ATTEMPTS, d.max_epoch_attempts),
            esdt_min_epoch: env_var_or(ENV_ESDT_MIN_EPOCH, d.esdt_min_epoch),
            wallets_dir: env_path_or(ENV_WALLETS_DIR, "./data/wallets"),
            validator_keys_dir: env_path_or(ENV_VALIDATOR_KEYS_DIR, "./data/validator_keys"),
            http_timeout: env_secs_or(ENV_HTTP_TIMEOUT_SECS, 30),
            http_connect_timeout: env_secs_or(ENV_HTTP_CONNECT_TIMEOUT_SECS, 10),
        }
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = url.into();
        self
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    pub fn with_max_blocks(mut self, max_blocks: u64) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_rounds_per_epoch(mut self, rounds: u64) -> Self {
        self.rounds_per_epoch = rounds;
        self
    }

    pub fn with_esdt_min_epoch(mut self, epoch: u32) -> Self {
        self.esdt_min_epoch = epoch;
        self
    }
}
