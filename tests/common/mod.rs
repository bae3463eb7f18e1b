#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: in-memory chain scenarios with funded wallets
//! - `assertions`: assertion helpers with better failure messages
//! - `network`: gating for tests that need a running simulator

pub mod assertions;
pub mod fixtures;
pub mod network;

pub use assertions::{assert_err, assert_error_contains, assert_ok, assert_outcome_fails_with, assert_success};
pub use fixtures::{one_egld, Scenario};
pub use network::should_run_simulator_tests;
