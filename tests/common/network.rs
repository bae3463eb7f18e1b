//! Gating for tests that talk to a real chain simulator.
//!
//! Those tests run only when `RUN_SIMULATOR_TESTS` is `1`, `true`, `yes` or
//! `on`. The proxy URL comes from `CHAINSIM_PROXY_URL`, defaulting to
//! `http://localhost:8085`.

use chainsim_types::env_utils::env_bool;

/// Environment variable to enable simulator tests.
pub const RUN_SIMULATOR_TESTS_VAR: &str = "RUN_SIMULATOR_TESTS";

pub fn should_run_simulator_tests() -> bool {
    env_bool(RUN_SIMULATOR_TESTS_VAR)
}

/// Skip the current test unless simulator tests are enabled.
///
/// ```ignore
/// #[test]
/// fn test_against_simulator() {
///     skip_if_no_simulator!();
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! skip_if_no_simulator {
    () => {
        if !$crate::common::network::should_run_simulator_tests() {
            eprintln!(
                "Skipping {}: {} not set",
                module_path!(),
                $crate::common::network::RUN_SIMULATOR_TESTS_VAR
            );
            return;
        }
    };
}
