//! Proxy endpoint resolution and route construction.

use chainsim_types::env_utils::env_string_or;
use chainsim_types::Address;

/// Chain simulator proxy on its default port.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:8085";

/// Environment variable overriding the proxy URL.
pub const PROXY_URL_ENV: &str = "CHAINSIM_PROXY_URL";

/// Resolve the proxy URL: explicit value, then `CHAINSIM_PROXY_URL`, then the default.
pub fn resolve_proxy_url(explicit: Option<&str>) -> String {
    match explicit.filter(|u| !u.trim().is_empty()) {
        Some(url) => normalize_base_url(url),
        None => normalize_base_url(&env_string_or(PROXY_URL_ENV, DEFAULT_PROXY_URL)),
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Relative routes of the proxy API.
pub mod routes {
    use super::Address;

    pub fn nonce(address: &Address) -> String {
        format!("/address/{}/nonce", address)
    }

    pub fn balance(address: &Address) -> String {
        format!("/address/{}/balance", address)
    }

    pub fn account(address: &Address) -> String {
        format!("/address/{}", address)
    }

    pub fn esdt_roles(address: &Address) -> String {
        format!("/address/{}/esdts/roles", address)
    }

    pub fn esdt_tokens(address: &Address) -> String {
        format!("/address/{}/esdt", address)
    }

    pub fn registered_nfts(address: &Address) -> String {
        format!("/address/{}/registered-nfts", address)
    }

    pub const VM_QUERY: &str = "/vm-values/query";
    pub const SEND_TRANSACTION: &str = "/transaction/send";

    pub fn process_status(hash: &str) -> String {
        format!("/transaction/{}/process-status", hash)
    }

    pub fn transaction_with_results(hash: &str) -> String {
        format!("/transaction/{}?withResults=true", hash)
    }

    pub fn network_status(shard: u32) -> String {
        format!("/network/status/{}", shard)
    }

    pub fn generate_blocks(count: u64) -> String {
        format!("/simulator/generate-blocks/{}", count)
    }

    pub const ADD_KEYS: &str = "/simulator/add-keys";
    pub const SET_STATE: &str = "/simulator/set-state";
    pub const FORCE_RESET_VALIDATOR_STATISTICS: &str = "/simulator/force-reset-validator-statistics";
    pub const VALIDATOR_STATISTICS: &str = "/validator/statistics";
}
