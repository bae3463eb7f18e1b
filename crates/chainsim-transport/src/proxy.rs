//! Blocking HTTP client for the chain simulator proxy.
//!
//! ## Usage
//!
//! ```ignore
//! let client = ProxyClient::new("http://localhost:8085");
//! let nonce = client.nonce(&address)?;
//! client.generate_blocks(5)?;
//! ```
//!
//! Responses are unwrapped from the proxy envelope by [`decode_envelope`];
//! a non-`successful` code becomes [`NodeQueryError::Api`]. Nothing is retried.

use std::collections::BTreeMap;
use std::time::Duration;

use chainsim_types::encoding::parse_decimal;
use chainsim_types::{Address, NodeQueryError, SubmissionError, TransactionWire};
use num_bigint::BigUint;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::network::{normalize_base_url, routes};
use crate::node::{ChainNode, ProcessStatus, TX_NOT_FOUND};
use crate::responses::{
    AccountData, AccountDetail, AddKeysRequest, BalanceData, Envelope, EsdtRolesData, EsdtToken,
    EsdtTokensData, NetworkStatus, NetworkStatusData, NonceData, ProcessStatusData,
    RegisteredNftsData, SendData, StateEntry, TransactionData, TransactionOnChain,
    ValidatorStatistic, ValidatorStatisticsData, VmQuery, VmQueryData, VmQueryResult,
};

#[derive(Clone)]
pub struct ProxyClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ProxyClient {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(
            base_url,
            Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn with_timeouts(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            agent: ureq::AgentBuilder::new()
                .timeout(timeout)
                .timeout_connect(connect_timeout)
                .build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the raw body text of a 2xx answer.
    fn call(&self, route: &str, body: Option<&Value>) -> Result<String, NodeQueryError> {
        let url = format!("{}{}", self.base_url, route);
        let result = match body {
            Some(json) => {
                debug!(route, "POST");
                self.agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_json(json)
            }
            None => {
                debug!(route, "GET");
                self.agent.get(&url).call()
            }
        };
        match result {
            Ok(response) => response.into_string().map_err(|e| NodeQueryError::Transport {
                route: route.to_string(),
                message: format!("failed to read body: {}", e),
            }),
            Err(ureq::Error::Status(status, response)) => Err(NodeQueryError::Status {
                route: route.to_string(),
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(NodeQueryError::Transport {
                route: route.to_string(),
                message: t.to_string(),
            }),
        }
    }

    fn get<T: DeserializeOwned>(&self, route: &str) -> Result<T, NodeQueryError> {
        let body = self.call(route, None)?;
        decode_envelope(route, &body)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        route: &str,
        body: &B,
    ) -> Result<T, NodeQueryError> {
        let json = serde_json::to_value(body).map_err(|e| NodeQueryError::shape(route, e))?;
        let text = self.call(route, Some(&json))?;
        decode_envelope(route, &text)
    }

    /// POST whose answer carries no data, only an acknowledgement code.
    fn post_ack<B: Serialize>(&self, route: &str, body: &B) -> Result<(), NodeQueryError> {
        let json = serde_json::to_value(body).map_err(|e| NodeQueryError::shape(route, e))?;
        let text = self.call(route, Some(&json))?;
        decode_ack(route, &text)
    }
}

/// Unwrap the `data` field of a proxy envelope into `T`.
pub fn decode_envelope<T: DeserializeOwned>(route: &str, body: &str) -> Result<T, NodeQueryError> {
    let envelope = parse_envelope(route, body)?;
    let data = envelope
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| NodeQueryError::shape(route, "missing 'data' field"))?;
    serde_json::from_value(data).map_err(|e| NodeQueryError::shape(route, e))
}

/// Check an envelope for a success code, ignoring its data.
pub fn decode_ack(route: &str, body: &str) -> Result<(), NodeQueryError> {
    parse_envelope(route, body).map(|_| ())
}

fn parse_envelope(route: &str, body: &str) -> Result<Envelope<Value>, NodeQueryError> {
    let envelope: Envelope<Value> =
        serde_json::from_str(body).map_err(|e| NodeQueryError::shape(route, e))?;
    if !envelope.is_success() {
        return Err(NodeQueryError::Api {
            route: route.to_string(),
            code: envelope.code,
            message: envelope.error,
        });
    }
    Ok(envelope)
}

/// Turn a failed `/transaction/send` into the node's own rejection.
fn submission_error(err: NodeQueryError) -> SubmissionError {
    match err {
        NodeQueryError::Status { status, body, .. } => {
            match serde_json::from_str::<Envelope<Value>>(&body) {
                Ok(env) if !env.error.is_empty() => {
                    let code = if env.code.is_empty() {
                        format!("http_{}", status)
                    } else {
                        env.code
                    };
                    SubmissionError::new(code, env.error)
                }
                _ => SubmissionError::new(format!("http_{}", status), body),
            }
        }
        NodeQueryError::Api { code, message, .. } => SubmissionError::new(code, message),
        NodeQueryError::Transport { message, .. } => SubmissionError::new("transport", message),
        NodeQueryError::Shape { message, .. } => SubmissionError::new("unexpected_response", message),
    }
}

impl ChainNode for ProxyClient {
    fn network_status(&self, shard: u32) -> Result<NetworkStatus, NodeQueryError> {
        let data: NetworkStatusData = self.get(&routes::network_status(shard))?;
        Ok(data.status)
    }

    fn nonce(&self, address: &Address) -> Result<u64, NodeQueryError> {
        let data: NonceData = self.get(&routes::nonce(address))?;
        Ok(data.nonce)
    }

    fn balance(&self, address: &Address) -> Result<BigUint, NodeQueryError> {
        let route = routes::balance(address);
        let data: BalanceData = self.get(&route)?;
        parse_decimal(&data.balance, "balance").map_err(|e| NodeQueryError::shape(route, e))
    }

    fn account(&self, address: &Address) -> Result<AccountDetail, NodeQueryError> {
        let data: AccountData = self.get(&routes::account(address))?;
        Ok(data.account)
    }

    fn esdt_roles(
        &self,
        address: &Address,
    ) -> Result<BTreeMap<String, Vec<String>>, NodeQueryError> {
        let data: EsdtRolesData = self.get(&routes::esdt_roles(address))?;
        Ok(data.roles)
    }

    fn esdt_tokens(&self, address: &Address) -> Result<BTreeMap<String, EsdtToken>, NodeQueryError> {
        let data: EsdtTokensData = self.get(&routes::esdt_tokens(address))?;
        Ok(data.esdts)
    }

    fn registered_nfts(&self, address: &Address) -> Result<Vec<String>, NodeQueryError> {
        let data: RegisteredNftsData = self.get(&routes::registered_nfts(address))?;
        Ok(data.tokens)
    }

    fn vm_query(&self, query: &VmQuery) -> Result<VmQueryResult, NodeQueryError> {
        debug!(sc = %query.sc_address, func = %query.func_name, "vm query");
        let data: VmQueryData = self.post(routes::VM_QUERY, query)?;
        Ok(data.data)
    }

    fn send_transaction(&self, tx: &TransactionWire) -> Result<String, SubmissionError> {
        let data: SendData = self
            .post(routes::SEND_TRANSACTION, tx)
            .map_err(submission_error)?;
        info!(hash = %data.tx_hash, sender = %tx.sender, nonce = tx.nonce, "transaction sent");
        Ok(data.tx_hash)
    }

    fn process_status(&self, hash: &str) -> Result<ProcessStatus, NodeQueryError> {
        let route = routes::process_status(hash);
        let body = match self.call(&route, None) {
            Ok(body) => body,
            Err(err) if err.body_text().is_some_and(|b| b.contains(TX_NOT_FOUND)) => {
                return Ok(ProcessStatus::NotFound)
            }
            Err(err) => return Err(err),
        };
        if body.contains(TX_NOT_FOUND) {
            return Ok(ProcessStatus::NotFound);
        }
        let data: ProcessStatusData = decode_envelope(&route, &body)?;
        Ok(ProcessStatus::Found(data.status))
    }

    fn transaction_with_results(&self, hash: &str) -> Result<TransactionOnChain, NodeQueryError> {
        let data: TransactionData = self.get(&routes::transaction_with_results(hash))?;
        Ok(data.transaction)
    }

    fn generate_blocks(&self, count: u64) -> Result<(), NodeQueryError> {
        self.post_ack(&routes::generate_blocks(count), &Value::Null)
    }

    fn add_keys(&self, private_keys_base64: &[String]) -> Result<(), NodeQueryError> {
        info!(count = private_keys_base64.len(), "adding validator keys to simulator");
        self.post_ack(
            routes::ADD_KEYS,
            &AddKeysRequest {
                private_keys_base64,
            },
        )
    }

    fn set_state(&self, entries: &[StateEntry]) -> Result<(), NodeQueryError> {
        self.post_ack(routes::SET_STATE, &entries)
    }

    fn force_reset_validator_statistics(&self) -> Result<(), NodeQueryError> {
        self.post_ack(routes::FORCE_RESET_VALIDATOR_STATISTICS, &Value::Null)
    }

    fn validator_statistics(&self) -> Result<BTreeMap<String, ValidatorStatistic>, NodeQueryError> {
        let data: ValidatorStatisticsData = self.get(routes::VALIDATOR_STATISTICS)?;
        Ok(data.statistics)
    }
}
