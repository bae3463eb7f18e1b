//! Typed response structures for the proxy endpoints.
//!
//! Every proxy answer uses the same envelope: `{"data": ..., "error": "", "code": "successful"}`.
//! The structs below model the `data` payload of each endpoint. Missing
//! optional fields default; missing required fields are a shape error.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Code the proxy reports on success.
pub const SUCCESS_CODE: &str = "successful";

/// Treat an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.error.is_empty() && (self.code.is_empty() || self.code == SUCCESS_CODE)
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NonceData {
    pub nonce: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceData {
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    pub account: AccountDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountDetail {
    pub address: String,
    pub nonce: u64,
    pub balance: String,
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code_metadata: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub developer_reward: String,
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct EsdtRolesData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsdtTokensData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub esdts: BTreeMap<String, EsdtToken>,
}

/// One fungible balance or NFT instance held by an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EsdtToken {
    pub token_identifier: String,
    pub balance: String,
    pub nonce: u64,
    /// NFT display name (plain text).
    pub name: String,
    pub creator: String,
    /// Royalties in basis points as a decimal string.
    pub royalties: String,
    /// Base64 of the metadata hash.
    pub hash: String,
    /// Base64 of the raw attributes bytes.
    pub attributes: String,
    /// Base64-encoded URIs.
    #[serde(deserialize_with = "null_as_default")]
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredNftsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: Vec<String>,
}

// =============================================================================
// VM queries
// =============================================================================

/// Body of `POST /vm-values/query`. Arguments are hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmQuery {
    pub sc_address: String,
    pub func_name: String,
    pub args: Vec<String>,
}

impl VmQuery {
    pub fn new(sc_address: impl Into<String>, func_name: impl Into<String>) -> Self {
        Self {
            sc_address: sc_address.into(),
            func_name: func_name.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, hex_arg: impl Into<String>) -> Self {
        self.args.push(hex_arg.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VmQueryData {
    pub data: VmQueryResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmQueryResult {
    /// Base64-encoded return values.
    #[serde(deserialize_with = "null_as_default")]
    pub return_data: Vec<String>,
    pub return_code: String,
    pub return_message: String,
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendData {
    pub tx_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessStatusData {
    pub status: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionData {
    pub transaction: TransactionOnChain,
}

/// Transaction detail as returned with `?withResults=true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionOnChain {
    pub hash: String,
    pub status: String,
    pub sender: String,
    pub receiver: String,
    pub nonce: u64,
    pub value: String,
    /// Base64 of the payload.
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fee: String,
    pub logs: Option<TransactionLogs>,
    #[serde(deserialize_with = "null_as_default")]
    pub smart_contract_results: Vec<SmartContractResult>,
}

impl TransactionOnChain {
    pub fn events(&self) -> &[LogEvent] {
        self.logs.as_ref().map(|l| l.events.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionLogs {
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<LogEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEvent {
    pub address: String,
    pub identifier: String,
    /// Base64-encoded topics.
    #[serde(deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartContractResult {
    pub hash: String,
    pub sender: String,
    pub receiver: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub return_message: String,
    pub logs: Option<TransactionLogs>,
}

impl SmartContractResult {
    pub fn events(&self) -> &[LogEvent] {
        self.logs.as_ref().map(|l| l.events.as_slice()).unwrap_or(&[])
    }
}

// =============================================================================
// Network / simulator
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkStatusData {
    pub status: NetworkStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStatus {
    pub erd_epoch_number: u32,
    pub erd_current_round: u64,
    pub erd_nonce: u64,
    pub erd_rounds_per_epoch: u64,
    pub erd_rounds_passed_in_current_epoch: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorStatisticsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub statistics: BTreeMap<String, ValidatorStatistic>,
}

/// Consensus-side view of one BLS key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorStatistic {
    /// `eligible`, `waiting`, `leaving`, `inactive`, ...
    pub validator_status: String,
    pub shard_id: u32,
    pub rating: f64,
    pub temp_rating: f64,
}

/// One entry of `POST /simulator/set-state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub address: String,
    pub balance: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddKeysRequest<'a> {
    pub private_keys_base64: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_with_results_parses() {
        let body = r#"{
            "transaction": {
                "hash": "abc",
                "status": "success",
                "fee": "50000000000000",
                "logs": {"address": "erd1x", "events": [
                    {"identifier": "issueNonFungible", "topics": ["TkZULTEyMzQ1Ng=="], "data": null}
                ]},
                "smartContractResults": null
            }
        }"#;
        let data: TransactionData = serde_json::from_str(body).unwrap();
        let tx = data.transaction;
        assert_eq!(tx.fee, "50000000000000");
        assert_eq!(tx.events().len(), 1);
        assert_eq!(tx.events()[0].topics, vec!["TkZULTEyMzQ1Ng=="]);
        assert!(tx.smart_contract_results.is_empty());
    }

    #[test]
    fn test_vm_query_null_return_data() {
        let data: VmQueryData =
            serde_json::from_str(r#"{"data":{"returnData":null,"returnCode":"ok"}}"#).unwrap();
        assert!(data.data.return_data.is_empty());
        assert_eq!(data.data.return_code, "ok");
    }

    #[test]
    fn test_vm_query_body_shape() {
        let q = VmQuery::new("erd1sc", "getTotalActiveStake").arg("0a");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["scAddress"], "erd1sc");
        assert_eq!(json["funcName"], "getTotalActiveStake");
        assert_eq!(json["args"][0], "0a");
    }

    #[test]
    fn test_network_status_parses() {
        let data: NetworkStatusData = serde_json::from_str(
            r#"{"status":{"erd_epoch_number":3,"erd_current_round":160,"erd_rounds_per_epoch":50,"erd_rounds_passed_in_current_epoch":10,"erd_nonce":158}}"#,
        )
        .unwrap();
        assert_eq!(data.status.erd_epoch_number, 3);
        assert_eq!(data.status.erd_rounds_passed_in_current_epoch, 10);
    }

    #[test]
    fn test_envelope_success() {
        let ok: Envelope<NonceData> =
            serde_json::from_str(r#"{"data":{"nonce":5},"error":"","code":"successful"}"#).unwrap();
        assert!(ok.is_success());
        let bad: Envelope<NonceData> =
            serde_json::from_str(r#"{"data":null,"error":"boom","code":"internal_issue"}"#).unwrap();
        assert!(!bad.is_success());
    }
}
