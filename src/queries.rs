//! Read-only chain queries used by scenarios to assert on results.
//!
//! Contract views go through `/vm-values/query`; their return data is
//! base64 and is decoded here. Addresses and token identifiers created by a
//! transaction are recovered from its event topics.

use chainsim_transport::{ChainNode, EsdtToken, LogEvent, VmQuery};
use chainsim_types::encoding::{base64_decode, base64_encode, base64_to_decimal, base64_to_string, parse_decimal};
use chainsim_types::{Address, DecodeError, HarnessError, NodeQueryError, METACHAIN_SHARD_ID};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info, warn};

use crate::constants::VALIDATOR_CONTRACT;

const VM_QUERY_ROUTE: &str = "/vm-values/query";

fn return_data_at(
    node: &dyn ChainNode,
    query: &VmQuery,
    index: usize,
) -> Result<String, HarnessError> {
    let result = node.vm_query(query)?;
    result.return_data.get(index).cloned().ok_or_else(|| {
        NodeQueryError::shape(
            VM_QUERY_ROUTE,
            format!(
                "{} returned {} values, wanted index {}",
                query.func_name,
                result.return_data.len(),
                index
            ),
        )
        .into()
    })
}

// =============================================================================
// Staking / delegation views
// =============================================================================

/// Total stake of `owner` as the validator contract reports it (decimal text).
pub fn total_staked(node: &dyn ChainNode, owner: &Address) -> Result<String, HarnessError> {
    let query = VmQuery::new(VALIDATOR_CONTRACT, "getTotalStaked").arg(owner.to_hex());
    let value = base64_to_string(&return_data_at(node, &query, 0)?, "getTotalStaked")?;
    info!(owner = %owner, total = %value, "total staked");
    Ok(value)
}

pub fn user_active_stake(
    node: &dyn ChainNode,
    delegation_contract: &Address,
    user: &Address,
) -> Result<BigUint, HarnessError> {
    let query = VmQuery::new(delegation_contract.to_bech32(), "getUserActiveStake").arg(user.to_hex());
    Ok(base64_to_decimal(&return_data_at(node, &query, 0)?, "getUserActiveStake")?)
}

/// First undelegated amount of `user`.
pub fn user_undelegated_list(
    node: &dyn ChainNode,
    delegation_contract: &Address,
    user: &Address,
) -> Result<BigUint, HarnessError> {
    let query =
        VmQuery::new(delegation_contract.to_bech32(), "getUserUnDelegatedList").arg(user.to_hex());
    Ok(base64_to_decimal(&return_data_at(node, &query, 0)?, "getUserUnDelegatedList")?)
}

/// Unstaked amount from `getDelegatorFundsData` (third return value).
pub fn delegator_unstaked_funds(
    node: &dyn ChainNode,
    delegation_contract: &Address,
    user: &Address,
) -> Result<BigUint, HarnessError> {
    let query =
        VmQuery::new(delegation_contract.to_bech32(), "getDelegatorFundsData").arg(user.to_hex());
    Ok(base64_to_decimal(&return_data_at(node, &query, 2)?, "getDelegatorFundsData")?)
}

// =============================================================================
// Transaction inspection
// =============================================================================

/// Delegation contract created by `hash`: second topic of the first event.
pub fn delegation_contract_from_tx(node: &dyn ChainNode, hash: &str) -> Result<Address, HarnessError> {
    let tx = node.transaction_with_results(hash)?;
    let topic = tx
        .events()
        .first()
        .and_then(|event| event.topics.get(1))
        .ok_or_else(|| DecodeError::new("delegation contract topic", format!("missing in {}", hash)))?;
    let address = Address::from_slice(&base64_decode(topic, "delegation contract topic")?)?;
    info!(hash = %hash, contract = %address, "delegation contract created");
    Ok(address)
}

/// Delegation contract created through an inner transaction: the first topic
/// of any contract-result event that decodes to an address.
pub fn delegation_contract_from_sc_results(
    node: &dyn ChainNode,
    hash: &str,
) -> Result<Option<Address>, HarnessError> {
    let tx = node.transaction_with_results(hash)?;
    let found = tx
        .smart_contract_results
        .iter()
        .flat_map(|scr| scr.events().iter())
        .flat_map(|event| event.topics.iter())
        .find_map(|topic| {
            base64_decode(topic, "event topic")
                .ok()
                .and_then(|bytes| Address::from_slice(&bytes).ok())
        });
    match &found {
        Some(address) => info!(hash = %hash, contract = %address, "delegation contract found in results"),
        None => warn!(hash = %hash, "no delegation contract address in results"),
    }
    Ok(found)
}

/// Token identifier emitted by an `issue`/`issueNonFungible` event, searched
/// in the transaction logs first and then in contract results.
pub fn token_identifier_from_tx(
    node: &dyn ChainNode,
    hash: &str,
) -> Result<Option<String>, HarnessError> {
    let tx = node.transaction_with_results(hash)?;
    if let Some(token) = issued_token(tx.events())? {
        return Ok(Some(token));
    }
    for scr in &tx.smart_contract_results {
        if let Some(token) = issued_token(scr.events())? {
            return Ok(Some(token));
        }
    }
    warn!(hash = %hash, "no token identifier in transaction");
    Ok(None)
}

fn issued_token(events: &[LogEvent]) -> Result<Option<String>, DecodeError> {
    for event in events {
        if matches!(event.identifier.as_str(), "issue" | "issueNonFungible") {
            if let Some(topic) = event.topics.first() {
                return base64_to_string(topic, "token identifier").map(Some);
            }
        }
    }
    Ok(None)
}

/// Fee charged for `hash`. An absent fee reads as zero.
pub fn transaction_fee(node: &dyn ChainNode, hash: &str) -> Result<BigUint, HarnessError> {
    let tx = node.transaction_with_results(hash)?;
    if tx.fee.is_empty() {
        return Ok(BigUint::zero());
    }
    Ok(parse_decimal(&tx.fee, "transaction fee")?)
}

/// True when `error` appears in the transaction, as text or base64.
pub fn is_error_present(node: &dyn ChainNode, hash: &str, error: &str) -> Result<bool, HarnessError> {
    let tx = node.transaction_with_results(hash)?;
    let text = serde_json::to_string(&tx)
        .map_err(|e| NodeQueryError::shape(format!("/transaction/{}", hash), e))?;
    let present = text.contains(error) || text.contains(&base64_encode(error.as_bytes()));
    debug!(hash = %hash, error = %error, present, "error lookup");
    Ok(present)
}

// =============================================================================
// Account views
// =============================================================================

/// Every role the address holds, across all tokens.
pub fn esdt_roles(node: &dyn ChainNode, address: &Address) -> Result<Vec<String>, NodeQueryError> {
    Ok(node.esdt_roles(address)?.into_values().flatten().collect())
}

/// First token entry whose key contains `token_identifier`.
pub fn single_esdt_details(
    node: &dyn ChainNode,
    address: &Address,
    token_identifier: &str,
) -> Result<Option<EsdtToken>, NodeQueryError> {
    Ok(node
        .esdt_tokens(address)?
        .into_iter()
        .find(|(key, _)| key.contains(token_identifier))
        .map(|(_, token)| token))
}

/// Every token entry whose key starts with `prefix` (all instances of a collection).
pub fn multiple_esdt_details(
    node: &dyn ChainNode,
    address: &Address,
    prefix: &str,
) -> Result<Vec<EsdtToken>, NodeQueryError> {
    Ok(node
        .esdt_tokens(address)?
        .into_iter()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(_, token)| token)
        .collect())
}

pub fn has_registered_nfts(node: &dyn ChainNode, address: &Address) -> Result<bool, NodeQueryError> {
    Ok(!node.registered_nfts(address)?.is_empty())
}

/// True when the node answers a metachain status query.
pub fn is_chain_online(node: &dyn ChainNode) -> bool {
    match node.network_status(METACHAIN_SHARD_ID) {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "chain not reachable");
            false
        }
    }
}
