//! Transaction Builder
//!
//! One constructor per operation family. Each returns an unsigned
//! [`Transaction`] with receiver, value, gas limit and payload filled in from
//! the codec; callers sign it through the Signer Adapter. Gas and value can
//! still be overridden on the returned record (`with_gas_limit`, ...).
//!
//! Inner transactions of a relayed bundle are ordinary transactions marked
//! with [`TransactionBuilder::inner`]; [`TransactionBuilder::relayed`] wraps
//! already-signed inner transactions.

use chainsim_types::{Address, HarnessError, Transaction};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::codec::esdt::{self, FungibleIssue, NftCreate, NftMetadata, TokenProperties, TokenTransfer};
use crate::codec::staking::{self, StakeEntry};
use crate::config::HarnessConfig;
use crate::constants::{
    DELEGATE_GAS_LIMIT, DELEGATION_MANAGER_ADDRESS, DELEGATION_MANAGER_GAS_LIMIT, EGLD_DECIMALS,
    ESDT_ADDRESS, ESDT_GAS_LIMIT, MULTI_TRANSFER_GAS_LIMIT, NEW_DELEGATION_CONTRACT_EGLD,
    RELAYED_GAS_LIMIT, STAKE_PER_NODE_EGLD, STAKING_GAS_LIMIT, TRANSFER_GAS_LIMIT,
    VALIDATOR_ADDRESS,
};

/// `amount` whole EGLD in base units.
pub fn egld(amount: u64) -> BigUint {
    BigUint::from(amount) * BigUint::from(10u32).pow(EGLD_DECIMALS)
}

/// Opt-in faults for negative staking tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeFaults {
    /// Subtracted from the required stake value (floored at zero).
    pub amount_deficit: BigUint,
    /// Replace every occurrence of one random character in the argument string.
    pub corrupt_payload: bool,
    /// Seed for the corruption; entropy when `None`.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBuilder {
    pub chain_id: String,
    pub gas_price: u64,
}

impl TransactionBuilder {
    pub fn new(chain_id: impl Into<String>, gas_price: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            gas_price,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.chain_id.clone(), config.gas_price)
    }

    fn base(&self, sender: &Address, receiver: &Address, nonce: u64) -> Transaction {
        Transaction::new(*sender, *receiver, nonce, self.chain_id.clone())
            .with_gas_price(self.gas_price)
    }

    fn call(
        &self,
        sender: &Address,
        receiver: &Address,
        nonce: u64,
        data: String,
        gas_limit: u64,
    ) -> Transaction {
        debug!(sender = %sender, receiver = %receiver, nonce, data = %data, "built transaction");
        self.base(sender, receiver, nonce)
            .with_gas_limit(gas_limit)
            .with_data(data)
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    pub fn transfer(
        &self,
        sender: &Address,
        receiver: &Address,
        nonce: u64,
        value: BigUint,
    ) -> Transaction {
        self.base(sender, receiver, nonce)
            .with_gas_limit(TRANSFER_GAS_LIMIT)
            .with_value(value)
    }

    // =========================================================================
    // ESDT / NFT
    // =========================================================================

    pub fn issue_fungible(
        &self,
        sender: &Address,
        nonce: u64,
        issue: &FungibleIssue,
        value: BigUint,
    ) -> Transaction {
        self.call(sender, &ESDT_ADDRESS, nonce, esdt::issue_fungible(issue), ESDT_GAS_LIMIT)
            .with_value(value)
    }

    pub fn issue_non_fungible(
        &self,
        sender: &Address,
        nonce: u64,
        name: &str,
        ticker: &str,
        properties: &TokenProperties,
        value: BigUint,
    ) -> Transaction {
        let data = esdt::issue_non_fungible(name, ticker, properties);
        self.call(sender, &ESDT_ADDRESS, nonce, data, ESDT_GAS_LIMIT)
            .with_value(value)
    }

    pub fn set_special_role<S: AsRef<str>>(
        &self,
        sender: &Address,
        nonce: u64,
        token_identifier: &str,
        assignee: &Address,
        roles: &[S],
    ) -> Transaction {
        let data = esdt::set_special_role(token_identifier, assignee, roles);
        self.call(sender, &ESDT_ADDRESS, nonce, data, ESDT_GAS_LIMIT)
    }

    /// Token-instance operations are sent by the holder to itself.
    pub fn nft_create(&self, sender: &Address, nonce: u64, nft: &NftCreate) -> Transaction {
        self.call(sender, sender, nonce, esdt::nft_create(nft), ESDT_GAS_LIMIT)
    }

    pub fn nft_transfer(
        &self,
        sender: &Address,
        nonce: u64,
        transfer: &TokenTransfer,
        destination: &Address,
    ) -> Transaction {
        let data = esdt::nft_transfer(
            &transfer.token_identifier,
            transfer.nonce,
            &transfer.quantity,
            destination,
        );
        self.call(sender, sender, nonce, data, ESDT_GAS_LIMIT)
    }

    pub fn multi_token_transfer(
        &self,
        sender: &Address,
        nonce: u64,
        receiver: &Address,
        transfers: &[TokenTransfer],
    ) -> Transaction {
        let data = esdt::multi_token_transfer(receiver, transfers);
        self.call(sender, sender, nonce, data, MULTI_TRANSFER_GAS_LIMIT)
    }

    pub fn modify_royalties(
        &self,
        sender: &Address,
        nonce: u64,
        token_identifier: &str,
        token_nonce: u64,
        royalties: u64,
    ) -> Transaction {
        let data = esdt::modify_royalties(token_identifier, token_nonce, royalties);
        self.call(sender, sender, nonce, data, ESDT_GAS_LIMIT)
    }

    pub fn set_new_uris<S: AsRef<str>>(
        &self,
        sender: &Address,
        nonce: u64,
        token_identifier: &str,
        token_nonce: u64,
        uris: &[S],
    ) -> Transaction {
        let data = esdt::set_new_uris(token_identifier, token_nonce, uris);
        self.call(sender, sender, nonce, data, ESDT_GAS_LIMIT)
    }

    pub fn modify_creator(
        &self,
        sender: &Address,
        nonce: u64,
        token_identifier: &str,
        token_nonce: u64,
    ) -> Transaction {
        let data = esdt::modify_creator(token_identifier, token_nonce);
        self.call(sender, sender, nonce, data, ESDT_GAS_LIMIT)
    }

    pub fn recreate_metadata(
        &self,
        sender: &Address,
        nonce: u64,
        token_identifier: &str,
        token_nonce: u64,
        metadata: &NftMetadata,
    ) -> Transaction {
        let data = esdt::recreate_metadata(token_identifier, token_nonce, metadata);
        self.call(sender, sender, nonce, data, ESDT_GAS_LIMIT)
    }

    // =========================================================================
    // Staking
    // =========================================================================

    /// Stake `entries`, locking 2500 EGLD per node.
    pub fn stake(
        &self,
        owner: &Address,
        nonce: u64,
        entries: &[StakeEntry],
        faults: Option<&StakeFaults>,
    ) -> Transaction {
        let mut value = egld(STAKE_PER_NODE_EGLD) * BigUint::from(entries.len());
        let mut args = staking::stake_args(entries);
        if let Some(faults) = faults {
            value = if faults.amount_deficit >= value {
                BigUint::zero()
            } else {
                value - &faults.amount_deficit
            };
            if faults.corrupt_payload {
                args = corrupt(&args, faults.seed);
                warn!(owner = %owner, "stake payload deliberately corrupted");
            }
        }
        self.call(
            owner,
            &VALIDATOR_ADDRESS,
            nonce,
            format!("stake@{}", args),
            STAKING_GAS_LIMIT,
        )
        .with_value(value)
    }

    pub fn un_stake(&self, owner: &Address, nonce: u64, bls_key_hex: &str) -> Transaction {
        let data = staking::un_stake(bls_key_hex);
        self.call(owner, &VALIDATOR_ADDRESS, nonce, data, STAKING_GAS_LIMIT)
    }

    pub fn un_bond_nodes(&self, owner: &Address, nonce: u64, bls_key_hex: &str) -> Transaction {
        let data = staking::un_bond_nodes(bls_key_hex);
        self.call(owner, &VALIDATOR_ADDRESS, nonce, data, STAKING_GAS_LIMIT)
    }

    // =========================================================================
    // Delegation
    // =========================================================================

    /// New delegation contract with the initial 1250 EGLD stake.
    pub fn create_new_delegation_contract(
        &self,
        sender: &Address,
        nonce: u64,
        cap: &BigUint,
        service_fee: u64,
    ) -> Transaction {
        let data = staking::create_new_delegation_contract(cap, service_fee);
        self.call(
            sender,
            &DELEGATION_MANAGER_ADDRESS,
            nonce,
            data,
            DELEGATION_MANAGER_GAS_LIMIT,
        )
        .with_value(egld(NEW_DELEGATION_CONTRACT_EGLD))
    }

    pub fn make_new_contract_from_validator_data(
        &self,
        sender: &Address,
        nonce: u64,
        cap: &BigUint,
        service_fee: u64,
    ) -> Transaction {
        let data = staking::make_new_contract_from_validator_data(cap, service_fee);
        self.call(
            sender,
            &DELEGATION_MANAGER_ADDRESS,
            nonce,
            data,
            DELEGATION_MANAGER_GAS_LIMIT,
        )
    }

    pub fn whitelist_for_merge(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
        new_owner: &Address,
    ) -> Transaction {
        let data = staking::whitelist_for_merge(new_owner);
        self.call(
            sender,
            delegation_contract,
            nonce,
            data,
            DELEGATION_MANAGER_GAS_LIMIT,
        )
    }

    pub fn merge_validator_to_delegation_with_whitelist(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
    ) -> Transaction {
        let data = staking::merge_validator_to_delegation_with_whitelist(delegation_contract);
        self.call(
            sender,
            &DELEGATION_MANAGER_ADDRESS,
            nonce,
            data,
            DELEGATION_MANAGER_GAS_LIMIT,
        )
    }

    pub fn merge_validator_to_delegation_same_owner(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
    ) -> Transaction {
        let data = staking::merge_validator_to_delegation_same_owner(delegation_contract);
        self.call(
            sender,
            &DELEGATION_MANAGER_ADDRESS,
            nonce,
            data,
            DELEGATION_MANAGER_GAS_LIMIT,
        )
    }

    pub fn add_nodes(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
        entries: &[StakeEntry],
    ) -> Transaction {
        let data = staking::add_nodes(entries);
        self.call(sender, delegation_contract, nonce, data, STAKING_GAS_LIMIT)
    }

    pub fn stake_nodes<S: AsRef<str>>(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
        bls_keys_hex: &[S],
    ) -> Transaction {
        let data = staking::stake_nodes(bls_keys_hex);
        self.call(sender, delegation_contract, nonce, data, STAKING_GAS_LIMIT)
    }

    pub fn delegate(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
        value: BigUint,
    ) -> Transaction {
        self.call(sender, delegation_contract, nonce, staking::delegate(), DELEGATE_GAS_LIMIT)
            .with_value(value)
    }

    pub fn un_delegate(
        &self,
        sender: &Address,
        nonce: u64,
        delegation_contract: &Address,
        amount: &BigUint,
    ) -> Transaction {
        let data = staking::un_delegate(amount);
        self.call(sender, delegation_contract, nonce, data, DELEGATE_GAS_LIMIT)
    }

    // =========================================================================
    // Relayed
    // =========================================================================

    /// Mark `tx` as an inner transaction paid for by `relayer`. Sign it afterwards.
    pub fn inner(&self, tx: Transaction, relayer: &Address) -> Transaction {
        tx.with_relayer(*relayer)
    }

    /// Wrap signed inner transactions: sender = receiver = relayer, zero value.
    ///
    /// Nonce order inside the bundle is left to the caller; the chain decides
    /// which inner transactions it accepts.
    pub fn relayed(
        &self,
        relayer: &Address,
        nonce: u64,
        inner_transactions: Vec<Transaction>,
        gas_limit: Option<u64>,
    ) -> Result<Transaction, HarnessError> {
        if inner_transactions.is_empty() {
            return Err(HarnessError::Build(
                "relayed transaction needs at least one inner transaction".to_string(),
            ));
        }
        if let Some(pos) = inner_transactions.iter().position(|t| !t.is_signed()) {
            return Err(HarnessError::Build(format!(
                "inner transaction {} is not signed",
                pos
            )));
        }
        for (i, tx) in inner_transactions.iter().enumerate() {
            if tx.relayer.as_ref() != Some(relayer) {
                warn!(index = i, relayer = %relayer, "inner transaction relayer does not match outer sender");
            }
        }
        let mut outer = self
            .base(relayer, relayer, nonce)
            .with_gas_limit(gas_limit.unwrap_or(RELAYED_GAS_LIMIT));
        debug!(relayer = %relayer, nonce, inner = inner_transactions.len(), "built relayed transaction");
        outer.inner_transactions = inner_transactions;
        Ok(outer)
    }
}

const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pick one character of `args` and replace all its occurrences with a different letter.
fn corrupt(args: &str, seed: Option<u64>) -> String {
    let chars: Vec<char> = args.chars().collect();
    if chars.is_empty() {
        return args.to_string();
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let target = chars[rng.gen_range(0..chars.len())];
    let replacement = loop {
        let c = char::from(ASCII_LETTERS[rng.gen_range(0..ASCII_LETTERS.len())]);
        if c != target {
            break c;
        }
    };
    args.replace(target, &replacement.to_string())
}
