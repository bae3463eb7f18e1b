//! Staking and delegation payloads.
//!
//! BLS keys and their proofs of possession are already hex and go in verbatim.

use chainsim_types::Address;
use num_bigint::BigUint;

use super::PayloadBuilder;

/// A BLS public key with the owner-address signature proving possession of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeEntry {
    pub bls_key_hex: String,
    pub proof_hex: String,
}

/// Arguments of `stake`, without the function name: `count@key@proof...`.
pub fn stake_args(entries: &[StakeEntry]) -> String {
    entries
        .iter()
        .fold(
            PayloadBuilder::new("stake").u64_arg(entries.len() as u64),
            |b, e| b.hex_arg(&e.bls_key_hex).hex_arg(&e.proof_hex),
        )
        .args_string()
}

pub fn stake(entries: &[StakeEntry]) -> String {
    format!("stake@{}", stake_args(entries))
}

pub fn un_stake(bls_key_hex: &str) -> String {
    PayloadBuilder::new("unStake").hex_arg(bls_key_hex).build()
}

pub fn un_bond_nodes(bls_key_hex: &str) -> String {
    PayloadBuilder::new("unBondNodes").hex_arg(bls_key_hex).build()
}

/// `createNewDelegationContract@cap@fee`. A zero cap means uncapped.
pub fn create_new_delegation_contract(cap: &BigUint, service_fee: u64) -> String {
    PayloadBuilder::new("createNewDelegationContract")
        .uint_arg(cap)
        .u64_arg(service_fee)
        .build()
}

pub fn make_new_contract_from_validator_data(cap: &BigUint, service_fee: u64) -> String {
    PayloadBuilder::new("makeNewContractFromValidatorData")
        .uint_arg(cap)
        .u64_arg(service_fee)
        .build()
}

pub fn whitelist_for_merge(new_owner: &Address) -> String {
    PayloadBuilder::new("whitelistForMerge")
        .address_arg(new_owner)
        .build()
}

pub fn merge_validator_to_delegation_with_whitelist(delegation_contract: &Address) -> String {
    PayloadBuilder::new("mergeValidatorToDelegationWithWhitelist")
        .address_arg(delegation_contract)
        .build()
}

pub fn merge_validator_to_delegation_same_owner(delegation_contract: &Address) -> String {
    PayloadBuilder::new("mergeValidatorToDelegationSameOwner")
        .address_arg(delegation_contract)
        .build()
}

/// `addNodes@key@proof...` (no count prefix, unlike `stake`).
pub fn add_nodes(entries: &[StakeEntry]) -> String {
    entries
        .iter()
        .fold(PayloadBuilder::new("addNodes"), |b, e| {
            b.hex_arg(&e.bls_key_hex).hex_arg(&e.proof_hex)
        })
        .build()
}

pub fn stake_nodes<S: AsRef<str>>(bls_keys_hex: &[S]) -> String {
    bls_keys_hex
        .iter()
        .fold(PayloadBuilder::new("stakeNodes"), |b, k| b.hex_arg(k.as_ref()))
        .build()
}

pub fn delegate() -> String {
    PayloadBuilder::new("delegate").build()
}

pub fn un_delegate(amount: &BigUint) -> String {
    PayloadBuilder::new("unDelegate").uint_arg(amount).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Payload;

    fn entry(i: u8) -> StakeEntry {
        StakeEntry {
            bls_key_hex: hex::encode([i; 96]),
            proof_hex: hex::encode([i + 100; 48]),
        }
    }

    #[test]
    fn test_stake_layout() {
        let entries = vec![entry(1), entry(2)];
        let data = stake(&entries);
        let p = Payload::parse(&data).unwrap();
        assert_eq!(p.function, "stake");
        assert_eq!(p.arg(0).unwrap(), "02");
        assert_eq!(p.arg(1).unwrap(), entries[0].bls_key_hex);
        assert_eq!(p.arg(2).unwrap(), entries[0].proof_hex);
        assert_eq!(p.arg(3).unwrap(), entries[1].bls_key_hex);
        assert_eq!(p.args.len(), 5);
        assert!(data.ends_with(&stake_args(&entries)));
    }

    #[test]
    fn test_delegation_contract_zero_cap_and_fee() {
        assert_eq!(
            create_new_delegation_contract(&BigUint::from(0u32), 0),
            "createNewDelegationContract@00@00"
        );
        assert_eq!(
            make_new_contract_from_validator_data(&BigUint::from(0u32), 1000),
            "makeNewContractFromValidatorData@00@03e8"
        );
    }

    #[test]
    fn test_address_arguments_are_hex_pubkeys() {
        let sc = Address::new([0u8; 32]);
        assert_eq!(
            merge_validator_to_delegation_same_owner(&sc),
            format!("mergeValidatorToDelegationSameOwner@{}", "00".repeat(32))
        );
        let owner = Address::new([7u8; 32]);
        let p = Payload::parse(&whitelist_for_merge(&owner)).unwrap();
        assert_eq!(p.address_at(0).unwrap(), owner);
    }

    #[test]
    fn test_nodes_and_delegate_payloads() {
        let p = Payload::parse(&add_nodes(&[entry(1)])).unwrap();
        assert_eq!(p.function, "addNodes");
        assert_eq!(p.args.len(), 2);

        let keys = [hex::encode([1u8; 96]), hex::encode([2u8; 96])];
        let p = Payload::parse(&stake_nodes(&keys)).unwrap();
        assert_eq!(p.args, keys.to_vec());

        assert_eq!(delegate(), "delegate");
        let amount = BigUint::parse_bytes(b"1000000000000000000", 10).unwrap();
        assert_eq!(un_delegate(&amount), "unDelegate@0de0b6b3a7640000");
        assert_eq!(un_stake("ab"), "unStake@ab");
        assert_eq!(un_bond_nodes("ab"), "unBondNodes@ab");
    }
}
