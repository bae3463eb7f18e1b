//! Relayed transactions against the in-memory chain.
//!
//! The relayer pays the outer fee; each inner transaction executes on its own
//! and the bundle reports `fail` as soon as one inner transaction fails.

mod common;

use chainsim_harness::constants::{DEFAULT_GAS_PRICE, RELAYED_GAS_LIMIT};
use chainsim_harness::test_utils::RECURSIVE_RELAY_ERROR;
use chainsim_harness::{egld, HarnessError, Transaction, TxStatus, Wallet};
use common::{assert_error_contains, assert_outcome_fails_with, assert_success, one_egld, Scenario};
use num_bigint::BigUint;

/// A signed one-EGLD transfer from `sender` to `receiver`, relayed by `relayer`.
fn inner_transfer(s: &Scenario, sender: &mut Wallet, receiver: &Wallet, relayer: &Wallet, nonce: Option<u64>) -> Transaction {
    let nonce = match nonce {
        Some(n) => n,
        None => sender.next_nonce(s.harness.node()).unwrap(),
    };
    let tx = s
        .harness
        .builder()
        .transfer(&sender.address(), &receiver.address(), nonce, one_egld());
    let mut tx = s.harness.builder().inner(tx, &relayer.address());
    sender.sign(&mut tx).unwrap();
    tx
}

fn relayed_fee() -> BigUint {
    BigUint::from(RELAYED_GAS_LIMIT) * BigUint::from(DEFAULT_GAS_PRICE)
}

#[test]
fn test_relayed_bundle_from_several_senders() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut senders: Vec<Wallet> = (2..5).map(|seed| s.wallet(seed, 10)).collect();

    let inners: Vec<Transaction> = senders
        .iter_mut()
        .map(|w| inner_transfer(&s, w, &receiver, &relayer, None))
        .collect();
    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, inners, None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_success(&outcome, "relayed bundle");
    assert_eq!(s.node.balance_of(&receiver.address()), egld(3));
    assert_eq!(s.node.balance_of(&relayer.address()), egld(10) - relayed_fee());
    for sender in &senders {
        // the relayer pays the gas, senders only the value
        assert_eq!(s.node.balance_of(&sender.address()), egld(9));
        assert_eq!(s.node.nonce_of(&sender.address()), 1);
    }
    let record = s
        .harness
        .node()
        .transaction_with_results(outcome.hash.as_deref().unwrap())
        .unwrap();
    assert_eq!(record.smart_contract_results.len(), 3);
}

#[test]
fn test_relayed_increasing_nonces_from_one_sender() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut sender = s.wallet(2, 10);
    let before = s.node.nonce_of(&sender.address());

    let inners: Vec<Transaction> = (0..5)
        .map(|_| inner_transfer(&s, &mut sender, &receiver, &relayer, None))
        .collect();
    let nonces: Vec<u64> = inners.iter().map(|tx| tx.nonce).collect();
    assert_eq!(nonces, (before..before + 5).collect::<Vec<_>>());

    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, inners, None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_eq!(outcome.status, TxStatus::Success);
    assert_eq!(s.node.nonce_of(&sender.address()), before + 5);
    assert_eq!(s.node.balance_of(&receiver.address()), egld(5));
}

#[test]
fn test_relayed_varied_nonces_apply_only_the_expected_one() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut sender = s.wallet(2, 10);
    s.node.set_nonce(&sender.address(), 3);
    let current = sender.refresh_nonce(s.harness.node()).unwrap();

    let inners: Vec<Transaction> = [current + 5, current + 4, current, current + 2, current - 1]
        .into_iter()
        .map(|n| inner_transfer(&s, &mut sender, &receiver, &relayer, Some(n)))
        .collect();
    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, inners, None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_eq!(outcome.status, TxStatus::Fail);
    // only the inner transaction at the sender's current nonce lands
    assert_eq!(s.node.nonce_of(&sender.address()), current + 1);
    assert_eq!(s.node.balance_of(&receiver.address()), egld(1));
    assert_eq!(s.node.balance_of(&sender.address()), egld(9));
}

#[test]
fn test_relayed_decreasing_nonces_partially_fail() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut sender = s.wallet(2, 10);

    let second = inner_transfer(&s, &mut sender, &receiver, &relayer, Some(1));
    let first = inner_transfer(&s, &mut sender, &receiver, &relayer, Some(0));
    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, vec![second, first], None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_outcome_fails_with(&outcome, "invalid nonce", "out-of-order inner nonces");
    assert_eq!(s.node.balance_of(&receiver.address()), egld(1));
    assert_eq!(s.node.nonce_of(&sender.address()), 1);
}

#[test]
fn test_relayed_inner_without_funds_fails_bundle() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut funded = s.wallet(2, 10);
    let mut broke = s.wallet(3, 0);

    let inners = vec![
        inner_transfer(&s, &mut funded, &receiver, &relayer, None),
        inner_transfer(&s, &mut broke, &receiver, &relayer, None),
    ];
    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, inners, None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_outcome_fails_with(&outcome, "insufficient funds", "unfunded inner sender");
    assert_eq!(s.node.balance_of(&receiver.address()), egld(1));
    assert_eq!(s.node.balance_of(&relayer.address()), egld(10) - relayed_fee());
}

#[test]
fn test_relayer_mismatch_fails_inner() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let other = s.wallet(5, 0);
    let receiver = s.wallet(9, 0);
    let mut sender = s.wallet(2, 10);

    let inner = inner_transfer(&s, &mut sender, &receiver, &other, None);
    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, vec![inner], None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_outcome_fails_with(&outcome, "relayer address mismatch", "inner relayed by someone else");
    assert_eq!(s.node.balance_of(&receiver.address()), BigUint::default());
}

#[test]
fn test_nested_relayed_rejected_at_submission() {
    let s = Scenario::new();
    let mut relayer = s.wallet(1, 10);
    let receiver = s.wallet(9, 0);
    let mut sender = s.wallet(2, 10);

    let inner = inner_transfer(&s, &mut sender, &receiver, &relayer, None);
    let nested_nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let nested = s
        .harness
        .builder()
        .relayed(&relayer.address(), nested_nonce, vec![inner], None)
        .unwrap();
    let mut nested = s.harness.builder().inner(nested, &relayer.address());
    relayer.sign(&mut nested).unwrap();

    let nonce = relayer.next_nonce(s.harness.node()).unwrap();
    let outer = s
        .harness
        .builder()
        .relayed(&relayer.address(), nonce, vec![nested], None)
        .unwrap();
    let outcome = s.harness.execute(&relayer, outer).unwrap();

    assert_eq!(outcome.status, TxStatus::Fail);
    assert!(outcome.hash.is_none());
    assert!(outcome.error_contains(RECURSIVE_RELAY_ERROR));
    assert_eq!(s.node.calls().send_transaction, 1);
    assert_eq!(s.node.blocks_produced(), 0);
}

#[test]
fn test_relayed_requires_signed_non_empty_bundle() {
    let s = Scenario::new();
    let relayer = s.wallet(1, 10);
    let sender = s.wallet(2, 10);

    let empty = s.harness.builder().relayed(&relayer.address(), 0, Vec::new(), None);
    assert_error_contains(empty.unwrap_err(), "at least one inner", "empty bundle");

    let unsigned = s.harness.builder().inner(
        s.harness
            .builder()
            .transfer(&sender.address(), &relayer.address(), 0, one_egld()),
        &relayer.address(),
    );
    let err = s
        .harness
        .builder()
        .relayed(&relayer.address(), 0, vec![unsigned], None)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Build(_)));
    assert_error_contains(err, "not signed", "unsigned inner");
}
