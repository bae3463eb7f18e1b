//! End-to-end checks against a running chain simulator.
//!
//! Run with:
//! ```bash
//! RUN_SIMULATOR_TESTS=1 CHAINSIM_PROXY_URL=http://localhost:8085 cargo test --test simulator_e2e_tests
//! ```

mod common;

use anyhow::{ensure, Context, Result};
use chainsim_harness::codec::esdt::{NftMetadata, TokenProperties};
use chainsim_harness::config::HarnessConfig;
use chainsim_harness::constants::ROLE_NFT_CREATE;
use chainsim_harness::queries::{is_chain_online, multiple_esdt_details};
use chainsim_harness::{egld, Harness, NftManager, TxStatus, Wallet};
use rand::Rng;

fn connect() -> Result<Harness> {
    let harness = Harness::connect(HarnessConfig::from_env());
    ensure!(
        is_chain_online(harness.node()),
        "no simulator at {}",
        harness.config().proxy_url
    );
    Ok(harness)
}

/// Fresh random wallet with `amount_egld` set through the simulator.
fn funded_wallet(harness: &Harness, amount_egld: u64) -> Result<Wallet> {
    let wallet = Wallet::from_seed(rand::thread_rng().gen::<[u8; 32]>());
    wallet
        .set_balance(harness.node(), &egld(amount_egld))
        .context("set-state")?;
    harness.blocks().produce_blocks(1)?;
    Ok(wallet)
}

#[test]
fn test_simulator_transfer_round_trip() {
    skip_if_no_simulator!();
    transfer_round_trip().unwrap();
}

#[test]
fn test_simulator_epoch_advance() {
    skip_if_no_simulator!();
    epoch_advance().unwrap();
}

#[test]
fn test_simulator_nft_collection() {
    skip_if_no_simulator!();
    nft_collection().unwrap();
}

fn transfer_round_trip() -> Result<()> {
    let harness = connect()?;
    let mut alice = funded_wallet(&harness, 10)?;
    let bob = funded_wallet(&harness, 0)?;

    let nonce = alice.next_nonce(harness.node())?;
    let tx = harness
        .builder()
        .transfer(&alice.address(), &bob.address(), nonce, egld(1));
    let outcome = harness.execute(&alice, tx)?;
    ensure!(outcome.status == TxStatus::Success, "transfer ended {:?}", outcome);
    ensure!(bob.balance(harness.node())? == egld(1), "receiver not credited");
    Ok(())
}

fn epoch_advance() -> Result<()> {
    let harness = connect()?;
    let blocks = harness.blocks();
    let start = blocks.current_epoch()?;
    let reached = blocks.advance_to_epoch(start + 1)?;
    ensure!(reached > start, "epoch did not move from {}", start);
    Ok(())
}

fn nft_collection() -> Result<()> {
    let harness = connect()?;
    let mut owner = funded_wallet(&harness, 100)?;
    let owner_addr = owner.address();

    let mut manager = NftManager::new(&harness, &mut owner);
    let token = manager.issue_nft("HarnessCollection", "HRN", &TokenProperties::default())?;
    manager.assign_roles(&[ROLE_NFT_CREATE])?;
    for i in 1..=3 {
        manager.create_nft(
            1,
            &NftMetadata {
                name: format!("Item #{}", i),
                royalties: 1000,
                hash: format!("hash{}", i),
                attributes: format!("metadata:item{}", i),
                uris: vec![format!("https://example.com/{}.png", i)],
            },
        )?;
    }
    let held = multiple_esdt_details(harness.node(), &owner_addr, &token)?;
    ensure!(held.len() == 3, "expected 3 NFTs, found {}", held.len());
    Ok(())
}
