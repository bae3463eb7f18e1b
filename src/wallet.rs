//! Wallet accounts: an Ed25519 key, its address and its nonce cache.

use std::path::{Path, PathBuf};

use chainsim_transport::{AccountDetail, ChainNode, StateEntry};
use chainsim_types::{Address, HarnessError, NodeQueryError, SigningError, Transaction};
use num_bigint::BigUint;
use tracing::{debug, info};

use crate::nonce::NonceCache;
use crate::signer::{sign_transaction, Ed25519Signer, MessageSigner};

#[derive(Debug, Clone)]
pub struct Wallet {
    path: Option<PathBuf>,
    signer: Ed25519Signer,
    nonce: NonceCache,
}

impl Wallet {
    pub fn from_signer(signer: Ed25519Signer) -> Self {
        let nonce = NonceCache::new(signer.address());
        Self {
            path: None,
            signer,
            nonce,
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::from_signer(Ed25519Signer::from_seed(seed))
    }

    pub fn from_pem_str(text: &str, source: &str) -> Result<Self, SigningError> {
        Ed25519Signer::from_pem_str(text, source).map(Self::from_signer)
    }

    pub fn from_pem_file(path: &Path) -> Result<Self, SigningError> {
        let mut wallet = Self::from_signer(Ed25519Signer::from_pem_file(path)?);
        wallet.path = Some(path.to_path_buf());
        Ok(wallet)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// PEM file this wallet was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn signer(&self) -> &Ed25519Signer {
        &self.signer
    }

    pub fn sign(&self, tx: &mut Transaction) -> Result<(), SigningError> {
        sign_transaction(tx, &self.signer)
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.signer.public_key()
    }

    // -------------------------------------------------------------------------
    // Nonce
    // -------------------------------------------------------------------------

    pub fn current_nonce(&mut self, node: &dyn ChainNode) -> Result<u64, NodeQueryError> {
        self.nonce.current(node)
    }

    pub fn next_nonce(&mut self, node: &dyn ChainNode) -> Result<u64, HarnessError> {
        self.nonce.next(node)
    }

    pub fn refresh_nonce(&mut self, node: &dyn ChainNode) -> Result<u64, NodeQueryError> {
        self.nonce.refresh(node)
    }

    pub fn cached_nonce(&self) -> Option<u64> {
        self.nonce.cached()
    }

    // -------------------------------------------------------------------------
    // Account state
    // -------------------------------------------------------------------------

    pub fn balance(&self, node: &dyn ChainNode) -> Result<BigUint, NodeQueryError> {
        node.balance(&self.address())
    }

    pub fn account(&self, node: &dyn ChainNode) -> Result<AccountDetail, NodeQueryError> {
        node.account(&self.address())
    }

    /// Overwrite the balance through the simulator's state endpoint.
    pub fn set_balance(&self, node: &dyn ChainNode, balance: &BigUint) -> Result<(), NodeQueryError> {
        set_balance(node, &self.address(), balance)
    }
}

pub fn set_balance(
    node: &dyn ChainNode,
    address: &Address,
    balance: &BigUint,
) -> Result<(), NodeQueryError> {
    node.set_state(&[StateEntry {
        address: address.to_bech32(),
        balance: balance.to_string(),
    }])?;
    info!(address = %address, balance = %balance, "balance set");
    Ok(())
}

/// Load every `*.pem` in `dir`, sorted by file name.
pub fn load_wallets_dir(dir: &Path) -> Result<Vec<Wallet>, HarnessError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| HarnessError::Key(format!("cannot read {}: {}", dir.display(), e)))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "pem"))
        .collect();
    paths.sort();
    debug!(dir = %dir.display(), count = paths.len(), "loading wallets");
    paths
        .iter()
        .map(|p| Wallet::from_pem_file(p).map_err(HarnessError::from))
        .collect()
}
