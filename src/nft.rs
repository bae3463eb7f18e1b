//! NFT collection lifecycle bound to one wallet.
//!
//! Every operation first makes sure the network is past the ESDT activation
//! epoch, then allocates the wallet's next nonce, builds, signs and executes
//! the transaction, and requires `success`.

use chainsim_types::{Address, DecodeError, HarnessError, Transaction};
use num_bigint::BigUint;
use tracing::info;

use crate::codec::esdt::{NftCreate, NftMetadata, TokenProperties, TokenTransfer};
use crate::confirm::TxOutcome;
use crate::constants::DEFAULT_ESDT_ISSUE_VALUE;
use crate::harness::Harness;
use crate::queries::token_identifier_from_tx;
use crate::wallet::Wallet;

pub struct NftManager<'h> {
    harness: &'h Harness,
    wallet: &'h mut Wallet,
    token_identifier: Option<String>,
}

impl<'h> NftManager<'h> {
    pub fn new(harness: &'h Harness, wallet: &'h mut Wallet) -> Self {
        Self {
            harness,
            wallet,
            token_identifier: None,
        }
    }

    /// Manage an already-issued collection.
    pub fn with_token(harness: &'h Harness, wallet: &'h mut Wallet, token_identifier: impl Into<String>) -> Self {
        Self {
            harness,
            wallet,
            token_identifier: Some(token_identifier.into()),
        }
    }

    pub fn token_identifier(&self) -> Option<&str> {
        self.token_identifier.as_deref()
    }

    pub fn wallet(&self) -> &Wallet {
        &*self.wallet
    }

    fn token(&self) -> Result<String, HarnessError> {
        self.token_identifier
            .clone()
            .ok_or_else(|| HarnessError::Build("no NFT collection issued yet".to_string()))
    }

    /// Reach the ESDT epoch, then allocate the next nonce.
    fn prepare(&mut self) -> Result<(Address, u64), HarnessError> {
        self.harness
            .blocks()
            .advance_to_epoch(self.harness.config().esdt_min_epoch)?;
        let nonce = self.wallet.next_nonce(self.harness.node())?;
        Ok((self.wallet.address(), nonce))
    }

    fn run(&self, tx: Transaction) -> Result<TxOutcome, HarnessError> {
        self.harness.execute_expect_success(&*self.wallet, tx)
    }

    /// Issue a non-fungible collection and remember its identifier.
    pub fn issue_nft(
        &mut self,
        name: &str,
        ticker: &str,
        properties: &TokenProperties,
    ) -> Result<String, HarnessError> {
        let (sender, nonce) = self.prepare()?;
        let tx = self.harness.builder().issue_non_fungible(
            &sender,
            nonce,
            name,
            ticker,
            properties,
            BigUint::from(DEFAULT_ESDT_ISSUE_VALUE),
        );
        let outcome = self.run(tx)?;
        let hash = outcome.hash.unwrap_or_default();
        let token = token_identifier_from_tx(self.harness.node(), &hash)?.ok_or_else(|| {
            DecodeError::new("token identifier", format!("no issue event in {}", hash))
        })?;
        info!(token = %token, "NFT collection issued");
        self.token_identifier = Some(token.clone());
        Ok(token)
    }

    /// Grant `roles` on the collection to the managing wallet.
    pub fn assign_roles<S: AsRef<str>>(&mut self, roles: &[S]) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self
            .harness
            .builder()
            .set_special_role(&sender, nonce, &token, &sender, roles);
        self.run(tx)
    }

    pub fn create_nft(&mut self, quantity: u64, metadata: &NftMetadata) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let nft = NftCreate {
            token_identifier: token,
            quantity,
            name: metadata.name.clone(),
            royalties: metadata.royalties,
            hash: metadata.hash.clone(),
            attributes: metadata.attributes.clone(),
            uris: metadata.uris.clone(),
        };
        let tx = self.harness.builder().nft_create(&sender, nonce, &nft);
        self.run(tx)
    }

    /// Send one unit of each listed instance to `receiver` in a single transaction.
    pub fn transfer_nfts(&mut self, receiver: &Address, token_nonces: &[u64]) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let transfers: Vec<TokenTransfer> = token_nonces
            .iter()
            .map(|n| TokenTransfer::nft(token.clone(), *n))
            .collect();
        let tx = self
            .harness
            .builder()
            .multi_token_transfer(&sender, nonce, receiver, &transfers);
        self.run(tx)
    }

    pub fn transfer_single_nft(&mut self, receiver: &Address, token_nonce: u64) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self.harness.builder().nft_transfer(
            &sender,
            nonce,
            &TokenTransfer::nft(token, token_nonce),
            receiver,
        );
        self.run(tx)
    }

    pub fn modify_royalties(&mut self, token_nonce: u64, royalties: u64) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self
            .harness
            .builder()
            .modify_royalties(&sender, nonce, &token, token_nonce, royalties);
        self.run(tx)
    }

    pub fn set_new_uris<S: AsRef<str>>(&mut self, token_nonce: u64, uris: &[S]) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self
            .harness
            .builder()
            .set_new_uris(&sender, nonce, &token, token_nonce, uris);
        self.run(tx)
    }

    /// Make the managing wallet the creator of an instance it holds.
    pub fn modify_creator(&mut self, token_nonce: u64) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self
            .harness
            .builder()
            .modify_creator(&sender, nonce, &token, token_nonce);
        self.run(tx)
    }

    pub fn recreate_metadata(&mut self, token_nonce: u64, metadata: &NftMetadata) -> Result<TxOutcome, HarnessError> {
        let token = self.token()?;
        let (sender, nonce) = self.prepare()?;
        let tx = self
            .harness
            .builder()
            .recreate_metadata(&sender, nonce, &token, token_nonce, metadata);
        self.run(tx)
    }
}
