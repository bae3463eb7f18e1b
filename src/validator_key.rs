//! BLS validator keys.
//!
//! Validator PEM files hold one block per key, labelled with the BLS public
//! key hex. The harness never performs BLS arithmetic itself: proofs of
//! possession come from an injected [`MessageSigner`].

use std::path::{Path, PathBuf};

use chainsim_transport::{ChainNode, VmQuery};
use chainsim_types::encoding::{base64_decode, base64_to_hex, base64_to_string, parse_hex_bytes};
use chainsim_types::{Address, HarnessError, SigningError};
use tracing::debug;

use crate::codec::staking::StakeEntry;
use crate::constants::{STAKING_CONTRACT, VALIDATOR_CONTRACT};
use crate::signer::{parse_pem_blocks, MessageSigner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorKey {
    /// File the key was read from, if any.
    pub path: Option<PathBuf>,
    pub bls_public_key: String,
    /// PEM body as-is; the form `/simulator/add-keys` expects.
    pub private_key_base64: String,
}

impl ValidatorKey {
    /// Every key block in `text`.
    pub fn from_pem_str(text: &str, source: &str) -> Result<Vec<Self>, SigningError> {
        parse_pem_blocks(text, source)?
            .into_iter()
            .map(|block| {
                parse_hex_bytes(&block.label, "BLS public key")
                    .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
                base64_decode(&block.body_base64, "validator key body").map_err(|e| {
                    SigningError::InvalidPem {
                        source: source.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Self {
                    path: None,
                    bls_public_key: block.label,
                    private_key_base64: block.body_base64,
                })
            })
            .collect()
    }

    pub fn from_pem_file(path: &Path) -> Result<Vec<Self>, SigningError> {
        let source = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| SigningError::InvalidPem {
            source: source.clone(),
            message: e.to_string(),
        })?;
        Ok(Self::from_pem_str(&text, &source)?
            .into_iter()
            .map(|mut key| {
                key.path = Some(path.to_path_buf());
                key
            })
            .collect())
    }

    /// Stake entry for `owner`: the key plus a BLS signature over the owner's public key.
    pub fn stake_entry(
        &self,
        bls_signer: &dyn MessageSigner,
        owner: &Address,
    ) -> Result<StakeEntry, SigningError> {
        let proof = bls_signer.sign(owner.as_bytes())?;
        Ok(StakeEntry {
            bls_key_hex: self.bls_public_key.clone(),
            proof_hex: hex::encode(proof),
        })
    }

    /// Owner registered in the staking contract, `None` when the key was never staked.
    pub fn owner(&self, node: &dyn ChainNode) -> Result<Option<Address>, HarnessError> {
        let query = VmQuery::new(STAKING_CONTRACT, "getOwner").arg(&self.bls_public_key);
        let result = node.vm_query(&query)?;
        let Some(first) = result.return_data.first() else {
            return Ok(None);
        };
        let bytes = base64_decode(first, "getOwner return data")?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Address::from_slice(&bytes)?))
    }

    /// Status string (`staked`, `unStaked`, ...) reported by `getBlsKeysStatus` for `owner`.
    pub fn staking_status(
        &self,
        node: &dyn ChainNode,
        owner: &Address,
    ) -> Result<Option<String>, HarnessError> {
        let query = VmQuery::new(VALIDATOR_CONTRACT, "getBlsKeysStatus").arg(owner.to_hex());
        let result = node.vm_query(&query)?;
        for pair in result.return_data.chunks(2) {
            let [key, status] = pair else {
                break;
            };
            if base64_to_hex(key, "getBlsKeysStatus key")? == self.bls_public_key {
                let status = base64_to_string(status, "getBlsKeysStatus status")?;
                debug!(key = %self.short(), status = %status, "staking status");
                return Ok(Some(status));
            }
        }
        Ok(None)
    }

    /// Consensus status (`eligible`, `waiting`, `new`, ...) from validator statistics.
    pub fn consensus_state(&self, node: &dyn ChainNode) -> Result<Option<String>, HarnessError> {
        let stats = node.validator_statistics()?;
        Ok(stats
            .get(&self.bls_public_key)
            .map(|s| s.validator_status.clone()))
    }

    fn short(&self) -> &str {
        self.bls_public_key
            .get(..12)
            .unwrap_or(self.bls_public_key.as_str())
    }
}

/// Load the keys of every `*.pem` in `dir`, files sorted by name.
pub fn load_validator_keys_dir(dir: &Path) -> Result<Vec<ValidatorKey>, HarnessError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| HarnessError::Key(format!("cannot read {}: {}", dir.display(), e)))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "pem"))
        .collect();
    paths.sort();
    let mut keys = Vec::new();
    for path in &paths {
        keys.extend(ValidatorKey::from_pem_file(path)?);
    }
    debug!(dir = %dir.display(), count = keys.len(), "loaded validator keys");
    Ok(keys)
}
