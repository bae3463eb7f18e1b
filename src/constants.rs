//! Chain constants: system contract addresses, default gas limits, amounts.

use chainsim_types::Address;

/// Metachain system contract address: the shared prefix, then `id` and `0xffff`.
const fn system_contract(id: u8) -> Address {
    let mut bytes = [0u8; 32];
    bytes[9] = 1;
    bytes[29] = id;
    bytes[30] = 0xff;
    bytes[31] = 0xff;
    Address::new(bytes)
}

pub const STAKING_ADDRESS: Address = system_contract(0);
pub const VALIDATOR_ADDRESS: Address = system_contract(1);
pub const ESDT_ADDRESS: Address = system_contract(2);
pub const DELEGATION_MANAGER_ADDRESS: Address = system_contract(4);

/// Validator system contract (stake / unStake / unBondNodes, getTotalStaked, getBlsKeysStatus).
pub const VALIDATOR_CONTRACT: &str =
    "erd1qqqqqqqqqqqqqqqpqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqplllst77y4l";

/// Delegation manager system contract.
pub const DELEGATION_MANAGER_CONTRACT: &str =
    "erd1qqqqqqqqqqqqqqqpqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqylllslmq6y6";

/// Staking system contract (getOwner).
pub const STAKING_CONTRACT: &str =
    "erd1qqqqqqqqqqqqqqqpqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqllls0lczs7";

/// ESDT system contract (issue, issueNonFungible, setSpecialRole).
pub const ESDT_CONTRACT: &str = "erd1qqqqqqqqqqqqqqqpqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqzllls8a5w6u";

pub const DEFAULT_PROXY_URL: &str = "http://localhost:8085";
pub const DEFAULT_CHAIN_ID: &str = "chain";
pub const DEFAULT_GAS_PRICE: u64 = 1_000_000_000;
pub const DEFAULT_ROUNDS_PER_EPOCH: u64 = 50;

/// Blocks produced while waiting for a transaction before it counts as expired.
pub const MAX_NUM_OF_BLOCKS_UNTIL_TX_SHOULD_BE_EXECUTED: u64 = 20;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_MAX_EPOCH_ATTEMPTS: usize = 20;

/// Epoch from which the ESDT system functions are active on a fresh simulator.
pub const ESDT_ACTIVATION_EPOCH: u32 = 7;

/// Extra blocks produced after an epoch change before consensus state is read.
pub const BLOCKS_AFTER_EPOCH_CHANGE: u64 = 3;

// =============================================================================
// Gas limits
// =============================================================================

pub const TRANSFER_GAS_LIMIT: u64 = 50_000;
pub const ESDT_GAS_LIMIT: u64 = 60_000_000;
pub const MULTI_TRANSFER_GAS_LIMIT: u64 = 550_000_000;
pub const RELAYED_GAS_LIMIT: u64 = 1_440_000;
pub const STAKING_GAS_LIMIT: u64 = 200_000_000;
pub const DELEGATION_MANAGER_GAS_LIMIT: u64 = 590_000_000;
pub const DELEGATE_GAS_LIMIT: u64 = 12_000_000;
pub const INNER_NEW_DELEGATION_CONTRACT_GAS_LIMIT: u64 = 55_000_000;

// =============================================================================
// Amounts (base units, 18 decimals)
// =============================================================================

pub const EGLD_DECIMALS: u32 = 18;

/// Cost of issuing an ESDT token (0.05 EGLD).
pub const ESDT_ISSUE_COST: u128 = 50_000_000_000_000_000;

/// Value sent with issue transactions by default (0.5 EGLD).
pub const DEFAULT_ESDT_ISSUE_VALUE: u128 = 500_000_000_000_000_000;

/// EGLD locked per staked validator node.
pub const STAKE_PER_NODE_EGLD: u64 = 2_500;

/// Initial stake of a new delegation contract.
pub const NEW_DELEGATION_CONTRACT_EGLD: u64 = 1_250;

// =============================================================================
// ESDT roles
// =============================================================================

pub const ROLE_NFT_CREATE: &str = "ESDTRoleNFTCreate";
pub const ROLE_NFT_BURN: &str = "ESDTRoleNFTBurn";
pub const ROLE_NFT_ADD_QUANTITY: &str = "ESDTRoleNFTAddQuantity";
pub const ROLE_NFT_UPDATE_ATTRIBUTES: &str = "ESDTRoleNFTUpdateAttributes";
pub const ROLE_NFT_ADD_URI: &str = "ESDTRoleNFTAddURI";
pub const ROLE_MODIFY_ROYALTIES: &str = "ESDTRoleModifyRoyalties";
pub const ROLE_SET_NEW_URI: &str = "ESDTRoleSetNewURI";
pub const ROLE_MODIFY_CREATOR: &str = "ESDTRoleModifyCreator";
pub const ROLE_NFT_RECREATE: &str = "ESDTRoleNFTRecreate";
