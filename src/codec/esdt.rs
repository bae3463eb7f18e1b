//! ESDT token issuance, role assignment and NFT lifecycle payloads.

use chainsim_types::Address;
use num_bigint::BigUint;

use super::PayloadBuilder;

/// Properties set at issuance. All default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProperties {
    pub can_freeze: bool,
    pub can_wipe: bool,
    pub can_pause: bool,
    /// Only encoded for non-fungible tokens.
    pub can_transfer_nft_create_role: bool,
    pub can_change_owner: bool,
    pub can_upgrade: bool,
    pub can_add_special_roles: bool,
}

impl Default for TokenProperties {
    fn default() -> Self {
        Self {
            can_freeze: true,
            can_wipe: true,
            can_pause: true,
            can_transfer_nft_create_role: true,
            can_change_owner: true,
            can_upgrade: true,
            can_add_special_roles: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FungibleIssue {
    pub name: String,
    pub ticker: String,
    pub initial_supply: BigUint,
    pub decimals: u32,
    pub properties: TokenProperties,
}

/// Arguments of `ESDTNFTCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCreate {
    pub token_identifier: String,
    pub quantity: u64,
    pub name: String,
    /// Basis points, 0..=10000.
    pub royalties: u64,
    pub hash: String,
    pub attributes: String,
    pub uris: Vec<String>,
}

/// Metadata written by `ESDTMetaDataRecreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftMetadata {
    pub name: String,
    pub royalties: u64,
    pub hash: String,
    pub attributes: String,
    pub uris: Vec<String>,
}

/// One entry of a multi-token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token_identifier: String,
    pub nonce: u64,
    pub quantity: BigUint,
}

impl TokenTransfer {
    pub fn nft(token_identifier: impl Into<String>, nonce: u64) -> Self {
        Self {
            token_identifier: token_identifier.into(),
            nonce,
            quantity: BigUint::from(1u32),
        }
    }
}

pub fn issue_fungible(issue: &FungibleIssue) -> String {
    let p = &issue.properties;
    PayloadBuilder::new("issue")
        .str_arg(&issue.name)
        .str_arg(&issue.ticker)
        .uint_arg(&issue.initial_supply)
        .u64_arg(u64::from(issue.decimals))
        .flag("canFreeze", p.can_freeze)
        .flag("canWipe", p.can_wipe)
        .flag("canPause", p.can_pause)
        .flag("canChangeOwner", p.can_change_owner)
        .flag("canUpgrade", p.can_upgrade)
        .flag("canAddSpecialRoles", p.can_add_special_roles)
        .build()
}

pub fn issue_non_fungible(name: &str, ticker: &str, p: &TokenProperties) -> String {
    PayloadBuilder::new("issueNonFungible")
        .str_arg(name)
        .str_arg(ticker)
        .flag("canFreeze", p.can_freeze)
        .flag("canWipe", p.can_wipe)
        .flag("canPause", p.can_pause)
        .flag("canTransferNFTCreateRole", p.can_transfer_nft_create_role)
        .flag("canChangeOwner", p.can_change_owner)
        .flag("canUpgrade", p.can_upgrade)
        .flag("canAddSpecialRoles", p.can_add_special_roles)
        .build()
}

/// `setSpecialRole@token@assigneeHex@role...`
pub fn set_special_role<S: AsRef<str>>(
    token_identifier: &str,
    assignee: &Address,
    roles: &[S],
) -> String {
    PayloadBuilder::new("setSpecialRole")
        .str_arg(token_identifier)
        .address_arg(assignee)
        .str_list(roles)
        .build()
}

pub fn nft_create(nft: &NftCreate) -> String {
    PayloadBuilder::new("ESDTNFTCreate")
        .str_arg(&nft.token_identifier)
        .u64_arg(nft.quantity)
        .str_arg(&nft.name)
        .u64_arg(nft.royalties)
        .str_arg(&nft.hash)
        .str_arg(&nft.attributes)
        .str_list(&nft.uris)
        .build()
}

/// Single NFT transfer, sent by the holder to itself with the destination as argument.
pub fn nft_transfer(
    token_identifier: &str,
    nonce: u64,
    quantity: &BigUint,
    destination: &Address,
) -> String {
    PayloadBuilder::new("ESDTNFTTransfer")
        .str_arg(token_identifier)
        .u64_arg(nonce)
        .uint_arg(quantity)
        .address_arg(destination)
        .build()
}

/// `MultiESDTNFTTransfer@receiverHex@count@(token@nonce@quantity)...`
pub fn multi_token_transfer(receiver: &Address, transfers: &[TokenTransfer]) -> String {
    transfers
        .iter()
        .fold(
            PayloadBuilder::new("MultiESDTNFTTransfer")
                .address_arg(receiver)
                .u64_arg(transfers.len() as u64),
            |builder, t| {
                builder
                    .str_arg(&t.token_identifier)
                    .u64_arg(t.nonce)
                    .uint_arg(&t.quantity)
            },
        )
        .build()
}

pub fn modify_royalties(token_identifier: &str, nonce: u64, royalties: u64) -> String {
    PayloadBuilder::new("ESDTModifyRoyalties")
        .str_arg(token_identifier)
        .u64_arg(nonce)
        .u64_arg(royalties)
        .build()
}

pub fn set_new_uris<S: AsRef<str>>(token_identifier: &str, nonce: u64, uris: &[S]) -> String {
    PayloadBuilder::new("ESDTNFTSetNewURIs")
        .str_arg(token_identifier)
        .u64_arg(nonce)
        .str_list(uris)
        .build()
}

pub fn modify_creator(token_identifier: &str, nonce: u64) -> String {
    PayloadBuilder::new("ESDTNFTModifyCreator")
        .str_arg(token_identifier)
        .u64_arg(nonce)
        .build()
}

pub fn recreate_metadata(token_identifier: &str, nonce: u64, meta: &NftMetadata) -> String {
    PayloadBuilder::new("ESDTMetaDataRecreate")
        .str_arg(token_identifier)
        .u64_arg(nonce)
        .str_arg(&meta.name)
        .u64_arg(meta.royalties)
        .str_arg(&meta.hash)
        .str_arg(&meta.attributes)
        .str_list(&meta.uris)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Payload;
    use chainsim_types::encoding::string_to_hex;

    #[test]
    fn test_issue_fungible_layout() {
        let data = issue_fungible(&FungibleIssue {
            name: "TestToken".to_string(),
            ticker: "TST".to_string(),
            initial_supply: BigUint::from(1_000_000u32),
            decimals: 18,
            properties: TokenProperties::default(),
        });
        let p = Payload::parse(&data).unwrap();
        assert_eq!(p.function, "issue");
        assert_eq!(p.str_at(0).unwrap(), "TestToken");
        assert_eq!(p.str_at(1).unwrap(), "TST");
        assert_eq!(p.arg(2).unwrap(), "0f4240");
        assert_eq!(p.arg(3).unwrap(), "12");
        // 6 flags, two segments each
        assert_eq!(p.args.len(), 4 + 12);
        assert_eq!(p.flag_at(4).unwrap(), ("canFreeze".to_string(), true));
        assert_eq!(p.flag_at(14).unwrap(), ("canAddSpecialRoles".to_string(), true));
    }

    #[test]
    fn test_issue_non_fungible_flag_order() {
        let props = TokenProperties {
            can_wipe: false,
            ..TokenProperties::default()
        };
        let p = Payload::parse(&issue_non_fungible("Collection", "COL", &props)).unwrap();
        let names: Vec<(String, bool)> = (0..7).map(|i| p.flag_at(2 + i * 2).unwrap()).collect();
        assert_eq!(
            names,
            vec![
                ("canFreeze".to_string(), true),
                ("canWipe".to_string(), false),
                ("canPause".to_string(), true),
                ("canTransferNFTCreateRole".to_string(), true),
                ("canChangeOwner".to_string(), true),
                ("canUpgrade".to_string(), true),
                ("canAddSpecialRoles".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_set_special_role() {
        let addr = Address::new([2u8; 32]);
        let data = set_special_role("NFT-123456", &addr, &["ESDTRoleNFTCreate", "ESDTRoleNFTBurn"]);
        assert_eq!(
            data,
            format!(
                "setSpecialRole@{}@{}@{}@{}",
                string_to_hex("NFT-123456"),
                addr.to_hex(),
                string_to_hex("ESDTRoleNFTCreate"),
                string_to_hex("ESDTRoleNFTBurn")
            )
        );
    }

    #[test]
    fn test_nft_create_roundtrip() {
        let nft = NftCreate {
            token_identifier: "NFT-123456".to_string(),
            quantity: 1,
            name: "First".to_string(),
            royalties: 1000,
            hash: "".to_string(),
            attributes: "metadata:cid;tags:a,b".to_string(),
            uris: vec!["https://example.com/1.png".to_string()],
        };
        let p = Payload::parse(&nft_create(&nft)).unwrap();
        assert_eq!(p.function, "ESDTNFTCreate");
        assert_eq!(p.str_at(0).unwrap(), nft.token_identifier);
        assert_eq!(p.u64_at(1).unwrap(), 1);
        assert_eq!(p.str_at(2).unwrap(), "First");
        assert_eq!(p.u64_at(3).unwrap(), 1000);
        assert_eq!(p.arg(4).unwrap(), "");
        assert_eq!(p.str_at(5).unwrap(), nft.attributes);
        assert_eq!(p.str_at(6).unwrap(), nft.uris[0]);
    }

    #[test]
    fn test_multi_transfer_layout() {
        let receiver = Address::new([3u8; 32]);
        let transfers = vec![
            TokenTransfer::nft("NFT-123456", 1),
            TokenTransfer::nft("NFT-123456", 2),
            TokenTransfer::nft("NFT-123456", 3),
        ];
        let p = Payload::parse(&multi_token_transfer(&receiver, &transfers)).unwrap();
        assert_eq!(p.function, "MultiESDTNFTTransfer");
        assert_eq!(p.address_at(0).unwrap(), receiver);
        assert_eq!(p.u64_at(1).unwrap(), 3);
        for (i, t) in transfers.iter().enumerate() {
            let base = 2 + i * 3;
            assert_eq!(p.str_at(base).unwrap(), t.token_identifier);
            assert_eq!(p.u64_at(base + 1).unwrap(), t.nonce);
            assert_eq!(p.uint_at(base + 2).unwrap(), t.quantity);
        }
    }

    #[test]
    fn test_nft_transfer_and_metadata_ops() {
        let dest = Address::new([5u8; 32]);
        let p = Payload::parse(&nft_transfer("NFT-123456", 2, &BigUint::from(1u32), &dest)).unwrap();
        assert_eq!(p.function, "ESDTNFTTransfer");
        assert_eq!(p.address_at(3).unwrap(), dest);

        assert_eq!(
            modify_creator("NFT-123456", 10),
            format!("ESDTNFTModifyCreator@{}@0a", string_to_hex("NFT-123456"))
        );

        let p = Payload::parse(&set_new_uris("NFT-123456", 1, &["a", "b"])).unwrap();
        assert_eq!(p.args.len(), 4);
        assert_eq!(p.str_at(3).unwrap(), "b");

        let meta = NftMetadata {
            name: "Renamed".to_string(),
            royalties: 500,
            hash: "abc".to_string(),
            attributes: "x".to_string(),
            uris: vec!["u".to_string()],
        };
        let p = Payload::parse(&recreate_metadata("NFT-123456", 1, &meta)).unwrap();
        assert_eq!(p.function, "ESDTMetaDataRecreate");
        assert_eq!(p.str_at(2).unwrap(), "Renamed");
        assert_eq!(p.u64_at(3).unwrap(), 500);
        assert_eq!(p.str_at(4).unwrap(), "abc");
        assert_eq!(p.str_at(6).unwrap(), "u");
    }
}
