//! NFT identifiers and offer preparation for NFTs.

use bech32::{FromBase32, ToBase32, Variant};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::OfferError;
use crate::driver::{Driver, MetadataLayer, OwnershipLayer, RoyaltyTransferProgram};

pub const NFT_HRP: &str = "nft";

const LAUNCHER_ID_LEN: usize = 32;

/// Strip an optional `0x` prefix and lowercase a hex identifier.
#[must_use]
pub fn normalize_hex_id(id: &str) -> String {
    let trimmed = id.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

/// Compare two asset or launcher ids ignoring case and `0x` prefixes.
#[must_use]
pub fn same_asset_id(left: &str, right: &str) -> bool {
    normalize_hex_id(left) == normalize_hex_id(right)
}

pub fn launcher_id_to_nft_id(launcher_id: &str) -> Result<String, OfferError> {
    let invalid = |message: String| OfferError::InvalidNftId {
        id: launcher_id.to_string(),
        message,
    };

    let bytes = hex::decode(normalize_hex_id(launcher_id)).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() != LAUNCHER_ID_LEN {
        return Err(invalid(format!(
            "launcher id must be {LAUNCHER_ID_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    bech32::encode(NFT_HRP, bytes.to_base32(), Variant::Bech32m).map_err(|e| invalid(e.to_string()))
}

pub fn nft_id_to_launcher_id(nft_id: &str) -> Result<String, OfferError> {
    let invalid = |message: String| OfferError::InvalidNftId {
        id: nft_id.to_string(),
        message,
    };

    let (hrp, data, variant) = bech32::decode(nft_id.trim()).map_err(|e| invalid(e.to_string()))?;
    if hrp != NFT_HRP {
        return Err(invalid(format!(
            "expected '{NFT_HRP}' human-readable prefix, got '{hrp}'"
        )));
    }
    if variant != Variant::Bech32m {
        return Err(invalid("NFT ids must use the bech32m variant".to_string()));
    }

    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() != LAUNCHER_ID_LEN {
        return Err(invalid(format!(
            "launcher id must be {LAUNCHER_ID_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(hex::encode(bytes))
}

/// Subset of the wallet service's `nft_get_info` record used for offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftInfo {
    pub launcher_id: String,
    #[serde(default)]
    pub nft_coin_id: String,
    pub launcher_puzhash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_did: Option<String>,
    #[serde(default)]
    pub royalty_percentage: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_puzzle_hash: Option<String>,
    #[serde(default)]
    pub chain_info: String,
    #[serde(default)]
    pub updater_puzhash: String,
    #[serde(default)]
    pub supports_did: bool,
    #[serde(default)]
    pub data_uris: Vec<String>,
}

/// Result of preparing one NFT line for the offer API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedNftOffer {
    /// Launcher id, used as the wallet-id key of the offer dictionary.
    pub id: String,
    /// `-1` when offering, `+1` when requesting.
    pub amount: BigDecimal,
    pub driver: Option<Driver>,
}

/// Build the offer entry for `info`. DID-capable NFTs carry the full driver
/// layering; older NFTs are offered by launcher id only.
#[must_use]
pub fn prepare_nft_offer(info: &NftInfo, offering: bool) -> PreparedNftOffer {
    let id = normalize_hex_id(&info.launcher_id);
    let prefixed_launcher_id = format!("0x{id}");
    let amount = BigDecimal::from(if offering { -1 } else { 1 });

    let driver = info.supports_did.then(|| Driver::Singleton {
        launcher_id: prefixed_launcher_id.clone(),
        launcher_ph: info.launcher_puzhash.clone(),
        also: MetadataLayer {
            metadata: info.chain_info.clone(),
            updater_hash: info.updater_puzhash.clone(),
            also: Some(OwnershipLayer {
                owner: info
                    .owner_did
                    .as_deref()
                    .map_or_else(|| "()".to_string(), |did| format!("0x{}", normalize_hex_id(did))),
                transfer_program: RoyaltyTransferProgram {
                    launcher_id: prefixed_launcher_id.clone(),
                    royalty_address: info.royalty_puzzle_hash.clone().unwrap_or_default(),
                    royalty_percentage: info.royalty_percentage.to_string(),
                },
            }),
        },
    });

    PreparedNftOffer { id, amount, driver }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAUNCHER_ID: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

    fn nft_info(supports_did: bool) -> NftInfo {
        NftInfo {
            launcher_id: LAUNCHER_ID.to_string(),
            nft_coin_id: "0x22".to_string(),
            launcher_puzhash: "0x33".to_string(),
            owner_did: None,
            royalty_percentage: 300,
            royalty_puzzle_hash: Some("0x44".to_string()),
            chain_info: "((117 . 0x00))".to_string(),
            updater_puzhash: "0x55".to_string(),
            supports_did,
            data_uris: Vec::new(),
        }
    }

    #[test]
    fn nft_id_encoding_is_reversible() {
        let nft_id = launcher_id_to_nft_id(LAUNCHER_ID).expect("encode");
        assert!(nft_id.starts_with("nft1"));
        assert_eq!(
            nft_id_to_launcher_id(&nft_id).expect("decode"),
            normalize_hex_id(LAUNCHER_ID)
        );
    }

    #[test]
    fn rejects_wrong_prefix_and_length() {
        let short = launcher_id_to_nft_id("0xabcd").expect_err("too short");
        assert!(matches!(short, OfferError::InvalidNftId { .. }));

        let foreign =
            bech32::encode("did:hdd:", [7_u8; 32].to_base32(), Variant::Bech32m).expect("encode");
        let err = nft_id_to_launcher_id(&foreign).expect_err("wrong prefix");
        assert!(err.to_string().contains("human-readable prefix"));
    }

    #[test]
    fn prepared_offer_signs_amount_by_direction() {
        let offered = prepare_nft_offer(&nft_info(true), true);
        assert_eq!(offered.id, normalize_hex_id(LAUNCHER_ID));
        assert_eq!(offered.amount, BigDecimal::from(-1));

        let requested = prepare_nft_offer(&nft_info(true), false);
        assert_eq!(requested.amount, BigDecimal::from(1));

        let driver = requested.driver.expect("did nft has driver");
        assert_eq!(
            driver.royalty_percentage().expect("valid"),
            Some(BigDecimal::from(300))
        );
        assert_eq!(driver.ownership().expect("ownership").owner, "()");
    }

    #[test]
    fn legacy_nft_has_no_driver() {
        assert!(prepare_nft_offer(&nft_info(false), true).driver.is_none());
    }
}
