use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::amount::serde_amount;
use crate::nft::same_asset_id;

/// Wallet kinds reported by the wallet service, keyed by their numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WalletType {
    Standard,
    AtomicSwap,
    AuthorizedPayee,
    MultiSig,
    Custody,
    Cat,
    Recoverable,
    DecentralizedId,
    PoolingWallet,
    Nft,
    DataLayer,
    DataLayerOffer,
    Vc,
    Dao,
    DaoCat,
    CrCat,
}

impl TryFrom<u8> for WalletType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Standard,
            2 => Self::AtomicSwap,
            3 => Self::AuthorizedPayee,
            4 => Self::MultiSig,
            5 => Self::Custody,
            6 => Self::Cat,
            7 => Self::Recoverable,
            8 => Self::DecentralizedId,
            9 => Self::PoolingWallet,
            10 => Self::Nft,
            11 => Self::DataLayer,
            12 => Self::DataLayerOffer,
            13 => Self::Vc,
            14 => Self::Dao,
            15 => Self::DaoCat,
            57 => Self::CrCat,
            other => return Err(format!("unknown wallet type code {other}")),
        })
    }
}

impl From<WalletType> for u8 {
    fn from(wallet_type: WalletType) -> Self {
        match wallet_type {
            WalletType::Standard => 0,
            WalletType::AtomicSwap => 2,
            WalletType::AuthorizedPayee => 3,
            WalletType::MultiSig => 4,
            WalletType::Custody => 5,
            WalletType::Cat => 6,
            WalletType::Recoverable => 7,
            WalletType::DecentralizedId => 8,
            WalletType::PoolingWallet => 9,
            WalletType::Nft => 10,
            WalletType::DataLayer => 11,
            WalletType::DataLayerOffer => 12,
            WalletType::Vc => 13,
            WalletType::Dao => 14,
            WalletType::DaoCat => 15,
            WalletType::CrCat => 57,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
    #[serde(default)]
    pub meta: WalletMeta,
}

impl Wallet {
    /// CAT display name, falling back to a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.meta
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown token")
    }
}

/// Point-in-time balance snapshot for one wallet, in smallest units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub wallet_id: u32,
    #[serde(with = "serde_amount")]
    pub spendable_balance: BigDecimal,
    #[serde(with = "serde_amount")]
    pub confirmed_wallet_balance: BigDecimal,
}

#[must_use]
pub fn find_standard_wallet(wallets: &[Wallet]) -> Option<&Wallet> {
    wallets
        .iter()
        .find(|wallet| wallet.wallet_type == WalletType::Standard)
}

/// Asset ids match ignoring case and an optional `0x` prefix.
#[must_use]
pub fn find_cat_wallet_by_asset_id<'a>(wallets: &'a [Wallet], asset_id: &str) -> Option<&'a Wallet> {
    wallets.iter().find(|wallet| {
        wallet.wallet_type == WalletType::Cat
            && wallet
                .meta
                .asset_id
                .as_deref()
                .is_some_and(|id| same_asset_id(id, asset_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_wallet(id: u32, asset_id: &str, name: Option<&str>) -> Wallet {
        Wallet {
            id,
            name: String::new(),
            wallet_type: WalletType::Cat,
            meta: WalletMeta {
                asset_id: Some(asset_id.to_string()),
                name: name.map(ToString::to_string),
            },
        }
    }

    #[test]
    fn wallet_type_uses_service_codes() {
        let wallet: Wallet = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Spacebucks",
            "type": 6,
            "meta": { "assetId": "aa", "name": "SBX" }
        }))
        .expect("wallet json");
        assert_eq!(wallet.wallet_type, WalletType::Cat);
        assert_eq!(serde_json::to_value(wallet.wallet_type).expect("code"), 6);

        let err = serde_json::from_value::<Wallet>(serde_json::json!({ "id": 1, "type": 1 }))
            .expect_err("code 1 is unassigned");
        assert!(err.to_string().contains("unknown wallet type code 1"));
    }

    #[test]
    fn cat_lookup_ignores_case_prefix_and_other_wallet_types() {
        let wallets = vec![
            Wallet {
                id: 1,
                name: "HDDcoin Wallet".to_string(),
                wallet_type: WalletType::Standard,
                meta: WalletMeta {
                    asset_id: Some("abcd".to_string()),
                    name: None,
                },
            },
            cat_wallet(2, "ABCD", Some("DBX")),
        ];

        let found = find_cat_wallet_by_asset_id(&wallets, "abcd").expect("cat wallet");
        assert_eq!(found.id, 2);
        let prefixed = find_cat_wallet_by_asset_id(&wallets, "0xAbCd").expect("prefixed id");
        assert_eq!(prefixed.id, 2);
        assert!(find_cat_wallet_by_asset_id(&wallets, "ef01").is_none());
        assert_eq!(find_standard_wallet(&wallets).map(|w| w.id), Some(1));
    }

    #[test]
    fn display_name_falls_back() {
        assert_eq!(cat_wallet(2, "aa", Some("DBX")).display_name(), "DBX");
        assert_eq!(cat_wallet(2, "aa", None).display_name(), "Unknown token");
        assert_eq!(cat_wallet(2, "aa", Some("")).display_name(), "Unknown token");
    }
}
