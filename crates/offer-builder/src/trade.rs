//! Trade records and offer summaries as reported by the wallet service.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::amount::serde_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    PendingAccept,
    PendingConfirm,
    PendingCancel,
    Cancelled,
    Confirmed,
    Failed,
}

/// Per-asset metadata attached to an offer summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetInfo {
    #[serde(rename = "CAT", alias = "cat")]
    Cat {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tail: Option<String>,
    },
    #[serde(rename = "singleton", alias = "SINGLETON")]
    Singleton {
        #[serde(rename = "launcher_id", alias = "launcherId")]
        launcher_id: String,
        #[serde(
            rename = "launcher_ph",
            alias = "launcherPh",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        launcher_ph: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfferSummary {
    #[serde(default, with = "serde_amount::map")]
    pub offered: BTreeMap<String, BigDecimal>,
    #[serde(default, with = "serde_amount::map")]
    pub requested: BTreeMap<String, BigDecimal>,
    #[serde(default = "zero", with = "serde_amount")]
    pub fees: BigDecimal,
    #[serde(default)]
    pub infos: BTreeMap<String, AssetInfo>,
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// One of the user's trades; only self-made trades in `PENDING_ACCEPT` lock coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub trade_id: String,
    pub is_my_offer: bool,
    pub status: TradeStatus,
    #[serde(default, with = "serde_amount::map")]
    pub pending: BTreeMap<String, BigDecimal>,
    #[serde(default)]
    pub summary: OfferSummary,
}

impl TradeRecord {
    #[must_use]
    pub fn locks_coins(&self) -> bool {
        self.is_my_offer && self.status == TradeStatus::PendingAccept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_record_parses_service_json() {
        let record: TradeRecord = serde_json::from_value(serde_json::json!({
            "tradeId": "0xfeed",
            "isMyOffer": true,
            "status": "PENDING_ACCEPT",
            "pending": { "hdd": 1_000_000, "unknown": "25" },
            "summary": {
                "offered": { "hdd": 1_000_000 },
                "requested": { "aa": 3000 },
                "fees": 25,
                "infos": {
                    "aa": { "type": "CAT", "tail": "0xaa" },
                    "bb": { "type": "singleton", "launcher_id": "0xbb", "launcher_ph": "0xcc" }
                }
            }
        }))
        .expect("trade json");

        assert!(record.locks_coins());
        assert_eq!(record.pending["unknown"], BigDecimal::from(25));
        assert_eq!(record.summary.fees, BigDecimal::from(25));
        assert!(matches!(
            record.summary.infos["bb"],
            AssetInfo::Singleton { ref launcher_id, .. } if launcher_id == "0xbb"
        ));
    }

    #[test]
    fn settled_or_foreign_trades_do_not_lock() {
        let mut record = TradeRecord {
            trade_id: "t".to_string(),
            is_my_offer: false,
            status: TradeStatus::PendingAccept,
            pending: BTreeMap::new(),
            summary: OfferSummary::default(),
        };
        assert!(!record.locks_coins());

        record.is_my_offer = true;
        record.status = TradeStatus::Confirmed;
        assert!(!record.locks_coins());
    }
}
