//! Aggregation of coins locked by the user's outstanding offers.
//!
//! Entries are keyed by [`LockKey`]; at most one [`AssetStatus`] exists per key.
//! Native-currency locks absorb the `unknown` bucket, which the wallet service
//! reports for the fee part of an offer.

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::amount::serde_amount;
use crate::nft::{normalize_hex_id, same_asset_id};
use crate::trade::{AssetInfo, TradeRecord};

pub const NATIVE_TICKER: &str = "HDD";

/// Pending-map key for coins the wallet service cannot attribute to an asset.
pub const UNKNOWN_ASSET: &str = "unknown";

/// What the native-currency lock is known to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeLockScope {
    #[serde(rename = "HDD")]
    Currency,
    #[serde(rename = "unknown")]
    Fee,
    #[serde(rename = "HDD+FEE")]
    CurrencyAndFee,
}

impl NativeLockScope {
    fn merge(self, other: Self) -> Self {
        if self == other { self } else { Self::CurrencyAndFee }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "assetId")]
pub enum LockedAsset {
    #[serde(rename = "HDD")]
    Native(NativeLockScope),
    #[serde(rename = "CAT")]
    Cat(String),
    #[serde(rename = "SINGLETON")]
    Singleton(String),
}

/// Identity of a lock entry; the native scope label is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    Native,
    Cat(String),
    Singleton(String),
}

impl LockedAsset {
    #[must_use]
    pub fn key(&self) -> LockKey {
        match self {
            Self::Native(_) => LockKey::Native,
            Self::Cat(asset_id) => LockKey::Cat(normalize_hex_id(asset_id)),
            Self::Singleton(launcher_id) => LockKey::Singleton(normalize_hex_id(launcher_id)),
        }
    }
}

impl LockKey {
    #[must_use]
    pub fn cat(asset_id: &str) -> Self {
        Self::Cat(normalize_hex_id(asset_id))
    }

    #[must_use]
    pub fn singleton(launcher_id: &str) -> Self {
        Self::Singleton(normalize_hex_id(launcher_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockStatus {
    #[default]
    #[serde(rename = "")]
    Unaffected,
    /// The new offer uses the same asset but the spendable balance covers both.
    #[serde(rename = "alsoUsedInNewOfferWithoutConflict")]
    AlsoUsedWithoutConflict,
    /// Only one of the existing offers or the new offer can settle.
    #[serde(rename = "conflictsWithNewOffer")]
    ConflictsWithNewOffer,
}

impl LockStatus {
    #[must_use]
    pub fn from_sufficiency(has_enough_spendable: bool) -> Self {
        if has_enough_spendable {
            Self::AlsoUsedWithoutConflict
        } else {
            Self::ConflictsWithNewOffer
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStatus {
    #[serde(flatten)]
    pub asset: LockedAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft_id: Option<String>,
    #[serde(with = "serde_amount")]
    pub locked_amount: BigDecimal,
    #[serde(with = "serde_amount")]
    pub spending_amount: BigDecimal,
    #[serde(with = "serde_amount")]
    pub spendable_amount: BigDecimal,
    #[serde(with = "serde_amount")]
    pub confirmed_amount: BigDecimal,
    pub status: LockStatus,
    /// Trade ids of the pending offers contributing to this lock.
    pub relevant_offers: Vec<String>,
}

impl AssetStatus {
    fn new(asset: LockedAsset, locked_amount: BigDecimal, trade_id: &str) -> Self {
        let asset_name = matches!(asset, LockedAsset::Native(_)).then(|| NATIVE_TICKER.to_string());
        Self {
            asset,
            asset_name,
            nft_id: None,
            locked_amount,
            spending_amount: BigDecimal::zero(),
            spendable_amount: BigDecimal::zero(),
            confirmed_amount: BigDecimal::zero(),
            status: LockStatus::Unaffected,
            relevant_offers: vec![trade_id.to_string()],
        }
    }

    #[must_use]
    pub fn key(&self) -> LockKey {
        self.asset.key()
    }

    /// Record the new offer's spend against this lock and derive its status.
    pub fn record_spend(
        &mut self,
        spending_amount: BigDecimal,
        spendable_amount: BigDecimal,
        confirmed_amount: BigDecimal,
    ) {
        self.status = LockStatus::from_sufficiency(spendable_amount >= spending_amount);
        self.spending_amount = spending_amount;
        self.spendable_amount = spendable_amount;
        self.confirmed_amount = confirmed_amount;
    }
}

/// Deduplicated lock entries in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLocks {
    entries: Vec<AssetStatus>,
}

impl PendingLocks {
    /// Fold the pending maps of every self-made `PENDING_ACCEPT` trade into lock entries.
    #[must_use]
    pub fn aggregate(offers: &[TradeRecord]) -> Self {
        let mut locks = Self::default();

        for offer in offers.iter().filter(|offer| offer.locks_coins()) {
            for (asset_id, locked_amount) in &offer.pending {
                let Some(asset) = classify_pending_asset(offer, asset_id) else {
                    tracing::warn!(
                        trade_id = %offer.trade_id,
                        asset_id = %asset_id,
                        "pending asset missing from offer summary infos; skipping"
                    );
                    continue;
                };
                locks.add(asset, locked_amount, &offer.trade_id);
            }
        }

        tracing::debug!(entries = locks.entries.len(), "aggregated pending offer locks");
        locks
    }

    fn add(&mut self, asset: LockedAsset, locked_amount: &BigDecimal, trade_id: &str) {
        let key = asset.key();
        let Some(index) = self.entries.iter().position(|entry| entry.key() == key) else {
            self.entries
                .push(AssetStatus::new(asset, locked_amount.clone(), trade_id));
            return;
        };

        let entry = &mut self.entries[index];
        entry.locked_amount += locked_amount;
        entry.relevant_offers.push(trade_id.to_string());
        if let (LockedAsset::Native(current), LockedAsset::Native(incoming)) =
            (&mut entry.asset, asset)
        {
            *current = current.merge(incoming);
        }
    }

    #[must_use]
    pub fn get(&self, key: &LockKey) -> Option<&AssetStatus> {
        self.entries.iter().find(|entry| &entry.key() == key)
    }

    pub fn get_mut(&mut self, key: &LockKey) -> Option<&mut AssetStatus> {
        self.entries.iter_mut().find(|entry| &entry.key() == key)
    }

    #[must_use]
    pub fn native(&self) -> Option<&AssetStatus> {
        self.get(&LockKey::Native)
    }

    /// Locked amount for `key`, zero when nothing is locked.
    #[must_use]
    pub fn locked_amount(&self, key: &LockKey) -> BigDecimal {
        self.get(key)
            .map_or_else(BigDecimal::zero, |entry| entry.locked_amount.clone())
    }

    #[must_use]
    pub fn entries(&self) -> &[AssetStatus] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<AssetStatus> {
        self.entries
    }

    /// Entries the new offer spends from, i.e. the locks it may disturb.
    #[must_use]
    pub fn into_assets_to_unlock(self) -> Vec<AssetStatus> {
        self.entries
            .into_iter()
            .filter(|entry| entry.spending_amount > BigDecimal::zero())
            .collect()
    }
}

fn classify_pending_asset(offer: &TradeRecord, asset_id: &str) -> Option<LockedAsset> {
    if asset_id.eq_ignore_ascii_case(NATIVE_TICKER) {
        return Some(LockedAsset::Native(NativeLockScope::Currency));
    }
    if asset_id.eq_ignore_ascii_case(UNKNOWN_ASSET) {
        return Some(LockedAsset::Native(NativeLockScope::Fee));
    }

    let info = offer
        .summary
        .infos
        .iter()
        .find(|(id, _)| same_asset_id(id, asset_id))
        .map(|(_, info)| info)?;

    Some(match info {
        AssetInfo::Cat { .. } => LockedAsset::Cat(asset_id.to_string()),
        AssetInfo::Singleton { .. } => LockedAsset::Singleton(asset_id.to_string()),
    })
}
