//! Collaborators the reconciler calls into.
//!
//! The wallet service owns balances and NFT state; reconciliation only reads
//! them. [`SnapshotWallet`] answers both traits from a JSON snapshot.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::OfferError;
use crate::nft::{NftInfo, PreparedNftOffer, nft_id_to_launcher_id, normalize_hex_id, prepare_nft_offer};
use crate::trade::TradeRecord;
use crate::wallet::{Wallet, WalletBalance};

pub trait WalletService {
    fn get_wallet_balance(
        &self,
        wallet_id: u32,
    ) -> impl Future<Output = Result<WalletBalance, OfferError>>;
}

pub trait NftOfferPreparer {
    /// Resolve `nft_id` into its offer entry; `offering` is false for requested NFTs.
    fn prepare_nft_offer(
        &self,
        nft_id: &str,
        offering: bool,
    ) -> impl Future<Output = Result<PreparedNftOffer, OfferError>>;
}

/// Point-in-time copy of everything reconciliation reads from the wallet service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWallet {
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub balances: Vec<WalletBalance>,
    #[serde(default)]
    pub offers: Vec<TradeRecord>,
    #[serde(default)]
    pub nfts: Vec<NftInfo>,
}

impl SnapshotWallet {
    pub fn from_json(json: &str) -> Result<Self, OfferError> {
        Ok(serde_json::from_str(json)?)
    }

    fn find_nft(&self, launcher_id: &str) -> Option<&NftInfo> {
        self.nfts
            .iter()
            .find(|nft| normalize_hex_id(&nft.launcher_id) == launcher_id)
    }

    /// Balances keyed by wallet id; later entries win.
    #[must_use]
    pub fn balances_by_wallet(&self) -> BTreeMap<u32, &WalletBalance> {
        self.balances
            .iter()
            .map(|balance| (balance.wallet_id, balance))
            .collect()
    }
}

impl WalletService for SnapshotWallet {
    async fn get_wallet_balance(&self, wallet_id: u32) -> Result<WalletBalance, OfferError> {
        self.balances_by_wallet()
            .get(&wallet_id)
            .map(|balance| (*balance).clone())
            .ok_or(OfferError::BalanceUnavailable(wallet_id))
    }
}

impl NftOfferPreparer for SnapshotWallet {
    async fn prepare_nft_offer(
        &self,
        nft_id: &str,
        offering: bool,
    ) -> Result<PreparedNftOffer, OfferError> {
        let launcher_id = nft_id_to_launcher_id(nft_id)?;
        let info = self
            .find_nft(&launcher_id)
            .ok_or_else(|| OfferError::NftNotFound(nft_id.to_string()))?;

        Ok(prepare_nft_offer(info, offering))
    }
}
