#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![cfg_attr(test, allow(clippy::too_many_lines))]

pub mod amount;
pub mod builder;
pub mod driver;
pub mod error;
pub mod nft;
pub mod pending;
pub mod reconcile;
pub mod service;
pub mod summary;
pub mod trade;
pub mod wallet;

pub use builder::{AmountLine, NftLine, OfferBuilderColumn, OfferBuilderData, TokenLine};
pub use driver::Driver;
pub use error::OfferError;
pub use nft::{NftInfo, PreparedNftOffer, launcher_id_to_nft_id, nft_id_to_launcher_id};
pub use pending::{AssetStatus, LockStatus, LockedAsset, PendingLocks};
pub use reconcile::{OfferPlan, ReconcileOptions, offer_builder_data_to_offer};
pub use service::{NftOfferPreparer, SnapshotWallet, WalletService};
pub use summary::offer_to_offer_builder_data;
pub use trade::{AssetInfo, OfferSummary, TradeRecord, TradeStatus};
pub use wallet::{Wallet, WalletBalance, WalletType};
