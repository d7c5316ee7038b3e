use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "hdd-offer",
    version,
    about = "Check HDDcoin offers against a wallet snapshot before creating them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile an offer-builder form and print the offer plan as JSON.
    Reconcile(ReconcileArgs),

    /// Turn an offer summary into the taker's offer-builder form.
    FromSummary(FromSummaryArgs),

    /// Print the coins locked by the snapshot's pending offers.
    Pending(PendingArgs),

    /// Encode a launcher id as a bech32m NFT id.
    NftId(NftIdArgs),

    /// Decode a bech32m NFT id into its launcher id.
    LauncherId(LauncherIdArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReconcileArgs {
    /// Wallet snapshot JSON: wallets, balances, offers and NFTs.
    #[arg(long = "snapshot", env = "HDD_OFFER_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Offer-builder form JSON.
    #[arg(long = "offer")]
    pub offer: PathBuf,

    /// Mark the plan as a dry run.
    #[arg(long = "validate-only", default_value_t = false)]
    pub validate_only: bool,

    /// Add requested NFT royalties to the native spend.
    #[arg(long = "consider-nft-royalty", default_value_t = false)]
    pub consider_nft_royalty: bool,

    /// Accept forms that offer nothing.
    #[arg(long = "allow-empty-offer-column", default_value_t = false)]
    pub allow_empty_offer_column: bool,

    /// Accept requested CATs that have no wallet yet.
    #[arg(long = "allow-unknown-requested-cats", default_value_t = false)]
    pub allow_unknown_requested_cats: bool,
}

#[derive(Debug, Clone, Args)]
pub struct FromSummaryArgs {
    /// Offer summary JSON as reported by the wallet service.
    #[arg(long = "summary")]
    pub summary: PathBuf,

    /// Pre-fill the offered fee with the default fee.
    #[arg(long = "set-default-offered-fee", default_value_t = false)]
    pub set_default_offered_fee: bool,

    /// Default fee in bytes.
    #[arg(long = "default-fee-bytes")]
    pub default_fee_bytes: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct PendingArgs {
    /// Wallet snapshot JSON.
    #[arg(long = "snapshot", env = "HDD_OFFER_SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct NftIdArgs {
    /// Hex launcher id, with or without `0x`.
    pub launcher_id: String,
}

#[derive(Debug, Clone, Args)]
pub struct LauncherIdArgs {
    /// Bech32m NFT id (`nft1...`).
    pub nft_id: String,
}
