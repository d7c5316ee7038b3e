#![warn(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod settings;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use offer_builder::{
    OfferBuilderData, OfferError, OfferSummary, PendingLocks, SnapshotWallet,
    launcher_id_to_nft_id, nft_id_to_launcher_id, offer_builder_data_to_offer,
    offer_to_offer_builder_data,
};
use serde::Serialize;

use crate::cli::{
    Cli, Command, FromSummaryArgs, LauncherIdArgs, NftIdArgs, PendingArgs, ReconcileArgs,
};
use crate::settings::Settings;

pub async fn run(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Command::Reconcile(args) => run_reconcile(&args, settings).await,
        Command::FromSummary(args) => run_from_summary(&args, settings),
        Command::Pending(args) => run_pending(&args),
        Command::NftId(args) => run_nft_id(&args),
        Command::LauncherId(args) => run_launcher_id(&args),
    }
}

/// Validation failures are reported as `error[<code>]: <message>`.
fn offer_failure(err: OfferError) -> anyhow::Error {
    anyhow!("error[{}]: {err}", err.code())
}

fn read_json_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn load_snapshot(path: &Path) -> Result<SnapshotWallet> {
    SnapshotWallet::from_json(&read_json_file(path)?)
        .with_context(|| format!("invalid wallet snapshot '{}'", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn run_reconcile(args: &ReconcileArgs, settings: &Settings) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let data = OfferBuilderData::from_json(&read_json_file(&args.offer)?)
        .with_context(|| format!("invalid offer form '{}'", args.offer.display()))?;
    let options = settings.reconcile_options(args);

    let plan = offer_builder_data_to_offer(
        &data,
        &snapshot.wallets,
        &snapshot.offers,
        &snapshot,
        options,
    )
    .await
    .map_err(offer_failure)?;

    print_json(&plan)
}

fn run_from_summary(args: &FromSummaryArgs, settings: &Settings) -> Result<()> {
    let summary: OfferSummary = serde_json::from_str(&read_json_file(&args.summary)?)
        .with_context(|| format!("invalid offer summary '{}'", args.summary.display()))?;
    let default_fee = settings.default_fee_bytes(args.default_fee_bytes.as_deref())?;
    let set_default_offered_fee = args.set_default_offered_fee || settings.set_default_offered_fee;

    let data = offer_to_offer_builder_data(&summary, set_default_offered_fee, default_fee.as_ref())
        .map_err(offer_failure)?;

    print_json(&data)
}

fn run_pending(args: &PendingArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let locks = PendingLocks::aggregate(&snapshot.offers);

    print_json(&locks.into_entries())
}

fn run_nft_id(args: &NftIdArgs) -> Result<()> {
    let nft_id = launcher_id_to_nft_id(&args.launcher_id).map_err(offer_failure)?;
    println!("{nft_id}");
    Ok(())
}

fn run_launcher_id(args: &LauncherIdArgs) -> Result<()> {
    let launcher_id = nft_id_to_launcher_id(&args.nft_id).map_err(offer_failure)?;
    println!("{launcher_id}");
    Ok(())
}
