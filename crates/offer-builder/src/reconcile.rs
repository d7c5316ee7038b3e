//! Reconciliation of an offer-builder form against wallet balances and the
//! user's outstanding offers.
//!
//! Pending locks are aggregated once, up front. Offered lines are then checked
//! concurrently; each check only reads the locks and reports a [`LineOutcome`],
//! and all outcomes are merged into the plan after every check has passed.
//! Requested lines are validated afterwards, in form order, because royalty
//! adjustments compound on the native spend left by earlier NFTs.

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, try_join_all};
use serde::{Deserialize, Serialize};

use crate::OfferError;
use crate::amount::{cat_to_byte, hddcoin_to_byte, serde_amount};
use crate::builder::{AmountLine, NftLine, OfferBuilderData, TokenLine};
use crate::driver::Driver;
use crate::nft::normalize_hex_id;
use crate::pending::{AssetStatus, LockKey, LockStatus, PendingLocks};
use crate::service::{NftOfferPreparer, WalletService};
use crate::trade::TradeRecord;
use crate::wallet::{Wallet, WalletBalance, find_cat_wallet_by_asset_id, find_standard_wallet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    /// Carried through to the plan unchanged.
    pub validate_only: bool,
    pub consider_nft_royalty: bool,
    pub allow_empty_offer_column: bool,
    #[serde(rename = "allowUnknownRequestedCATs")]
    pub allow_unknown_requested_cats: bool,
}

/// Arguments for the wallet service's offer-creation call, plus the pending
/// locks the new offer disturbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPlan {
    /// Signed smallest-unit amounts: negative is given away, positive is received.
    #[serde(with = "serde_amount::map")]
    pub wallet_ids_and_amounts: BTreeMap<String, BigDecimal>,
    pub driver_dict: BTreeMap<String, Driver>,
    #[serde(with = "serde_amount")]
    pub fee_in_bytes: BigDecimal,
    pub validate_only: bool,
    pub assets_to_unlock: Vec<AssetStatus>,
}

/// Result slot of one offered line.
#[derive(Debug)]
struct LineOutcome {
    wallet_id: String,
    amount: BigDecimal,
    driver: Option<Driver>,
    lock: Option<LockUpdate>,
}

#[derive(Debug)]
struct LockUpdate {
    key: LockKey,
    change: LockChange,
}

#[derive(Debug)]
enum LockChange {
    Spend {
        spending: BigDecimal,
        spendable: BigDecimal,
        confirmed: BigDecimal,
        asset_name: Option<String>,
    },
    OfferedNft {
        nft_id: String,
    },
}

impl LockUpdate {
    fn apply(self, locks: &mut PendingLocks) {
        let Some(entry) = locks.get_mut(&self.key) else {
            return;
        };

        match self.change {
            LockChange::Spend {
                spending,
                spendable,
                confirmed,
                asset_name,
            } => {
                entry.record_spend(spending, spendable, confirmed);
                if asset_name.is_some() {
                    entry.asset_name = asset_name;
                }
            }
            // Offering an NFT does not lock it, so it never conflicts.
            LockChange::OfferedNft { nft_id } => {
                entry.spending_amount = BigDecimal::from(1);
                entry.asset_name = Some(format!("NFT {nft_id}"));
                entry.nft_id = Some(nft_id);
                entry.status = LockStatus::AlsoUsedWithoutConflict;
            }
        }
        tracing::debug!(key = ?self.key, status = ?entry.status, "pending lock updated");
    }
}

/// Standard wallet state shared by the native and fee checks.
struct NativeContext<'a> {
    wallet: Option<&'a Wallet>,
    balance: Option<WalletBalance>,
    locked: BigDecimal,
}

impl NativeContext<'_> {
    fn require(&self) -> Result<(&Wallet, &WalletBalance), OfferError> {
        match (self.wallet, &self.balance) {
            (Some(wallet), Some(balance)) => Ok((wallet, balance)),
            _ => Err(OfferError::NoStandardWallet),
        }
    }
}

/// Spend needed once a requested NFT's royalty is paid on top of the principal.
#[must_use]
pub fn royalty_adjusted_spend(
    spending: &BigDecimal,
    fee: &BigDecimal,
    royalty_basis_points: &BigDecimal,
) -> BigDecimal {
    let basis_point = BigDecimal::new(BigInt::from(1), 4);
    let multiplier = BigDecimal::from(1) + royalty_basis_points * &basis_point;
    (spending - fee) * multiplier + fee
}

/// Parse a line amount that must be present and nonzero.
fn nonzero_bytes(
    amount: &str,
    to_bytes: fn(&str) -> Result<BigDecimal, OfferError>,
    missing: impl FnOnce() -> OfferError,
) -> Result<BigDecimal, OfferError> {
    if amount.trim().is_empty() {
        return Err(missing());
    }
    let bytes = to_bytes(amount)?;
    if bytes.is_zero() {
        return Err(missing());
    }
    Ok(bytes)
}

fn nft_key(nft_id: &str) -> String {
    nft_id.trim().to_ascii_lowercase()
}

fn offered_native(
    line: &AmountLine,
    native: &NativeContext<'_>,
    locks: &PendingLocks,
    fee: &BigDecimal,
) -> Result<LineOutcome, OfferError> {
    let bytes = nonzero_bytes(&line.amount, hddcoin_to_byte, || {
        OfferError::MissingNativeAmount
    })?;
    let (wallet, balance) = native.require()?;

    let spendable = &balance.spendable_balance;
    if spendable + &native.locked - fee < bytes {
        return Err(OfferError::NativeBalanceExceeded);
    }

    let lock = locks.native().map(|_| LockUpdate {
        key: LockKey::Native,
        change: LockChange::Spend {
            spending: &bytes + fee,
            spendable: spendable.clone(),
            confirmed: balance.confirmed_wallet_balance.clone(),
            asset_name: None,
        },
    });

    tracing::debug!(wallet_id = wallet.id, amount = %bytes, "offered native line checked");
    Ok(LineOutcome {
        wallet_id: wallet.id.to_string(),
        amount: -bytes,
        driver: None,
        lock,
    })
}

async fn offered_token<S: WalletService>(
    line: &TokenLine,
    wallets: &[Wallet],
    locks: &PendingLocks,
    service: &S,
) -> Result<LineOutcome, OfferError> {
    if line.asset_id.trim().is_empty() {
        return Err(OfferError::MissingAsset);
    }
    let wallet = find_cat_wallet_by_asset_id(wallets, &line.asset_id)
        .ok_or_else(|| OfferError::NoCatWallet(line.asset_id.clone()))?;
    let name = wallet.display_name().to_string();

    let bytes = nonzero_bytes(&line.amount, cat_to_byte, || {
        OfferError::MissingTokenAmount(name.clone())
    })?;

    let key = LockKey::cat(&line.asset_id);
    let locked = locks.locked_amount(&key);
    let balance = service.get_wallet_balance(wallet.id).await?;

    if &balance.spendable_balance + &locked < bytes {
        return Err(OfferError::TokenBalanceExceeded(name));
    }

    let lock = locks.get(&key).map(|_| LockUpdate {
        key,
        change: LockChange::Spend {
            spending: bytes.clone(),
            spendable: balance.spendable_balance.clone(),
            confirmed: balance.confirmed_wallet_balance.clone(),
            asset_name: Some(name.clone()),
        },
    });

    tracing::debug!(wallet_id = wallet.id, token = %name, amount = %bytes, "offered token line checked");
    Ok(LineOutcome {
        wallet_id: wallet.id.to_string(),
        amount: -bytes,
        driver: None,
        lock,
    })
}

async fn offered_nft<S: NftOfferPreparer>(
    line: &NftLine,
    locks: &PendingLocks,
    service: &S,
) -> Result<LineOutcome, OfferError> {
    let prepared = service.prepare_nft_offer(&line.nft_id, true).await?;

    let key = LockKey::singleton(&prepared.id);
    let lock = locks.get(&key).map(|_| LockUpdate {
        key,
        change: LockChange::OfferedNft {
            nft_id: line.nft_id.clone(),
        },
    });

    tracing::debug!(nft_id = %line.nft_id, launcher_id = %prepared.id, "offered nft line prepared");
    Ok(LineOutcome {
        wallet_id: prepared.id,
        amount: prepared.amount,
        driver: prepared.driver,
        lock,
    })
}

/// Reject repeated offered assets before any balance is read.
fn check_offered_duplicates(
    data: &OfferBuilderData,
    used_nfts: &mut BTreeSet<String>,
) -> Result<(), OfferError> {
    if data.offered.hdd.len() > 1 {
        return Err(OfferError::DuplicateToken(crate::pending::NATIVE_TICKER.to_string()));
    }

    let mut seen_tokens = BTreeSet::new();
    for token in &data.offered.tokens {
        if token.asset_id.trim().is_empty() {
            continue;
        }
        if !seen_tokens.insert(normalize_hex_id(&token.asset_id)) {
            return Err(OfferError::DuplicateToken(token.asset_id.clone()));
        }
    }

    for line in &data.offered.nfts {
        if !used_nfts.insert(nft_key(&line.nft_id)) {
            return Err(OfferError::NftAlreadyUsed(line.nft_id.clone()));
        }
    }
    Ok(())
}

fn add_requested_native(
    lines: &[AmountLine],
    wallets: &[Wallet],
    amounts: &mut BTreeMap<String, BigDecimal>,
) -> Result<(), OfferError> {
    let mut requested = false;
    for line in lines {
        if line.amount.trim().is_empty() {
            return Err(OfferError::MissingNativeAmount);
        }
        let bytes = hddcoin_to_byte(&line.amount)?;
        // One-sided offers request nothing.
        if bytes.is_zero() {
            tracing::debug!("requested native line is zero; skipping");
            continue;
        }
        if requested {
            return Err(OfferError::DuplicateToken(crate::pending::NATIVE_TICKER.to_string()));
        }
        requested = true;

        let wallet = find_standard_wallet(wallets).ok_or(OfferError::NoStandardWallet)?;
        let wallet_id = wallet.id.to_string();
        if amounts.contains_key(&wallet_id) {
            return Err(OfferError::OfferedAndRequested);
        }
        amounts.insert(wallet_id, bytes);
    }
    Ok(())
}

fn add_requested_tokens(
    data: &OfferBuilderData,
    wallets: &[Wallet],
    allow_unknown: bool,
    amounts: &mut BTreeMap<String, BigDecimal>,
    drivers: &mut BTreeMap<String, Driver>,
) -> Result<(), OfferError> {
    let offered: BTreeSet<String> = data
        .offered
        .tokens
        .iter()
        .map(|token| normalize_hex_id(&token.asset_id))
        .collect();
    let mut requested = BTreeSet::new();

    for line in &data.requested.tokens {
        if line.asset_id.trim().is_empty() {
            return Err(OfferError::MissingAsset);
        }
        let asset_id = normalize_hex_id(&line.asset_id);
        if !requested.insert(asset_id.clone()) {
            return Err(OfferError::DuplicateToken(line.asset_id.clone()));
        }
        if offered.contains(&asset_id) {
            return Err(OfferError::OfferedAndRequested);
        }

        match find_cat_wallet_by_asset_id(wallets, &line.asset_id) {
            Some(wallet) => {
                let bytes = nonzero_bytes(&line.amount, cat_to_byte, || {
                    OfferError::MissingTokenAmount(wallet.display_name().to_string())
                })?;
                let wallet_id = wallet.id.to_string();
                if amounts.contains_key(&wallet_id) {
                    return Err(OfferError::OfferedAndRequested);
                }
                amounts.insert(wallet_id, bytes);
            }
            None if allow_unknown => {
                let bytes = nonzero_bytes(&line.amount, cat_to_byte, || {
                    OfferError::MissingTokenAmount(line.asset_id.clone())
                })?;
                tracing::debug!(asset_id = %asset_id, "requesting CAT without a wallet");
                drivers.insert(asset_id.clone(), Driver::cat(&asset_id));
                amounts.insert(asset_id, bytes);
            }
            None => return Err(OfferError::NoCatWallet(line.asset_id.clone())),
        }
    }
    Ok(())
}

/// Validate `data` against the wallet state and build the offer plan.
///
/// Fails on the first violated precondition; no partial plan is returned.
#[tracing::instrument(level = "debug", skip_all, err)]
pub async fn offer_builder_data_to_offer<S>(
    data: &OfferBuilderData,
    wallets: &[Wallet],
    offers: &[TradeRecord],
    service: &S,
    options: ReconcileOptions,
) -> Result<OfferPlan, OfferError>
where
    S: WalletService + NftOfferPreparer,
{
    let fee = data.fee_in_bytes()?;

    if !options.allow_empty_offer_column && !data.has_offered_assets() {
        return Err(OfferError::NoOfferedAsset);
    }

    let mut locks = PendingLocks::aggregate(offers);
    let mut used_nfts = BTreeSet::new();
    check_offered_duplicates(data, &mut used_nfts)?;

    let pays_native = !data.offered.hdd.is_empty() || fee > BigDecimal::zero();
    let native = if pays_native {
        let wallet = find_standard_wallet(wallets);
        let balance = match wallet {
            Some(wallet) => Some(service.get_wallet_balance(wallet.id).await?),
            None => None,
        };
        NativeContext {
            wallet,
            balance,
            locked: locks.locked_amount(&LockKey::Native),
        }
    } else {
        NativeContext {
            wallet: None,
            balance: None,
            locked: BigDecimal::zero(),
        }
    };

    let mut fee_lock = None;
    if data.offered.hdd.is_empty() && fee > BigDecimal::zero() {
        let (_, balance) = native.require()?;
        if &balance.spendable_balance + &native.locked < fee {
            return Err(OfferError::FeeBalanceExceeded);
        }
        fee_lock = locks.native().map(|_| LockUpdate {
            key: LockKey::Native,
            change: LockChange::Spend {
                spending: fee.clone(),
                spendable: balance.spendable_balance.clone(),
                confirmed: balance.confirmed_wallet_balance.clone(),
                asset_name: None,
            },
        });
    }

    let outcomes = {
        let locks = &locks;
        let mut tasks: Vec<LocalBoxFuture<'_, Result<LineOutcome, OfferError>>> = Vec::new();
        for line in &data.offered.hdd {
            let (native, fee) = (&native, &fee);
            tasks.push(async move { offered_native(line, native, locks, fee) }.boxed_local());
        }
        for line in &data.offered.tokens {
            tasks.push(offered_token(line, wallets, locks, service).boxed_local());
        }
        for line in &data.offered.nfts {
            tasks.push(offered_nft(line, locks, service).boxed_local());
        }
        try_join_all(tasks).await?
    };

    let mut wallet_ids_and_amounts = BTreeMap::new();
    let mut driver_dict = BTreeMap::new();
    if let Some(update) = fee_lock {
        update.apply(&mut locks);
    }
    for outcome in outcomes {
        if let Some(driver) = outcome.driver {
            driver_dict.insert(outcome.wallet_id.clone(), driver);
        }
        if let Some(update) = outcome.lock {
            update.apply(&mut locks);
        }
        wallet_ids_and_amounts.insert(outcome.wallet_id, outcome.amount);
    }

    add_requested_native(&data.requested.hdd, wallets, &mut wallet_ids_and_amounts)?;
    add_requested_tokens(
        data,
        wallets,
        options.allow_unknown_requested_cats,
        &mut wallet_ids_and_amounts,
        &mut driver_dict,
    )?;

    for line in &data.requested.nfts {
        if !used_nfts.insert(nft_key(&line.nft_id)) {
            return Err(OfferError::NftAlreadyUsed(line.nft_id.clone()));
        }

        let prepared = service.prepare_nft_offer(&line.nft_id, false).await?;
        wallet_ids_and_amounts.insert(prepared.id.clone(), prepared.amount);
        let Some(driver) = prepared.driver else {
            continue;
        };

        if options.consider_nft_royalty
            && let Some(royalty) = driver.royalty_percentage()?
            && let Some(lock) = locks.get_mut(&LockKey::Native)
            && !lock.spending_amount.is_zero()
        {
            lock.spending_amount = royalty_adjusted_spend(&lock.spending_amount, &fee, &royalty);
            lock.status =
                LockStatus::from_sufficiency(lock.spendable_amount >= lock.spending_amount);
            tracing::debug!(
                nft_id = %line.nft_id,
                royalty = %royalty,
                spending = %lock.spending_amount,
                "native spend adjusted for royalty"
            );
        }
        driver_dict.insert(prepared.id, driver);
    }

    let assets_to_unlock = locks.into_assets_to_unlock();
    tracing::info!(
        wallets = wallet_ids_and_amounts.len(),
        drivers = driver_dict.len(),
        assets_to_unlock = assets_to_unlock.len(),
        "offer plan ready"
    );

    Ok(OfferPlan {
        wallet_ids_and_amounts,
        driver_dict,
        fee_in_bytes: fee,
        validate_only: options.validate_only,
        assets_to_unlock,
    })
}
