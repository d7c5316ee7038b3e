//! Conversion of a wallet-service offer summary into an offer-builder form.
//!
//! The form is laid out from the taker's side: what the maker requests is what
//! the taker offers, and the other way round.

use std::collections::BTreeMap;

use bigdecimal::BigDecimal;

use crate::OfferError;
use crate::amount::{byte_to_cat, byte_to_hddcoin, format_amount};
use crate::builder::{AmountLine, NftLine, OfferBuilderColumn, OfferBuilderData, TokenLine};
use crate::nft::{launcher_id_to_nft_id, same_asset_id};
use crate::trade::{AssetInfo, OfferSummary};

const NATIVE_ASSET_ID: &str = "hdd";

fn find_info<'a>(infos: &'a BTreeMap<String, AssetInfo>, asset_id: &str) -> Option<&'a AssetInfo> {
    infos.get(asset_id).or_else(|| {
        infos
            .iter()
            .find(|(id, _)| same_asset_id(id, asset_id))
            .map(|(_, info)| info)
    })
}

fn fill_column(
    column: &mut OfferBuilderColumn,
    amounts: &BTreeMap<String, BigDecimal>,
    infos: &BTreeMap<String, AssetInfo>,
) -> Result<(), OfferError> {
    for (asset_id, amount) in amounts {
        match find_info(infos, asset_id) {
            Some(AssetInfo::Cat { .. }) => column.tokens.push(TokenLine {
                asset_id: asset_id.clone(),
                amount: format_amount(&byte_to_cat(amount)),
            }),
            Some(AssetInfo::Singleton { launcher_id, .. }) => column.nfts.push(NftLine {
                nft_id: launcher_id_to_nft_id(launcher_id)?,
            }),
            None if asset_id.eq_ignore_ascii_case(NATIVE_ASSET_ID) => column.hdd.push(AmountLine {
                amount: format_amount(&byte_to_hddcoin(amount)),
            }),
            None => {
                tracing::warn!(asset_id = %asset_id, "offer summary asset has no info; skipping");
            }
        }
    }
    Ok(())
}

/// Build the taker's form for `summary`.
///
/// `default_fee_bytes` fills the offered fee when `set_default_offered_fee` is
/// set; the maker's fee lands in the requested column.
pub fn offer_to_offer_builder_data(
    summary: &OfferSummary,
    set_default_offered_fee: bool,
    default_fee_bytes: Option<&BigDecimal>,
) -> Result<OfferBuilderData, OfferError> {
    let mut data = OfferBuilderData::default();

    fill_column(&mut data.offered, &summary.requested, &summary.infos)?;
    fill_column(&mut data.requested, &summary.offered, &summary.infos)?;

    if set_default_offered_fee {
        let amount = default_fee_bytes
            .map(|fee| format_amount(&byte_to_hddcoin(fee)))
            .unwrap_or_default();
        data.offered.fee.push(AmountLine { amount });
    }
    data.requested.fee.push(AmountLine {
        amount: format_amount(&byte_to_hddcoin(&summary.fees)),
    });

    tracing::debug!(
        offered_lines = data.offered.hdd.len() + data.offered.tokens.len() + data.offered.nfts.len(),
        requested_lines =
            data.requested.hdd.len() + data.requested.tokens.len() + data.requested.nfts.len(),
        "offer summary converted"
    );
    Ok(data)
}
