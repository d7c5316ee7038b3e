//! The offer-builder form, as composed by the user.
//!
//! Amounts stay as the strings the user typed; they are only parsed during
//! reconciliation so that blank and zero lines can be reported precisely.

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::OfferError;
use crate::amount::hddcoin_to_byte;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLine {
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLine {
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftLine {
    pub nft_id: String,
}

/// One side of the form. Only the first fee line is considered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferBuilderColumn {
    #[serde(default)]
    pub hdd: Vec<AmountLine>,
    #[serde(default)]
    pub tokens: Vec<TokenLine>,
    #[serde(default)]
    pub nfts: Vec<NftLine>,
    #[serde(default)]
    pub fee: Vec<AmountLine>,
}

impl OfferBuilderColumn {
    #[must_use]
    pub fn has_assets(&self) -> bool {
        !self.hdd.is_empty() || !self.tokens.is_empty() || !self.nfts.is_empty()
    }

    /// First fee line converted to bytes; zero when absent or blank.
    pub fn fee_in_bytes(&self) -> Result<BigDecimal, OfferError> {
        match self.fee.first() {
            Some(line) if !line.amount.trim().is_empty() => hddcoin_to_byte(&line.amount),
            _ => Ok(BigDecimal::zero()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferBuilderData {
    #[serde(default)]
    pub offered: OfferBuilderColumn,
    #[serde(default)]
    pub requested: OfferBuilderColumn,
}

impl OfferBuilderData {
    pub fn from_json(json: &str) -> Result<Self, OfferError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn has_offered_assets(&self) -> bool {
        self.offered.has_assets()
    }

    /// Fee paid by the maker of the new offer, in bytes.
    pub fn fee_in_bytes(&self) -> Result<BigDecimal, OfferError> {
        self.offered.fee_in_bytes()
    }
}
