//! Puzzle driver entries passed through to the wallet service's offer API.
//!
//! Layers serialize with a `type` tag exactly as the service expects:
//! `singleton` wraps `metadata`, which wraps `ownership`, which carries the
//! `royalty transfer program`. Only the royalty percentage is interpreted here.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::OfferError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Driver {
    #[serde(rename = "singleton")]
    Singleton {
        launcher_id: String,
        launcher_ph: String,
        also: MetadataLayer,
    },
    /// Requested CAT the wallet does not track yet.
    #[serde(rename = "CAT")]
    Cat { tail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "metadata")]
pub struct MetadataLayer {
    pub metadata: String,
    pub updater_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub also: Option<OwnershipLayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "ownership")]
pub struct OwnershipLayer {
    pub owner: String,
    pub transfer_program: RoyaltyTransferProgram,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "royalty transfer program")]
pub struct RoyaltyTransferProgram {
    pub launcher_id: String,
    pub royalty_address: String,
    /// Basis points, as a decimal string.
    pub royalty_percentage: String,
}

impl Driver {
    #[must_use]
    pub fn cat(asset_id: &str) -> Self {
        Self::Cat {
            tail: format!("0x{}", crate::nft::normalize_hex_id(asset_id)),
        }
    }

    #[must_use]
    pub fn ownership(&self) -> Option<&OwnershipLayer> {
        match self {
            Self::Singleton { also, .. } => also.also.as_ref(),
            Self::Cat { .. } => None,
        }
    }

    /// Royalty in basis points, when the driver carries an ownership layer.
    pub fn royalty_percentage(&self) -> Result<Option<BigDecimal>, OfferError> {
        let Some(ownership) = self.ownership() else {
            return Ok(None);
        };

        let raw = ownership.transfer_program.royalty_percentage.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        BigDecimal::from_str(raw)
            .map(Some)
            .map_err(|e| OfferError::invalid_amount(raw, format!("invalid royalty percentage: {e}")))
    }
}
