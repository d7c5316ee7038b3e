use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use config::{Case, Config};
use offer_builder::ReconcileOptions;
use offer_builder::amount::parse_amount;
use serde::Deserialize;

use crate::cli::ReconcileArgs;

/// Defaults read from `HDD_OFFER__*` variables, optionally via `.env`.
/// Command-line flags can only switch options on.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validate_only: bool,
    pub consider_nft_royalty: bool,
    pub allow_empty_offer_column: bool,
    pub allow_unknown_requested_cats: bool,
    pub set_default_offered_fee: bool,
    pub default_fee_bytes: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(%err, "no .env file loaded");
        }

        let cfg = Config::builder()
            .add_source(
                config::Environment::with_prefix("HDD_OFFER")
                    .prefix_separator("__")
                    .separator("__")
                    .convert_case(Case::Snake),
            )
            .build()?;

        cfg.try_deserialize()
            .context("invalid HDD_OFFER__* settings")
    }

    #[must_use]
    pub fn reconcile_options(&self, args: &ReconcileArgs) -> ReconcileOptions {
        ReconcileOptions {
            validate_only: args.validate_only || self.validate_only,
            consider_nft_royalty: args.consider_nft_royalty || self.consider_nft_royalty,
            allow_empty_offer_column: args.allow_empty_offer_column
                || self.allow_empty_offer_column,
            allow_unknown_requested_cats: args.allow_unknown_requested_cats
                || self.allow_unknown_requested_cats,
        }
    }

    /// `explicit` wins over the configured default fee.
    pub fn default_fee_bytes(&self, explicit: Option<&str>) -> Result<Option<BigDecimal>> {
        explicit
            .or(self.default_fee_bytes.as_deref())
            .map(|raw| {
                parse_amount(raw).with_context(|| format!("invalid default fee '{raw}'"))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(consider_nft_royalty: bool) -> ReconcileArgs {
        ReconcileArgs {
            snapshot: PathBuf::from("snapshot.json"),
            offer: PathBuf::from("offer.json"),
            validate_only: false,
            consider_nft_royalty,
            allow_empty_offer_column: false,
            allow_unknown_requested_cats: false,
        }
    }

    #[test]
    fn flags_and_settings_combine() {
        let settings = Settings {
            allow_empty_offer_column: true,
            ..Settings::default()
        };

        let options = settings.reconcile_options(&args(true));
        assert!(options.consider_nft_royalty);
        assert!(options.allow_empty_offer_column);
        assert!(!options.validate_only);
    }

    #[test]
    fn explicit_fee_overrides_configured_default() {
        let settings = Settings {
            default_fee_bytes: Some("100".to_string()),
            ..Settings::default()
        };

        assert_eq!(
            settings.default_fee_bytes(None).expect("configured"),
            Some(BigDecimal::from(100))
        );
        assert_eq!(
            settings.default_fee_bytes(Some("5")).expect("explicit"),
            Some(BigDecimal::from(5))
        );
        assert!(settings.default_fee_bytes(Some("five")).is_err());
        assert!(settings.default_fee_bytes(Some("-5")).is_err());
        assert!(settings.default_fee_bytes(Some("1e6")).is_err());
    }
}
