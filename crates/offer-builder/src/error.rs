use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferError {
    #[error("Please specify at least one offered asset")]
    NoOfferedAsset,

    #[error("Please enter an HDD amount")]
    MissingNativeAmount,

    #[error("Please enter an amount for {0} token")]
    MissingTokenAmount(String),

    #[error("Please select an asset for each token")]
    MissingAsset,

    #[error("Invalid amount '{amount}': {message}")]
    InvalidAmount { amount: String, message: String },

    #[error("No standard wallet found")]
    NoStandardWallet,

    #[error("No CAT wallet found for {0} token")]
    NoCatWallet(String),

    #[error("Amount exceeds HDD total balance")]
    NativeBalanceExceeded,

    #[error("Fee exceeds HDD total balance")]
    FeeBalanceExceeded,

    #[error("Amount exceeds total balance for {0} token")]
    TokenBalanceExceeded(String),

    #[error("Cannot offer and request the same asset")]
    OfferedAndRequested,

    #[error("Token {0} is offered more than once")]
    DuplicateToken(String),

    #[error("NFT {0} is already used in this offer")]
    NftAlreadyUsed(String),

    #[error("Invalid NFT id '{id}': {message}")]
    InvalidNftId { id: String, message: String },

    #[error("NFT {0} not found")]
    NftNotFound(String),

    #[error("No balance available for wallet {0}")]
    BalanceUnavailable(u32),

    /// Raised by [`crate::WalletService`] implementations that talk to a live wallet.
    #[error("Wallet service error: {0}")]
    Service(String),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OfferError {
    /// Stable machine-readable code for the failure category.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoOfferedAsset => "no_offered_asset",
            Self::MissingNativeAmount | Self::MissingTokenAmount(_) => "missing_amount",
            Self::MissingAsset => "missing_asset",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::NoStandardWallet | Self::NoCatWallet(_) | Self::BalanceUnavailable(_) => {
                "wallet_not_found"
            }
            Self::NativeBalanceExceeded
            | Self::FeeBalanceExceeded
            | Self::TokenBalanceExceeded(_) => "insufficient_balance",
            Self::OfferedAndRequested | Self::DuplicateToken(_) | Self::NftAlreadyUsed(_) => {
                "duplicate_asset"
            }
            Self::InvalidNftId { .. } => "invalid_nft_id",
            Self::NftNotFound(_) => "nft_not_found",
            Self::Service(_) | Self::Serde(_) => "service",
        }
    }

    pub(crate) fn invalid_amount(amount: &str, message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            amount: amount.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_group_by_category() {
        assert_eq!(OfferError::MissingNativeAmount.code(), "missing_amount");
        assert_eq!(
            OfferError::MissingTokenAmount("DBX".to_string()).code(),
            "missing_amount"
        );
        assert_eq!(
            OfferError::TokenBalanceExceeded("DBX".to_string()).code(),
            "insufficient_balance"
        );
        assert_eq!(OfferError::NoStandardWallet.code(), "wallet_not_found");
        assert_eq!(
            OfferError::NftAlreadyUsed("nft1".to_string()).code(),
            "duplicate_asset"
        );
        assert_eq!(OfferError::NoOfferedAsset.code(), "no_offered_asset");
    }

    #[test]
    fn messages_name_the_offending_asset() {
        let err = OfferError::NoCatWallet("abcd".to_string());
        assert_eq!(err.to_string(), "No CAT wallet found for abcd token");
    }
}
