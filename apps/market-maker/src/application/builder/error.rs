//! Model state builder errors.

use crate::application::state::StateError;
use crate::domain::shared::DomainError;

/// Errors that prevent a builder from being constructed.
///
/// Construction is all or nothing: when any of these is returned, no
/// subscription or poll target is left running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// An account the market maker must trade from does not exist.
    #[error("could not find {description}")]
    MissingAccount {
        /// Which account, for whom, on which market.
        description: String,
    },

    /// The market's kind could not be determined.
    #[error("could not determine type of market {market}")]
    UnsupportedMarket {
        /// The qualified market symbol.
        market: String,
    },

    /// The group has no slot listing the market.
    #[error("market {market} is not listed in the group")]
    MarketNotListed {
        /// The qualified market symbol.
        market: String,
    },

    /// A facet's initial value could not be loaded.
    #[error(transparent)]
    State(#[from] StateError),
}

impl From<DomainError> for BuilderError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::UnknownMarketKind { market } => Self::UnsupportedMarket { market },
            other => Self::MissingAccount {
                description: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_market_kind_becomes_unsupported_market() {
        let err: BuilderError = DomainError::UnknownMarketKind {
            market: "options:SOL/USDC".to_string(),
        }
        .into();
        assert_eq!(
            err,
            BuilderError::UnsupportedMarket {
                market: "options:SOL/USDC".to_string()
            }
        );
        assert!(err.to_string().contains("options:SOL/USDC"));
    }
}
