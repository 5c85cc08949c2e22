//! Order type (limit, post-only, etc.).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type specifying execution behaviour on the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Type could not be determined from the exchange record.
    Unknown,
    /// Limit order - rests on the book at the given price or better.
    #[default]
    Limit,
    /// Immediate-or-cancel - never rests on the book.
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    /// Post-only - rejected rather than taking liquidity.
    PostOnly,
    /// Market order.
    Market,
    /// Post-only, but repriced by the exchange instead of rejected if it
    /// would cross.
    PostOnlySlide,
}

impl OrderType {
    /// Returns true if this order must never take liquidity.
    #[must_use]
    pub const fn is_post_only(&self) -> bool {
        matches!(self, Self::PostOnly | Self::PostOnlySlide)
    }

    /// Returns true if the order can rest on the book.
    #[must_use]
    pub const fn rests_on_book(&self) -> bool {
        matches!(self, Self::Limit | Self::PostOnly | Self::PostOnlySlide)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Limit => write!(f, "LIMIT"),
            Self::ImmediateOrCancel => write!(f, "IOC"),
            Self::PostOnly => write!(f, "POST_ONLY"),
            Self::Market => write!(f, "MARKET"),
            Self::PostOnlySlide => write!(f, "POST_ONLY_SLIDE"),
        }
    }
}
