//! Market descriptions and market-kind dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::LotSizeConverter;
use crate::domain::shared::{Address, DomainError, Token};

/// The kind of a market, taken from its qualified symbol prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Serum DEX market traded from wallet token accounts.
    Serum,
    /// Spot market traded through a margin account.
    Spot,
    /// Perpetual futures market.
    Perp,
}

impl MarketKind {
    /// Determine the kind from a qualified symbol such as `spot:SOL/USDC`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarketKind` naming the market if the prefix is
    /// missing or not recognised.
    pub fn from_qualified_symbol(symbol: &str) -> Result<Self, DomainError> {
        let unknown = || DomainError::UnknownMarketKind {
            market: symbol.to_string(),
        };
        let (prefix, _) = symbol.split_once(':').ok_or_else(unknown)?;
        match prefix.to_ascii_lowercase().as_str() {
            "serum" => Ok(Self::Serum),
            "spot" => Ok(Self::Spot),
            "perp" => Ok(Self::Perp),
            _ => Err(unknown()),
        }
    }

    /// Lowercase prefix used in qualified symbols.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Serum => "serum",
            Self::Spot => "spot",
            Self::Perp => "perp",
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details common to every market kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Symbol without kind prefix, e.g. `SOL/USDC`.
    pub symbol: String,
    /// Market account address.
    pub address: Address,
    /// Base token.
    pub base: Token,
    /// Quote token.
    pub quote: Token,
    /// Lot size conversions.
    pub lot_size_converter: LotSizeConverter,
    /// Bids book-side account.
    pub bids: Address,
    /// Asks book-side account.
    pub asks: Address,
    /// Event queue account.
    pub event_queue: Address,
}

/// A loaded market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Market {
    /// Serum DEX market.
    Serum(MarketInfo),
    /// Spot market traded through a margin account.
    Spot(MarketInfo),
    /// Perpetual futures market.
    Perp(MarketInfo),
}

impl Market {
    /// Build a market of the given kind.
    #[must_use]
    pub fn from_kind(kind: MarketKind, info: MarketInfo) -> Self {
        match kind {
            MarketKind::Serum => Self::Serum(info),
            MarketKind::Spot => Self::Spot(info),
            MarketKind::Perp => Self::Perp(info),
        }
    }

    /// Build a market from a qualified symbol (`perp:SOL/USDC`).
    ///
    /// # Errors
    ///
    /// Returns `UnknownMarketKind` if the prefix is not recognised.
    pub fn from_qualified_symbol(
        qualified_symbol: &str,
        info: MarketInfo,
    ) -> Result<Self, DomainError> {
        let kind = MarketKind::from_qualified_symbol(qualified_symbol)?;
        Ok(Self::from_kind(kind, info))
    }

    /// Market kind.
    #[must_use]
    pub const fn kind(&self) -> MarketKind {
        match self {
            Self::Serum(_) => MarketKind::Serum,
            Self::Spot(_) => MarketKind::Spot,
            Self::Perp(_) => MarketKind::Perp,
        }
    }

    /// Common market details.
    #[must_use]
    pub const fn info(&self) -> &MarketInfo {
        match self {
            Self::Serum(info) | Self::Spot(info) | Self::Perp(info) => info,
        }
    }

    /// Symbol prefixed with the market kind, e.g. `spot:SOL/USDC`.
    #[must_use]
    pub fn qualified_symbol(&self) -> String {
        format!("{}:{}", self.kind(), self.info().symbol)
    }

    /// Market account address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.info().address
    }

    /// Base token.
    #[must_use]
    pub const fn base(&self) -> &Token {
        &self.info().base
    }

    /// Quote token.
    #[must_use]
    pub const fn quote(&self) -> &Token {
        &self.info().quote
    }

    /// Lot size conversions.
    #[must_use]
    pub const fn lot_size_converter(&self) -> &LotSizeConverter {
        &self.info().lot_size_converter
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "« Market {} [{}] »", self.qualified_symbol(), self.address())
    }
}
