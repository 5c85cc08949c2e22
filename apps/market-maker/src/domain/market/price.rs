//! Oracle prices.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A capability an oracle may or may not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OracleFeature {
    /// A single mid price.
    MidPrice,
    /// Separate best bid and best offer.
    TopBidAndOffer,
    /// A confidence interval alongside the price.
    Confidence,
}

/// Where a price came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSource {
    /// Oracle name.
    pub name: String,
    /// Provider name.
    pub provider_name: String,
    /// Features this oracle supports.
    pub supports: Vec<OracleFeature>,
}

impl OracleSource {
    /// Create a source description.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        provider_name: impl Into<String>,
        supports: Vec<OracleFeature>,
    ) -> Self {
        Self {
            name: name.into(),
            provider_name: provider_name.into(),
            supports,
        }
    }

    /// Whether the oracle offers `feature`.
    #[must_use]
    pub fn supports(&self, feature: OracleFeature) -> bool {
        self.supports.contains(&feature)
    }
}

/// A price observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Provenance.
    pub source: OracleSource,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
    /// Market symbol.
    pub symbol: String,
    /// Best bid (equals `mid` for mid-only oracles).
    pub bid: Decimal,
    /// Mid price.
    pub mid: Decimal,
    /// Best ask (equals `mid` for mid-only oracles).
    pub ask: Decimal,
    /// Confidence interval, zero when unsupported.
    pub confidence: Decimal,
}

impl Price {
    /// Bid/ask spread.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "« Price [{}] {}: {} ({} / {}) ±{} from {} »",
            self.source.provider_name,
            self.symbol,
            self.mid,
            self.bid,
            self.ask,
            self.confidence,
            self.timestamp.to_rfc3339()
        )
    }
}
