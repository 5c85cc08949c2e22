//! Collaborators and inputs shared by every builder.

use std::sync::Arc;
use std::time::Duration;

use super::BuilderError;
use crate::application::ports::{
    AccountDataPort, AccountDecoder, AccountLocatorPort, HealthReporter, PriceOraclePort,
};
use crate::domain::market::{Market, MarketInfo};
use crate::domain::shared::Address;

/// Deadlines for remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Deadline for one fetch (account data, price or locator lookup).
    pub fetch: Duration,
    /// Deadline for establishing one subscription.
    pub subscribe: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            fetch: Duration::from_secs(5),
            subscribe: Duration::from_secs(10),
        }
    }
}

/// Ports and settings a builder works with.
#[derive(Clone)]
pub struct BuilderContext {
    /// Raw account data.
    pub data: Arc<dyn AccountDataPort>,
    /// Account record decoding.
    pub decoder: Arc<dyn AccountDecoder>,
    /// Prices.
    pub oracle: Arc<dyn PriceOraclePort>,
    /// Account discovery.
    pub locator: Arc<dyn AccountLocatorPort>,
    /// Per-facet health sink.
    pub health: Arc<dyn HealthReporter>,
    /// Remote operation deadlines.
    pub deadlines: Deadlines,
}

/// What to build a model state for.
#[derive(Debug, Clone)]
pub struct BuilderTarget {
    /// Wallet that owns the trading accounts.
    pub wallet: Address,
    /// Group account.
    pub group: Address,
    /// Margin account within the group.
    pub account: Address,
    /// Market to trade.
    pub market: Arc<Market>,
}

impl BuilderTarget {
    /// Target a loaded market.
    #[must_use]
    pub fn new(wallet: Address, group: Address, account: Address, market: Market) -> Self {
        Self {
            wallet,
            group,
            account,
            market: Arc::new(market),
        }
    }

    /// Target a market given its qualified symbol, e.g. `perp:SOL/USDC`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedMarket` naming the market if its kind prefix is
    /// not recognised.
    pub fn from_qualified_symbol(
        wallet: Address,
        group: Address,
        account: Address,
        qualified_symbol: &str,
        info: MarketInfo,
    ) -> Result<Self, BuilderError> {
        let market = Market::from_qualified_symbol(qualified_symbol, info)?;
        Ok(Self::new(wallet, group, account, market))
    }
}
