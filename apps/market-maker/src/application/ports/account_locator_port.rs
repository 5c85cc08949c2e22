//! Account Locator Port (Driven Port)
//!
//! Finds the accounts a wallet trades from. Used once, before any
//! subscription or poll target is created.

use async_trait::async_trait;

use super::DataSourceError;
use crate::domain::accounts::TokenAccount;
use crate::domain::market::Market;
use crate::domain::shared::{Address, Token};

/// Port for locating wallet-owned accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountLocatorPort: Send + Sync {
    /// The largest token account `owner` holds for `token`, if any.
    async fn find_largest_token_account(
        &self,
        owner: Address,
        token: &Token,
    ) -> Result<Option<TokenAccount>, DataSourceError>;

    /// The open-orders account `owner` uses on a serum market, if any.
    async fn find_open_orders(
        &self,
        market: &Market,
        owner: Address,
    ) -> Result<Option<Address>, DataSourceError>;
}
