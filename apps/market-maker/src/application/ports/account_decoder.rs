//! Account Decoder
//!
//! Turns raw account data into typed records. Binary layouts belong to the
//! exchange integration that implements this trait.

use crate::domain::accounts::{Account, Cache, EventQueue, Group, OpenOrders, TokenAccount};
use crate::domain::market::Market;
use crate::domain::orders::Order;
use crate::domain::shared::{Address, DecodeError};

/// Decodes raw account data into typed records.
///
/// Every method receives the address the data was read from, so records can
/// carry it without the layout having to.
#[cfg_attr(test, mockall::automock)]
pub trait AccountDecoder: Send + Sync {
    /// Decode a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid group.
    fn decode_group(&self, address: Address, data: &[u8]) -> Result<Group, DecodeError>;

    /// Decode a group cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid cache.
    fn decode_cache(&self, address: Address, data: &[u8]) -> Result<Cache, DecodeError>;

    /// Decode a margin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid account.
    fn decode_account(&self, address: Address, data: &[u8]) -> Result<Account, DecodeError>;

    /// Decode an open-orders account.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid open-orders account.
    fn decode_open_orders(&self, address: Address, data: &[u8])
    -> Result<OpenOrders, DecodeError>;

    /// Decode a wallet token account.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid token account.
    fn decode_token_account(
        &self,
        address: Address,
        data: &[u8],
    ) -> Result<TokenAccount, DecodeError>;

    /// Decode a market's event queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid event queue.
    fn decode_event_queue(&self, address: Address, data: &[u8])
    -> Result<EventQueue, DecodeError>;

    /// Decode one side of a market's book into orders in book order.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid book side.
    fn decode_book_side(&self, market: &Market, data: &[u8]) -> Result<Vec<Order>, DecodeError>;
}
