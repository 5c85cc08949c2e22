//! State Aggregation
//!
//! Facet cells, push and pull state sources, and the composite
//! [`ModelState`] built from them.

mod cell;
mod error;
mod model_state;
mod source;
mod subscriptions;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cell::{ChangeSignal, FacetPublisher, FacetReader, facet};
pub use error::StateError;
pub use model_state::{FacetReaders, ModelState};
pub use source::{
    OraclePriceSource, PullSource, PushSource, StateSource, fetch_record, with_deadline,
};
pub use subscriptions::SubscriptionSet;

/// Facet names, used for health reporting, metrics and errors.
pub mod facets {
    /// Group configuration.
    pub const GROUP: &str = "group";
    /// Group cache.
    pub const CACHE: &str = "cache";
    /// Margin account.
    pub const ACCOUNT: &str = "account";
    /// Oracle price.
    pub const PRICE: &str = "price";
    /// Inventory.
    pub const INVENTORY: &str = "inventory";
    /// Orders resting under the order owner.
    pub const PLACED_ORDERS: &str = "placed_orders";
    /// Order book.
    pub const ORDER_BOOK: &str = "order_book";
    /// Event queue.
    pub const EVENT_QUEUE: &str = "event_queue";

    /// Open-orders account backing inventory or placed orders.
    pub const OPEN_ORDERS: &str = "open_orders";
    /// Wallet base token account.
    pub const BASE_TOKEN_ACCOUNT: &str = "base_token_account";
    /// Wallet quote token account.
    pub const QUOTE_TOKEN_ACCOUNT: &str = "quote_token_account";
    /// Bids book side.
    pub const BIDS: &str = "bids";
    /// Asks book side.
    pub const ASKS: &str = "asks";
}
