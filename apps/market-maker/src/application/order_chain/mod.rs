//! Order Chain
//!
//! A configurable sequence of transformations applied to a strategy's
//! desired orders before reconciliation. Each element implements
//! [`OrderChainElement`]; new elements are added by implementing the trait
//! and registering a name in [`OrderChain::from_config`].

mod chain;
mod element;
mod error;
mod maximum_quantity;
mod minimum_quantity;
mod prevent_post_only_crossing_book;
mod round_to_lot_size;

pub use chain::OrderChain;
pub use element::{ChainContext, ElementConfig, OrderChainElement};
pub use error::ChainConfigError;
pub use maximum_quantity::MaximumQuantityElement;
pub use minimum_quantity::MinimumQuantityElement;
pub use prevent_post_only_crossing_book::PreventPostOnlyCrossingBookElement;
pub use round_to_lot_size::RoundToLotSizeElement;
