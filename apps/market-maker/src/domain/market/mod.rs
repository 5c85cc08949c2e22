//! Market Bounded Context
//!
//! Market descriptions, lot size conversion and oracle prices.

mod kind;
mod lot_size;
mod price;

pub use kind::{Market, MarketInfo, MarketKind};
pub use lot_size::LotSizeConverter;
pub use price::{OracleFeature, OracleSource, Price};
