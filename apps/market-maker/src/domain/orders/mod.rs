//! Orders Bounded Context
//!
//! Orders, order books and the orders resting under an owner.

mod order;
mod order_type;
mod orderbook;
mod placed_orders;
mod side;

pub use order::Order;
pub use order_type::OrderType;
pub use orderbook::OrderBook;
pub use placed_orders::{PerpOpenOrders, PlacedOrder, PlacedOrdersContainer};
pub use side::Side;
