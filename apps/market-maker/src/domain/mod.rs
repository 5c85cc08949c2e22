//! Domain Layer - Core market-making types.
//!
//! Value objects and records with no I/O: orders and books, markets and lot
//! sizes, account records and the inventory derived from them.

/// Account records and inventory derivation.
pub mod accounts;

/// Markets, lot size conversion and prices.
pub mod market;

/// Orders, order books and placed orders.
pub mod orders;

/// Shared value objects and errors.
pub mod shared;
