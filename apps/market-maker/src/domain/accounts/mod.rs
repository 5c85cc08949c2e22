//! Accounts Bounded Context
//!
//! Typed exchange and wallet account records, and the inventory derived
//! from them. Records are produced by injected decoders; binary layouts are
//! not modelled here.

mod account;
mod cache;
mod event_queue;
mod group;
mod inventory;
mod open_orders;
mod token_account;

pub use account::{Account, AccountSlot, Balance, PerpAccount};
pub use cache::{BankIndices, Cache, SlotCache};
pub use event_queue::{EventKind, EventQueue, QueueEvent};
pub use group::{Group, GroupSlot};
pub use inventory::{Inventory, InventorySource};
pub use open_orders::OpenOrders;
pub use token_account::TokenAccount;
