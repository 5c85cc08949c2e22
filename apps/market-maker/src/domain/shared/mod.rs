//! Shared Domain Types
//!
//! Value objects and errors shared across the domain modules.

mod address;
mod errors;
mod instrument;

pub use address::Address;
pub use errors::{DecodeError, DomainError};
pub use instrument::{Instrument, InstrumentValue, Token};
