//! Application Ports (Driven)
//!
//! Interfaces to the collaborators the core reads from or reports to.
//! Transport, decoding layouts and health delivery live behind these traits.
//!
//! - `PriceOraclePort`: one-shot and streaming prices
//! - `AccountDataPort`: raw account bytes, fetched or streamed
//! - `AccountDecoder`: raw bytes to typed account records
//! - `AccountLocatorPort`: finding the accounts a market maker trades from
//! - `HealthReporter`: per-facet health sink

mod account_data_port;
mod account_decoder;
mod account_locator_port;
mod health_reporter_port;
mod price_oracle_port;

pub use account_data_port::{AccountDataPort, ByteStream, DataSourceError};
pub use account_decoder::AccountDecoder;
pub use account_locator_port::AccountLocatorPort;
pub use health_reporter_port::{HealthReporter, NoOpHealthReporter};
pub use price_oracle_port::{PriceOraclePort, PriceStream};

#[cfg(test)]
pub use account_data_port::MockAccountDataPort;
#[cfg(test)]
pub use account_decoder::MockAccountDecoder;
#[cfg(test)]
pub use account_locator_port::MockAccountLocatorPort;
#[cfg(test)]
pub use price_oracle_port::MockPriceOraclePort;
