//! Account Data Port (Driven Port)
//!
//! Raw account data, fetched on demand or streamed as it changes.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::shared::Address;

/// Stream of raw account payloads.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, DataSourceError>>;

/// Errors from an account data source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    /// Transport-level failure.
    #[error("account data connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// The account does not exist.
    #[error("account {address} not found")]
    AccountNotFound {
        /// Requested address.
        address: Address,
    },

    /// A subscription could not be established or failed mid-stream.
    #[error("subscription error: {message}")]
    Subscription {
        /// Error details.
        message: String,
    },
}

/// Port for reading raw account data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDataPort: Send + Sync {
    /// Fetch the current data of an account.
    async fn fetch(&self, address: Address) -> Result<Vec<u8>, DataSourceError>;

    /// Subscribe to changes of an account. Each item is the full account
    /// data after a change.
    async fn subscribe(&self, address: Address) -> Result<ByteStream, DataSourceError>;
}
