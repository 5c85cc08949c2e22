//! State sources: push (latest cached value) and pull (fetch on demand).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use super::{FacetReader, StateError};
use crate::application::ports::{AccountDataPort, DataSourceError, PriceOraclePort};
use crate::domain::market::Price;
use crate::domain::shared::{Address, DecodeError};

/// A facet-level data provider.
#[async_trait]
pub trait StateSource<T: Send + Sync + 'static>: Send + Sync {
    /// Facet name.
    fn name(&self) -> &str;

    /// Current value of the facet.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be produced.
    async fn current(&self) -> Result<Arc<T>, StateError>;
}

// =============================================================================
// Push
// =============================================================================

/// Serves the latest value a subscription task published.
#[derive(Debug, Clone)]
pub struct PushSource<T> {
    reader: FacetReader<T>,
}

impl<T: Send + Sync + 'static> PushSource<T> {
    /// Wrap a facet reader.
    #[must_use]
    pub const fn new(reader: FacetReader<T>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> StateSource<T> for PushSource<T> {
    fn name(&self) -> &str {
        self.reader.name()
    }

    async fn current(&self) -> Result<Arc<T>, StateError> {
        Ok(self.reader.latest())
    }
}

// =============================================================================
// Pull
// =============================================================================

type Decode<T> = dyn Fn(&[Vec<u8>]) -> Result<T, DecodeError> + Send + Sync;

/// Fetches and decodes a facet's backing records on every call.
///
/// Records are fetched concurrently, each under the deadline. Nothing is
/// cached between calls.
pub struct PullSource<T> {
    name: String,
    addresses: Vec<Address>,
    data: Arc<dyn AccountDataPort>,
    deadline: Duration,
    decode: Box<Decode<T>>,
}

impl<T> PullSource<T> {
    /// Create a pull source over `addresses`. `decode` receives the raw data
    /// in the same order as `addresses`.
    pub fn new(
        name: impl Into<String>,
        addresses: Vec<Address>,
        data: Arc<dyn AccountDataPort>,
        deadline: Duration,
        decode: impl Fn(&[Vec<u8>]) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            addresses,
            data,
            deadline,
            decode: Box::new(decode),
        }
    }

    /// Create a pull source over a single record.
    pub fn single(
        name: impl Into<String>,
        address: Address,
        data: Arc<dyn AccountDataPort>,
        deadline: Duration,
        decode: impl Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, vec![address], data, deadline, move |raw| {
            let data = raw.first().map_or(&[][..], Vec::as_slice);
            decode(data)
        })
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> StateSource<T> for PullSource<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn current(&self) -> Result<Arc<T>, StateError> {
        let fetches = self
            .addresses
            .iter()
            .map(|address| fetch_record(self.data.as_ref(), *address, &self.name, self.deadline));
        let raw = join_all(fetches)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let value = (self.decode)(&raw).map_err(|source| StateError::Decode {
            facet: self.name.clone(),
            source,
        })?;
        Ok(Arc::new(value))
    }
}

/// Serves the oracle's current price on every call.
pub struct OraclePriceSource {
    oracle: Arc<dyn PriceOraclePort>,
    deadline: Duration,
}

impl OraclePriceSource {
    /// Create a price source.
    #[must_use]
    pub fn new(oracle: Arc<dyn PriceOraclePort>, deadline: Duration) -> Self {
        Self { oracle, deadline }
    }
}

#[async_trait]
impl StateSource<Price> for OraclePriceSource {
    fn name(&self) -> &str {
        super::facets::PRICE
    }

    async fn current(&self) -> Result<Arc<Price>, StateError> {
        let price = with_deadline(super::facets::PRICE, self.deadline, self.oracle.fetch_price()).await?;
        Ok(Arc::new(price))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch one record under a deadline.
///
/// # Errors
///
/// Returns `Timeout` if the deadline expires, `DataSource` if the fetch fails.
pub async fn fetch_record(
    data: &dyn AccountDataPort,
    address: Address,
    facet: &str,
    deadline: Duration,
) -> Result<Vec<u8>, StateError> {
    with_deadline(facet, deadline, data.fetch(address)).await
}

/// Run a data-source operation under a deadline, scoping errors to `facet`.
///
/// # Errors
///
/// Returns `Timeout` if the deadline expires, `DataSource` if the operation
/// fails.
pub async fn with_deadline<T>(
    facet: &str,
    deadline: Duration,
    operation: impl Future<Output = Result<T, DataSourceError>>,
) -> Result<T, StateError> {
    match tokio::time::timeout(deadline, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(StateError::DataSource {
            facet: facet.to_string(),
            source,
        }),
        Err(_) => Err(StateError::Timeout {
            facet: facet.to_string(),
            after: deadline,
        }),
    }
}
