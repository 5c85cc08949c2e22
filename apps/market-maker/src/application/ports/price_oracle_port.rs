//! Price Oracle Port (Driven Port)

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::DataSourceError;
use crate::domain::market::Price;

/// Stream of oracle prices.
pub type PriceStream = BoxStream<'static, Result<Price, DataSourceError>>;

/// Port for market prices.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceOraclePort: Send + Sync {
    /// Fetch the current price.
    async fn fetch_price(&self) -> Result<Price, DataSourceError>;

    /// Stream prices as they change.
    async fn streaming_price(&self) -> Result<PriceStream, DataSourceError>;
}
