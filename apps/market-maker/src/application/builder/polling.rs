//! Poll-mode model state builder.
//!
//! Nothing runs between cycles. Each `build()` fetches every record the
//! market needs, concurrently and under the fetch deadline, and decodes the
//! facets from that snapshot. A facet that fails keeps its last good value;
//! a facet that has never succeeded fails the build.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, instrument};

use super::report::{facet_failed, facet_updated};
use super::resolve::{MarketPlan, resolve_accounts};
use super::{BuilderContext, BuilderError, BuilderTarget, ModelStateBuilder, ModelUpdateMode};
use crate::application::ports::HealthReporter;
use crate::application::state::{
    FacetReader, FacetReaders, ModelState, StateError, facets, fetch_record, with_deadline,
};
use crate::domain::accounts::{Account, Cache, EventQueue, Group, Inventory, OpenOrders};
use crate::domain::market::{Market, Price};
use crate::domain::orders::{OrderBook, PlacedOrdersContainer};
use crate::domain::shared::{Address, DecodeError};
use crate::infrastructure::metrics;

type Records = HashMap<Address, Result<Vec<u8>, StateError>>;

/// Label for raw record fetches; errors are re-attributed to the facet that
/// reads the record.
const RECORD: &str = "record";

/// Last good value of every facet.
#[derive(Debug, Default)]
struct LastGood {
    group: Option<Arc<Group>>,
    account: Option<Arc<Account>>,
    price: Option<Arc<Price>>,
    placed_orders: Option<Arc<PlacedOrdersContainer>>,
    inventory: Option<Arc<Inventory>>,
    order_book: Option<Arc<OrderBook>>,
    event_queue: Option<Arc<EventQueue>>,
}

/// Builds a fresh model state on every call.
pub struct PollingModelStateBuilder {
    ctx: BuilderContext,
    market: Arc<Market>,
    group: Address,
    account: Address,
    cache: Address,
    order_owner: Address,
    plan: MarketPlan,
    last: LastGood,
}

impl PollingModelStateBuilder {
    /// Resolve the market's accounts. Nothing is fetched again until the
    /// first `build()`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required account is missing or cannot be
    /// loaded.
    #[instrument(skip_all, fields(market = %target.market.qualified_symbol()))]
    pub async fn new(ctx: BuilderContext, target: BuilderTarget) -> Result<Self, BuilderError> {
        let resolved = resolve_accounts(&ctx, &target).await?;
        for name in [
            facets::GROUP,
            facets::ACCOUNT,
            facets::PRICE,
            facets::PLACED_ORDERS,
            facets::INVENTORY,
            facets::ORDER_BOOK,
            facets::EVENT_QUEUE,
        ] {
            ctx.health.register(name);
        }
        info!(order_owner = %resolved.order_owner, "Polling model state builder ready");

        Ok(Self {
            cache: resolved.group.cache,
            ctx,
            market: target.market,
            group: target.group,
            account: target.account,
            order_owner: resolved.order_owner,
            plan: resolved.plan,
            last: LastGood::default(),
        })
    }

    /// Every distinct record one cycle reads.
    fn addresses(&self) -> Vec<Address> {
        let info = self.market.info();
        let mut addresses = vec![
            self.group,
            self.account,
            self.cache,
            info.bids,
            info.asks,
            info.event_queue,
        ];
        addresses.extend(self.plan.inventory_open_orders());
        addresses.extend(self.plan.market_open_orders());
        if let MarketPlan::Serum {
            base_token,
            quote_token,
            ..
        } = &self.plan
        {
            addresses.push(base_token.address);
            addresses.push(quote_token.address);
        }
        addresses.sort_unstable();
        addresses.dedup();
        addresses
    }

    async fn fetch_all(&self) -> (Records, Result<Price, StateError>) {
        let addresses = self.addresses();
        let fetches = addresses.iter().map(|address| {
            fetch_record(
                self.ctx.data.as_ref(),
                *address,
                RECORD,
                self.ctx.deadlines.fetch,
            )
        });
        let price = with_deadline(
            facets::PRICE,
            self.ctx.deadlines.fetch,
            self.ctx.oracle.fetch_price(),
        );

        let (raw, price) = tokio::join!(join_all(fetches), price);
        let records = addresses.into_iter().zip(raw).collect();
        (records, price)
    }

    fn decode<T>(
        records: &Records,
        address: Address,
        facet: &str,
        decode: impl FnOnce(&[u8]) -> Result<T, DecodeError>,
    ) -> Result<T, StateError> {
        let data = match records.get(&address) {
            Some(Ok(data)) => data,
            Some(Err(error)) => return Err(error.with_facet(facet)),
            None => {
                return Err(StateError::FacetUnavailable {
                    facet: facet.to_string(),
                });
            }
        };
        decode(data.as_slice()).map_err(|source| StateError::Decode {
            facet: facet.to_string(),
            source,
        })
    }

    fn decode_open_orders(&self, records: &Records, address: Address) -> Result<OpenOrders, StateError> {
        let decoder = self.ctx.decoder.as_ref();
        Self::decode(records, address, facets::OPEN_ORDERS, |data| {
            decoder.decode_open_orders(address, data)
        })
    }

    fn inventory(
        &self,
        records: &Records,
        group: &Result<Group, StateError>,
        account: &Result<Account, StateError>,
    ) -> Result<Inventory, StateError> {
        let decoder = self.ctx.decoder.as_ref();
        let group = group.as_ref().map_err(Clone::clone)?;

        if let MarketPlan::Serum {
            open_orders,
            base_token,
            quote_token,
        } = &self.plan
        {
            let (base_address, quote_address) = (base_token.address, quote_token.address);
            let base = Self::decode(records, base_address, facets::BASE_TOKEN_ACCOUNT, |data| {
                decoder.decode_token_account(base_address, data)
            })?;
            let quote = Self::decode(records, quote_address, facets::QUOTE_TOKEN_ACCOUNT, |data| {
                decoder.decode_token_account(quote_address, data)
            })?;
            let open_orders = self.decode_open_orders(records, *open_orders)?;
            return Ok(Inventory::from_token_accounts(
                &self.market,
                group,
                &base,
                &quote,
                Some(&open_orders),
            ));
        }

        let account = account.as_ref().map_err(Clone::clone)?;
        let cache: Cache = Self::decode(records, self.cache, facets::CACHE, |data| {
            decoder.decode_cache(self.cache, data)
        })?;
        let open_orders = self
            .plan
            .inventory_open_orders()
            .into_iter()
            .map(|address| self.decode_open_orders(records, address))
            .collect::<Result<Vec<_>, _>>()?;

        Inventory::from_account(&self.market, group, &cache, account, &open_orders).map_err(
            |source| StateError::Derivation {
                facet: facets::INVENTORY.to_string(),
                source,
            },
        )
    }

    fn placed_orders(
        &self,
        records: &Records,
        account: &Result<Account, StateError>,
    ) -> Result<PlacedOrdersContainer, StateError> {
        match &self.plan {
            MarketPlan::Serum { open_orders, .. } | MarketPlan::Spot { open_orders, .. } => self
                .decode_open_orders(records, *open_orders)
                .map(PlacedOrdersContainer::Spot),
            MarketPlan::Perp { slot, .. } => {
                let account = account.as_ref().map_err(Clone::clone)?;
                let perp = account
                    .perp_account(*slot)
                    .map(|perp| perp.open_orders())
                    .unwrap_or_default();
                Ok(PlacedOrdersContainer::Perp(perp))
            }
        }
    }

    fn order_book(&self, records: &Records) -> Result<OrderBook, StateError> {
        let decoder = self.ctx.decoder.as_ref();
        let info = self.market.info();
        let bids = Self::decode(records, info.bids, facets::BIDS, |data| {
            decoder.decode_book_side(&self.market, data)
        })?;
        let asks = Self::decode(records, info.asks, facets::ASKS, |data| {
            decoder.decode_book_side(&self.market, data)
        })?;
        Ok(OrderBook::new(info.symbol.clone(), bids, asks))
    }
}

/// Keep a fresh value, or fall back to the last good one.
fn settle<T>(
    health: &dyn HealthReporter,
    slot: &mut Option<Arc<T>>,
    facet: &str,
    fresh: Result<T, StateError>,
) -> Result<Arc<T>, StateError> {
    match fresh {
        Ok(value) => {
            let value = Arc::new(value);
            *slot = Some(Arc::clone(&value));
            facet_updated(health, facet);
            Ok(value)
        }
        Err(error) => {
            facet_failed(health, &error.with_facet(facet));
            slot.clone().ok_or_else(|| StateError::FacetUnavailable {
                facet: facet.to_string(),
            })
        }
    }
}

/// Fixed readers over this cycle's values. Fails on the first facet that
/// has never produced a value.
fn assemble(
    group: Result<Arc<Group>, StateError>,
    account: Result<Arc<Account>, StateError>,
    price: Result<Arc<Price>, StateError>,
    placed_orders: Result<Arc<PlacedOrdersContainer>, StateError>,
    inventory: Result<Arc<Inventory>, StateError>,
    order_book: Result<Arc<OrderBook>, StateError>,
    event_queue: Result<Arc<EventQueue>, StateError>,
) -> Result<FacetReaders, StateError> {
    Ok(FacetReaders {
        group: FacetReader::fixed(facets::GROUP, group?),
        account: FacetReader::fixed(facets::ACCOUNT, account?),
        price: FacetReader::fixed(facets::PRICE, price?),
        placed_orders: FacetReader::fixed(facets::PLACED_ORDERS, placed_orders?),
        inventory: FacetReader::fixed(facets::INVENTORY, inventory?),
        order_book: FacetReader::fixed(facets::ORDER_BOOK, order_book?),
        event_queue: FacetReader::fixed(facets::EVENT_QUEUE, event_queue?),
    })
}

#[async_trait]
impl ModelStateBuilder for PollingModelStateBuilder {
    #[instrument(skip_all, fields(market = %self.market.qualified_symbol()))]
    async fn build(&mut self) -> Result<ModelState, StateError> {
        let started = Instant::now();
        let (records, price) = self.fetch_all().await;
        let decoder = Arc::clone(&self.ctx.decoder);

        let group = Self::decode(&records, self.group, facets::GROUP, |data| {
            decoder.decode_group(self.group, data)
        });
        let account = Self::decode(&records, self.account, facets::ACCOUNT, |data| {
            decoder.decode_account(self.account, data)
        });
        let inventory = self.inventory(&records, &group, &account);
        let placed_orders = self.placed_orders(&records, &account);
        let order_book = self.order_book(&records);
        let event_queue_address = self.market.info().event_queue;
        let event_queue = Self::decode(&records, event_queue_address, facets::EVENT_QUEUE, |data| {
            decoder.decode_event_queue(event_queue_address, data)
        });

        let health = Arc::clone(&self.ctx.health);
        let health = health.as_ref();
        let last = &mut self.last;
        let group = settle(health, &mut last.group, facets::GROUP, group);
        let account = settle(health, &mut last.account, facets::ACCOUNT, account);
        let price = settle(health, &mut last.price, facets::PRICE, price);
        let placed_orders = settle(
            health,
            &mut last.placed_orders,
            facets::PLACED_ORDERS,
            placed_orders,
        );
        let inventory = settle(health, &mut last.inventory, facets::INVENTORY, inventory);
        let order_book = settle(health, &mut last.order_book, facets::ORDER_BOOK, order_book);
        let event_queue = settle(health, &mut last.event_queue, facets::EVENT_QUEUE, event_queue);

        let assembled = assemble(
            group,
            account,
            price,
            placed_orders,
            inventory,
            order_book,
            event_queue,
        );

        let elapsed = started.elapsed();
        metrics::record_poll_cycle(elapsed, assembled.is_ok());
        let readers = assembled?;
        debug!(elapsed_ms = elapsed.as_millis(), "Poll cycle complete");

        Ok(ModelState::new(self.order_owner, Arc::clone(&self.market), readers))
    }

    fn active_subscriptions(&self) -> usize {
        0
    }

    fn mode(&self) -> ModelUpdateMode {
        ModelUpdateMode::Poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NoOpHealthReporter;
    use crate::application::ports::DataSourceError;

    fn unavailable() -> StateError {
        StateError::DataSource {
            facet: RECORD.to_string(),
            source: DataSourceError::Connection {
                message: "refused".to_string(),
            },
        }
    }

    #[test]
    fn settle_keeps_last_good_value() {
        let mut slot = None;
        let first = settle(&NoOpHealthReporter, &mut slot, "price", Ok(5_u32)).unwrap();
        assert_eq!(*first, 5);

        let second = settle(&NoOpHealthReporter, &mut slot, "price", Err(unavailable())).unwrap();
        assert_eq!(*second, 5);
    }

    #[test]
    fn settle_fails_when_never_succeeded() {
        let mut slot: Option<Arc<u32>> = None;
        let err = settle(&NoOpHealthReporter, &mut slot, "event_queue", Err(unavailable()))
            .unwrap_err();
        assert_eq!(
            err,
            StateError::FacetUnavailable {
                facet: "event_queue".to_string()
            }
        );
    }

    #[test]
    fn decode_attributes_record_errors_to_facet() {
        let address = Address::from_seed("cache");
        let mut records = Records::new();
        records.insert(address, Err(unavailable()));

        let err = PollingModelStateBuilder::decode(&records, address, "cache", |_| Ok(()))
            .unwrap_err();
        assert_eq!(err.facet(), "cache");
        assert_eq!(err.kind(), "data_source");

        let missing = Address::from_seed("missing");
        let err = PollingModelStateBuilder::decode(&records, missing, "bids", |_| Ok(()))
            .unwrap_err();
        assert_eq!(err.kind(), "unavailable");
    }
}
