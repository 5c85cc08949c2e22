//! Push-mode model state builder.
//!
//! Every facet is backed by a subscription task that publishes into a facet
//! cell. Derived facets (inventory, placed orders, order book) wait on the
//! cells they are computed from and recompute when any of them changes.
//! `build()` only assembles readers, so it never waits on the network.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::select_all;
use futures::stream::{BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::report::{facet_failed, facet_updated};
use super::resolve::{MarketPlan, ResolvedAccounts, load, resolve_accounts};
use super::{BuilderContext, BuilderError, BuilderTarget, ModelStateBuilder, ModelUpdateMode};
use crate::application::ports::{AccountDecoder, DataSourceError, HealthReporter};
use crate::application::state::{
    ChangeSignal, FacetPublisher, FacetReader, FacetReaders, ModelState, StateError,
    SubscriptionSet, facet, facets, with_deadline,
};
use crate::domain::accounts::{Account, Cache, Group, Inventory, OpenOrders};
use crate::domain::market::{Market, Price};
use crate::domain::orders::{OrderBook, PlacedOrdersContainer};
use crate::domain::shared::{Address, DecodeError};

/// Builds model states from live subscriptions.
#[derive(Debug)]
pub struct PushModelStateBuilder {
    model_state: ModelState,
    subscriptions: SubscriptionSet,
}

impl PushModelStateBuilder {
    /// Resolve the market's accounts and start every subscription.
    ///
    /// Accounts are resolved before anything is subscribed. If any later
    /// step fails, the subscriptions already started are torn down before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a required account is missing or an initial
    /// value cannot be loaded.
    #[instrument(skip_all, fields(market = %target.market.qualified_symbol()))]
    pub async fn start(ctx: BuilderContext, target: BuilderTarget) -> Result<Self, BuilderError> {
        let resolved = resolve_accounts(&ctx, &target).await?;
        let order_owner = resolved.order_owner;
        let mut wiring = Wiring {
            ctx,
            market: Arc::clone(&target.market),
            subscriptions: SubscriptionSet::new(),
        };

        let readers = wiring.wire(&target, resolved).await?;
        let subscriptions = wiring.subscriptions;
        info!(
            subscriptions = subscriptions.active_count(),
            order_owner = %order_owner,
            "Push model state builder started"
        );

        Ok(Self {
            model_state: ModelState::new(order_owner, target.market, readers),
            subscriptions,
        })
    }

    /// The live model state. Reads always observe the latest published
    /// values.
    #[must_use]
    pub fn model_state(&self) -> ModelState {
        self.model_state.clone()
    }

    /// Names of the subscriptions still running.
    #[must_use]
    pub fn subscription_names(&self) -> Vec<&str> {
        self.subscriptions.active_names()
    }

    /// Stop every subscription and wait for the tasks to finish.
    pub async fn shutdown(self) {
        self.subscriptions.shutdown().await;
    }
}

#[async_trait]
impl ModelStateBuilder for PushModelStateBuilder {
    async fn build(&mut self) -> Result<ModelState, StateError> {
        Ok(self.model_state.clone())
    }

    fn active_subscriptions(&self) -> usize {
        self.subscriptions.active_count()
    }

    fn mode(&self) -> ModelUpdateMode {
        ModelUpdateMode::Push
    }

    fn stop(&mut self) {
        drop(std::mem::take(&mut self.subscriptions));
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Construction in progress. Owns the subscriptions started so far, so an
/// early return drops them.
struct Wiring {
    ctx: BuilderContext,
    market: Arc<Market>,
    subscriptions: SubscriptionSet,
}

impl Wiring {
    async fn wire(
        &mut self,
        target: &BuilderTarget,
        resolved: ResolvedAccounts,
    ) -> Result<FacetReaders, BuilderError> {
        let ResolvedAccounts {
            group,
            account,
            plan,
            ..
        } = resolved;
        let cache_address = group.cache;

        let group = self
            .subscribe_record(facets::GROUP, target.group, group, |decoder, address, data| {
                decoder.decode_group(address, data)
            })
            .await;
        let cache = self
            .follow_record(facets::CACHE, cache_address, |decoder, address, data| {
                decoder.decode_cache(address, data)
            })
            .await?;
        let account = self
            .subscribe_record(facets::ACCOUNT, target.account, account, |decoder, address, data| {
                decoder.decode_account(address, data)
            })
            .await;
        let price = self.subscribe_price().await?;

        let open_orders = self.follow_open_orders(&plan).await?;
        let inventory = self
            .wire_inventory(&plan, &group, &cache, &account, &open_orders)
            .await?;
        let placed_orders = self.wire_placed_orders(&plan, &account, &open_orders)?;
        let order_book = self.wire_order_book().await?;

        let event_queue_address = self.market.info().event_queue;
        let event_queue = self
            .follow_record(
                facets::EVENT_QUEUE,
                event_queue_address,
                |decoder, address, data| decoder.decode_event_queue(address, data),
            )
            .await?;

        Ok(FacetReaders {
            group,
            account,
            price,
            placed_orders,
            inventory,
            order_book,
            event_queue,
        })
    }

    /// Subscribe to a record whose initial value is already known.
    ///
    /// A subscription that cannot be established is reported against the
    /// facet, which keeps `initial`.
    async fn subscribe_record<T, D>(
        &mut self,
        facet_name: &str,
        address: Address,
        initial: T,
        decode: D,
    ) -> FacetReader<T>
    where
        T: Send + Sync + 'static,
        D: Fn(&dyn AccountDecoder, Address, &[u8]) -> Result<T, DecodeError>
            + Send
            + Sync
            + 'static,
    {
        self.ctx.health.register(facet_name);
        let (publisher, reader) = facet(facet_name, initial);
        facet_updated(self.ctx.health.as_ref(), facet_name);

        let subscribed = with_deadline(
            facet_name,
            self.ctx.deadlines.subscribe,
            self.ctx.data.subscribe(address),
        )
        .await;
        match subscribed {
            Ok(stream) => {
                let decoder = Arc::clone(&self.ctx.decoder);
                let health = Arc::clone(&self.ctx.health);
                let name = facet_name.to_string();
                let convert = move |data: Vec<u8>| {
                    decode(decoder.as_ref(), address, &data).map_err(|source| StateError::Decode {
                        facet: name.clone(),
                        source,
                    })
                };
                self.subscriptions.spawn(facet_name, move |token| {
                    run_subscription(token, stream, publisher, health, convert)
                });
            }
            Err(error) => facet_failed(self.ctx.health.as_ref(), &error),
        }
        reader
    }

    /// Fetch a record's initial value, then subscribe to it.
    async fn follow_record<T, D>(
        &mut self,
        facet_name: &str,
        address: Address,
        decode: D,
    ) -> Result<FacetReader<T>, BuilderError>
    where
        T: Clone + Send + Sync + 'static,
        D: Fn(&dyn AccountDecoder, Address, &[u8]) -> Result<T, DecodeError>
            + Clone
            + Send
            + Sync
            + 'static,
    {
        let initial = load(&self.ctx, facet_name, address, decode.clone()).await?;
        Ok(self.subscribe_record(facet_name, address, initial, decode).await)
    }

    async fn subscribe_price(&mut self) -> Result<FacetReader<Price>, BuilderError> {
        self.ctx.health.register(facets::PRICE);
        let initial = with_deadline(
            facets::PRICE,
            self.ctx.deadlines.fetch,
            self.ctx.oracle.fetch_price(),
        )
        .await?;
        let (publisher, reader) = facet(facets::PRICE, initial);
        facet_updated(self.ctx.health.as_ref(), facets::PRICE);

        let streamed = with_deadline(
            facets::PRICE,
            self.ctx.deadlines.subscribe,
            self.ctx.oracle.streaming_price(),
        )
        .await;
        match streamed {
            Ok(stream) => {
                let health = Arc::clone(&self.ctx.health);
                self.subscriptions.spawn(facets::PRICE, move |token| {
                    run_subscription(token, stream, publisher, health, Ok)
                });
            }
            Err(error) => facet_failed(self.ctx.health.as_ref(), &error),
        }
        Ok(reader)
    }

    /// One cell per open-orders account the plan needs, keyed by address.
    async fn follow_open_orders(
        &mut self,
        plan: &MarketPlan,
    ) -> Result<Vec<(Address, FacetReader<OpenOrders>)>, BuilderError> {
        let mut addresses = plan.inventory_open_orders();
        if let Some(market_open_orders) = plan.market_open_orders() {
            if !addresses.contains(&market_open_orders) {
                addresses.push(market_open_orders);
            }
        }

        let mut readers = Vec::with_capacity(addresses.len());
        for address in addresses {
            let name = format!("{}:{address}", facets::OPEN_ORDERS);
            let reader = self
                .follow_record(&name, address, |decoder, address, data| {
                    decoder.decode_open_orders(address, data)
                })
                .await?;
            readers.push((address, reader));
        }
        Ok(readers)
    }

    async fn wire_inventory(
        &mut self,
        plan: &MarketPlan,
        group: &FacetReader<Group>,
        cache: &FacetReader<Cache>,
        account: &FacetReader<Account>,
        open_orders: &[(Address, FacetReader<OpenOrders>)],
    ) -> Result<FacetReader<Inventory>, BuilderError> {
        let market = Arc::clone(&self.market);

        if let MarketPlan::Serum {
            open_orders: market_open_orders,
            base_token,
            quote_token,
        } = plan
        {
            let base = self
                .subscribe_record(
                    facets::BASE_TOKEN_ACCOUNT,
                    base_token.address,
                    base_token.clone(),
                    |decoder, address, data| decoder.decode_token_account(address, data),
                )
                .await;
            let quote = self
                .subscribe_record(
                    facets::QUOTE_TOKEN_ACCOUNT,
                    quote_token.address,
                    quote_token.clone(),
                    |decoder, address, data| decoder.decode_token_account(address, data),
                )
                .await;
            let oo = reader_for(open_orders, *market_open_orders)?;
            let group = group.clone();

            let signals: Vec<Box<dyn ChangeSignal>> = vec![
                Box::new(base.clone()),
                Box::new(quote.clone()),
                Box::new(oo.clone()),
                Box::new(group.clone()),
            ];
            return self.derive(facets::INVENTORY, signals, move || {
                Ok(Inventory::from_token_accounts(
                    &market,
                    &group.latest(),
                    &base.latest(),
                    &quote.latest(),
                    Some(&oo.latest()),
                ))
            });
        }

        let inventory_addresses = plan.inventory_open_orders();
        let oo_readers: Vec<FacetReader<OpenOrders>> = open_orders
            .iter()
            .filter(|(address, _)| inventory_addresses.contains(address))
            .map(|(_, reader)| reader.clone())
            .collect();
        let (group, cache, account) = (group.clone(), cache.clone(), account.clone());

        let mut signals: Vec<Box<dyn ChangeSignal>> = vec![
            Box::new(group.clone()),
            Box::new(cache.clone()),
            Box::new(account.clone()),
        ];
        signals.extend(
            oo_readers
                .iter()
                .map(|reader| Box::new(reader.clone()) as Box<dyn ChangeSignal>),
        );

        self.derive(facets::INVENTORY, signals, move || {
            let open_orders: Vec<OpenOrders> = oo_readers
                .iter()
                .map(|reader| OpenOrders::clone(&reader.latest()))
                .collect();
            Inventory::from_account(
                &market,
                &group.latest(),
                &cache.latest(),
                &account.latest(),
                &open_orders,
            )
            .map_err(|source| StateError::Derivation {
                facet: facets::INVENTORY.to_string(),
                source,
            })
        })
    }

    fn wire_placed_orders(
        &mut self,
        plan: &MarketPlan,
        account: &FacetReader<Account>,
        open_orders: &[(Address, FacetReader<OpenOrders>)],
    ) -> Result<FacetReader<PlacedOrdersContainer>, BuilderError> {
        match plan {
            MarketPlan::Serum {
                open_orders: address,
                ..
            }
            | MarketPlan::Spot {
                open_orders: address,
                ..
            } => {
                let oo = reader_for(open_orders, *address)?;
                let signals: Vec<Box<dyn ChangeSignal>> = vec![Box::new(oo.clone())];
                self.derive(facets::PLACED_ORDERS, signals, move || {
                    Ok(PlacedOrdersContainer::Spot(OpenOrders::clone(&oo.latest())))
                })
            }
            MarketPlan::Perp { slot, .. } => {
                let slot = *slot;
                let account = account.clone();
                let signals: Vec<Box<dyn ChangeSignal>> = vec![Box::new(account.clone())];
                self.derive(facets::PLACED_ORDERS, signals, move || {
                    let perp = account
                        .latest()
                        .perp_account(slot)
                        .map(|perp| perp.open_orders())
                        .unwrap_or_default();
                    Ok(PlacedOrdersContainer::Perp(perp))
                })
            }
        }
    }

    async fn wire_order_book(&mut self) -> Result<FacetReader<OrderBook>, BuilderError> {
        let info = self.market.info();
        let (bids_address, asks_address) = (info.bids, info.asks);

        let market = Arc::clone(&self.market);
        let bids = self
            .follow_record(facets::BIDS, bids_address, move |decoder, _, data| {
                decoder.decode_book_side(&market, data)
            })
            .await?;
        let market = Arc::clone(&self.market);
        let asks = self
            .follow_record(facets::ASKS, asks_address, move |decoder, _, data| {
                decoder.decode_book_side(&market, data)
            })
            .await?;

        let symbol = self.market.info().symbol.clone();
        let signals: Vec<Box<dyn ChangeSignal>> =
            vec![Box::new(bids.clone()), Box::new(asks.clone())];
        self.derive(facets::ORDER_BOOK, signals, move || {
            Ok(OrderBook::new(
                symbol.clone(),
                bids.latest().to_vec(),
                asks.latest().to_vec(),
            ))
        })
    }

    /// Create a derived facet and the task that keeps it current.
    ///
    /// The initial computation must succeed. Later failures are reported
    /// and the facet keeps its last good value.
    fn derive<T, F>(
        &mut self,
        facet_name: &str,
        signals: Vec<Box<dyn ChangeSignal>>,
        compute: F,
    ) -> Result<FacetReader<T>, BuilderError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, StateError> + Send + 'static,
    {
        self.ctx.health.register(facet_name);
        let (publisher, reader) = facet(facet_name, compute()?);
        facet_updated(self.ctx.health.as_ref(), facet_name);
        let health = Arc::clone(&self.ctx.health);
        self.subscriptions.spawn(facet_name, move |token| {
            run_derived(token, signals, publisher, health, compute)
        });
        Ok(reader)
    }
}

fn reader_for(
    readers: &[(Address, FacetReader<OpenOrders>)],
    address: Address,
) -> Result<FacetReader<OpenOrders>, BuilderError> {
    readers
        .iter()
        .find(|(candidate, _)| *candidate == address)
        .map(|(_, reader)| reader.clone())
        .ok_or_else(|| BuilderError::MissingAccount {
            description: format!("open orders account {address}"),
        })
}

// =============================================================================
// Tasks
// =============================================================================

/// Publish each converted stream item until cancelled or the stream ends.
async fn run_subscription<I, T, C>(
    token: CancellationToken,
    mut stream: BoxStream<'static, Result<I, DataSourceError>>,
    publisher: FacetPublisher<T>,
    health: Arc<dyn HealthReporter>,
    convert: C,
) where
    T: Send + Sync + 'static,
    C: Fn(I) -> Result<T, StateError>,
{
    let facet_name = publisher.name().to_string();
    loop {
        tokio::select! {
            () = token.cancelled() => {
                debug!(facet = %facet_name, "Subscription cancelled");
                return;
            }
            next = stream.next() => match next {
                Some(Ok(item)) => match convert(item) {
                    Ok(value) => {
                        publisher.publish(value);
                        facet_updated(health.as_ref(), &facet_name);
                    }
                    Err(error) => facet_failed(health.as_ref(), &error),
                },
                Some(Err(source)) => facet_failed(
                    health.as_ref(),
                    &StateError::DataSource { facet: facet_name.clone(), source },
                ),
                None => {
                    facet_failed(
                        health.as_ref(),
                        &StateError::SubscriptionClosed { facet: facet_name.clone() },
                    );
                    return;
                }
            }
        }
    }
}

/// Recompute a derived facet whenever one of its inputs changes.
async fn run_derived<T, F>(
    token: CancellationToken,
    mut signals: Vec<Box<dyn ChangeSignal>>,
    publisher: FacetPublisher<T>,
    health: Arc<dyn HealthReporter>,
    compute: F,
) where
    T: Send + Sync + 'static,
    F: Fn() -> Result<T, StateError>,
{
    let facet_name = publisher.name().to_string();
    while !signals.is_empty() {
        let (changed, index) = {
            let waits = signals.iter_mut().map(|signal| signal.changed());
            tokio::select! {
                () = token.cancelled() => {
                    debug!(facet = %facet_name, "Derived facet cancelled");
                    return;
                }
                (changed, index, _) = select_all(waits) => (changed, index),
            }
        };

        if !changed {
            signals.swap_remove(index);
            continue;
        }

        match compute() {
            Ok(value) => {
                publisher.publish(value);
                facet_updated(health.as_ref(), &facet_name);
            }
            Err(error) => facet_failed(health.as_ref(), &error),
        }
    }
    debug!(facet = %facet_name, "Every input closed, derived facet stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::stream;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::ReceiverStream;

    use super::*;
    use crate::application::ports::NoOpHealthReporter;

    fn health() -> Arc<dyn HealthReporter> {
        Arc::new(NoOpHealthReporter)
    }

    async fn eventually<T: Send + Sync + 'static>(
        reader: &FacetReader<T>,
        check: impl Fn(&T) -> bool,
    ) -> bool {
        for _ in 0..100 {
            if check(&reader.latest()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn subscription_publishes_and_skips_bad_items() {
        let (tx, rx) = mpsc::channel(8);
        let (publisher, reader) = facet("account", 0_u32);
        let token = CancellationToken::new();
        let task = tokio::spawn(run_subscription(
            token.clone(),
            ReceiverStream::new(rx).boxed(),
            publisher,
            health(),
            |data: Vec<u8>| {
                data.first().map(|b| u32::from(*b)).ok_or(StateError::Decode {
                    facet: "account".to_string(),
                    source: DecodeError::InvalidLayout {
                        record: "Account",
                        message: "empty".to_string(),
                    },
                })
            },
        ));

        tx.send(Ok(vec![7])).await.unwrap();
        assert!(eventually(&reader, |v| *v == 7).await);

        tx.send(Ok(vec![])).await.unwrap();
        tx.send(Err(DataSourceError::Connection {
            message: "reset".to_string(),
        }))
        .await
        .unwrap();
        tx.send(Ok(vec![9])).await.unwrap();
        assert!(eventually(&reader, |v| *v == 9).await);

        token.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn subscription_stops_when_stream_ends() {
        let (publisher, reader) = facet("group", 1_u8);
        run_subscription(
            CancellationToken::new(),
            stream::iter(vec![Ok(2_u8)]).boxed(),
            publisher,
            health(),
            Ok,
        )
        .await;
        assert_eq!(*reader.latest(), 2);
    }

    #[tokio::test]
    async fn derived_recomputes_on_input_change() {
        let (left_pub, left) = facet("left", 1_i32);
        let (right_pub, right) = facet("right", 10_i32);
        let (sum_pub, sum) = facet("sum", 11_i32);

        let signals: Vec<Box<dyn ChangeSignal>> =
            vec![Box::new(left.clone()), Box::new(right.clone())];
        let token = CancellationToken::new();
        let task = tokio::spawn(run_derived(
            token.clone(),
            signals,
            sum_pub,
            health(),
            move || Ok(*left.latest() + *right.latest()),
        ));

        left_pub.publish(2);
        assert!(eventually(&sum, |v| *v == 12).await);
        right_pub.publish(20);
        assert!(eventually(&sum, |v| *v == 22).await);

        token.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn derived_stops_when_inputs_close() {
        let (input_pub, input) = facet("input", 0_u8);
        let (output_pub, output) = facet("output", 0_u8);
        let signals: Vec<Box<dyn ChangeSignal>> = vec![Box::new(input.clone())];

        drop(input_pub);
        run_derived(CancellationToken::new(), signals, output_pub, health(), move || {
            Ok(*input.latest())
        })
        .await;
        assert_eq!(*output.latest(), 0);
    }

    #[tokio::test]
    async fn derived_failure_keeps_last_value() {
        let (input_pub, input) = facet("input", 1_u8);
        let (output_pub, output) = facet("output", 1_u8);
        let signals: Vec<Box<dyn ChangeSignal>> = vec![Box::new(input.clone())];
        let reader = input.clone();
        let token = CancellationToken::new();
        let task = tokio::spawn(run_derived(token.clone(), signals, output_pub, health(), move || {
            let value = *reader.latest();
            if value == 0 {
                Err(StateError::FacetUnavailable {
                    facet: "output".to_string(),
                })
            } else {
                Ok(value)
            }
        }));

        input_pub.publish(0);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*output.latest(), 1);

        input_pub.publish(5);
        assert!(eventually(&output, |v| *v == 5).await);

        token.cancel();
        task.await.unwrap();
    }
}
