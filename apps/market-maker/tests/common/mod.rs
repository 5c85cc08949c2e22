//! Shared fakes for integration tests.
//!
//! Account records are stored as JSON and decoded by [`JsonDecoder`], so
//! tests can publish typed values without a binary layout.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use market_maker::application::ports::{
    AccountDataPort, AccountDecoder, AccountLocatorPort, ByteStream, DataSourceError,
    HealthReporter, PriceOraclePort, PriceStream,
};
use market_maker::domain::accounts::{
    Account, AccountSlot, Balance, BankIndices, Cache, EventQueue, Group, GroupSlot, OpenOrders,
    PerpAccount, SlotCache, TokenAccount,
};
use market_maker::domain::market::{LotSizeConverter, OracleFeature, OracleSource};
use market_maker::domain::orders::{PlacedOrder, Side};
use market_maker::{
    Address, BuilderContext, BuilderTarget, DecodeError, Deadlines, Market, MarketInfo, Order,
    Price, Token,
};

// =============================================================================
// Decoder
// =============================================================================

/// Decodes records stored as JSON.
#[derive(Debug, Default)]
pub struct JsonDecoder;

fn from_json<T: DeserializeOwned>(record: &'static str, data: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(data).map_err(|e| DecodeError::InvalidLayout {
        record,
        message: e.to_string(),
    })
}

impl AccountDecoder for JsonDecoder {
    fn decode_group(&self, _address: Address, data: &[u8]) -> Result<Group, DecodeError> {
        from_json("Group", data)
    }

    fn decode_cache(&self, _address: Address, data: &[u8]) -> Result<Cache, DecodeError> {
        from_json("Cache", data)
    }

    fn decode_account(&self, _address: Address, data: &[u8]) -> Result<Account, DecodeError> {
        from_json("Account", data)
    }

    fn decode_open_orders(&self, _address: Address, data: &[u8]) -> Result<OpenOrders, DecodeError> {
        from_json("OpenOrders", data)
    }

    fn decode_token_account(
        &self,
        _address: Address,
        data: &[u8],
    ) -> Result<TokenAccount, DecodeError> {
        from_json("TokenAccount", data)
    }

    fn decode_event_queue(&self, _address: Address, data: &[u8]) -> Result<EventQueue, DecodeError> {
        from_json("EventQueue", data)
    }

    fn decode_book_side(&self, _market: &Market, data: &[u8]) -> Result<Vec<Order>, DecodeError> {
        from_json("BookSide", data)
    }
}

// =============================================================================
// Account data
// =============================================================================

type Subscriber = mpsc::UnboundedSender<Result<Vec<u8>, DataSourceError>>;

/// In-memory account data with live subscriptions.
#[derive(Debug, Default)]
pub struct FakeAccountData {
    records: Mutex<HashMap<Address, Vec<u8>>>,
    failing: Mutex<Vec<Address>>,
    subscribers: Mutex<HashMap<Address, Vec<Subscriber>>>,
    fetches: AtomicUsize,
    subscribes: AtomicUsize,
}

impl FakeAccountData {
    pub fn put(&self, address: Address, value: &impl Serialize) {
        self.records
            .lock()
            .insert(address, serde_json::to_vec(value).unwrap());
    }

    /// Store new data and send it to every subscriber of `address`.
    pub fn publish(&self, address: Address, value: &impl Serialize) {
        self.put(address, value);
        self.publish_raw(address, serde_json::to_vec(value).unwrap());
    }

    /// Send raw bytes to subscribers without storing them.
    pub fn publish_raw(&self, address: Address, data: Vec<u8>) {
        if let Some(subscribers) = self.subscribers.lock().get(&address) {
            for subscriber in subscribers {
                let _ = subscriber.send(Ok(data.clone()));
            }
        }
    }

    pub fn fail(&self, address: Address) {
        self.failing.lock().push(address);
    }

    pub fn recover(&self, address: Address) {
        self.failing.lock().retain(|a| *a != address);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    /// Subscriptions whose receiving end is still held by a task.
    pub fn live_subscriptions(&self) -> usize {
        self.subscribers
            .lock()
            .values()
            .flatten()
            .filter(|subscriber| !subscriber.is_closed())
            .count()
    }
}

#[async_trait]
impl AccountDataPort for FakeAccountData {
    async fn fetch(&self, address: Address) -> Result<Vec<u8>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(&address) {
            return Err(DataSourceError::Connection {
                message: format!("fetch of {address} refused"),
            });
        }
        self.records
            .lock()
            .get(&address)
            .cloned()
            .ok_or(DataSourceError::AccountNotFound { address })
    }

    async fn subscribe(&self, address: Address) -> Result<ByteStream, DataSourceError> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().entry(address).or_default().push(tx);
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}

// =============================================================================
// Oracle, locator, health
// =============================================================================

/// Oracle with a settable price and a stream that never yields.
#[derive(Debug)]
pub struct FakeOracle {
    price: Mutex<Price>,
}

impl FakeOracle {
    pub fn new(mid: Decimal) -> Self {
        Self {
            price: Mutex::new(price(mid)),
        }
    }

    pub fn set(&self, mid: Decimal) {
        *self.price.lock() = price(mid);
    }
}

pub fn price(mid: Decimal) -> Price {
    Price {
        source: OracleSource::new("fake", "Fake", vec![OracleFeature::MidPrice]),
        timestamp: Utc::now(),
        symbol: "SOL/USDC".to_string(),
        bid: mid,
        mid,
        ask: mid,
        confidence: Decimal::ZERO,
    }
}

#[async_trait]
impl PriceOraclePort for FakeOracle {
    async fn fetch_price(&self) -> Result<Price, DataSourceError> {
        Ok(self.price.lock().clone())
    }

    async fn streaming_price(&self) -> Result<PriceStream, DataSourceError> {
        Ok(Box::pin(futures::stream::pending()))
    }
}

/// Locator over a fixed set of wallet accounts.
#[derive(Debug, Default)]
pub struct FakeLocator {
    pub token_accounts: Vec<TokenAccount>,
    pub open_orders: Option<Address>,
}

#[async_trait]
impl AccountLocatorPort for FakeLocator {
    async fn find_largest_token_account(
        &self,
        owner: Address,
        token: &Token,
    ) -> Result<Option<TokenAccount>, DataSourceError> {
        Ok(self
            .token_accounts
            .iter()
            .filter(|account| account.owner == owner && account.mint == token.mint())
            .max_by_key(|account| account.amount)
            .cloned())
    }

    async fn find_open_orders(
        &self,
        _market: &Market,
        _owner: Address,
    ) -> Result<Option<Address>, DataSourceError> {
        Ok(self.open_orders)
    }
}

/// Health reporter that records everything.
#[derive(Debug, Default)]
pub struct RecordingHealth {
    registered: Mutex<Vec<String>>,
    reports: Mutex<Vec<(String, String)>>,
    updates: Mutex<HashMap<String, usize>>,
}

impl RecordingHealth {
    pub fn reports_for(&self, facet: &str) -> Vec<String> {
        self.reports
            .lock()
            .iter()
            .filter(|(name, _)| name == facet)
            .map(|(_, error)| error.clone())
            .collect()
    }

    pub fn updates_for(&self, facet: &str) -> usize {
        self.updates.lock().get(facet).copied().unwrap_or(0)
    }

    pub fn is_registered(&self, facet: &str) -> bool {
        self.registered.lock().iter().any(|name| name == facet)
    }
}

impl HealthReporter for RecordingHealth {
    fn register(&self, name: &str) {
        self.registered.lock().push(name.to_string());
    }

    fn report(&self, name: &str, error: &str) {
        self.reports
            .lock()
            .push((name.to_string(), error.to_string()));
    }

    fn record_update(&self, name: &str) {
        *self.updates.lock().entry(name.to_string()).or_default() += 1;
    }
}

// =============================================================================
// Scenario
// =============================================================================

pub fn token(symbol: &str, decimals: u32) -> Token {
    Token::new(symbol, symbol, decimals, Address::from_seed(symbol)).unwrap()
}

pub fn wallet() -> Address {
    Address::from_seed("wallet")
}

pub fn market_info() -> MarketInfo {
    MarketInfo {
        symbol: "SOL/USDC".to_string(),
        address: Address::from_seed("market"),
        base: token("SOL", 2),
        quote: token("USDC", 2),
        lot_size_converter: LotSizeConverter::new(2, dec!(1), 2, dec!(1)).unwrap(),
        bids: Address::from_seed("bids"),
        asks: Address::from_seed("asks"),
        event_queue: Address::from_seed("event_queue"),
    }
}

pub fn open_orders_address() -> Address {
    Address::from_seed("open_orders")
}

pub fn group() -> Group {
    Group {
        address: Address::from_seed("group"),
        shared_quote: token("USDC", 2),
        slots: vec![GroupSlot {
            index: 0,
            base: token("SOL", 2),
            spot_market: Some(market_info().address),
            perp_market: Some(market_info().address),
        }],
        incentive_token: token("MNGO", 2),
        cache: Address::from_seed("cache"),
    }
}

pub fn cache() -> Cache {
    Cache {
        address: Address::from_seed("cache"),
        quote: BankIndices::default(),
        slots: vec![Some(SlotCache {
            indices: BankIndices::default(),
            price: dec!(100),
        })],
    }
}

pub fn account(with_open_orders: bool) -> Account {
    Account {
        address: Address::from_seed("account"),
        owner: wallet(),
        group: group().address,
        quote: Balance {
            deposit: dec!(10_000),
            borrow: Decimal::ZERO,
        },
        slots: vec![AccountSlot {
            balance: Balance {
                deposit: dec!(500),
                borrow: Decimal::ZERO,
            },
            spot_open_orders: with_open_orders.then(open_orders_address),
            perp_account: Some(PerpAccount {
                base_position: dec!(2),
                placed_orders: vec![PlacedOrder {
                    id: 42,
                    client_id: 7,
                    side: Side::Buy,
                }],
                ..PerpAccount::default()
            }),
        }],
        incentives: Decimal::ZERO,
    }
}

pub fn open_orders(owner: Address) -> OpenOrders {
    OpenOrders {
        base_token_total: dec!(100),
        quote_token_total: dec!(2_000),
        ..OpenOrders::empty(open_orders_address(), market_info().address, owner)
    }
}

pub fn bid(price: Decimal, quantity: Decimal, owner: Address) -> Order {
    Order::resting(1, 1, owner, Side::Buy, price, quantity)
}

pub fn ask(price: Decimal, quantity: Decimal, owner: Address) -> Order {
    Order::resting(2, 2, owner, Side::Sell, price, quantity)
}

/// All fakes for one market, pre-populated with a consistent set of records.
pub struct World {
    pub data: Arc<FakeAccountData>,
    pub oracle: Arc<FakeOracle>,
    pub locator: Arc<FakeLocator>,
    pub health: Arc<RecordingHealth>,
}

impl World {
    pub fn new(locator: FakeLocator, with_open_orders: bool) -> Self {
        let data = Arc::new(FakeAccountData::default());
        let info = market_info();
        let account = account(with_open_orders);
        let someone = Address::from_seed("someone_else");

        data.put(group().address, &group());
        data.put(cache().address, &cache());
        data.put(account.address, &account);
        data.put(open_orders_address(), &open_orders(account.address));
        data.put(info.bids, &vec![bid(dec!(99), dec!(1), someone)]);
        data.put(info.asks, &vec![ask(dec!(101), dec!(1), someone)]);
        data.put(info.event_queue, &EventQueue::empty(info.event_queue));

        Self {
            data,
            oracle: Arc::new(FakeOracle::new(dec!(100))),
            locator: Arc::new(locator),
            health: Arc::new(RecordingHealth::default()),
        }
    }

    pub fn context(&self) -> BuilderContext {
        BuilderContext {
            data: Arc::clone(&self.data) as Arc<dyn AccountDataPort>,
            decoder: Arc::new(JsonDecoder),
            oracle: Arc::clone(&self.oracle) as Arc<dyn PriceOraclePort>,
            locator: Arc::clone(&self.locator) as Arc<dyn AccountLocatorPort>,
            health: Arc::clone(&self.health) as Arc<dyn HealthReporter>,
            deadlines: Deadlines {
                fetch: Duration::from_secs(1),
                subscribe: Duration::from_secs(1),
            },
        }
    }
}

pub fn target(market: Market) -> BuilderTarget {
    BuilderTarget::new(wallet(), group().address, account(true).address, market)
}

/// Poll `check` until it holds or a second passes.
pub async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

