//! The matching engine: validation, per-symbol serialization, order-type
//! dispatch, fee assignment, trigger activation and event emission.

mod config;
mod error;
mod events;
mod fees;
mod state;
mod triggers;

pub use config::EngineConfig;
pub use error::EngineError;
pub use events::{BookChangedEvent, MarketEvent, TradeEvent};
pub use fees::FeeSchedule;

use crate::persistence::{EngineSnapshot, PersistenceError, SnapshotStore, SymbolSnapshot};
use crate::types::{
    CancelResponse, DepthSnapshot, Order, OrderRequest, OrderResponse, OrderStatus, OrderType,
    Trade, within_precision_limits,
};
use crate::utils;
use dashmap::DashMap;
use events::EventBus;
use rust_decimal::Decimal;
use state::{SymbolBook, SymbolState};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// The per-symbol matching engine.
///
/// Each symbol owns a mutex held for the entire duration of a submit or
/// cancel, including trigger re-entry; different symbols progress
/// independently. All queries take a consistent view by locking briefly and
/// cloning.
pub struct MatchingEngine {
    config: EngineConfig,
    fees: FeeSchedule,
    /// Symbol → per-symbol state. The map itself only needs its shard locks
    /// once a symbol is populated.
    books: DashMap<String, Arc<SymbolState>>,
    /// Order id → symbol, for cancel routing without scanning every book.
    /// Entries exist only while the order is resting or parked.
    order_symbols: DashMap<String, String>,
    events: EventBus,
}

impl MatchingEngine {
    /// Create an engine with no symbols and the given configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let fees = FeeSchedule::new(
            config.maker_fee_bps,
            config.taker_fee_bps,
            config.fee_precision,
        );
        let events = EventBus::new(config.event_queue_capacity);
        Self {
            config,
            fees,
            books: DashMap::new(),
            order_symbols: DashMap::new(),
            events,
        }
    }

    /// Create an engine and restore state from the configured snapshot path.
    ///
    /// A missing or corrupt snapshot starts the engine empty; recovery never
    /// halts startup.
    #[must_use]
    pub fn recover(config: EngineConfig) -> Self {
        let engine = Self::new(config);
        if let Some(snapshot) = SnapshotStore::load(&engine.config.persist_path) {
            engine.apply_snapshot(snapshot);
        }
        engine
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit an order.
    ///
    /// Validation happens before the symbol lock is taken; malformed
    /// requests are rejected without touching any book. The response covers
    /// everything that happened synchronously, including immediate trigger
    /// activation.
    pub fn submit(&self, request: OrderRequest) -> OrderResponse {
        if let Err(error) = self.validate(&request) {
            debug!(symbol = %request.symbol, %error, "rejecting order");
            return OrderResponse::rejected(&request, error.to_string());
        }

        let order = self.accept(request);
        let state = self.symbol_state(&order.symbol);
        let mut sym = state.inner.lock();
        let response = self.dispatch(&mut sym, order);
        self.run_triggers(&mut sym);
        response
    }

    /// Cancel an order by id, wherever it lives (book or trigger table).
    ///
    /// Cancelling an order that already filled (or never existed) is a
    /// no-op returning not-found.
    pub fn cancel(&self, order_id: &str) -> CancelResponse {
        let Some(symbol) = self.order_symbols.get(order_id).map(|e| e.value().clone()) else {
            return CancelResponse::not_found();
        };
        let Some(state) = self.books.get(&symbol).map(|e| e.value().clone()) else {
            return CancelResponse::not_found();
        };

        let mut sym = state.inner.lock();
        if sym.book.cancel(order_id).is_some() {
            self.order_symbols.remove(order_id);
            self.emit_book_changed(&sym, &symbol);
            debug!(%order_id, %symbol, "cancelled resting order");
            return CancelResponse::cancelled();
        }
        if let Some(position) = sym.trigger_position(order_id) {
            let mut order = sym.triggers.remove(position);
            order.cancel();
            self.order_symbols.remove(order_id);
            debug!(%order_id, %symbol, "cancelled trigger order");
            return CancelResponse::cancelled();
        }
        // The routing entry outlived the order; drop it.
        self.order_symbols.remove(order_id);
        CancelResponse::not_found()
    }

    /// Best bid and offer for a symbol. Unknown symbols report an empty book.
    #[must_use]
    pub fn bbo(&self, symbol: &str) -> (Option<Decimal>, Option<Decimal>) {
        self.with_symbol(symbol, |sym| sym.book.bbo()).unwrap_or((None, None))
    }

    /// Spread for a symbol, when both sides are populated.
    #[must_use]
    pub fn spread(&self, symbol: &str) -> Option<Decimal> {
        self.with_symbol(symbol, |sym| sym.book.spread()).flatten()
    }

    /// BBO midpoint for a symbol, when both sides are populated.
    #[must_use]
    pub fn mid_price(&self, symbol: &str) -> Option<Decimal> {
        self.with_symbol(symbol, |sym| sym.book.mid_price()).flatten()
    }

    /// Price of the most recent trade on a symbol.
    #[must_use]
    pub fn last_trade_price(&self, symbol: &str) -> Option<Decimal> {
        self.with_symbol(symbol, |sym| sym.book.last_trade_price())
            .flatten()
    }

    /// Aggregated L2 view of a symbol's book, `depth` levels per side.
    #[must_use]
    pub fn l2(&self, symbol: &str, depth: usize) -> DepthSnapshot {
        self.with_symbol(symbol, |sym| sym.book.l2_snapshot(depth))
            .unwrap_or_default()
    }

    /// Retained trades for a symbol, newest last. With `since_trade_id`,
    /// only trades after that id are returned.
    #[must_use]
    pub fn recent_trades(&self, symbol: &str, since_trade_id: Option<u64>) -> Vec<Trade> {
        self.with_symbol(symbol, |sym| sym.trades_since(since_trade_id))
            .unwrap_or_default()
    }

    /// Look up a live (resting or parked) order by id.
    #[must_use]
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        let symbol = self.order_symbols.get(order_id).map(|e| e.value().clone())?;
        self.with_symbol(&symbol, |sym| {
            sym.book
                .get_order(order_id)
                .cloned()
                .or_else(|| sym.trigger_position(order_id).map(|i| sym.triggers[i].clone()))
        })
        .flatten()
    }

    /// Number of orders resting in a symbol's book.
    #[must_use]
    pub fn open_order_count(&self, symbol: &str) -> usize {
        self.with_symbol(symbol, |sym| sym.book.open_order_count())
            .unwrap_or(0)
    }

    /// All symbols the engine has state for.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|e| e.key().clone()).collect()
    }

    /// Subscribe to a symbol's market event stream. The channel is bounded;
    /// subscribers that fall too far behind observe a lag and are dropped.
    pub fn events(&self, symbol: &str) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe(symbol)
    }

    /// Capture a point-in-time snapshot of every symbol's persistent state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let mut symbols = BTreeMap::new();
        for entry in self.books.iter() {
            let sym = entry.value().inner.lock();
            symbols.insert(
                entry.key().clone(),
                SymbolSnapshot {
                    open_orders: sym.book.open_orders().cloned().collect(),
                    triggers: sym.triggers.clone(),
                    last_trade_price: sym.book.last_trade_price(),
                    recent_trades: sym.recent_trades.iter().cloned().collect(),
                },
            );
        }
        EngineSnapshot::new(symbols)
    }

    /// Write a snapshot to the configured path atomically.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        SnapshotStore::write(&self.config.persist_path, &self.snapshot())
    }

    /// Rebuild engine state from a snapshot. Open orders are re-added in
    /// their recorded order, which restores per-level FIFO; trigger tables
    /// keep their insertion order; the trade-id counter resumes after the
    /// highest restored trade id.
    pub(crate) fn apply_snapshot(&self, snapshot: EngineSnapshot) {
        for (symbol, data) in snapshot.symbols {
            let state = self.symbol_state(&symbol);
            let mut sym = state.inner.lock();
            for order in data.open_orders {
                self.order_symbols
                    .insert(order.order_id.clone(), symbol.clone());
                sym.book.add_limit(order);
            }
            for order in data.triggers {
                self.order_symbols
                    .insert(order.order_id.clone(), symbol.clone());
                sym.triggers.push(order);
            }
            sym.book.set_last_trade_price(data.last_trade_price);
            sym.recent_trades = data.recent_trades.into();
            while sym.recent_trades.len() > self.config.recent_trades_limit {
                sym.recent_trades.pop_front();
            }
            sym.next_trade_id = sym
                .recent_trades
                .iter()
                .map(|t| t.trade_id)
                .max()
                .map_or(1, |max| max + 1);
            info!(
                %symbol,
                open_orders = sym.book.open_order_count(),
                triggers = sym.triggers.len(),
                "restored symbol from snapshot"
            );
        }
    }

    // ---- internals -------------------------------------------------------

    fn validate(&self, request: &OrderRequest) -> Result<(), EngineError> {
        let limits = (
            self.config.max_significant_digits,
            self.config.max_fractional_digits,
        );
        if request.symbol.trim().is_empty() {
            return Err(EngineError::Validation(
                "symbol must not be empty".to_string(),
            ));
        }
        if request.quantity <= Decimal::ZERO {
            return Err(EngineError::Validation(
                "quantity must be positive".to_string(),
            ));
        }
        if !within_precision_limits(&request.quantity, limits.0, limits.1) {
            return Err(EngineError::Validation(
                "quantity exceeds precision limits".to_string(),
            ));
        }

        match request.order_type {
            OrderType::Market | OrderType::Stop | OrderType::TakeProfit
                if request.price.is_some() =>
            {
                return Err(EngineError::Validation(format!(
                    "{} orders must not carry a price",
                    request.order_type
                )));
            }
            _ => {}
        }
        if request.order_type.requires_price() {
            match request.price {
                None => {
                    return Err(EngineError::Validation(format!(
                        "{} orders require a price",
                        request.order_type
                    )));
                }
                Some(price) if price <= Decimal::ZERO => {
                    return Err(EngineError::Validation(
                        "price must be positive".to_string(),
                    ));
                }
                Some(price) if !within_precision_limits(&price, limits.0, limits.1) => {
                    return Err(EngineError::Validation(
                        "price exceeds precision limits".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        match request.order_type {
            OrderType::Stop | OrderType::StopLimit => match request.stop_price {
                None => {
                    return Err(EngineError::Validation(format!(
                        "{} orders require a stop_price",
                        request.order_type
                    )));
                }
                Some(stop) if stop <= Decimal::ZERO => {
                    return Err(EngineError::Validation(
                        "stop_price must be positive".to_string(),
                    ));
                }
                Some(_) => {}
            },
            OrderType::TakeProfit => match request.take_profit_price {
                None => {
                    return Err(EngineError::Validation(
                        "take_profit orders require a take_profit_price".to_string(),
                    ));
                }
                Some(target) if target <= Decimal::ZERO => {
                    return Err(EngineError::Validation(
                        "take_profit_price must be positive".to_string(),
                    ));
                }
                Some(_) => {}
            },
            _ => {}
        }
        Ok(())
    }

    /// Turn a validated request into an accepted order with an engine id.
    fn accept(&self, request: OrderRequest) -> Order {
        let quantity = request.quantity.normalize();
        Order {
            order_id: Uuid::new_v4().to_string(),
            client_order_id: request.client_order_id,
            symbol: request.symbol,
            side: request.side,
            order_type: request.order_type,
            price: request.price.map(|p| p.normalize()),
            stop_price: request.stop_price.map(|p| p.normalize()),
            take_profit_price: request.take_profit_price.map(|p| p.normalize()),
            quantity,
            remaining: quantity,
            filled: Decimal::ZERO,
            status: OrderStatus::New,
            created_at: utils::now_utc(),
        }
    }

    fn symbol_state(&self, symbol: &str) -> Arc<SymbolState> {
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(SymbolState::new(symbol)))
            .value()
            .clone()
    }

    fn with_symbol<R>(&self, symbol: &str, f: impl FnOnce(&SymbolBook) -> R) -> Option<R> {
        let state = self.books.get(symbol)?.value().clone();
        let sym = state.inner.lock();
        Some(f(&sym))
    }

    fn dispatch(&self, sym: &mut SymbolBook, order: Order) -> OrderResponse {
        debug!(
            symbol = %order.symbol,
            order_id = %order.order_id,
            side = %order.side,
            order_type = %order.order_type,
            quantity = %order.quantity,
            "dispatching order"
        );
        match order.order_type {
            OrderType::Market | OrderType::Limit | OrderType::Ioc => {
                self.execute_book_order(sym, order)
            }
            OrderType::Fok => {
                if !sym
                    .book
                    .fok_precheck(order.side, order.price, order.remaining)
                {
                    let mut order = order;
                    order.status = OrderStatus::Rejected;
                    let reason = EngineError::InsufficientLiquidity {
                        symbol: order.symbol.clone(),
                        requested: order.quantity,
                    };
                    let mut response = OrderResponse::from_order(&order, Vec::new());
                    response.reason = Some(reason.to_string());
                    return response;
                }
                self.execute_book_order(sym, order)
            }
            OrderType::Stop | OrderType::StopLimit | OrderType::TakeProfit => {
                self.park_trigger(sym, order)
            }
        }
    }

    /// Run a market/limit/ioc/fok order through the book and settle its
    /// trades. Limit remainders rest; market and IOC remainders cancel.
    ///
    /// Exactly one book-changed event is emitted per book mutation, after
    /// any remainder has rested, so subscribers never see a transient depth
    /// state missing the taker's own resting quantity.
    fn execute_book_order(&self, sym: &mut SymbolBook, mut order: Order) -> OrderResponse {
        let symbol = order.symbol.clone();
        let fills = sym.book.match_order(&mut order);
        let traded = !fills.is_empty();
        let trades = self.settle(sym, &order, fills);
        let rests = order.order_type == OrderType::Limit && order.remaining > Decimal::ZERO;

        let response = match order.order_type {
            OrderType::Limit if order.remaining > Decimal::ZERO => {
                self.order_symbols
                    .insert(order.order_id.clone(), order.symbol.clone());
                let response = OrderResponse::from_order(&order, trades);
                sym.book.add_limit(order);
                response
            }
            OrderType::Market | OrderType::Ioc if order.remaining > Decimal::ZERO => {
                order.cancel();
                OrderResponse::from_order(&order, trades)
            }
            _ => OrderResponse::from_order(&order, trades),
        };

        if traded || rests {
            self.emit_book_changed(sym, &symbol);
        }
        response
    }

    /// Park a trigger order, or activate it immediately when its condition
    /// already holds at placement.
    fn park_trigger(&self, sym: &mut SymbolBook, mut order: Order) -> OrderResponse {
        order.status = OrderStatus::PendingTrigger;
        if triggers::should_fire(&sym.book, &order) {
            debug!(
                order_id = %order.order_id,
                "trigger condition already met at placement, activating"
            );
            return self.activate(sym, order);
        }
        self.order_symbols
            .insert(order.order_id.clone(), order.symbol.clone());
        sym.triggers.push(order.clone());
        OrderResponse::from_order(&order, Vec::new())
    }

    /// Activate a fired trigger order through the normal matching path.
    fn activate(&self, sym: &mut SymbolBook, order: Order) -> OrderResponse {
        let order = triggers::activation_order(order);
        debug!(
            order_id = %order.order_id,
            order_type = %order.order_type,
            "activating trigger order"
        );
        self.execute_book_order(sym, order)
    }

    /// Evaluate the trigger table until a full pass fires nothing. Each
    /// activation removes an order from the table and may move the market,
    /// so the scan restarts until quiescent. Activated orders never return
    /// to the table.
    fn run_triggers(&self, sym: &mut SymbolBook) {
        loop {
            let mut fired = 0usize;
            let mut index = 0usize;
            while index < sym.triggers.len() {
                if triggers::should_fire(&sym.book, &sym.triggers[index]) {
                    let order = sym.triggers.remove(index);
                    self.order_symbols.remove(&order.order_id);
                    fired += 1;
                    let _ = self.activate(sym, order);
                } else {
                    index += 1;
                }
            }
            if fired == 0 {
                break;
            }
        }
    }

    /// Turn fills into trades: allocate ids, stamp the time, assign fees,
    /// record into the retention window and emit the trade events. The
    /// caller emits the book-changed event once the book reached its final
    /// post-submit state.
    fn settle(&self, sym: &mut SymbolBook, taker: &Order, fills: Vec<crate::orderbook::Fill>) -> Vec<Trade> {
        if fills.is_empty() {
            return Vec::new();
        }
        let timestamp = utils::now_utc();
        let trades: Vec<Trade> = fills
            .into_iter()
            .map(|fill| {
                let notional = fill.price * fill.quantity;
                Trade {
                    trade_id: sym.allocate_trade_id(),
                    symbol: taker.symbol.clone(),
                    price: fill.price,
                    quantity: fill.quantity,
                    aggressor_side: taker.side,
                    maker_order_id: fill.maker_order_id,
                    taker_order_id: taker.order_id.clone(),
                    timestamp,
                    maker_fee: self.fees.maker_fee(notional),
                    taker_fee: self.fees.taker_fee(notional),
                }
            })
            .collect();

        // Makers that filled completely are gone from the book; drop their
        // cancel-routing entries.
        for trade in &trades {
            if !sym.book.contains(&trade.maker_order_id) {
                self.order_symbols.remove(&trade.maker_order_id);
            }
        }

        sym.record_trades(&trades, self.config.recent_trades_limit);
        for trade in &trades {
            self.events.emit(
                &taker.symbol,
                MarketEvent::Trade(TradeEvent {
                    symbol: taker.symbol.clone(),
                    trade: trade.clone(),
                }),
            );
        }
        trades
    }

    fn emit_book_changed(&self, sym: &SymbolBook, symbol: &str) {
        self.events.emit(
            symbol,
            MarketEvent::BookChanged(BookChangedEvent {
                symbol: symbol.to_string(),
                depth: sym.book.l2_snapshot(self.config.event_depth),
                last_trade_price: sym.book.last_trade_price(),
                timestamp: utils::now_utc(),
            }),
        );
    }
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("symbols", &self.books.len())
            .field("fees", &self.fees)
            .finish_non_exhaustive()
    }
}
