//! Core order book: two sorted ladders of price levels plus an order index.

use super::level::PriceLevel;
use crate::types::{DepthLevel, DepthSnapshot, Order, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// A limit order book for one symbol.
///
/// Bids are traversed best-to-worst in descending key order, asks in
/// ascending key order. The `order_index` maps live order ids to their
/// (side, price) location so cancellation does not scan the ladders. All
/// methods assume the caller serializes access per symbol; the engine holds
/// a mutex around every mutation.
#[derive(Debug)]
pub struct OrderBook {
    /// The symbol this book belongs to.
    pub(super) symbol: String,
    /// Bid price levels keyed by price.
    pub(super) bids: BTreeMap<Decimal, PriceLevel>,
    /// Ask price levels keyed by price.
    pub(super) asks: BTreeMap<Decimal, PriceLevel>,
    /// Live order id → (side, level price).
    pub(super) order_index: HashMap<String, (Side, Decimal)>,
    /// Price of the most recent execution in this book.
    pub(super) last_trade_price: Option<Decimal>,
}

impl OrderBook {
    /// Create an empty book for `symbol`.
    #[must_use]
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
            last_trade_price: None,
        }
    }

    /// The symbol of this book.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Rest a limit order at the tail of its price level, creating the level
    /// if absent. Callers guarantee `remaining > 0` and a price.
    pub fn add_limit(&mut self, order: Order) {
        let Some(price) = order.price else {
            return;
        };
        trace!(
            symbol = %self.symbol,
            order_id = %order.order_id,
            side = %order.side,
            %price,
            remaining = %order.remaining,
            "resting limit order"
        );
        self.order_index
            .insert(order.order_id.clone(), (order.side, price));
        let ladder = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        ladder
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order);
    }

    /// Cancel a resting order by id. Returns the removed order with its
    /// status set to cancelled, or `None` when the id is not resting here.
    pub fn cancel(&mut self, order_id: &str) -> Option<Order> {
        let (side, price) = self.order_index.remove(order_id)?;
        let ladder = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = ladder.get_mut(&price)?;
        let mut order = level.remove(order_id)?;
        if level.is_empty() {
            ladder.remove(&price);
        }
        order.cancel();
        trace!(
            symbol = %self.symbol,
            %order_id,
            side = %side,
            %price,
            "cancelled resting order"
        );
        Some(order)
    }

    /// Look up a resting order by id.
    #[must_use]
    pub fn get_order(&self, order_id: &str) -> Option<&Order> {
        let (side, price) = self.order_index.get(order_id)?;
        let ladder = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        ladder.get(price)?.get(order_id)
    }

    /// True when `order_id` is resting in this book.
    #[must_use]
    pub fn contains(&self, order_id: &str) -> bool {
        self.order_index.contains_key(order_id)
    }

    /// Number of orders resting in the book.
    #[must_use]
    pub fn open_order_count(&self) -> usize {
        self.order_index.len()
    }

    /// Highest resting bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest resting ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Best bid and offer. Either side may be empty.
    #[must_use]
    pub fn bbo(&self) -> (Option<Decimal>, Option<Decimal>) {
        (self.best_bid(), self.best_ask())
    }

    /// Spread (best ask − best bid), when both sides exist.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match self.bbo() {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of the BBO, when both sides exist.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match self.bbo() {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Price of the most recent trade in this book.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<Decimal> {
        self.last_trade_price
    }

    /// Restore the last trade price, used by snapshot recovery.
    pub fn set_last_trade_price(&mut self, price: Option<Decimal>) {
        self.last_trade_price = price;
    }

    /// Aggregated top-of-book view: up to `depth` levels per side,
    /// best-to-worst, as (price, total remaining) pairs. Individual order
    /// identities never leak through this projection.
    #[must_use]
    pub fn l2_snapshot(&self, depth: usize) -> DepthSnapshot {
        let bids = self
            .bids
            .values()
            .rev()
            .take(depth)
            .map(|level| DepthLevel {
                price: level.price,
                quantity: level.total_remaining(),
            })
            .collect();
        let asks = self
            .asks
            .values()
            .take(depth)
            .map(|level| DepthLevel {
                price: level.price,
                quantity: level.total_remaining(),
            })
            .collect();
        DepthSnapshot { bids, asks }
    }

    /// Would an incoming order of `side` at `price` (None for market)
    /// execute against the current contra best?
    #[must_use]
    pub fn crossable(&self, side: Side, price: Option<Decimal>) -> bool {
        match side {
            Side::Buy => match (self.best_ask(), price) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(ask), Some(limit)) => ask <= limit,
            },
            Side::Sell => match (self.best_bid(), price) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(bid), Some(limit)) => bid >= limit,
            },
        }
    }

    /// Every resting order, bids best-to-worst then asks best-to-worst, each
    /// level in queue order. This is the deterministic traversal snapshots
    /// are built from.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.bids
            .values()
            .rev()
            .flat_map(|level| level.iter())
            .chain(self.asks.values().flat_map(|level| level.iter()))
    }
}
