//! Per-symbol mutable state guarded by the symbol lock.

use crate::orderbook::OrderBook;
use crate::types::{Order, Trade};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Everything the engine owns for one symbol, behind its mutex.
///
/// The lock is held for the full duration of a submit or cancel, including
/// trigger re-entry, which is what serializes all mutations per symbol.
pub(crate) struct SymbolState {
    pub(crate) inner: Mutex<SymbolBook>,
}

impl SymbolState {
    pub(crate) fn new(symbol: &str) -> Self {
        Self {
            inner: Mutex::new(SymbolBook::new(symbol)),
        }
    }
}

/// The state under a symbol's lock: book, trigger table, recent trades and
/// the monotone trade-id counter.
pub(crate) struct SymbolBook {
    /// The resting book.
    pub(crate) book: OrderBook,
    /// Untriggered stop / stop_limit / take_profit orders in insertion
    /// order. Orders here are not in the book's order index.
    pub(crate) triggers: Vec<Order>,
    /// Bounded window of the most recent trades, oldest first.
    pub(crate) recent_trades: VecDeque<Trade>,
    /// Next trade id to allocate. Ids start at 1 and only grow.
    pub(crate) next_trade_id: u64,
}

impl SymbolBook {
    pub(crate) fn new(symbol: &str) -> Self {
        Self {
            book: OrderBook::new(symbol),
            triggers: Vec::new(),
            recent_trades: VecDeque::new(),
            next_trade_id: 1,
        }
    }

    /// Allocate the next trade id.
    pub(crate) fn allocate_trade_id(&mut self) -> u64 {
        let id = self.next_trade_id;
        self.next_trade_id += 1;
        id
    }

    /// Append trades to the retention window, evicting the oldest past `cap`.
    pub(crate) fn record_trades(&mut self, trades: &[Trade], cap: usize) {
        for trade in trades {
            self.recent_trades.push_back(trade.clone());
        }
        while self.recent_trades.len() > cap {
            self.recent_trades.pop_front();
        }
    }

    /// Retained trades, optionally only those after `since_trade_id`.
    pub(crate) fn trades_since(&self, since_trade_id: Option<u64>) -> Vec<Trade> {
        match since_trade_id {
            None => self.recent_trades.iter().cloned().collect(),
            Some(since) => self
                .recent_trades
                .iter()
                .filter(|t| t.trade_id > since)
                .cloned()
                .collect(),
        }
    }

    /// Find a parked trigger order by id.
    pub(crate) fn trigger_position(&self, order_id: &str) -> Option<usize> {
        self.triggers.iter().position(|o| o.order_id == order_id)
    }
}
