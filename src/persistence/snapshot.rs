//! The snapshot document schema.
//!
//! A snapshot is one self-contained JSON document; there is no delta log.
//! Symbols are kept in a sorted map and orders in their book traversal
//! order, so capturing the same state twice produces identical bytes.

use crate::types::{Order, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persistent state of one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    /// Resting limit orders, bids best-to-worst then asks best-to-worst,
    /// each level front-to-back. Replaying `add_limit` in this order
    /// restores per-level FIFO exactly.
    pub open_orders: Vec<Order>,
    /// Trigger-table orders in their insertion order.
    pub triggers: Vec<Order>,
    /// Last trade price; survives restarts.
    pub last_trade_price: Option<Decimal>,
    /// Retained trades, oldest first.
    pub recent_trades: Vec<Trade>,
}

/// The full persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// Per-symbol state, sorted by symbol.
    pub symbols: BTreeMap<String, SymbolSnapshot>,
}

impl EngineSnapshot {
    /// Wrap per-symbol state in a current-version document.
    #[must_use]
    pub fn new(symbols: BTreeMap<String, SymbolSnapshot>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            symbols,
        }
    }
}
