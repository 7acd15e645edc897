//! Market event stream: trades and book changes fanned out per symbol.
//!
//! Channels are bounded broadcast queues. A subscriber that stops draining
//! falls behind, observes a lag error from the channel and is effectively
//! dropped; matching never waits for subscribers.

use crate::types::{DepthSnapshot, Trade};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;

/// A trade execution notification.
#[derive(Debug, Clone, Serialize)]
pub struct TradeEvent {
    /// The symbol the trade occurred on.
    pub symbol: String,
    /// The trade itself.
    pub trade: Trade,
}

/// An aggregated book-state notification, emitted after the mutation that
/// caused it so subscribers always see a trade before the L2 state that
/// reflects it.
#[derive(Debug, Clone, Serialize)]
pub struct BookChangedEvent {
    /// The symbol whose book changed.
    pub symbol: String,
    /// Top-of-book levels after the change.
    pub depth: DepthSnapshot,
    /// Last trade price after the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_price: Option<Decimal>,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

/// Either kind of market event carried on a symbol's stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A trade executed.
    Trade(TradeEvent),
    /// The aggregated book changed.
    BookChanged(BookChangedEvent),
}

/// Per-symbol broadcast channels, created lazily on first use.
pub(crate) struct EventBus {
    channels: DashMap<String, broadcast::Sender<MarketEvent>>,
    capacity: usize,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Subscribe to a symbol's event stream.
    pub(crate) fn subscribe(&self, symbol: &str) -> broadcast::Receiver<MarketEvent> {
        self.channels
            .entry(symbol.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Emit an event to a symbol's subscribers, if any. Send failures mean
    /// every receiver is gone; the event is dropped, never retried.
    pub(crate) fn emit(&self, symbol: &str, event: MarketEvent) {
        if let Some(sender) = self.channels.get(symbol) {
            let _ = sender.send(event);
        }
    }
}
