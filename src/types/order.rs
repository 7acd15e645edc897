//! The order entity: immutable identity plus the mutable fill state the
//! matching engine updates under the symbol lock.

use super::{OrderType, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order.
///
/// Transitions are monotone: `New` → `PartiallyFilled` → `Filled`; any
/// non-terminal state may move to `Cancelled` or `Rejected`. Trigger orders
/// wait in `PendingTrigger` until activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, nothing executed yet.
    New,
    /// Some quantity executed, some still live.
    PartiallyFilled,
    /// Fully executed. Terminal.
    Filled,
    /// Removed before completion. Terminal.
    Cancelled,
    /// Refused by validation or a failed fill-or-kill pre-check. Terminal.
    Rejected,
    /// Parked in the trigger table awaiting its price condition.
    PendingTrigger,
}

impl OrderStatus {
    /// True once the order can no longer trade.
    #[must_use]
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::New => "new",
            OrderStatus::PartiallyFilled => "partially_filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
            OrderStatus::PendingTrigger => "pending_trigger",
        };
        write!(f, "{name}")
    }
}

/// A single order.
///
/// Quantities satisfy `remaining + filled == quantity` at all times;
/// `remaining` only ever decreases. All mutation happens inside the engine
/// while the symbol lock is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Engine-assigned unique identifier.
    pub order_id: String,
    /// Caller-supplied opaque identifier, echoed back but never indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Trading symbol, e.g. `BTC-USD`.
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Order type; trigger orders are re-typed to market/limit on activation.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price. Present for limit/ioc/fok/stop_limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Trigger price for stop and stop_limit orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Trigger price for take_profit orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    /// Original quantity.
    pub quantity: Decimal,
    /// Quantity still live.
    pub remaining: Decimal,
    /// Quantity already executed.
    pub filled: Decimal,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Acceptance time, UTC.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Record an execution of `quantity` against this order.
    ///
    /// Moves quantity from `remaining` to `filled` and advances the status to
    /// `PartiallyFilled` or `Filled`. Callers guarantee
    /// `quantity <= self.remaining`.
    pub fn fill(&mut self, quantity: Decimal) {
        self.remaining -= quantity;
        self.filled += quantity;
        self.status = if self.remaining.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Cancel whatever is still live on this order.
    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }

    /// True while the order has live quantity in the book.
    #[must_use]
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::New | OrderStatus::PartiallyFilled
        )
    }
}
