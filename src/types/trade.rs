//! The trade entity produced by the matching loop.

use super::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One execution between a resting maker order and an aggressing taker.
///
/// Immutable once created. Trade ids are monotonically increasing within a
/// symbol, which is what makes the `since_trade_id` query and recovery-time
/// counter resumption work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Per-symbol monotone sequence number.
    pub trade_id: u64,
    /// Trading symbol.
    pub symbol: String,
    /// Execution price: always the maker's resting price.
    pub price: Decimal,
    /// Executed quantity.
    pub quantity: Decimal,
    /// Side of the aggressing (taker) order.
    pub aggressor_side: Side,
    /// The resting order that provided liquidity.
    pub maker_order_id: String,
    /// The incoming order that crossed the spread.
    pub taker_order_id: String,
    /// Execution time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Fee charged to the maker on the notional. Negative is a rebate.
    pub maker_fee: Decimal,
    /// Fee charged to the taker on the notional.
    pub taker_fee: Decimal,
}

impl Trade {
    /// Notional value of this trade (price × quantity).
    #[must_use]
    #[inline]
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}
