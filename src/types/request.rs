//! Typed request/response shapes consumed by transport layers.
//!
//! All decimals cross the boundary as canonical decimal strings and all
//! timestamps as ISO-8601 UTC with a trailing `Z`.

use super::{Order, OrderStatus, OrderType, Side, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A new-order request as submitted by a caller.
///
/// `order_id` is assigned by the engine on acceptance; callers may attach a
/// `client_order_id` which is echoed back untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trading symbol, e.g. `BTC-USD`.
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Requested order type.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price, required for limit/ioc/fok/stop_limit and forbidden for
    /// market/stop/take_profit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Trigger price for stop and stop_limit orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Trigger price for take_profit orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<Decimal>,
    /// Order quantity, must be positive.
    pub quantity: Decimal,
    /// Opaque caller reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// Convenience constructor for a limit order request.
    #[must_use]
    pub fn limit(symbol: &str, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            stop_price: None,
            take_profit_price: None,
            quantity,
            client_order_id: None,
        }
    }

    /// Convenience constructor for a market order request.
    #[must_use]
    pub fn market(symbol: &str, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            price: None,
            stop_price: None,
            take_profit_price: None,
            quantity,
            client_order_id: None,
        }
    }
}

/// The synchronous result of a submit call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Engine-assigned order id. Empty string on validation rejects, which
    /// never allocate an id.
    pub order_id: String,
    /// Echo of the caller's reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Final status of the order as of the submit returning.
    pub status: OrderStatus,
    /// Quantity executed during this submit, including trigger activation.
    pub filled_quantity: Decimal,
    /// Quantity still live (resting or parked) when the submit returned.
    pub remaining_quantity: Decimal,
    /// Trades produced directly by this order as taker.
    pub trades: Vec<Trade>,
    /// Reject reason, present only when `status` is `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OrderResponse {
    /// Build the response for an order that went through the book.
    #[must_use]
    pub fn from_order(order: &Order, trades: Vec<Trade>) -> Self {
        Self {
            order_id: order.order_id.clone(),
            client_order_id: order.client_order_id.clone(),
            status: order.status,
            filled_quantity: order.filled,
            remaining_quantity: order.remaining,
            trades,
            reason: None,
        }
    }

    /// Build a rejected response. No order id is allocated and no book state
    /// was touched.
    #[must_use]
    pub fn rejected(request: &OrderRequest, reason: String) -> Self {
        Self {
            order_id: String::new(),
            client_order_id: request.client_order_id.clone(),
            status: OrderStatus::Rejected,
            filled_quantity: Decimal::ZERO,
            remaining_quantity: request.quantity,
            trades: Vec::new(),
            reason: Some(reason),
        }
    }
}

/// The result of a cancel call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// True when a live order was found and cancelled.
    pub ok: bool,
    /// `not_found` when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CancelResponse {
    /// A successful cancellation.
    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    /// The order was unknown, already filled, or already cancelled.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            ok: false,
            reason: Some("not_found".to_string()),
        }
    }
}

/// One aggregated price level in an L2 view: price and total resting
/// quantity, with individual order identities hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Level price.
    pub price: Decimal,
    /// Sum of `remaining` across all orders at this price.
    pub quantity: Decimal,
}

/// An L2 projection of one book: top levels per side, best-to-worst.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Bid levels, highest price first.
    pub bids: Vec<DepthLevel>,
    /// Ask levels, lowest price first.
    pub asks: Vec<DepthLevel>,
}
