//! Domain types shared by the order book, matching engine and persistence.

mod order;
mod request;
mod trade;

pub use order::{Order, OrderStatus};
pub use request::{CancelResponse, DepthLevel, DepthSnapshot, OrderRequest, OrderResponse};
pub use trade::Trade;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bid side.
    Buy,
    /// Ask side.
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    #[must_use]
    #[inline]
    pub fn contra(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Supported order types.
///
/// `Stop`, `StopLimit` and `TakeProfit` park off-book until their price
/// condition holds, then re-enter the matching path as `Market` or `Limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute immediately at the best available prices; never rests.
    Market,
    /// Execute up to the limit price; any remainder rests in the book.
    Limit,
    /// Immediate-or-cancel: match what is possible now, cancel the rest.
    Ioc,
    /// Fill-or-kill: fill the whole quantity immediately or do nothing.
    Fok,
    /// Stop-market: becomes a market order once the stop price is reached.
    Stop,
    /// Stop-limit: becomes a limit order once the stop price is reached.
    StopLimit,
    /// Take-profit: becomes a market order once the target price is reached.
    TakeProfit,
}

impl OrderType {
    /// True for the trigger family that parks in the trigger table.
    #[must_use]
    #[inline]
    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            OrderType::Stop | OrderType::StopLimit | OrderType::TakeProfit
        )
    }

    /// True when this type must carry a limit price.
    #[must_use]
    #[inline]
    pub fn requires_price(&self) -> bool {
        matches!(
            self,
            OrderType::Limit | OrderType::Ioc | OrderType::Fok | OrderType::StopLimit
        )
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Ioc => "ioc",
            OrderType::Fok => "fok",
            OrderType::Stop => "stop",
            OrderType::StopLimit => "stop_limit",
            OrderType::TakeProfit => "take_profit",
        };
        write!(f, "{name}")
    }
}

/// Count of significant digits in a decimal, ignoring sign and trailing zeros.
#[must_use]
pub fn significant_digits(value: &Decimal) -> u32 {
    let mantissa = value.normalize().mantissa().unsigned_abs();
    if mantissa == 0 {
        return 1;
    }
    let mut digits = 0;
    let mut m = mantissa;
    while m > 0 {
        digits += 1;
        m /= 10;
    }
    digits
}

/// Validate a decimal against the configured precision limits: at most
/// `max_significant` significant digits and `max_fractional` fractional
/// digits after trailing zeros are stripped.
#[must_use]
pub fn within_precision_limits(value: &Decimal, max_significant: u32, max_fractional: u32) -> bool {
    let normalized = value.normalize();
    normalized.scale() <= max_fractional && significant_digits(value) <= max_significant
}
