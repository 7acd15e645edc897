//! Trigger-order activation conditions.
//!
//! Stop, stop-limit and take-profit orders park off-book until the market
//! reaches their trigger price, then re-enter the matching path as market or
//! limit orders. Conditions consider both the last trade price and the
//! relevant side of the BBO, so a book that gaps through a trigger price
//! still fires it.

use crate::orderbook::OrderBook;
use crate::types::{Order, OrderStatus, OrderType, Side};
use rust_decimal::Decimal;

#[inline]
fn at_or_above(observed: Option<Decimal>, threshold: Decimal) -> bool {
    observed.is_some_and(|v| v >= threshold)
}

#[inline]
fn at_or_below(observed: Option<Decimal>, threshold: Decimal) -> bool {
    observed.is_some_and(|v| v <= threshold)
}

/// Does `order`'s trigger condition hold against the current book?
///
/// | type               | fires when                                        |
/// |--------------------|---------------------------------------------------|
/// | stop(_limit), buy  | last trade ≥ stop price OR best ask ≥ stop price  |
/// | stop(_limit), sell | last trade ≤ stop price OR best bid ≤ stop price  |
/// | take_profit, sell  | last trade ≥ target OR best bid ≥ target          |
/// | take_profit, buy   | last trade ≤ target OR best ask ≤ target          |
pub(crate) fn should_fire(book: &OrderBook, order: &Order) -> bool {
    match order.order_type {
        OrderType::Stop | OrderType::StopLimit => {
            let Some(stop) = order.stop_price else {
                return false;
            };
            match order.side {
                Side::Buy => {
                    at_or_above(book.last_trade_price(), stop)
                        || at_or_above(book.best_ask(), stop)
                }
                Side::Sell => {
                    at_or_below(book.last_trade_price(), stop)
                        || at_or_below(book.best_bid(), stop)
                }
            }
        }
        OrderType::TakeProfit => {
            let Some(target) = order.take_profit_price else {
                return false;
            };
            match order.side {
                Side::Sell => {
                    at_or_above(book.last_trade_price(), target)
                        || at_or_above(book.best_bid(), target)
                }
                Side::Buy => {
                    at_or_below(book.last_trade_price(), target)
                        || at_or_below(book.best_ask(), target)
                }
            }
        }
        _ => false,
    }
}

/// Convert a fired trigger order into the order it executes as: stop and
/// take_profit become market orders, stop_limit becomes a limit at its
/// limit price. The trigger price fields stay on the order for audit.
pub(crate) fn activation_order(mut order: Order) -> Order {
    order.status = OrderStatus::New;
    match order.order_type {
        OrderType::Stop | OrderType::TakeProfit => {
            order.order_type = OrderType::Market;
            order.price = None;
        }
        OrderType::StopLimit => {
            order.order_type = OrderType::Limit;
        }
        _ => {}
    }
    order
}
