//! Price-time priority and sweep behaviour through the engine API.

use crate::common::*;
use matchbook_rs::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SYMBOL: &str = "BTC-USD";

#[test]
fn test_resting_liquidity_and_sweep() {
    let engine = test_engine();

    let first = submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(1));
    assert_eq!(first.status, OrderStatus::New);
    assert!(first.trades.is_empty());
    assert_eq!(first.remaining_quantity, dec!(1));
    let a = first.order_id.clone();

    let second = submit_limit(&engine, SYMBOL, Side::Sell, dec!(30010), dec!(2));
    assert_eq!(second.remaining_quantity, dec!(2));
    let b = second.order_id.clone();

    let taker = submit_market(&engine, SYMBOL, Side::Buy, dec!(1.5));
    assert_eq!(taker.status, OrderStatus::Filled);
    assert_eq!(taker.filled_quantity, dec!(1.5));
    assert_eq!(taker.remaining_quantity, Decimal::ZERO);
    assert_eq!(taker.trades.len(), 2);

    assert_eq!(taker.trades[0].maker_order_id, a);
    assert_eq!(taker.trades[0].price, dec!(30000));
    assert_eq!(taker.trades[0].quantity, dec!(1));
    assert_eq!(taker.trades[1].maker_order_id, b);
    assert_eq!(taker.trades[1].price, dec!(30010));
    assert_eq!(taker.trades[1].quantity, dec!(0.5));

    // Post-state: 1.5 left at 30010, last trade at the second level.
    assert_eq!(engine.bbo(SYMBOL), (None, Some(dec!(30010))));
    let depth = engine.l2(SYMBOL, 20);
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.asks[0].quantity, dec!(1.5));
    assert_eq!(engine.last_trade_price(SYMBOL), Some(dec!(30010)));
}

#[test]
fn test_no_trade_through_on_limit() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(2));

    // A buy limit above the best ask executes at the maker's price, never
    // at its own.
    let taker = submit_limit(&engine, SYMBOL, Side::Buy, dec!(30005), dec!(1));
    assert_eq!(taker.status, OrderStatus::Filled);
    assert_eq!(taker.trades.len(), 1);
    assert_eq!(taker.trades[0].price, dec!(30000));
    assert_eq!(taker.trades[0].quantity, dec!(1));

    let depth = engine.l2(SYMBOL, 20);
    assert_eq!(depth.asks[0].price, dec!(30000));
    assert_eq!(depth.asks[0].quantity, dec!(1));
    assert!(depth.bids.is_empty());
}

#[test]
fn test_cancellation_preserves_fifo() {
    let engine = test_engine();
    let x = submit_limit(&engine, SYMBOL, Side::Buy, dec!(30000), dec!(1)).order_id;
    let y = submit_limit(&engine, SYMBOL, Side::Buy, dec!(30000), dec!(1)).order_id;
    let z = submit_limit(&engine, SYMBOL, Side::Buy, dec!(30000), dec!(1)).order_id;

    assert!(engine.cancel(&y).ok);

    let taker = submit_market(&engine, SYMBOL, Side::Sell, dec!(2));
    assert_eq!(taker.trades.len(), 2);
    assert_eq!(taker.trades[0].maker_order_id, x);
    assert_eq!(taker.trades[1].maker_order_id, z);
    assert_eq!(engine.open_order_count(SYMBOL), 0);
}

#[test]
fn test_partial_maker_keeps_queue_position() {
    let engine = test_engine();
    let head = submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(2)).order_id;
    let tail = submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(1)).order_id;

    let taker = submit_market(&engine, SYMBOL, Side::Buy, dec!(1));
    assert_eq!(taker.trades.len(), 1);
    assert_eq!(taker.trades[0].maker_order_id, head);

    // The partially filled head still trades before the tail.
    let taker = submit_market(&engine, SYMBOL, Side::Buy, dec!(1.5));
    assert_eq!(taker.trades.len(), 2);
    assert_eq!(taker.trades[0].maker_order_id, head);
    assert_eq!(taker.trades[0].quantity, dec!(1));
    assert_eq!(taker.trades[1].maker_order_id, tail);
    assert_eq!(taker.trades[1].quantity, dec!(0.5));
}

#[test]
fn test_symbols_are_independent() {
    let engine = test_engine();
    submit_limit(&engine, "BTC-USD", Side::Sell, dec!(30000), dec!(1));
    submit_limit(&engine, "ETH-USD", Side::Sell, dec!(2000), dec!(5));

    let taker = submit_market(&engine, "ETH-USD", Side::Buy, dec!(1));
    assert_eq!(taker.trades[0].price, dec!(2000));

    assert_eq!(engine.bbo("BTC-USD"), (None, Some(dec!(30000))));
    assert_eq!(engine.last_trade_price("BTC-USD"), None);
    assert_eq!(engine.last_trade_price("ETH-USD"), Some(dec!(2000)));

    let mut symbols = engine.symbols();
    symbols.sort();
    assert_eq!(symbols, vec!["BTC-USD", "ETH-USD"]);
}

#[test]
fn test_trade_ids_are_monotone_per_symbol() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(3));
    submit_market(&engine, SYMBOL, Side::Buy, dec!(1));
    submit_market(&engine, SYMBOL, Side::Buy, dec!(1));
    submit_market(&engine, SYMBOL, Side::Buy, dec!(1));

    let trades = engine.recent_trades(SYMBOL, None);
    let ids: Vec<u64> = trades.iter().map(|t| t.trade_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let incremental = engine.recent_trades(SYMBOL, Some(1));
    assert_eq!(incremental.len(), 2);
    assert_eq!(incremental[0].trade_id, 2);
}
