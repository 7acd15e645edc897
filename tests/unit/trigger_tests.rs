//! Trigger order parking, activation and re-entry.

use crate::common::*;
use matchbook_rs::prelude::*;
use rust_decimal_macros::dec;

const SYMBOL: &str = "BTC-USD";

#[test]
fn test_stop_sell_activation_after_price_drop() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(1));
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29750), dec!(5));

    // Best bid 29900 is above the stop, so the order parks.
    let stop = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29800), dec!(1)));
    assert_eq!(stop.status, OrderStatus::PendingTrigger);
    assert!(stop.trades.is_empty());
    assert_eq!(stop.remaining_quantity, dec!(1));

    // A market sell consumes the 29900 bid; the new best bid 29750 is at or
    // below the stop price, so the stop fires and sells into it.
    let seller = submit_market(&engine, SYMBOL, Side::Sell, dec!(1));
    assert_eq!(seller.trades.len(), 1);
    assert_eq!(seller.trades[0].price, dec!(29900));

    let trades = engine.recent_trades(SYMBOL, None);
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[1].price, dec!(29750));
    assert_eq!(trades[1].quantity, dec!(1));
    assert_eq!(trades[1].taker_order_id, stop.order_id);
    assert_eq!(engine.l2(SYMBOL, 1).bids[0].quantity, dec!(4));

    // The trigger left the table for good.
    assert!(engine.get_order(&stop.order_id).is_none());
}

#[test]
fn test_stop_already_satisfied_fires_on_placement() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(10));

    // Best bid 29900 ≤ stop 29950: the condition already holds, so the stop
    // activates immediately and the response carries its execution.
    let stop = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29950), dec!(1)));
    assert_eq!(stop.status, OrderStatus::Filled);
    assert_eq!(stop.trades.len(), 1);
    assert_eq!(stop.trades[0].price, dec!(29900));

    let second = submit_market(&engine, SYMBOL, Side::Sell, dec!(1));
    assert_eq!(second.trades.len(), 1);

    // Two trades total, trigger table empty.
    assert_eq!(engine.recent_trades(SYMBOL, None).len(), 2);
    assert!(engine.get_order(&stop.order_id).is_none());
    assert_eq!(engine.l2(SYMBOL, 1).bids[0].quantity, dec!(8));
}

#[test]
fn test_stop_buy_fires_on_rising_last_trade() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30100), dec!(3));

    // Ask 30100 is above the stop 30050... for a stop-buy that means the
    // BBO leg (best ask ≥ stop) holds immediately.
    let stop = engine.submit(stop_request(SYMBOL, Side::Buy, dec!(30050), dec!(1)));
    assert_eq!(stop.status, OrderStatus::Filled);
    assert_eq!(stop.trades[0].price, dec!(30100));
}

#[test]
fn test_stop_buy_parks_below_quiet_market() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(2));

    // Ask 30000 < stop 30500 and no trades yet: parks.
    let stop = engine.submit(stop_request(SYMBOL, Side::Buy, dec!(30500), dec!(2)));
    assert_eq!(stop.status, OrderStatus::PendingTrigger);

    // Trading at 30000 does not reach the stop.
    submit_market(&engine, SYMBOL, Side::Buy, dec!(1));
    assert_eq!(
        engine.get_order(&stop.order_id).unwrap().status,
        OrderStatus::PendingTrigger
    );

    // An ask resting at the stop price satisfies the BBO leg.
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30500), dec!(2));
    submit_market(&engine, SYMBOL, Side::Buy, dec!(1));
    assert!(engine.get_order(&stop.order_id).is_none());
    let trades = engine.recent_trades(SYMBOL, None);
    let last = trades.last().unwrap();
    assert_eq!(last.taker_order_id, stop.order_id);
}

#[test]
fn test_stop_limit_activates_as_resting_limit() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(1));
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29800), dec!(1));

    // Parks: best bid above stop.
    let stop_limit = engine.submit(stop_limit_request(
        SYMBOL,
        Side::Sell,
        dec!(29850),
        dec!(29800),
        dec!(1),
    ));
    assert_eq!(stop_limit.status, OrderStatus::PendingTrigger);

    // Sell through both bids: the last trade at 29800 reaches the stop.
    submit_market(&engine, SYMBOL, Side::Sell, dec!(2));

    // With no bids left the activated limit rests at its own price.
    let activated = engine.get_order(&stop_limit.order_id).unwrap();
    assert_eq!(activated.order_type, OrderType::Limit);
    assert_eq!(activated.status, OrderStatus::New);
    assert_eq!(engine.bbo(SYMBOL), (None, Some(dec!(29800))));
}

#[test]
fn test_take_profit_sell_fires_at_or_above_target() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(30800), dec!(2));

    // Best bid 30800 ≥ target 30750: fires on placement and sells.
    let take_profit = engine.submit(take_profit_request(
        SYMBOL,
        Side::Sell,
        dec!(30750),
        dec!(1),
    ));
    assert_eq!(take_profit.status, OrderStatus::Filled);
    assert_eq!(take_profit.trades[0].price, dec!(30800));
}

#[test]
fn test_take_profit_buy_fires_on_dip() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(30000), dec!(5));

    // Ask 30000 > target 29500: parks.
    let take_profit = engine.submit(take_profit_request(
        SYMBOL,
        Side::Buy,
        dec!(29500),
        dec!(1),
    ));
    assert_eq!(take_profit.status, OrderStatus::PendingTrigger);

    // An ask dropping to the target satisfies the BBO leg the moment it
    // rests, and the take-profit buys it.
    submit_limit(&engine, SYMBOL, Side::Sell, dec!(29500), dec!(1));

    assert!(engine.get_order(&take_profit.order_id).is_none());
    let trades = engine.recent_trades(SYMBOL, None);
    let last = trades.last().unwrap();
    assert_eq!(last.taker_order_id, take_profit.order_id);
    assert_eq!(last.price, dec!(29500));
    assert_eq!(last.quantity, dec!(1));
}

#[test]
fn test_cascading_triggers_all_fire() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(1));
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29800), dec!(1));
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29700), dec!(5));

    // Two stops that only fire once the market trades down through them.
    let first = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29850), dec!(1)));
    let second = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29750), dec!(1)));
    assert_eq!(first.status, OrderStatus::PendingTrigger);
    assert_eq!(second.status, OrderStatus::PendingTrigger);

    // One market sell knocks out the 29900 bid; the first stop fires into
    // 29800, which exposes 29700 and fires the second: a cascade.
    submit_market(&engine, SYMBOL, Side::Sell, dec!(1));

    assert!(engine.get_order(&first.order_id).is_none());
    assert!(engine.get_order(&second.order_id).is_none());
    let trades = engine.recent_trades(SYMBOL, None);
    assert_eq!(trades.len(), 3);
    assert_eq!(trades[0].price, dec!(29900));
    assert_eq!(trades[1].price, dec!(29800));
    assert_eq!(trades[2].price, dec!(29700));
}

#[test]
fn test_cancel_parked_trigger() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(5));

    let stop = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29000), dec!(1)));
    assert_eq!(stop.status, OrderStatus::PendingTrigger);

    assert!(engine.cancel(&stop.order_id).ok);
    assert!(engine.get_order(&stop.order_id).is_none());

    // Even a crash through the stop price fires nothing now.
    submit_market(&engine, SYMBOL, Side::Sell, dec!(5));
    assert_eq!(engine.recent_trades(SYMBOL, None).len(), 1);
}

#[test]
fn test_activated_market_stop_with_no_liquidity_cancels() {
    let engine = test_engine();
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29900), dec!(1));
    submit_limit(&engine, SYMBOL, Side::Buy, dec!(29850), dec!(0.5));

    let stop = engine.submit(stop_request(SYMBOL, Side::Sell, dec!(29850), dec!(2)));
    assert_eq!(stop.status, OrderStatus::PendingTrigger);

    // Selling through both bids trades at the stop price; the stop then
    // fires into an empty bid side, fills nothing and cancels. Markets
    // never rest.
    submit_market(&engine, SYMBOL, Side::Sell, dec!(1.5));
    assert!(engine.get_order(&stop.order_id).is_none());
    assert_eq!(engine.recent_trades(SYMBOL, None).len(), 2);
    assert_eq!(engine.bbo(SYMBOL), (None, None));
}
