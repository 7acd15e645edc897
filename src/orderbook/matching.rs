//! The matching loop and the fill-or-kill feasibility check.

use super::book::OrderBook;
use crate::types::{Order, Side};
use rust_decimal::Decimal;
use tracing::trace;

/// One execution produced by the matching loop.
///
/// The engine turns fills into [`crate::types::Trade`]s, attaching trade
/// ids, timestamps and fees. The price is always the maker's resting price.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    /// Execution price (the maker's level price).
    pub price: Decimal,
    /// Executed quantity.
    pub quantity: Decimal,
    /// Id of the resting order that provided the liquidity.
    pub maker_order_id: String,
}

impl OrderBook {
    /// Match `incoming` against the contra ladder, best price first, FIFO
    /// within each level.
    ///
    /// Execution price is always the maker's resting price; the incoming
    /// limit price only bounds how deep the sweep may go and never becomes
    /// the execution price. Fully filled makers are popped from their queue
    /// and dropped from the order index; emptied levels leave the ladder.
    /// The incoming order's `remaining`/`filled`/`status` are updated in
    /// place, and `last_trade_price` tracks each execution.
    pub fn match_order(&mut self, incoming: &mut Order) -> Vec<Fill> {
        let mut fills = Vec::new();

        while incoming.remaining > Decimal::ZERO
            && self.crossable(incoming.side, incoming.price)
        {
            let contra = match incoming.side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let level_price = match incoming.side {
                Side::Buy => contra.keys().next().copied(),
                Side::Sell => contra.keys().next_back().copied(),
            };
            let Some(level_price) = level_price else {
                break;
            };
            let Some(level) = contra.get_mut(&level_price) else {
                break;
            };

            let mut filled_makers = Vec::new();
            while incoming.remaining > Decimal::ZERO && !level.is_empty() {
                let (quantity, maker_id, maker_done) = {
                    let Some(maker) = level.front_mut() else {
                        break;
                    };
                    let quantity = incoming.remaining.min(maker.remaining);
                    maker.fill(quantity);
                    (quantity, maker.order_id.clone(), maker.remaining.is_zero())
                };

                incoming.fill(quantity);
                level.reduce_total(quantity);
                self.last_trade_price = Some(level_price);
                trace!(
                    symbol = %self.symbol,
                    price = %level_price,
                    %quantity,
                    maker = %maker_id,
                    taker = %incoming.order_id,
                    "matched"
                );
                fills.push(Fill {
                    price: level_price,
                    quantity,
                    maker_order_id: maker_id.clone(),
                });

                if maker_done {
                    level.pop_front();
                    filled_makers.push(maker_id);
                }
            }

            if level.is_empty() {
                contra.remove(&level_price);
            }
            for maker_id in &filled_makers {
                self.order_index.remove(maker_id);
            }
        }

        fills
    }

    /// Fill-or-kill pre-check: walk the contra ladder best-to-worst, summing
    /// resting quantity at every level whose price is not worse than
    /// `price_cap` (≤ cap for buys, ≥ cap for sells, unbounded when `None`),
    /// and report whether `quantity` is reachable. Read-only.
    #[must_use]
    pub fn fok_precheck(
        &self,
        side: Side,
        price_cap: Option<Decimal>,
        quantity: Decimal,
    ) -> bool {
        let mut available = Decimal::ZERO;
        let levels: Box<dyn Iterator<Item = &super::level::PriceLevel>> = match side {
            Side::Buy => Box::new(self.asks.values()),
            Side::Sell => Box::new(self.bids.values().rev()),
        };
        for level in levels {
            if let Some(cap) = price_cap {
                let within = match side {
                    Side::Buy => level.price <= cap,
                    Side::Sell => level.price >= cap,
                };
                if !within {
                    break;
                }
            }
            available += level.total_remaining();
            if available >= quantity {
                return true;
            }
        }
        false
    }
}
