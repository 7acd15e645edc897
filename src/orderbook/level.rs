//! A single price level: FIFO queue of live orders plus a cached aggregate.

use crate::types::Order;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// All live orders resting at one price, in arrival order.
///
/// Insertion appends to the tail; matching consumes from the head, which is
/// what gives time priority within the price. `total_remaining` is kept equal
/// to the sum of `remaining` over the queue at every mutation.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// The price shared by every order in this level.
    pub price: Decimal,
    /// Orders in arrival order.
    orders: VecDeque<Order>,
    /// Cached sum of `remaining` across the queue.
    total_remaining: Decimal,
}

impl PriceLevel {
    /// Create an empty level at `price`.
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_remaining: Decimal::ZERO,
        }
    }

    /// Append an order at the tail of the queue.
    pub fn push_back(&mut self, order: Order) {
        self.total_remaining += order.remaining;
        self.orders.push_back(order);
    }

    /// Total resting quantity at this price.
    #[must_use]
    #[inline]
    pub fn total_remaining(&self) -> Decimal {
        self.total_remaining
    }

    /// Number of orders queued at this price.
    #[must_use]
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// True when no orders remain at this price. Empty levels are removed
    /// from their ladder by the book.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The order at the head of the queue, i.e. the next maker.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the head order for the matching loop.
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Pop the head order after it filled completely.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Reduce the cached aggregate after a fill at the head.
    pub fn reduce_total(&mut self, quantity: Decimal) {
        self.total_remaining -= quantity;
    }

    /// Remove an order anywhere in the queue by id, O(k) in the queue
    /// length. Returns the removed order.
    pub fn remove(&mut self, order_id: &str) -> Option<Order> {
        let position = self.orders.iter().position(|o| o.order_id == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_remaining -= order.remaining;
        Some(order)
    }

    /// Find an order in the queue by id.
    #[must_use]
    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    /// Iterate the queue in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
