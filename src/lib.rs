//! # Matchbook: a matching engine core
//!
//! A per-symbol limit order book and matching engine written in Rust. The
//! crate provides the core of a cryptocurrency exchange: strict price–time
//! priority matching, a typed request/response surface, advanced order
//! activation and snapshot-based crash recovery — everything below the
//! transport layer.
//!
//! ## Key Features
//!
//! - **Strict price–time priority**: two sorted ladders of FIFO price
//!   levels; execution price is always the maker's resting price, so trades
//!   never trade through better liquidity.
//!
//! - **Order types**: market, limit, immediate-or-cancel, fill-or-kill, and
//!   the trigger family (stop, stop-limit, take-profit) with well-defined
//!   activation semantics against last trade price and BBO.
//!
//! - **Decimal-native**: every price, quantity and fee is a
//!   `rust_decimal::Decimal`. There is no floating point anywhere in the
//!   core, and decimals cross the boundary as canonical strings.
//!
//! - **Signed maker/taker fees**: basis-point schedules on trade notional
//!   with half-even rounding; negative maker fees model rebates.
//!
//! - **Per-symbol serialization**: one mutex per symbol held across the
//!   whole submit/cancel, including trigger re-entry. Symbols never block
//!   each other.
//!
//! - **Market events**: bounded per-symbol broadcast of trade and
//!   book-changed events. Slow subscribers lag out; they never back-pressure
//!   matching.
//!
//! - **Snapshot persistence**: periodic atomic JSON snapshots of resting
//!   orders, trigger tables and recent trades; a cold restart reconstructs
//!   the books deterministically, FIFO intact.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = MatchingEngine::new(EngineConfig::default());
//!
//! let resting = engine.submit(OrderRequest::limit(
//!     "BTC-USD",
//!     Side::Sell,
//!     Decimal::from(30_000),
//!     Decimal::ONE,
//! ));
//! assert_eq!(resting.status, OrderStatus::New);
//!
//! let taker = engine.submit(OrderRequest::market("BTC-USD", Side::Buy, Decimal::ONE));
//! assert_eq!(taker.status, OrderStatus::Filled);
//! assert_eq!(taker.trades.len(), 1);
//! assert_eq!(taker.trades[0].price, Decimal::from(30_000));
//! ```
//!
//! ## Scope
//!
//! Transports (REST, WebSocket), authentication and rate limiting live
//! outside this crate: it exposes an in-process API (`submit`, `cancel`,
//! `bbo`, `l2`, `recent_trades`, `events`) that a thin transport layer
//! consumes. Cross-symbol atomicity and replication are out of scope.

pub mod engine;
pub mod orderbook;
pub mod persistence;
pub mod prelude;
pub mod types;
mod utils;

pub use engine::{
    BookChangedEvent, EngineConfig, EngineError, FeeSchedule, MarketEvent, MatchingEngine,
    TradeEvent,
};
pub use orderbook::{Fill, OrderBook, PriceLevel};
pub use persistence::{
    EngineSnapshot, PersistenceError, SnapshotStore, SnapshotWriter, SymbolSnapshot,
};
pub use types::{
    CancelResponse, DepthLevel, DepthSnapshot, Order, OrderRequest, OrderResponse, OrderStatus,
    OrderType, Side, Trade,
};
