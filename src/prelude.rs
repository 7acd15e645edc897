//! Prelude module that re-exports commonly used types.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook_rs::prelude::*;
//! ```

// Engine types
pub use crate::engine::{EngineConfig, EngineError, FeeSchedule, MatchingEngine};

// Event types
pub use crate::engine::{BookChangedEvent, MarketEvent, TradeEvent};

// Order book types
pub use crate::orderbook::{Fill, OrderBook, PriceLevel};

// Domain entities and the request surface
pub use crate::types::{
    CancelResponse, DepthLevel, DepthSnapshot, Order, OrderRequest, OrderResponse, OrderStatus,
    OrderType, Side, Trade,
};

// Persistence types
pub use crate::persistence::{EngineSnapshot, SnapshotStore, SnapshotWriter};
