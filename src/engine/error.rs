//! Engine error taxonomy.
//!
//! Errors are values: validation failures and failed fill-or-kill pre-checks
//! surface as rejected responses, never as panics or control-flow exceptions
//! across the core boundary.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the matching engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The request is malformed: missing or forbidden price, non-positive
    /// quantity, empty symbol, or a value outside the precision limits.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A fill-or-kill order could not be filled in full.
    #[error("insufficient liquidity to fill {requested} {symbol}")]
    InsufficientLiquidity {
        /// The symbol the order targeted.
        symbol: String,
        /// The quantity that could not be sourced.
        requested: Decimal,
    },

    /// Cancel target does not exist (unknown, filled, or already cancelled).
    #[error("order not found: {0}")]
    NotFound(String),
}
