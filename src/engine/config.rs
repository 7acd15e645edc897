//! Engine configuration.

use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Enumerated configuration for [`crate::engine::MatchingEngine`].
///
/// All knobs have production defaults; construct with `EngineConfig::default()`
/// and override fields as needed.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maker fee in basis points. Negative values are rebates paid to the
    /// maker. Default −1.0.
    pub maker_fee_bps: Decimal,
    /// Taker fee in basis points. Default +2.5.
    pub taker_fee_bps: Decimal,
    /// Decimal places fees are rounded to (half-even). Default 8.
    pub fee_precision: u32,
    /// Retention cap of the per-symbol recent-trades window. Default 1000.
    pub recent_trades_limit: usize,
    /// Interval between background snapshots. Default 5 s.
    pub persist_interval: Duration,
    /// Snapshot file location. Default `./state/state.json`.
    pub persist_path: PathBuf,
    /// Maximum significant digits accepted on prices and quantities.
    /// Default 16.
    pub max_significant_digits: u32,
    /// Maximum fractional digits accepted on prices and quantities.
    /// Default 8.
    pub max_fractional_digits: u32,
    /// Bounded capacity of each per-symbol event channel. Subscribers that
    /// fall further behind than this are dropped, never waited on.
    /// Default 1024.
    pub event_queue_capacity: usize,
    /// Number of levels per side included in book-changed events.
    /// Default 20.
    pub event_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            maker_fee_bps: Decimal::new(-10, 1),
            taker_fee_bps: Decimal::new(25, 1),
            fee_precision: 8,
            recent_trades_limit: 1000,
            persist_interval: Duration::from_secs(5),
            persist_path: PathBuf::from("./state/state.json"),
            max_significant_digits: 16,
            max_fractional_digits: 8,
            event_queue_capacity: 1024,
            event_depth: 20,
        }
    }
}
