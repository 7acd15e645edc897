//! Snapshot persistence: periodic atomic writes of every symbol's resting
//! liquidity, trigger tables and recent trades, plus deterministic
//! reconstruction on restart.

mod snapshot;
mod store;
mod writer;

pub use snapshot::{EngineSnapshot, SNAPSHOT_VERSION, SymbolSnapshot};
pub use store::{PersistenceError, SnapshotStore};
pub use writer::SnapshotWriter;
