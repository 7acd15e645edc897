//! Small clock helpers shared across the crate.

use chrono::{DateTime, Utc};

/// Current wall-clock time as a UTC timestamp.
pub(crate) fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
