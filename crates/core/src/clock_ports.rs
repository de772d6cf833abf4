//! Clock port
//!
//! Every time-driven decision in the engine reads "now" through this trait so
//! tests can pin or advance time deterministically.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
