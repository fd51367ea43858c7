//! Timestamp source for request signing.
//!
//! The signature embeds the unix time in seconds, and the server rejects
//! requests whose timestamp falls outside a short freshness window. Every
//! attempt, retries included, reads a fresh value from the clock.

use time::OffsetDateTime;

/// Trait for providing the timestamp embedded in request signatures.
pub trait Clock: Send + Sync {
    /// Current unix time in whole seconds.
    fn unix_timestamp(&self) -> i64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}
