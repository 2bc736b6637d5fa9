//! Time-based identifier minting.
//!
//! Entities are identified by their creation time in milliseconds since the
//! epoch, rendered as a decimal string. Two mints landing in the same
//! millisecond would collide, so the source bumps past the last issued value.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Return the current time as milliseconds since the epoch.
///
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Issues unique, monotonically increasing time-based ids.
///
#[derive(Debug, Default)]
pub struct IdSource {
    last_issued: AtomicI64,
}

impl IdSource {
    pub fn new() -> IdSource {
        IdSource::default()
    }

    /// Mint the next id. Uses the wall clock, bumping by one when the clock
    /// has not advanced since the previous mint.
    ///
    pub fn next_id(&self) -> String {
        let now = now_millis();
        let mut last = self.last_issued.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_issued.compare_exchange(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}
