//! Identifier assignment for new records and sub-records.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::record::RecordId;

/// Hands out strictly increasing numeric ids.
///
/// The counter starts at the current wall-clock time in milliseconds, so new ids sort after
/// ids minted from timestamps by earlier deployments, but afterwards it only ever moves
/// forward by at least one. Two calls never return the same id, however close together.
#[derive(Debug)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Creates a generator whose first id is `start + 1` (or the clock, if later).
    pub fn starting_at(start: u64) -> Self {
        Self {
            last: AtomicU64::new(start),
        }
    }

    /// Returns the next id.
    pub fn next_id(&self) -> RecordId {
        let now = Utc::now().timestamp_millis().max(0) as u64;

        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        RecordId::from(now.max(previous + 1))
    }

    /// Returns the next id for which `taken` is false.
    pub fn next_unused(&self, taken: impl Fn(&RecordId) -> bool) -> RecordId {
        loop {
            let id = self.next_id();

            if !taken(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
