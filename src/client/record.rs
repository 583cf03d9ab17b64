//! Module `record`
//!
//! Defines the `ClientRecord` identifier stored in the registry file and the
//! clock used to mint new identifiers.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const CLIENT_ID_PREFIX: &str = "client_";

/// Opaque identifier for one in-flight upload stream.
///
/// Identifiers are derived from the creation timestamp, so two registries (or
/// two processes) may mint the same value. Nothing here prevents that; removal
/// drops every equal entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientRecord(String);

impl ClientRecord {
    /// Wraps an identifier read back from storage.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the identifier for a given creation timestamp (milliseconds).
    pub fn from_timestamp(millis: u64) -> Self {
        Self(format!("{CLIENT_ID_PREFIX}{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientRecord {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Issues strictly increasing millisecond timestamps.
///
/// Follows the wall clock, but never hands out the same value twice: when the
/// clock has not moved past the last issued value, the last value plus one is
/// used instead.
#[derive(Debug, Default)]
pub struct IdClock {
    last_issued: AtomicU64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp, in milliseconds since the Unix epoch.
    pub fn next_millis(&self) -> u64 {
        let now = wall_clock_millis();
        let mut last = self.last_issued.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_issued.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// Mints a fresh `ClientRecord`.
    pub fn next_record(&self) -> ClientRecord {
        ClientRecord::from_timestamp(self.next_millis())
    }
}

fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as u64)
        .unwrap_or(0)
}
