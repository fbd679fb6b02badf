use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_DAY: i64 = 86_400 * MILLIS_PER_SECOND;

/// Absolute instant as milliseconds since 1970-01-01 00:00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(i64);

impl EpochMillis {
    /// Create a new instant from raw milliseconds.
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw milliseconds since the Unix epoch.
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Shift by `millis`, saturating at the ends of the `i64` range.
    pub fn saturating_add_millis(self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }

    /// Convert to chrono DateTime<Utc>.
    ///
    /// Returns `None` when the instant lies outside chrono's calendar range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl From<i64> for EpochMillis {
    fn from(v: i64) -> Self {
        EpochMillis::new(v)
    }
}

impl From<DateTime<Utc>> for EpochMillis {
    fn from(dt: DateTime<Utc>) -> Self {
        EpochMillis::from_datetime(dt)
    }
}

/// Source of the current real instant.
///
/// Handlers and tickers read time through this trait so tests can pin it.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> EpochMillis;
}

/// Wall clock of the host, always read in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> EpochMillis {
        EpochMillis::from_datetime(Utc::now())
    }
}

/// Manually driven clock for tests and previews.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicI64,
}

impl FixedTimeSource {
    pub fn new(now: EpochMillis) -> Self {
        Self {
            now: AtomicI64::new(now.value()),
        }
    }

    pub fn set(&self, now: EpochMillis) {
        self.now.store(now.value(), Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some(v.saturating_add(millis))
            });
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> EpochMillis {
        EpochMillis::new(self.now.load(Ordering::SeqCst))
    }
}
