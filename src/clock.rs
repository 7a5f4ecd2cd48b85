//! Time source for license aging.
//!
//! Validation never calls `Utc::now()` directly. The validator asks its
//! [`Clock`], so a test can pin "today" and then walk it forward through
//! the notice, grace and lockout windows of a stored license.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock shared between a test and the service under test.
///
/// Hand an `Arc<MockClock>` to the service and keep a clone; moving the
/// clock then simulates the next application launch days later without
/// rebuilding the service.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug)]
pub struct MockClock {
    now: std::sync::RwLock<DateTime<Utc>>,
}

#[cfg(any(test, feature = "test-seams"))]
impl MockClock {
    /// Clock pinned at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::RwLock::new(now),
        }
    }

    /// Pin the clock at `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Move the clock by `duration`; negative values move it back.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += duration;
    }

    /// Move the clock by whole days.
    pub fn advance_days(&self, days: i64) {
        self.advance(chrono::Duration::days(days));
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
