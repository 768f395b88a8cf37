use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::temporal::{LedgerTime, SECONDS_PER_DAY};

/// Source of ledger time.
///
/// Implementations must never go backwards: every call returns a value
/// greater than or equal to the previous one.
pub trait LedgerClock: Send + Sync {
    fn now(&self) -> LedgerTime;
}

/// Wall-clock time source, clamped so it never moves backwards.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_secs: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn wall_clock_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl LedgerClock for SystemClock {
    fn now(&self) -> LedgerTime {
        let wall = Self::wall_clock_secs();
        let previous = self.last_secs.fetch_max(wall, Ordering::SeqCst);
        LedgerTime::from_secs(previous.max(wall))
    }
}

/// Manually driven clock for tests and deterministic simulations.
#[derive(Debug)]
pub struct ManualClock {
    now_secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: LedgerTime) -> Self {
        Self {
            now_secs: AtomicU64::new(start.as_secs()),
        }
    }

    /// Move the clock forward to `time`. Earlier values are ignored.
    pub fn set(&self, time: LedgerTime) {
        self.now_secs.fetch_max(time.as_secs(), Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        // fetch_update never fails with a closure that always returns Some.
        let _ = self
            .now_secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(secs))
            });
    }

    pub fn advance_days(&self, days: u64) {
        self.advance_secs(days.saturating_mul(SECONDS_PER_DAY));
    }
}

impl LedgerClock for ManualClock {
    fn now(&self) -> LedgerTime {
        LedgerTime::from_secs(self.now_secs.load(Ordering::SeqCst))
    }
}
