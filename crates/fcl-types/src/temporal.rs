use std::fmt;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;
/// Calendar months are fixed 30-day windows.
pub const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;

/// Ledger-clock timestamp: whole seconds since the UNIX epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerTime(u64);

impl LedgerTime {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The zero timestamp, returned by projections of absent records.
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// This timestamp shifted forward by whole days, saturating at `u64::MAX`.
    pub fn plus_days(&self, days: u32) -> Self {
        Self(self.0.saturating_add(u64::from(days).saturating_mul(SECONDS_PER_DAY)))
    }

    /// Index of the 7-day window containing this timestamp.
    pub const fn week_index(&self) -> u64 {
        self.0 / SECONDS_PER_WEEK
    }

    /// Index of the 30-day window containing this timestamp.
    pub const fn month_index(&self) -> u64 {
        self.0 / SECONDS_PER_MONTH
    }
}

impl fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
