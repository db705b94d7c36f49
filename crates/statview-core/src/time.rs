//! Timestamps as found in native `struct timespec` sub-records.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Result, StatError};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Seconds and nanoseconds since the Unix epoch.
///
/// Values are kept exactly as the kernel reported them. The nanosecond
/// component is expected in `0..1_000_000_000` but is not validated; use
/// [`TimeValue::is_normalized`] to check.
///
/// Equality, ordering and hashing compare the instant, so `(10, 2e9)` and
/// `(12, 0)` are equal, the same way [`TimeValue::to_datetime`] carries the
/// excess nanoseconds into seconds.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TimeValue {
    seconds: i64,
    nanoseconds: i64,
}

impl TimeValue {
    /// The Unix epoch.
    pub const EPOCH: TimeValue = TimeValue::new(0, 0);

    pub const fn new(seconds: i64, nanoseconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Whole seconds since the epoch (`tv_sec`).
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second part (`tv_nsec`).
    pub const fn nanoseconds(&self) -> i64 {
        self.nanoseconds
    }

    /// Returns `true` if the nanosecond component is in `0..1_000_000_000`.
    pub const fn is_normalized(&self) -> bool {
        self.nanoseconds >= 0 && self.nanoseconds < NANOS_PER_SEC
    }

    /// Nanoseconds since the epoch. Cannot overflow: `|seconds| * 1e9`
    /// stays far below `i128::MAX`.
    fn total_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SEC) + i128::from(self.nanoseconds)
    }

    /// Converts to a UTC instant: `epoch + seconds + nanoseconds`.
    ///
    /// A nanosecond component outside `0..1e9` carries into the seconds
    /// (floor division), it is never clamped. Fails only when the sum is
    /// outside the range chrono can represent.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let out_of_range = || StatError::TimeOutOfRange {
            seconds: self.seconds,
            nanoseconds: self.nanoseconds,
        };

        let carry = self.nanoseconds.div_euclid(NANOS_PER_SEC);
        let fraction = self.nanoseconds.rem_euclid(NANOS_PER_SEC) as u32;
        let seconds = self.seconds.checked_add(carry).ok_or_else(out_of_range)?;

        DateTime::<Utc>::from_timestamp(seconds, fraction).ok_or_else(out_of_range)
    }
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.total_nanos() == other.total_nanos()
    }
}

impl Eq for TimeValue {}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_nanos().cmp(&other.total_nanos())
    }
}

impl Hash for TimeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.total_nanos().hash(state);
    }
}

impl From<(i64, i64)> for TimeValue {
    fn from((seconds, nanoseconds): (i64, i64)) -> Self {
        Self::new(seconds, nanoseconds)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Ok(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Err(_) => write!(f, "{}s+{}ns", self.seconds, self.nanoseconds),
        }
    }
}
