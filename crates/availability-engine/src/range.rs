//! Half-open time ranges and the canonical overlap predicate.
//!
//! Every interval in the booking system is `[start, end)`: the start instant
//! is included, the end instant excluded. Adjacent ranges (one ends exactly
//! when the next starts) therefore never overlap, which is what lets
//! back-to-back bookings share a boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A half-open interval `[start, end)` in UTC with `start < end`.
///
/// The ordering invariant is enforced at construction (and on deserialize),
/// so downstream code never has to re-validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Constructor for ranges whose ordering the caller guarantees
    /// structurally (e.g. consecutive slot boundaries).
    pub(crate) fn new_unchecked(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Canonical half-open overlap test: `[s1,e1)` and `[s2,e2)` overlap iff
    /// `s1 < e2 && s2 < e1`.
    ///
    /// This single inequality subsumes the three cases usually enumerated
    /// (starts inside, ends inside, fully contains) and excludes the adjacent
    /// case where one range ends exactly when the other starts.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlap duration in minutes: `min(e1,e2) - max(s1,s2)`, or zero when
    /// the ranges are disjoint.
    pub fn overlap_minutes(&self, other: &TimeRange) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        (overlap_end - overlap_start).num_minutes()
    }

    /// Length of this range in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Unvalidated wire form; deserialization funnels through [`TimeRange::new`].
#[derive(Deserialize)]
struct RawRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawRange> for TimeRange {
    type Error = EngineError;

    fn try_from(raw: RawRange) -> Result<Self> {
        TimeRange::new(raw.start, raw.end)
    }
}
