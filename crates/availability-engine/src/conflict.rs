//! Conflict detection against a facility's approved bookings.
//!
//! A candidate range conflicts when it overlaps any interval in the approved
//! snapshot under the half-open test. Adjacent ranges (one ends exactly when
//! the next starts) are NOT conflicts.

use crate::range::TimeRange;

/// A detected overlap between a candidate range and one existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// The existing interval the candidate collides with.
    pub existing: TimeRange,
    /// How much of the candidate it covers, in minutes.
    pub overlap_minutes: i64,
}

/// True iff `candidate` overlaps at least one range in `existing`.
///
/// The caller supplies the approved intervals for one facility and rejects
/// the booking attempt when this returns true. Read-only, short-circuits on
/// the first hit.
pub fn has_conflict(existing: &[TimeRange], candidate: TimeRange) -> bool {
    existing.iter().any(|range| range.overlaps(&candidate))
}

/// Every range in `existing` that overlaps `candidate`, with overlap
/// durations — the long form of [`has_conflict`] for display and diagnostics.
pub fn find_overlaps(existing: &[TimeRange], candidate: TimeRange) -> Vec<Overlap> {
    existing
        .iter()
        .filter(|range| range.overlaps(&candidate))
        .map(|range| Overlap {
            existing: *range,
            overlap_minutes: range.overlap_minutes(&candidate),
        })
        .collect()
}
