//! Fixed hourly partition of a facility's daily operating window.
//!
//! Facilities operate 08:00–20:00 in facility-local wall time, giving twelve
//! one-hour slots per day. Slot boundaries are wall-clock times resolved to
//! UTC instants through the campus timezone, so the partition stays aligned
//! with the local clock across DST transitions.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::conflict::has_conflict;
use crate::range::TimeRange;

/// First bookable hour of the day (inclusive), facility-local.
pub const OPEN_HOUR: u32 = 8;
/// Hour the operating window closes (exclusive), facility-local.
pub const CLOSE_HOUR: u32 = 20;
/// Number of one-hour slots in the operating window.
pub const SLOTS_PER_DAY: usize = (CLOSE_HOUR - OPEN_HOUR) as usize;

/// One hour of a facility's operating window, tagged with whether it is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(flatten)]
    pub range: TimeRange,
    pub available: bool,
}

/// Resolve a facility-local wall-clock time to a UTC instant.
///
/// Ambiguous times (fall-back transition) take the earlier instant;
/// nonexistent times (spring-forward gap) shift forward by the conventional
/// one-hour gap. The final UTC fallback is unreachable for IANA zones but
/// keeps the function total.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// The instant at `date` 00:00 local plus `hours`, in UTC.
fn local_instant(date: NaiveDate, hours: i64, tz: Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN) + Duration::hours(hours))
}

/// The twelve one-hour slot ranges covering 08:00–20:00 of `date` in `tz`,
/// in chronological order.
///
/// The partition is contiguous and strictly increasing by construction: each
/// slot starts exactly where the previous one ended.
pub fn day_slot_ranges(date: NaiveDate, tz: Tz) -> Vec<TimeRange> {
    let mut ranges = Vec::with_capacity(SLOTS_PER_DAY);
    let mut start = local_instant(date, OPEN_HOUR as i64, tz);
    for hour in OPEN_HOUR..CLOSE_HOUR {
        let mut end = local_instant(date, hour as i64 + 1, tz);
        // A DST gap on a slot boundary would collapse the hour; keep the
        // partition strictly increasing.
        if end <= start {
            end = start + Duration::hours(1);
        }
        ranges.push(TimeRange::new_unchecked(start, end));
        start = end;
    }
    ranges
}

/// The full local day `[00:00, 24:00)` of `date` in `tz` as a UTC range —
/// the fetch window for a day's bookings.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> TimeRange {
    let start = local_instant(date, 0, tz);
    let mut end = local_instant(date, 24, tz);
    if end <= start {
        end = start + Duration::hours(24);
    }
    TimeRange::new_unchecked(start, end)
}

/// Partition `date` into the twelve operating-window slots and mark each one
/// against `busy` (a facility's approved-booking intervals): a slot is
/// available iff no busy range overlaps it, under the same half-open test
/// used for booking conflicts.
///
/// Pure function of its inputs — same date, zone, and booking snapshot always
/// produce the same sequence.
pub fn compute_day_slots(date: NaiveDate, tz: Tz, busy: &[TimeRange]) -> Vec<Slot> {
    day_slot_ranges(date, tz)
        .into_iter()
        .map(|range| Slot {
            range,
            available: !has_conflict(busy, range),
        })
        .collect()
}
