//! # availability-engine
//!
//! Pure interval math for facility booking: half-open time ranges, conflict
//! detection against a facility's approved bookings, and the fixed hourly
//! partition of the 08:00–20:00 daily operating window.
//!
//! The engine is stateless and performs no I/O — callers fetch the approved
//! bookings for a facility from their persistence layer and hand the snapshot
//! in. Boundary-touching intervals never conflict, so back-to-back bookings
//! are fine.
//!
//! ## Modules
//!
//! - [`range`] — half-open [`TimeRange`] and the canonical overlap predicate
//! - [`conflict`] — conflict scan of a candidate against a booking snapshot
//! - [`slots`] — daily slot partition and availability marking
//! - [`error`] — error types

pub mod conflict;
pub mod error;
pub mod range;
pub mod slots;

pub use conflict::{find_overlaps, has_conflict, Overlap};
pub use error::EngineError;
pub use range::TimeRange;
pub use slots::{
    compute_day_slots, day_bounds, day_slot_ranges, Slot, CLOSE_HOUR, OPEN_HOUR, SLOTS_PER_DAY,
};
