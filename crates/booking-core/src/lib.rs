//! # booking-core
//!
//! Facility booking domain for campus spaces.
//!
//! Users request half-open time slots in a facility; faculty and staff are
//! approved on the spot, everyone else lands in an admin approval queue.
//! Interval math is delegated to the `availability-engine` crate; the final
//! no-overlap guarantee between approved bookings lives in the store's
//! guarded writes, not in the advisory check.
//!
//! ## Modules
//!
//! - [`booking`] — booking records, roles and lifecycle transitions
//! - [`facility`] — the facility catalog and search filters
//! - [`service`] — request-level operations (`BookingService`)
//! - [`store`] — storage traits and the in-memory reference store
//! - [`error`] — error types

pub mod booking;
pub mod error;
pub mod facility;
pub mod service;
pub mod store;

pub use booking::{Booking, BookingRequest, BookingStatus, Transition, UserRole};
pub use error::BookingError;
pub use facility::{Facility, FacilityFilter, FacilityKind, FacilityUpdate, NewFacility};
pub use service::{
    BookingService, ConflictReport, DayAvailability, FacilityDetail, FacilityRemoval,
};
pub use store::{BookingStore, FacilityStore, MemoryStore};
