//! Error types for booking and catalog operations.

use availability_engine::EngineError;
use thiserror::Error;
use uuid::Uuid;

use crate::booking::BookingStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The requested interval is malformed (start not before end).
    #[error(transparent)]
    InvalidRange(#[from] EngineError),

    /// The requested interval overlaps an approved booking.
    #[error("Facility {0} is already booked for the requested time")]
    Conflict(Uuid),

    #[error("Purpose must not be blank")]
    EmptyPurpose,

    #[error("Attendee count {requested} is outside 1..={capacity}")]
    InvalidAttendees { requested: u32, capacity: u32 },

    #[error("Facility {0} does not exist")]
    FacilityNotFound(Uuid),

    #[error("Facility {0} is not accepting bookings")]
    FacilityInactive(Uuid),

    #[error("Booking {0} does not exist")]
    BookingNotFound(Uuid),

    /// The lifecycle does not allow this status change.
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Capacity must be at least 1")]
    InvalidCapacity,

    /// Failure reported by the storage backend, carried unchanged.
    #[error("Storage error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
