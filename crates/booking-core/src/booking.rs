//! Booking records and their lifecycle.
//!
//! A booking is created `Pending` or `Approved` depending on the requester's
//! role, then moves through admin-driven transitions: `Pending → Approved`,
//! `Pending → Rejected` (with an optional reason), `Approved → Cancelled`
//! (with an optional reason). Everything else is rejected as
//! [`InvalidTransition`](crate::BookingError::InvalidTransition).

use availability_engine::TimeRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BookingError, Result};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }
}

/// Who is asking. Roles are passed explicitly by the caller; there is no
/// ambient session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Faculty,
    Staff,
    Admin,
}

impl UserRole {
    /// Faculty and staff bookings are approved on creation; everyone else
    /// (admins included) starts in the pending queue.
    pub fn initial_status(self) -> BookingStatus {
        match self {
            UserRole::Faculty | UserRole::Staff => BookingStatus::Approved,
            UserRole::Student | UserRole::Admin => BookingStatus::Pending,
        }
    }
}

/// A reservation of one facility for one half-open interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub facility_id: Uuid,
    /// The reserved interval, `[start, end)`.
    pub range: TimeRange,
    pub status: BookingStatus,
    pub purpose: String,
    /// Headcount, `1..=capacity` of the facility at creation time.
    pub attendees: u32,
    pub notes: Option<String>,
    /// Set only when an admin rejects with a reason.
    pub rejection_reason: Option<String>,
    /// Set only when an admin cancels with a reason.
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a booking. The service fills in the identifier,
/// status and creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub range: TimeRange,
    pub purpose: String,
    /// Headcount; defaults to 1 when absent.
    #[serde(default = "default_attendees")]
    pub attendees: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_attendees() -> u32 {
    1
}

/// An admin-driven lifecycle change, applied atomically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject(Option<String>),
    Cancel(Option<String>),
}

impl Transition {
    pub fn target(&self) -> BookingStatus {
        match self {
            Transition::Approve => BookingStatus::Approved,
            Transition::Reject(_) => BookingStatus::Rejected,
            Transition::Cancel(_) => BookingStatus::Cancelled,
        }
    }
}

impl Booking {
    /// Move `Pending → Approved`.
    pub fn approve(&mut self) -> Result<()> {
        self.ensure_transition(BookingStatus::Approved)?;
        self.status = BookingStatus::Approved;
        Ok(())
    }

    /// Move `Pending → Rejected`, recording `reason` when it is non-blank.
    pub fn reject(&mut self, reason: Option<String>) -> Result<()> {
        self.ensure_transition(BookingStatus::Rejected)?;
        self.status = BookingStatus::Rejected;
        self.rejection_reason = non_blank(reason);
        Ok(())
    }

    /// Move `Approved → Cancelled`, recording `reason` when it is non-blank.
    /// Cancelling frees the interval for other bookings.
    pub fn cancel(&mut self, reason: Option<String>) -> Result<()> {
        self.ensure_transition(BookingStatus::Cancelled)?;
        self.status = BookingStatus::Cancelled;
        self.cancellation_reason = non_blank(reason);
        Ok(())
    }

    /// Apply a [`Transition`] in one step.
    pub fn apply(&mut self, transition: Transition) -> Result<()> {
        match transition {
            Transition::Approve => self.approve(),
            Transition::Reject(reason) => self.reject(reason),
            Transition::Cancel(reason) => self.cancel(reason),
        }
    }

    fn ensure_transition(&self, to: BookingStatus) -> Result<()> {
        let allowed = matches!(
            (self.status, to),
            (BookingStatus::Pending, BookingStatus::Approved)
                | (BookingStatus::Pending, BookingStatus::Rejected)
                | (BookingStatus::Approved, BookingStatus::Cancelled)
        );
        if allowed {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}

/// Trims a free-text reason; blank input counts as absent.
fn non_blank(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
