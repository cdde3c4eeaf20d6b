//! Storage traits and the in-memory reference store.
//!
//! The engine's conflict check reads committed state and is advisory only;
//! the store is where the no-overlap invariant is actually enforced. In
//! [`MemoryStore`] the write lock spans both the re-check and the commit,
//! so two racing requests for the same slot cannot both land. A real
//! database backend would use a serializable transaction in the same two
//! places: guarded insert and guarded approval.

use std::collections::HashMap;

use availability_engine::{has_conflict, TimeRange};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, Transition};
use crate::error::{BookingError, Result};
use crate::facility::Facility;

/// Catalog persistence.
pub trait FacilityStore: Send + Sync {
    fn insert_facility(&self, facility: Facility) -> Result<()>;
    fn find_facility(&self, id: Uuid) -> Result<Option<Facility>>;
    /// Every facility, active or not, in no particular order.
    fn find_facilities(&self) -> Result<Vec<Facility>>;
    fn update_facility(&self, facility: Facility) -> Result<()>;
    /// Clears the active flag and returns the updated record.
    fn deactivate_facility(&self, id: Uuid) -> Result<Facility>;
    fn delete_facility(&self, id: Uuid) -> Result<()>;
}

/// Booking persistence. Writes that produce an `Approved` booking must
/// re-check the no-overlap invariant under exclusive access.
pub trait BookingStore: Send + Sync {
    /// Stores a new booking. When the booking arrives `Approved` the store
    /// re-checks for overlap with committed approved bookings and returns
    /// [`BookingError::Conflict`] instead of violating the invariant.
    fn insert_booking(&self, booking: Booking) -> Result<Booking>;

    fn find_booking(&self, id: Uuid) -> Result<Option<Booking>>;

    /// Applies a lifecycle transition and returns the updated booking.
    /// An approval is guarded the same way as an approved insert.
    fn apply_transition(&self, id: Uuid, transition: Transition) -> Result<Booking>;

    /// Approved bookings for one facility, optionally restricted to those
    /// overlapping `window`, sorted by start ascending.
    fn find_approved(&self, facility_id: Uuid, window: Option<TimeRange>) -> Result<Vec<Booking>>;

    /// All bookings owned by `user_id`, newest start first.
    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>>;

    /// All pending bookings, oldest created first.
    fn find_pending(&self) -> Result<Vec<Booking>>;
}

/// Reference store used by the tests and as the seed for real backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    facilities: RwLock<HashMap<Uuid, Facility>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Committed approved intervals for `facility_id`, excluding `exclude`.
fn approved_ranges(
    bookings: &HashMap<Uuid, Booking>,
    facility_id: Uuid,
    exclude: Uuid,
) -> Vec<TimeRange> {
    bookings
        .values()
        .filter(|b| {
            b.facility_id == facility_id && b.id != exclude && b.status == BookingStatus::Approved
        })
        .map(|b| b.range)
        .collect()
}

impl FacilityStore for MemoryStore {
    fn insert_facility(&self, facility: Facility) -> Result<()> {
        self.facilities.write().insert(facility.id, facility);
        Ok(())
    }

    fn find_facility(&self, id: Uuid) -> Result<Option<Facility>> {
        Ok(self.facilities.read().get(&id).cloned())
    }

    fn find_facilities(&self) -> Result<Vec<Facility>> {
        Ok(self.facilities.read().values().cloned().collect())
    }

    fn update_facility(&self, facility: Facility) -> Result<()> {
        let mut facilities = self.facilities.write();
        match facilities.get_mut(&facility.id) {
            Some(slot) => {
                *slot = facility;
                Ok(())
            }
            None => Err(BookingError::FacilityNotFound(facility.id)),
        }
    }

    fn deactivate_facility(&self, id: Uuid) -> Result<Facility> {
        let mut facilities = self.facilities.write();
        match facilities.get_mut(&id) {
            Some(facility) => {
                facility.active = false;
                Ok(facility.clone())
            }
            None => Err(BookingError::FacilityNotFound(id)),
        }
    }

    fn delete_facility(&self, id: Uuid) -> Result<()> {
        match self.facilities.write().remove(&id) {
            Some(_) => Ok(()),
            None => Err(BookingError::FacilityNotFound(id)),
        }
    }
}

impl BookingStore for MemoryStore {
    fn insert_booking(&self, booking: Booking) -> Result<Booking> {
        // Write lock held across check and commit: this is the
        // serialization point that closes the check-then-insert race.
        let mut bookings = self.bookings.write();
        if booking.status == BookingStatus::Approved {
            let busy = approved_ranges(&bookings, booking.facility_id, booking.id);
            if has_conflict(&busy, booking.range) {
                debug!(
                    "Guarded insert rejected: booking {} overlaps committed state",
                    booking.id
                );
                return Err(BookingError::Conflict(booking.facility_id));
            }
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    fn find_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.read().get(&id).cloned())
    }

    fn apply_transition(&self, id: Uuid, transition: Transition) -> Result<Booking> {
        let mut bookings = self.bookings.write();
        let mut updated = bookings
            .get(&id)
            .cloned()
            .ok_or(BookingError::BookingNotFound(id))?;
        updated.apply(transition)?;

        // An approval can race with inserts that landed while this booking
        // sat in the pending queue; re-check before committing.
        if updated.status == BookingStatus::Approved {
            let busy = approved_ranges(&bookings, updated.facility_id, updated.id);
            if has_conflict(&busy, updated.range) {
                debug!("Guarded approval rejected: booking {} lost its slot", id);
                return Err(BookingError::Conflict(updated.facility_id));
            }
        }

        bookings.insert(id, updated.clone());
        Ok(updated)
    }

    fn find_approved(&self, facility_id: Uuid, window: Option<TimeRange>) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read();
        let mut hits: Vec<Booking> = bookings
            .values()
            .filter(|b| b.facility_id == facility_id && b.status == BookingStatus::Approved)
            .filter(|b| window.map_or(true, |w| w.overlaps(&b.range)))
            .cloned()
            .collect();
        hits.sort_by_key(|b| b.range.start());
        Ok(hits)
    }

    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read();
        let mut hits: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.range.start().cmp(&a.range.start()));
        Ok(hits)
    }

    fn find_pending(&self) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read();
        let mut hits: Vec<Booking> = bookings
            .values()
            .filter(|b| b.status == BookingStatus::Pending)
            .cloned()
            .collect();
        hits.sort_by_key(|b| (b.created_at, b.range.start()));
        Ok(hits)
    }
}
