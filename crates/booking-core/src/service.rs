//! Request-level booking operations.
//!
//! `BookingService` ties the availability engine to a store: it validates
//! requests, runs the advisory conflict check against committed state, and
//! defers the final no-overlap guarantee to the store's guarded writes.
//! Callers pass roles and reference instants explicitly; the service keeps
//! no ambient clock or session state.

use availability_engine::{compute_day_slots, day_bounds, Slot, TimeRange};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::booking::{Booking, BookingRequest, Transition, UserRole};
use crate::error::{BookingError, Result};
use crate::facility::{Facility, FacilityFilter, FacilityUpdate, NewFacility};
use crate::store::{BookingStore, FacilityStore};

/// One facility-local day: the twelve 08:00-20:00 slots plus the approved
/// bookings that intersect the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Twelve hourly slots in chronological order.
    pub slots: Vec<Slot>,
    /// Approved bookings overlapping the local day, start ascending.
    pub bookings: Vec<Booking>,
}

/// Outcome of a conflict probe against committed approved bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflict: bool,
    /// The approved bookings that overlap the candidate, start ascending.
    pub conflicting: Vec<Booking>,
}

/// A facility together with its upcoming approved bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityDetail {
    pub facility: Facility,
    /// Approved bookings still running or starting at/after the reference
    /// instant, start ascending.
    pub upcoming: Vec<Booking>,
}

/// Outcome of removing a facility from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FacilityRemoval {
    /// Upcoming approved bookings exist, so the record was kept and hidden.
    Deactivated(Facility),
    /// No future commitments; the record is gone.
    Deleted,
}

/// The booking façade over one store.
#[derive(Debug)]
pub struct BookingService<S> {
    store: S,
    /// Campus timezone used to resolve facility-local days.
    tz: Tz,
}

impl<S> BookingService<S>
where
    S: BookingStore + FacilityStore,
{
    /// A service resolving local days in UTC.
    pub fn new(store: S) -> Self {
        Self::with_timezone(store, chrono_tz::UTC)
    }

    /// A service resolving local days in the campus timezone `tz`.
    pub fn with_timezone(store: S, tz: Tz) -> Self {
        Self { store, tz }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Creates a booking for `req.user_id` acting as `role`.
    ///
    /// Faculty and staff bookings are approved immediately; everyone else's
    /// enter the pending queue. The conflict check here is advisory — the
    /// store re-checks under its write guard before an approved booking is
    /// committed.
    pub fn create_booking(&self, req: BookingRequest, role: UserRole) -> Result<Booking> {
        if req.purpose.trim().is_empty() {
            return Err(BookingError::EmptyPurpose);
        }

        let facility = self
            .store
            .find_facility(req.facility_id)?
            .ok_or(BookingError::FacilityNotFound(req.facility_id))?;
        if !facility.active {
            return Err(BookingError::FacilityInactive(facility.id));
        }
        if req.attendees == 0 || req.attendees > facility.capacity {
            return Err(BookingError::InvalidAttendees {
                requested: req.attendees,
                capacity: facility.capacity,
            });
        }

        let report = self.check_conflict(req.facility_id, req.range)?;
        if report.conflict {
            return Err(BookingError::Conflict(req.facility_id));
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            facility_id: req.facility_id,
            range: req.range,
            status: role.initial_status(),
            purpose: req.purpose,
            attendees: req.attendees,
            notes: req.notes,
            rejection_reason: None,
            cancellation_reason: None,
            created_at: Utc::now(),
        };
        let booking = self.store.insert_booking(booking)?;
        info!(
            "Booking {} created {:?} for facility {}",
            booking.id, booking.status, booking.facility_id
        );
        Ok(booking)
    }

    /// Probes `range` against the committed approved bookings of a facility.
    pub fn check_conflict(&self, facility_id: Uuid, range: TimeRange) -> Result<ConflictReport> {
        let conflicting = self.store.find_approved(facility_id, Some(range))?;
        Ok(ConflictReport {
            conflict: !conflicting.is_empty(),
            conflicting,
        })
    }

    /// Availability of one facility on one local calendar day.
    ///
    /// Fetches the approved bookings intersecting `[00:00, 24:00)` of `date`
    /// in the campus timezone once, then marks each of the twelve hourly
    /// slots. An unknown facility simply has an empty snapshot: twelve
    /// available slots and no bookings.
    pub fn day_availability(&self, facility_id: Uuid, date: NaiveDate) -> Result<DayAvailability> {
        let bounds = day_bounds(date, self.tz);
        let bookings = self.store.find_approved(facility_id, Some(bounds))?;
        let busy: Vec<TimeRange> = bookings.iter().map(|b| b.range).collect();
        let slots: Vec<Slot> = compute_day_slots(date, self.tz, &busy);
        Ok(DayAvailability {
            date,
            slots,
            bookings,
        })
    }

    /// Approves a pending booking. The store re-validates the no-overlap
    /// invariant, so the second of two overlapping pendings cannot be
    /// approved.
    pub fn approve_booking(&self, id: Uuid) -> Result<Booking> {
        let booking = self.store.apply_transition(id, Transition::Approve)?;
        info!("Booking {} approved", id);
        Ok(booking)
    }

    /// Rejects a pending booking, recording `reason` when supplied.
    pub fn reject_booking(&self, id: Uuid, reason: Option<String>) -> Result<Booking> {
        let booking = self.store.apply_transition(id, Transition::Reject(reason))?;
        info!("Booking {} rejected", id);
        Ok(booking)
    }

    /// Cancels an approved booking, freeing its interval.
    pub fn cancel_booking(&self, id: Uuid, reason: Option<String>) -> Result<Booking> {
        let booking = self.store.apply_transition(id, Transition::Cancel(reason))?;
        info!("Booking {} cancelled", id);
        Ok(booking)
    }

    /// All bookings owned by a user, newest start first.
    pub fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        self.store.find_by_user(user_id)
    }

    /// The admin approval queue: pending bookings, oldest created first.
    pub fn pending_bookings(&self) -> Result<Vec<Booking>> {
        self.store.find_pending()
    }

    /// Adds a facility to the catalog.
    pub fn add_facility(&self, new: NewFacility) -> Result<Facility> {
        let facility = Facility {
            id: Uuid::new_v4(),
            name: new.name,
            kind: new.kind,
            capacity: new.capacity,
            description: new.description,
            location: new.location,
            building: new.building,
            floor: new.floor,
            equipment: new.equipment,
            amenities: new.amenities,
            active: true,
        };
        facility.validate()?;
        self.store.insert_facility(facility.clone())?;
        info!("Facility {} added to the catalog", facility.id);
        Ok(facility)
    }

    /// Applies a partial update to a facility.
    pub fn update_facility(&self, id: Uuid, update: FacilityUpdate) -> Result<Facility> {
        let mut facility = self
            .store
            .find_facility(id)?
            .ok_or(BookingError::FacilityNotFound(id))?;
        update.apply_to(&mut facility);
        facility.validate()?;
        self.store.update_facility(facility.clone())?;
        Ok(facility)
    }

    /// Removes a facility. With approved bookings still running or ahead of
    /// `as_of` the record is deactivated instead of deleted, so those
    /// bookings keep a valid reference.
    pub fn remove_facility(&self, id: Uuid, as_of: DateTime<Utc>) -> Result<FacilityRemoval> {
        if self.store.find_facility(id)?.is_none() {
            return Err(BookingError::FacilityNotFound(id));
        }

        let upcoming = self.store.find_approved(id, Some(upcoming_window(as_of)?))?;
        if upcoming.is_empty() {
            self.store.delete_facility(id)?;
            info!("Facility {} deleted", id);
            Ok(FacilityRemoval::Deleted)
        } else {
            let facility = self.store.deactivate_facility(id)?;
            info!(
                "Facility {} deactivated ({} upcoming bookings)",
                id,
                upcoming.len()
            );
            Ok(FacilityRemoval::Deactivated(facility))
        }
    }

    /// Active facilities matching `filter`, sorted by name.
    pub fn facilities(&self, filter: &FacilityFilter) -> Result<Vec<Facility>> {
        let mut hits: Vec<Facility> = self
            .store
            .find_facilities()?
            .into_iter()
            .filter(|f| f.active && filter.matches(f))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hits)
    }

    /// One facility plus its upcoming approved bookings as of `as_of`.
    pub fn facility_detail(&self, id: Uuid, as_of: DateTime<Utc>) -> Result<FacilityDetail> {
        let facility = self
            .store
            .find_facility(id)?
            .ok_or(BookingError::FacilityNotFound(id))?;
        let upcoming = self.store.find_approved(id, Some(upcoming_window(as_of)?))?;
        Ok(FacilityDetail { facility, upcoming })
    }
}

/// `[as_of, ∞)` — a booking is upcoming when it overlaps this window, so
/// one already in progress still counts.
fn upcoming_window(as_of: DateTime<Utc>) -> Result<TimeRange> {
    Ok(TimeRange::new(as_of, DateTime::<Utc>::MAX_UTC)?)
}
