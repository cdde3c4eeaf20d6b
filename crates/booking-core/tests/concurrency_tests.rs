//! Races between concurrent booking writers.
//!
//! The advisory conflict check reads committed state and cannot by itself
//! stop two requests racing for the same slot: both can observe an empty
//! snapshot and proceed. What these tests pin down is the store's guarded
//! writes — the write lock spanning re-check and commit — letting exactly
//! one of the racers land.

use std::sync::Arc;
use std::thread;

use availability_engine::TimeRange;
use booking_core::{
    BookingError, BookingRequest, BookingService, BookingStatus, BookingStore, FacilityKind,
    MemoryStore, NewFacility, UserRole,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn service_with_facility() -> (Arc<BookingService<MemoryStore>>, Uuid) {
    let svc = BookingService::new(MemoryStore::new());
    let facility = svc
        .add_facility(NewFacility {
            name: "Contended Room".to_string(),
            kind: FacilityKind::MeetingRoom,
            capacity: 30,
            description: None,
            location: "Main campus".to_string(),
            building: "Science Hall".to_string(),
            floor: Some(1),
            equipment: vec![],
            amenities: vec![],
        })
        .unwrap();
    (Arc::new(svc), facility.id)
}

fn range(start_hour: u32, end_hour: u32) -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2026, 3, 2, start_hour, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, end_hour, 0, 0).unwrap(),
    )
    .unwrap()
}

fn request(facility_id: Uuid, range: TimeRange) -> BookingRequest {
    BookingRequest {
        user_id: Uuid::new_v4(),
        facility_id,
        range,
        purpose: "Popular slot".to_string(),
        attendees: 2,
        notes: None,
    }
}

#[test]
fn two_racing_auto_approved_bookings_produce_one_winner() {
    let (svc, facility_id) = service_with_facility();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                svc.create_booking(request(facility_id, range(10, 12)), UserRole::Staff)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one of the two racers may land");
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == BookingError::Conflict(facility_id)));

    let approved = svc.store().find_approved(facility_id, None).unwrap();
    assert_eq!(approved.len(), 1);
}

#[test]
fn many_racing_creators_never_overlap() {
    let (svc, facility_id) = service_with_facility();
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                svc.create_booking(request(facility_id, range(14, 16)), UserRole::Faculty)
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(winners, 1, "{threads} racers, one slot, one winner");

    let approved = svc.store().find_approved(facility_id, None).unwrap();
    assert_eq!(approved.len(), 1);
    for pair in approved.windows(2) {
        assert!(
            !pair[0].range.overlaps(&pair[1].range),
            "committed approved bookings must never overlap"
        );
    }
}

#[test]
fn racing_creators_on_disjoint_slots_all_succeed() {
    let (svc, facility_id) = service_with_facility();

    let handles: Vec<_> = (8..12)
        .map(|hour| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                svc.create_booking(request(facility_id, range(hour, hour + 1)), UserRole::Staff)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let approved = svc.store().find_approved(facility_id, None).unwrap();
    assert_eq!(approved.len(), 4, "back-to-back hourly bookings never collide");
}

#[test]
fn racing_approvals_of_overlapping_pendings_admit_one() {
    let (svc, facility_id) = service_with_facility();

    // Five students all request the same slot; all enter the queue.
    let pending_ids: Vec<Uuid> = (0..5)
        .map(|_| {
            svc.create_booking(request(facility_id, range(10, 12)), UserRole::Student)
                .unwrap()
                .id
        })
        .collect();

    let handles: Vec<_> = pending_ids
        .iter()
        .map(|&id| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.approve_booking(id))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let approved = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(approved, 1, "the approval guard admits exactly one of the overlap");

    // The losers are still pending and can be rejected normally.
    let still_pending = svc
        .pending_bookings()
        .unwrap()
        .iter()
        .filter(|b| b.status == BookingStatus::Pending)
        .count();
    assert_eq!(still_pending, 4);
}
