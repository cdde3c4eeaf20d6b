//! The facility catalog: bookable spaces, their kinds, and search filters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BookingError, Result};

/// The kind of bookable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacilityKind {
    Classroom,
    Auditorium,
    Lab,
    MeetingRoom,
    StudyRoom,
}

/// A bookable space. The daily operating window is a fixed 08:00-20:00 in
/// facility-local wall time, not configurable per facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub kind: FacilityKind,
    /// Maximum headcount, at least 1.
    pub capacity: u32,
    pub description: Option<String>,
    pub location: String,
    pub building: String,
    pub floor: Option<i32>,
    pub equipment: Vec<String>,
    pub amenities: Vec<String>,
    /// Inactive facilities are hidden from the catalog and refuse bookings.
    pub active: bool,
}

impl Facility {
    /// Checks the catalog invariants: name, location and building are
    /// non-blank and capacity is at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BookingError::MissingField("name"));
        }
        if self.location.trim().is_empty() {
            return Err(BookingError::MissingField("location"));
        }
        if self.building.trim().is_empty() {
            return Err(BookingError::MissingField("building"));
        }
        if self.capacity == 0 {
            return Err(BookingError::InvalidCapacity);
        }
        Ok(())
    }
}

/// Input for adding a facility. The service fills in the identifier and
/// marks the record active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
    pub kind: FacilityKind,
    pub capacity: u32,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    pub building: String,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Partial update for a facility; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityUpdate {
    pub name: Option<String>,
    pub kind: Option<FacilityKind>,
    pub capacity: Option<u32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub equipment: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl FacilityUpdate {
    /// Copies the set fields onto `facility`.
    pub(crate) fn apply_to(self, facility: &mut Facility) {
        if let Some(name) = self.name {
            facility.name = name;
        }
        if let Some(kind) = self.kind {
            facility.kind = kind;
        }
        if let Some(capacity) = self.capacity {
            facility.capacity = capacity;
        }
        if let Some(description) = self.description {
            facility.description = Some(description);
        }
        if let Some(location) = self.location {
            facility.location = location;
        }
        if let Some(building) = self.building {
            facility.building = building;
        }
        if let Some(floor) = self.floor {
            facility.floor = Some(floor);
        }
        if let Some(equipment) = self.equipment {
            facility.equipment = equipment;
        }
        if let Some(amenities) = self.amenities {
            facility.amenities = amenities;
        }
        if let Some(active) = self.active {
            facility.active = active;
        }
    }
}

/// Catalog search criteria. An empty filter matches every active facility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityFilter {
    pub kind: Option<FacilityKind>,
    /// Keep facilities that seat at least this many.
    pub min_capacity: Option<u32>,
    /// Case-insensitive substring match on the building name.
    pub building: Option<String>,
}

impl FacilityFilter {
    pub fn matches(&self, facility: &Facility) -> bool {
        if let Some(kind) = self.kind {
            if facility.kind != kind {
                return false;
            }
        }
        if let Some(min) = self.min_capacity {
            if facility.capacity < min {
                return false;
            }
        }
        if let Some(building) = &self.building {
            let needle = building.to_lowercase();
            if !facility.building.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
