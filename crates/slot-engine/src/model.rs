//! Persisted records and engine output types.
//!
//! Field names serialize as camelCase so snapshots written by the booking and
//! admin front ends deserialize without translation. Time and date fields stay
//! as strings here; they are validated when a computation reads them, so one
//! corrupt record never hides the rest of an owner's data.

use serde::{Deserialize, Serialize};

/// A physical place where appointments happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Name of the [`Area`] this location belongs to.
    pub area: String,
}

/// A named group of locations that share a travel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Unique per owner.
    pub name: String,
    /// Minutes blocked before and after a booking at one location of the
    /// area, for every other location of the same area.
    pub travel_buffer_minutes: u32,
}

/// A recurring weekly open window, e.g. Mondays 09:00-17:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    pub id: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// "HH:MM", 24-hour.
    pub start_time: String,
    /// "HH:MM", 24-hour. Must be after `start_time` on the same day.
    pub end_time: String,
}

/// An appointment that has been booked at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    pub id: String,
    pub location_id: String,
    /// "YYYY-MM-DD".
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// A bookable window produced by the engine. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

/// Customer details submitted with a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_email: String,
}

/// Everything the engine needs about one owner, fetched in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecords {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub rules: Vec<AvailabilityRule>,
    #[serde(default)]
    pub bookings: Vec<BookedSlot>,
}

impl OwnerRecords {
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Travel buffer for an area, or 0 when the area is not configured.
    pub fn buffer_minutes_for(&self, area: &str) -> u32 {
        self.areas
            .iter()
            .find(|a| a.name == area)
            .map(|a| a.travel_buffer_minutes)
            .unwrap_or(0)
    }
}
