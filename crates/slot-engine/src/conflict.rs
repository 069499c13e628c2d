//! Collect the intervals that must be excluded from a location's availability.
//!
//! Two sources contribute:
//! - bookings at the target location, taken exactly as booked;
//! - bookings at *other* locations in the same area, widened on both sides by
//!   the area's travel buffer.
//!
//! Locations in other areas contribute nothing. The result is a flat list and
//! may contain overlapping entries; [`crate::interval::subtract`] tolerates that.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::interval::{parse_date, Interval};
use crate::model::{BookedSlot, Location};

/// Why an interval is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForbiddenKind {
    /// A booking at the location being queried.
    Booking,
    /// A booking at another location in the same area, padded by the buffer.
    TravelBuffer,
}

/// A time range that no slot may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForbiddenInterval {
    pub interval: Interval,
    pub kind: ForbiddenKind,
}

/// Validate a booking and convert its window to minutes.
///
/// # Errors
/// Returns `EngineError::InvalidBooking` if either time is not "HH:MM" or the
/// end is not after the start.
pub fn booking_interval(booking: &BookedSlot) -> Result<Interval> {
    let interval = Interval::from_clock(&booking.start_time, &booking.end_time)
        .map_err(|e| EngineError::InvalidBooking(format!("booking {}: {}", booking.id, e)))?;

    if interval.is_empty() {
        return Err(EngineError::InvalidBooking(format!(
            "booking {}: end {} is not after start {}",
            booking.id, booking.end_time, booking.start_time
        )));
    }

    Ok(interval)
}

/// Gather every forbidden interval for `target` on `date`.
///
/// `bookings` may span any dates; only those on `date` are considered.
/// `locations` resolves the area of each booking's location; bookings whose
/// location is unknown impose nothing. Malformed bookings are skipped with a
/// warning.
pub fn collect_forbidden(
    target: &Location,
    date: NaiveDate,
    bookings: &[BookedSlot],
    locations: &[Location],
    buffer_minutes: u32,
) -> Vec<ForbiddenInterval> {
    let buffer = i64::from(buffer_minutes);
    let mut forbidden = Vec::new();

    for booking in bookings {
        match parse_date(&booking.date) {
            Ok(d) if d == date => {}
            Ok(_) => continue,
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "skipping booking with malformed date");
                continue;
            }
        }

        let kind = if booking.location_id == target.id {
            ForbiddenKind::Booking
        } else {
            let same_area = locations
                .iter()
                .any(|l| l.id == booking.location_id && l.area == target.area);
            if !same_area {
                continue;
            }
            ForbiddenKind::TravelBuffer
        };

        let interval = match booking_interval(booking) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(booking_id = %booking.id, error = %e, "skipping malformed booking");
                continue;
            }
        };

        forbidden.push(ForbiddenInterval {
            interval: match kind {
                ForbiddenKind::Booking => interval,
                ForbiddenKind::TravelBuffer => interval.expand(buffer),
            },
            kind,
        });
    }

    forbidden
}
