//! Slot generation: open time minus forbidden time, cut into fixed-length slots.
//!
//! For every open interval independently:
//! 1. subtract all forbidden intervals to get free fragments;
//! 2. pick a start alignment per fragment (see [`Alignment`]);
//! 3. emit back-to-back slots of the requested length until the next one
//!    would run past the fragment's end.
//!
//! Slots that would conflict are omitted rather than flagged, so every
//! emitted [`TimeSlot`] has `is_available == true`.

use chrono::NaiveDate;
use tracing::debug;

use crate::conflict::{collect_forbidden, ForbiddenInterval, ForbiddenKind};
use crate::expander::expand_rules;
use crate::interval::{format_clock, overlaps, subtract, Interval};
use crate::model::{OwnerRecords, TimeSlot};

/// Slot length used when the caller does not ask for one.
pub const DEFAULT_SLOT_MINUTES: u32 = 60;

/// How close (in minutes) a fragment start must be to the end of a travel
/// buffer to count as buffer-adjacent.
pub const BUFFER_EDGE_TOLERANCE_MINUTES: i64 = 1;

/// Grid the first slot of a free fragment snaps to.
///
/// Fragments that begin where a travel buffer ends may start mid-hour
/// (e.g. 13:30) and snap to the half hour so the earliest sensible slot is
/// offered. Everything else snaps to the whole hour.
// TODO: collapse to a single fixed grid (15 or 30 minutes) once the
// product decides whether hour-aligned slots are still wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Hour,
    HalfHour,
}

impl Alignment {
    pub fn grid_minutes(self) -> i64 {
        match self {
            Alignment::Hour => 60,
            Alignment::HalfHour => 30,
        }
    }

    /// Smallest grid point at or after `minute`.
    pub fn align_up(self, minute: i64) -> i64 {
        let grid = self.grid_minutes();
        (minute + grid - 1).div_euclid(grid) * grid
    }
}

/// Choose the alignment for a free fragment.
pub fn alignment_for(
    fragment: &Interval,
    forbidden: &[ForbiddenInterval],
    tolerance_minutes: i64,
) -> Alignment {
    let after_buffer = forbidden.iter().any(|f| {
        f.kind == ForbiddenKind::TravelBuffer
            && (fragment.start - f.interval.end).abs() <= tolerance_minutes
    });
    if after_buffer {
        Alignment::HalfHour
    } else {
        Alignment::Hour
    }
}

/// Cut open intervals into available slots, using the default buffer-edge
/// tolerance.
pub fn generate_slots(
    open: &[Interval],
    forbidden: &[ForbiddenInterval],
    slot_minutes: u32,
) -> Vec<TimeSlot> {
    generate_slots_with_tolerance(open, forbidden, slot_minutes, BUFFER_EDGE_TOLERANCE_MINUTES)
}

/// Cut open intervals into available slots.
///
/// Output is sorted by start time. When two rules on the same weekday
/// overlap, a slot that would overlap an earlier one is dropped, so the
/// result never double-offers the same minutes. A zero `slot_minutes`
/// yields nothing.
pub fn generate_slots_with_tolerance(
    open: &[Interval],
    forbidden: &[ForbiddenInterval],
    slot_minutes: u32,
    tolerance_minutes: i64,
) -> Vec<TimeSlot> {
    if slot_minutes == 0 {
        return Vec::new();
    }
    let step = i64::from(slot_minutes);
    let cuts: Vec<Interval> = forbidden.iter().map(|f| f.interval).collect();

    let mut candidates = Vec::new();
    for base in open {
        for fragment in subtract(*base, &cuts) {
            if fragment.duration_minutes() < step {
                continue;
            }
            let alignment = alignment_for(&fragment, forbidden, tolerance_minutes);
            let mut cursor = alignment.align_up(fragment.start);
            while cursor + step <= fragment.end {
                candidates.push(Interval::new(cursor, cursor + step));
                cursor += step;
            }
        }
    }

    candidates.sort();
    let mut accepted: Vec<Interval> = Vec::with_capacity(candidates.len());
    for slot in candidates {
        if accepted.last().is_some_and(|last| overlaps(last, &slot)) {
            continue;
        }
        accepted.push(slot);
    }

    accepted
        .into_iter()
        .map(|slot| TimeSlot {
            start_time: format_clock(slot.start),
            end_time: format_clock(slot.end),
            is_available: true,
        })
        .collect()
}

/// Compute the bookable slots for one location on one date from an owner's
/// records, using the default buffer-edge tolerance.
///
/// Returns an empty list when the location is unknown or no rule applies.
pub fn compute_slots(
    records: &OwnerRecords,
    location_id: &str,
    date: NaiveDate,
    slot_minutes: u32,
) -> Vec<TimeSlot> {
    compute_slots_with_tolerance(
        records,
        location_id,
        date,
        slot_minutes,
        BUFFER_EDGE_TOLERANCE_MINUTES,
    )
}

/// [`compute_slots`] with an explicit buffer-edge tolerance.
pub fn compute_slots_with_tolerance(
    records: &OwnerRecords,
    location_id: &str,
    date: NaiveDate,
    slot_minutes: u32,
    tolerance_minutes: i64,
) -> Vec<TimeSlot> {
    let Some(location) = records.location(location_id) else {
        debug!(location_id, "unknown location; no slots");
        return Vec::new();
    };

    let open = expand_rules(&records.rules, date);
    if open.is_empty() {
        debug!(location_id, %date, "no availability rule for weekday");
        return Vec::new();
    }

    let buffer = records.buffer_minutes_for(&location.area);
    let forbidden = collect_forbidden(location, date, &records.bookings, &records.locations, buffer);
    let slots = generate_slots_with_tolerance(&open, &forbidden, slot_minutes, tolerance_minutes);

    debug!(
        location_id,
        %date,
        open = open.len(),
        forbidden = forbidden.len(),
        slots = slots.len(),
        "computed slots"
    );
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_snaps_to_grid() {
        assert_eq!(Alignment::Hour.align_up(540), 540);
        assert_eq!(Alignment::Hour.align_up(541), 600);
        assert_eq!(Alignment::HalfHour.align_up(585), 600);
        assert_eq!(Alignment::HalfHour.align_up(810), 810);
    }

    #[test]
    fn tolerance_widens_buffer_adjacency() {
        let buffer = ForbiddenInterval {
            interval: Interval::new(690, 810),
            kind: ForbiddenKind::TravelBuffer,
        };
        let fragment = Interval::new(811, 1020);
        assert_eq!(alignment_for(&fragment, &[buffer], 1), Alignment::HalfHour);
        assert_eq!(alignment_for(&fragment, &[buffer], 0), Alignment::Hour);
    }
}
