//! Tests for slot generation, including the booking scenarios the booking
//! page relies on.

use chrono::NaiveDate;
use slot_engine::conflict::{ForbiddenInterval, ForbiddenKind};
use slot_engine::slots::{compute_slots_with_tolerance, generate_slots};
use slot_engine::{
    compute_slots, Area, AvailabilityRule, BookedSlot, Interval, Location, OwnerRecords, TimeSlot,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn rule(id: &str, day: u8, start: &str, end: &str) -> AvailabilityRule {
    AvailabilityRule {
        id: id.to_string(),
        day_of_week: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn booking(id: &str, location_id: &str, date: &str, start: &str, end: &str) -> BookedSlot {
    BookedSlot {
        id: id.to_string(),
        location_id: location_id.to_string(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        customer_name: "Grace".to_string(),
        customer_email: "grace@example.com".to_string(),
    }
}

/// L1 and L2 in "Downtown" (30-minute buffer), L3 in "Uptown".
fn records(rules: Vec<AvailabilityRule>, bookings: Vec<BookedSlot>) -> OwnerRecords {
    OwnerRecords {
        locations: vec![
            Location {
                id: "L1".to_string(),
                name: "Main St".to_string(),
                area: "Downtown".to_string(),
            },
            Location {
                id: "L2".to_string(),
                name: "Harbour".to_string(),
                area: "Downtown".to_string(),
            },
            Location {
                id: "L3".to_string(),
                name: "Hilltop".to_string(),
                area: "Uptown".to_string(),
            },
        ],
        areas: vec![
            Area {
                name: "Downtown".to_string(),
                travel_buffer_minutes: 30,
            },
            Area {
                name: "Uptown".to_string(),
                travel_buffer_minutes: 45,
            },
        ],
        rules,
        bookings,
    }
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn starts(slots: &[TimeSlot]) -> Vec<&str> {
    slots.iter().map(|s| s.start_time.as_str()).collect()
}

fn spans(slots: &[TimeSlot]) -> Vec<(&str, &str)> {
    slots
        .iter()
        .map(|s| (s.start_time.as_str(), s.end_time.as_str()))
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn open_day_yields_hourly_slots() {
    let data = records(vec![rule("r1", 1, "09:00", "17:00")], vec![]);
    let slots = compute_slots(&data, "L1", monday(), 60);

    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0].start_time, "09:00");
    assert_eq!(slots[0].end_time, "10:00");
    assert_eq!(slots[7].start_time, "16:00");
    assert_eq!(slots[7].end_time, "17:00");
    assert!(slots.iter().all(|s| s.is_available));
}

#[test]
fn same_location_booking_removes_only_its_hour() {
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L1", "2026-03-16", "12:00", "13:00")],
    );
    let slots = compute_slots(&data, "L1", monday(), 60);

    assert_eq!(
        starts(&slots),
        vec!["09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00"]
    );
}

#[test]
fn same_area_booking_blocks_buffer_and_realigns_to_half_hour() {
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L2", "2026-03-16", "12:00", "13:00")],
    );
    let slots = compute_slots(&data, "L1", monday(), 60);

    assert_eq!(
        spans(&slots),
        vec![
            ("09:00", "10:00"),
            ("10:00", "11:00"),
            ("13:30", "14:30"),
            ("14:30", "15:30"),
            ("15:30", "16:30"),
        ]
    );
}

#[test]
fn other_area_booking_imposes_nothing() {
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L3", "2026-03-16", "12:00", "13:00")],
    );
    assert_eq!(compute_slots(&data, "L1", monday(), 60).len(), 8);
}

#[test]
fn closed_weekday_yields_nothing() {
    let data = records(vec![rule("r1", 2, "09:00", "17:00")], vec![]);
    assert!(compute_slots(&data, "L1", monday(), 60).is_empty());
}

#[test]
fn unknown_location_yields_nothing() {
    let data = records(vec![rule("r1", 1, "09:00", "17:00")], vec![]);
    assert!(compute_slots(&data, "nowhere", monday(), 60).is_empty());
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[test]
fn booking_covering_whole_rule_yields_nothing() {
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L1", "2026-03-16", "09:00", "17:00")],
    );
    assert!(compute_slots(&data, "L1", monday(), 60).is_empty());
}

#[test]
fn fragment_shorter_than_duration_yields_nothing() {
    let data = records(
        vec![rule("r1", 1, "09:00", "10:30")],
        vec![booking("b1", "L1", "2026-03-16", "09:00", "10:00")],
    );
    assert!(compute_slots(&data, "L1", monday(), 60).is_empty());
}

#[test]
fn zero_duration_yields_nothing() {
    let data = records(vec![rule("r1", 1, "09:00", "17:00")], vec![]);
    assert!(compute_slots(&data, "L1", monday(), 0).is_empty());
}

#[test]
fn mid_hour_rule_start_waits_for_the_hour() {
    let data = records(vec![rule("r1", 1, "09:30", "12:00")], vec![]);
    let slots = compute_slots(&data, "L1", monday(), 60);
    assert_eq!(starts(&slots), vec!["10:00", "11:00"]);
}

#[test]
fn buffer_ending_mid_hour_offers_next_half_hour() {
    // L2 09:00-09:45 plus 30 minutes ends the buffer at 10:15.
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L2", "2026-03-16", "09:00", "09:45")],
    );
    let slots = compute_slots(&data, "L1", monday(), 60);
    assert_eq!(
        starts(&slots),
        vec!["10:30", "11:30", "12:30", "13:30", "14:30", "15:30"]
    );
}

#[test]
fn unaligned_booking_uses_subtraction_not_nominal_grid() {
    // With 45-minute slots a nominal grid from 09:00 would offer 09:00,
    // 10:30 and 11:15 around a 10:00-10:30 booking. Subtracting first gives
    // the fragment 10:30-12:00, which snaps to 11:00.
    let data = records(
        vec![rule("r1", 1, "09:00", "12:00")],
        vec![booking("b1", "L1", "2026-03-16", "10:00", "10:30")],
    );
    let slots = compute_slots(&data, "L1", monday(), 45);
    assert_eq!(spans(&slots), vec![("09:00", "09:45"), ("11:00", "11:45")]);
}

#[test]
fn split_rules_keep_their_gap() {
    let data = records(
        vec![rule("am", 1, "09:00", "12:00"), rule("pm", 1, "13:00", "15:00")],
        vec![],
    );
    let slots = compute_slots(&data, "L1", monday(), 60);
    assert_eq!(starts(&slots), vec!["09:00", "10:00", "11:00", "13:00", "14:00"]);
}

#[test]
fn overlapping_rules_never_double_offer() {
    let data = records(
        vec![rule("a", 1, "10:00", "13:00"), rule("b", 1, "09:00", "12:00")],
        vec![],
    );
    let slots = compute_slots(&data, "L1", monday(), 60);
    assert_eq!(starts(&slots), vec!["09:00", "10:00", "11:00", "12:00"]);
}

#[test]
fn missing_area_means_zero_buffer() {
    let mut data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![booking("b1", "L2", "2026-03-16", "12:00", "13:00")],
    );
    data.areas.clear();
    let slots = compute_slots(&data, "L1", monday(), 60);
    assert_eq!(
        starts(&slots),
        vec!["09:00", "10:00", "11:00", "13:00", "14:00", "15:00", "16:00"]
    );
}

#[test]
fn tolerance_controls_buffer_adjacency() {
    // The L2 buffer ends at 13:00; an L1 booking until 13:01 starts the free
    // fragment one minute later.
    let data = records(
        vec![rule("r1", 1, "09:00", "17:00")],
        vec![
            booking("b1", "L2", "2026-03-16", "11:00", "12:30"),
            booking("b2", "L1", "2026-03-16", "12:30", "13:01"),
        ],
    );
    let tolerant = compute_slots_with_tolerance(&data, "L1", monday(), 60, 1);
    let strict = compute_slots_with_tolerance(&data, "L1", monday(), 60, 0);
    assert_eq!(starts(&tolerant), vec!["09:00", "13:30", "14:30", "15:30"]);
    assert_eq!(starts(&strict), vec!["09:00", "14:00", "15:00", "16:00"]);
}

#[test]
fn generate_slots_direct() {
    let open = [Interval::new(540, 1020)];
    let forbidden = [ForbiddenInterval {
        interval: Interval::new(690, 810),
        kind: ForbiddenKind::TravelBuffer,
    }];
    let slots = generate_slots(&open, &forbidden, 30);
    assert_eq!(slots.first().map(|s| s.start_time.as_str()), Some("09:00"));
    // 09:00-11:30 gives five half-hour slots, 13:30-17:00 gives seven.
    assert_eq!(slots.len(), 12);
    assert_eq!(slots[5].start_time, "13:30");
}
