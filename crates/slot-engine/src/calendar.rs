//! Month-level availability index for date pickers.
//!
//! Answers "might this day have openings?" from rules alone. A day listed
//! here can still produce zero slots if bookings consume it.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::expander::{rule_interval, weekday_index};
use crate::model::AvailabilityRule;

/// Every date of `month` in `year`, or `None` for an invalid month.
fn month_days(year: i32, month: u32) -> Option<impl Iterator<Item = NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.iter_days().take_while(move |d| d.month() == month))
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    month_days(year, month).map(|days| days.count() as u32)
}

/// Weekdays (Sunday = 0) that have at least one well-formed rule.
pub fn open_weekdays(rules: &[AvailabilityRule]) -> BTreeSet<u8> {
    rules
        .iter()
        .filter_map(|rule| match rule_interval(rule) {
            Ok(_) => Some(rule.day_of_week),
            Err(e) => {
                warn!(rule_id = %rule.id, error = %e, "skipping malformed availability rule");
                None
            }
        })
        .collect()
}

/// Every date in the month whose weekday has a rule, in ascending order.
///
/// `month` is 1-based. An invalid month yields an empty list.
pub fn available_days(rules: &[AvailabilityRule], year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(days) = month_days(year, month) else {
        debug!(year, month, "invalid month; no available days");
        return Vec::new();
    };

    let weekdays = open_weekdays(rules);
    if weekdays.is_empty() {
        return Vec::new();
    }

    days.filter(|d| weekdays.contains(&weekday_index(*d))).collect()
}
