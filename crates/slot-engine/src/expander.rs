//! Rule expansion -- turns weekly availability rules into open intervals for a date.
//!
//! Each rule that matches the date's weekday becomes one interval. Rules on
//! the same weekday stay independent: a morning and an afternoon block keep
//! their lunch gap, so nothing here merges.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::interval::Interval;
use crate::model::AvailabilityRule;

/// Weekday index with Sunday = 0, as stored in [`AvailabilityRule::day_of_week`].
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Validate a rule and convert its window to minutes.
///
/// # Errors
/// Returns `EngineError::InvalidRule` if the weekday is outside 0..=6, either
/// time is not "HH:MM", or the end is not after the start.
pub fn rule_interval(rule: &AvailabilityRule) -> Result<Interval> {
    if rule.day_of_week > 6 {
        return Err(EngineError::InvalidRule(format!(
            "rule {}: day_of_week {} is not in 0..=6",
            rule.id, rule.day_of_week
        )));
    }

    let interval = Interval::from_clock(&rule.start_time, &rule.end_time)
        .map_err(|e| EngineError::InvalidRule(format!("rule {}: {}", rule.id, e)))?;

    if interval.is_empty() {
        return Err(EngineError::InvalidRule(format!(
            "rule {}: end {} is not after start {}",
            rule.id, rule.end_time, rule.start_time
        )));
    }

    Ok(interval)
}

/// Expand the rules that apply on `date` into open intervals.
///
/// Malformed rules are skipped with a warning. Returns an empty list when no
/// rule matches the weekday; that is a normal "closed" day, not an error.
/// Output follows rule order.
pub fn expand_rules(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<Interval> {
    let weekday = weekday_index(date);

    rules
        .iter()
        .filter(|rule| rule.day_of_week == weekday)
        .filter_map(|rule| match rule_interval(rule) {
            Ok(interval) => Some(interval),
            Err(e) => {
                warn!(rule_id = %rule.id, error = %e, "skipping malformed availability rule");
                None
            }
        })
        .collect()
}
