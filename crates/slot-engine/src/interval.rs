//! Half-open minute intervals within a single calendar day.
//!
//! All engine arithmetic happens on `[start, end)` in minutes since midnight.
//! Intervals may extend outside `0..1440` (a travel buffer around an early
//! booking can start "before midnight"); subtraction clips naturally because
//! only the base interval's minutes can survive.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A half-open `[start, end)` range of minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Widen by `minutes` on both sides.
    pub fn expand(&self, minutes: i64) -> Self {
        Self {
            start: self.start - minutes,
            end: self.end + minutes,
        }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self, other)
    }

    /// Parse a pair of "HH:MM" strings into an interval.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTime` if either string is malformed.
    pub fn from_clock(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_clock(start)?,
            end: parse_clock(end)?,
        })
    }
}

/// Two intervals overlap when `a.start < b.end && b.start < a.end`.
///
/// Touching intervals (`a.end == b.start`) do not overlap, and an empty
/// interval overlaps nothing.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    !a.is_empty() && !b.is_empty() && a.start < b.end && b.start < a.end
}

/// Remove every `cut` from `base`.
///
/// Each surviving fragment is split against each cut in turn. Cuts may be
/// unordered and may overlap one another. Returns the maximal uncovered
/// sub-intervals of `base` in ascending order; empty fragments are dropped.
pub fn subtract(base: Interval, cuts: &[Interval]) -> Vec<Interval> {
    if base.is_empty() {
        return Vec::new();
    }

    let mut fragments = vec![base];
    for cut in cuts {
        if cut.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(fragments.len() + 1);
        for fragment in fragments {
            if !overlaps(&fragment, cut) {
                next.push(fragment);
                continue;
            }
            let left = Interval::new(fragment.start, cut.start);
            let right = Interval::new(cut.end, fragment.end);
            if !left.is_empty() {
                next.push(left);
            }
            if !right.is_empty() {
                next.push(right);
            }
        }
        fragments = next;
    }

    // Splitting preserves order, but keep the guarantee explicit.
    fragments.sort();
    fragments
}

/// Parse "HH:MM" (24-hour) into minutes since midnight.
///
/// # Errors
/// Returns `EngineError::InvalidTime` for anything `chrono` rejects with
/// `%H:%M`, including "24:00".
pub fn parse_clock(s: &str) -> Result<i64> {
    let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| EngineError::InvalidTime(format!("'{}': {}", s, e)))?;
    Ok(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}

/// Format minutes since midnight as zero-padded "HH:MM".
pub fn format_clock(minutes: i64) -> String {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Parse "YYYY-MM-DD".
///
/// # Errors
/// Returns `EngineError::InvalidDate` if the string is not a real calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| EngineError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Format a date as "YYYY-MM-DD".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
