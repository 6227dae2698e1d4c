//! Calendar date helpers shared by the catalog, the pricing engine and bookings.
//!
//! All ranges are half-open: a stay from the 1st to the 4th covers the nights of
//! the 1st, 2nd and 3rd. A period ending on the 4th does not cover the 4th.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// A half-open `[start, end)` interval of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting empty or inverted intervals.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::BadRequest(
                "Start date must be before end date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// `start <= date < end`
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Three-way half-open overlap test.
    ///
    /// True when `other` starts inside `self`, ends inside `self`, or fully
    /// encloses `self`. Touching ranges (`self.end == other.start`) do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        (self.start <= other.start && other.start < self.end)
            || (self.start < other.end && other.end <= self.end)
            || (other.start <= self.start && self.end <= other.end)
    }

    pub fn nights(&self) -> i64 {
        nights_between(self.start, self.end)
    }

    /// Calendar years from the start date's year to the end date's year, inclusive.
    pub fn years(&self) -> Vec<i32> {
        (self.start.year()..=self.end.year()).collect()
    }
}

/// Whole days between two calendar dates.
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Move a date by `offset` years. Feb 29 lands on Mar 1 in a non-leap year.
pub fn shift_years(date: NaiveDate, offset: i32) -> Option<NaiveDate> {
    let year = date.year() + offset;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
