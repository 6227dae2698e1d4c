//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates::DateRange;

/// A date period joined with the season that prices it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SeasonalPeriod {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    pub season_id: Uuid,
    pub season_name: String,
    pub price_per_night: Decimal,
    pub weekly_night_rate: Option<Decimal>,
    pub min_nights: i32,
    pub color: Option<String>,
    pub season_order: i32,
}

impl SeasonalPeriod {
    /// The period's `[start_date, end_date)` interval.
    ///
    /// Rows are checked `start_date < end_date` by the schema, so this never
    /// has to reject anything.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Per-night rate for a stay. The weekly rate only wins when the stay
    /// qualifies and the season defines one.
    pub fn rate_for(&self, is_weekly_rate: bool) -> Decimal {
        match self.weekly_night_rate {
            Some(weekly) if is_weekly_rate => weekly,
            _ => self.price_per_night,
        }
    }
}
