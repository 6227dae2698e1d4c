//! Catalog models: seasons, date periods and the settings singleton.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates::DateRange;
use crate::error::AppError;

/// Season from `seasons`
#[derive(Debug, Clone, FromRow)]
pub struct Season {
    pub id: Uuid,
    pub name: String,
    pub price_per_night: Decimal,
    pub weekly_night_rate: Option<Decimal>,
    pub min_nights: i32,
    pub color: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Season {
    /// Check the administrator-entered fields before they are written.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Season name is required".to_string()));
        }
        if self.price_per_night < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Price per night must be zero or more".to_string(),
            ));
        }
        if let Some(weekly) = self.weekly_night_rate {
            if weekly < Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "Weekly night rate must be zero or more".to_string(),
                ));
            }
            if weekly > self.price_per_night {
                return Err(AppError::BadRequest(
                    "Weekly night rate cannot exceed the price per night".to_string(),
                ));
            }
        }
        if self.min_nights < 1 {
            return Err(AppError::BadRequest(
                "Minimum nights must be at least 1".to_string(),
            ));
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(AppError::BadRequest(
                    "Color must be a hexadecimal value (#RRGGBB)".to_string(),
                ));
            }
        }
        if self.display_order < 0 {
            return Err(AppError::BadRequest(
                "Display order must be zero or more".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Date period from `date_periods`
#[derive(Debug, Clone, FromRow)]
pub struct DatePeriod {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    pub season_id: Uuid,
}

impl DatePeriod {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// Settings singleton
#[derive(Debug, Clone, FromRow)]
pub struct Settings {
    pub default_price_per_night: Decimal,
}
