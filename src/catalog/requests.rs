//! Request DTOs for catalog endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::dates::{deserialize_date, deserialize_optional_date};
use crate::extract::nullable;

/// Request to create a season
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeasonRequest {
    pub name: String,
    pub price_per_night: Decimal,
    #[serde(default)]
    pub weekly_night_rate: Option<Decimal>,
    #[serde(default)]
    pub min_nights: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Partial season update. `weeklyNightRate` and `color` accept `null` to clear.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSeasonRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_per_night: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub weekly_night_rate: Option<Option<Decimal>>,
    #[serde(default)]
    pub min_nights: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub color: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Request to create a date period. The period's year is its start date's year.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatePeriodRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    pub season_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatePeriodRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub season_id: Option<Uuid>,
}

/// Query parameters for period listing
#[derive(Debug, Deserialize)]
pub struct DatePeriodListQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Request to duplicate a year's periods into another year
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyYearRequest {
    pub source_year: i32,
    pub target_year: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub default_price_per_night: Decimal,
}
