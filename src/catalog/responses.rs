//! Response DTOs for catalog endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::pricing::models::SeasonalPeriod;

use super::models::{DatePeriod, Season, Settings};

/// Period bounds listed under a season
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
}

impl From<&DatePeriod> for PeriodSummary {
    fn from(period: &DatePeriod) -> Self {
        Self {
            id: period.id,
            start_date: period.start_date,
            end_date: period.end_date,
            year: period.year,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub weekly_night_rate: Option<Decimal>,
    pub min_nights: i32,
    pub color: Option<String>,
    pub order: i32,
    pub date_periods: Vec<PeriodSummary>,
}

impl SeasonResponse {
    pub fn new(season: Season, date_periods: Vec<PeriodSummary>) -> Self {
        Self {
            id: season.id,
            name: season.name,
            price_per_night: season.price_per_night,
            weekly_night_rate: season.weekly_night_rate,
            min_nights: season.min_nights,
            color: season.color,
            order: season.display_order,
            date_periods,
        }
    }
}

/// Season fields embedded in a period
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub weekly_night_rate: Option<Decimal>,
    pub min_nights: i32,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePeriodResponse {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub year: i32,
    pub season_id: Uuid,
    pub season: SeasonInfo,
}

impl From<SeasonalPeriod> for DatePeriodResponse {
    fn from(row: SeasonalPeriod) -> Self {
        Self {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            year: row.year,
            season_id: row.season_id,
            season: SeasonInfo {
                id: row.season_id,
                name: row.season_name,
                price_per_night: row.price_per_night,
                weekly_night_rate: row.weekly_night_rate,
                min_nights: row.min_nights,
                color: row.color,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub default_price_per_night: Decimal,
}

impl From<&Settings> for SettingsResponse {
    fn from(settings: &Settings) -> Self {
        Self {
            default_price_per_night: settings.default_price_per_night,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyYearResponse {
    pub copied_count: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
