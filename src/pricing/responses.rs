//! Response DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One contiguous span of nights priced under a single season.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetail {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: i64,
    pub season_id: Uuid,
    pub season_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
}

/// Result of pricing a stay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculation {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub total_nights: i64,
    pub is_weekly_rate: bool,
    pub min_nights_required: i32,
    pub details: Vec<PriceDetail>,
    pub has_uncovered_days: bool,
    pub uncovered_days: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub default_price_per_night: Decimal,
}

/// Customer-facing row of the yearly price grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGridPeriod {
    pub season_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub weekly_price: Decimal,
    pub min_nights: i32,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicGrid {
    pub year: i32,
    pub periods: Vec<PublicGridPeriod>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinNightsResponse {
    pub min_nights: i32,
}
