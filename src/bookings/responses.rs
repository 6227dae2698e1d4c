//! Response DTOs for booking endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::pricing::PriceDetail;

use super::models::{Booking, BookingSource, BookingStatus, BookingType, Client};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: i64,
    pub status: BookingStatus,
    pub booking_type: BookingType,
    pub primary_client: Option<Client>,
    pub occupants_count: i32,
    pub adults_count: i32,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub rental_price: Option<Decimal>,
    pub tourist_tax_included: bool,
    pub cleaning_included: bool,
    pub cleaning_offered: bool,
    pub linen_included: bool,
    pub linen_offered: bool,
    pub notes: Option<String>,
    pub source: Option<BookingSource>,
    pub source_custom_name: Option<String>,
    pub label: Option<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub external_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            start_date: b.start_date,
            end_date: b.end_date,
            nights: b.nights(),
            status: b.status,
            booking_type: b.booking_type(),
            primary_client: b.primary_client,
            occupants_count: b.occupants_count,
            adults_count: b.adults_count,
            rental_price: b.rental_price,
            tourist_tax_included: b.tourist_tax_included,
            cleaning_included: b.cleaning_included,
            cleaning_offered: b.cleaning_offered,
            linen_included: b.linen_included,
            linen_offered: b.linen_offered,
            notes: b.notes,
            source: b.source,
            source_custom_name: b.source_custom_name,
            label: b.label,
            external_amount: b.external_amount,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// The booking a requested stay collides with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetail {
    pub id: Uuid,
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<BookingSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Booking> for ConflictDetail {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id,
            client_name: b.primary_client.as_ref().map(Client::full_name),
            source: b.source,
            label: b.label.clone(),
            start_date: b.start_date,
            end_date: b.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub min_nights_required: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_detail: Option<ConflictDetail>,
}

/// Occupied range shown on the availability calendar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Money breakdown rendered on contracts and invoices
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub booking_id: Uuid,
    pub nights_count: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub rental_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cleaning_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub linen_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tourist_tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_details: Option<Vec<PriceDetail>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
