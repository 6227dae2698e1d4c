//! Booking and client models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::dates::DateRange;

/// Most guests the house takes
pub const MAX_OCCUPANTS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking status '{0}'")]
pub struct UnknownStatus(String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where a booking came from when it was not taken directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSource {
    Abritel,
    Airbnb,
    BookingCom,
    Personal,
    Family,
    Other,
}

impl BookingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingSource::Abritel => "abritel",
            BookingSource::Airbnb => "airbnb",
            BookingSource::BookingCom => "booking_com",
            BookingSource::Personal => "personal",
            BookingSource::Family => "family",
            BookingSource::Other => "other",
        }
    }

    pub fn booking_type(&self) -> BookingType {
        match self {
            BookingSource::Personal | BookingSource::Family => BookingType::Personal,
            BookingSource::Abritel
            | BookingSource::Airbnb
            | BookingSource::BookingCom
            | BookingSource::Other => BookingType::External,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown booking source '{0}'")]
pub struct UnknownSource(String);

impl FromStr for BookingSource {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abritel" => Ok(BookingSource::Abritel),
            "airbnb" => Ok(BookingSource::Airbnb),
            "booking_com" => Ok(BookingSource::BookingCom),
            "personal" => Ok(BookingSource::Personal),
            "family" => Ok(BookingSource::Family),
            "other" => Ok(BookingSource::Other),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// Direct bookings are priced by the engine; the others only block dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Direct,
    External,
    Personal,
}

/// Guest named on the contract
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub phone: String,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Booking with its primary client
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub primary_client: Option<Client>,
    pub occupants_count: i32,
    pub adults_count: i32,
    /// `None` for channel and personal bookings
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
    pub external_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn booking_type(&self) -> BookingType {
        self.source
            .map(|source| source.booking_type())
            .unwrap_or(BookingType::Direct)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn nights(&self) -> i64 {
        self.range().nights()
    }
}

/// `bookings LEFT JOIN clients` row
#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub occupants_count: i32,
    pub adults_count: i32,
    pub rental_price: Option<Decimal>,
    pub tourist_tax_included: bool,
    pub cleaning_included: bool,
    pub cleaning_offered: bool,
    pub linen_included: bool,
    pub linen_offered: bool,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub source_custom_name: Option<String>,
    pub label: Option<String>,
    pub external_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client_id: Option<Uuid>,
    pub client_first_name: Option<String>,
    pub client_last_name: Option<String>,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub client_city: Option<String>,
    pub client_postal_code: Option<String>,
    pub client_country: Option<String>,
    pub client_phone: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = UnknownSource;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let source: Option<BookingSource> = row.source.as_deref().map(str::parse).transpose()?;
        let primary_client = row.client_id.map(|id| Client {
            id,
            first_name: row.client_first_name.unwrap_or_default(),
            last_name: row.client_last_name.unwrap_or_default(),
            email: row.client_email,
            address: row.client_address.unwrap_or_default(),
            city: row.client_city.unwrap_or_default(),
            postal_code: row.client_postal_code.unwrap_or_default(),
            country: row.client_country,
            phone: row.client_phone.unwrap_or_default(),
        });

        Ok(Self {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status,
            primary_client,
            occupants_count: row.occupants_count,
            adults_count: row.adults_count,
            rental_price: row.rental_price,
            tourist_tax_included: row.tourist_tax_included,
            cleaning_included: row.cleaning_included,
            cleaning_offered: row.cleaning_offered,
            linen_included: row.linen_included,
            linen_offered: row.linen_offered,
            notes: row.notes,
            source,
            source_custom_name: row.source_custom_name,
            label: row.label,
            external_amount: row.external_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("pending".parse::<BookingStatus>().unwrap(), BookingStatus::Pending);
        assert_eq!(
            BookingStatus::try_from("cancelled".to_string()).unwrap(),
            BookingStatus::Cancelled
        );
        assert!("PENDING".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::Confirmed.to_string(), "confirmed");
    }

    #[test]
    fn test_channel_sources_map_to_booking_type() {
        assert_eq!(BookingSource::Airbnb.booking_type(), BookingType::External);
        assert_eq!(BookingSource::BookingCom.booking_type(), BookingType::External);
        assert_eq!(BookingSource::Other.booking_type(), BookingType::External);
        assert_eq!(BookingSource::Family.booking_type(), BookingType::Personal);
        assert_eq!(BookingSource::Personal.booking_type(), BookingType::Personal);
    }

    #[test]
    fn test_source_wire_names() {
        let source: BookingSource = serde_json::from_str(r#""booking_com""#).unwrap();
        assert_eq!(source, BookingSource::BookingCom);
        assert_eq!(source.as_str(), "booking_com");
        assert_eq!("booking_com".parse::<BookingSource>().unwrap(), source);
        assert!("expedia".parse::<BookingSource>().is_err());
        assert!(serde_json::from_str::<BookingSource>(r#""AIRBNB""#).is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, r#""confirmed""#);
    }
}
