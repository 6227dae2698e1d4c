//! Request DTOs for booking endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::dates::{deserialize_date, deserialize_optional_date, DateRange};
use crate::error::AppError;
use crate::extract::nullable;

use super::models::{BookingSource, MAX_OCCUPANTS};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: Option<String>,
    pub phone: String,
}

impl ClientRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Client first and last name are required".to_string(),
            ));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::BadRequest(format!("Invalid email address '{}'", email)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub primary_client: Option<ClientRequest>,
    #[serde(default = "one")]
    pub occupants_count: i32,
    #[serde(default = "one")]
    pub adults_count: i32,
    /// Defaults to the engine's total for the stay
    #[serde(default)]
    pub rental_price: Option<Decimal>,
    #[serde(default = "yes")]
    pub tourist_tax_included: bool,
    #[serde(default = "yes")]
    pub cleaning_included: bool,
    #[serde(default)]
    pub cleaning_offered: bool,
    #[serde(default)]
    pub linen_included: bool,
    #[serde(default)]
    pub linen_offered: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn one() -> i32 {
    1
}

fn yes() -> bool {
    true
}

/// Partial update of a pending booking
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub primary_client: Option<ClientRequest>,
    #[serde(default)]
    pub occupants_count: Option<i32>,
    #[serde(default)]
    pub adults_count: Option<i32>,
    #[serde(default)]
    pub rental_price: Option<Decimal>,
    #[serde(default)]
    pub tourist_tax_included: Option<bool>,
    #[serde(default)]
    pub cleaning_included: Option<bool>,
    #[serde(default)]
    pub cleaning_offered: Option<bool>,
    #[serde(default)]
    pub linen_included: Option<bool>,
    #[serde(default)]
    pub linen_offered: Option<bool>,
    /// `null` clears the notes
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    /// Replace the rental price with the engine's total for the (new) dates
    #[serde(default)]
    pub recalculate_price: bool,
}

impl UpdateBookingRequest {
    pub fn changes_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Dates blocked for a rental platform stay or for personal use. No client,
/// no extras and no engine price.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuickBookingRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    pub source: BookingSource,
    /// Channel name, required when `source` is `other`
    #[serde(default)]
    pub source_custom_name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// What the platform paid out
    #[serde(default)]
    pub external_amount: Option<Decimal>,
    #[serde(default)]
    pub occupants_count: Option<i32>,
    #[serde(default)]
    pub adults_count: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateQuickBookingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.source == BookingSource::Other && self.custom_name().is_none() {
            return Err(AppError::BadRequest(
                "A source name is required when the source is 'other'".to_string(),
            ));
        }
        if let Some(amount) = self.external_amount {
            if amount < Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "External amount must be zero or more".to_string(),
                ));
            }
            if amount.normalize().scale() > 2 {
                return Err(AppError::BadRequest(
                    "External amount takes at most two decimal places".to_string(),
                ));
            }
        }
        let (occupants, adults) = self.occupancy();
        validate_occupancy(occupants, adults)
    }

    /// Trimmed custom source name, if any
    pub fn custom_name(&self) -> Option<String> {
        self.source_custom_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Occupants and adults. One adult unless told otherwise, and never
    /// fewer occupants than adults.
    pub fn occupancy(&self) -> (i32, i32) {
        let adults = self.adults_count.unwrap_or(1);
        (self.occupants_count.unwrap_or(adults), adults)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConflictsRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
}

impl CheckConflictsRequest {
    pub fn range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Occupancy rules shared by create and update.
pub fn validate_occupancy(occupants: i32, adults: i32) -> Result<(), AppError> {
    if !(1..=MAX_OCCUPANTS).contains(&occupants) {
        return Err(AppError::BadRequest(format!(
            "Occupants must be between 1 and {}",
            MAX_OCCUPANTS
        )));
    }
    if adults < 1 || adults > occupants {
        return Err(AppError::BadRequest(
            "Adults must be at least 1 and no more than the occupants".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_rental_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Rental price must be zero or more".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateBookingRequest =
            serde_json::from_str(r#"{"startDate":"2025-07-05","endDate":"2025-07-12"}"#).unwrap();
        assert_eq!(req.occupants_count, 1);
        assert_eq!(req.adults_count, 1);
        assert!(req.rental_price.is_none());
        assert!(req.tourist_tax_included);
        assert!(req.cleaning_included);
        assert!(!req.cleaning_offered);
        assert!(!req.linen_included);
        assert!(req.primary_client.is_none());
    }

    #[test]
    fn test_update_detects_date_changes() {
        let req: UpdateBookingRequest = serde_json::from_str(r#"{"notes":"late arrival"}"#).unwrap();
        assert!(!req.changes_dates());
        assert!(!req.recalculate_price);

        let req: UpdateBookingRequest =
            serde_json::from_str(r#"{"endDate":"2025-07-14","recalculatePrice":true}"#).unwrap();
        assert!(req.changes_dates());
        assert!(req.recalculate_price);
    }

    #[test]
    fn test_update_notes_absent_null_or_set() {
        let req: UpdateBookingRequest = serde_json::from_str(r#"{"adultsCount":2}"#).unwrap();
        assert_eq!(req.notes, None);

        let req: UpdateBookingRequest = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(req.notes, Some(None));

        let req: UpdateBookingRequest = serde_json::from_str(r#"{"notes":"late arrival"}"#).unwrap();
        assert_eq!(req.notes, Some(Some("late arrival".to_string())));
    }

    fn quick(json: &str) -> CreateQuickBookingRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_quick_booking_defaults() {
        let req = quick(r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"airbnb"}"#);
        assert_eq!(req.source, BookingSource::Airbnb);
        assert_eq!(req.occupancy(), (1, 1));
        assert!(req.validate().is_ok());

        let req = quick(
            r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"family","adultsCount":3}"#,
        );
        assert_eq!(req.occupancy(), (3, 3));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_quick_booking_other_needs_a_name() {
        let req = quick(r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"other"}"#);
        assert!(req.validate().is_err());

        let req = quick(
            r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"other","sourceCustomName":"  "}"#,
        );
        assert!(req.validate().is_err());

        let req = quick(
            r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"other","sourceCustomName":" Gîtes de France "}"#,
        );
        assert!(req.validate().is_ok());
        assert_eq!(req.custom_name().as_deref(), Some("Gîtes de France"));
    }

    #[test]
    fn test_quick_booking_amount_and_occupancy() {
        let base = r#""startDate":"2025-08-02","endDate":"2025-08-09","source":"abritel""#;

        assert!(quick(&format!(r#"{{{base},"externalAmount":"912.50"}}"#)).validate().is_ok());
        assert!(quick(&format!(r#"{{{base},"externalAmount":"912.500"}}"#)).validate().is_ok());
        assert!(quick(&format!(r#"{{{base},"externalAmount":"912.505"}}"#)).validate().is_err());
        assert!(quick(&format!(r#"{{{base},"externalAmount":"-1"}}"#)).validate().is_err());

        assert!(quick(&format!(r#"{{{base},"occupantsCount":7}}"#)).validate().is_err());
        assert!(quick(&format!(r#"{{{base},"occupantsCount":2,"adultsCount":3}}"#))
            .validate()
            .is_err());
    }

    #[test]
    fn test_quick_booking_rejects_unknown_source() {
        let result = serde_json::from_str::<CreateQuickBookingRequest>(
            r#"{"startDate":"2025-08-02","endDate":"2025-08-09","source":"expedia"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_occupancy_rules() {
        assert!(validate_occupancy(1, 1).is_ok());
        assert!(validate_occupancy(6, 2).is_ok());
        assert!(validate_occupancy(7, 2).is_err());
        assert!(validate_occupancy(0, 0).is_err());
        assert!(validate_occupancy(3, 4).is_err());
        assert!(validate_occupancy(3, 0).is_err());
    }

    #[test]
    fn test_client_validation() {
        let client: ClientRequest = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Lopez","email":"ana.example.com",
                "address":"1 rue du Port","city":"Sète","postalCode":"34200","phone":"0600000000"}"#,
        )
        .unwrap();
        assert!(client.validate().is_err());

        let fixed = ClientRequest {
            email: Some("ana@example.com".to_string()),
            ..client
        };
        assert!(fixed.validate().is_ok());
    }
}
