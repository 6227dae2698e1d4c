//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dates::{deserialize_date, DateRange};
use crate::error::AppError;

/// Request to price a stay
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePriceRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
}

impl CalculatePriceRequest {
    pub fn range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Query parameters for the minimum-stay lookup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinNightsQuery {
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
}

impl MinNightsQuery {
    pub fn range(&self) -> Result<DateRange, AppError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Query parameters for the public grid. Defaults to the current year.
#[derive(Debug, Deserialize)]
pub struct PublicGridQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_request_accepts_timestamps() {
        let req: CalculatePriceRequest = serde_json::from_str(
            r#"{"startDate":"2025-06-01T00:00:00.000Z","endDate":"2025-06-04"}"#,
        )
        .unwrap();
        let range = req.range().unwrap();
        assert_eq!(range.nights(), 3);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let req: CalculatePriceRequest =
            serde_json::from_str(r#"{"startDate":"2025-06-04","endDate":"2025-06-04"}"#).unwrap();
        assert!(matches!(req.range(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let parsed = serde_json::from_str::<CalculatePriceRequest>(
            r#"{"startDate":"04/06/2025","endDate":"2025-06-10"}"#,
        );
        assert!(parsed.is_err());
    }
}
