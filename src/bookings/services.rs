//! Booking lifecycle with database access.

use sqlx::{PgPool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::config::Tariffs;
use crate::dates::DateRange;
use crate::error::AppError;
use crate::pricing::services as pricing;
use crate::pricing::PriceCalculation;

use super::calculators;
use super::models::{Booking, BookingStatus};
use super::queries::{self, BookingRecord};
use super::requests::{
    validate_occupancy, validate_rental_price, CreateBookingRequest, CreateQuickBookingRequest,
    UpdateBookingRequest,
};
use super::responses::{
    BookedRange, BookingResponse, ConflictCheckResponse, ConflictDetail, MessageResponse,
    PriceSummary,
};

pub async fn list_bookings(pool: &PgPool) -> Result<Vec<BookingResponse>, AppError> {
    let bookings = queries::list_bookings(pool).await?;
    Ok(bookings.into_iter().map(BookingResponse::from).collect())
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<BookingResponse, AppError> {
    Ok(BookingResponse::from(find_booking(pool, id).await?))
}

async fn find_booking(pool: &PgPool, id: Uuid) -> Result<Booking, AppError> {
    queries::get_booking(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// Availability and minimum stay for a prospective range.
pub async fn check_conflicts(
    pool: &PgPool,
    range: DateRange,
    exclude: Option<Uuid>,
) -> Result<ConflictCheckResponse, AppError> {
    let conflicting = queries::find_conflicting_booking(pool, range, exclude).await?;
    let min_nights_required = pricing::get_min_nights_for_period(pool, range).await?;

    Ok(ConflictCheckResponse {
        has_conflict: conflicting.is_some(),
        min_nights_required,
        conflict_detail: conflicting.as_ref().map(ConflictDetail::from),
    })
}

pub async fn booked_ranges(pool: &PgPool) -> Result<Vec<BookedRange>, AppError> {
    let ranges = queries::booked_ranges(pool).await?;
    Ok(ranges
        .into_iter()
        .map(|r| BookedRange {
            start_date: r.start,
            end_date: r.end,
        })
        .collect())
}

pub async fn create_booking(
    pool: &PgPool,
    cache: &AppCache,
    req: CreateBookingRequest,
) -> Result<BookingResponse, AppError> {
    let range = DateRange::new(req.start_date, req.end_date)?;
    validate_occupancy(req.occupants_count, req.adults_count)?;
    if let Some(client) = &req.primary_client {
        client.validate()?;
    }

    ensure_available(pool, range, None).await?;
    ensure_min_nights(pool, range).await?;

    let rental_price = match req.rental_price {
        Some(price) => price,
        None => pricing::calculate_price(pool, cache, range).await?.total_price,
    };
    validate_rental_price(rental_price)?;

    let mut tx = pool.begin().await?;

    let primary_client_id = match &req.primary_client {
        Some(client) => Some(queries::insert_client(&mut *tx, client).await?),
        None => None,
    };

    let record = BookingRecord {
        id: Uuid::new_v4(),
        range,
        status: BookingStatus::Pending,
        primary_client_id,
        occupants_count: req.occupants_count,
        adults_count: req.adults_count,
        rental_price: Some(rental_price),
        tourist_tax_included: req.tourist_tax_included,
        cleaning_included: req.cleaning_included,
        cleaning_offered: req.cleaning_offered,
        linen_included: req.linen_included,
        linen_offered: req.linen_offered,
        notes: req.notes,
        source: None,
        source_custom_name: None,
        label: None,
        external_amount: None,
    };
    queries::insert_booking(&mut *tx, &record)
        .await
        .map_err(overlap_as_conflict)?;
    tx.commit().await?;

    info!(booking_id = %record.id, start = %range.start, end = %range.end, %rental_price, "booking created");

    get_booking(pool, record.id).await
}

/// Block dates for a rental platform stay or for personal use.
///
/// The availability check and the insert share one transaction. There is no
/// minimum stay and no engine price.
pub async fn create_quick_booking(
    pool: &PgPool,
    req: CreateQuickBookingRequest,
) -> Result<BookingResponse, AppError> {
    let range = DateRange::new(req.start_date, req.end_date)?;
    req.validate()?;
    let (occupants_count, adults_count) = req.occupancy();

    let mut tx = pool.begin().await?;
    ensure_available(&mut *tx, range, None).await?;

    let record = BookingRecord {
        id: Uuid::new_v4(),
        range,
        status: BookingStatus::Pending,
        primary_client_id: None,
        occupants_count,
        adults_count,
        rental_price: None,
        tourist_tax_included: false,
        cleaning_included: false,
        cleaning_offered: false,
        linen_included: false,
        linen_offered: false,
        source_custom_name: req.custom_name(),
        notes: req.notes,
        source: Some(req.source),
        label: req.label,
        external_amount: req.external_amount,
    };
    queries::insert_booking(&mut *tx, &record)
        .await
        .map_err(overlap_as_conflict)?;
    tx.commit().await?;

    info!(
        booking_id = %record.id,
        source = req.source.as_str(),
        start = %range.start,
        end = %range.end,
        "quick booking created"
    );

    get_booking(pool, record.id).await
}

/// Edit a pending booking. Date changes are re-checked for availability and
/// minimum stay.
pub async fn update_booking(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: UpdateBookingRequest,
) -> Result<BookingResponse, AppError> {
    let booking = find_booking(pool, id).await?;
    if booking.status != BookingStatus::Pending {
        return Err(AppError::BadRequest(
            "Only pending bookings can be modified".to_string(),
        ));
    }

    let range = DateRange::new(
        req.start_date.unwrap_or(booking.start_date),
        req.end_date.unwrap_or(booking.end_date),
    )?;
    if req.changes_dates() {
        ensure_available(pool, range, Some(id)).await?;
        // channel and personal stays are not bound by the tariff minimum
        if booking.source.is_none() {
            ensure_min_nights(pool, range).await?;
        }
    }

    let occupants_count = req.occupants_count.unwrap_or(booking.occupants_count);
    let adults_count = req.adults_count.unwrap_or(booking.adults_count);
    validate_occupancy(occupants_count, adults_count)?;
    if let Some(client) = &req.primary_client {
        client.validate()?;
    }

    let rental_price = if req.recalculate_price {
        Some(pricing::calculate_price(pool, cache, range).await?.total_price)
    } else {
        req.rental_price.or(booking.rental_price)
    };
    if let Some(price) = rental_price {
        validate_rental_price(price)?;
    }

    let mut tx = pool.begin().await?;

    let mut primary_client_id = booking.primary_client.as_ref().map(|c| c.id);
    if let Some(client) = &req.primary_client {
        match primary_client_id {
            Some(client_id) => queries::update_client(&mut *tx, client_id, client).await?,
            None => primary_client_id = Some(queries::insert_client(&mut *tx, client).await?),
        }
    }

    let record = BookingRecord {
        id,
        range,
        status: booking.status,
        primary_client_id,
        occupants_count,
        adults_count,
        rental_price,
        tourist_tax_included: req.tourist_tax_included.unwrap_or(booking.tourist_tax_included),
        cleaning_included: req.cleaning_included.unwrap_or(booking.cleaning_included),
        cleaning_offered: req.cleaning_offered.unwrap_or(booking.cleaning_offered),
        linen_included: req.linen_included.unwrap_or(booking.linen_included),
        linen_offered: req.linen_offered.unwrap_or(booking.linen_offered),
        notes: req.notes.unwrap_or(booking.notes),
        source: booking.source,
        source_custom_name: booking.source_custom_name,
        label: booking.label,
        external_amount: booking.external_amount,
    };
    queries::update_booking(&mut *tx, &record)
        .await
        .map_err(overlap_as_conflict)?;
    tx.commit().await?;

    info!(booking_id = %id, recalculated = req.recalculate_price, "booking updated");

    get_booking(pool, id).await
}

/// Engine price for the booking's current dates. The stored price is untouched.
pub async fn recalculate_price(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<PriceCalculation, AppError> {
    let booking = find_booking(pool, id).await?;
    pricing::calculate_price(pool, cache, booking.range()).await
}

pub async fn confirm_booking(pool: &PgPool, id: Uuid) -> Result<BookingResponse, AppError> {
    set_status(pool, id, BookingStatus::Confirmed).await
}

pub async fn cancel_booking(pool: &PgPool, id: Uuid) -> Result<BookingResponse, AppError> {
    set_status(pool, id, BookingStatus::Cancelled).await
}

async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: BookingStatus,
) -> Result<BookingResponse, AppError> {
    if queries::set_status(pool, id, status).await.map_err(overlap_as_conflict)? == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    info!(booking_id = %id, %status, "booking status changed");

    get_booking(pool, id).await
}

pub async fn delete_booking(pool: &PgPool, id: Uuid) -> Result<MessageResponse, AppError> {
    if queries::delete_booking(pool, id).await? == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    info!(booking_id = %id, "booking deleted");

    Ok(MessageResponse {
        message: "Booking deleted".to_string(),
    })
}

/// Extras, deposit and balance for contracts and invoices.
pub async fn price_summary(
    pool: &PgPool,
    cache: &AppCache,
    tariffs: &Tariffs,
    id: Uuid,
) -> Result<PriceSummary, AppError> {
    let booking = find_booking(pool, id).await?;
    if booking.rental_price.is_none() {
        return Err(unpriced(&booking));
    }
    let calculation = pricing::calculate_price(pool, cache, booking.range()).await?;

    calculators::price_summary(&booking, tariffs, calculation.details)
        .ok_or_else(|| unpriced(&booking))
}

fn unpriced(booking: &Booking) -> AppError {
    AppError::BadRequest(format!(
        "Booking {} has no rental price ({} booking)",
        booking.id,
        booking.source.map(|s| s.as_str()).unwrap_or("direct")
    ))
}

async fn ensure_available<'e, E>(
    executor: E,
    range: DateRange,
    exclude: Option<Uuid>,
) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    match queries::find_conflicting_booking(executor, range, exclude).await? {
        Some(existing) => Err(dates_taken(Some(ConflictDetail::from(&existing)))),
        None => Ok(()),
    }
}

async fn ensure_min_nights(pool: &PgPool, range: DateRange) -> Result<(), AppError> {
    let min_nights = pricing::get_min_nights_for_period(pool, range).await?;
    if range.nights() < i64::from(min_nights) {
        return Err(AppError::BadRequest(format!(
            "This period requires a minimum of {} nights",
            min_nights
        )));
    }
    Ok(())
}

fn dates_taken(detail: Option<ConflictDetail>) -> AppError {
    AppError::Conflict {
        message: "These dates are already booked".to_string(),
        details: detail.and_then(|d| serde_json::to_value(d).ok()),
    }
}

/// A concurrent write that slipped past [`ensure_available`] trips the
/// exclusion constraint instead.
fn overlap_as_conflict(err: AppError) -> AppError {
    if err.is_exclusion_violation() {
        dates_taken(None)
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::models::BookingSource;
    use rust_decimal::Decimal;

    #[test]
    fn test_dates_taken_carries_detail() {
        let detail = ConflictDetail {
            id: Uuid::nil(),
            client_name: Some("Ana Lopez".to_string()),
            source: None,
            label: None,
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
        };

        match dates_taken(Some(detail)) {
            AppError::Conflict { details: Some(details), .. } => {
                assert_eq!(details["clientName"], "Ana Lopez");
                assert_eq!(details["startDate"], "2025-07-05");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_channel_conflict_names_source_and_label() {
        let detail = ConflictDetail {
            id: Uuid::nil(),
            client_name: None,
            source: Some(BookingSource::Airbnb),
            label: Some("Smith family".to_string()),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
        };

        match dates_taken(Some(detail)) {
            AppError::Conflict { details: Some(details), .. } => {
                assert_eq!(details["source"], "airbnb");
                assert_eq!(details["label"], "Smith family");
                assert!(details["clientName"].is_null());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_exclusion_violation_becomes_conflict() {
        use crate::error::test_support::db_error;

        let err = overlap_as_conflict(AppError::Database(db_error("23P01")));
        assert!(matches!(err, AppError::Conflict { details: None, .. }));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = overlap_as_conflict(AppError::NotFound("Booking not found".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));

        let err = overlap_as_conflict(AppError::Database(sqlx::Error::RowNotFound));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_zero_rental_price_allowed() {
        assert!(validate_rental_price(Decimal::ZERO).is_ok());
        assert!(validate_rental_price(Decimal::NEGATIVE_ONE).is_err());
    }
}
