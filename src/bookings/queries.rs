//! Database queries for bookings and their clients.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::dates::DateRange;
use crate::error::AppError;

use super::models::{Booking, BookingRow, BookingSource, BookingStatus};
use super::requests::ClientRequest;

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           b.occupants_count, b.adults_count, b.rental_price,
           b.tourist_tax_included, b.cleaning_included, b.cleaning_offered,
           b.linen_included, b.linen_offered, b.notes,
           b.source, b.source_custom_name, b.label, b.external_amount,
           b.created_at, b.updated_at,
           c.id AS client_id,
           c.first_name AS client_first_name,
           c.last_name AS client_last_name,
           c.email AS client_email,
           c.address AS client_address,
           c.city AS client_city,
           c.postal_code AS client_postal_code,
           c.country AS client_country,
           c.phone AS client_phone
    FROM bookings b
    LEFT JOIN clients c ON c.id = b.primary_client_id
"#;

/// All bookings, latest stay first
pub async fn list_bookings(pool: &PgPool) -> Result<Vec<Booking>, AppError> {
    let sql = format!("{BOOKING_SELECT} ORDER BY b.start_date DESC");
    let rows = sqlx::query_as::<_, BookingRow>(&sql).fetch_all(pool).await?;

    rows.into_iter().map(into_booking).collect()
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Option<Booking>, AppError> {
    let sql = format!("{BOOKING_SELECT} WHERE b.id = $1");
    let row = sqlx::query_as::<_, BookingRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(into_booking).transpose()
}

/// First non-cancelled booking whose stay overlaps `range`, other than `exclude`.
///
/// Stays are half-open, so a departure day may be the next arrival day.
pub async fn find_conflicting_booking<'e, E>(
    executor: E,
    range: DateRange,
    exclude: Option<Uuid>,
) -> Result<Option<Booking>, AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"{BOOKING_SELECT}
        WHERE b.status <> 'cancelled'
          AND b.start_date < $2
          AND b.end_date > $1
          AND ($3::uuid IS NULL OR b.id <> $3)
        ORDER BY b.start_date
        LIMIT 1"#
    );

    let row = sqlx::query_as::<_, BookingRow>(&sql)
        .bind(range.start)
        .bind(range.end)
        .bind(exclude)
        .fetch_optional(executor)
        .await?;

    row.map(into_booking).transpose()
}

fn into_booking(row: BookingRow) -> Result<Booking, AppError> {
    Booking::try_from(row).map_err(|e| AppError::Internal(e.to_string()))
}

/// Stays of every non-cancelled booking, in calendar order
pub async fn booked_ranges(pool: &PgPool) -> Result<Vec<DateRange>, AppError> {
    let rows: Vec<(chrono::NaiveDate, chrono::NaiveDate)> = sqlx::query_as(
        r#"
        SELECT start_date, end_date
        FROM bookings
        WHERE status <> 'cancelled'
        ORDER BY start_date
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(start, end)| DateRange { start, end })
        .collect())
}

pub async fn insert_client<'e, E>(executor: E, client: &ClientRequest) -> Result<Uuid, AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO clients
            (id, first_name, last_name, email, address, city, postal_code, country, phone)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client.first_name.trim())
    .bind(client.last_name.trim())
    .bind(&client.email)
    .bind(&client.address)
    .bind(&client.city)
    .bind(&client.postal_code)
    .bind(&client.country)
    .bind(&client.phone)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn update_client<'e, E>(
    executor: E,
    id: Uuid,
    client: &ClientRequest,
) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE clients
        SET first_name = $2, last_name = $3, email = $4, address = $5,
            city = $6, postal_code = $7, country = $8, phone = $9
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(client.first_name.trim())
    .bind(client.last_name.trim())
    .bind(&client.email)
    .bind(&client.address)
    .bind(&client.city)
    .bind(&client.postal_code)
    .bind(&client.country)
    .bind(&client.phone)
    .execute(executor)
    .await?;

    Ok(())
}

/// Values written by insert and update
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub id: Uuid,
    pub range: DateRange,
    pub status: BookingStatus,
    pub primary_client_id: Option<Uuid>,
    pub occupants_count: i32,
    pub adults_count: i32,
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
}

pub async fn insert_booking<'e, E>(executor: E, record: &BookingRecord) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO bookings
            (id, start_date, end_date, status, primary_client_id,
             occupants_count, adults_count, rental_price,
             tourist_tax_included, cleaning_included, cleaning_offered,
             linen_included, linen_offered, notes,
             source, source_custom_name, label, external_amount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18)
        "#,
    )
    .bind(record.id)
    .bind(record.range.start)
    .bind(record.range.end)
    .bind(record.status.as_str())
    .bind(record.primary_client_id)
    .bind(record.occupants_count)
    .bind(record.adults_count)
    .bind(record.rental_price)
    .bind(record.tourist_tax_included)
    .bind(record.cleaning_included)
    .bind(record.cleaning_offered)
    .bind(record.linen_included)
    .bind(record.linen_offered)
    .bind(&record.notes)
    .bind(record.source.map(|source| source.as_str()))
    .bind(&record.source_custom_name)
    .bind(&record.label)
    .bind(record.external_amount)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn update_booking<'e, E>(executor: E, record: &BookingRecord) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE bookings
        SET start_date = $2, end_date = $3, status = $4, primary_client_id = $5,
            occupants_count = $6, adults_count = $7, rental_price = $8,
            tourist_tax_included = $9, cleaning_included = $10, cleaning_offered = $11,
            linen_included = $12, linen_offered = $13, notes = $14,
            source = $15, source_custom_name = $16, label = $17, external_amount = $18,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(record.id)
    .bind(record.range.start)
    .bind(record.range.end)
    .bind(record.status.as_str())
    .bind(record.primary_client_id)
    .bind(record.occupants_count)
    .bind(record.adults_count)
    .bind(record.rental_price)
    .bind(record.tourist_tax_included)
    .bind(record.cleaning_included)
    .bind(record.cleaning_offered)
    .bind(record.linen_included)
    .bind(record.linen_offered)
    .bind(&record.notes)
    .bind(record.source.map(|source| source.as_str()))
    .bind(&record.source_custom_name)
    .bind(&record.label)
    .bind(record.external_amount)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn set_status(pool: &PgPool, id: Uuid, status: BookingStatus) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE bookings SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_booking(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
