//! Database queries for seasons, date periods and settings.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::error::AppError;
use crate::pricing::models::SeasonalPeriod;
use crate::pricing::queries::SEASONAL_PERIOD_COLUMNS;

use super::models::{DatePeriod, Season, Settings};

const SETTINGS_ID: &str = "default";

/// Fallback nightly price written when the settings row is first created.
pub const INITIAL_DEFAULT_PRICE_PER_NIGHT: Decimal = Decimal::ONE_HUNDRED;

// ==================== seasons ====================

/// Get all seasons in display order
pub async fn list_seasons(pool: &PgPool) -> Result<Vec<Season>, AppError> {
    let seasons = sqlx::query_as::<_, Season>(
        r#"
        SELECT id, name, price_per_night, weekly_night_rate, min_nights,
               color, display_order, created_at, updated_at
        FROM seasons
        ORDER BY display_order, name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(seasons)
}

pub async fn get_season(pool: &PgPool, id: Uuid) -> Result<Option<Season>, AppError> {
    let season = sqlx::query_as::<_, Season>(
        r#"
        SELECT id, name, price_per_night, weekly_night_rate, min_nights,
               color, display_order, created_at, updated_at
        FROM seasons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(season)
}

pub async fn season_exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM seasons WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

pub async fn insert_season(pool: &PgPool, season: &Season) -> Result<Season, AppError> {
    let created = sqlx::query_as::<_, Season>(
        r#"
        INSERT INTO seasons
            (id, name, price_per_night, weekly_night_rate, min_nights,
             color, display_order, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, price_per_night, weekly_night_rate, min_nights,
                  color, display_order, created_at, updated_at
        "#,
    )
    .bind(season.id)
    .bind(&season.name)
    .bind(season.price_per_night)
    .bind(season.weekly_night_rate)
    .bind(season.min_nights)
    .bind(&season.color)
    .bind(season.display_order)
    .bind(season.created_at)
    .bind(season.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn update_season(pool: &PgPool, season: &Season) -> Result<Season, AppError> {
    let updated = sqlx::query_as::<_, Season>(
        r#"
        UPDATE seasons
        SET name = $2,
            price_per_night = $3,
            weekly_night_rate = $4,
            min_nights = $5,
            color = $6,
            display_order = $7,
            updated_at = $8
        WHERE id = $1
        RETURNING id, name, price_per_night, weekly_night_rate, min_nights,
                  color, display_order, created_at, updated_at
        "#,
    )
    .bind(season.id)
    .bind(&season.name)
    .bind(season.price_per_night)
    .bind(season.weekly_night_rate)
    .bind(season.min_nights)
    .bind(&season.color)
    .bind(season.display_order)
    .bind(season.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

/// Delete a season; its date periods go with it (`ON DELETE CASCADE`).
pub async fn delete_season(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

// ==================== date periods ====================

/// Plain period rows, optionally for one season
pub async fn list_period_rows(
    pool: &PgPool,
    season_id: Option<Uuid>,
) -> Result<Vec<DatePeriod>, AppError> {
    let periods = sqlx::query_as::<_, DatePeriod>(
        r#"
        SELECT id, start_date, end_date, year, season_id
        FROM date_periods
        WHERE ($1::uuid IS NULL OR season_id = $1)
        ORDER BY year, start_date
        "#,
    )
    .bind(season_id)
    .fetch_all(pool)
    .await?;

    Ok(periods)
}

/// Periods joined with their season, optionally restricted to one year
pub async fn list_periods(
    pool: &PgPool,
    year: Option<i32>,
) -> Result<Vec<SeasonalPeriod>, AppError> {
    let sql = format!(
        r#"
        SELECT {SEASONAL_PERIOD_COLUMNS}
        FROM date_periods dp
        JOIN seasons s ON s.id = dp.season_id
        WHERE ($1::int IS NULL OR dp.year = $1)
        ORDER BY dp.year, dp.start_date
        "#
    );

    let periods = sqlx::query_as::<_, SeasonalPeriod>(&sql)
        .bind(year)
        .fetch_all(pool)
        .await?;

    Ok(periods)
}

pub async fn get_period(pool: &PgPool, id: Uuid) -> Result<Option<SeasonalPeriod>, AppError> {
    let sql = format!(
        r#"
        SELECT {SEASONAL_PERIOD_COLUMNS}
        FROM date_periods dp
        JOIN seasons s ON s.id = dp.season_id
        WHERE dp.id = $1
        "#
    );

    let period = sqlx::query_as::<_, SeasonalPeriod>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(period)
}

/// Every period of one year (overlap checks and year copies)
pub async fn find_periods_in_year<'e, E>(executor: E, year: i32) -> Result<Vec<DatePeriod>, AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let periods = sqlx::query_as::<_, DatePeriod>(
        r#"
        SELECT id, start_date, end_date, year, season_id
        FROM date_periods
        WHERE year = $1
        ORDER BY start_date
        "#,
    )
    .bind(year)
    .fetch_all(executor)
    .await?;

    Ok(periods)
}

pub async fn insert_period<'e, E>(executor: E, period: &DatePeriod) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO date_periods (id, start_date, end_date, year, season_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(period.id)
    .bind(period.start_date)
    .bind(period.end_date)
    .bind(period.year)
    .bind(period.season_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn update_period(pool: &PgPool, period: &DatePeriod) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE date_periods
        SET start_date = $2, end_date = $3, year = $4, season_id = $5
        WHERE id = $1
        "#,
    )
    .bind(period.id)
    .bind(period.start_date)
    .bind(period.end_date)
    .bind(period.year)
    .bind(period.season_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_period(pool: &PgPool, id: Uuid) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM date_periods WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Distinct years that have at least one period, ascending
pub async fn available_years(pool: &PgPool) -> Result<Vec<i32>, AppError> {
    let years: Vec<i32> =
        sqlx::query_scalar("SELECT DISTINCT year FROM date_periods ORDER BY year")
            .fetch_all(pool)
            .await?;

    Ok(years)
}

// ==================== settings ====================

/// Read the settings singleton, creating it with the initial fallback price if absent.
pub async fn get_or_create_settings(pool: &PgPool) -> Result<Settings, AppError> {
    let existing = sqlx::query_as::<_, Settings>(
        "SELECT default_price_per_night FROM settings WHERE id = $1",
    )
    .bind(SETTINGS_ID)
    .fetch_optional(pool)
    .await?;

    if let Some(settings) = existing {
        return Ok(settings);
    }

    // A concurrent first read may have inserted the row already; keep whichever won.
    let settings = sqlx::query_as::<_, Settings>(
        r#"
        INSERT INTO settings (id, default_price_per_night)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
        RETURNING default_price_per_night
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(INITIAL_DEFAULT_PRICE_PER_NIGHT)
    .fetch_one(pool)
    .await?;

    tracing::info!("Created default settings row");
    Ok(settings)
}

pub async fn upsert_settings(pool: &PgPool, default_price_per_night: Decimal) -> Result<Settings, AppError> {
    let settings = sqlx::query_as::<_, Settings>(
        r#"
        INSERT INTO settings (id, default_price_per_night)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
            SET default_price_per_night = EXCLUDED.default_price_per_night,
                updated_at = now()
        RETURNING default_price_per_night
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(default_price_per_night)
    .fetch_one(pool)
    .await?;

    Ok(settings)
}
