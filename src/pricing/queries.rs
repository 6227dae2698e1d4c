//! Database queries for pricing engine.

use sqlx::PgPool;

use crate::dates::DateRange;
use crate::error::AppError;

use super::models::SeasonalPeriod;

/// Columns selected for every date-period-with-season read.
pub(crate) const SEASONAL_PERIOD_COLUMNS: &str = r#"
    dp.id,
    dp.start_date,
    dp.end_date,
    dp.year,
    s.id AS season_id,
    s.name AS season_name,
    s.price_per_night,
    s.weekly_night_rate,
    s.min_nights,
    s.color,
    s.display_order AS season_order
"#;

/// Periods of the given years whose `[start_date, end_date)` intersects `range`.
pub async fn find_periods_overlapping(
    pool: &PgPool,
    years: &[i32],
    range: DateRange,
) -> Result<Vec<SeasonalPeriod>, AppError> {
    let sql = format!(
        r#"
        SELECT {SEASONAL_PERIOD_COLUMNS}
        FROM date_periods dp
        JOIN seasons s ON s.id = dp.season_id
        WHERE dp.year = ANY($1)
          AND dp.start_date < $3
          AND dp.end_date > $2
        ORDER BY dp.start_date
        "#
    );

    let periods = sqlx::query_as::<_, SeasonalPeriod>(&sql)
        .bind(years)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

    Ok(periods)
}

/// All periods of one year, for the public grid.
pub async fn find_periods_for_year(
    pool: &PgPool,
    year: i32,
) -> Result<Vec<SeasonalPeriod>, AppError> {
    let sql = format!(
        r#"
        SELECT {SEASONAL_PERIOD_COLUMNS}
        FROM date_periods dp
        JOIN seasons s ON s.id = dp.season_id
        WHERE dp.year = $1
        ORDER BY s.display_order, dp.start_date
        "#
    );

    let periods = sqlx::query_as::<_, SeasonalPeriod>(&sql)
        .bind(year)
        .fetch_all(pool)
        .await?;

    Ok(periods)
}
