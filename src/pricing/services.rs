//! Pricing service functions with database access.
//!
//! These functions fetch the periods a request needs, plus the fallback price
//! from the cache, and hand them to the pure calculators.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::catalog::services::default_price_per_night;
use crate::dates::DateRange;
use crate::error::AppError;

use super::calculators;
use super::queries;
use super::responses::{PriceCalculation, PublicGrid};

/// Price a stay against the stored catalog.
pub async fn calculate_price(
    pool: &PgPool,
    cache: &AppCache,
    stay: DateRange,
) -> Result<PriceCalculation, AppError> {
    let periods = queries::find_periods_overlapping(pool, &stay.years(), stay).await?;
    let default_price = default_price_per_night(pool, cache).await?;

    Ok(calculators::calculate_price(stay, &periods, default_price))
}

/// Longest minimum stay required by the seasons a range touches.
pub async fn get_min_nights_for_period(pool: &PgPool, range: DateRange) -> Result<i32, AppError> {
    let periods = queries::find_periods_overlapping(pool, &range.years(), range).await?;
    Ok(calculators::min_nights_for(range, &periods))
}

/// Public price grid for `year` (current year when absent), cached per year.
pub async fn get_public_grid(
    pool: &PgPool,
    cache: &AppCache,
    year: Option<i32>,
) -> Result<Arc<PublicGrid>, AppError> {
    let year = year.unwrap_or_else(|| Utc::now().year());

    if let Some(cached) = cache.public_grids.get(&year).await {
        tracing::debug!("Cache HIT for public grid: {}", year);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for public grid: {}", year);
    let generation = cache.catalog_generation();
    let periods = queries::find_periods_for_year(pool, year).await?;
    let grid = Arc::new(calculators::public_grid(year, &periods));
    if !cache.put_public_grid(year, grid.clone(), generation).await {
        tracing::debug!("Catalog changed while loading grid {}, not cached", year);
    }

    Ok(grid)
}
