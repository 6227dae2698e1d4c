//! Catalog service functions with database access.
//!
//! Seasons and date periods feed the pricing engine; every write here drops the
//! cached public grids so guests never see stale tariffs for long.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::dates::{shift_years, DateRange};
use crate::error::AppError;
use crate::pricing::calculators::DEFAULT_MIN_NIGHTS;

use super::models::{DatePeriod, Season, Settings};
use super::queries;
use super::requests::{
    CreateDatePeriodRequest, CreateSeasonRequest, UpdateDatePeriodRequest, UpdateSeasonRequest,
    UpdateSettingsRequest,
};
use super::responses::{
    CopyYearResponse, DatePeriodResponse, MessageResponse, PeriodSummary, SeasonResponse,
    SettingsResponse,
};

/// Years accepted for date periods
pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2100;

// ==================== seasons ====================

pub async fn list_seasons(pool: &PgPool) -> Result<Vec<SeasonResponse>, AppError> {
    let seasons = queries::list_seasons(pool).await?;
    let periods = queries::list_period_rows(pool, None).await?;

    let mut by_season: HashMap<Uuid, Vec<PeriodSummary>> = HashMap::new();
    for period in &periods {
        by_season
            .entry(period.season_id)
            .or_default()
            .push(PeriodSummary::from(period));
    }

    Ok(seasons
        .into_iter()
        .map(|season| {
            let summaries = by_season.remove(&season.id).unwrap_or_default();
            SeasonResponse::new(season, summaries)
        })
        .collect())
}

pub async fn get_season(pool: &PgPool, id: Uuid) -> Result<SeasonResponse, AppError> {
    let season = find_season(pool, id).await?;
    let periods = queries::list_period_rows(pool, Some(id)).await?;
    let summaries = periods.iter().map(PeriodSummary::from).collect();
    Ok(SeasonResponse::new(season, summaries))
}

pub async fn create_season(
    pool: &PgPool,
    cache: &AppCache,
    req: CreateSeasonRequest,
) -> Result<SeasonResponse, AppError> {
    let now = Utc::now();
    let season = Season {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        price_per_night: req.price_per_night,
        weekly_night_rate: req.weekly_night_rate,
        min_nights: req.min_nights.unwrap_or(DEFAULT_MIN_NIGHTS),
        color: req.color,
        display_order: req.order.unwrap_or(0),
        created_at: now,
        updated_at: now,
    };
    season.validate()?;

    let created = queries::insert_season(pool, &season).await?;
    cache.invalidate_catalog();
    info!(season_id = %created.id, name = %created.name, "season created");

    Ok(SeasonResponse::new(created, Vec::new()))
}

pub async fn update_season(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: UpdateSeasonRequest,
) -> Result<SeasonResponse, AppError> {
    let existing = find_season(pool, id).await?;
    let merged = apply_season_update(existing, req);
    merged.validate()?;

    let updated = queries::update_season(pool, &merged).await?;
    cache.invalidate_catalog();
    info!(season_id = %updated.id, "season updated");

    get_season_response(pool, updated).await
}

/// Merge a partial update into the stored season. Validation runs on the
/// result, so the weekly-vs-nightly rule also catches a lowered nightly price.
fn apply_season_update(mut season: Season, req: UpdateSeasonRequest) -> Season {
    if let Some(name) = req.name {
        season.name = name.trim().to_string();
    }
    if let Some(price) = req.price_per_night {
        season.price_per_night = price;
    }
    if let Some(weekly) = req.weekly_night_rate {
        season.weekly_night_rate = weekly;
    }
    if let Some(min_nights) = req.min_nights {
        season.min_nights = min_nights;
    }
    if let Some(color) = req.color {
        season.color = color;
    }
    if let Some(order) = req.order {
        season.display_order = order;
    }
    season.updated_at = Utc::now();
    season
}

pub async fn delete_season(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<MessageResponse, AppError> {
    let season = find_season(pool, id).await?;
    let periods_count = queries::list_period_rows(pool, Some(id)).await?.len();

    queries::delete_season(pool, id).await?;
    cache.invalidate_catalog();
    info!(season_id = %id, periods_count, "season deleted");

    let message = if periods_count > 0 {
        format!(
            "Season \"{}\" deleted along with {} date period(s)",
            season.name, periods_count
        )
    } else {
        format!("Season \"{}\" deleted", season.name)
    };

    Ok(MessageResponse { message })
}

async fn find_season(pool: &PgPool, id: Uuid) -> Result<Season, AppError> {
    queries::get_season(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Season {} not found", id)))
}

async fn get_season_response(pool: &PgPool, season: Season) -> Result<SeasonResponse, AppError> {
    let periods = queries::list_period_rows(pool, Some(season.id)).await?;
    let summaries = periods.iter().map(PeriodSummary::from).collect();
    Ok(SeasonResponse::new(season, summaries))
}

// ==================== date periods ====================

pub async fn list_periods(
    pool: &PgPool,
    year: Option<i32>,
) -> Result<Vec<DatePeriodResponse>, AppError> {
    let periods = queries::list_periods(pool, year).await?;
    Ok(periods.into_iter().map(DatePeriodResponse::from).collect())
}

pub async fn available_years(pool: &PgPool) -> Result<Vec<i32>, AppError> {
    queries::available_years(pool).await
}

pub async fn get_period(pool: &PgPool, id: Uuid) -> Result<DatePeriodResponse, AppError> {
    queries::get_period(pool, id)
        .await?
        .map(DatePeriodResponse::from)
        .ok_or_else(|| AppError::NotFound("Date period not found".to_string()))
}

pub async fn create_period(
    pool: &PgPool,
    cache: &AppCache,
    req: CreateDatePeriodRequest,
) -> Result<DatePeriodResponse, AppError> {
    let range = DateRange::new(req.start_date, req.end_date)?;
    let year = validate_year(range.start.year())?;
    ensure_season_exists(pool, req.season_id).await?;

    let same_year = queries::find_periods_in_year(pool, year).await?;
    ensure_no_overlap(&same_year, range, None)?;

    let period = DatePeriod {
        id: Uuid::new_v4(),
        start_date: range.start,
        end_date: range.end,
        year,
        season_id: req.season_id,
    };
    queries::insert_period(pool, &period)
        .await
        .map_err(overlap_as_bad_request)?;
    cache.invalidate_catalog();
    info!(period_id = %period.id, %year, "date period created");

    get_period(pool, period.id).await
}

pub async fn update_period(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    req: UpdateDatePeriodRequest,
) -> Result<DatePeriodResponse, AppError> {
    let existing = get_period(pool, id).await?;

    let start = req.start_date.unwrap_or(existing.start_date);
    let end = req.end_date.unwrap_or(existing.end_date);
    let range = DateRange::new(start, end)?;
    let year = validate_year(range.start.year())?;

    let season_id = match req.season_id {
        Some(season_id) => {
            ensure_season_exists(pool, season_id).await?;
            season_id
        }
        None => existing.season_id,
    };

    let same_year = queries::find_periods_in_year(pool, year).await?;
    ensure_no_overlap(&same_year, range, Some(id))?;

    let period = DatePeriod {
        id,
        start_date: range.start,
        end_date: range.end,
        year,
        season_id,
    };
    queries::update_period(pool, &period)
        .await
        .map_err(overlap_as_bad_request)?;
    cache.invalidate_catalog();
    info!(period_id = %id, "date period updated");

    get_period(pool, id).await
}

pub async fn delete_period(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<MessageResponse, AppError> {
    if queries::delete_period(pool, id).await? == 0 {
        return Err(AppError::NotFound("Date period not found".to_string()));
    }
    cache.invalidate_catalog();
    info!(period_id = %id, "date period deleted");

    Ok(MessageResponse {
        message: "Date period deleted".to_string(),
    })
}

/// Duplicate every period of `source_year` into an empty `target_year`,
/// shifting dates by the year difference.
pub async fn copy_year(
    pool: &PgPool,
    cache: &AppCache,
    source_year: i32,
    target_year: i32,
) -> Result<CopyYearResponse, AppError> {
    validate_year(source_year)?;
    validate_year(target_year)?;
    if source_year == target_year {
        return Err(AppError::BadRequest(
            "Source and target years must differ".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let existing = queries::find_periods_in_year(&mut *tx, target_year).await?;
    if !existing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Year {} already has {} date period(s). Delete them first.",
            target_year,
            existing.len()
        )));
    }

    let source = queries::find_periods_in_year(&mut *tx, source_year).await?;
    if source.is_empty() {
        return Err(AppError::NotFound(format!(
            "No date periods found for year {}",
            source_year
        )));
    }

    let copies = shift_periods(&source, target_year)?;
    for period in &copies {
        queries::insert_period(&mut *tx, period)
            .await
            .map_err(overlap_as_bad_request)?;
    }
    tx.commit().await?;

    cache.invalidate_catalog();
    info!(source_year, target_year, copied = copies.len(), "date periods copied");

    Ok(CopyYearResponse {
        copied_count: copies.len(),
    })
}

fn shift_periods(source: &[DatePeriod], target_year: i32) -> Result<Vec<DatePeriod>, AppError> {
    source
        .iter()
        .map(|period| {
            let offset = target_year - period.year;
            let start_date = shift_years(period.start_date, offset);
            let end_date = shift_years(period.end_date, offset);
            match (start_date, end_date) {
                (Some(start_date), Some(end_date)) if start_date < end_date => Ok(DatePeriod {
                    id: Uuid::new_v4(),
                    start_date,
                    end_date,
                    year: target_year,
                    season_id: period.season_id,
                }),
                _ => Err(AppError::BadRequest(format!(
                    "Date period starting {} cannot be moved to {}",
                    period.start_date, target_year
                ))),
            }
        })
        .collect()
}

fn validate_year(year: i32) -> Result<i32, AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::BadRequest(format!(
            "Year must be between {} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(year)
}

async fn ensure_season_exists(pool: &PgPool, season_id: Uuid) -> Result<(), AppError> {
    if !queries::season_exists(pool, season_id).await? {
        return Err(AppError::NotFound(format!("Season {} not found", season_id)));
    }
    Ok(())
}

/// Reject `candidate` when it overlaps another period of the same year.
fn ensure_no_overlap(
    same_year: &[DatePeriod],
    candidate: DateRange,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    let clash = same_year
        .iter()
        .filter(|p| Some(p.id) != exclude)
        .find(|p| candidate.overlaps(&p.range()));

    match clash {
        Some(p) => Err(AppError::BadRequest(format!(
            "This date range overlaps an existing period ({} to {}) for this year",
            p.start_date, p.end_date
        ))),
        None => Ok(()),
    }
}

/// A concurrent write that slipped past [`ensure_no_overlap`] trips the
/// `date_periods_no_overlap` constraint instead.
fn overlap_as_bad_request(err: AppError) -> AppError {
    if err.is_exclusion_violation() {
        AppError::BadRequest("This date range overlaps an existing period for this year".to_string())
    } else {
        err
    }
}

// ==================== settings ====================

pub async fn get_settings(pool: &PgPool, cache: &AppCache) -> Result<Settings, AppError> {
    if let Some(cached) = cache.get_settings().await {
        tracing::debug!("Cache HIT for settings");
        return Ok((*cached).clone());
    }

    tracing::debug!("Cache MISS for settings");
    let generation = cache.settings_generation();
    let settings = queries::get_or_create_settings(pool).await?;
    cache.put_settings(settings.clone(), generation).await;
    Ok(settings)
}

pub async fn update_settings(
    pool: &PgPool,
    cache: &AppCache,
    req: UpdateSettingsRequest,
) -> Result<SettingsResponse, AppError> {
    if req.default_price_per_night <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Default price per night must be positive".to_string(),
        ));
    }

    let settings = queries::upsert_settings(pool, req.default_price_per_night).await?;
    cache.invalidate_settings().await;
    info!(default_price_per_night = %settings.default_price_per_night, "settings updated");

    Ok(SettingsResponse::from(&settings))
}

/// Fallback nightly price for nights outside every date period.
pub async fn default_price_per_night(pool: &PgPool, cache: &AppCache) -> Result<Decimal, AppError> {
    Ok(get_settings(pool, cache).await?.default_price_per_night)
}
