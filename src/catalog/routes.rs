//! HTTP handlers for seasons, date periods and settings.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::auth::AdminGuard;
use crate::error::Result;
use crate::extract::{Json, Path, Query};
use crate::AppState;

use super::requests::{
    CopyYearRequest, CreateDatePeriodRequest, CreateSeasonRequest, DatePeriodListQuery,
    UpdateDatePeriodRequest, UpdateSeasonRequest, UpdateSettingsRequest,
};
use super::responses::{
    CopyYearResponse, DatePeriodResponse, MessageResponse, SeasonResponse, SettingsResponse,
};
use super::services;

/// Catalog routes. Reads are public, writes need the admin token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/seasons", get(list_seasons).post(create_season))
        .route(
            "/api/seasons/:id",
            get(get_season).put(update_season).delete(delete_season),
        )
        .route("/api/date-periods", get(list_periods).post(create_period))
        .route("/api/date-periods/years", get(available_years))
        .route("/api/date-periods/copy-year", post(copy_year))
        .route(
            "/api/date-periods/:id",
            get(get_period).put(update_period).delete(delete_period),
        )
        .route("/api/settings", get(get_settings).put(update_settings))
}

// ==================== seasons ====================

async fn list_seasons(State(state): State<AppState>) -> Result<Json<Vec<SeasonResponse>>> {
    Ok(Json(services::list_seasons(&state.db).await?))
}

async fn get_season(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeasonResponse>> {
    Ok(Json(services::get_season(&state.db, id).await?))
}

async fn create_season(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<CreateSeasonRequest>,
) -> Result<(StatusCode, Json<SeasonResponse>)> {
    let season = services::create_season(&state.db, &state.cache, req).await?;
    Ok((StatusCode::CREATED, Json(season)))
}

async fn update_season(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSeasonRequest>,
) -> Result<Json<SeasonResponse>> {
    Ok(Json(
        services::update_season(&state.db, &state.cache, id, req).await?,
    ))
}

async fn delete_season(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(services::delete_season(&state.db, &state.cache, id).await?))
}

// ==================== date periods ====================

async fn list_periods(
    State(state): State<AppState>,
    Query(query): Query<DatePeriodListQuery>,
) -> Result<Json<Vec<DatePeriodResponse>>> {
    Ok(Json(services::list_periods(&state.db, query.year).await?))
}

async fn available_years(State(state): State<AppState>) -> Result<Json<Vec<i32>>> {
    Ok(Json(services::available_years(&state.db).await?))
}

async fn get_period(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DatePeriodResponse>> {
    Ok(Json(services::get_period(&state.db, id).await?))
}

async fn create_period(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<CreateDatePeriodRequest>,
) -> Result<(StatusCode, Json<DatePeriodResponse>)> {
    let period = services::create_period(&state.db, &state.cache, req).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

async fn update_period(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDatePeriodRequest>,
) -> Result<Json<DatePeriodResponse>> {
    Ok(Json(
        services::update_period(&state.db, &state.cache, id, req).await?,
    ))
}

async fn delete_period(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(services::delete_period(&state.db, &state.cache, id).await?))
}

async fn copy_year(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<CopyYearRequest>,
) -> Result<(StatusCode, Json<CopyYearResponse>)> {
    let copied =
        services::copy_year(&state.db, &state.cache, req.source_year, req.target_year).await?;
    Ok((StatusCode::CREATED, Json(copied)))
}

// ==================== settings ====================

async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>> {
    let settings = services::get_settings(&state.db, &state.cache).await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

async fn update_settings(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>> {
    Ok(Json(
        services::update_settings(&state.db, &state.cache, req).await?,
    ))
}
