//! HTTP handlers for bookings.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;

use crate::auth::AdminGuard;
use crate::error::Result;
use crate::extract::{Json, Path};
use crate::pricing::PriceCalculation;
use crate::AppState;

use super::requests::{
    CheckConflictsRequest, CreateBookingRequest, CreateQuickBookingRequest, UpdateBookingRequest,
};
use super::responses::{
    BookedRange, BookingResponse, ConflictCheckResponse, MessageResponse, PriceSummary,
};
use super::services;

/// Booking routes. Only the availability checks are public.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list).post(create))
        .route("/api/bookings/quick", post(create_quick))
        .route("/api/bookings/dates", get(booked_dates))
        .route("/api/bookings/check-conflicts", post(check_conflicts))
        .route(
            "/api/bookings/:id",
            get(detail).patch(update).delete(delete),
        )
        .route("/api/bookings/:id/confirm", patch(confirm))
        .route("/api/bookings/:id/cancel", patch(cancel))
        .route("/api/bookings/:id/recalculate-price", post(recalculate_price))
        .route("/api/bookings/:id/price-summary", get(price_summary))
}

async fn list(_admin: AdminGuard, State(state): State<AppState>) -> Result<Json<Vec<BookingResponse>>> {
    Ok(Json(services::list_bookings(&state.db).await?))
}

async fn booked_dates(State(state): State<AppState>) -> Result<Json<Vec<BookedRange>>> {
    Ok(Json(services::booked_ranges(&state.db).await?))
}

async fn check_conflicts(
    State(state): State<AppState>,
    Json(req): Json<CheckConflictsRequest>,
) -> Result<Json<ConflictCheckResponse>> {
    let range = req.range()?;
    Ok(Json(
        services::check_conflicts(&state.db, range, req.booking_id).await?,
    ))
}

async fn detail(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>> {
    Ok(Json(services::get_booking(&state.db, id).await?))
}

async fn create(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let booking = services::create_booking(&state.db, &state.cache, req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn create_quick(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(req): Json<CreateQuickBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let booking = services::create_quick_booking(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn update(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>> {
    Ok(Json(
        services::update_booking(&state.db, &state.cache, id, req).await?,
    ))
}

async fn delete(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    Ok(Json(services::delete_booking(&state.db, id).await?))
}

async fn confirm(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>> {
    Ok(Json(services::confirm_booking(&state.db, id).await?))
}

async fn cancel(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>> {
    Ok(Json(services::cancel_booking(&state.db, id).await?))
}

async fn recalculate_price(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PriceCalculation>> {
    Ok(Json(
        services::recalculate_price(&state.db, &state.cache, id).await?,
    ))
}

async fn price_summary(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PriceSummary>> {
    Ok(Json(
        services::price_summary(&state.db, &state.cache, &state.config.tariffs, id).await?,
    ))
}
