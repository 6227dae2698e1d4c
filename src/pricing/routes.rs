//! HTTP handlers for the pricing engine.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};

use crate::error::Result;
use crate::extract::{Json, Query};
use crate::AppState;

use super::requests::{CalculatePriceRequest, MinNightsQuery, PublicGridQuery};
use super::responses::{MinNightsResponse, PriceCalculation, PublicGrid};
use super::services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/calculate", post(calculate))
        .route("/api/pricing/min-nights", get(min_nights))
        .route("/api/pricing/public-grid", get(public_grid))
}

async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculatePriceRequest>,
) -> Result<Json<PriceCalculation>> {
    let stay = req.range()?;
    Ok(Json(
        services::calculate_price(&state.db, &state.cache, stay).await?,
    ))
}

async fn min_nights(
    State(state): State<AppState>,
    Query(query): Query<MinNightsQuery>,
) -> Result<Json<MinNightsResponse>> {
    let range = query.range()?;
    let min_nights = services::get_min_nights_for_period(&state.db, range).await?;
    Ok(Json(MinNightsResponse { min_nights }))
}

async fn public_grid(
    State(state): State<AppState>,
    Query(query): Query<PublicGridQuery>,
) -> Result<Json<PublicGrid>> {
    let grid = services::get_public_grid(&state.db, &state.cache, query.year).await?;
    Ok(Json((*grid).clone()))
}
