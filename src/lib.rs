//! Holiday rental web service: seasonal tariffs, stay pricing and bookings.

pub mod auth;
pub mod bookings;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod extract;
pub mod pricing;
pub mod routes;
pub mod telemetry;

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::config::AppConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<AppConfig>,
}
