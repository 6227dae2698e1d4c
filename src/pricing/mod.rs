//! Seasonal pricing engine.
//!
//! `calculators` holds the pure engine; `services` feeds it from the database
//! and cache, and `routes` exposes it over HTTP.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_price, min_nights_for, public_grid};
pub use models::SeasonalPeriod;
pub use responses::{PriceCalculation, PriceDetail, PublicGrid};
pub use routes::router;
