//! Tariff catalog: seasons, the date periods that place them on the calendar,
//! and the fallback price used for uncovered nights.

pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use models::{DatePeriod, Season, Settings};
pub use routes::router;
