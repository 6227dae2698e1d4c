//! Booking lifecycle: availability checks, pending/confirmed/cancelled
//! bookings, and the money summary printed on contracts and invoices.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

pub use calculators::round_money;
pub use models::{Booking, BookingSource, BookingStatus, BookingType, Client};
pub use routes::router;
