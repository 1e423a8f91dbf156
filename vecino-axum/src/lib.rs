//! vecino-axum: Axum adapter for vecino.
//!
//! Exposes helpers to build Axum routers from vecino services and apps.

pub mod app;
pub mod params;
pub mod rest;
pub mod state;

mod error;

pub use app::{axum_app, AxumApp};
pub use error::VecinoAxumError;
pub use state::AxumState;
