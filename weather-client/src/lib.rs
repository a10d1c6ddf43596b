//! Client library for the weather REST API.
//!
//! This crate defines:
//! - The HTTP client for the `/current`, `/forecast`, `/cities` and `/validate` endpoints
//! - Configuration & credentials handling
//! - Helpers over the pass-through JSON responses
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS, WeatherApi, WeatherApiClient};
pub use config::Config;
pub use error::ClientError;
pub use model::ForecastDay;
