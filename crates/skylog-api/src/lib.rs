//! Typed client for the skylog weather API.
//!
//! The server owns geocoding, weather lookup, history persistence, and
//! export rendering; this crate only moves typed requests and responses
//! across the wire. No retries, no caching, no client-side timeouts.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    CurrentConditions, DailyForecast, ExportDocument, ExportFormat, ExtrasBundle, Health,
    HistoryRecord, LocationQuery, RecordPatch, VideoRef, WeatherSnapshot,
};
