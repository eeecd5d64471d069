//! ToadLester API integration module.
//!
//! This module provides the HTTP client for the ToadLester sequence
//! generator service, the value types it exchanges, and the [`SeriesApi`]
//! seam the reconciler is written against.

mod api;
mod client;
mod types;

pub use api::SeriesApi;
#[cfg(test)]
pub(crate) use api::MockSeriesApi;
pub use client::ToadlesterClient;
pub use types::{HealthStatus, RemoteConfigSnapshot, Setting};
