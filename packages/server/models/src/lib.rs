#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the isochrone server.
//!
//! Successful isochrone responses are plain `GeoJSON` features produced by
//! the engine, so only requests, health, and errors are modelled here.

use serde::{Deserialize, Serialize};
use sitescout_isochrone_models::IsochroneQuery;

/// Body of `POST /api/isochrones/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Latitude of the requested point.
    pub lat: f64,
    /// Longitude of the requested point.
    pub lng: f64,
    /// Drive time in minutes.
    pub minutes: u32,
    /// The provider's raw response, passed through untouched.
    pub response: serde_json::Value,
}

impl ResolveRequest {
    /// The query this request describes.
    #[must_use]
    pub const fn query(&self) -> IsochroneQuery {
        IsochroneQuery::new(self.lat, self.lng, self.minutes)
    }
}

/// Query parameters for `GET /api/isochrones/mock`.
#[derive(Debug, Clone, Deserialize)]
pub struct MockQueryParams {
    /// Latitude of the requested point.
    pub lat: f64,
    /// Longitude of the requested point.
    pub lng: f64,
    /// Drive time in minutes.
    pub minutes: u32,
}

impl MockQueryParams {
    /// The query these parameters describe.
    #[must_use]
    pub const fn query(&self) -> IsochroneQuery {
        IsochroneQuery::new(self.lat, self.lng, self.minutes)
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable failure kind (`invalid_center`, `no_results`,
    /// `no_shapes`, `no_candidates`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
