#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Isochrone shape resolution and coordinate normalization.
//!
//! The drive-time provider answers an isochrone query with several
//! disconnected shapes, in no useful order, with coordinates that may be
//! keyed objects or bare `[a, b]` sequences of uncertain axis order. This
//! crate turns such a payload plus the original query into exactly one
//! closed polygon ring, together with the warnings a consumer needs to
//! decide how far to trust it.
//!
//! The pipeline is:
//!
//! 1. locate shapes and shells in the payload ([`response`]),
//! 2. extract coordinates and build one candidate per shell
//!    ([`coordinate`], [`candidates`]),
//! 3. select a candidate by center containment ([`select`]),
//! 4. correct swapped axes on ambiguous input ([`swap`]),
//! 5. check center coverage and emit a `GeoJSON` feature
//!    ([`diagnostics`], [`emit`]).
//!
//! Every stage appends to a per-request [`diagnostics::Diagnostics`];
//! nothing is shared between calls.

pub mod candidates;
pub mod config;
pub mod coordinate;
pub mod diagnostics;
pub mod emit;
pub mod mock;
pub mod response;
pub mod ring;
pub mod select;
pub mod swap;

use serde_json::Value;
use sitescout_isochrone_models::{IsochroneQuery, in_range};

pub use config::IsochroneConfig;
pub use emit::Resolution;
pub use mock::mock_isochrone;

use crate::candidates::build_candidates;
use crate::diagnostics::{Diagnostics, check_coverage};
use crate::response::locate_shapes;
use crate::select::select_candidate;
use crate::swap::{SwapOutcome, correct_axis_swap};

/// Errors that can occur while resolving an isochrone.
#[derive(Debug, thiserror::Error)]
pub enum IsochroneError {
    /// The requested center is not a valid latitude/longitude.
    #[error("Invalid center coordinates: lat {lat}, lng {lng}")]
    InvalidCenter {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lng: f64,
    },

    /// The payload's `results` array was empty.
    #[error("Provider response contained no results")]
    NoResults,

    /// No shapes could be located in the payload.
    #[error("No shapes found in provider response")]
    NoShapes,

    /// Every located shell was unusable.
    #[error("No usable shapes in provider response ({shells_examined} shell(s) examined)")]
    NoCandidates {
        /// Shells located before extraction discarded them.
        shells_examined: usize,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file was malformed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl IsochroneError {
    /// Short machine-readable name for request and payload failures,
    /// `None` for everything else.
    #[must_use]
    pub const fn kind(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCenter { .. } => Some("invalid_center"),
            Self::NoResults => Some("no_results"),
            Self::NoShapes => Some("no_shapes"),
            Self::NoCandidates { .. } => Some("no_candidates"),
            Self::Json(_) | Self::Io(_) | Self::Config(_) => None,
        }
    }
}

/// Rejects a query whose center is outside the WGS84 range (or not finite).
///
/// # Errors
///
/// Returns [`IsochroneError::InvalidCenter`] for an unusable center.
pub fn validate_query(query: &IsochroneQuery) -> Result<(), IsochroneError> {
    if in_range(query.lng, query.lat) {
        return Ok(());
    }
    log::warn!(
        "[Isochrone] Rejecting query with invalid center ({}, {})",
        query.lat,
        query.lng
    );
    Err(IsochroneError::InvalidCenter {
        lat: query.lat,
        lng: query.lng,
    })
}

/// Resolves a raw provider payload into a single isochrone ring.
///
/// # Errors
///
/// * [`IsochroneError::InvalidCenter`] if the query center is out of range.
/// * [`IsochroneError::NoResults`] or [`IsochroneError::NoShapes`] if the
///   payload holds no shapes at all.
/// * [`IsochroneError::NoCandidates`] if no shell has three valid points.
pub fn resolve(
    payload: &Value,
    query: &IsochroneQuery,
    config: &IsochroneConfig,
) -> Result<Resolution, IsochroneError> {
    validate_query(query)?;

    let center = query.center();
    let mut diagnostics = Diagnostics::default();

    log::info!(
        "[Isochrone] Resolving {} min isochrone at ({}, {})",
        query.minutes,
        query.lat,
        query.lng
    );

    let shapes = locate_shapes(payload)?;
    let set = build_candidates(&shapes, config, &mut diagnostics);
    let mut candidates = set.candidates;

    let Some(selection) = select_candidate(&candidates, center) else {
        log::error!(
            "[Isochrone] No usable shapes among {} shell(s)",
            set.shells_examined
        );
        return Err(IsochroneError::NoCandidates {
            shells_examined: set.shells_examined,
        });
    };

    let reason = selection.reason(&candidates);
    let mut selected = candidates.swap_remove(selection.index);

    if config.axis_swap {
        match correct_axis_swap(&mut selected, selection.tier, center, &mut diagnostics) {
            SwapOutcome::Applied(tier) => {
                log::debug!("[Isochrone] Swapped ring now satisfies {tier}");
            }
            SwapOutcome::NotApplicable | SwapOutcome::Rejected => {}
        }
    }

    check_coverage(
        &selected.ring,
        &selected.label,
        center,
        config,
        &mut diagnostics,
    );

    Ok(Resolution::emit(
        *query,
        selected,
        selection.tier,
        reason,
        diagnostics,
    ))
}

/// Resolves a payload and serializes the result as a `GeoJSON` feature.
///
/// # Errors
///
/// Same as [`resolve`], plus [`IsochroneError::Json`] on serialization
/// failure.
pub fn resolve_feature(
    payload: &Value,
    query: &IsochroneQuery,
    config: &IsochroneConfig,
) -> Result<Value, IsochroneError> {
    resolve(payload, query, config)?.to_json()
}
