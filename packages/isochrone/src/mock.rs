//! Circular stand-in isochrone for when no provider response is wanted.

use std::f64::consts::TAU;

use sitescout_isochrone_models::{CoordinateFormat, IsochroneQuery, in_range};

use crate::candidates::ShapeCandidate;
use crate::config::IsochroneConfig;
use crate::diagnostics::Diagnostics;
use crate::emit::Resolution;
use crate::ring::Ring;
use crate::{IsochroneError, validate_query};

/// Label and selection reason of generated polygons.
pub const MOCK_LABEL: &str = "mock_circle";

/// Kilometers per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// Generates a circle of `minutes * km_per_minute` km around the query.
///
/// # Errors
///
/// * [`IsochroneError::InvalidCenter`] if the query center is out of range.
/// * [`IsochroneError::NoCandidates`] if fewer than three distinct
///   in-range points remain (zero minutes, or a center at a pole).
pub fn mock_isochrone(
    query: &IsochroneQuery,
    config: &IsochroneConfig,
) -> Result<Resolution, IsochroneError> {
    validate_query(query)?;

    let center = query.center();
    let radius_km = f64::from(query.minutes) * config.mock.km_per_minute;
    let lat_radius = radius_km / KM_PER_DEGREE;
    let lng_radius = lat_radius / center.lat.to_radians().cos();

    log::info!(
        "[Isochrone] Generating mock isochrone: {} min at ({}, {}), radius {radius_km:.1} km",
        query.minutes,
        center.lat,
        center.lng
    );

    let points = config.mock.points;
    #[allow(clippy::cast_precision_loss)]
    let ring = Ring::from_lng_lat(
        (0..points)
            .map(|i| {
                let angle = TAU * i as f64 / points as f64;
                (
                    center.lng + lng_radius * angle.cos(),
                    center.lat + lat_radius * angle.sin(),
                )
            })
            .filter(|&(lng, lat)| in_range(lng, lat)),
    );

    let candidate = ShapeCandidate::new(MOCK_LABEL, ring, CoordinateFormat::Object)
        .ok_or(IsochroneError::NoCandidates { shells_examined: 1 })?;

    let mut diagnostics = Diagnostics::default();
    let tier = candidate.coverage(center);
    if !tier.covers_center() {
        diagnostics.warn(format!(
            "Mock isochrone ({MOCK_LABEL}) does not contain the requested center point."
        ));
    }

    let mut resolution = Resolution::emit(
        *query,
        candidate,
        tier,
        MOCK_LABEL.to_string(),
        diagnostics,
    );
    resolution.mock = true;

    Ok(resolution)
}
