//! Per-request diagnostics and the final center-coverage check.
//!
//! Every recoverable condition found while resolving a response ends up
//! in [`Diagnostics`], which is created fresh for each request and handed
//! back to the caller inside the resolution. Warnings can only be
//! appended.

use geo::{Closest, ClosestPoint, Distance, Haversine, Point};
use sitescout_isochrone_models::QueryCenter;

use crate::config::IsochroneConfig;
use crate::ring::Ring;

/// Warnings and counters accumulated while resolving one response.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    invalid_coordinates: usize,
}

impl Diagnostics {
    /// Appends a caller-visible warning (also logged).
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[Isochrone] {message}");
        self.warnings.push(message);
    }

    /// Adds to the invalid coordinate counter.
    pub const fn record_invalid(&mut self, count: usize) {
        self.invalid_coordinates += count;
    }

    /// Warnings so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Total invalid coordinate records seen so far.
    #[must_use]
    pub const fn invalid_coordinates(&self) -> usize {
        self.invalid_coordinates
    }

    /// Consumes the diagnostics, returning `(warnings, invalid_coordinates)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, usize) {
        (self.warnings, self.invalid_coordinates)
    }
}

/// How far a center point lies from a ring that does not contain it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOffset {
    /// Great-circle distance from the center to the nearest point on the
    /// ring's boundary, in km.
    pub distance_km: f64,
    /// Whether the center also falls outside the ring's bounding box.
    pub outside_bounds: bool,
}

/// Measures the offset between `center` and the boundary of `ring`.
///
/// Returns `None` for an empty ring.
#[must_use]
pub fn center_offset(ring: &Ring, center: QueryCenter) -> Option<CenterOffset> {
    let bounds = ring.bounds()?;
    let origin = Point::new(center.lng, center.lat);

    let nearest = match ring.to_line_string().closest_point(&origin) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        Closest::Indeterminate => return None,
    };

    Some(CenterOffset {
        distance_km: Haversine.distance(origin, nearest) / 1000.0,
        outside_bounds: !bounds.contains_center(center),
    })
}

/// Appends the center-not-covered warning if `ring` misses `center`.
///
/// Returns `true` if the ring contains the center.
pub fn check_coverage(
    ring: &Ring,
    label: &str,
    center: QueryCenter,
    config: &IsochroneConfig,
    diagnostics: &mut Diagnostics,
) -> bool {
    if ring.contains_center(center) {
        log::info!(
            "[Isochrone] Center ({:.6}, {:.6}) is within {label}",
            center.lat,
            center.lng
        );
        return true;
    }

    let Some(offset) = center_offset(ring, center) else {
        diagnostics.warn(format!(
            "Isochrone polygon ({label}) does not contain the requested center point."
        ));
        return false;
    };

    if offset.distance_km > config.significant_offset_km {
        log::error!(
            "[Isochrone] Center ({:.6}, {:.6}) is {:.1} km from {label}; \
             the provider may have returned a polygon for the wrong location",
            center.lat,
            center.lng,
            offset.distance_km
        );
    }

    let bounds_note = if offset.outside_bounds {
        " and lies outside its bounding box"
    } else {
        ""
    };

    diagnostics.warn(format!(
        "Isochrone polygon ({label}) does not contain the requested center point{bounds_note}. \
         Offset ≈ {:.1} km; the provider may have returned an offset polygon.",
        offset.distance_km
    ));

    false
}
