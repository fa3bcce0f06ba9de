#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Isochrone query and result contract types.
//!
//! These types describe the request point, the bounding boxes used while
//! choosing between provider shapes, and the `properties` object attached
//! to every emitted `GeoJSON` feature. They are shared by the resolution
//! engine, the HTTP server, and the CLI.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Smallest valid longitude.
pub const MIN_LNG: f64 = -180.0;
/// Largest valid longitude.
pub const MAX_LNG: f64 = 180.0;
/// Smallest valid latitude.
pub const MIN_LAT: f64 = -90.0;
/// Largest valid latitude.
pub const MAX_LAT: f64 = 90.0;

/// Returns `true` if the pair lies within the WGS84 longitude/latitude range.
#[must_use]
pub fn in_range(lng: f64, lat: f64) -> bool {
    (MIN_LNG..=MAX_LNG).contains(&lng) && (MIN_LAT..=MAX_LAT).contains(&lat)
}

/// The original isochrone request: a point and a drive time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsochroneQuery {
    /// Latitude of the requested point.
    pub lat: f64,
    /// Longitude of the requested point.
    pub lng: f64,
    /// Drive time in minutes.
    pub minutes: u32,
}

impl IsochroneQuery {
    /// Creates a new query.
    #[must_use]
    pub const fn new(lat: f64, lng: f64, minutes: u32) -> Self {
        Self { lat, lng, minutes }
    }

    /// The center point of this query, exactly as supplied.
    #[must_use]
    pub const fn center(&self) -> QueryCenter {
        QueryCenter {
            lng: self.lng,
            lat: self.lat,
        }
    }
}

/// The caller-supplied center of an isochrone request.
///
/// Never recomputed from the returned polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryCenter {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

impl QueryCenter {
    /// Returns the center in `GeoJSON` order, `[lng, lat]`.
    #[must_use]
    pub const fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Axis-aligned bounding box in longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub min_lng: f64,
    /// Eastern longitude boundary.
    pub max_lng: f64,
    /// Southern latitude boundary.
    pub min_lat: f64,
    /// Northern latitude boundary.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Computes the bounding box of a sequence of `(lng, lat)` points.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (lng, lat)| {
            Some(acc.map_or(
                Self {
                    min_lng: lng,
                    max_lng: lng,
                    min_lat: lat,
                    max_lat: lat,
                },
                |b: Self| Self {
                    min_lng: b.min_lng.min(lng),
                    max_lng: b.max_lng.max(lng),
                    min_lat: b.min_lat.min(lat),
                    max_lat: b.max_lat.max(lat),
                },
            ))
        })
    }

    /// Returns `true` if the point lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        (self.min_lng..=self.max_lng).contains(&lng) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Returns `true` if the box contains the query center.
    #[must_use]
    pub fn contains_center(&self, center: QueryCenter) -> bool {
        self.contains(center.lng, center.lat)
    }
}

/// How the coordinates of the selected shape were encoded by the provider.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoordinateFormat {
    /// Keyed mapping (`{"lat": .., "lng": ..}`). Axis order is unambiguous.
    Object,
    /// Two-element sequence read as `[lng, lat]`. Axis order is ambiguous.
    Array,
    /// Keyed mapping whose axes were swapped after selection.
    ObjectSwapped,
    /// Sequence whose axes were swapped after selection.
    ArraySwapped,
}

impl CoordinateFormat {
    /// Whether the axis order of this encoding cannot be trusted.
    #[must_use]
    pub const fn is_ambiguous(self) -> bool {
        matches!(self, Self::Array)
    }

    /// Whether an axis swap has been applied.
    #[must_use]
    pub const fn is_swapped(self) -> bool {
        matches!(self, Self::ObjectSwapped | Self::ArraySwapped)
    }

    /// The `_swapped` counterpart of this format.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::Object | Self::ObjectSwapped => Self::ObjectSwapped,
            Self::Array | Self::ArraySwapped => Self::ArraySwapped,
        }
    }
}

/// Which rule picked the final shape.
///
/// Variants are listed in priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionTier {
    /// The ring geometrically contains the center.
    CenterCovered,
    /// Only the ring's bounding box contains the center.
    BboxOverlap,
    /// Nothing contains the center; the ring with the most vertices won.
    FallbackLongestRing,
}

impl SelectionTier {
    /// Human-readable reason suffix used in `selection_reason`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CenterCovered => "center covered",
            Self::BboxOverlap => "bbox overlap",
            Self::FallbackLongestRing => "fallback longest ring",
        }
    }

    /// Formats the full selection reason, e.g. `"shape[0].shell (center covered)"`.
    #[must_use]
    pub fn reason(self, label: &str) -> String {
        format!("{label} ({})", self.description())
    }

    /// Whether this tier guarantees the ring contains the center.
    #[must_use]
    pub const fn covers_center(self) -> bool {
        matches!(self, Self::CenterCovered)
    }
}

/// The `properties` object of an emitted isochrone feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneProperties {
    /// Requested drive time in minutes.
    pub minutes: u32,
    /// Requested center as `[lng, lat]`.
    pub center: [f64; 2],
    /// Why this ring was chosen.
    pub selection_reason: String,
    /// Encoding of the chosen ring's coordinates.
    pub coordinate_format: CoordinateFormat,
    /// Diagnostics accumulated while resolving, in the order they occurred.
    pub warnings: Vec<String>,
    /// Whether the polygon is a generated approximation.
    #[serde(default)]
    pub mock: bool,
    /// Provenance label of the chosen ring (e.g. `"shape[2].shell"`).
    pub shell_label: String,
    /// Number of coordinate records dropped while parsing the payload.
    #[serde(default)]
    pub invalid_coordinates: usize,
}
