//! Normalizes a single raw coordinate record into a `(lat, lng)` pair.
//!
//! Providers encode points either as keyed objects (`{"lat": .., "lng": ..}`
//! with a handful of spellings) or as bare two-element sequences. Each
//! record is classified once into a [`RawCoordinate`] and then extracted.
//! Sequences are always read as `[lng, lat]`; deciding whether a whole ring
//! was actually `[lat, lng]` is the job of [`crate::swap`], not of this
//! module.

use std::fmt;

use serde_json::{Map, Value};
use sitescout_isochrone_models::{CoordinateFormat, in_range};

/// Keys recognised as latitude, compared case-insensitively.
pub const LATITUDE_KEYS: &[&str] = &[
    "lat",
    "latitude",
    "y",
    "y_coord",
    "geo_lat",
    "center_lat",
];

/// Keys recognised as longitude, compared case-insensitively.
pub const LONGITUDE_KEYS: &[&str] = &[
    "lng",
    "lon",
    "long",
    "longitude",
    "x",
    "x_coord",
    "geo_lng",
    "center_lng",
];

/// A coordinate record classified by its encoding.
#[derive(Debug, Clone, Copy)]
pub enum RawCoordinate<'a> {
    /// Keyed mapping with latitude-like and longitude-like keys.
    Mapping(&'a Map<String, Value>),
    /// Ordered sequence, read as `[lng, lat, ..]`.
    Sequence(&'a [Value]),
}

/// A successfully extracted coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedCoordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Encoding of the record this came from.
    pub format: CoordinateFormat,
}

/// Why a coordinate record could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidCoordinate {
    /// Neither a mapping nor a sequence of at least two elements.
    Unsupported(String),
    /// No latitude-like key present.
    MissingLatitude,
    /// No longitude-like key present.
    MissingLongitude,
    /// A value that is not a finite number or numeric string.
    NotNumeric(String),
    /// Parsed, but outside the WGS84 range.
    OutOfRange {
        /// Parsed latitude.
        lat: f64,
        /// Parsed longitude.
        lng: f64,
    },
}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(raw) => write!(f, "unsupported coordinate record: {raw}"),
            Self::MissingLatitude => f.write_str("missing latitude"),
            Self::MissingLongitude => f.write_str("missing longitude"),
            Self::NotNumeric(raw) => write!(f, "non-numeric value: {raw}"),
            Self::OutOfRange { lat, lng } => {
                write!(f, "coordinate out of range: lng={lng}, lat={lat}")
            }
        }
    }
}

impl<'a> RawCoordinate<'a> {
    /// Classifies a JSON value, or returns `None` if it has neither form.
    #[must_use]
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::Mapping(map)),
            Value::Array(items) if items.len() >= 2 => Some(Self::Sequence(items)),
            _ => None,
        }
    }

    /// The encoding this record uses.
    #[must_use]
    pub const fn format(&self) -> CoordinateFormat {
        match self {
            Self::Mapping(_) => CoordinateFormat::Object,
            Self::Sequence(_) => CoordinateFormat::Array,
        }
    }

    /// Extracts the coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinate`] if an axis is missing, non-numeric, or
    /// out of range.
    pub fn extract(&self) -> Result<ExtractedCoordinate, InvalidCoordinate> {
        let (lat, lng) = match self {
            Self::Mapping(map) => {
                let lat = first_matching(map, LATITUDE_KEYS)
                    .ok_or(InvalidCoordinate::MissingLatitude)?;
                let lng = first_matching(map, LONGITUDE_KEYS)
                    .ok_or(InvalidCoordinate::MissingLongitude)?;
                (coerce_f64(lat)?, coerce_f64(lng)?)
            }
            Self::Sequence(items) => {
                let lng = coerce_f64(&items[0])?;
                let lat = coerce_f64(&items[1])?;
                (lat, lng)
            }
        };

        if !in_range(lng, lat) {
            return Err(InvalidCoordinate::OutOfRange { lat, lng });
        }

        Ok(ExtractedCoordinate {
            lat,
            lng,
            format: self.format(),
        })
    }
}

/// Classifies and extracts a coordinate record in one step.
///
/// # Errors
///
/// Returns [`InvalidCoordinate`] if the record is not usable.
pub fn extract_coordinate(value: &Value) -> Result<ExtractedCoordinate, InvalidCoordinate> {
    RawCoordinate::classify(value)
        .ok_or_else(|| InvalidCoordinate::Unsupported(value.to_string()))?
        .extract()
}

/// Returns the value of the first key (in record order) whose lowercase
/// form is in `keys`.
fn first_matching<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| {
            let key = key.to_ascii_lowercase();
            keys.contains(&key.as_str())
        })
        .map(|(_, value)| value)
}

/// Coerces a JSON number or numeric string into a finite `f64`.
fn coerce_f64(value: &Value) -> Result<f64, InvalidCoordinate> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| InvalidCoordinate::NotNumeric(value.to_string()))
}
