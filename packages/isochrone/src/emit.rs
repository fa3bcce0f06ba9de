//! Packages the selected ring as a resolution and a `GeoJSON` feature.

use geo::Polygon;
use geojson::{Feature, Geometry, JsonObject};
use serde_json::Value;
use sitescout_isochrone_models::{
    CoordinateFormat, IsochroneProperties, IsochroneQuery, QueryCenter, SelectionTier,
};

use crate::IsochroneError;
use crate::candidates::ShapeCandidate;
use crate::diagnostics::Diagnostics;

/// The resolved isochrone for one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The request this resolves, unmodified.
    pub query: IsochroneQuery,
    /// The chosen candidate, with a closed ring.
    pub selected: ShapeCandidate,
    /// Which selection rule picked it.
    pub tier: SelectionTier,
    /// `"<label> (<rule>)"`, or `"mock_circle"` for generated polygons.
    pub reason: String,
    /// Encoding of the selected ring, `_swapped` if corrected.
    pub coordinate_format: CoordinateFormat,
    /// Every warning produced while resolving, oldest first.
    pub warnings: Vec<String>,
    /// Coordinate records dropped while parsing.
    pub invalid_coordinates: usize,
    /// Whether the polygon is a generated approximation.
    pub mock: bool,
}

impl Resolution {
    /// Finalizes a selection: closes the ring and takes ownership of the
    /// accumulated diagnostics.
    #[must_use]
    pub fn emit(
        query: IsochroneQuery,
        mut selected: ShapeCandidate,
        tier: SelectionTier,
        reason: String,
        diagnostics: Diagnostics,
    ) -> Self {
        if !selected.ring.is_closed() {
            log::debug!("[Isochrone] Ring for {} was open, closing it", selected.label);
            selected.ring = selected.ring.closed();
        }

        let (warnings, invalid_coordinates) = diagnostics.into_parts();

        log::info!(
            "[Isochrone] Resolved {} min isochrone at ({}, {}): {reason}, {} points, {} warning(s)",
            query.minutes,
            query.lat,
            query.lng,
            selected.ring.len(),
            warnings.len()
        );

        Self {
            query,
            coordinate_format: selected.format,
            selected,
            tier,
            reason,
            warnings,
            invalid_coordinates,
            mock: false,
        }
    }

    /// The caller-supplied center.
    #[must_use]
    pub const fn center(&self) -> QueryCenter {
        self.query.center()
    }

    /// The ring as `[lng, lat]` positions, first equal to last.
    #[must_use]
    pub fn ring_positions(&self) -> Vec<Vec<f64>> {
        self.selected.ring.to_positions()
    }

    /// The feature's `properties` object.
    #[must_use]
    pub fn properties(&self) -> IsochroneProperties {
        IsochroneProperties {
            minutes: self.query.minutes,
            center: self.center().to_lng_lat(),
            selection_reason: self.reason.clone(),
            coordinate_format: self.coordinate_format,
            warnings: self.warnings.clone(),
            mock: self.mock,
            shell_label: self.selected.label.clone(),
            invalid_coordinates: self.invalid_coordinates,
        }
    }

    /// Builds the single-ring `GeoJSON` polygon feature.
    ///
    /// # Errors
    ///
    /// Returns [`IsochroneError::Json`] if the properties fail to serialize.
    pub fn to_feature(&self) -> Result<Feature, IsochroneError> {
        let polygon = Polygon::new(self.selected.ring.to_line_string(), Vec::new());
        let geometry = Geometry::new(geojson::Value::from(&polygon));

        let properties = match serde_json::to_value(self.properties())? {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };

        Ok(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }

    /// Serializes the feature to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`IsochroneError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, IsochroneError> {
        Ok(serde_json::to_value(self.to_feature()?)?)
    }
}
