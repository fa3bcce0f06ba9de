//! Polygon ring geometry: closing, bounds, axis swapping, and the
//! even-odd point-in-polygon test used to pick between provider shapes.

use std::collections::BTreeSet;

use geo::{Coord, LineString};
use sitescout_isochrone_models::{BoundingBox, QueryCenter, in_range};

/// An ordered ring of points, `x` = longitude and `y` = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    coords: Vec<Coord<f64>>,
}

impl Ring {
    /// Wraps a list of coordinates without modifying it.
    #[must_use]
    pub const fn new(coords: Vec<Coord<f64>>) -> Self {
        Self { coords }
    }

    /// Builds a ring from `(lng, lat)` pairs.
    #[must_use]
    pub fn from_lng_lat<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(points.into_iter().map(|(x, y)| Coord { x, y }).collect())
    }

    /// The ring's vertices, including the closing point if present.
    #[must_use]
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    /// Vertex count, including the closing point if present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the ring has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Number of distinct vertices. A usable ring needs at least three.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.coords
            .iter()
            // `+ 0.0` folds -0.0 into 0.0 so both count as one vertex.
            .map(|c| ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Whether the first vertex equals the last.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Appends a copy of the first vertex if the ring is open.
    #[must_use]
    pub fn closed(mut self) -> Self {
        if self.is_closed() {
            return self;
        }
        if let Some(&first) = self.coords.first() {
            self.coords.push(first);
        }
        self
    }

    /// Bounding box of all vertices, or `None` for an empty ring.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.coords.iter().map(|c| (c.x, c.y)))
    }

    /// A copy of this ring with longitude and latitude exchanged.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self::new(
            self.coords
                .iter()
                .map(|c| Coord { x: c.y, y: c.x })
                .collect(),
        )
    }

    /// Whether every vertex is a valid WGS84 longitude/latitude.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        self.coords.iter().all(|c| in_range(c.x, c.y))
    }

    /// Even-odd ray-casting test.
    ///
    /// Casts a ray from the point towards positive longitude and counts
    /// edge crossings. Each edge is treated as half-open in latitude (its
    /// lower endpoint included, its upper excluded), so a vertex lying
    /// exactly on the ray is counted once. A zero-length closing edge
    /// never counts, so open and closed rings give the same answer.
    #[must_use]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        let n = self.coords.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.coords[i];
            let b = self.coords[j];
            if (a.y > lat) != (b.y > lat) {
                let crossing_lng = (b.x - a.x) * (lat - a.y) / (b.y - a.y) + a.x;
                if lng < crossing_lng {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Whether the ring contains the query center.
    #[must_use]
    pub fn contains_center(&self, center: QueryCenter) -> bool {
        self.contains(center.lng, center.lat)
    }

    /// Converts to a `geo` line string for distance computations.
    #[must_use]
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }

    /// Converts to `GeoJSON` positions, `[lng, lat]` per vertex.
    #[must_use]
    pub fn to_positions(&self) -> Vec<Vec<f64>> {
        self.coords.iter().map(|c| vec![c.x, c.y]).collect()
    }
}
