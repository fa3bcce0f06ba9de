//! Builds one closed ring and bounding box per provider shell.

use geo::Coord;
use serde_json::Value;
use sitescout_isochrone_models::{BoundingBox, CoordinateFormat, QueryCenter, SelectionTier};

use crate::config::IsochroneConfig;
use crate::coordinate::extract_coordinate;
use crate::diagnostics::Diagnostics;
use crate::response::{RawShell, shells_of};
use crate::ring::Ring;

/// Minimum number of distinct vertices for a usable ring.
pub const MIN_RING_POINTS: usize = 3;

/// One usable shell from the provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCandidate {
    /// Provenance label, e.g. `"shape[3].shell"`.
    pub label: String,
    /// Closed ring of valid coordinates.
    pub ring: Ring,
    /// Bounding box of [`Self::ring`].
    pub bounds: BoundingBox,
    /// Encoding of the shell's first valid record.
    pub format: CoordinateFormat,
    /// Raw holes carried by the shell. Never used for selection.
    pub holes: Vec<Value>,
}

impl ShapeCandidate {
    /// Builds a candidate from a ring, closing it and computing bounds.
    ///
    /// Returns `None` if the ring has fewer than [`MIN_RING_POINTS`]
    /// distinct vertices.
    #[must_use]
    pub fn new(label: impl Into<String>, ring: Ring, format: CoordinateFormat) -> Option<Self> {
        if ring.distinct_len() < MIN_RING_POINTS {
            return None;
        }
        let ring = ring.closed();
        let bounds = ring.bounds()?;
        Some(Self {
            label: label.into(),
            ring,
            bounds,
            format,
            holes: Vec::new(),
        })
    }

    /// The best tier this candidate satisfies on its own for `center`.
    #[must_use]
    pub fn coverage(&self, center: QueryCenter) -> SelectionTier {
        if self.ring.contains_center(center) {
            SelectionTier::CenterCovered
        } else if self.bounds.contains_center(center) {
            SelectionTier::BboxOverlap
        } else {
            SelectionTier::FallbackLongestRing
        }
    }

    /// Attaches pass-through holes.
    #[must_use]
    pub fn with_holes(mut self, holes: Vec<Value>) -> Self {
        self.holes = holes;
        self
    }
}

/// Candidates built from a response, plus how many shells were examined.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Usable candidates in original provider order.
    pub candidates: Vec<ShapeCandidate>,
    /// Every shell located in the response, usable or not.
    pub shells_examined: usize,
}

/// Builds candidates from every shell of every shape, preserving order.
///
/// Invalid records are skipped and counted; shells left with fewer than
/// three distinct points are dropped with a warning.
#[must_use]
pub fn build_candidates(
    shapes: &[&Value],
    config: &IsochroneConfig,
    diagnostics: &mut Diagnostics,
) -> CandidateSet {
    let mut set = CandidateSet::default();

    for (index, shape) in shapes.iter().enumerate() {
        for shell in shells_of(index, shape) {
            set.shells_examined += 1;
            if let Some(candidate) = build_candidate(shell, config, diagnostics) {
                log::debug!(
                    "[Isochrone] Candidate {} has {} points, bounds {:?}",
                    candidate.label,
                    candidate.ring.len(),
                    candidate.bounds
                );
                set.candidates.push(candidate);
            }
        }
    }

    log::info!(
        "[Isochrone] {} of {} shell(s) usable",
        set.candidates.len(),
        set.shells_examined
    );

    set
}

fn build_candidate(
    shell: RawShell<'_>,
    config: &IsochroneConfig,
    diagnostics: &mut Diagnostics,
) -> Option<ShapeCandidate> {
    let RawShell {
        label,
        coords,
        holes,
    } = shell;

    let Some(records) = coords.as_array() else {
        diagnostics.warn(format!("shell is not an array: {label}"));
        return None;
    };

    let mut points = Vec::with_capacity(records.len());
    let mut format = None;
    let mut invalid = 0_usize;

    for (idx, record) in records.iter().enumerate() {
        match extract_coordinate(record) {
            Ok(c) => {
                format.get_or_insert(c.format);
                points.push(Coord { x: c.lng, y: c.lat });
            }
            Err(e) => {
                invalid += 1;
                if invalid <= config.max_logged_invalid {
                    log::warn!("[Isochrone] Invalid coordinate ({label}) at index {idx}: {e}");
                }
            }
        }
    }

    if invalid > 0 {
        diagnostics.record_invalid(invalid);
        diagnostics.warn(format!(
            "{invalid} invalid coordinates removed from provider response ({label})"
        ));
    }

    let candidate =
        format.and_then(|format| ShapeCandidate::new(&label, Ring::new(points), format));
    if candidate.is_none() {
        diagnostics.warn(format!("degenerate shell skipped: {label}"));
    }

    candidate.map(|c| c.with_holes(holes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(payload_shapes: &Value) -> (CandidateSet, Diagnostics) {
        let shapes: Vec<&Value> = payload_shapes.as_array().unwrap().iter().collect();
        let mut diagnostics = Diagnostics::default();
        let set = build_candidates(&shapes, &IsochroneConfig::default(), &mut diagnostics);
        (set, diagnostics)
    }

    #[test]
    fn builds_closed_rings_in_order() {
        let (set, diagnostics) = build(&json!([
            {"shell": [{"lat": 1, "lng": 1}, {"lat": 1, "lng": 2}, {"lat": 2, "lng": 2}]},
            {"shell": [[10, 10], [11, 10], [11, 11], [10, 10]]}
        ]));

        assert_eq!(set.shells_examined, 2);
        assert_eq!(set.candidates.len(), 2);
        assert_eq!(set.candidates[0].label, "shape[0].shell");
        assert_eq!(set.candidates[0].format, CoordinateFormat::Object);
        assert_eq!(set.candidates[1].label, "shape[1].shell");
        assert_eq!(set.candidates[1].format, CoordinateFormat::Array);
        assert!(set.candidates.iter().all(|c| c.ring.is_closed()));
        // Already-closed input is not closed twice.
        assert_eq!(set.candidates[1].ring.len(), 4);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn bounds_follow_ring() {
        let (set, _) = build(&json!([
            {"shell": [[-77.75, 37.21], [-77.07, 37.21], [-77.07, 37.80]]}
        ]));
        let bounds = set.candidates[0].bounds;
        assert!((bounds.min_lng - -77.75).abs() < f64::EPSILON);
        assert!((bounds.max_lat - 37.80).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_records_are_counted_and_warned() {
        let (set, diagnostics) = build(&json!([{"shell": [
            [0, 0], [1, 0], "junk", [1, 1], {"lat": "x", "lng": 1}, [500, 0]
        ]}]));

        assert_eq!(set.candidates.len(), 1);
        assert_eq!(set.candidates[0].ring.len(), 4);
        assert_eq!(diagnostics.invalid_coordinates(), 3);
        assert_eq!(
            diagnostics.warnings(),
            ["3 invalid coordinates removed from provider response (shape[0].shell)"]
        );
    }

    #[test]
    fn degenerate_shells_are_skipped_with_warning() {
        let (set, diagnostics) = build(&json!([
            {"shell": [[0, 0], [1, 1]]},
            {"shell": [[0, 0], [1, 1], [0, 0]]},
            {"shell": [[0, 0], [1, 0], [1, 1]]}
        ]));

        assert_eq!(set.shells_examined, 3);
        assert_eq!(set.candidates.len(), 1);
        assert_eq!(set.candidates[0].label, "shape[2].shell");
        assert_eq!(
            diagnostics.warnings(),
            [
                "degenerate shell skipped: shape[0].shell",
                "degenerate shell skipped: shape[1].shell"
            ]
        );
    }

    #[test]
    fn negative_zero_does_not_make_a_third_vertex() {
        let (set, diagnostics) = build(&json!([{"shell": [[0, 0], [1, 1], [-0.0, 0]]}]));
        assert!(set.candidates.is_empty());
        assert_eq!(
            diagnostics.warnings(),
            ["degenerate shell skipped: shape[0].shell"]
        );
    }

    #[test]
    fn non_array_shell_is_warned() {
        let (set, diagnostics) = build(&json!([{"shell": "oops"}]));
        assert!(set.candidates.is_empty());
        assert_eq!(set.shells_examined, 1);
        assert_eq!(diagnostics.warnings(), ["shell is not an array: shape[0].shell"]);
    }

    #[test]
    fn format_comes_from_first_valid_record() {
        let (set, _) = build(&json!([{"shell": [
            "junk", [0, 0], {"lat": 0, "lng": 1}, [1, 1]
        ]}]));
        assert_eq!(set.candidates[0].format, CoordinateFormat::Array);
    }

    #[test]
    fn holes_pass_through() {
        let (set, _) = build(&json!([{
            "shell": [[0, 0], [4, 0], [4, 4]],
            "holes": [[[1, 1], [2, 1], [2, 2]]]
        }]));
        assert_eq!(set.candidates[0].holes, vec![json!([[1, 1], [2, 1], [2, 2]])]);
    }
}
