//! Locates shapes and their shells inside a raw provider payload.
//!
//! The travel-time provider wraps shapes as `results[0].shapes[*]`, but
//! individual responses have been seen with shells under `shell`,
//! `shells`, `coordinates`, or a `GeoJSON` `geometry`, and occasionally
//! with the shell directly on the result object.

use serde_json::Value;

use crate::IsochroneError;

/// Keys whose presence marks an object as a shape.
const SHAPE_KEYS: &[&str] = &["shell", "shells", "coordinates", "geometry"];

/// A shell located in the payload, before coordinate extraction.
#[derive(Debug, Clone)]
pub struct RawShell<'a> {
    /// Provenance label, e.g. `"shape[1].shell"`.
    pub label: String,
    /// The shell's coordinate records.
    pub coords: &'a Value,
    /// Holes carried alongside this shell, passed through untouched.
    pub holes: Vec<Value>,
}

/// Returns the provider's shapes in their original order.
///
/// # Errors
///
/// * [`IsochroneError::NoResults`] if `results` is present but empty.
/// * [`IsochroneError::NoShapes`] if no shape can be found.
pub fn locate_shapes(payload: &Value) -> Result<Vec<&Value>, IsochroneError> {
    let result = match payload.get("results") {
        Some(results) => results
            .as_array()
            .and_then(|results| {
                log::info!("[Isochrone] Provider returned {} result(s)", results.len());
                results.first()
            })
            .ok_or(IsochroneError::NoResults)?,
        None => payload,
    };

    if let Some(shapes) = result
        .get("shapes")
        .and_then(Value::as_array)
        .filter(|shapes| !shapes.is_empty())
    {
        log::info!("[Isochrone] Found {} shape(s) in result", shapes.len());
        return Ok(shapes.iter().collect());
    }

    if SHAPE_KEYS.iter().any(|key| result.get(key).is_some()) {
        log::info!("[Isochrone] Found shell data directly on result, treating it as one shape");
        return Ok(vec![result]);
    }

    log::error!(
        "[Isochrone] No shapes found; result keys: {:?}",
        result
            .as_object()
            .map(|o| o.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default()
    );
    Err(IsochroneError::NoShapes)
}

/// Returns every shell of one shape, in the order they appear.
///
/// `shell` and `shells` are both read when present. `coordinates` is only
/// consulted when neither exists, and a `GeoJSON` `geometry` only when none
/// of the others does.
#[must_use]
pub fn shells_of(index: usize, shape: &Value) -> Vec<RawShell<'_>> {
    let mut shells = Vec::new();

    if let Some(shell) = shape.get("shell") {
        shells.push(RawShell {
            label: format!("shape[{index}].shell"),
            coords: shell,
            holes: shape
                .get("holes")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        });
    }

    if let Some(list) = shape.get("shells").and_then(Value::as_array) {
        for (j, shell) in list.iter().enumerate() {
            shells.push(RawShell {
                label: format!("shape[{index}].shells[{j}]"),
                coords: shell,
                holes: Vec::new(),
            });
        }
    }

    if !shells.is_empty() {
        return shells;
    }

    if let Some(coords) = shape.get("coordinates") {
        shells.push(RawShell {
            label: format!("shape[{index}].coordinates"),
            coords,
            holes: Vec::new(),
        });
        return shells;
    }

    if let Some(rings) = shape
        .get("geometry")
        .filter(|g| g.get("type").and_then(Value::as_str) == Some("Polygon"))
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
    {
        if let Some((outer, holes)) = rings.split_first() {
            shells.push(RawShell {
                label: format!("shape[{index}].geometry.coordinates[0]"),
                coords: outer,
                holes: holes.to_vec(),
            });
        }
    }

    shells
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_results_shapes() {
        let payload = json!({"results": [{"search_id": "iso", "shapes": [
            {"shell": []}, {"shell": []}
        ]}]});
        assert_eq!(locate_shapes(&payload).unwrap().len(), 2);
    }

    #[test]
    fn uses_only_first_result() {
        let payload = json!({"results": [
            {"shapes": [{"shell": []}]},
            {"shapes": [{"shell": []}, {"shell": []}, {"shell": []}]}
        ]});
        assert_eq!(locate_shapes(&payload).unwrap().len(), 1);
    }

    #[test]
    fn empty_results_is_error() {
        let payload = json!({"results": []});
        assert!(matches!(
            locate_shapes(&payload).unwrap_err(),
            IsochroneError::NoResults
        ));
    }

    #[test]
    fn top_level_shapes_without_results() {
        let payload = json!({"shapes": [{"shell": []}]});
        assert_eq!(locate_shapes(&payload).unwrap().len(), 1);
    }

    #[test]
    fn result_itself_can_be_the_shape() {
        let payload = json!({"results": [{"shell": [[0, 0], [1, 0], [1, 1]]}]});
        let shapes = locate_shapes(&payload).unwrap();
        assert_eq!(shapes.len(), 1);
        assert!(shapes[0].get("shell").is_some());
    }

    #[test]
    fn missing_shapes_is_error() {
        let payload = json!({"results": [{"search_id": "iso", "shapes": []}]});
        assert!(matches!(
            locate_shapes(&payload).unwrap_err(),
            IsochroneError::NoShapes
        ));
    }

    #[test]
    fn shell_and_shells_are_both_read() {
        let shape = json!({
            "shell": [[0, 0]],
            "shells": [[[1, 1]], [[2, 2]]],
            "coordinates": [[3, 3]],
            "holes": [[[0.1, 0.1]]]
        });
        let shells = shells_of(4, &shape);
        let labels: Vec<&str> = shells.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            ["shape[4].shell", "shape[4].shells[0]", "shape[4].shells[1]"]
        );
        assert_eq!(shells[0].holes.len(), 1);
        assert!(shells[1].holes.is_empty());
    }

    #[test]
    fn coordinates_used_when_no_shell() {
        let shape = json!({"coordinates": [[3, 3]]});
        let shells = shells_of(0, &shape);
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].label, "shape[0].coordinates");
    }

    #[test]
    fn geojson_polygon_geometry_fallback() {
        let shape = json!({"geometry": {"type": "Polygon", "coordinates": [
            [[0, 0], [4, 0], [4, 4], [0, 0]],
            [[1, 1], [2, 1], [2, 2], [1, 1]]
        ]}});
        let shells = shells_of(2, &shape);
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].label, "shape[2].geometry.coordinates[0]");
        assert_eq!(shells[0].holes.len(), 1);
    }

    #[test]
    fn non_polygon_geometry_is_ignored() {
        let shape = json!({"geometry": {"type": "Point", "coordinates": [0, 0]}});
        assert!(shells_of(0, &shape).is_empty());
    }
}
