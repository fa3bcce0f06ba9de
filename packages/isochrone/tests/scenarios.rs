use serde_json::{Value, json};
use sitescout_isochrone::{IsochroneConfig, IsochroneError, resolve, resolve_feature};
use sitescout_isochrone_models::{CoordinateFormat, IsochroneQuery, SelectionTier};

const RICHMOND: IsochroneQuery = IsochroneQuery::new(37.5407, -77.4360, 30);

/// `n` points on an ellipse, as `(lng, lat)`.
#[allow(clippy::cast_precision_loss)]
fn ellipse(lng: f64, lat: f64, lng_radius: f64, lat_radius: f64, n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            (lng + lng_radius * angle.cos(), lat + lat_radius * angle.sin())
        })
        .collect()
}

fn as_objects(points: &[(f64, f64)]) -> Value {
    points
        .iter()
        .map(|&(lng, lat)| json!({"lat": lat, "lng": lng}))
        .collect()
}

fn as_arrays(points: &[(f64, f64)]) -> Value {
    points.iter().map(|&(a, b)| json!([a, b])).collect()
}

fn closed(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.push(points[0]);
    points
}

/// The main Richmond shape: 2101 points spanning
/// lat [37.21, 37.80], lng [-77.75, -77.07].
fn richmond_main_shape() -> Vec<(f64, f64)> {
    closed(ellipse(-77.41, 37.505, 0.34, 0.295, 2100))
}

#[test]
fn scenario_a_center_covered_beats_position_and_size_order() {
    let far = ellipse(-76.0, 39.0, 0.05, 0.05, 10);
    let main = richmond_main_shape();
    assert_eq!(main.len(), 2101);

    let payload = json!({"results": [{"search_id": "isochrone", "shapes": [
        {"shell": as_objects(&far), "holes": []},
        {"shell": as_objects(&main), "holes": []}
    ]}]});

    let resolution = resolve(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap();

    assert_eq!(resolution.selected.label, "shape[1].shell");
    assert!(resolution.reason.contains("center covered"));
    assert_eq!(resolution.tier, SelectionTier::CenterCovered);
    assert!(resolution.warnings.is_empty());
    assert_eq!(resolution.coordinate_format, CoordinateFormat::Object);

    let bounds = resolution.selected.bounds;
    assert!((bounds.min_lat - 37.21).abs() < 1e-6);
    assert!((bounds.max_lat - 37.80).abs() < 1e-6);
    assert!((bounds.min_lng - -77.75).abs() < 1e-6);
    assert!((bounds.max_lng - -77.07).abs() < 1e-6);

    // Already closed, so no extra point is added.
    assert_eq!(resolution.ring_positions().len(), 2101);
}

#[test]
fn scenario_b_pre_swapped_sequences_are_corrected() {
    // [lat, lng] pairs, which the extractor reads as [lng, lat].
    let pre_swapped: Vec<(f64, f64)> = ellipse(-77.41, 37.505, 0.34, 0.295, 64)
        .into_iter()
        .map(|(lng, lat)| (lat, lng))
        .collect();

    let payload = json!({"results": [{"shapes": [{"shell": as_arrays(&pre_swapped)}]}]});

    let resolution = resolve(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap();

    assert_eq!(resolution.coordinate_format, CoordinateFormat::ArraySwapped);
    assert!(resolution.coordinate_format.to_string().ends_with("_swapped"));
    assert_eq!(resolution.warnings.len(), 1);
    assert!(resolution.warnings[0].contains("swapped"));

    // The emitted ring is in [lng, lat] order around Richmond.
    let positions = resolution.ring_positions();
    assert_eq!(positions.first(), positions.last());
    for position in &positions {
        assert!(position[0] < -77.0 && position[0] > -78.0, "{position:?}");
        assert!(position[1] > 37.0 && position[1] < 38.0, "{position:?}");
    }

    // The selection reason still names the rule that originally matched.
    assert!(resolution.reason.starts_with("shape[0].shell ("));
}

#[test]
fn scenario_c_all_degenerate_is_no_candidates() {
    let payload = json!({"results": [{"shapes": [
        {"shell": [[-77.4, 37.5], [-77.3, 37.6]]},
        {"shell": [{"lat": 37.5, "lng": -77.4}, {"lat": "n/a", "lng": -77.3}, {"lat": 37.5, "lng": -77.4}]},
        {"shell": []}
    ]}]});

    let err = resolve(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        IsochroneError::NoCandidates { shells_examined: 3 }
    ));
    assert_eq!(err.kind(), Some("no_candidates"));
    assert!(resolve_feature(&payload, &RICHMOND, &IsochroneConfig::default()).is_err());
}

#[test]
fn scenario_d_no_containment_falls_back_to_longest_ring() {
    let payload = json!({"shapes": [
        {"shell": as_objects(&ellipse(-76.0, 39.0, 0.1, 0.1, 12))},
        {"shell": as_objects(&ellipse(-79.0, 36.0, 0.2, 0.2, 40))},
        {"shell": as_objects(&ellipse(-75.0, 38.0, 0.1, 0.1, 25))}
    ]});

    let resolution = resolve(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap();

    assert_eq!(resolution.selected.label, "shape[1].shell");
    assert!(resolution.reason.contains("fallback longest ring"));
    assert_eq!(resolution.warnings.len(), 1);
    assert!(
        resolution.warnings[0].contains("does not contain the requested center point"),
        "{}",
        resolution.warnings[0]
    );
    assert!(resolution.warnings[0].contains("km"));
}

#[test]
fn single_containing_candidate_wins_at_any_index() {
    let main = ellipse(-77.41, 37.505, 0.1, 0.1, 8);
    for index in 0..4 {
        let mut shapes: Vec<Value> = (0..4_u32)
            .map(|i| {
                let offset = f64::from(i);
                json!({"shell": as_objects(&ellipse(-70.0 - offset, 30.0, 0.5, 0.5, 500))})
            })
            .collect();
        shapes[index] = json!({"shell": as_objects(&main)});

        let payload = json!({"shapes": shapes});
        let resolution = resolve(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap();

        assert_eq!(resolution.selected.label, format!("shape[{index}].shell"));
        assert!(resolution.reason.ends_with("(center covered)"));
    }
}

#[test]
fn feature_output_contract() {
    let payload = json!({"results": [{"shapes": [
        {"shell": [
            {"Latitude": "37.3", "Longitude": "-77.6"},
            {"latitude": 37.3, "longitude": -77.2},
            {"LAT": 37.7, "LON": -77.2},
            {"y": 37.7, "x": -77.6},
            {"lat": null, "lng": -77.6}
        ]}
    ]}]});

    let feature = resolve_feature(&payload, &RICHMOND, &IsochroneConfig::default()).unwrap();

    assert_eq!(feature["type"], "Feature");
    assert_eq!(feature["geometry"]["type"], "Polygon");

    let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], json!([-77.6, 37.3]));
    assert_eq!(ring[0], ring[4]);

    let properties = &feature["properties"];
    assert_eq!(properties["minutes"], 30);
    assert_eq!(properties["center"], json!([-77.4360, 37.5407]));
    assert_eq!(
        properties["selection_reason"],
        "shape[0].shell (center covered)"
    );
    assert_eq!(properties["coordinate_format"], "object");
    assert_eq!(properties["invalid_coordinates"], 1);
    assert_eq!(
        properties["warnings"],
        json!(["1 invalid coordinates removed from provider response (shape[0].shell)"])
    );
}

#[test]
fn resolution_is_deterministic() {
    let payload = json!({"shapes": [
        {"shell": as_arrays(&ellipse(-76.0, 39.0, 0.1, 0.1, 30))},
        {"shell": as_arrays(&ellipse(-79.0, 36.0, 0.1, 0.1, 30))}
    ]});
    let config = IsochroneConfig::default();
    let first = resolve_feature(&payload, &RICHMOND, &config).unwrap();
    for _ in 0..3 {
        assert_eq!(resolve_feature(&payload, &RICHMOND, &config).unwrap(), first);
    }
}
