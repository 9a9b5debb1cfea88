use std::fs;

use trialviz::compiler::{forest_matrix, resolve_scene, shap_scatter, stratification_chart};
use trialviz::data::{read_rows, RiskResponseRow, ShapRow, StratificationRow};
use trialviz::geometry::{CoordMapper, LinearMapper};
use trialviz::ir::{CustomItems, Primitive, Series};
use trialviz::rank::RiskScale;
use trialviz::EngineOptions;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("test/{}", name)).expect("Failed to read fixture")
}

#[test]
fn test_stratification_error_bars_match_intervals() {
    let rows: Vec<StratificationRow> = read_rows(&fixture("stratification.json")).unwrap();
    let scene = stratification_chart(&rows, Some("age"), None, &EngineOptions::default());

    let bars: Vec<_> = scene.panels[0]
        .series
        .iter()
        .filter_map(|s| match s {
            Series::Custom(c) => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 2);

    let CustomItems::ErrorBars(points) = &bars[0].items else {
        panic!("expected error bars");
    };
    // Low Risk is group2; its month 12 interval is 0.22..0.38
    assert_eq!(points.len(), 3);
    assert_eq!(points[2].x, 12.0);
    assert!((points[2].error - 0.08).abs() < 1e-9);
}

#[test]
fn test_progression_labels() {
    let rows: Vec<StratificationRow> = read_rows(&fixture("stratification.json")).unwrap();
    let options = EngineOptions {
        label_scale: RiskScale::Progression,
        ..EngineOptions::default()
    };
    let scene = stratification_chart(&rows, Some("age"), None, &options);
    let names: Vec<&str> = scene.legend.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Slow", "Rapid"]);
}

#[test]
fn test_whisker_pixels_through_panel_mapper() {
    let rows: Vec<StratificationRow> = read_rows(&fixture("stratification.json")).unwrap();
    let scene = stratification_chart(&rows, Some("age"), None, &EngineOptions::default());
    let panel = &scene.panels[0];
    let mapper = LinearMapper::for_panel(panel, scene.width, scene.height);

    let Some(Series::Custom(ci)) = panel.series.iter().find(|s| matches!(s, Series::Custom(_))) else {
        panic!("expected error bars");
    };
    let Some(Primitive::Group { children }) = ci.render_item(0, &mapper) else {
        panic!("expected whisker group");
    };
    let Primitive::Line { from, to, .. } = &children[1] else {
        panic!("expected cap");
    };
    assert_eq!(to.0 - from.0, 10.0);

    // higher values sit higher on screen
    let low = mapper.to_pixel((0.0, 0.1));
    let high = mapper.to_pixel((0.0, 0.5));
    assert!(high.1 < low.1);
}

#[test]
fn test_forest_dot_override_from_options() {
    let rows: Vec<RiskResponseRow> = read_rows(&fixture("risk.csv")).unwrap();
    let options = EngineOptions {
        forest_dot_color: Some("#000000".into()),
        ..EngineOptions::default()
    };
    let scene = forest_matrix(&rows, Some("pfs"), &options);
    assert_eq!(scene.panels.len(), 1);

    let resolved = resolve_scene(&scene);
    let Primitive::Group { children } = &resolved[0] else {
        panic!("expected panel group");
    };
    let Primitive::Group { children: shapes } = &children[0] else {
        panic!("expected forest group");
    };
    assert!(matches!(&shapes[3], Primitive::Circle { fill, .. } if fill == "#000000"));
    assert!(matches!(&shapes[0], Primitive::Line { color, .. } if color != "#000000"));
}

#[test]
fn test_single_value_metric_sits_at_midpoint() {
    let rows: Vec<RiskResponseRow> = read_rows(
        r#"[{"type": "days", "outcome": "os", "group": "A", "mean": 5, "ci_low": 5, "ci_high": 5}]"#,
    )
    .unwrap();
    let scene = forest_matrix(&rows, None, &EngineOptions::default());
    let Series::Custom(forest) = &scene.panels[0].series[0] else {
        panic!("expected forest series");
    };
    let CustomItems::ForestIntervals(items) = &forest.items else {
        panic!("expected intervals");
    };
    assert_eq!(items[0].interval.mean, 50.0);
}

#[test]
fn test_empty_inputs_give_empty_scenes() {
    let options = EngineOptions::default();
    assert!(stratification_chart(&[], None, None, &options).is_empty());
    assert!(forest_matrix(&[], None, &options).is_empty());
    let shap: Vec<ShapRow> = Vec::new();
    let scene = shap_scatter(&shap, &options);
    assert!(scene.is_empty());
    assert!(scene.panels[0].y_axis.categories.is_empty());
}

#[test]
fn test_scene_serializes_overlays_as_silent() {
    let rows: Vec<ShapRow> = read_rows(&fixture("shap.json")).unwrap();
    let scene = shap_scatter(&rows, &EngineOptions::default());
    let json = serde_json::to_value(&scene).unwrap();
    let series = json["panels"][0]["series"].as_array().unwrap();
    let baseline = series.iter().find(|s| s["type"] == "overlay").unwrap();
    assert_eq!(baseline["kind"], "baseline");
    assert_eq!(baseline["silent"], true);
    assert_eq!(baseline["tooltip"], false);
    assert!(json["legend"]
        .as_array()
        .unwrap()
        .iter()
        .all(|l| l["name"] != "zero"));
}
