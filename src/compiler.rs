// Scene assembly: one builder per chart type

use anyhow::Result;

use crate::data::{
    features_from_rank_rows, rank_rows_from_shap, RiskResponseRow, SampleSets, ScatterRow, ShapRow,
    StratificationRow,
};
use crate::density::{estimate_shared, segment_density};
use crate::geometry::{
    jittered_scatter, resolve_panel, select_top_features, CoordMapper, ErrorBarPoint, FeatureValues,
    ForestInterval, LinearMapper,
};
use crate::histogram::{align_groups_with_floors, threshold_position, HistogramSpec};
use crate::ir::{
    AxisSpec, CustomItems, CustomSeries, ForestItem, LegendEntry, Overlay, OverlayKind, PanelScene,
    Primitive, SceneGraph, ScatterPoint, Series,
};
use crate::normalize::MetricDomains;
use crate::palette::ColorPalette;
use crate::rank::{merge_by_rank, order_groups, rank_by_latest_value};
use crate::regression::{regression_line, Regression};
use crate::scale::{domain_from_values, AxisDomain, MinMax};
use crate::EngineOptions;

/// Forest x axis: percent display positions
const FOREST_AXIS: AxisDomain = AxisDomain {
    min: 0.0,
    max: 100.0,
    interval: 20.0,
};

const FOREST_LINE_COLOR: &str = "#333333";
const REGRESSION_COLOR: &str = "#d62728";
const DENSITY_STACK: &str = "density";

// =============================================================================
// Helpers
// =============================================================================

fn panel(x_axis: AxisSpec, y_axis: AxisSpec, series: Vec<Series>) -> PanelScene {
    PanelScene {
        row: 0,
        col: 0,
        title: None,
        x_axis,
        y_axis,
        series,
    }
}

fn scene(options: &EngineOptions, panels: Vec<PanelScene>, legend: Vec<LegendEntry>) -> SceneGraph {
    SceneGraph {
        width: options.width,
        height: options.height,
        panels,
        legend,
    }
}

fn legend_entry(name: &str, color: &str) -> LegendEntry {
    LegendEntry {
        name: name.to_string(),
        color: color.to_string(),
    }
}

/// `[0, nice max]`, or the default domain when nothing positive was observed
fn positive_axis(max: f64) -> AxisDomain {
    if max.is_finite() && max > 0.0 {
        AxisDomain::from_max(max, 0.0)
    } else {
        AxisDomain::default()
    }
}

/// The requested key, or the first key in numeric-aware order
fn select_key<'a, I>(keys: I, wanted: Option<&str>) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    match wanted {
        Some(key) => Some(key.to_string()),
        None => order_groups(keys).into_iter().next(),
    }
}

fn merged_features(rows: &[ShapRow]) -> Vec<FeatureValues> {
    features_from_rank_rows(&merge_by_rank(&rank_rows_from_shap(rows)))
}

// =============================================================================
// Density charts
// =============================================================================

/// One filled density curve per sample set, all on a shared grid.
///
/// With `stacked`, each curve sits on top of the previous ones.
pub fn density_chart(sets: &SampleSets, stacked: bool, options: &EngineOptions) -> SceneGraph {
    let names = order_groups(sets.sets.keys().map(String::as_str));
    let samples: Vec<&[f64]> = names
        .iter()
        .map(|n| sets.sets.get(n).map(Vec::as_slice).unwrap_or(&[]))
        .collect();
    let curves = estimate_shared(&samples, options.grid_intervals);
    let palette = ColorPalette::category10();

    let mut series = Vec::new();
    let mut legend = Vec::new();
    let mut stack_heights: Vec<f64> = Vec::new();
    let mut y_max = 0.0f64;
    let mut x_extent: Option<MinMax> = None;

    for (i, (name, curve)) in names.iter().zip(curves).enumerate() {
        let Some(curve) = curve else {
            tracing::warn!(set = %name, "no finite samples, skipping set");
            continue;
        };

        if stacked {
            if stack_heights.is_empty() {
                stack_heights = vec![0.0; curve.density.len()];
            }
            for (h, d) in stack_heights.iter_mut().zip(&curve.density) {
                *h += d;
            }
            y_max = stack_heights.iter().copied().fold(y_max, f64::max);
        } else {
            y_max = y_max.max(curve.max_density());
        }
        if let Some(extent) = MinMax::from_values(curve.x.iter().copied()) {
            x_extent = Some(x_extent.map_or(extent, |e| e.merge(extent)));
        }

        let color = palette.color(i);
        legend.push(legend_entry(name, &color));
        series.push(Series::Area {
            name: name.clone(),
            color,
            points: curve.points(),
            stack: stacked.then(|| DENSITY_STACK.to_string()),
        });
    }

    let x_domain = x_extent
        .map(|e| AxisDomain::from_range(e.min, e.max))
        .unwrap_or_default();
    let x_axis = AxisSpec::value(x_domain);
    let y_axis = AxisSpec::value(positive_axis(y_max)).named("density");

    scene(options, vec![panel(x_axis, y_axis, series)], legend)
}

fn region_label(lower: f64, upper: f64) -> String {
    match (lower.is_finite(), upper.is_finite()) {
        (false, false) => String::from("All"),
        (false, true) => format!("Below {upper}"),
        (true, false) => format!("Above {lower}"),
        (true, true) => format!("{lower} to {upper}"),
    }
}

/// One pooled density curve colored by region between threshold boundaries.
///
/// Fails only for more than two boundaries.
pub fn segmented_density_chart(samples: &[f64], boundaries: &[f64], options: &EngineOptions) -> Result<SceneGraph> {
    let segments = segment_density(samples, boundaries, options.grid_intervals)?;
    let palette = ColorPalette::regions();

    let y_max = segments
        .iter()
        .map(|s| s.curve.max_density())
        .fold(0.0, f64::max);
    let x_domain = segments
        .first()
        .and_then(|s| MinMax::from_values(s.curve.x.iter().copied()))
        .map(|e| AxisDomain::from_range(e.min, e.max))
        .unwrap_or_default();
    let x_axis = AxisSpec::value(x_domain);
    let y_axis = AxisSpec::value(positive_axis(y_max)).named("density");

    let mut series = Vec::new();
    let mut legend = Vec::new();
    for segment in &segments {
        // Two regions take the low and high colors
        let color_index = if segments.len() == 2 && segment.region == 1 { 2 } else { segment.region };
        let color = palette.color(color_index);
        let name = region_label(segment.lower, segment.upper);
        legend.push(legend_entry(&name, &color));
        series.push(Series::Area {
            name,
            color,
            points: segment.curve.points(),
            stack: None,
        });
    }
    for segment in segments.iter().skip(1) {
        series.push(Series::Overlay(Overlay::vertical(
            OverlayKind::Threshold,
            format!("threshold {}", segment.lower),
            segment.lower,
            &y_axis,
        )));
    }

    Ok(scene(options, vec![panel(x_axis, y_axis, series)], legend))
}

// =============================================================================
// Grouped histogram
// =============================================================================

/// Grouped bars per bucket, with an optional threshold line placed between
/// the bars at its position within its bucket.
pub fn histogram_chart(
    spec: &HistogramSpec,
    normalize: bool,
    threshold: Option<f64>,
    options: &EngineOptions,
) -> SceneGraph {
    let aligned = align_groups_with_floors(spec, normalize, options.count_axis_floor, options.proportion_axis_floor);
    let palette = ColorPalette::category10();

    let x_axis = AxisSpec::category(aligned.labels.clone());
    let y_axis = AxisSpec::value(aligned.y_axis).named(if normalize { "proportion" } else { "count" });

    let mut legend = Vec::new();
    let mut series: Vec<Series> = aligned
        .series
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let color = palette.color(i);
            legend.push(legend_entry(&group.name, &color));
            Series::Bar {
                name: group.name,
                color,
                values: group.values,
                stack: None,
            }
        })
        .collect();

    if let Some(value) = threshold {
        match threshold_position(&spec.edges, value) {
            Some(x) => series.push(Series::Overlay(Overlay::vertical(
                OverlayKind::Threshold,
                format!("threshold {value}"),
                x,
                &y_axis,
            ))),
            None => tracing::warn!(value, "threshold outside bin edges, omitting line"),
        }
    }

    scene(options, vec![panel(x_axis, y_axis, series)], legend)
}

// =============================================================================
// Stratified outcome over time
// =============================================================================

/// One line plus error bars per group for a single feature.
///
/// Groups are named by their risk rank at the latest month rather than by
/// their label. `feature` defaults to the first feature present and
/// `guide_month` draws a vertical guide.
pub fn stratification_chart(
    rows: &[StratificationRow],
    feature: Option<&str>,
    guide_month: Option<f64>,
    options: &EngineOptions,
) -> SceneGraph {
    let feature = select_key(rows.iter().map(|r| r.feature.as_str()), feature);
    let selected: Vec<&StratificationRow> = rows
        .iter()
        .filter(|r| Some(r.feature.as_str()) == feature.as_deref())
        .collect();
    if selected.is_empty() {
        tracing::warn!(feature = ?feature, "no stratification rows for feature");
    }

    let ranking = rank_by_latest_value(selected.iter().map(|r| (r.group.as_str(), r.month, r.mean)));
    let mut groups: Vec<String> = ranking.groups().to_vec();
    for group in order_groups(selected.iter().map(|r| r.group.as_str())) {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }

    let x_axis = AxisSpec::value(domain_from_values(
        selected.iter().map(|r| r.month),
        AxisDomain::default(),
    ))
    .named("month");
    let y_axis = AxisSpec::value(domain_from_values(
        selected.iter().flat_map(|r| [r.mean, r.ci_low, r.ci_high]),
        AxisDomain::default(),
    ));

    let palette = ColorPalette::category10();
    let mut series = Vec::new();
    let mut legend = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let mut points: Vec<&StratificationRow> = selected
            .iter()
            .copied()
            .filter(|r| &r.group == group && r.month.is_finite() && r.mean.is_finite())
            .collect();
        if points.is_empty() {
            tracing::warn!(group = %group, "group has no finite observations, skipping");
            continue;
        }
        points.sort_by(|a, b| a.month.total_cmp(&b.month));

        let label = ranking.label(group, options.label_scale);
        let color = palette.color(i);
        legend.push(legend_entry(&label, &color));
        series.push(Series::Line {
            name: label.clone(),
            color: color.clone(),
            points: points.iter().map(|r| (r.month, r.mean)).collect(),
        });
        series.push(Series::Custom(CustomSeries {
            name: format!("{label} CI"),
            color,
            items: CustomItems::ErrorBars(
                points
                    .iter()
                    .map(|r| ErrorBarPoint {
                        x: r.month,
                        y: r.mean,
                        error: r.error(),
                    })
                    .collect(),
            ),
        }));
    }

    if let Some(month) = guide_month.filter(|m| m.is_finite()) {
        series.push(Series::Overlay(Overlay::vertical(
            OverlayKind::Guide,
            format!("month {month}"),
            month,
            &y_axis,
        )));
    }

    let cutoff = selected.iter().map(|r| r.cutoff).find(|c| c.is_finite());
    let title = feature.map(|f| match cutoff {
        Some(c) => format!("{f} (cutoff {c})"),
        None => f,
    });

    let mut chart = panel(x_axis, y_axis, series);
    chart.title = title;
    scene(options, vec![chart], legend)
}

// =============================================================================
// Scatter with regression
// =============================================================================

/// Points plus the fitted line over the observed x range.
///
/// A supplied fit with a non-finite slope or intercept draws no line. With
/// `fit_missing`, rows without a fit get a least-squares one.
pub fn scatter_chart(row: &ScatterRow, fit_missing: bool, options: &EngineOptions) -> SceneGraph {
    let points: Vec<(f64, f64)> = row
        .xy()
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let x_extent = MinMax::from_values(points.iter().map(|p| p.0));

    let fit = match row.regression {
        Some(fit) => Some(fit),
        None if fit_missing => Regression::fit(&points),
        None => None,
    };
    let line = fit.and_then(|f| {
        let extent = x_extent?;
        regression_line(f.slope, f.intercept, extent.min, extent.max)
    });

    let x_axis = AxisSpec::value(domain_from_values(points.iter().map(|p| p.0), AxisDomain::default()));
    let line_ys = line.iter().flat_map(|l| [l[0].1, l[1].1]);
    let y_axis = AxisSpec::value(domain_from_values(
        points.iter().map(|p| p.1).chain(line_ys),
        AxisDomain::default(),
    ));

    let name = row.feature.clone().unwrap_or_else(|| String::from("points"));
    let color = ColorPalette::category10().color(0);
    let mut series = Vec::new();
    let mut legend = Vec::new();
    if !points.is_empty() {
        legend.push(legend_entry(&name, &color));
        series.push(Series::Scatter {
            name,
            points: points
                .iter()
                .map(|&(x, y)| ScatterPoint {
                    x,
                    y,
                    color: color.clone(),
                })
                .collect(),
        });
    }
    if let Some([from, to]) = line {
        series.push(Series::Overlay(
            Overlay::new(OverlayKind::Regression, "regression", from, to).with_color(REGRESSION_COLOR),
        ));
    }

    scene(options, vec![panel(x_axis, y_axis, series)], legend)
}

// =============================================================================
// Forest matrix
// =============================================================================

/// One forest panel per metric for a single outcome.
///
/// Every metric is placed on the shared percent axis using its own value
/// domain, so metrics with different units line up side by side.
pub fn forest_matrix(rows: &[RiskResponseRow], outcome: Option<&str>, options: &EngineOptions) -> SceneGraph {
    let outcome = select_key(rows.iter().map(|r| r.outcome.as_str()), outcome);
    let selected: Vec<&RiskResponseRow> = rows
        .iter()
        .filter(|r| Some(r.outcome.as_str()) == outcome.as_deref())
        .collect();

    let domains = MetricDomains::from_observations(
        selected
            .iter()
            .flat_map(|r| [(r.metric.as_str(), r.mean), (r.metric.as_str(), r.ci_low), (r.metric.as_str(), r.ci_high)]),
    );
    let metrics = order_groups(selected.iter().map(|r| r.metric.as_str()));
    let groups = order_groups(selected.iter().map(|r| r.group.as_str()));

    let colors = ColorPalette::category10().assign_colors(&groups);
    let group_color = |g: &str| colors.get(g).cloned().unwrap_or_else(|| FOREST_LINE_COLOR.to_string());
    let legend: Vec<LegendEntry> = groups.iter().map(|g| legend_entry(g, &group_color(g.as_str()))).collect();

    let panels = metrics
        .iter()
        .enumerate()
        .map(|(col, metric)| {
            let position = |v: f64| if v.is_finite() { domains.position(metric, v) } else { f64::NAN };
            let items: Vec<ForestItem> = selected
                .iter()
                .filter(|r| &r.metric == metric)
                .filter_map(|r| {
                    if !r.mean.is_finite() {
                        tracing::warn!(metric = %metric, group = %r.group, "interval without a mean, skipping");
                        return None;
                    }
                    let row = groups.iter().position(|g| g == &r.group)?;
                    Some(ForestItem {
                        row: row as f64,
                        interval: ForestInterval {
                            low: position(r.ci_low),
                            mean: position(r.mean),
                            high: position(r.ci_high),
                            color: group_color(r.group.as_str()),
                        },
                        dot_color: options.forest_dot_color.clone(),
                    })
                })
                .collect();

            PanelScene {
                row: 0,
                col,
                title: Some(metric.clone()),
                x_axis: AxisSpec::value(FOREST_AXIS).named(metric.as_str()),
                y_axis: AxisSpec::category(groups.clone()).inverted(),
                series: vec![Series::Custom(CustomSeries {
                    name: metric.clone(),
                    color: FOREST_LINE_COLOR.to_string(),
                    items: CustomItems::ForestIntervals(items),
                })],
            }
        })
        .collect();

    scene(options, panels, legend)
}

// =============================================================================
// Feature attribution charts
// =============================================================================

/// Jittered per-sample attribution points for the most important features,
/// colored by feature value, with a zero baseline.
pub fn shap_scatter(rows: &[ShapRow], options: &EngineOptions) -> SceneGraph {
    let features = merged_features(rows);
    let layout = jittered_scatter(
        &features,
        options.top_features,
        options.jitter,
        &options.gradient_light,
        &options.gradient_dark,
    );

    let x_axis = AxisSpec::value(domain_from_values(
        layout.points.iter().map(|p| p.x).chain([0.0]),
        AxisDomain::default(),
    ))
    .named("SHAP value");
    let y_axis = AxisSpec::category(layout.categories).inverted();

    let mut series = Vec::new();
    if !layout.points.is_empty() {
        series.push(Series::Scatter {
            name: String::from("shap"),
            points: layout.points,
        });
    }
    series.push(Series::Overlay(Overlay::vertical(OverlayKind::Baseline, "zero", 0.0, &y_axis)));

    let legend = vec![
        legend_entry("feature value low", &options.gradient_light),
        legend_entry("feature value high", &options.gradient_dark),
    ];
    scene(options, vec![panel(x_axis, y_axis, series)], legend)
}

/// Horizontal bars of mean absolute attribution, most important on top
pub fn importance_chart(rows: &[ShapRow], options: &EngineOptions) -> SceneGraph {
    let top = select_top_features(&merged_features(rows), options.top_features);
    let values: Vec<f64> = top.iter().map(|f| f.mean_abs().unwrap_or(0.0)).collect();
    let categories: Vec<String> = top.into_iter().map(|f| f.name).collect();

    let x_axis = AxisSpec::value(positive_axis(values.iter().copied().fold(0.0, f64::max)))
        .named("mean |SHAP value|");
    let y_axis = AxisSpec::category(categories).inverted();

    let mut series = Vec::new();
    if !values.is_empty() {
        series.push(Series::Bar {
            name: String::from("importance"),
            color: ColorPalette::category10().color(0),
            values,
            stack: None,
        });
    }
    scene(options, vec![panel(x_axis, y_axis, series)], Vec::new())
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve every panel into pixel-space primitives, one group per panel.
///
/// Panels tile the viewport by their row and column.
pub fn resolve_scene(scene: &SceneGraph) -> Vec<Primitive> {
    let cols = scene.panels.iter().map(|p| p.col + 1).max().unwrap_or(1);
    let rows = scene.panels.iter().map(|p| p.row + 1).max().unwrap_or(1);
    let panel_width = scene.width as f64 / cols as f64;
    let panel_height = scene.height as f64 / rows as f64;

    scene
        .panels
        .iter()
        .map(|p| {
            let inner = LinearMapper::new(&p.x_axis, &p.y_axis, panel_width, panel_height);
            let (ox, oy) = (p.col as f64 * panel_width, p.row as f64 * panel_height);
            let mapper = move |point: (f64, f64)| {
                let (x, y) = inner.to_pixel(point);
                (x + ox, y + oy)
            };
            Primitive::Group {
                children: resolve_panel(p, &mapper),
            }
        })
        .collect()
}
