// Geometry builders for custom chart primitives
//
// Builders take data-space values and a coordinate mapper and emit
// pixel-space primitives. Fixed pixel sizes (cap widths, dot radius) are
// applied after mapping so they stay constant at any zoom.

use std::collections::HashMap;

use serde::Serialize;

use crate::ir::{AxisSpec, CustomItems, CustomSeries, PanelScene, Primitive, ScatterPoint, Series};
use crate::palette::Gradient;

/// Half-width of error-bar caps, in pixels
pub const WHISKER_CAP_HALF_WIDTH: f64 = 5.0;

/// Half-height of forest-interval caps, in pixels
pub const FOREST_CAP_HALF_HEIGHT: f64 = 8.0;

/// Radius of the forest point-estimate dot, in pixels
pub const FOREST_DOT_RADIUS: f64 = 6.0;

/// Radius of scatter points, in pixels
pub const SCATTER_RADIUS: f64 = 3.0;

/// Largest vertical offset applied to a jittered point, in category units
pub const JITTER_AMPLITUDE: f64 = 0.24;

/// Features kept in a jittered scatter
pub const TOP_FEATURES: usize = 10;

/// Fraction of a category slot filled by bars
const BAR_WIDTH_RATIO: f64 = 0.8;

// =============================================================================
// Coordinate mapping
// =============================================================================

/// Maps a data-space point to pixel space
pub trait CoordMapper {
    fn to_pixel(&self, point: (f64, f64)) -> (f64, f64);
}

impl<F> CoordMapper for F
where
    F: Fn((f64, f64)) -> (f64, f64),
{
    fn to_pixel(&self, point: (f64, f64)) -> (f64, f64) {
        self(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisMap {
    domain: (f64, f64),
    range: (f64, f64),
}

impl AxisMap {
    fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Linear data-to-pixel mapping over a `width` x `height` viewport.
///
/// Pixel y grows downward, so the y-axis maximum lands on row 0 unless the
/// axis is inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    x: AxisMap,
    y: AxisMap,
}

impl LinearMapper {
    pub fn new(x_axis: &AxisSpec, y_axis: &AxisSpec, width: f64, height: f64) -> Self {
        let x_range = if x_axis.inverse { (width, 0.0) } else { (0.0, width) };
        let y_range = if y_axis.inverse { (0.0, height) } else { (height, 0.0) };
        Self {
            x: AxisMap {
                domain: (x_axis.min, x_axis.max),
                range: x_range,
            },
            y: AxisMap {
                domain: (y_axis.min, y_axis.max),
                range: y_range,
            },
        }
    }

    pub fn for_panel(panel: &PanelScene, width: u32, height: u32) -> Self {
        Self::new(&panel.x_axis, &panel.y_axis, width as f64, height as f64)
    }
}

impl CoordMapper for LinearMapper {
    fn to_pixel(&self, point: (f64, f64)) -> (f64, f64) {
        (self.x.map(point.0), self.y.map(point.1))
    }
}

// =============================================================================
// Error bars and forest intervals
// =============================================================================

/// A measurement with a symmetric error
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorBarPoint {
    pub x: f64,
    pub y: f64,
    pub error: f64,
}

/// Point estimate with its interval, `low <= mean <= high`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestInterval {
    pub low: f64,
    pub mean: f64,
    pub high: f64,
    pub color: String,
}

fn segment(from: (f64, f64), to: (f64, f64), color: &str) -> Primitive {
    Primitive::Line {
        from,
        to,
        color: color.to_string(),
    }
}

/// Vertical whisker from `y - error` to `y + error` with a cap at each end.
///
/// `None` when x or y is not finite. A missing or negative error is drawn
/// as zero or by magnitude respectively.
pub fn error_bar_whisker(point: &ErrorBarPoint, color: &str, mapper: &dyn CoordMapper) -> Option<Primitive> {
    if !(point.x.is_finite() && point.y.is_finite()) {
        return None;
    }
    let error = if point.error.is_finite() { point.error.abs() } else { 0.0 };

    let top = mapper.to_pixel((point.x, point.y + error));
    let bottom = mapper.to_pixel((point.x, point.y - error));
    let cap = |p: (f64, f64)| {
        segment(
            (p.0 - WHISKER_CAP_HALF_WIDTH, p.1),
            (p.0 + WHISKER_CAP_HALF_WIDTH, p.1),
            color,
        )
    };

    Some(Primitive::Group {
        children: vec![segment(bottom, top, color), cap(top), cap(bottom)],
    })
}

/// Horizontal interval at vertical position `row`, capped at both ends, with
/// a dot at the mean. `dot_color` overrides the dot fill only.
pub fn forest_interval(
    interval: &ForestInterval,
    row: f64,
    mapper: &dyn CoordMapper,
    dot_color: Option<&str>,
) -> Option<Primitive> {
    if !(interval.mean.is_finite() && row.is_finite()) {
        return None;
    }
    let low = if interval.low.is_finite() { interval.low } else { interval.mean };
    let high = if interval.high.is_finite() { interval.high } else { interval.mean };
    let (low, high) = (low.min(high), low.max(high));

    let color = interval.color.as_str();
    let left = mapper.to_pixel((low, row));
    let right = mapper.to_pixel((high, row));
    let center = mapper.to_pixel((interval.mean, row));
    let cap = |p: (f64, f64)| {
        segment(
            (p.0, p.1 - FOREST_CAP_HALF_HEIGHT),
            (p.0, p.1 + FOREST_CAP_HALF_HEIGHT),
            color,
        )
    };

    Some(Primitive::Group {
        children: vec![
            segment(left, right, color),
            cap(left),
            cap(right),
            Primitive::Circle {
                center,
                radius: FOREST_DOT_RADIUS,
                fill: dot_color.unwrap_or(color).to_string(),
            },
        ],
    })
}

impl CustomSeries {
    /// Render callback for item `index`
    pub fn render_item(&self, index: usize, mapper: &dyn CoordMapper) -> Option<Primitive> {
        match &self.items {
            CustomItems::ErrorBars(points) => error_bar_whisker(points.get(index)?, &self.color, mapper),
            CustomItems::ForestIntervals(items) => {
                let item = items.get(index)?;
                forest_interval(&item.interval, item.row, mapper, item.dot_color.as_deref())
            }
        }
    }

    pub fn render_all(&self, mapper: &dyn CoordMapper) -> Vec<Primitive> {
        (0..self.items.len())
            .filter_map(|i| self.render_item(i, mapper))
            .collect()
    }
}

// =============================================================================
// Jittered scatter with continuous color
// =============================================================================

/// Deterministic offset in `[-amplitude, amplitude]` for a flattened point index
pub fn jitter(index: usize, amplitude: f64) -> f64 {
    let s = ((index as f64 + 1.0) * 12.9898).sin() * 43758.5453;
    let unit = s - s.floor();
    (unit * 2.0 - 1.0) * amplitude
}

/// Per-point values of one feature plus the channel that drives point color
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureValues {
    pub name: String,
    pub values: Vec<f64>,
    pub colors: Vec<f64>,
}

impl FeatureValues {
    /// Value/color pairs over the common length of both channels
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied().zip(self.colors.iter().copied())
    }

    /// Mean absolute value over the finite values; `None` when there are none
    pub fn mean_abs(&self) -> Option<f64> {
        let finite: Vec<f64> = self.values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        Some(finite.iter().map(|v| v.abs()).sum::<f64>() / finite.len() as f64)
    }
}

/// The `n` features with the largest mean absolute value, most important first.
///
/// Features without finite values are dropped; ties keep input order.
pub fn select_top_features(features: &[FeatureValues], n: usize) -> Vec<FeatureValues> {
    let mut scored: Vec<(f64, &FeatureValues)> = features
        .iter()
        .filter_map(|f| f.mean_abs().map(|m| (m, f)))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(n).map(|(_, f)| f.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JitterScatter {
    /// Category order, most important feature first
    pub categories: Vec<String>,
    pub points: Vec<ScatterPoint>,
    pub color_range: (f64, f64),
}

/// Lay out the top features as jittered rows of points colored on a shared scale.
///
/// Point `y` is the feature's category index plus a deterministic jitter of
/// the point's flattened index, so identical input always lands identically.
pub fn jittered_scatter(
    features: &[FeatureValues],
    top_n: usize,
    amplitude: f64,
    light: &str,
    dark: &str,
) -> JitterScatter {
    let top = select_top_features(features, top_n);

    for f in &top {
        if f.values.len() != f.colors.len() {
            tracing::warn!(
                feature = %f.name,
                values = f.values.len(),
                colors = f.colors.len(),
                "value/color length mismatch, using common length"
            );
        }
    }

    let color_values = top.iter().flat_map(|f| f.pairs().map(|(_, c)| c));
    let (cmin, cmax) = crate::scale::MinMax::from_values(color_values)
        .map(|mm| (mm.min, mm.max))
        .unwrap_or((0.0, 1.0));
    let gradient = Gradient::new(light, dark, cmin, cmax);

    let mut points = Vec::new();
    let mut flat = 0usize;
    for (category, feature) in top.iter().enumerate() {
        for (value, color_value) in feature.pairs() {
            let index = flat;
            flat += 1;
            if !value.is_finite() {
                continue;
            }
            points.push(ScatterPoint {
                x: value,
                y: category as f64 + jitter(index, amplitude),
                color: gradient.sample(color_value).to_hex(),
            });
        }
    }

    JitterScatter {
        categories: top.into_iter().map(|f| f.name).collect(),
        points,
        color_range: gradient.range(),
    }
}

// =============================================================================
// Whole-panel resolution
// =============================================================================

fn rect(a: (f64, f64), b: (f64, f64), color: &str) -> Primitive {
    Primitive::Rect {
        tl: (a.0.min(b.0), a.1.min(b.1)),
        br: (a.0.max(b.0), a.1.max(b.1)),
        color: color.to_string(),
    }
}

fn bar_primitives(panel: &PanelScene, mapper: &dyn CoordMapper) -> Vec<Primitive> {
    let vertical = !panel.y_axis.is_category();

    // One dodge slot per stack (or per unstacked series)
    let mut slots: Vec<String> = Vec::new();
    for series in &panel.series {
        if let Series::Bar { name, stack, .. } = series {
            let key = stack.clone().unwrap_or_else(|| name.clone());
            if !slots.contains(&key) {
                slots.push(key);
            }
        }
    }
    if slots.is_empty() {
        return Vec::new();
    }

    let slot_width = BAR_WIDTH_RATIO / slots.len() as f64;
    let mut stack_tops: HashMap<(usize, usize), f64> = HashMap::new();
    let mut out = Vec::new();

    for series in &panel.series {
        let Series::Bar { name, color, values, stack } = series else {
            continue;
        };
        let key = stack.as_ref().unwrap_or(name);
        let rank = slots.iter().position(|s| s == key).unwrap_or(0);
        let offset = (rank as f64 - (slots.len() as f64 - 1.0) / 2.0) * slot_width;

        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                continue;
            }
            let base = if stack.is_some() {
                *stack_tops.get(&(rank, i)).unwrap_or(&0.0)
            } else {
                0.0
            };
            let top = base + v;
            if stack.is_some() {
                stack_tops.insert((rank, i), top);
            }

            let center = i as f64 + offset;
            let (a, b) = if vertical {
                ((center - slot_width / 2.0, top), (center + slot_width / 2.0, base))
            } else {
                ((base, center - slot_width / 2.0), (top, center + slot_width / 2.0))
            };
            out.push(rect(mapper.to_pixel(a), mapper.to_pixel(b), color));
        }
    }
    out
}

/// Resolve every series of a panel into pixel-space primitives.
///
/// Bars become rectangles (dodged per stack, stacked within one), lines
/// polylines, areas closed outlines stacked on earlier areas of the same
/// stack, scatter points circles, custom series their rendered items and
/// overlays plain segments.
pub fn resolve_panel(panel: &PanelScene, mapper: &dyn CoordMapper) -> Vec<Primitive> {
    let mut out = bar_primitives(panel, mapper);
    let mut area_tops: HashMap<&str, Vec<f64>> = HashMap::new();

    for series in &panel.series {
        match series {
            Series::Bar { .. } => {}
            Series::Line { color, points, .. } => {
                let pts: Vec<(f64, f64)> = points
                    .iter()
                    .filter(|p| p.0.is_finite() && p.1.is_finite())
                    .map(|&p| mapper.to_pixel(p))
                    .collect();
                if pts.len() >= 2 {
                    out.push(Primitive::Polyline {
                        points: pts,
                        color: color.clone(),
                    });
                }
            }
            Series::Area { color, points, stack, .. } => {
                let bases: Vec<f64> = match stack {
                    Some(key) => area_tops.get(key.as_str()).cloned().unwrap_or_default(),
                    None => Vec::new(),
                };
                let base_at = |i: usize| bases.get(i).copied().unwrap_or(0.0);

                let tops: Vec<f64> = points.iter().enumerate().map(|(i, p)| base_at(i) + p.1).collect();
                let mut outline: Vec<(f64, f64)> = points
                    .iter()
                    .zip(&tops)
                    .map(|(p, &top)| mapper.to_pixel((p.0, top)))
                    .collect();
                for (i, p) in points.iter().enumerate().rev() {
                    outline.push(mapper.to_pixel((p.0, base_at(i))));
                }
                if let Some(key) = stack {
                    area_tops.insert(key.as_str(), tops);
                }
                if !points.is_empty() {
                    out.push(Primitive::Area {
                        points: outline,
                        color: color.clone(),
                    });
                }
            }
            Series::Scatter { points, .. } => {
                out.extend(points.iter().map(|p| Primitive::Circle {
                    center: mapper.to_pixel((p.x, p.y)),
                    radius: SCATTER_RADIUS,
                    fill: p.color.clone(),
                }));
            }
            Series::Custom(custom) => out.extend(custom.render_all(mapper)),
            Series::Overlay(overlay) => out.push(segment(
                mapper.to_pixel(overlay.from),
                mapper.to_pixel(overlay.to),
                &overlay.color,
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ForestItem, Overlay, OverlayKind};
    use crate::scale::AxisDomain;

    fn identity() -> impl Fn((f64, f64)) -> (f64, f64) {
        |p: (f64, f64)| p
    }

    fn lines(p: &Primitive) -> Vec<((f64, f64), (f64, f64))> {
        match p {
            Primitive::Group { children } => children
                .iter()
                .filter_map(|c| match c {
                    Primitive::Line { from, to, .. } => Some((*from, *to)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_whisker_segments() {
        let point = ErrorBarPoint { x: 10.0, y: 50.0, error: 5.0 };
        let g = error_bar_whisker(&point, "#123456", &identity()).unwrap();
        let segs = lines(&g);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0], ((10.0, 45.0), (10.0, 55.0)));
        assert_eq!(segs[1], ((5.0, 55.0), (15.0, 55.0)));
        assert_eq!(segs[2], ((5.0, 45.0), (15.0, 45.0)));
    }

    #[test]
    fn test_whisker_caps_are_pixel_sized() {
        let scaled = |p: (f64, f64)| (p.0 * 100.0, p.1 * 100.0);
        let point = ErrorBarPoint { x: 1.0, y: 1.0, error: 0.5 };
        let segs = lines(&error_bar_whisker(&point, "#000", &scaled).unwrap());
        let ((x0, _), (x1, _)) = segs[1];
        assert_eq!(x1 - x0, 2.0 * WHISKER_CAP_HALF_WIDTH);
    }

    #[test]
    fn test_whisker_guards() {
        let bad = ErrorBarPoint { x: f64::NAN, y: 1.0, error: 1.0 };
        assert!(error_bar_whisker(&bad, "#000", &identity()).is_none());

        let no_error = ErrorBarPoint { x: 1.0, y: 2.0, error: f64::NAN };
        let segs = lines(&error_bar_whisker(&no_error, "#000", &identity()).unwrap());
        assert_eq!(segs[0], ((1.0, 2.0), (1.0, 2.0)));
    }

    #[test]
    fn test_forest_interval_shapes() {
        let interval = ForestInterval {
            low: 10.0,
            mean: 20.0,
            high: 40.0,
            color: "#111111".into(),
        };
        let g = forest_interval(&interval, 100.0, &identity(), Some("#ff0000")).unwrap();
        let Primitive::Group { children } = &g else {
            panic!("expected group");
        };
        assert_eq!(children.len(), 4);
        assert_eq!(
            children[0],
            Primitive::Line { from: (10.0, 100.0), to: (40.0, 100.0), color: "#111111".into() }
        );
        assert_eq!(
            children[1],
            Primitive::Line { from: (10.0, 92.0), to: (10.0, 108.0), color: "#111111".into() }
        );
        assert_eq!(
            children[3],
            Primitive::Circle { center: (20.0, 100.0), radius: 6.0, fill: "#ff0000".into() }
        );
    }

    #[test]
    fn test_forest_dot_defaults_to_line_color() {
        let interval = ForestInterval { low: 1.0, mean: 2.0, high: 3.0, color: "#222222".into() };
        let g = forest_interval(&interval, 0.0, &identity(), None).unwrap();
        let Primitive::Group { children } = g else {
            panic!("expected group");
        };
        assert!(matches!(&children[3], Primitive::Circle { fill, .. } if fill == "#222222"));
    }

    #[test]
    fn test_jitter_is_deterministic_and_bounded() {
        for i in 0..1000 {
            let j = jitter(i, JITTER_AMPLITUDE);
            assert!(j.abs() <= JITTER_AMPLITUDE, "index {i} gave {j}");
            assert_eq!(j, jitter(i, JITTER_AMPLITUDE));
        }
        assert_ne!(jitter(0, JITTER_AMPLITUDE), jitter(1, JITTER_AMPLITUDE));
    }

    fn feature(name: &str, values: Vec<f64>, colors: Vec<f64>) -> FeatureValues {
        FeatureValues { name: name.into(), values, colors }
    }

    #[test]
    fn test_top_features_by_mean_abs() {
        let features = vec![
            feature("small", vec![0.1, -0.1], vec![]),
            feature("big", vec![-2.0, 2.0], vec![]),
            feature("mid", vec![1.0, 0.0], vec![]),
            feature("empty", vec![f64::NAN], vec![]),
        ];
        let top = select_top_features(&features, 2);
        let names: Vec<&str> = top.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["big", "mid"]);
    }

    #[test]
    fn test_jittered_scatter_layout() {
        let features = vec![
            feature("a", vec![0.5, -0.5, 0.1], vec![0.0, 10.0]),
            feature("b", vec![3.0, -3.0], vec![5.0, 5.0]),
        ];
        let out = jittered_scatter(&features, 10, JITTER_AMPLITUDE, "#ffffff", "#000000");
        assert_eq!(out.categories, vec!["b", "a"]);
        // common length: 2 + 2
        assert_eq!(out.points.len(), 4);
        assert_eq!(out.color_range, (0.0, 10.0));
        for p in &out.points[..2] {
            assert!((p.y - 0.0).abs() <= JITTER_AMPLITUDE);
            assert_eq!(p.color, "#808080");
        }
        for p in &out.points[2..] {
            assert!((p.y - 1.0).abs() <= JITTER_AMPLITUDE);
        }
        assert_eq!(out.points[2].color, "#ffffff");
        assert_eq!(out.points[3].color, "#000000");

        let again = jittered_scatter(&features, 10, JITTER_AMPLITUDE, "#ffffff", "#000000");
        assert_eq!(out, again);
    }

    #[test]
    fn test_jittered_scatter_flat_colors() {
        let features = vec![feature("a", vec![1.0, 2.0], vec![4.0, 4.0])];
        let out = jittered_scatter(&features, 10, JITTER_AMPLITUDE, "#ffffff", "#000000");
        assert_eq!(out.color_range, (4.0, 5.0));
        assert!(out.points.iter().all(|p| p.color == "#ffffff"));
    }

    fn bar_panel(series: Vec<Series>) -> PanelScene {
        PanelScene {
            row: 0,
            col: 0,
            title: None,
            x_axis: AxisSpec::category(vec!["a".into(), "b".into()]),
            y_axis: AxisSpec::value(AxisDomain::new(0.0, 10.0, 2.0)),
            series,
        }
    }

    fn bar(name: &str, values: Vec<f64>, stack: Option<&str>) -> Series {
        Series::Bar {
            name: name.into(),
            color: "#000".into(),
            values,
            stack: stack.map(String::from),
        }
    }

    #[test]
    fn test_linear_mapper() {
        let panel = bar_panel(Vec::new());
        let m = LinearMapper::for_panel(&panel, 200, 100);
        assert_eq!(m.to_pixel((-0.5, 0.0)), (0.0, 100.0));
        assert_eq!(m.to_pixel((1.5, 10.0)), (200.0, 0.0));

        let inverted = LinearMapper::new(&panel.x_axis, &panel.y_axis.clone().inverted(), 200.0, 100.0);
        assert_eq!(inverted.to_pixel((-0.5, 0.0)), (0.0, 0.0));
    }

    #[test]
    fn test_dodged_bars() {
        let panel = bar_panel(vec![bar("A", vec![1.0, 2.0], None), bar("B", vec![3.0, 4.0], None)]);
        let prims = resolve_panel(&panel, &identity());
        assert_eq!(prims.len(), 4);
        let Primitive::Rect { tl, br, .. } = &prims[0] else {
            panic!("expected rect");
        };
        assert!((tl.0 - -0.4).abs() < 1e-12);
        assert!((br.0 - 0.0).abs() < 1e-12);
        assert_eq!((tl.1, br.1), (0.0, 1.0));
    }

    #[test]
    fn test_stacked_bars_share_slot() {
        let panel = bar_panel(vec![
            bar("A", vec![1.0, 2.0], Some("s")),
            bar("B", vec![3.0, 4.0], Some("s")),
        ]);
        let prims = resolve_panel(&panel, &identity());
        let Primitive::Rect { tl, br, .. } = &prims[2] else {
            panic!("expected rect");
        };
        // second series sits on the first
        assert_eq!((tl.1, br.1), (1.0, 4.0));
        assert!((tl.0 - -0.4).abs() < 1e-12 && (br.0 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_overlay_and_custom() {
        let mut panel = bar_panel(Vec::new());
        panel.series.push(Series::Overlay(Overlay::new(OverlayKind::Guide, "g", (1.0, 0.0), (1.0, 10.0))));
        panel.series.push(Series::Custom(CustomSeries {
            name: "ci".into(),
            color: "#000".into(),
            items: CustomItems::ForestIntervals(vec![ForestItem {
                row: 0.0,
                interval: ForestInterval { low: 1.0, mean: 2.0, high: 3.0, color: "#000".into() },
                dot_color: None,
            }]),
        }));
        let prims = resolve_panel(&panel, &identity());
        assert_eq!(prims.len(), 2);
        assert_eq!(prims[1].shape_count(), 4);
    }

    #[test]
    fn test_stacked_areas() {
        let mut panel = bar_panel(Vec::new());
        for name in ["a", "b"] {
            panel.series.push(Series::Area {
                name: name.into(),
                color: "#000".into(),
                points: vec![(0.0, 1.0), (1.0, 2.0)],
                stack: Some("total".into()),
            });
        }
        let prims = resolve_panel(&panel, &identity());
        let Primitive::Area { points, .. } = &prims[1] else {
            panic!("expected area");
        };
        assert_eq!(points, &vec![(0.0, 2.0), (1.0, 4.0), (1.0, 2.0), (0.0, 1.0)]);
    }
}
