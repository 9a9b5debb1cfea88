use serde::Serialize;

use crate::geometry::{ErrorBarPoint, ForestInterval};
use crate::scale::AxisDomain;

// =============================================================================
// Scene: the declarative input handed to the external renderer
// =============================================================================

/// One chart, split into panels (a forest matrix has one panel per metric)
#[derive(Debug, Clone, Serialize)]
pub struct SceneGraph {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelScene>,
    pub legend: Vec<LegendEntry>,
}

impl SceneGraph {
    /// True when no panel carries a data series; consumers show an empty state
    pub fn is_empty(&self) -> bool {
        self.panels
            .iter()
            .all(|p| p.series.iter().all(|s| matches!(s, Series::Overlay(_))))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelScene {
    pub row: usize,
    pub col: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

// =============================================================================
// Axes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Value,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    pub inverse: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl AxisSpec {
    pub fn value(domain: AxisDomain) -> Self {
        Self {
            kind: AxisKind::Value,
            name: None,
            min: domain.min,
            max: domain.max,
            interval: Some(domain.interval),
            inverse: false,
            categories: Vec::new(),
        }
    }

    /// Category `i` sits at coordinate `i`; the axis spans half a slot past each end
    pub fn category(categories: Vec<String>) -> Self {
        let n = categories.len() as f64;
        Self {
            kind: AxisKind::Category,
            name: None,
            min: -0.5,
            max: (n - 0.5).max(0.5),
            interval: None,
            inverse: false,
            categories,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn inverted(mut self) -> Self {
        self.inverse = true;
        self
    }

    pub fn is_category(&self) -> bool {
        self.kind == AxisKind::Category
    }
}

// =============================================================================
// Series
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Series {
    /// One value per category of the category axis
    Bar {
        name: String,
        color: String,
        values: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    Line {
        name: String,
        color: String,
        points: Vec<(f64, f64)>,
    },
    /// Filled curve down to zero, optionally stacked on earlier areas of the same stack
    Area {
        name: String,
        color: String,
        points: Vec<(f64, f64)>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    Scatter {
        name: String,
        points: Vec<ScatterPoint>,
    },
    Custom(CustomSeries),
    Overlay(Overlay),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub color: String,
}

/// A series whose items are drawn by a per-item render callback
/// (see [`CustomSeries::render_item`](crate::geometry))
#[derive(Debug, Clone, Serialize)]
pub struct CustomSeries {
    pub name: String,
    pub color: String,
    pub items: CustomItems,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum CustomItems {
    ErrorBars(Vec<ErrorBarPoint>),
    /// `row` is the item's position on the category axis
    ForestIntervals(Vec<ForestItem>),
}

impl CustomItems {
    pub fn len(&self) -> usize {
        match self {
            CustomItems::ErrorBars(v) => v.len(),
            CustomItems::ForestIntervals(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestItem {
    pub row: f64,
    pub interval: ForestInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Threshold,
    Guide,
    Regression,
    Baseline,
}

/// Reference line drawn over the data. Overlays never take hover, tooltips
/// or legend slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    pub kind: OverlayKind,
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: String,
    pub dashed: bool,
    silent: bool,
    tooltip: bool,
}

impl Overlay {
    pub fn new(kind: OverlayKind, name: impl Into<String>, from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            kind,
            from,
            to,
            color: String::from("#555555"),
            dashed: !matches!(kind, OverlayKind::Regression),
            silent: true,
            tooltip: false,
        }
    }

    /// Vertical line at `x` spanning the y axis
    pub fn vertical(kind: OverlayKind, name: impl Into<String>, x: f64, y_axis: &AxisSpec) -> Self {
        Self::new(kind, name, (x, y_axis.min), (x, y_axis.max))
    }

    /// Horizontal line at `y` spanning the x axis
    pub fn horizontal(kind: OverlayKind, name: impl Into<String>, y: f64, x_axis: &AxisSpec) -> Self {
        Self::new(kind, name, (x_axis.min, y), (x_axis.max, y))
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn has_tooltip(&self) -> bool {
        self.tooltip
    }
}

// =============================================================================
// Primitives: pixel-space shapes produced by the geometry builders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: String,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: String,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: String,
    },
    /// Closed outline: the upper edge left to right, then the lower edge back
    Area {
        points: Vec<(f64, f64)>,
        color: String,
    },
    Rect {
        tl: (f64, f64),
        br: (f64, f64),
        color: String,
    },
    Group {
        children: Vec<Primitive>,
    },
}

impl Primitive {
    /// Number of non-group shapes, counting through nested groups
    pub fn shape_count(&self) -> usize {
        match self {
            Primitive::Group { children } => children.iter().map(Primitive::shape_count).sum(),
            _ => 1,
        }
    }
}
