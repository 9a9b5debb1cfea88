// Library exports for trialviz

pub mod data;
pub mod density;
pub mod geometry;
pub mod histogram;
pub mod normalize;
pub mod palette;
pub mod parser;
pub mod rank;
pub mod regression;
pub mod scale;

// Scene assembly
pub mod compiler;
pub mod ir;

use serde::Deserialize;

use crate::rank::RiskScale;

/// Engine settings; every field is optional in an options file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_grid_intervals")]
    pub grid_intervals: usize,
    #[serde(default = "default_top_features")]
    pub top_features: usize,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_gradient_light")]
    pub gradient_light: String,
    #[serde(default = "default_gradient_dark")]
    pub gradient_dark: String,
    /// Fill for forest point estimates; defaults to the interval color
    #[serde(default)]
    pub forest_dot_color: Option<String>,
    #[serde(default = "default_count_floor")]
    pub count_axis_floor: f64,
    #[serde(default = "default_proportion_floor")]
    pub proportion_axis_floor: f64,
    #[serde(default)]
    pub label_scale: RiskScale,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_grid_intervals() -> usize { density::GRID_INTERVALS }
fn default_top_features() -> usize { geometry::TOP_FEATURES }
fn default_jitter() -> f64 { geometry::JITTER_AMPLITUDE }
fn default_gradient_light() -> String { palette::DEFAULT_GRADIENT_LIGHT.to_string() }
fn default_gradient_dark() -> String { palette::DEFAULT_GRADIENT_DARK.to_string() }
fn default_count_floor() -> f64 { histogram::COUNT_AXIS_FLOOR }
fn default_proportion_floor() -> f64 { histogram::PROPORTION_AXIS_FLOOR }

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            grid_intervals: default_grid_intervals(),
            top_features: default_top_features(),
            jitter: default_jitter(),
            gradient_light: default_gradient_light(),
            gradient_dark: default_gradient_dark(),
            forest_dot_color: None,
            count_axis_floor: default_count_floor(),
            proportion_axis_floor: default_proportion_floor(),
            label_scale: RiskScale::default(),
        }
    }
}
