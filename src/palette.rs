// Colors for series, regions and continuous color channels

use crate::parser::parse_hex_color;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex_color(hex)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation per channel, `t` clamped to [0, 1]
    pub fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let channel = |x: u8, y: u8| -> u8 {
            (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
    }
}

pub const DEFAULT_GRADIENT_LIGHT: &str = "#c6dbef";
pub const DEFAULT_GRADIENT_DARK: &str = "#08306b";

/// Two-stop color scale over a shared `[min, max]` value range
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    light: Rgb,
    dark: Rgb,
    min: f64,
    max: f64,
}

impl Gradient {
    /// Unparseable colors fall back to the default stops; a zero-width range is widened by 1
    pub fn new(light: &str, dark: &str, min: f64, max: f64) -> Self {
        let light = Rgb::from_hex(light).unwrap_or(Rgb::new(0xc6, 0xdb, 0xef));
        let dark = Rgb::from_hex(dark).unwrap_or(Rgb::new(0x08, 0x30, 0x6b));

        let (min, max) = if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 1.0)
        };
        let max = if max <= min {
            tracing::debug!(min, "zero-width color scale, widening");
            min + 1.0
        } else {
            max
        };
        Self { light, dark, min, max }
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Position of `value` on the scale, 0 = light end
    pub fn position(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.5;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn sample(&self, value: f64) -> Rgb {
        Rgb::lerp(self.light, self.dark, self.position(value))
    }
}

/// Ordered list of categorical colors, cycled when keys outnumber colors
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<&'static str>,
}

impl ColorPalette {
    pub fn category10() -> Self {
        Self {
            colors: vec![
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f", "#bcbd22", "#17becf",
            ],
        }
    }

    /// Low/mid/high colors for density regions split by thresholds
    pub fn regions() -> Self {
        Self {
            colors: vec!["#2ca02c", "#ff7f0e", "#d62728"],
        }
    }

    pub fn color(&self, index: usize) -> String {
        self.colors[index % self.colors.len()].to_string()
    }

    /// Assign colors to keys in the order given
    pub fn assign_colors(&self, keys: &[String]) -> HashMap<String, String> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), self.color(i)))
            .collect()
    }
}
