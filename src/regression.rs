// Linear fit overlay

use serde::{Deserialize, Serialize};

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    #[serde(default = "crate::data::nan", deserialize_with = "crate::data::lenient_f64")]
    pub slope: f64,
    #[serde(default = "crate::data::nan", deserialize_with = "crate::data::lenient_f64")]
    pub intercept: f64,
}

impl Regression {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn is_finite(&self) -> bool {
        self.slope.is_finite() && self.intercept.is_finite()
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Ordinary least squares over the finite points; `None` with fewer
    /// than two points or no spread in x
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let finite: Vec<(f64, f64)> = points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if finite.len() < 2 {
            return None;
        }

        let n = finite.len() as f64;
        let sum_x: f64 = finite.iter().map(|p| p.0).sum();
        let sum_y: f64 = finite.iter().map(|p| p.1).sum();
        let sum_xx: f64 = finite.iter().map(|p| p.0 * p.0).sum();
        let sum_xy: f64 = finite.iter().map(|p| p.0 * p.1).sum();

        let denom = n * sum_xx - sum_x * sum_x;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let slope = (n * sum_xy - sum_x * sum_y) / denom;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(Self { slope, intercept })
    }
}

/// Endpoints of the fitted line over `[x_min, x_max]`.
///
/// `None` when any input is non-finite: a missing fit means too little data,
/// not a flat line.
pub fn regression_line(slope: f64, intercept: f64, x_min: f64, x_max: f64) -> Option<[(f64, f64); 2]> {
    if !(slope.is_finite() && intercept.is_finite() && x_min.is_finite() && x_max.is_finite()) {
        return None;
    }
    let fit = Regression::new(slope, intercept);
    Some([(x_min, fit.at(x_min)), (x_max, fit.at(x_max))])
}
