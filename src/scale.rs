// Axis domains and "nice" tick intervals

use serde::Serialize;

/// Number of gridline intervals an axis aims for
pub const TICK_COUNT: f64 = 5.0;

const STEP_EPSILON: f64 = 1e-9;

/// A value axis domain whose span is a whole number of `interval`s
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
    pub interval: f64,
}

impl AxisDomain {
    pub fn new(min: f64, max: f64, interval: f64) -> Self {
        Self { min, max, interval }
    }

    /// Domain `[0, axis_max]` for a non-negative quantity, never below `floor`
    pub fn from_max(raw_max: f64, floor: f64) -> Self {
        let max = if raw_max.is_finite() { raw_max.max(floor) } else { floor };
        let interval = nice_interval(max);
        Self {
            min: 0.0,
            max: axis_max(max, interval),
            interval,
        }
    }

    /// Domain covering `[min, max]` with both ends snapped outward to the interval grid
    pub fn from_range(min: f64, max: f64) -> Self {
        if !(min.is_finite() && max.is_finite()) {
            return Self::default();
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let (min, max) = if max - min < STEP_EPSILON {
            pad_range(min, max)
        } else {
            (min, max)
        };

        let interval = nice_interval(max - min);
        Self {
            min: axis_min(min, interval),
            max: axis_max(max, interval),
            interval,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Gridline values from min to max inclusive
    pub fn ticks(&self) -> Vec<f64> {
        if !(self.interval > 0.0) || !self.span().is_finite() {
            return vec![self.min, self.max];
        }
        let steps = (self.span() / self.interval).round() as usize;
        (0..=steps)
            .map(|i| snap(self.min + i as f64 * self.interval, self.interval))
            .collect()
    }
}

impl Default for AxisDomain {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            interval: 0.2,
        }
    }
}

/// Tick interval rounded up to 1, 2, 5 or 10 times a power of ten.
///
/// Non-positive and non-finite maxima fall back to an interval of 1.
pub fn nice_interval(max_value: f64) -> f64 {
    if !(max_value.is_finite() && max_value > 0.0) {
        return 1.0;
    }

    let raw = max_value / TICK_COUNT;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;

    let nice = if residual <= 1.0 + STEP_EPSILON {
        1.0
    } else if residual <= 2.0 + STEP_EPSILON {
        2.0
    } else if residual <= 5.0 + STEP_EPSILON {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Smallest multiple of `interval` that is >= `raw_max`
pub fn axis_max(raw_max: f64, interval: f64) -> f64 {
    if !(interval.is_finite() && interval > 0.0) || !raw_max.is_finite() {
        return raw_max;
    }
    let steps = (raw_max / interval - STEP_EPSILON).ceil();
    snap(steps * interval, interval)
}

/// Largest multiple of `interval` that is <= `raw_min`
pub fn axis_min(raw_min: f64, interval: f64) -> f64 {
    if !(interval.is_finite() && interval > 0.0) || !raw_min.is_finite() {
        return raw_min;
    }
    let steps = (raw_min / interval + STEP_EPSILON).floor();
    snap(steps * interval, interval)
}

// Removes accumulated float noise such as 0.6000000000000001
fn snap(value: f64, interval: f64) -> f64 {
    let decimals = (-interval.log10().floor()).max(0.0) as i32 + 2;
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Finite data extent of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// `None` when no value is finite
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Nice domain over the finite values, or `fallback` when there are none
pub fn domain_from_values<I>(values: I, fallback: AxisDomain) -> AxisDomain
where
    I: IntoIterator<Item = f64>,
{
    match MinMax::from_values(values) {
        Some(mm) => AxisDomain::from_range(mm.min, mm.max),
        None => {
            tracing::debug!("no finite values for axis, using fallback domain");
            fallback
        }
    }
}

/// Widen a range by 5% on each side; a zero-width range becomes `[v - 1, v + 1]`
pub fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_interval_leading_digits() {
        assert_eq!(nice_interval(5.0), 1.0);
        assert_eq!(nice_interval(7.0), 2.0);
        assert_eq!(nice_interval(20.0), 5.0);
        assert_eq!(nice_interval(37.0), 10.0);
        assert_eq!(nice_interval(100.0), 20.0);
        assert!((nice_interval(0.8) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_nice_interval_degenerate() {
        assert_eq!(nice_interval(0.0), 1.0);
        assert_eq!(nice_interval(-3.0), 1.0);
        assert_eq!(nice_interval(f64::NAN), 1.0);
        assert_eq!(nice_interval(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_axis_max_covers_data() {
        assert_eq!(axis_max(37.0, 10.0), 40.0);
        assert_eq!(axis_max(40.0, 10.0), 40.0);
        assert_eq!(axis_max(0.55, 0.2), 0.6);
    }

    #[test]
    fn test_from_max_floor() {
        let domain = AxisDomain::from_max(2.0, 5.0);
        assert_eq!(domain.min, 0.0);
        assert_eq!(domain.max, 5.0);
        assert_eq!(domain.interval, 1.0);

        let domain = AxisDomain::from_max(f64::NAN, 1.5);
        assert_eq!(domain.max, 1.5);
    }

    #[test]
    fn test_from_range_snaps_outward() {
        let domain = AxisDomain::from_range(-3.2, 17.5);
        assert_eq!(domain.interval, 5.0);
        assert_eq!(domain.min, -5.0);
        assert_eq!(domain.max, 20.0);
        assert_eq!(domain.ticks(), vec![-5.0, 0.0, 5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_from_range_zero_span() {
        let domain = AxisDomain::from_range(4.0, 4.0);
        assert!(domain.min <= 3.0);
        assert!(domain.max >= 5.0);
        assert!(domain.interval > 0.0);
    }

    #[test]
    fn test_domain_from_values_fallback() {
        let fallback = AxisDomain::new(0.0, 10.0, 2.0);
        let domain = domain_from_values(vec![f64::NAN, f64::INFINITY], fallback);
        assert_eq!(domain, fallback);

        let domain = domain_from_values(vec![1.0, f64::NAN, 9.0], fallback);
        assert_eq!(domain.max, 10.0);
    }

    #[test]
    fn test_min_max_skips_non_finite() {
        let mm = MinMax::from_values(vec![3.0, f64::NAN, -1.0, f64::NEG_INFINITY]).unwrap();
        assert_eq!(mm.min, -1.0);
        assert_eq!(mm.max, 3.0);
        assert!(MinMax::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_pad_range() {
        assert_eq!(pad_range(5.0, 5.0), (4.0, 6.0));
        let (lo, hi) = pad_range(0.0, 10.0);
        assert!(lo < 0.0 && hi > 10.0);
    }
}
