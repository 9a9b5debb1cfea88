// Mapping per-metric value domains onto a shared percent display range

use std::collections::BTreeMap;

use crate::scale::MinMax;

/// Display range the domain is stretched over
pub const DISPLAY_LOW: f64 = 8.0;
pub const DISPLAY_HIGH: f64 = 92.0;

/// Hard bounds applied after mapping
pub const CLAMP_LOW: f64 = 4.0;
pub const CLAMP_HIGH: f64 = 96.0;

/// Returned for degenerate domains and non-finite values
pub const MIDPOINT: f64 = 50.0;

const DEGENERATE_SPAN: f64 = 1e-9;

/// Map `value` linearly from `[domain_min, domain_max]` onto `[8, 92]`, clamped to `[4, 96]`
pub fn normalize_to_display_range(value: f64, domain_min: f64, domain_max: f64) -> f64 {
    if !(domain_min.is_finite() && domain_max.is_finite())
        || (domain_max - domain_min).abs() < DEGENERATE_SPAN
        || !value.is_finite()
    {
        return MIDPOINT;
    }

    let t = (value - domain_min) / (domain_max - domain_min);
    (DISPLAY_LOW + t * (DISPLAY_HIGH - DISPLAY_LOW)).clamp(CLAMP_LOW, CLAMP_HIGH)
}

/// Independent value domain for every metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricDomains {
    domains: BTreeMap<String, MinMax>,
}

impl MetricDomains {
    /// Collect `(metric, value)` observations; non-finite values are ignored
    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut domains: BTreeMap<String, MinMax> = BTreeMap::new();
        for (metric, value) in observations {
            let Some(point) = MinMax::from_values([value]) else {
                continue;
            };
            domains
                .entry(metric.to_string())
                .and_modify(|d| *d = d.merge(point))
                .or_insert(point);
        }
        Self { domains }
    }

    pub fn get(&self, metric: &str) -> Option<MinMax> {
        self.domains.get(metric).copied()
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Display position of `value` within its own metric's domain
    pub fn position(&self, metric: &str, value: f64) -> f64 {
        match self.domains.get(metric) {
            Some(d) => normalize_to_display_range(value, d.min, d.max),
            None => {
                tracing::debug!(metric, "no domain for metric, using midpoint");
                MIDPOINT
            }
        }
    }
}
