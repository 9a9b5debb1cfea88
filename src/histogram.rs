// Aligning pre-binned group counts into bar series

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rank::order_groups;
use crate::scale::AxisDomain;

/// Smallest y-axis maximum for raw counts
pub const COUNT_AXIS_FLOOR: f64 = 5.0;

/// Smallest y-axis maximum for within-group proportions
pub const PROPORTION_AXIS_FLOOR: f64 = 1.5;

/// Bin edges plus per-group counts, one count per bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSpec {
    pub edges: Vec<f64>,
    pub groups: BTreeMap<String, Vec<f64>>,
}

impl HistogramSpec {
    pub fn bucket_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Bar series aligned to a shared bucket axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedHistogram {
    pub centers: Vec<f64>,
    pub labels: Vec<String>,
    pub series: Vec<GroupSeries>,
    pub y_axis: AxisDomain,
    pub normalized: bool,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Midpoint of each bucket, rounded to one decimal
pub fn bucket_centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| round1((w[0] + w[1]) / 2.0)).collect()
}

fn format_center(c: f64) -> String {
    if c.is_finite() {
        format!("{c:.1}")
    } else {
        String::from("-")
    }
}

/// Pad every group to the bucket count and optionally convert counts to
/// within-group proportions.
///
/// Missing, negative and non-finite counts read as zero. Counts beyond the
/// bucket count are dropped. Groups are ordered numeric-aware by name.
pub fn align_groups(spec: &HistogramSpec, normalize: bool) -> AlignedHistogram {
    align_groups_with_floors(spec, normalize, COUNT_AXIS_FLOOR, PROPORTION_AXIS_FLOOR)
}

/// [`align_groups`] with explicit y-axis floors for counts and proportions
pub fn align_groups_with_floors(
    spec: &HistogramSpec,
    normalize: bool,
    count_floor: f64,
    proportion_floor: f64,
) -> AlignedHistogram {
    let buckets = spec.bucket_count();
    let centers = bucket_centers(&spec.edges);
    let labels = centers.iter().map(|&c| format_center(c)).collect();

    let names = order_groups(spec.groups.keys().map(String::as_str));
    let mut series = Vec::with_capacity(names.len());
    for name in names {
        let counts = &spec.groups[&name];
        if counts.len() > buckets {
            tracing::warn!(group = %name, counts = counts.len(), buckets, "dropping counts past last bucket");
        }

        let mut values: Vec<f64> = (0..buckets)
            .map(|i| match counts.get(i) {
                Some(&c) if c.is_finite() && c > 0.0 => c,
                _ => 0.0,
            })
            .collect();

        if normalize {
            let total = values.iter().sum::<f64>().max(1.0);
            for v in &mut values {
                *v /= total;
            }
        }
        series.push(GroupSeries { name, values });
    }

    let observed = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    let floor = if normalize { proportion_floor } else { count_floor };

    AlignedHistogram {
        centers,
        labels,
        series,
        y_axis: AxisDomain::from_max(observed, floor),
        normalized: normalize,
    }
}

/// Position of `value` on the bucket axis, where bucket `i` is centered on `i`.
///
/// `None` when the value lies outside the edges or the edges are degenerate.
pub fn threshold_position(edges: &[f64], value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    edges.windows(2).enumerate().find_map(|(i, w)| {
        let (lo, hi) = (w[0], w[1]);
        if !(hi > lo) || value < lo || value > hi {
            return None;
        }
        Some(i as f64 - 0.5 + (value - lo) / (hi - lo))
    })
}
