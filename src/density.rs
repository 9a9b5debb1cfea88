// Gaussian kernel density estimation

use anyhow::{bail, Result};
use serde::Serialize;

use crate::scale::MinMax;

/// Intervals in the evaluation grid; the grid has one more point than this
pub const GRID_INTERVALS: usize = 220;

/// Fraction of the sample span added on each side of the grid
pub const GRID_PADDING: f64 = 0.15;

/// A density estimate evaluated on a grid. Heights are not rescaled to unit area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}

impl DensityCurve {
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.density.iter().copied()).collect()
    }

    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// One region of a pooled density curve, zero outside `[lower, upper]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensitySegment {
    pub region: usize,
    pub lower: f64,
    pub upper: f64,
    pub curve: DensityCurve,
}

/// Standard normal density
pub fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Evaluate the Gaussian KDE of `samples` at every point of `points`
pub fn kde(samples: &[f64], bandwidth: f64, points: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || !(bandwidth.is_finite() && bandwidth > 0.0) {
        return vec![0.0; points.len()];
    }

    let norm = finite.len() as f64 * bandwidth;
    points
        .iter()
        .map(|&x| {
            let sum: f64 = finite.iter().map(|&xi| gaussian_kernel((x - xi) / bandwidth)).sum();
            sum / norm
        })
        .collect()
}

// Computed on samples scaled into [-1, 1] so sums cannot overflow
fn std_dev(samples: &[f64]) -> f64 {
    let scale = samples.iter().fold(0.0, |m: f64, x| m.max(x.abs()));
    if !(scale > 0.0 && scale.is_finite()) {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|x| x / scale).sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x / scale - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt() * scale
}

/// Silverman's rule of thumb, guarded for tiny or flat samples.
///
/// `span` is the width of the domain the curve is drawn over.
pub fn select_bandwidth(samples: &[f64], span: f64) -> f64 {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    // an overflowed span is still wider than anything representable
    let span = if span.is_nan() { 0.0 } else { span.abs().min(f64::MAX) };

    if finite.len() <= 1 {
        return (span * 0.2).max(0.05);
    }

    let n = finite.len() as f64;
    let rule = 1.06 * std_dev(&finite) * n.powf(-0.2);
    let h = if rule.is_finite() && rule > 0.0 {
        rule
    } else {
        tracing::debug!(rule, span, "bandwidth rule degenerate, using span fallback");
        span * 0.1
    };
    h.max((span * 0.02).max(0.02))
}

/// Equally spaced grid over `[min, max]` padded by 15% of the span on each side.
///
/// A zero-width range is widened to one unit on each side first. Spans are
/// taken on halved bounds and the padded ends clamp to the finite range, so
/// samples near `f64::MAX` still give a finite grid.
pub fn evaluation_grid(min: f64, max: f64, intervals: usize) -> Vec<f64> {
    let intervals = intervals.max(1);
    let (min, max) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
    let half_pad = (max / 2.0 - min / 2.0) * GRID_PADDING;
    let start = (min - half_pad * 2.0).max(f64::MIN);
    let end = (max + half_pad * 2.0).min(f64::MAX);
    let half_step = (end / 2.0 - start / 2.0) / intervals as f64;
    (0..=intervals)
        .map(|i| (2.0 * (start / 2.0 + i as f64 * half_step)).clamp(start, end))
        .collect()
}

/// Density of a single sample set on its own padded grid; `None` without finite samples
pub fn estimate(samples: &[f64]) -> Option<DensityCurve> {
    estimate_shared(&[samples], GRID_INTERVALS).into_iter().next().flatten()
}

/// Densities of several sample sets on one grid spanning all of them.
///
/// Sets without finite samples yield `None` in their slot.
pub fn estimate_shared(sets: &[&[f64]], intervals: usize) -> Vec<Option<DensityCurve>> {
    let extent = sets
        .iter()
        .filter_map(|s| MinMax::from_values(s.iter().copied()))
        .reduce(MinMax::merge);

    let Some(extent) = extent else {
        return vec![None; sets.len()];
    };

    let grid = evaluation_grid(extent.min, extent.max, intervals);
    sets.iter()
        .map(|samples| {
            MinMax::from_values(samples.iter().copied())?;
            let h = select_bandwidth(samples, extent.span());
            Some(DensityCurve {
                x: grid.clone(),
                density: kde(samples, h, &grid),
            })
        })
        .collect()
}

/// Split one pooled density curve into colored regions at threshold boundaries.
///
/// The density is computed once and masked per region so neighbouring
/// regions meet at the same height. Zero boundaries give one region, one
/// gives two, two give three; more boundaries are rejected.
pub fn segment_density(
    samples: &[f64],
    boundaries: &[f64],
    intervals: usize,
) -> Result<Vec<DensitySegment>> {
    let mut cuts: Vec<f64> = boundaries.iter().copied().filter(|b| b.is_finite()).collect();
    if cuts.len() > 2 {
        bail!(
            "segmented density supports at most 2 boundaries (3 regions), got {}",
            cuts.len()
        );
    }
    cuts.sort_by(f64::total_cmp);

    let Some(pooled) = estimate_shared(&[samples], intervals).into_iter().next().flatten() else {
        return Ok(Vec::new());
    };

    let mut edges = Vec::with_capacity(cuts.len() + 2);
    edges.push(f64::NEG_INFINITY);
    edges.extend(cuts);
    edges.push(f64::INFINITY);

    let segments = edges
        .windows(2)
        .enumerate()
        .map(|(region, w)| {
            let (lower, upper) = (w[0], w[1]);
            let density = pooled
                .x
                .iter()
                .zip(&pooled.density)
                .map(|(&x, &d)| if x >= lower && x <= upper { d } else { 0.0 })
                .collect();
            DensitySegment {
                region,
                lower,
                upper,
                curve: DensityCurve {
                    x: pooled.x.clone(),
                    density,
                },
            }
        })
        .collect();

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(curve: &DensityCurve) -> f64 {
        curve
            .x
            .windows(2)
            .zip(curve.density.windows(2))
            .map(|(x, d)| (x[1] - x[0]) * (d[0] + d[1]) / 2.0)
            .sum()
    }

    #[test]
    fn test_kernel_peak() {
        assert!((gaussian_kernel(0.0) - 0.3989422804014327).abs() < 1e-12);
        assert!(gaussian_kernel(3.0) < gaussian_kernel(1.0));
    }

    #[test]
    fn test_kde_single_point_is_kernel() {
        let d = kde(&[0.0], 1.0, &[0.0, 1.0]);
        assert!((d[0] - gaussian_kernel(0.0)).abs() < 1e-12);
        assert!((d[1] - gaussian_kernel(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_kde_guards() {
        assert_eq!(kde(&[], 1.0, &[0.0, 1.0]), vec![0.0, 0.0]);
        assert_eq!(kde(&[1.0], 0.0, &[0.0]), vec![0.0]);
        assert_eq!(kde(&[f64::NAN], 1.0, &[0.0]), vec![0.0]);
    }

    #[test]
    fn test_bandwidth_rules() {
        // single point has no spread
        assert_eq!(select_bandwidth(&[3.0], 10.0), 2.0);
        assert_eq!(select_bandwidth(&[3.0], 0.0), 0.05);

        // flat samples clamp to the floor
        assert_eq!(select_bandwidth(&[2.0, 2.0, 2.0], 0.0), 0.02);
        assert_eq!(select_bandwidth(&[2.0, 2.0, 2.0], 10.0), 1.0);

        let samples: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = select_bandwidth(&samples, 99.0);
        let expected = 1.06 * std_dev(&samples) * 100f64.powf(-0.2);
        assert!((h - expected).abs() < 1e-9);
    }

    #[test]
    fn test_grid_padding() {
        let grid = evaluation_grid(0.0, 10.0, GRID_INTERVALS);
        assert_eq!(grid.len(), GRID_INTERVALS + 1);
        assert!((grid[0] + 1.5).abs() < 1e-12);
        assert!((grid[GRID_INTERVALS] - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_shape() {
        let curve = estimate(&[1.0, 2.0, 2.5, 3.0, 7.0]).unwrap();
        assert_eq!(curve.x.len(), 221);
        assert_eq!(curve.density.len(), 221);
        assert!(curve.density.iter().all(|d| d.is_finite() && *d >= 0.0));
        // most mass lands inside the padded grid
        assert!(area(&curve) > 0.8);
    }

    #[test]
    fn test_estimate_extreme_values() {
        let curve = estimate(&[-1e308, 1e308]).unwrap();
        assert_eq!(curve.x.len(), 221);
        assert!(curve.x.iter().all(|x| x.is_finite()));
        assert!(curve.x.windows(2).all(|w| w[0] <= w[1]));
        assert!(curve.density.iter().all(|d| d.is_finite() && *d >= 0.0));

        let edge = estimate(&[f64::MAX, f64::MIN, 0.0]).unwrap();
        assert_eq!(edge.x[0], f64::MIN);
        assert!(edge.x.iter().all(|x| x.is_finite()));
        assert!(edge.density.iter().all(|d| d.is_finite() && *d >= 0.0));
    }

    #[test]
    fn test_std_dev_does_not_overflow() {
        let sd = std_dev(&[-1e308, 1e308]);
        assert!(sd.is_finite());
        assert!((sd / 1e308 - 2f64.sqrt()).abs() < 1e-12);
        assert!(select_bandwidth(&[-1e308, 1e308], f64::INFINITY).is_finite());
    }

    #[test]
    fn test_estimate_empty() {
        assert!(estimate(&[]).is_none());
        assert!(estimate(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_shared_grid() {
        let a = [0.0, 1.0, 2.0];
        let b = [10.0, 11.0];
        let empty: [f64; 0] = [];
        let curves = estimate_shared(&[&a[..], &b[..], &empty[..]], 50);
        assert_eq!(curves.len(), 3);
        let ca = curves[0].as_ref().unwrap();
        let cb = curves[1].as_ref().unwrap();
        assert_eq!(ca.x, cb.x);
        assert!(curves[2].is_none());
        assert!(ca.x[0] < 0.0 && *ca.x.last().unwrap() > 11.0);
    }

    #[test]
    fn test_segments_mask_pooled_curve() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let segments = segment_density(&samples, &[4.5, 2.5], 100).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].upper, 2.5);
        assert_eq!(segments[1].lower, 2.5);
        assert_eq!(segments[2].lower, 4.5);

        let pooled = estimate_shared(&[&samples[..]], 100).remove(0).unwrap();
        for (i, x) in pooled.x.iter().enumerate() {
            let covering: Vec<f64> = segments
                .iter()
                .map(|s| s.curve.density[i])
                .filter(|d| *d > 0.0)
                .collect();
            assert!(!covering.is_empty(), "x = {x} not covered");
            for d in covering {
                assert_eq!(d, pooled.density[i]);
            }
        }
    }

    #[test]
    fn test_segments_without_boundaries() {
        let segments = segment_density(&[1.0, 2.0], &[], 20).unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].curve.density.iter().all(|d| *d > 0.0));
    }

    #[test]
    fn test_segments_reject_three_boundaries() {
        assert!(segment_density(&[1.0, 2.0], &[1.0, 2.0, 3.0], 20).is_err());
    }
}
