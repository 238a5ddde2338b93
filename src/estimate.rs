//! Statistical estimation backend.
//!
//! The recipe dispatcher never estimates anything itself; statistics that
//! need real numerics (binning, quartiles, kernel density, summaries) are
//! computed here and reached only through a statistic tag.
//!
//! # References
//!
//! - Silverman, B. W. (1986). *Density Estimation for Statistics and Data Analysis*.
//! - Tukey, J. W. (1977). *Exploratory Data Analysis*.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use trueno::Vector;

/// Drop NaN and infinite values.
#[must_use]
pub fn finite(values: &[f32]) -> Vec<f32> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn sorted(values: &[f32]) -> Vec<f32> {
    let mut out = finite(values);
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Min and max of the finite values, or `None` if there are none.
#[must_use]
pub fn extent(values: &[f32]) -> Option<(f32, f32)> {
    let clean = finite(values);
    if clean.is_empty() {
        return None;
    }
    let vec = Vector::from_vec(clean);
    let min = vec.min().unwrap_or(f32::NAN);
    let max = vec.max().unwrap_or(f32::NAN);
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

fn mean(values: &[f32]) -> f32 {
    Vector::from_slice(values).mean().unwrap_or(f32::NAN)
}

fn std_dev(values: &[f32]) -> f32 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f32>() / (values.len() - 1) as f32;
    var.sqrt()
}

// ============================================================================
// Binning
// ============================================================================

/// One histogram bin, `[x0, x1)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Left edge.
    pub x0: f32,
    /// Right edge.
    pub x1: f32,
    /// Number of values falling in the bin.
    pub count: usize,
}

impl Bin {
    /// Bin midpoint.
    #[must_use]
    pub fn center(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Count `values` into `bins` equal-width bins over `range`.
///
/// Values outside the range are ignored. A degenerate range becomes a unit
/// wide bin centred on the value.
#[must_use]
pub fn bin(values: &[f32], range: (f32, f32), bins: usize) -> Vec<Bin> {
    let bins = bins.max(1);
    let (lo, hi) = if (range.1 - range.0).abs() < f32::EPSILON {
        (range.0 - 0.5, range.1 + 0.5)
    } else {
        range
    };
    let width = (hi - lo) / bins as f32;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            x0: lo + i as f32 * width,
            x1: lo + (i + 1) as f32 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ============================================================================
// Box statistics
// ============================================================================

/// Five-number summary plus outliers, Tukey style.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Lower whisker end (smallest value within 1.5 IQR of Q1).
    pub lower: f32,
    /// First quartile.
    pub q1: f32,
    /// Median.
    pub median: f32,
    /// Third quartile.
    pub q3: f32,
    /// Upper whisker end (largest value within 1.5 IQR of Q3).
    pub upper: f32,
    /// Values beyond the whiskers.
    pub outliers: Vec<f32>,
}

impl BoxStats {
    /// Compute box statistics; `None` when no finite values exist.
    #[must_use]
    pub fn from_data(values: &[f32]) -> Option<Self> {
        let sorted = sorted(values);
        if sorted.is_empty() {
            return None;
        }

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(sorted[0]);
        let upper = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(sorted[sorted.len() - 1]);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self {
            lower,
            q1,
            median,
            q3,
            upper,
            outliers,
        })
    }
}

/// Box statistics of `values`; `None` when no finite values exist.
#[must_use]
pub fn box_stats(values: &[f32]) -> Option<BoxStats> {
    BoxStats::from_data(values)
}

/// Percentile of sorted data with linear interpolation (R type 7).
#[must_use]
pub fn percentile(sorted: &[f32], p: f32) -> f32 {
    match sorted.len() {
        0 => f32::NAN,
        1 => sorted[0],
        n => {
            let k = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f32;
            let f = k.floor() as usize;
            let c = (k.ceil() as usize).min(n - 1);
            let d = k - f as f32;
            sorted[f] * (1.0 - d) + sorted[c] * d
        }
    }
}

// ============================================================================
// Kernel density
// ============================================================================

/// Silverman's rule of thumb (`bw.nrd0`).
#[must_use]
pub fn silverman_bandwidth(values: &[f32]) -> f32 {
    let sorted = sorted(values);
    let n = sorted.len();
    if n < 2 {
        return 1.0;
    }
    let sd = std_dev(&sorted);
    let iqr = percentile(&sorted, 75.0) - percentile(&sorted, 25.0);
    let spread = match (sd > 0.0, iqr > 0.0) {
        (true, true) => sd.min(iqr / 1.34),
        (true, false) => sd,
        (false, true) => iqr / 1.34,
        (false, false) => sorted[0].abs().max(1.0),
    };
    0.9 * spread * (n as f32).powf(-0.2)
}

/// Gaussian kernel density evaluated at `n_points` evenly spaced positions
/// across the data range. Densities integrate to roughly one.
#[must_use]
pub fn kde(values: &[f32], bandwidth: Option<f32>, n_points: usize) -> Vec<(f32, f32)> {
    let clean = finite(values);
    let Some((lo, hi)) = extent(&clean) else {
        return Vec::new();
    };
    if (hi - lo).abs() < f32::EPSILON {
        return vec![(lo, 1.0)];
    }

    let h = bandwidth
        .filter(|b| *b > 0.0)
        .unwrap_or_else(|| silverman_bandwidth(&clean));
    let n_points = n_points.max(2);
    let step = (hi - lo) / (n_points - 1) as f32;
    let norm = 1.0 / (clean.len() as f32 * h * (2.0 * std::f32::consts::PI).sqrt());

    (0..n_points)
        .map(|i| {
            let x = lo + i as f32 * step;
            let density: f32 = clean
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / h;
                    (-0.5 * u * u).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

// ============================================================================
// Summaries
// ============================================================================

/// Summary function for the `summary` statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFun {
    /// Mean with ± one standard error (ggplot2's `mean_se`).
    #[default]
    MeanSe,
    /// Mean with ± one standard deviation.
    MeanSd,
    /// Mean only.
    Mean,
    /// Median with min/max range.
    Median,
    /// Sum.
    Sum,
}

impl fmt::Display for SummaryFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MeanSe => "mean_se",
            Self::MeanSd => "mean_sd",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Sum => "sum",
        };
        f.write_str(name)
    }
}

/// A summarised value with its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Central value.
    pub y: f32,
    /// Interval lower bound.
    pub ymin: f32,
    /// Interval upper bound.
    pub ymax: f32,
}

/// Summarise the finite `values`; `None` when there are none.
#[must_use]
pub fn summarise(values: &[f32], fun: SummaryFun) -> Option<Summary> {
    let clean = finite(values);
    if clean.is_empty() {
        return None;
    }

    let summary = match fun {
        SummaryFun::Mean => {
            let m = mean(&clean);
            Summary {
                y: m,
                ymin: m,
                ymax: m,
            }
        }
        SummaryFun::MeanSe => {
            let m = mean(&clean);
            let se = std_dev(&clean) / (clean.len() as f32).sqrt();
            Summary {
                y: m,
                ymin: m - se,
                ymax: m + se,
            }
        }
        SummaryFun::MeanSd => {
            let m = mean(&clean);
            let sd = std_dev(&clean);
            Summary {
                y: m,
                ymin: m - sd,
                ymax: m + sd,
            }
        }
        SummaryFun::Median => {
            let s = sorted(&clean);
            Summary {
                y: percentile(&s, 50.0),
                ymin: s[0],
                ymax: s[s.len() - 1],
            }
        }
        SummaryFun::Sum => {
            let total = clean.iter().sum();
            Summary {
                y: total,
                ymin: total,
                ymax: total,
            }
        }
    };
    Some(summary)
}
