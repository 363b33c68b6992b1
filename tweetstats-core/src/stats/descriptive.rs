//! Descriptive statistics.
//!
//! Estimators follow the conventions of common dataframe libraries so that
//! reported numbers match what an analyst would get there:
//! - variance and standard deviation use the sample (n - 1) denominator
//! - skewness is the adjusted Fisher-Pearson coefficient G1
//! - kurtosis is bias-corrected excess kurtosis G2
//! - quantiles interpolate linearly between closest ranks

use super::round_to;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Central moments below this are treated as zero (constant series).
const ZERO_MOMENT: f64 = 1e-14;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator), `None` below two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (n - 1) as f64)
}

/// Quantile of an ascending-sorted slice, `p` in `[0, 1]`.
///
/// Uses linear interpolation at rank `(n - 1) * p`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = (sorted.len() - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let frac = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Sums of squared, cubed and fourth-power deviations from the mean.
fn deviation_sums(values: &[f64]) -> (f64, f64, f64) {
    let m = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    })
}

/// Adjusted Fisher-Pearson skewness, `None` below three values.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let (s2, s3, _) = deviation_sums(values);
    let m2 = s2 / nf;
    if m2 < ZERO_MOMENT {
        return Some(0.0);
    }
    let m3 = s3 / nf;
    let g1 = m3 / m2.powf(1.5);
    Some((nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1)
}

/// Bias-corrected excess kurtosis, `None` below four values.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let nf = n as f64;
    let (s2, _, s4) = deviation_sums(values);
    if s2 / nf < ZERO_MOMENT {
        return Some(0.0);
    }
    let numerator = nf * (nf + 1.0) * (nf - 1.0) * s4;
    let denominator = (nf - 2.0) * (nf - 3.0) * s2 * s2;
    let adj = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(numerator / denominator - adj)
}

/// Most frequent value of an ascending-sorted slice; the smallest wins ties.
fn mode_sorted(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

/// Fixed-shape summary of one numeric series.
///
/// Rounding: mean/std/variance/cv to 2 places, skewness/kurtosis to 3;
/// order statistics and their differences keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    /// Sample standard deviation (absent below two values)
    pub std: Option<f64>,
    /// Sample variance (absent below two values)
    pub variance: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Absent below three values
    pub skewness: Option<f64>,
    /// Absent below four values
    pub kurtosis: Option<f64>,
    /// Coefficient of variation in percent; 0 when the mean is 0
    pub cv: Option<f64>,
}

impl BasicStats {
    /// Summarize a non-empty series.
    ///
    /// An empty series is a precondition violation and returns
    /// [`Error::EmptySeries`]; callers skip empty groups before calling.
    pub fn compute(values: &[f64]) -> Result<Self> {
        let mean_raw = mean(values)
            .ok_or_else(|| Error::EmptySeries("basic statistics need at least one value".into()))?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let median = quantile(&sorted, 0.5).unwrap_or(min);
        let q1 = quantile(&sorted, 0.25).unwrap_or(min);
        let q3 = quantile(&sorted, 0.75).unwrap_or(max);
        let mode = mode_sorted(&sorted).unwrap_or(min);

        let variance_raw = sample_variance(values);
        let std_raw = variance_raw.map(f64::sqrt);

        let cv = std_raw.map(|std| {
            if mean_raw == 0.0 {
                0.0
            } else {
                round_to(std / mean_raw * 100.0, 2)
            }
        });

        Ok(Self {
            count: values.len(),
            mean: round_to(mean_raw, 2),
            median,
            mode,
            std: std_raw.map(|s| round_to(s, 2)),
            variance: variance_raw.map(|v| round_to(v, 2)),
            min,
            max,
            range: max - min,
            q1,
            q3,
            iqr: q3 - q1,
            skewness: skewness(values).map(|s| round_to(s, 3)),
            kurtosis: kurtosis(values).map(|k| round_to(k, 3)),
            cv,
        })
    }

    /// Minimum, Q1, median, Q3, maximum.
    pub fn five_number_summary(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}
