//! Distribution shape and percentiles.

use crate::stats::{kurtosis, quantile, round_to, skewness};
use serde::Serialize;

/// |skewness| below this (and |kurtosis| below [`NORMAL_KURTOSIS_LIMIT`])
/// classifies a distribution as normal.
pub const NORMAL_SKEW_LIMIT: f64 = 0.5;
/// Excess kurtosis limit for a normal classification.
pub const NORMAL_KURTOSIS_LIMIT: f64 = 1.0;

/// Percentiles reported for every distribution, in percent.
pub const PERCENTILES: [u8; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];

/// Coarse shape classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DistributionType {
    Normal,
    Skewed,
}

impl DistributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionType::Normal => "Normal",
            DistributionType::Skewed => "Skewed",
        }
    }

    /// Undefined shape statistics never count as normal.
    pub fn classify(skewness: Option<f64>, kurtosis: Option<f64>) -> Self {
        match (skewness, kurtosis) {
            (Some(s), Some(k))
                if s.abs() < NORMAL_SKEW_LIMIT && k.abs() < NORMAL_KURTOSIS_LIMIT =>
            {
                DistributionType::Normal
            }
            _ => DistributionType::Skewed,
        }
    }
}

/// One percentile of the word-count distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    /// e.g. `p95`
    pub label: &'static str,
    pub percent: u8,
    pub value: f64,
}

/// Shape diagnostics for the cleaned word counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub distribution_type: DistributionType,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub percentiles: Vec<Percentile>,
}

impl DistributionReport {
    /// `None` for an empty series.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let skew = skewness(values);
        let kurt = kurtosis(values);

        let percentiles = PERCENTILES
            .iter()
            .zip(PERCENTILE_LABELS)
            .filter_map(|(&percent, label)| {
                quantile(&sorted, f64::from(percent) / 100.0).map(|value| Percentile {
                    label,
                    percent,
                    value,
                })
            })
            .collect();

        Some(Self {
            distribution_type: DistributionType::classify(skew, kurt),
            skewness: skew.map(|s| round_to(s, 3)),
            kurtosis: kurt.map(|k| round_to(k, 3)),
            percentiles,
        })
    }

    /// Look up a percentile by percent.
    pub fn percentile(&self, percent: u8) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.percent == percent)
            .map(|p| p.value)
    }
}

const PERCENTILE_LABELS: [&str; 9] = ["p1", "p5", "p10", "p25", "p50", "p75", "p90", "p95", "p99"];
