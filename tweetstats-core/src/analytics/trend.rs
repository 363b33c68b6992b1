//! First-year versus last-year trend detection.
//!
//! Only the two endpoint years of the yearly table are compared; this is
//! not a regression. Percent changes are taken against the first year and
//! gated by fixed thresholds before a description line is emitted.

use super::grouping::YearRow;
use super::prepare::PreparedRecord;
use crate::error::{Error, Result};
use crate::stats::{round_to, t_test, SignificanceTest};
use serde::Serialize;

/// |mean change| above this many percent produces a description line.
pub const MEAN_TREND_THRESHOLD: f64 = 10.0;

/// |std change| above this many percent produces a description line.
pub const VOLATILITY_TREND_THRESHOLD: f64 = 20.0;

/// Both endpoint years need strictly more records than this for the
/// significance test to run.
pub const MIN_SIGNIFICANCE_SAMPLES: usize = 10;

/// p-values below this are reported as a significant change.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Result of trend detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    /// Fewer than two distinct years
    Insufficient { message: String },
    Detected(TrendReport),
}

impl TrendOutcome {
    pub fn report(&self) -> Option<&TrendReport> {
        match self {
            TrendOutcome::Detected(report) => Some(report),
            TrendOutcome::Insufficient { .. } => None,
        }
    }
}

/// Endpoint comparison between the first and last year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub first_year: i32,
    pub last_year: i32,
    /// Percent change of the mean word count, 1 decimal
    pub mean_trend: f64,
    /// Percent change of the standard deviation, 1 decimal; absent when
    /// either endpoint year has an undefined std
    pub volatility_trend: Option<f64>,
    /// Absolute change of the mean word count
    pub mean_change: f64,
    /// Absolute change of the standard deviation
    pub std_change: Option<f64>,
    /// Present only when both endpoint years have enough records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_change: Option<bool>,
    /// Two-sided p-value, 4 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<SignificanceTest>,
    pub description: Vec<String>,
}

/// Compare the first and last rows of `yearly`.
///
/// `records` is the cleaned record set the rows were computed from; the
/// endpoint years' raw word counts are drawn from it for the significance
/// test. A zero reference mean or std is a [`Error::ZeroBaseline`].
pub fn detect_trend(
    yearly: &[YearRow],
    records: &[PreparedRecord],
    test: SignificanceTest,
) -> Result<TrendOutcome> {
    let mut rows: Vec<&YearRow> = yearly.iter().collect();
    rows.sort_by_key(|row| row.year);

    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if rows.len() >= 2 => (*first, *last),
        _ => {
            tracing::debug!(years = rows.len(), "Not enough years for trend detection");
            return Ok(TrendOutcome::Insufficient {
                message: "Insufficient years for trend detection".to_string(),
            });
        }
    };

    if first.stats.mean == 0.0 {
        return Err(Error::ZeroBaseline {
            metric: "mean",
            year: first.year,
        });
    }
    let mean_change = last.stats.mean - first.stats.mean;
    let mean_pct = mean_change / first.stats.mean * 100.0;

    let std_pair = match (first.stats.std, last.stats.std) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => None,
    };
    let std_pct = match std_pair {
        Some((a, _)) if a == 0.0 => {
            return Err(Error::ZeroBaseline {
                metric: "std",
                year: first.year,
            })
        }
        Some((a, b)) => Some((b - a) / a * 100.0),
        None => None,
    };

    let first_values = year_values(records, first.year);
    let last_values = year_values(records, last.year);
    let ttest = if first_values.len() > MIN_SIGNIFICANCE_SAMPLES
        && last_values.len() > MIN_SIGNIFICANCE_SAMPLES
    {
        t_test(&first_values, &last_values, test)
    } else {
        None
    };

    let mut description = Vec::new();
    if mean_pct.abs() > MEAN_TREND_THRESHOLD {
        let direction = if mean_pct > 0.0 { "increased" } else { "decreased" };
        description.push(format!(
            "Average tweet length has {direction} by {:.1}%",
            mean_pct.abs()
        ));
    }
    if let Some(pct) = std_pct.filter(|p| p.abs() > VOLATILITY_TREND_THRESHOLD) {
        let (direction, arrow) = if pct > 0.0 {
            ("more variable", "up")
        } else {
            ("more consistent", "down")
        };
        description.push(format!(
            "Tweeting has become {direction} (volatility {arrow} {:.1}%)",
            pct.abs()
        ));
    }

    tracing::debug!(
        first_year = first.year,
        last_year = last.year,
        mean_pct,
        tested = ttest.is_some(),
        "Detected trend"
    );

    Ok(TrendOutcome::Detected(TrendReport {
        first_year: first.year,
        last_year: last.year,
        mean_trend: round_to(mean_pct, 1),
        volatility_trend: std_pct.map(|p| round_to(p, 1)),
        mean_change: round_to(mean_change, 2),
        std_change: std_pair.map(|(a, b)| round_to(b - a, 2)),
        significant_change: ttest.map(|t| t.p_value < SIGNIFICANCE_ALPHA),
        p_value: ttest.map(|t| round_to(t.p_value, 4)),
        test: ttest.map(|_| test),
        description,
    }))
}

fn year_values(records: &[PreparedRecord], year: i32) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.calendar.year == year)
        .map(|r| f64::from(r.word_count))
        .collect()
}
