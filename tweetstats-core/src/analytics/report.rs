//! Report assembly.
//!
//! [`generate_report`] is the single entry point the presentation side
//! calls. It prepares the record set, consults the field set once to decide
//! which optional sections apply, and composes every table into one
//! serializable [`FullReport`]. Missing optional columns degrade to empty
//! sections; only input-shape errors and precondition violations fail.

use super::distribution::{DistributionReport, DistributionType};
use super::engagement::{engagement_correlations, EngagementCorrelations};
use super::grouping::{
    industry_stats, monthly_stats, user_stats, yearly_stats, IndustryRow, MonthRow, UserRow,
    YearRow,
};
use super::patterns::TimePatterns;
use super::prepare::PreparedDataset;
use super::trend::{detect_trend, TrendOutcome};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::stats::BasicStats;
use crate::types::{Field, Fields, Provenance, RecordSet};
use serde::Serialize;
use std::collections::BTreeSet;

/// Coefficient of variation (percent) above which variability is high.
pub const HIGH_VARIABILITY_CV: f64 = 50.0;

/// The complete analysis of one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub dataset_info: DatasetInfo,
    /// Absent when no record survives outlier filtering
    pub overall_stats: Option<BasicStats>,
    pub yearly_stats: Vec<YearRow>,
    pub monthly_stats: Vec<MonthRow>,
    pub trends: TrendOutcome,
    pub distribution: Option<DistributionReport>,
    /// Empty unless all engagement counters are present
    pub engagement: EngagementCorrelations,
    pub user_comparison: Vec<UserRow>,
    /// Empty unless the industry column is present
    pub industry_comparison: Vec<IndustryRow>,
    pub insights: Option<SummaryInsights>,
    pub time_patterns: TimePatterns,
}

/// Counts and coverage of the analysed set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub total_tweets: usize,
    pub clean_tweets: usize,
    pub date_range: DateRange,
    pub unique_users: usize,
    pub source: Provenance,
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Which side of the median the mean falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewDirection {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variability {
    High,
    Moderate,
}

/// Headline reading of the overall statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryInsights {
    pub skew_direction: SkewDirection,
    pub variability: Variability,
    pub cv: Option<f64>,
    /// Q1 and Q3 of the overall word counts
    pub typical_range: (f64, f64),
    pub shape: DistributionType,
}

impl SummaryInsights {
    pub fn from_stats(stats: &BasicStats, shape: DistributionType) -> Self {
        Self {
            skew_direction: if stats.mean > stats.median {
                SkewDirection::Right
            } else {
                SkewDirection::Left
            },
            variability: match stats.cv {
                Some(cv) if cv > HIGH_VARIABILITY_CV => Variability::High,
                _ => Variability::Moderate,
            },
            cv: stats.cv,
            typical_range: (stats.q1, stats.q3),
            shape,
        }
    }
}

/// Analyse a record set.
///
/// Pure and deterministic: the same input and configuration produce the
/// same report.
pub fn generate_report(set: &RecordSet, config: &AnalysisConfig) -> Result<FullReport> {
    let data = PreparedDataset::prepare(set)?;
    let fields = data.fields();
    let cleaned = data.cleaned();
    let values = data.cleaned_word_counts();

    let overall_stats = if values.is_empty() {
        None
    } else {
        Some(BasicStats::compute(&values)?)
    };
    let distribution = DistributionReport::compute(&values);

    let yearly = yearly_stats(cleaned)?;
    let trends = detect_trend(&yearly, cleaned, config.significance_test)?;

    let user_comparison = if fields.contains(Field::Username) {
        user_stats(cleaned, fields)?
    } else {
        Vec::new()
    };
    let industry_comparison = if fields.contains(Field::Industry) {
        industry_stats(&user_comparison)
    } else {
        Vec::new()
    };

    let insights = overall_stats.as_ref().map(|stats| {
        let shape = distribution
            .as_ref()
            .map(|d| d.distribution_type)
            .unwrap_or(DistributionType::Skewed);
        SummaryInsights::from_stats(stats, shape)
    });

    let report = FullReport {
        dataset_info: dataset_info(&data),
        overall_stats,
        monthly_stats: monthly_stats(cleaned)?,
        yearly_stats: yearly,
        trends,
        distribution,
        engagement: engagement_correlations(cleaned, fields),
        user_comparison,
        industry_comparison,
        insights,
        time_patterns: TimePatterns::compute(cleaned),
    };

    tracing::info!(
        total = report.dataset_info.total_tweets,
        clean = report.dataset_info.clean_tweets,
        years = report.yearly_stats.len(),
        source = %report.dataset_info.source,
        "Generated report"
    );
    Ok(report)
}

fn dataset_info(data: &PreparedDataset) -> DatasetInfo {
    let full = data.full();
    let fmt = |ts: chrono::DateTime<chrono::Utc>| ts.format("%Y-%m-%d %H:%M:%S").to_string();

    let unique_users = if data.fields().contains(Field::Username) {
        full.iter()
            .filter_map(|r| r.username.as_deref())
            .collect::<BTreeSet<_>>()
            .len()
    } else {
        1
    };

    DatasetInfo {
        total_tweets: full.len(),
        clean_tweets: data.cleaned().len(),
        date_range: DateRange {
            start: full.iter().map(|r| r.date).min().map(fmt),
            end: full.iter().map(|r| r.date).max().map(fmt),
        },
        unique_users,
        source: data.provenance(),
        fields: data.fields().clone(),
    }
}
