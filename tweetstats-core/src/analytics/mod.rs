//! Statistics engine and report assembler
//!
//! Derives summary tables from a flat record set:
//! - [`prepare`]: timestamp parsing, calendar fields, word counts, outlier filter
//! - [`grouping`]: yearly, monthly, per-user and per-industry tables
//! - [`trend`]: first-year versus last-year comparison with a significance test
//! - [`distribution`]: shape classification and percentiles
//! - [`engagement`]: word count versus engagement correlation
//! - [`patterns`]: hour, weekday and quarter histograms
//! - [`report`]: composes everything into a [`FullReport`]
//!
//! All computation is synchronous and pure over an immutable input.

pub mod distribution;
pub mod engagement;
pub mod grouping;
pub mod patterns;
pub mod prepare;
pub mod report;
pub mod trend;

pub use distribution::{DistributionReport, DistributionType, Percentile};
pub use engagement::{engagement_correlations, EngagementCorrelations};
pub use grouping::{
    industry_stats, monthly_stats, user_stats, yearly_stats, IndustryRow, MonthRow, UserRow,
    YearRow, MIN_MONTHLY_RECORDS,
};
pub use patterns::TimePatterns;
pub use prepare::{
    count_words, parse_date, Calendar, PreparedDataset, PreparedRecord, OUTLIER_WORD_THRESHOLD,
};
pub use report::{
    generate_report, DatasetInfo, DateRange, FullReport, SkewDirection, SummaryInsights,
    Variability,
};
pub use trend::{
    detect_trend, TrendOutcome, TrendReport, MEAN_TREND_THRESHOLD, MIN_SIGNIFICANCE_SAMPLES,
    SIGNIFICANCE_ALPHA, VOLATILITY_TREND_THRESHOLD,
};
