//! Word count versus engagement correlation.

use super::prepare::PreparedRecord;
use crate::stats::{pearson, round_to};
use crate::types::{Field, Fields};
use std::collections::BTreeMap;

/// Correlation coefficients keyed by engagement column name.
///
/// A `None` coefficient means the pairs were degenerate (fewer than two,
/// or a constant side).
pub type EngagementCorrelations = BTreeMap<&'static str, Option<f64>>;

const ENGAGEMENT_FIELDS: [Field; 3] = [Field::LikeCount, Field::RetweetCount, Field::ReplyCount];

fn counter(record: &PreparedRecord, field: Field) -> Option<u64> {
    match field {
        Field::LikeCount => record.like_count,
        Field::RetweetCount => record.retweet_count,
        Field::ReplyCount => record.reply_count,
        _ => None,
    }
}

/// Pearson correlation of word count with each engagement counter, rounded
/// to 3 decimals.
///
/// Empty unless the set carries all three counters. Records missing a
/// counter are skipped for that counter only.
pub fn engagement_correlations(
    records: &[PreparedRecord],
    fields: &Fields,
) -> EngagementCorrelations {
    let mut correlations = EngagementCorrelations::new();
    if !fields.has_engagement() {
        return correlations;
    }

    for field in ENGAGEMENT_FIELDS {
        let pairs: Vec<(f64, f64)> = records
            .iter()
            .filter_map(|r| counter(r, field).map(|c| (f64::from(r.word_count), c as f64)))
            .collect();
        correlations.insert(field.column_name(), pearson(&pairs).map(|r| round_to(r, 3)));
    }
    correlations
}
