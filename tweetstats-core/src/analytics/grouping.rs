//! Grouped statistics tables.
//!
//! Each table partitions the cleaned record set by a key and summarizes the
//! word counts of every partition with [`BasicStats`]. Empty partitions
//! cannot occur since partitions are built from the records themselves.

use super::prepare::PreparedRecord;
use crate::error::Result;
use crate::stats::{round_to, BasicStats};
use crate::types::{Field, Fields};
use serde::Serialize;
use std::collections::BTreeMap;

/// Year-month buckets with fewer records than this are left out of the
/// monthly table.
pub const MIN_MONTHLY_RECORDS: usize = 5;

/// One row of the yearly table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRow {
    pub year: i32,
    pub tweet_count: usize,
    #[serde(flatten)]
    pub stats: BasicStats,
}

/// One row of the monthly table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    /// `YYYY-MM`
    pub period: String,
    pub year: i32,
    pub month: u32,
    pub tweet_count: usize,
    #[serde(flatten)]
    pub stats: BasicStats,
}

/// One row of the user comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub username: String,
    /// Display name of the user's first record, else the username
    pub displayname: String,
    pub industry: Option<String>,
    pub tweet_count: usize,
    /// Sum of likes plus retweets; 0 when those columns are absent
    pub total_engagement: u64,
    #[serde(flatten)]
    pub stats: BasicStats,
}

/// One row of the industry comparison, rolled up from user rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryRow {
    pub industry: String,
    /// Mean of the users' mean word counts
    pub avg_words: f64,
    pub tweet_count: usize,
    /// Mean of the users' standard deviations, undefined ones ignored
    pub avg_std: Option<f64>,
    pub user_count: usize,
}

fn word_count(record: &PreparedRecord) -> f64 {
    f64::from(record.word_count)
}

/// Yearly table, ascending by year. Every year present gets a row.
pub fn yearly_stats(records: &[PreparedRecord]) -> Result<Vec<YearRow>> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.calendar.year)
            .or_default()
            .push(word_count(record));
    }

    groups
        .into_iter()
        .map(|(year, values)| {
            Ok(YearRow {
                year,
                tweet_count: values.len(),
                stats: BasicStats::compute(&values)?,
            })
        })
        .collect()
}

/// Monthly table, ascending by period, dropping sparse months.
pub fn monthly_stats(records: &[PreparedRecord]) -> Result<Vec<MonthRow>> {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.calendar.year, record.calendar.month))
            .or_default()
            .push(word_count(record));
    }

    let mut rows = Vec::new();
    for ((year, month), values) in groups {
        if values.len() < MIN_MONTHLY_RECORDS {
            tracing::debug!(year, month, count = values.len(), "Skipping sparse month");
            continue;
        }
        rows.push(MonthRow {
            period: format!("{year:04}-{month:02}"),
            year,
            month,
            tweet_count: values.len(),
            stats: BasicStats::compute(&values)?,
        });
    }
    Ok(rows)
}

#[derive(Default)]
struct UserAccumulator<'a> {
    first: Option<&'a PreparedRecord>,
    values: Vec<f64>,
    likes: u64,
    retweets: u64,
}

/// User comparison table, ordered by username.
///
/// Records without a username are not attributed to anyone.
pub fn user_stats(records: &[PreparedRecord], fields: &Fields) -> Result<Vec<UserRow>> {
    let with_engagement = fields.contains_all(&[Field::LikeCount, Field::RetweetCount]);

    let mut groups: BTreeMap<&str, UserAccumulator<'_>> = BTreeMap::new();
    for record in records {
        let Some(username) = record.username.as_deref() else {
            continue;
        };
        let acc = groups.entry(username).or_default();
        acc.first.get_or_insert(record);
        acc.values.push(word_count(record));
        acc.likes = acc.likes.saturating_add(record.like_count.unwrap_or(0));
        acc.retweets = acc.retweets.saturating_add(record.retweet_count.unwrap_or(0));
    }

    groups
        .into_iter()
        .map(|(username, acc)| {
            let first = acc.first;
            Ok(UserRow {
                username: username.to_string(),
                displayname: first
                    .and_then(|r| r.displayname.clone())
                    .unwrap_or_else(|| username.to_string()),
                industry: first.and_then(|r| r.industry.clone()),
                tweet_count: acc.values.len(),
                total_engagement: if with_engagement {
                    acc.likes.saturating_add(acc.retweets)
                } else {
                    0
                },
                stats: BasicStats::compute(&acc.values)?,
            })
        })
        .collect()
}

/// Industry comparison rolled up from the user table, ordered by industry.
///
/// Users without an industry are left out.
pub fn industry_stats(users: &[UserRow]) -> Vec<IndustryRow> {
    let mut groups: BTreeMap<&str, Vec<&UserRow>> = BTreeMap::new();
    for user in users {
        if let Some(industry) = user.industry.as_deref() {
            groups.entry(industry).or_default().push(user);
        }
    }

    groups
        .into_iter()
        .map(|(industry, members)| {
            let user_count = members.len();
            let avg_words = members.iter().map(|u| u.stats.mean).sum::<f64>() / user_count as f64;
            let stds: Vec<f64> = members.iter().filter_map(|u| u.stats.std).collect();
            let avg_std = if stds.is_empty() {
                None
            } else {
                Some(round_to(stds.iter().sum::<f64>() / stds.len() as f64, 2))
            };
            IndustryRow {
                industry: industry.to_string(),
                avg_words: round_to(avg_words, 2),
                tweet_count: members.iter().map(|u| u.tweet_count).sum(),
                avg_std,
                user_count,
            }
        })
        .collect()
}
