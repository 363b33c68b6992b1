//! Record selection by author, year and length.

use crate::analytics::{count_words, parse_date};
use crate::error::{Error, Result};
use crate::types::{Record, RecordSet};
use chrono::Datelike;
use std::collections::BTreeSet;

/// Criteria for selecting records from a set. An empty filter selects
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Username, compared case-insensitively
    pub username: Option<String>,
    /// Calendar years to keep; empty keeps all years
    pub years: BTreeSet<i32>,
    /// Minimum word count (inclusive)
    pub min_words: Option<u32>,
    /// Maximum word count (inclusive)
    pub max_words: Option<u32>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    pub fn with_word_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_words = min;
        self.max_words = max;
        self
    }

    /// True when the filter selects every record.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.years.is_empty()
            && self.min_words.is_none()
            && self.max_words.is_none()
    }

    /// Whether `record` satisfies every criterion.
    ///
    /// Records whose date cannot be parsed never match a year criterion.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(wanted) = &self.username {
            match &record.username {
                Some(name) if name.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }

        if !self.years.is_empty() {
            let year = record.date.as_ref().and_then(parse_date).map(|d| d.year());
            if !year.is_some_and(|y| self.years.contains(&y)) {
                return false;
            }
        }

        if self.min_words.is_some() || self.max_words.is_some() {
            let words = record
                .word_count
                .or_else(|| record.content.as_deref().map(count_words))
                .unwrap_or(0);
            if self.min_words.is_some_and(|min| words < min)
                || self.max_words.is_some_and(|max| words > max)
            {
                return false;
            }
        }

        true
    }

    /// The records of `set` that match.
    pub fn apply(&self, set: &RecordSet) -> RecordSet {
        if self.is_empty() {
            return set.clone();
        }
        set.retain_where(|r| self.matches(r))
    }

    /// Like [`apply`](Self::apply), but a non-empty filter that selects
    /// nothing is [`Error::NoMatchingRecords`].
    pub fn select(&self, set: &RecordSet) -> Result<RecordSet> {
        let selected = self.apply(set);
        if selected.is_empty() && !self.is_empty() {
            return Err(Error::NoMatchingRecords(self.to_string()));
        }
        tracing::debug!(
            before = set.len(),
            after = selected.len(),
            "Applied record filter"
        );
        Ok(selected)
    }
}

impl std::fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(user) = &self.username {
            parts.push(format!("user @{user}"));
        }
        if !self.years.is_empty() {
            let years: Vec<String> = self.years.iter().map(ToString::to_string).collect();
            parts.push(format!("years {}", years.join(",")));
        }
        match (self.min_words, self.max_words) {
            (Some(min), Some(max)) => parts.push(format!("{min}-{max} words")),
            (Some(min), None) => parts.push(format!(">= {min} words")),
            (None, Some(max)) => parts.push(format!("<= {max} words")),
            (None, None) => {}
        }
        if parts.is_empty() {
            f.write_str("all records")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}
