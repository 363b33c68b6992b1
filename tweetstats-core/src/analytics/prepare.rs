//! Data preparation.
//!
//! Turns a [`RecordSet`] into typed, derived rows: parsed timestamps,
//! calendar fields and a word count for every record. The source set is
//! never modified. Preparation is all-or-nothing: one unparseable timestamp
//! fails the whole pass.

use crate::error::{Error, Result};
use crate::types::{DateValue, Field, Fields, Provenance, RecordSet};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use serde::Serialize;

/// Records with more words than this are outliers and excluded from the
/// cleaned set.
pub const OUTLIER_WORD_THRESHOLD: u32 = 100;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a date value, keeping the offset it was written with.
///
/// Structured timestamps pass through. Text is tried as RFC 3339, then as
/// a space-separated timestamp with offset, then as a naive timestamp or
/// bare date (interpreted as UTC).
pub fn parse_date(value: &DateValue) -> Option<DateTime<FixedOffset>> {
    let text = match value {
        DateValue::Timestamp(ts) => return Some(*ts),
        DateValue::Text(text) => text.trim(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(text, fmt) {
            return Some(ts);
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Whitespace-delimited token count.
pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count().min(u32::MAX as usize) as u32
}

/// Calendar fields derived from a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Calendar {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 1-4
    pub quarter: u32,
    /// Monday = 0 ... Sunday = 6
    pub weekday: u32,
    /// 0-23
    pub hour: u32,
}

impl Calendar {
    /// Fields as read on the timestamp's own wall clock.
    pub fn from_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> Self {
        let month = ts.month();
        Self {
            year: ts.year(),
            month,
            quarter: (month - 1) / 3 + 1,
            weekday: ts.weekday().num_days_from_monday(),
            hour: ts.hour(),
        }
    }

    /// Year-month period label, e.g. `2023-04`.
    pub fn period_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// A record after preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    /// The instant, for ordering and the reported date range
    pub date: DateTime<Utc>,
    /// Derived from the local time the record was written in
    pub calendar: Calendar,
    pub username: Option<String>,
    pub displayname: Option<String>,
    pub industry: Option<String>,
    pub word_count: u32,
    pub like_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub reply_count: Option<u64>,
}

/// The full prepared set plus its outlier-filtered view.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    full: Vec<PreparedRecord>,
    cleaned: Vec<PreparedRecord>,
    fields: Fields,
    provenance: Provenance,
}

impl PreparedDataset {
    /// Prepare a record set.
    ///
    /// Fails with [`Error::MissingColumn`] if the set has no `date` column,
    /// or neither `word_count` nor `content`; fails with
    /// [`Error::InvalidTimestamp`] on the first missing or unparseable date.
    pub fn prepare(set: &RecordSet) -> Result<Self> {
        let fields = set.fields().clone();

        if !fields.contains(Field::Date) {
            return Err(Error::MissingColumn(Field::Date.column_name().to_string()));
        }
        if !fields.has_word_counts() {
            return Err(Error::MissingColumn("word_count or content".to_string()));
        }

        let mut full = Vec::with_capacity(set.len());
        for (row, record) in set.records().iter().enumerate() {
            let date = match &record.date {
                Some(value) => parse_date(value).ok_or_else(|| Error::InvalidTimestamp {
                    row,
                    value: value.to_string(),
                })?,
                None => {
                    return Err(Error::InvalidTimestamp {
                        row,
                        value: String::new(),
                    })
                }
            };

            let word_count = record
                .word_count
                .or_else(|| record.content.as_deref().map(count_words))
                .unwrap_or(0);

            full.push(PreparedRecord {
                calendar: Calendar::from_timestamp(&date),
                date: date.with_timezone(&Utc),
                username: record.username.clone(),
                displayname: record.displayname.clone(),
                industry: record.industry.clone(),
                word_count,
                like_count: record.like_count,
                retweet_count: record.retweet_count,
                reply_count: record.reply_count,
            });
        }

        let cleaned: Vec<PreparedRecord> = full
            .iter()
            .filter(|r| r.word_count <= OUTLIER_WORD_THRESHOLD)
            .cloned()
            .collect();

        tracing::debug!(
            total = full.len(),
            cleaned = cleaned.len(),
            outliers = full.len() - cleaned.len(),
            "Prepared record set"
        );

        Ok(Self {
            full,
            cleaned,
            fields,
            provenance: set.provenance(),
        })
    }

    /// Every prepared record, outliers included.
    pub fn full(&self) -> &[PreparedRecord] {
        &self.full
    }

    /// Records with at most [`OUTLIER_WORD_THRESHOLD`] words.
    pub fn cleaned(&self) -> &[PreparedRecord] {
        &self.cleaned
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Word counts of the cleaned set as floats.
    pub fn cleaned_word_counts(&self) -> Vec<f64> {
        word_counts(&self.cleaned)
    }
}

/// Word counts of `records` as floats.
pub fn word_counts(records: &[PreparedRecord]) -> Vec<f64> {
    records.iter().map(|r| f64::from(r.word_count)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    fn record(date: &str, content: Option<&str>, word_count: Option<u32>) -> Record {
        Record {
            date: Some(DateValue::Text(date.to_string())),
            content: content.map(str::to_string),
            word_count,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 6, 15, 13, 45, 0).unwrap();
        for text in [
            "2021-06-15T13:45:00Z",
            "2021-06-15T15:45:00+02:00",
            "2021-06-15 13:45:00",
            "2021-06-15 13:45:00.000",
            "2021-06-15T13:45:00",
            "2021-06-15 13:45",
            "2021-06-15 13:45:00+00:00",
            " 2021-06-15 13:45:00 ",
        ] {
            let parsed = parse_date(&DateValue::Text(text.into()));
            assert_eq!(
                parsed.map(|ts| ts.with_timezone(&Utc)),
                Some(expected),
                "failed to parse {text:?}"
            );
        }

        let midnight = Utc.with_ymd_and_hms(2021, 6, 15, 0, 0, 0).unwrap();
        let parsed = parse_date(&DateValue::Text("2021-06-15".into()));
        assert_eq!(parsed.map(|ts| ts.with_timezone(&Utc)), Some(midnight));
        let passthrough = parse_date(&DateValue::from(midnight));
        assert_eq!(passthrough, Some(midnight.fixed_offset()));
        assert_eq!(parse_date(&DateValue::Text("last tuesday".into())), None);
    }

    #[test]
    fn test_parse_date_keeps_offset() {
        let parsed = parse_date(&DateValue::Text("2021-06-15T15:45:00+02:00".into())).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(parsed.hour(), 15);
    }

    #[test]
    fn test_calendar_uses_local_wall_clock() {
        // 04:30 UTC on 2022-01-01, but still New Year's Eve for the poster
        let set = RecordSet::new(vec![
            record("2021-12-31T23:30:00-05:00", None, Some(5)),
            record("2021-12-31 23:30:00-05:00", None, Some(6)),
        ]);
        let prepared = PreparedDataset::prepare(&set).unwrap();

        for row in prepared.full() {
            assert_eq!(row.calendar.year, 2021);
            assert_eq!(row.calendar.month, 12);
            assert_eq!(row.calendar.hour, 23);
            // Friday
            assert_eq!(row.calendar.weekday, 4);
            assert_eq!(row.calendar.quarter, 4);
            assert_eq!(row.date, Utc.with_ymd_and_hms(2022, 1, 1, 4, 30, 0).unwrap());
        }
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Great day!"), 2);
        assert_eq!(count_words("  spaced\tout \n words  "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_calendar_fields() {
        // 2024-02-29 is a Thursday
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 10, 0).unwrap();
        let cal = Calendar::from_timestamp(&ts);
        assert_eq!(cal.year, 2024);
        assert_eq!(cal.month, 2);
        assert_eq!(cal.quarter, 1);
        assert_eq!(cal.weekday, 3);
        assert_eq!(cal.hour, 23);
        assert_eq!(cal.period_label(), "2024-02");

        let q4 = Calendar::from_timestamp(&Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(q4.quarter, 4);
    }

    #[test]
    fn test_prepare_derives_word_counts_and_filters_outliers() {
        let long = vec!["word"; 101].join(" ");
        let set = RecordSet::new(vec![
            record("2022-01-01 10:00:00", Some("one two three"), None),
            record("2022-01-02 10:00:00", Some("ignored text"), Some(7)),
            record("2022-01-03 10:00:00", Some(&long), None),
            record("2022-01-04 10:00:00", None, Some(100)),
        ]);
        // Record without content in a set that has the content column
        let mut records = set.records().to_vec();
        records.push(Record {
            date: Some(DateValue::Text("2022-01-05".into())),
            ..Default::default()
        });
        let set = RecordSet::with_fields(records, set.fields().clone());

        let prepared = PreparedDataset::prepare(&set).unwrap();
        let counts: Vec<u32> = prepared.full().iter().map(|r| r.word_count).collect();
        assert_eq!(counts, vec![3, 7, 101, 100, 0]);

        assert_eq!(prepared.full().len(), 5);
        assert_eq!(prepared.cleaned().len(), 4);
        assert!(prepared
            .cleaned()
            .iter()
            .all(|r| r.word_count <= OUTLIER_WORD_THRESHOLD));
    }

    #[test]
    fn test_prepare_does_not_mutate_input() {
        let set = RecordSet::new(vec![record("2022-01-01", Some("a b"), None)]);
        let before = set.clone();
        let _ = PreparedDataset::prepare(&set).unwrap();
        assert_eq!(set, before);
        assert_eq!(set.records()[0].word_count, None);
    }

    #[test]
    fn test_prepare_missing_columns() {
        let no_words = RecordSet::new(vec![Record {
            date: Some(DateValue::Text("2022-01-01".into())),
            username: Some("x".into()),
            ..Default::default()
        }]);
        assert!(matches!(
            PreparedDataset::prepare(&no_words),
            Err(Error::MissingColumn(_))
        ));

        let no_date = RecordSet::new(vec![Record {
            content: Some("hello".into()),
            ..Default::default()
        }]);
        assert!(matches!(
            PreparedDataset::prepare(&no_date),
            Err(Error::MissingColumn(c)) if c == "date"
        ));
    }

    #[test]
    fn test_prepare_fails_whole_pass_on_bad_timestamp() {
        let set = RecordSet::new(vec![
            record("2022-01-01", Some("fine"), None),
            record("not a date", Some("broken"), None),
        ]);
        match PreparedDataset::prepare(&set) {
            Err(Error::InvalidTimestamp { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }
}
