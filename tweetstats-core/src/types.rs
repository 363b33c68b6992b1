//! Core domain types for tweetstats
//!
//! These types represent the tabular record set that the statistics engine
//! consumes. Records are immutable once ingested; preparation derives new
//! values (see [`crate::analytics::prepare`]) without touching the source.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One short text post with its author, timestamp and engagement counters |
//! | **Field** | A column of the record set; optional fields unlock extra report sections |
//! | **Record set** | A collection of records plus the set of fields it carries |
//! | **Provenance** | Whether a record set is synthetic or supplied from outside |

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================
// Fields
// ============================================

/// A column of the tabular record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Username,
    Displayname,
    Content,
    WordCount,
    LikeCount,
    RetweetCount,
    ReplyCount,
    Industry,
    Followers,
}

impl Field {
    /// Every known field, in canonical column order.
    pub const ALL: [Field; 10] = [
        Field::Date,
        Field::Username,
        Field::Displayname,
        Field::Content,
        Field::WordCount,
        Field::LikeCount,
        Field::RetweetCount,
        Field::ReplyCount,
        Field::Industry,
        Field::Followers,
    ];

    /// Column name used in tabular files.
    pub fn column_name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Username => "username",
            Field::Displayname => "displayname",
            Field::Content => "content",
            Field::WordCount => "word_count",
            Field::LikeCount => "like_count",
            Field::RetweetCount => "retweet_count",
            Field::ReplyCount => "reply_count",
            Field::Industry => "industry",
            Field::Followers => "followers",
        }
    }

    /// Look up a field by column name. Unknown columns return `None`.
    pub fn from_column(name: &str) -> Option<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.column_name() == name.trim())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The set of fields a record set carries.
///
/// This is the capability query the report assembler consults once per
/// report to decide which optional sections it can include.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fields(BTreeSet<Field>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field) {
        self.0.insert(field);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    /// True when every field in `fields` is present.
    pub fn contains_all(&self, fields: &[Field]) -> bool {
        fields.iter().all(|f| self.contains(*f))
    }

    /// Word counts can be read directly or derived from content.
    pub fn has_word_counts(&self) -> bool {
        self.contains(Field::WordCount) || self.contains(Field::Content)
    }

    /// All three engagement counters are present.
    pub fn has_engagement(&self) -> bool {
        self.contains_all(&[Field::LikeCount, Field::RetweetCount, Field::ReplyCount])
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================
// Records
// ============================================

/// A timestamp as supplied by the caller.
///
/// Structured timestamps pass through preparation unchanged; text is parsed.
/// A timestamp keeps the offset it was written with, since calendar fields
/// are read from the poster's own wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(DateTime<FixedOffset>),
    Text(String),
}

impl From<DateTime<Utc>> for DateValue {
    fn from(ts: DateTime<Utc>) -> Self {
        DateValue::Timestamp(ts.into())
    }
}

impl From<DateTime<FixedOffset>> for DateValue {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        DateValue::Timestamp(ts)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Timestamp(ts) if ts.offset().local_minus_utc() == 0 => {
                write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S"))
            }
            DateValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%:z")),
            DateValue::Text(s) => f.write_str(s),
        }
    }
}

/// One post as ingested.
///
/// Every column is optional at the type level; which columns the set as a
/// whole carries is tracked by [`Fields`] on the owning [`RecordSet`].
/// Counters deserialize leniently (see [`crate::ingest`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub date: Option<DateValue>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub displayname: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "crate::ingest::lenient::word_count")]
    pub word_count: Option<u32>,
    #[serde(default, deserialize_with = "crate::ingest::lenient::count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::ingest::lenient::count")]
    pub retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::ingest::lenient::count")]
    pub reply_count: Option<u64>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "crate::ingest::lenient::count")]
    pub followers: Option<u64>,
}

impl Record {
    /// Fields this record populates.
    pub fn populated_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(move |f| self.has(*f))
    }

    /// Whether this record carries a value for `field`.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Date => self.date.is_some(),
            Field::Username => self.username.is_some(),
            Field::Displayname => self.displayname.is_some(),
            Field::Content => self.content.is_some(),
            Field::WordCount => self.word_count.is_some(),
            Field::LikeCount => self.like_count.is_some(),
            Field::RetweetCount => self.retweet_count.is_some(),
            Field::ReplyCount => self.reply_count.is_some(),
            Field::Industry => self.industry.is_some(),
            Field::Followers => self.followers.is_some(),
        }
    }

    /// Render one column as text for tabular output; missing values are empty.
    pub fn column_text(&self, field: Field) -> String {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        match field {
            Field::Date => opt(&self.date),
            Field::Username => opt(&self.username),
            Field::Displayname => opt(&self.displayname),
            Field::Content => opt(&self.content),
            Field::WordCount => opt(&self.word_count),
            Field::LikeCount => opt(&self.like_count),
            Field::RetweetCount => opt(&self.retweet_count),
            Field::ReplyCount => opt(&self.reply_count),
            Field::Industry => opt(&self.industry),
            Field::Followers => opt(&self.followers),
        }
    }
}

// ============================================
// Record sets
// ============================================

/// Where a record set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Generated by the seeded fixture generator
    Synthetic,
    /// Supplied by the caller (file, upload, in-memory records)
    External,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Synthetic => "synthetic",
            Provenance::External => "external",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in-memory tabular collection of records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    fields: Fields,
    provenance: Provenance,
}

impl RecordSet {
    /// Build a caller-supplied set; the field set is the union of populated fields.
    pub fn new(records: Vec<Record>) -> Self {
        let fields = records.iter().flat_map(Record::populated_fields).collect();
        Self {
            records,
            fields,
            provenance: Provenance::External,
        }
    }

    /// Build a set with an explicit field set (e.g. from a file header).
    pub fn with_fields(records: Vec<Record>, fields: Fields) -> Self {
        Self {
            records,
            fields,
            provenance: Provenance::External,
        }
    }

    /// Relabel the provenance of this set.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A new set holding the records that satisfy `keep`, with the same
    /// field set and provenance.
    pub fn retain_where(&self, mut keep: impl FnMut(&Record) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
            fields: self.fields.clone(),
            provenance: self.provenance,
        }
    }
}
