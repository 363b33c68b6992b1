//! Seeded synthetic fixture generator.
//!
//! Produces a realistic-looking multi-year record set for five built-in
//! personas. The RNG is a ChaCha stream seeded explicitly, so one seed
//! yields the same records on every platform and no global state is
//! touched.

use super::{RecordFilter, RecordSource};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::ingest::delimited::write_csv_path;
use crate::types::{DateValue, Provenance, Record, RecordSet};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Mean of the per user-year post count.
const POSTS_PER_YEAR: f64 = 180.0;
const MIN_POSTS_PER_YEAR: u64 = 50;
const MAX_POSTS_PER_YEAR: u64 = 400;

const MIN_WORDS: i64 = 1;
const MAX_WORDS: i64 = 50;
const MAX_CONTENT_CHARS: usize = 280;

const MAX_LIKES: u64 = 999_999;
const MAX_RETWEETS: u64 = 99_999;
const MAX_REPLIES: u64 = 49_999;

/// How a persona's post lengths are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingStyle {
    /// Log-normal around the average, heavy right tail
    Erratic,
    /// Normal with half the persona's spread
    Consistent,
    Professional,
    Thoughtful,
    Informative,
}

/// A built-in synthetic author.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Persona {
    pub username: &'static str,
    pub displayname: &'static str,
    pub industry: &'static str,
    pub followers: u64,
    pub avg_words: f64,
    pub std_words: f64,
    pub style: PostingStyle,
}

pub const PERSONAS: [Persona; 5] = [
    Persona {
        username: "techvisionary",
        displayname: "Tech Visionary",
        industry: "Tech",
        followers: 150_000_000,
        avg_words: 12.0,
        std_words: 8.0,
        style: PostingStyle::Erratic,
    },
    Persona {
        username: "popstar",
        displayname: "Pop Star",
        industry: "Music",
        followers: 95_000_000,
        avg_words: 22.0,
        std_words: 5.0,
        style: PostingStyle::Consistent,
    },
    Persona {
        username: "spaceagency",
        displayname: "Space Agency",
        industry: "Science",
        followers: 75_000_000,
        avg_words: 18.0,
        std_words: 4.0,
        style: PostingStyle::Professional,
    },
    Persona {
        username: "statesman",
        displayname: "Former Statesman",
        industry: "Politics",
        followers: 132_000_000,
        avg_words: 25.0,
        std_words: 7.0,
        style: PostingStyle::Thoughtful,
    },
    Persona {
        username: "philanthropist",
        displayname: "Tech Philanthropist",
        industry: "Tech",
        followers: 62_000_000,
        avg_words: 20.0,
        std_words: 6.0,
        style: PostingStyle::Informative,
    },
];

const SHORT_POSTS: [&str; 4] = [
    "Great day!",
    "Exciting news!",
    "Thank you all!",
    "Working hard!",
];

/// Deterministic synthetic record source.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    start_year: i32,
    end_year: i32,
    filter: RecordFilter,
    fixture_path: Option<PathBuf>,
}

impl SyntheticSource {
    /// Generator for 2018-2024 with no filter and no fixture file.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_year: 2018,
            end_year: 2024,
            filter: RecordFilter::default(),
            fixture_path: None,
        }
    }

    /// Generator set up from the `[generator]` config section.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            seed: config.seed,
            start_year: config.start_year,
            end_year: config.end_year,
            filter: RecordFilter::default(),
            fixture_path: config.write_fixture.then(|| config.fixture_path()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Inclusive year span.
    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Select a subset of the generated set on load. This is the stand-in
    /// for per-user collection; the result is still synthetic.
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Write the generated set here on every load (best effort).
    pub fn with_fixture_path(mut self, path: Option<PathBuf>) -> Self {
        self.fixture_path = path;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the full, unfiltered record set, sorted by date.
    pub fn generate(&self) -> RecordSet {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut records = Vec::new();

        for year in self.start_year..=self.end_year {
            for persona in &PERSONAS {
                let posts = poisson(&mut rng, POSTS_PER_YEAR)
                    .clamp(MIN_POSTS_PER_YEAR, MAX_POSTS_PER_YEAR);
                for _ in 0..posts {
                    if let Some(record) = generate_record(&mut rng, persona, year) {
                        records.push(record);
                    }
                }
            }
        }

        records.sort_by_key(timestamp);
        tracing::debug!(
            seed = self.seed,
            records = records.len(),
            "Generated synthetic record set"
        );
        RecordSet::new(records).with_provenance(Provenance::Synthetic)
    }

    fn write_fixture(&self, set: &RecordSet, path: &Path) {
        match write_csv_path(set, path) {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote sample fixture"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to write sample fixture"
            ),
        }
    }
}

impl RecordSource for SyntheticSource {
    fn provenance(&self) -> Provenance {
        Provenance::Synthetic
    }

    fn describe(&self) -> String {
        let base = format!(
            "synthetic sample (seed {}, {}-{})",
            self.seed, self.start_year, self.end_year
        );
        if self.filter.is_empty() {
            base
        } else {
            format!("{base}, {}", self.filter)
        }
    }

    fn load(&self) -> Result<RecordSet> {
        let set = self.generate();
        if let Some(path) = &self.fixture_path {
            self.write_fixture(&set, path);
        }
        self.filter.select(&set)
    }
}

/// Sort key for generated records, which always carry a timestamp.
fn timestamp(record: &Record) -> Option<DateTime<FixedOffset>> {
    match &record.date {
        Some(DateValue::Timestamp(ts)) => Some(*ts),
        _ => None,
    }
}

fn generate_record(rng: &mut ChaCha8Rng, persona: &Persona, year: i32) -> Option<Record> {
    let raw_words = match persona.style {
        PostingStyle::Erratic => log_normal(rng, persona.avg_words.ln(), 0.7) as i64,
        PostingStyle::Consistent => normal(rng, persona.avg_words, persona.std_words * 0.5) as i64,
        _ => poisson(rng, persona.avg_words) as i64,
    };
    let word_count = raw_words.clamp(MIN_WORDS, MAX_WORDS) as u32;

    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=27);
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..60);
    let date = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, 0)?
        .and_utc()
        .fixed_offset();

    let like_count =
        ((f64::from(word_count) * log_normal(rng, 5.0, 0.5)) as u64).min(MAX_LIKES);
    let retweet_count =
        ((like_count as f64 * rng.gen_range(0.1..0.3)) as u64).min(MAX_RETWEETS);
    let reply_count =
        ((like_count as f64 * rng.gen_range(0.02..0.08)) as u64).min(MAX_REPLIES);

    Some(Record {
        date: Some(DateValue::Timestamp(date)),
        username: Some(persona.username.to_string()),
        displayname: Some(persona.displayname.to_string()),
        content: Some(compose_content(rng, persona, word_count)),
        word_count: Some(word_count),
        like_count: Some(like_count),
        retweet_count: Some(retweet_count),
        reply_count: Some(reply_count),
        industry: Some(persona.industry.to_string()),
        followers: Some(persona.followers),
    })
}

fn compose_content(rng: &mut ChaCha8Rng, persona: &Persona, word_count: u32) -> String {
    let text = if word_count < 5 {
        SHORT_POSTS
            .choose(rng)
            .copied()
            .unwrap_or(SHORT_POSTS[0])
            .to_string()
    } else if word_count < 15 {
        let medium = [
            format!(
                "Excited to share our latest project in {}. More soon!",
                persona.industry
            ),
            "Great conversation today about innovation and the future.".to_string(),
            "Proud of what we're building. Stay tuned for updates.".to_string(),
        ];
        let idx = rng.gen_range(0..medium.len());
        medium[idx].clone()
    } else {
        format!("This is a detailed post about {}. ", persona.industry)
            .repeat((word_count / 10) as usize)
    };
    text.chars().take(MAX_CONTENT_CHARS).collect()
}

/// Standard normal draw (Box-Muller).
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn normal(rng: &mut ChaCha8Rng, mean: f64, std: f64) -> f64 {
    mean + std * standard_normal(rng)
}

fn log_normal(rng: &mut ChaCha8Rng, mu: f64, sigma: f64) -> f64 {
    normal(rng, mu, sigma).exp()
}

/// Poisson draw (Knuth's multiplication method).
fn poisson(rng: &mut ChaCha8Rng, lambda: f64) -> u64 {
    let limit = (-lambda).exp();
    let mut k = 0;
    let mut p: f64 = rng.gen();
    while p > limit {
        k += 1;
        p *= rng.gen::<f64>();
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::Field;
    use chrono::Datelike;
    use std::collections::BTreeMap;

    #[test]
    fn test_same_seed_same_records() {
        let a = SyntheticSource::new(7).with_years(2020, 2021).generate();
        let b = SyntheticSource::new(7).with_years(2020, 2021).generate();
        assert_eq!(a, b);

        let c = SyntheticSource::new(8).with_years(2020, 2021).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_shape() {
        let set = SyntheticSource::new(42).with_years(2019, 2021).generate();
        assert_eq!(set.provenance(), Provenance::Synthetic);
        for field in Field::ALL {
            assert!(set.fields().contains(field), "missing {field}");
        }

        let mut per_user_year: BTreeMap<(String, i32), u64> = BTreeMap::new();
        let mut previous = None;
        for record in set.records() {
            let date = timestamp(record).unwrap();
            assert!(previous.map_or(true, |p| p <= date), "not sorted by date");
            previous = Some(date);

            let words = record.word_count.unwrap();
            assert!((1..=50).contains(&words));
            assert!(record.content.as_ref().unwrap().chars().count() <= MAX_CONTENT_CHARS);
            assert!(record.like_count.unwrap() <= MAX_LIKES);
            assert!(record.retweet_count.unwrap() <= MAX_RETWEETS);
            assert!(record.reply_count.unwrap() <= MAX_REPLIES);
            assert!(date.day() <= 27);

            *per_user_year
                .entry((record.username.clone().unwrap(), date.year()))
                .or_default() += 1;
        }

        assert_eq!(per_user_year.len(), PERSONAS.len() * 3);
        for count in per_user_year.values() {
            assert!((MIN_POSTS_PER_YEAR..=MAX_POSTS_PER_YEAR).contains(count));
        }
    }

    #[test]
    fn test_filtered_load_is_still_synthetic() {
        let source = SyntheticSource::new(42)
            .with_years(2022, 2023)
            .with_filter(RecordFilter::new().with_username("PopStar").with_years([2023]));
        let set = source.load().unwrap();
        assert!(!set.is_empty());
        assert_eq!(set.provenance(), Provenance::Synthetic);
        assert!(set
            .records()
            .iter()
            .all(|r| r.username.as_deref() == Some("popstar")));
        assert!(source.describe().contains("user @PopStar"));
    }

    #[test]
    fn test_unknown_user_is_error() {
        let source = SyntheticSource::new(42)
            .with_years(2022, 2022)
            .with_filter(RecordFilter::new().with_username("nobody"));
        assert!(matches!(source.load(), Err(Error::NoMatchingRecords(_))));
    }

    #[test]
    fn test_fixture_written_once_per_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample_tweets.csv");
        let source = SyntheticSource::new(1)
            .with_years(2020, 2020)
            .with_fixture_path(Some(path.clone()));

        let set = source.load().unwrap();
        let file = std::fs::File::open(&path).unwrap();
        let reread = crate::ingest::delimited::read_csv(file).unwrap();
        assert_eq!(reread.len(), set.len());
    }

    #[test]
    fn test_fixture_write_failure_is_ignored() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot be a parent directory
        let path = file.path().join("sample_tweets.csv");
        let source = SyntheticSource::new(1)
            .with_years(2020, 2020)
            .with_fixture_path(Some(path));
        assert!(source.load().is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = GeneratorConfig {
            seed: 9,
            start_year: 2020,
            end_year: 2021,
            write_fixture: false,
            fixture_dir: None,
        };
        let source = SyntheticSource::from_config(&config);
        assert_eq!(source.seed(), 9);
        assert!(source.fixture_path.is_none());
        assert_eq!(source.describe(), "synthetic sample (seed 9, 2020-2021)");
    }

    #[test]
    fn test_poisson_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = 2000;
        let total: u64 = (0..n).map(|_| poisson(&mut rng, 18.0)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 18.0).abs() < 0.5, "mean was {mean}");
    }
}
