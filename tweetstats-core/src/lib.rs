//! # tweetstats-core
//!
//! Core library for tweetstats - descriptive statistics over short text
//! posts.
//!
//! This library provides:
//! - Domain types for records, field sets and provenance
//! - CSV / JSON ingestion and CSV export
//! - Statistical primitives (moments, quantiles, t-tests, correlation)
//! - The statistics engine and report assembler
//! - Record sources: a seeded synthetic generator and external files
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows in one direction:
//! - **Record Store:** a [`RecordSet`] from a [`RecordSource`] (immutable)
//! - **Statistics Engine:** pure functions in [`analytics`] over prepared copies
//! - **Report Assembler:** [`generate_report`] composes one [`FullReport`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use tweetstats_core::{generate_report, Config, RecordSource, SyntheticSource};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let set = SyntheticSource::new(42).load().expect("failed to generate records");
//! let report = generate_report(&set, &config.analysis).expect("failed to analyse");
//! println!("{} clean tweets", report.dataset_info.clean_tweets);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{generate_report, FullReport};
pub use config::Config;
pub use error::{Error, Result};
pub use source::{ExternalSource, RecordFilter, RecordSource, SyntheticSource};
pub use stats::{BasicStats, SignificanceTest};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod source;
pub mod stats;
pub mod types;
