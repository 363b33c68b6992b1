//! Tabular ingestion and export
//!
//! Reads record sets from CSV, JSON array and JSON Lines files, and writes
//! record sets back out as CSV.
//!
//! ## Design Principles
//!
//! 1. **Header-driven capabilities**: for CSV the header row decides which
//!    [`Field`](crate::types::Field)s the set carries, even if a column is
//!    empty on some rows
//! 2. **Unknown columns are ignored**: extra columns (ids, derived calendar
//!    fields, flags) pass through without error
//! 3. **No partial rows**: a malformed row fails the whole load
//! 4. **Lenient counters**: CSV and JSON accept the same counter encodings
//!    (`12`, `12.0`, `"12"`, empty/null); see `lenient`

pub mod delimited;
pub mod json;
pub(crate) mod lenient;

use crate::error::{Error, Result};
use crate::types::RecordSet;
use std::path::Path;

/// Supported tabular file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    JsonLines,
}

impl InputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        ext.parse().map_err(|_| {
            Error::UnsupportedFormat(format!("{} (extension {:?})", path.display(), ext))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Json => "json",
            InputFormat::JsonLines => "jsonl",
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::JsonLines),
            _ => Err(format!("unknown input format: {}", s)),
        }
    }
}

/// Load a record set from a file in the given format.
pub fn load_path(path: &Path, format: InputFormat) -> Result<RecordSet> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);

    let set = match format {
        InputFormat::Csv => delimited::read_csv(reader)?,
        InputFormat::Json => json::read_json(reader)?,
        InputFormat::JsonLines => json::read_json_lines(reader)?,
    };

    tracing::info!(
        path = %path.display(),
        format = format.as_str(),
        records = set.len(),
        "Loaded record set"
    );

    Ok(set)
}
