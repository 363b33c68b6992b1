//! Caller-supplied record files.

use super::{RecordFilter, RecordSource};
use crate::error::Result;
use crate::ingest::{load_path, InputFormat};
use crate::types::{Provenance, RecordSet};
use std::path::{Path, PathBuf};

/// A record set read from a CSV, JSON or JSON Lines file.
#[derive(Debug, Clone)]
pub struct ExternalSource {
    path: PathBuf,
    format: Option<InputFormat>,
    filter: RecordFilter,
}

impl ExternalSource {
    /// Source for `path`; the format comes from the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            filter: RecordFilter::default(),
        }
    }

    /// Override the format inferred from the extension.
    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolved_format(&self) -> Result<InputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => InputFormat::from_path(&self.path),
        }
    }
}

impl RecordSource for ExternalSource {
    fn provenance(&self) -> Provenance {
        Provenance::External
    }

    fn describe(&self) -> String {
        if self.filter.is_empty() {
            format!("file {}", self.path.display())
        } else {
            format!("file {} ({})", self.path.display(), self.filter)
        }
    }

    fn load(&self) -> Result<RecordSet> {
        let set = load_path(&self.path, self.resolved_format()?)?;
        self.filter.select(&set.with_provenance(Provenance::External))
    }
}
