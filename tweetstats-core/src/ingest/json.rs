//! JSON array and JSON Lines reading.
//!
//! JSON inputs have no header, so the field set is the union of the fields
//! that any record populates.

use crate::error::Result;
use crate::types::{Record, RecordSet};
use std::io::{BufRead, Read};

/// Read a JSON array of record objects.
pub fn read_json<R: Read>(reader: R) -> Result<RecordSet> {
    let records: Vec<Record> = serde_json::from_reader(reader)?;
    Ok(RecordSet::new(records))
}

/// Read newline-delimited record objects, skipping blank lines.
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<RecordSet> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str::<Record>(&line)?);
    }
    Ok(RecordSet::new(records))
}
