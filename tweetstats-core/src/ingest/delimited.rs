//! CSV reading and writing.

use crate::error::Result;
use crate::types::{DateValue, Field, Fields, Record, RecordSet};
use super::lenient;
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;

/// One CSV row as it appears on disk.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    displayname: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, deserialize_with = "lenient::word_count")]
    word_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::count")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    retweet_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    reply_count: Option<u64>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    followers: Option<u64>,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record {
            date: row.date.map(DateValue::Text),
            username: row.username,
            displayname: row.displayname,
            content: row.content,
            word_count: row.word_count,
            like_count: row.like_count,
            retweet_count: row.retweet_count,
            reply_count: row.reply_count,
            industry: row.industry,
            followers: row.followers,
        }
    }
}

/// Read a record set from CSV. The header row defines the field set.
pub fn read_csv<R: Read>(reader: R) -> Result<RecordSet> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::Headers)
        .from_reader(reader);

    let fields: Fields = rdr
        .headers()?
        .iter()
        .filter_map(Field::from_column)
        .collect();

    let mut records = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        records.push(Record::from(row?));
    }

    tracing::debug!(
        rows = records.len(),
        columns = ?fields.iter().map(|f| f.column_name()).collect::<Vec<_>>(),
        "Parsed CSV"
    );

    Ok(RecordSet::with_fields(records, fields))
}

/// Write a record set as CSV, one column per field the set carries.
pub fn write_csv<W: Write>(set: &RecordSet, writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    let columns: Vec<Field> = set.fields().iter().collect();

    wtr.write_record(columns.iter().map(|f| f.column_name()))?;
    for record in set.records() {
        wtr.write_record(columns.iter().map(|f| record.column_text(*f)))?;
    }
    wtr.flush()?;
    Ok(())
}

impl RecordSet {
    /// Write this set as CSV; see [`write_csv`].
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        write_csv(self, writer)
    }
}

/// Write a record set to a CSV file, creating parent directories.
pub fn write_csv_path(set: &RecordSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(set, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), records = set.len(), "Wrote CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const SAMPLE: &str = "\
id,date,username,content,word_count,like_count,retweet_count,reply_count,industry
1,2021-01-05 10:00:00,nasa,Launch day,2,100,20,3,Science
2,2021-02-06 11:30:00,nasa,Another update from orbit,,120.0,25,4,Science
3,2022-03-07 12:45:00,nasa,Back on Earth,3,,30,5,
";

    #[test]
    fn test_read_csv_fields_from_header() {
        let set = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);

        let fields = set.fields();
        assert!(fields.contains(Field::Date));
        assert!(fields.contains(Field::WordCount));
        assert!(fields.contains(Field::Industry));
        assert!(fields.has_engagement());
        assert!(!fields.contains(Field::Displayname));
        assert!(!fields.contains(Field::Followers));
    }

    #[test]
    fn test_read_csv_lenient_counts() {
        let set = read_csv(SAMPLE.as_bytes()).unwrap();
        let records = set.records();

        assert_eq!(records[0].word_count, Some(2));
        assert_eq!(records[1].word_count, None);
        assert_eq!(records[1].like_count, Some(120));
        assert_eq!(records[2].like_count, None);
        assert_eq!(records[2].industry, None);
        assert_eq!(
            records[0].date,
            Some(DateValue::Text("2021-01-05 10:00:00".into()))
        );
    }

    #[test]
    fn test_read_csv_rejects_negative_count() {
        let data = "date,content,like_count\n2021-01-01,hi,-4\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_read_csv_rejects_fractional_count() {
        let data = "date,content,word_count\n2021-01-01,hi,2.5\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(Error::Csv(_))));

        let data = "date,content,word_count,like_count\n2021-01-01,hi, 4 ,nan\n";
        let set = read_csv(data.as_bytes()).unwrap();
        assert_eq!(set.records()[0].word_count, Some(4));
        assert_eq!(set.records()[0].like_count, None);
    }

    #[test]
    fn test_write_csv_only_present_columns() {
        let set = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_csv(&set, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "date,username,content,word_count,like_count,retweet_count,reply_count,industry"
        );

        let reread = read_csv(text.as_bytes()).unwrap();
        assert_eq!(reread.fields(), set.fields());
        assert_eq!(reread.records(), set.records());
    }
}
