use csv::ReaderBuilder;
use itertools::Itertools;
use std::{collections::BTreeMap, io::{ErrorKind, Read}, path::Path};
use tracing::warn;
use super::error::ImportError;

// column name -> cell text, no type coercion
pub type Row = BTreeMap<String, String>;
pub type RowSet = Vec<Row>;

// read csv: the header names the columns, every later record becomes one row.
// A short record only carries the columns it has, extra cells are keyed `_<index>`.
pub fn parse_csv<R: Read>(input: R) -> Result<RowSet, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let header: Vec<String> = reader.byte_headers()?.iter().map(decode).collect();

    let duplicates: Vec<_> = header.iter().duplicates().collect();
    if !duplicates.is_empty() {
        warn!("Duplicate columns in header, the last one wins: {}", duplicates.iter().join(", "));
    }

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        if record.len() != header.len() {
            warn!(
                "Record at line {} has {} fields, header has {}",
                record.position().map(|p| p.line()).unwrap_or_default(),
                record.len(),
                header.len()
            );
        }

        let row: Row = record
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let column = header.get(i).cloned().unwrap_or_else(|| format!("_{}", i));
                (column, decode(cell))
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// invalid utf-8 becomes U+FFFD instead of failing the file
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// read a whole csv file in one go; a missing file is None, not an error
pub async fn read_csv_file(path: &Path) -> Result<Option<RowSet>, ImportError> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(ImportError::Io {
                path: path.to_owned(),
                source: error,
            })
        }
    };

    parse_csv(content.as_slice())
        .map(Some)
        .map_err(|source| ImportError::Csv {
            path: path.to_owned(),
            source,
        })
}
