// src/process/mod.rs
pub mod diff;
pub mod utils;
pub mod write;

use csv::ReaderBuilder;
use std::{fs, io, path::Path};
use tracing::{debug, info, trace};

use crate::errors::{BacklinkError, Result};
use crate::schema::{resolve_columns, SchemaResolution, SourceFormat, BACKLINKS, NORMALIZED};

pub use diff::{anti_join, diff_backlinks};
pub use utils::normalize_url;
pub use write::write_projection;

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Where the rows came from; used to label log lines and errors.
    pub source: String,
    /// Column names: the expected schema when the shape matched, otherwise
    /// whatever header row the file itself had.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()`.
    pub rows: Vec<Vec<String>>,
    pub schema: SchemaResolution,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, or `MissingColumn` naming this table.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| BacklinkError::missing_column(name, self.source.clone()))
    }

    /// Cells of column `idx`; short rows read as empty.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(idx).map(String::as_str).unwrap_or(""))
    }

    /// Same headers and schema, a chosen subset of rows.
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> RawTable {
        RawTable {
            source: self.source.clone(),
            headers: self.headers.clone(),
            rows,
            schema: self.schema.clone(),
        }
    }

    /// Derive the `normalized` key column from `BACKLINKS`, row by row.
    /// Re-running replaces the previous values.
    pub fn add_normalized_column(&mut self) -> Result<()> {
        let src = self.require_column(BACKLINKS)?;
        let keys: Vec<String> = self.column_values(src).map(normalize_url).collect();

        let dst = match self.column_index(NORMALIZED) {
            Some(i) => i,
            None => {
                self.headers.push(NORMALIZED.to_string());
                self.headers.len() - 1
            }
        };
        for (row, key) in self.rows.iter_mut().zip(keys) {
            if row.len() <= dst {
                row.resize(dst + 1, String::new());
            }
            row[dst] = key;
        }
        Ok(())
    }
}

/// Drop the first `n` raw lines (blank ones included) and return the rest.
fn skip_lines(text: &str, n: usize) -> &str {
    let pos: usize = text.split_inclusive('\n').take(n).map(str::len).sum();
    &text[pos..]
}

/// Load one backlink export.
///
/// - `format.skip_rows` preamble lines are discarded
/// - the next record is the file's header row
/// - with exactly `format.columns.len()` columns the header is replaced
///   positionally; any other count keeps the parsed names (and warns)
/// - the file must be UTF-8; invalid bytes are a `Parse` error
///
/// Checks that `path` exists on its own, so it can be called without going
/// through `analyze_backlinks` (which checks both inputs up front).
#[tracing::instrument(level = "info", skip(path, format), fields(path = %path.as_ref().display(), format = %format.name))]
pub fn load_table<P: AsRef<Path>>(path: P, format: &SourceFormat) -> Result<RawTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(BacklinkError::missing_input(&format.name, path));
    }
    let source = path.display().to_string();

    let bytes = fs::read(path).map_err(|e| BacklinkError::Parse {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let text = String::from_utf8(bytes).map_err(|e| BacklinkError::Parse {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e).into(),
    })?;
    let body = skip_lines(&text, format.skip_rows);
    trace!(skipped = format.skip_rows, remaining = body.len(), "preamble skipped");

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(format.delimiter)
        .from_reader(body.as_bytes());

    let mut records = rdr.records();
    let mut headers: Vec<String> = match records.next() {
        Some(rec) => rec
            .map_err(|e| BacklinkError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(str::to_string)
            .collect(),
        None => {
            return Err(BacklinkError::EmptyTable {
                path: path.to_path_buf(),
            })
        }
    };
    let width = headers.len();

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(|e| BacklinkError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0) + format.skip_rows as u64;
            return Err(BacklinkError::RaggedRow {
                path: path.to_path_buf(),
                line,
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    let schema = resolve_columns(&source, &mut headers, format);
    debug!(columns = ?headers, "resolved header");
    info!("loaded '{}' with {} rows", source, rows.len());

    Ok(RawTable {
        source,
        headers,
        rows,
        schema,
    })
}
