use std::{fs::File, io::Write, path::Path};

use csv::{Terminator, WriterBuilder};
use tracing::{info, instrument};

use super::RawTable;
use crate::errors::{BacklinkError, Result};

/// Write `columns` of `table` to `path` as CSV: header row, no index
/// column, existing file replaced.
///
/// Every column is resolved before the file is opened, so a missing column
/// leaves whatever was at `path` untouched.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display(), rows = table.len()))]
pub fn write_projection<P: AsRef<Path>>(table: &RawTable, path: P, columns: &[&str]) -> Result<()> {
    let path = path.as_ref();
    let idx = columns
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<usize>>>()?;

    let file = File::create(path).map_err(|e| BacklinkError::write(path, e))?;
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    wtr.write_record(columns)
        .map_err(|e| BacklinkError::write(path, e))?;
    for row in &table.rows {
        let record = idx
            .iter()
            .map(|&i| row.get(i).map(String::as_str).unwrap_or(""));
        wtr.write_record(record)
            .map_err(|e| BacklinkError::write(path, e))?;
    }

    let mut file = wtr
        .into_inner()
        .map_err(|e| BacklinkError::write(path, e.into_error()))?;
    file.flush().map_err(|e| BacklinkError::write(path, e))?;

    info!("saved {} rows to '{}'", table.len(), path.display());
    Ok(())
}
