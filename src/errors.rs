use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BacklinkError>;

/// Everything that can stop a backlink comparison run.
///
/// A column-count mismatch has no variant of its own. It is reported through
/// `SchemaResolution::Mismatch` and only shows up here as `MissingColumn`
/// once a lookup by name fails.
#[derive(Error, Debug)]
pub enum BacklinkError {
    #[error("{role} file not found at {path:?}")]
    MissingInput { role: String, path: PathBuf },

    #[error("error loading {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("error loading {path:?}: no columns to parse after skipped rows")]
    EmptyTable { path: PathBuf },

    #[error("error loading {path:?}: expected {expected} fields on line {line}, saw {found}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("'{column}' column missing in {table}")]
    MissingColumn { column: String, table: String },

    #[error("error saving file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading formats from {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid formats file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown source format `{0}`")]
    UnknownFormat(String),
}

impl BacklinkError {
    pub fn missing_input(role: &str, path: impl Into<PathBuf>) -> Self {
        BacklinkError::MissingInput {
            role: role.to_string(),
            path: path.into(),
        }
    }

    pub fn missing_column(column: &str, table: impl Into<String>) -> Self {
        BacklinkError::MissingColumn {
            column: column.to_string(),
            table: table.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        BacklinkError::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}
