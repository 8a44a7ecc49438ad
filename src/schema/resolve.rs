use tracing::{debug, warn};

use super::SourceFormat;

/// Outcome of matching a parsed header against a `SourceFormat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaResolution {
    /// Column count matched; headers now carry the expected names.
    Renamed { columns: Vec<String> },
    /// Column count differed; headers are left exactly as parsed.
    Mismatch {
        expected: usize,
        found: Vec<String>,
    },
}

impl SchemaResolution {
    pub fn is_renamed(&self) -> bool {
        matches!(self, SchemaResolution::Renamed { .. })
    }
}

/// Rename `headers` positionally to `format.columns`, but only when the
/// counts agree. Whatever the file's own header said is overwritten.
pub fn resolve_columns(
    source: &str,
    headers: &mut Vec<String>,
    format: &SourceFormat,
) -> SchemaResolution {
    if headers.len() == format.columns.len() {
        debug!(source, format = %format.name, "renaming columns positionally");
        *headers = format.columns.clone();
        SchemaResolution::Renamed {
            columns: headers.clone(),
        }
    } else {
        warn!(
            "column mismatch in '{}', columns found: {:?}",
            source, headers
        );
        SchemaResolution::Mismatch {
            expected: format.columns.len(),
            found: headers.clone(),
        }
    }
}
