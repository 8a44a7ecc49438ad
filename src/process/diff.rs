use std::collections::HashSet;

use tracing::{info, instrument};

use super::RawTable;
use crate::errors::Result;
use crate::schema::NORMALIZED;

/// Rows of `candidate` whose normalized domain never appears in `reference`.
///
/// Both tables get their `normalized` column derived first (reference
/// first, so a missing `BACKLINKS` there is the error reported). Row order
/// of `candidate` is preserved and duplicates are kept.
#[instrument(level = "info", skip_all, fields(reference = %reference.source, candidate = %candidate.source))]
pub fn diff_backlinks(reference: &mut RawTable, candidate: &mut RawTable) -> Result<RawTable> {
    reference.add_normalized_column()?;
    candidate.add_normalized_column()?;
    info!("domains normalized");

    let filtered = anti_join(reference, candidate, NORMALIZED)?;
    info!(
        "found {} unique domains in '{}' not in '{}'",
        filtered.len(),
        candidate.source,
        reference.source
    );
    Ok(filtered)
}

/// Asymmetric set difference on `key`: keep each `candidate` row whose key
/// is absent from `reference`.
pub fn anti_join(reference: &RawTable, candidate: &RawTable, key: &str) -> Result<RawTable> {
    let ref_idx = reference.require_column(key)?;
    let cand_idx = candidate.require_column(key)?;

    let seen: HashSet<&str> = reference.column_values(ref_idx).collect();

    let rows = candidate
        .rows
        .iter()
        .filter(|row| !seen.contains(row.get(cand_idx).map(String::as_str).unwrap_or("")))
        .cloned()
        .collect();

    Ok(candidate.with_rows(rows))
}
