use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::errors::{BacklinkError, Result};
use crate::process::{diff_backlinks, load_table, write_projection};
use crate::schema::{FormatStore, BACKLINKS, DA};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub reference_rows: usize,
    pub candidate_rows: usize,
    pub unique_rows: usize,
    pub output: PathBuf,
}

/// Load both exports, find the candidate backlinks whose domain the
/// reference doesn't have, and write their `BACKLINKS`/`DA` to `output`.
///
/// Both inputs are checked for existence before anything is parsed, and
/// nothing is written unless every earlier step succeeded.
#[instrument(level = "info", skip_all, fields(reference = %reference.as_ref().display(), candidate = %candidate.as_ref().display()))]
pub fn analyze_backlinks(
    reference: impl AsRef<Path>,
    candidate: impl AsRef<Path>,
    output: impl AsRef<Path>,
    formats: &FormatStore,
) -> Result<AnalysisReport> {
    let (reference, candidate, output) = (reference.as_ref(), candidate.as_ref(), output.as_ref());
    info!("starting backlink analysis");

    let reference_format = formats.reference()?;
    let candidate_format = formats.candidate()?;
    for (path, format) in [(reference, reference_format), (candidate, candidate_format)] {
        if !path.exists() {
            return Err(BacklinkError::missing_input(&format.name, path));
        }
    }

    let mut reference_table = load_table(reference, reference_format)?;
    let mut candidate_table = load_table(candidate, candidate_format)?;

    let unique = diff_backlinks(&mut reference_table, &mut candidate_table)?;
    write_projection(&unique, output, &[BACKLINKS, DA])?;

    Ok(AnalysisReport {
        reference_rows: reference_table.len(),
        candidate_rows: candidate_table.len(),
        unique_rows: unique.len(),
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::{csv_file, init_test_logging};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const MAGIS: &str = "Magis TV backlinks\nexported 2024-05-01\n\n\
#,Col2,Col3,NO,ANCHOR,BACKLINKS,DA,WEBSITE\n\
1,,,1,watch,http://www.x.com,10,magis.tv\n";

    const METHYLATED: &str = "Methylated B12\nbacklinks\n\nsource: tool\n\
#,Col2,Col3,NO,WEBSITE,ANCHOR,BACKLINKS,DA\n\
1,,,1,b12.com,shop,http://x.com,5\n\
2,,,2,b12.com,guide,http://y.com,3\n";

    #[test]
    fn end_to_end_only_new_domain_is_written() -> Result<()> {
        init_test_logging();
        let magis = csv_file(MAGIS)?;
        let methylated = csv_file(METHYLATED)?;
        let dir = tempdir()?;
        let out = dir.path().join("backlinks_to_use_for_magis.csv");

        let report = analyze_backlinks(magis.path(), methylated.path(), &out, &FormatStore::default())?;

        assert_eq!(
            report,
            AnalysisReport {
                reference_rows: 1,
                candidate_rows: 2,
                unique_rows: 1,
                output: out.clone(),
            }
        );
        assert_eq!(fs::read_to_string(&out)?, "BACKLINKS,DA\nhttp://y.com,3\n");
        Ok(())
    }

    #[test]
    fn missing_reference_leaves_output_alone() -> Result<()> {
        let methylated = csv_file(METHYLATED)?;
        let dir = tempdir()?;
        let out = dir.path().join("out.csv");
        let fresh = dir.path().join("fresh.csv");
        fs::write(&out, "BACKLINKS,DA\nhttp://earlier.com,7\n")?;

        let err = analyze_backlinks(
            dir.path().join("Magis_Tv.csv"),
            methylated.path(),
            &fresh,
            &FormatStore::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BacklinkError::MissingInput { ref role, .. } if role == "reference"));
        assert!(!fresh.exists());

        let err = analyze_backlinks(
            dir.path().join("Magis_Tv.csv"),
            methylated.path(),
            &out,
            &FormatStore::default(),
        )
        .unwrap_err();

        assert!(matches!(err, BacklinkError::MissingInput { ref role, .. } if role == "reference"));
        assert_eq!(
            fs::read_to_string(&out)?,
            "BACKLINKS,DA\nhttp://earlier.com,7\n"
        );
        Ok(())
    }

    #[test]
    fn missing_candidate_checked_before_loading() -> Result<()> {
        // reference is unparseable, but the missing candidate is reported first
        let magis = csv_file("p\np\np\nA,B\n1,2,3\n")?;
        let dir = tempdir()?;

        let err = analyze_backlinks(
            magis.path(),
            dir.path().join("Methylated_B12.csv"),
            dir.path().join("out.csv"),
            &FormatStore::default(),
        )
        .unwrap_err();

        assert!(matches!(err, BacklinkError::MissingInput { ref role, .. } if role == "candidate"));
        Ok(())
    }

    #[test]
    fn shape_mismatch_surfaces_as_missing_column() -> Result<()> {
        let magis = csv_file("p\np\np\nURL,DA\nhttp://a.com,1\n")?;
        let methylated = csv_file(METHYLATED)?;
        let dir = tempdir()?;
        let out = dir.path().join("out.csv");

        let err = analyze_backlinks(magis.path(), methylated.path(), &out, &FormatStore::default())
            .unwrap_err();

        assert!(matches!(
            err,
            BacklinkError::MissingColumn { ref column, ref table }
                if column == "BACKLINKS" && table == &magis.path().display().to_string()
        ));
        assert!(!out.exists());
        Ok(())
    }
}
