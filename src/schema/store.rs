use std::{collections::BTreeMap, fs, path::Path};

use tracing::info;

use super::SourceFormat;
use crate::errors::{BacklinkError, Result};

/// Named source formats: the two built-in layouts, optionally overridden
/// from a YAML file.
#[derive(Debug, Clone)]
pub struct FormatStore {
    map: BTreeMap<String, SourceFormat>,
}

impl Default for FormatStore {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        for f in [SourceFormat::reference(), SourceFormat::candidate()] {
            map.insert(f.name.clone(), f);
        }
        Self { map }
    }
}

impl FormatStore {
    /// Start from the built-ins and overlay every format defined in `path`.
    ///
    /// The file is a mapping of format name → `SourceFormat`:
    ///
    /// ```yaml
    /// reference:
    ///   skip_rows: 2
    ///   columns: ["#", Col2, Col3, NO, ANCHOR, BACKLINKS, DA, WEBSITE]
    ///   delimiter: ";"
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BacklinkError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| BacklinkError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let overrides: BTreeMap<String, SourceFormat> = serde_yaml::from_str(text)?;
        let mut store = Self::default();
        for (name, mut format) in overrides {
            format.name = name.clone();
            info!(format = %name, skip_rows = format.skip_rows, "format override");
            store.map.insert(name, format);
        }
        Ok(store)
    }

    pub fn get(&self, name: &str) -> Result<&SourceFormat> {
        self.map
            .get(name)
            .ok_or_else(|| BacklinkError::UnknownFormat(name.to_string()))
    }

    pub fn reference(&self) -> Result<&SourceFormat> {
        self.get("reference")
    }

    pub fn candidate(&self) -> Result<&SourceFormat> {
        self.get("candidate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn builtins_are_present() -> Result<()> {
        let store = FormatStore::default();
        assert_eq!(store.reference()?.skip_rows, 3);
        assert_eq!(store.candidate()?.skip_rows, 4);
        assert_eq!(store.candidate()?.columns[6], "BACKLINKS");
        Ok(())
    }

    #[test]
    fn yaml_overrides_by_name_and_keeps_the_rest() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(
            tmp,
            r#"
reference:
  skip_rows: 1
  columns: [URL, DA]
  delimiter: ";"
"#
        )?;

        let store = FormatStore::load(tmp.path())?;
        let reference = store.reference()?;
        assert_eq!(reference.name, "reference");
        assert_eq!(reference.skip_rows, 1);
        assert_eq!(reference.columns, vec!["URL", "DA"]);
        assert_eq!(reference.delimiter, b';');
        assert_eq!(store.candidate()?, &SourceFormat::candidate());
        Ok(())
    }

    #[test]
    fn unknown_format_and_bad_yaml_are_errors() {
        let store = FormatStore::default();
        assert!(matches!(
            store.get("nope"),
            Err(BacklinkError::UnknownFormat(n)) if n == "nope"
        ));

        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "reference:\n  skip_rows: [oops]\n").unwrap();
        assert!(matches!(
            FormatStore::load(tmp.path()),
            Err(BacklinkError::ConfigParse { .. })
        ));
        assert!(matches!(
            FormatStore::load("/definitely/not/here.yaml"),
            Err(BacklinkError::ConfigRead { .. })
        ));
    }
}
