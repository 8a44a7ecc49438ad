// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// Column that carries the backlink URL in every supported export.
pub const BACKLINKS: &str = "BACKLINKS";
/// Opaque authority score, passed through untouched.
pub const DA: &str = "DA";
/// Derived comparison key appended by the normalizer.
pub const NORMALIZED: &str = "normalized";

/// Layout of one backlink export: how many preamble lines precede the header
/// row and what the 8 positional columns mean.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct SourceFormat {
    #[serde(default)]
    pub name: String,
    pub skip_rows: usize,
    pub columns: Vec<String>,
    #[serde(default = "default_delimiter", with = "delimiter_char")]
    pub delimiter: u8,
}

fn default_delimiter() -> u8 {
    b','
}

impl SourceFormat {
    pub fn new(name: &str, skip_rows: usize, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            skip_rows,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            delimiter: default_delimiter(),
        }
    }

    /// "Magis" style export: 3 preamble lines, anchor before backlink.
    pub fn reference() -> Self {
        Self::new(
            "reference",
            3,
            &["#", "Col2", "Col3", "NO", "ANCHOR", BACKLINKS, DA, "WEBSITE"],
        )
    }

    /// "Methylated" style export: 4 preamble lines, website first.
    pub fn candidate() -> Self {
        Self::new(
            "candidate",
            4,
            &["#", "Col2", "Col3", "NO", "WEBSITE", "ANCHOR", BACKLINKS, DA],
        )
    }
}

/// YAML carries the delimiter as a one-character string (`","`, `";"`, `"\t"`).
mod delimiter_char {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &u8, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&(*d as char).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.as_bytes() {
            [b] => Ok(*b),
            _ => Err(D::Error::custom(format!(
                "delimiter must be a single ASCII character, got {:?}",
                raw
            ))),
        }
    }
}
