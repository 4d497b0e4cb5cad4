//! Core data structures for geonames harvesting.
//!
//! Defines the header map learned from the reference file, the
//! insertion-ordered normalized record, and the per-row outcome types
//! that flow from the normalizer to the persistence adapter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Harvest modes supported by the harvester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarvestMode {
    /// Schema-driven: one object per country row of the reference file
    Countries,
    /// Fixed-mapping: one object per feature row joined against the country index
    Features,
}

impl HarvestMode {
    /// Stable lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestMode::Countries => "countries",
            HarvestMode::Features => "features",
        }
    }
}

impl fmt::Display for HarvestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from 0-based column index to field name.
///
/// Backed by a vector so indices are contiguous from 0 by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap {
    fields: Vec<String>,
}

impl HeaderMap {
    /// Build a header map from field names in column order
    pub fn from_fields(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Field name at a column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(index, name)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.fields.iter().map(String::as_str).enumerate()
    }
}

/// Metadata document built from one data row.
///
/// Keys keep their first insertion position; a repeated put replaces the
/// value (last write wins). `None` values serialize as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: IndexMap<String, Option<String>>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a string value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Some(value.into()));
    }

    /// Put an optional value, storing `null` when absent
    pub fn put_optional(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// String value for a key; `None` when missing or null
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|value| value.as_deref())
    }

    /// Whether the key is present (including null values)
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Whether the key is present with a null value
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(None))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Compact JSON object text
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Normalized country row ready for persistence
#[derive(Debug, Clone)]
pub struct CountryRecord {
    /// ISO code, used to name payloads and locate the detail file
    pub iso_code: String,

    /// Country display name (empty when the row has no `Country` column)
    pub country_name: String,

    /// `http://geonames.org/<geonameid>`
    pub canonical_url: String,

    /// Country detail file that gated the row
    pub detail_file: PathBuf,

    /// Metadata document
    pub record: NormalizedRecord,
}

/// Normalized feature row ready for persistence
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    /// Geonames feature identifier
    pub geonameid: String,

    /// ISO code of the feature's country
    pub country_code: String,

    /// `http://geonames.org/<geonameid>`
    pub canonical_url: String,

    /// Metadata document
    pub record: NormalizedRecord,
}

/// Why a row produced no object without being an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    /// The supporting `<ISO>.txt` file is absent from the country folder
    MissingDetailFile { iso_code: String, path: PathBuf },
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterReason::MissingDetailFile { iso_code, path } => {
                write!(f, "no detail file for {} at {}", iso_code, path.display())
            }
        }
    }
}

/// Result of normalizing one row: accepted for persistence, or filtered out
#[derive(Debug, Clone)]
pub enum RowOutcome<T> {
    Accepted(T),
    Filtered(FilterReason),
}

impl<T> RowOutcome<T> {
    pub fn is_filtered(&self) -> bool {
        matches!(self, RowOutcome::Filtered(_))
    }

    /// The accepted record, if any
    pub fn accepted(self) -> Option<T> {
        match self {
            RowOutcome::Accepted(record) => Some(record),
            RowOutcome::Filtered(_) => None,
        }
    }
}
