//! ISO code to country name index built from `countryInfo.txt`
//!
//! The index is built once before feature rows are processed and is only
//! read afterwards. Later rows overwrite earlier rows for the same code.

use crate::app::services::delimited_reader::{DelimitedReader, split_fields};
use crate::app::services::header_resolver::locate_header;
use crate::constants::reference_offsets;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Statistics about building the country index
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Data rows read after the header line
    pub rows_read: usize,

    /// Rows that replaced an existing code
    pub codes_overwritten: usize,

    /// Rows skipped as malformed (skip policy only)
    pub rows_skipped: usize,

    /// Messages for skipped rows
    pub warnings: Vec<String>,
}

/// Lookup from ISO country code to display name
#[derive(Debug, Clone, Default)]
pub struct CountryIndex {
    names: HashMap<String, String>,
    source: PathBuf,
}

impl CountryIndex {
    /// Build the index by scanning the reference file's data rows.
    ///
    /// Rows with fewer than five fields are a `RowFormat` error unless
    /// `skip_malformed` is set, in which case they are logged and skipped.
    pub fn build(mut reader: DelimitedReader, skip_malformed: bool) -> Result<(Self, IndexStats)> {
        let mut index = Self {
            names: HashMap::new(),
            source: reader.source().to_path_buf(),
        };
        let mut stats = IndexStats::default();

        if locate_header(&mut reader)?.is_none() {
            return Ok((index, stats));
        }

        while let Some(line) = reader.next() {
            let line = line?;
            stats.rows_read += 1;
            let fields = split_fields(&line);

            if fields.len() < reference_offsets::MIN_FIELDS {
                let err = Error::row_format(
                    reader.source(),
                    reader.line_number(),
                    format!(
                        "reference row has {} fields, expected at least {}",
                        fields.len(),
                        reference_offsets::MIN_FIELDS
                    ),
                );
                if !skip_malformed {
                    return Err(err);
                }
                warn!("Skipping malformed reference row: {}", err);
                stats.rows_skipped += 1;
                stats.warnings.push(err.to_string());
                continue;
            }

            let code = fields[reference_offsets::ISO_CODE];
            let name = fields[reference_offsets::COUNTRY_NAME];
            if let Some(previous) = index.names.insert(code.to_string(), name.to_string()) {
                debug!("Country code {} redefined: '{}' -> '{}'", code, previous, name);
                stats.codes_overwritten += 1;
            }
        }

        info!(
            "Country index built from {}: {} codes from {} rows",
            index.source.display(),
            index.names.len(),
            stats.rows_read
        );

        Ok((index, stats))
    }

    /// Country name for an ISO code (case-sensitive)
    pub fn get(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    /// Number of distinct codes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reference file the index was built from
    pub fn source(&self) -> &std::path::Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    fn reader_over(content: &str) -> DelimitedReader {
        DelimitedReader::from_reader(Path::new("countryInfo.txt"), Cursor::new(content.to_string()))
    }

    const HEADER: &str = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital";

    #[test]
    fn test_build_from_reference_rows() {
        let content = format!(
            "# comment\n{}\nFR\tFRA\t250\tFR\tFrance\tParis\nAU\tAUS\t036\tAS\tAustralia\tCanberra\n",
            HEADER
        );
        let (index, stats) = CountryIndex::build(reader_over(&content), false).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("FR"), Some("France"));
        assert_eq!(index.get("AU"), Some("Australia"));
        assert_eq!(index.get("fr"), None);
        assert_eq!(stats.rows_read, 2);
    }

    #[test]
    fn test_rows_before_sentinel_are_ignored() {
        let content = format!("XX\tXXX\t000\tXX\tNowhere\n{}\nFR\tFRA\t250\tFR\tFrance\n", HEADER);
        let (index, _) = CountryIndex::build(reader_over(&content), false).unwrap();

        assert!(!index.contains("XX"));
        assert!(index.contains("FR"));
    }

    #[test]
    fn test_last_write_wins() {
        let content = format!(
            "{}\nFR\tFRA\t250\tFR\tFrance\nFR\tFRA\t250\tFR\tRépublique française\n",
            HEADER
        );
        let (index, stats) = CountryIndex::build(reader_over(&content), false).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("FR"), Some("République française"));
        assert_eq!(stats.codes_overwritten, 1);
    }

    #[test]
    fn test_short_row_is_fatal_by_default() {
        let content = format!("{}\nFR\tFRA\t250\n", HEADER);

        match CountryIndex::build(reader_over(&content), false) {
            Err(Error::RowFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected row format error, got {:?}", other.map(|(i, _)| i.len())),
        }
    }

    #[test]
    fn test_short_row_skipped_when_tolerated() {
        let content = format!("{}\nFR\tFRA\t250\nAU\tAUS\t036\tAS\tAustralia\n", HEADER);
        let (index, stats) = CountryIndex::build(reader_over(&content), true).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.warnings.len(), 1);
    }

    #[test]
    fn test_missing_sentinel_yields_empty_index() {
        let (index, stats) =
            CountryIndex::build(reader_over("FR\tFRA\t250\tFR\tFrance\n"), false).unwrap();
        assert!(index.is_empty());
        assert_eq!(stats.rows_read, 0);
    }

    #[test]
    fn test_bundled_reference_index() {
        let (index, _) = CountryIndex::build(DelimitedReader::bundled(), false).unwrap();
        assert_eq!(index.get("AU"), Some("Australia"));
        assert_eq!(index.get("FR"), Some("France"));
    }
}
