//! Line streaming for tab-separated geonames dumps
//!
//! [`DelimitedReader`] yields the lines of a file lazily and releases the
//! underlying handle as soon as the stream ends or fails. [`split_fields`]
//! turns one line into the raw positional fields of a row.

use crate::constants::{BUNDLED_COUNTRY_INFO, BUNDLED_COUNTRY_INFO_NAME, FIELD_DELIMITER};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lazy, finite, non-restartable line stream over a text source
pub struct DelimitedReader {
    source: PathBuf,
    lines: Option<Lines<Box<dyn BufRead>>>,
    line_number: usize,
}

impl DelimitedReader {
    /// Open a file for sequential reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::read(path, "failed to open file", e))?;
        debug!("Opened {} for reading", path.display());
        Ok(Self::from_reader(path, BufReader::new(file)))
    }

    /// Stream the bundled reference `countryInfo.txt`
    pub fn bundled() -> Self {
        Self::from_reader(
            Path::new(BUNDLED_COUNTRY_INFO_NAME),
            Cursor::new(BUNDLED_COUNTRY_INFO.as_bytes()),
        )
    }

    /// Stream any buffered reader, reporting errors against `source`
    pub fn from_reader(source: &Path, reader: impl BufRead + 'static) -> Self {
        let boxed: Box<dyn BufRead> = Box::new(reader);
        Self {
            source: source.to_path_buf(),
            lines: Some(boxed.lines()),
            line_number: 0,
        }
    }

    /// Path (or display name) of the source being read
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// 1-based number of the line most recently yielded (0 before the first)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the underlying handle has been released
    pub fn is_closed(&self) -> bool {
        self.lines.is_none()
    }
}

impl Iterator for DelimitedReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;

        match lines.next() {
            Some(Ok(line)) => {
                self.line_number += 1;
                Some(Ok(line))
            }
            Some(Err(e)) => {
                self.lines = None;
                Some(Err(Error::read(
                    &self.source,
                    format!("read failed after line {}", self.line_number),
                    e,
                )))
            }
            None => {
                // Drop the handle at end of stream
                self.lines = None;
                None
            }
        }
    }
}

/// Split a line on tab into its raw fields.
///
/// No trimming is applied; empty fields, including trailing ones, are kept.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).collect()
}
