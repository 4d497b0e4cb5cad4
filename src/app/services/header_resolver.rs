//! `#ISO` header line detection and field name normalization
//!
//! Geonames reference files declare their columns in a comment line that
//! starts with `#ISO` and a tab. Everything before that line is free-form
//! commentary; everything after it is data.

use crate::app::models::HeaderMap;
use crate::app::services::delimited_reader::DelimitedReader;
use crate::constants::{AREA_ALIAS, AREA_PREFIX, COMMENT_MARKER, FIELD_DELIMITER, HEADER_SENTINEL};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Whether a line is the sentinel header line
pub fn is_header_line(line: &str) -> bool {
    line.starts_with(HEADER_SENTINEL)
}

/// Normalize one header token into a field name
pub fn normalize_field_name(token: &str) -> String {
    if token.starts_with(AREA_PREFIX) {
        return AREA_ALIAS.to_string();
    }
    token.trim().replace(' ', "_")
}

/// Build the header map from a sentinel line
pub fn resolve_header(line: &str) -> HeaderMap {
    let body = line.strip_prefix(COMMENT_MARKER).unwrap_or(line);
    let fields = body
        .split(FIELD_DELIMITER)
        .map(normalize_field_name)
        .collect();
    HeaderMap::from_fields(fields)
}

/// First field name that occurs more than once
pub fn find_duplicate_field(header: &HeaderMap) -> Option<&str> {
    let mut seen = HashSet::new();
    header.iter().map(|(_, name)| name).find(|name| !seen.insert(*name))
}

/// Consume lines up to and including the sentinel header line.
///
/// Returns `Ok(None)` when the stream ends without a sentinel; the reader
/// is then exhausted and the caller has no data rows to process.
pub fn locate_header(reader: &mut DelimitedReader) -> Result<Option<HeaderMap>> {
    while let Some(line) = reader.next() {
        let line = line?;
        if !is_header_line(&line) {
            continue;
        }

        let header = resolve_header(&line);
        if let Some(duplicate) = find_duplicate_field(&header) {
            return Err(Error::row_format(
                reader.source(),
                reader.line_number(),
                format!("header declares field '{}' more than once", duplicate),
            ));
        }

        debug!(
            "Resolved {} header fields at line {} of {}",
            header.len(),
            reader.line_number(),
            reader.source().display()
        );
        return Ok(Some(header));
    }

    warn!(
        "No '#ISO' header line found in {}; no rows will be harvested",
        reader.source().display()
    );
    Ok(None)
}
