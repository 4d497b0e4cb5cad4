//! Schema-driven country row normalization

use super::RowLocation;
use crate::Result;
use crate::app::models::{CountryRecord, FilterReason, HeaderMap, NormalizedRecord, RowOutcome};
use crate::app::services::identifier::canonical_url;
use crate::constants::{DETAIL_FILE_EXT, columns, fields};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Normalize one country row against the resolved header.
///
/// Every field is stored under its header name. `geonameid` also yields
/// `dc_identifier`, `Country` also yields `dc_title`, and `ISO` is captured
/// as the grouping key. Rows whose `<ISO>.txt` is missing from
/// `country_folder` are filtered rather than rejected.
///
/// # Errors
/// * `RowFormat` when the row is wider than the header
/// * `RowFormat` when the ISO code is not a plain alphanumeric code
/// * `RowFormat` when an accepted row has no `geonameid` value
pub fn normalize_country_row(
    row: &[&str],
    header: &HeaderMap,
    country_folder: &Path,
    location: RowLocation<'_>,
) -> Result<RowOutcome<CountryRecord>> {
    let mut record = NormalizedRecord::new();
    let mut iso_code = "";
    let mut country_name = "";
    let mut identifier_url = None;

    for (index, &value) in row.iter().enumerate() {
        let name = header.get(index).ok_or_else(|| {
            location.row_format(format!(
                "row has {} fields but the header declares {}",
                row.len(),
                header.len()
            ))
        })?;

        record.put(name, value);
        match name {
            columns::GEONAME_ID => {
                let url = canonical_url(value);
                record.put(fields::DC_IDENTIFIER, url.clone());
                identifier_url = Some(url).filter(|_| !value.is_empty());
            }
            columns::COUNTRY => {
                country_name = value;
                record.put(fields::DC_TITLE, value);
            }
            columns::ISO => iso_code = value,
            _ => {}
        }
    }

    if !is_plain_code(iso_code) {
        return Err(location.row_format(format!("invalid ISO code '{}'", iso_code)));
    }

    let detail_file = detail_file_path(country_folder, iso_code);
    if !detail_file.is_file() {
        debug!("Skipping {}: {} not found", iso_code, detail_file.display());
        return Ok(RowOutcome::Filtered(FilterReason::MissingDetailFile {
            iso_code: iso_code.to_string(),
            path: detail_file,
        }));
    }

    let canonical_url = identifier_url.ok_or_else(|| {
        location.row_format(format!("country row '{}' has no geonameid value", iso_code))
    })?;

    Ok(RowOutcome::Accepted(CountryRecord {
        iso_code: iso_code.to_string(),
        country_name: country_name.to_string(),
        canonical_url,
        detail_file,
        record,
    }))
}

/// `<country_folder>/<ISO>.txt`
pub fn detail_file_path(country_folder: &Path, iso_code: &str) -> PathBuf {
    country_folder.join(format!("{}.{}", iso_code, DETAIL_FILE_EXT))
}

/// ISO codes name files inside the country folder, so no separators or dots.
/// An empty code is left to the detail-file gate.
fn is_plain_code(iso_code: &str) -> bool {
    iso_code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}
