//! Fixed-mapping feature row normalization

use super::RowLocation;
use crate::Result;
use crate::app::models::{FeatureRecord, NormalizedRecord};
use crate::app::services::country_index::CountryIndex;
use crate::app::services::identifier::canonical_url;
use crate::constants::{feature_offsets, fields};

/// Normalize one feature dump row.
///
/// Reads the fixed offsets of the geonames dump format and resolves the
/// country code through `countries`; an unknown code yields a `null`
/// country rather than an error.
pub fn normalize_feature_row(
    row: &[&str],
    countries: &CountryIndex,
    location: RowLocation<'_>,
) -> Result<FeatureRecord> {
    if row.len() < feature_offsets::MIN_FIELDS {
        return Err(location.row_format(format!(
            "feature row has {} fields, expected at least {}",
            row.len(),
            feature_offsets::MIN_FIELDS
        )));
    }

    let geonameid = row[feature_offsets::GEONAME_ID];
    if geonameid.is_empty() {
        return Err(location.row_format("feature row has an empty geonameid"));
    }

    let country_code = row[feature_offsets::COUNTRY_CODE];
    let canonical_url = canonical_url(geonameid);

    let mut record = NormalizedRecord::new();
    record.put(fields::DC_IDENTIFIER, canonical_url.clone());
    record.put(fields::GEONAME_ID, geonameid);
    record.put_optional(
        fields::COUNTRY,
        countries.get(country_code).map(str::to_string),
    );
    record.put(fields::DC_TITLE, row[feature_offsets::NAME]);
    record.put(fields::LATITUDE, row[feature_offsets::LATITUDE]);
    record.put(fields::LONGITUDE, row[feature_offsets::LONGITUDE]);

    Ok(FeatureRecord {
        geonameid: geonameid.to_string(),
        country_code: country_code.to_string(),
        canonical_url,
        record,
    })
}
