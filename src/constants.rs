//! Application constants for the geonames harvester
//!
//! Column names, sentinel markers, payload naming, and default locations
//! shared by the harvesting services.

// =============================================================================
// Harvester Identity
// =============================================================================

/// Plugin identifier of the country (schema-driven) harvester
pub const COUNTRY_HARVESTER_ID: &str = "geonames";

/// Display name of the country harvester
pub const COUNTRY_HARVESTER_NAME: &str = "Geonames Server Harvester";

/// Plugin identifier of the feature (fixed-mapping) harvester
pub const FEATURE_HARVESTER_ID: &str = "geonames-features";

/// Display name of the feature harvester
pub const FEATURE_HARVESTER_NAME: &str = "Geonames Feature Harvester";

// =============================================================================
// Reference File Format
// =============================================================================

/// Field delimiter used by every geonames dump
pub const FIELD_DELIMITER: char = '\t';

/// Prefix of the header line (`#ISO` followed by a tab)
pub const HEADER_SENTINEL: &str = "#ISO\t";

/// Comment marker stripped from the header line
pub const COMMENT_MARKER: char = '#';

/// Header tokens starting with this prefix are replaced by [`AREA_ALIAS`]
pub const AREA_PREFIX: &str = "Area";

/// Canonical name for the area column (`Area(in sq km)` in the dump)
pub const AREA_ALIAS: &str = "AreaInSqKm";

/// Bundled `countryInfo.txt` used when no reference file is configured
pub const BUNDLED_COUNTRY_INFO: &str = include_str!("../resources/countryInfo.txt");

/// Display name used in errors and logs for the bundled reference file
pub const BUNDLED_COUNTRY_INFO_NAME: &str = "<bundled>/countryInfo.txt";

/// Reference file column names that drive field derivations
pub mod columns {
    /// Geonames numeric identifier column
    pub const GEONAME_ID: &str = "geonameid";

    /// Country display name column
    pub const COUNTRY: &str = "Country";

    /// ISO 3166 alpha-2 code column
    pub const ISO: &str = "ISO";
}

/// Fixed reference file offsets used by the country code index
pub mod reference_offsets {
    /// ISO code column
    pub const ISO_CODE: usize = 0;

    /// Country name column
    pub const COUNTRY_NAME: usize = 4;

    /// Minimum number of fields a reference row must carry
    pub const MIN_FIELDS: usize = COUNTRY_NAME + 1;
}

/// Fixed feature dump offsets (geonames `<ISO>.txt` / `allCountries.txt`)
pub mod feature_offsets {
    /// Geonames identifier
    pub const GEONAME_ID: usize = 0;

    /// Feature name
    pub const NAME: usize = 1;

    /// Latitude in decimal degrees
    pub const LATITUDE: usize = 4;

    /// Longitude in decimal degrees
    pub const LONGITUDE: usize = 5;

    /// ISO country code
    pub const COUNTRY_CODE: usize = 8;

    /// Minimum number of fields a feature row must carry
    pub const MIN_FIELDS: usize = COUNTRY_CODE + 1;
}

// =============================================================================
// Normalized Record Keys
// =============================================================================

/// Metadata keys written into normalized records
pub mod fields {
    /// Canonical URL of the record
    pub const DC_IDENTIFIER: &str = "dc_identifier";

    /// Display title of the record
    pub const DC_TITLE: &str = "dc_title";

    /// Feature identifier (fixed-mapping mode)
    pub const GEONAME_ID: &str = "geonameid";

    /// Resolved country name (fixed-mapping mode)
    pub const COUNTRY: &str = "country";

    /// Latitude (fixed-mapping mode)
    pub const LATITUDE: &str = "latitude";

    /// Longitude (fixed-mapping mode)
    pub const LONGITUDE: &str = "longitude";
}

/// Base of the canonical URL hashed into object identifiers
pub const GEONAMES_URL_BASE: &str = "http://geonames.org/";

// =============================================================================
// Persistence
// =============================================================================

/// Content type of the JSON metadata payload
pub const METADATA_CONTENT_TYPE: &str = "text/json";

/// Content type of the raw country detail payload
pub const DETAIL_CONTENT_TYPE: &str = "text/plain";

/// Extension of the metadata payload name
pub const METADATA_PAYLOAD_EXT: &str = "json";

/// Extension of per-country detail files and their payload name
pub const DETAIL_FILE_EXT: &str = "txt";

/// Object property keys
pub mod properties {
    /// Signals downstream consumers that derived views are outstanding
    pub const RENDER_PENDING: &str = "render-pending";

    /// ISO code of a country object
    pub const ISO_CODE: &str = "ISOcode";

    /// Display name of a country object
    pub const COUNTRY_NAME: &str = "countryName";

    /// ISO code of a feature object
    pub const COUNTRY_CODE: &str = "countryCode";
}

/// Name of the per-object manifest written by the filesystem store
pub const OBJECT_MANIFEST_FILE: &str = "object.json";

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Environment variable overriding the harvester home directory
pub const HOME_ENV_VAR: &str = "FASCINATOR_HOME";

/// Placeholder expanded to the harvester home in configured paths
pub const HOME_PLACEHOLDER: &str = "${fascinator.home}";

/// Harvester home directory name under the user home
pub const DEFAULT_HOME_DIR_NAME: &str = ".fascinator";

/// Application directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "geonames-harvester";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default object store directory under the harvester home
pub const DEFAULT_STORAGE_DIR_NAME: &str = "storage";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_consistent() {
        assert_eq!(reference_offsets::MIN_FIELDS, 5);
        assert_eq!(feature_offsets::MIN_FIELDS, 9);
    }

    #[test]
    fn test_bundled_reference_has_sentinel() {
        assert!(
            BUNDLED_COUNTRY_INFO
                .lines()
                .any(|line| line.starts_with(HEADER_SENTINEL))
        );
    }
}
