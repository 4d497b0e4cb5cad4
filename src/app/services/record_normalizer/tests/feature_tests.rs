//! Tests for fixed-mapping feature normalization

use super::*;
use crate::Error;
use crate::app::services::country_index::CountryIndex;
use crate::app::services::delimited_reader::{DelimitedReader, split_fields};
use crate::app::services::record_normalizer::{RowLocation, normalize_feature_row};
use std::io::Cursor;
use std::path::Path;

fn location() -> RowLocation<'static> {
    RowLocation::new(Path::new("FR.txt"), 1)
}

fn index_with_france() -> CountryIndex {
    let content = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\nFR\tFRA\t250\tFR\tFrance\n";
    let reader = DelimitedReader::from_reader(Path::new("countryInfo.txt"), Cursor::new(content));
    CountryIndex::build(reader, false).unwrap().0
}

#[test]
fn test_paris_row() {
    let row = split_fields(PARIS_ROW);
    let feature = normalize_feature_row(&row, &index_with_france(), location()).unwrap();

    assert_eq!(feature.geonameid, "2988507");
    assert_eq!(feature.country_code, "FR");
    assert_eq!(feature.canonical_url, "http://geonames.org/2988507");
    assert_eq!(feature.record.get("country"), Some("France"));
    assert_eq!(feature.record.get("latitude"), Some("48.85"));
    assert_eq!(feature.record.get("longitude"), Some("2.35"));
    assert_eq!(feature.record.get("dc_title"), Some("Paris"));
    assert_eq!(
        feature.record.get("dc_identifier"),
        Some("http://geonames.org/2988507")
    );
}

#[test]
fn test_record_key_order() {
    let row = split_fields(PARIS_ROW);
    let feature = normalize_feature_row(&row, &index_with_france(), location()).unwrap();

    let keys: Vec<&str> = feature.record.keys().collect();
    assert_eq!(
        keys,
        vec![
            "dc_identifier",
            "geonameid",
            "country",
            "dc_title",
            "latitude",
            "longitude"
        ]
    );
}

#[test]
fn test_unknown_country_code_is_null() {
    let row = split_fields(PARIS_ROW);
    let feature = normalize_feature_row(&row, &CountryIndex::default(), location()).unwrap();

    assert!(feature.record.is_null("country"));
    assert!(feature.record.to_json().unwrap().contains(r#""country":null"#));
}

#[test]
fn test_short_feature_row_is_row_format_error() {
    let row = split_fields("2988507\tParis\tParis\t\t48.85\t2.35");

    match normalize_feature_row(&row, &index_with_france(), location()) {
        Err(Error::RowFormat { message, .. }) => assert!(message.contains("6 fields")),
        other => panic!("expected row format error, got {:?}", other),
    }
}

#[test]
fn test_empty_geonameid_is_row_format_error() {
    let row = split_fields("\tParis\tParis\t\t48.85\t2.35\tP\tPPLC\tFR");
    let result = normalize_feature_row(&row, &index_with_france(), location());
    assert!(matches!(result, Err(Error::RowFormat { .. })));
}
