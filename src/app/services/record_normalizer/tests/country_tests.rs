//! Tests for schema-driven country normalization

use super::*;
use crate::Error;
use crate::app::models::{FilterReason, RowOutcome};
use crate::app::services::delimited_reader::split_fields;
use crate::app::services::record_normalizer::country::detail_file_path;
use crate::app::services::record_normalizer::{RowLocation, normalize_country_row};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn location() -> RowLocation<'static> {
    RowLocation::new(Path::new("countryInfo.txt"), 10)
}

fn folder_with(iso_codes: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for code in iso_codes {
        fs::write(dir.path().join(format!("{}.txt", code)), "detail").unwrap();
    }
    dir
}

#[test]
fn test_accepted_row_contains_every_header_field() {
    let folder = folder_with(&["AU"]);
    let header = country_info_header();
    let row = split_fields(AUSTRALIA_ROW);

    let outcome = normalize_country_row(&row, &header, folder.path(), location()).unwrap();
    let country = outcome.accepted().expect("row should be accepted");

    for (_, name) in header.iter() {
        assert!(country.record.contains_key(name), "missing field {}", name);
    }
    assert_eq!(country.record.get("ISO"), Some("AU"));
    assert_eq!(country.record.get("AreaInSqKm"), Some("7686850"));
    assert_eq!(country.record.get("Postal_Code_Format"), Some("####"));
    assert_eq!(country.record.get("neighbours"), Some(""));
}

#[test]
fn test_derived_fields() {
    let folder = folder_with(&["AU"]);
    let row = split_fields(AUSTRALIA_ROW);

    let country = normalize_country_row(&row, &country_info_header(), folder.path(), location())
        .unwrap()
        .accepted()
        .unwrap();

    assert_eq!(country.iso_code, "AU");
    assert_eq!(country.country_name, "Australia");
    assert_eq!(country.canonical_url, "http://geonames.org/2077456");
    assert_eq!(
        country.record.get("dc_identifier"),
        Some("http://geonames.org/2077456")
    );
    assert_eq!(country.record.get("dc_title"), Some("Australia"));
    assert_eq!(country.detail_file, folder.path().join("AU.txt"));
    // 19 header fields plus the two derived keys
    assert_eq!(country.record.len(), 21);
}

#[test]
fn test_missing_detail_file_is_filtered() {
    let folder = folder_with(&["NZ"]);
    let row = split_fields(AUSTRALIA_ROW);

    let outcome =
        normalize_country_row(&row, &country_info_header(), folder.path(), location()).unwrap();

    match outcome {
        RowOutcome::Filtered(FilterReason::MissingDetailFile { iso_code, path }) => {
            assert_eq!(iso_code, "AU");
            assert_eq!(path, detail_file_path(folder.path(), "AU"));
        }
        RowOutcome::Accepted(_) => panic!("row without detail file must be filtered"),
    }
}

#[test]
fn test_row_wider_than_header_is_row_format_error() {
    let folder = folder_with(&["AU"]);
    let wide = format!("{}\textra", AUSTRALIA_ROW);
    let row = split_fields(&wide);

    match normalize_country_row(&row, &country_info_header(), folder.path(), location()) {
        Err(Error::RowFormat { line, message, .. }) => {
            assert_eq!(line, 10);
            assert!(message.contains("20 fields"));
        }
        other => panic!("expected row format error, got {:?}", other),
    }
}

#[test]
fn test_short_row_keeps_present_fields() {
    let folder = folder_with(&["AU"]);
    let header = country_info_header();
    // Truncated after geonameid
    let row = split_fields(
        "AU\tAUS\t036\tAS\tAustralia\tCanberra\t7686850\t24992369\tOC\t.au\tAUD\tDollar\t61\t####\t^(\\d{4})$\ten-AU\t2077456",
    );

    let country = normalize_country_row(&row, &header, folder.path(), location())
        .unwrap()
        .accepted()
        .unwrap();

    assert_eq!(country.record.get("geonameid"), Some("2077456"));
    assert!(!country.record.contains_key("neighbours"));
}

#[test]
fn test_accepted_row_without_geonameid_is_row_format_error() {
    let folder = folder_with(&["AU"]);
    let row = split_fields("AU\tAUS\t036\tAS\tAustralia");

    let result = normalize_country_row(&row, &country_info_header(), folder.path(), location());
    assert!(matches!(result, Err(Error::RowFormat { .. })));
}

#[test]
fn test_filtered_row_without_geonameid_is_not_an_error() {
    let folder = folder_with(&[]);
    let row = split_fields("AU\tAUS\t036\tAS\tAustralia");

    let outcome =
        normalize_country_row(&row, &country_info_header(), folder.path(), location()).unwrap();
    assert!(outcome.is_filtered());
}

#[test]
fn test_values_are_not_trimmed() {
    let folder = folder_with(&["AU"]);
    let row = split_fields(
        "AU\tAUS\t036\tAS\t Australia \tCanberra\t7686850\t24992369\tOC\t.au\tAUD\tDollar\t61\t####\t^(\\d{4})$\ten-AU\t2077456\t\t",
    );

    let country = normalize_country_row(&row, &country_info_header(), folder.path(), location())
        .unwrap()
        .accepted()
        .unwrap();

    assert_eq!(country.record.get("Country"), Some(" Australia "));
    assert_eq!(country.record.get("dc_title"), Some(" Australia "));
}

#[test]
fn test_iso_code_with_path_segments_is_row_format_error() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("countries");
    fs::create_dir_all(&folder).unwrap();
    fs::write(dir.path().join("countryInfo.txt"), "outside the folder").unwrap();
    let escaping = AUSTRALIA_ROW.replacen("AU", "../countryInfo", 1);
    let row = split_fields(&escaping);

    match normalize_country_row(&row, &country_info_header(), &folder, location()) {
        Err(Error::RowFormat { line, message, .. }) => {
            assert_eq!(line, 10);
            assert!(message.contains("../countryInfo"));
        }
        other => panic!("expected row format error, got {:?}", other),
    }
}
