//! Test utilities for record normalization
//!
//! Provides the real 19-column geonames header and sample rows shared by
//! the country and feature normalizer tests.

use crate::app::models::HeaderMap;
use crate::app::services::header_resolver::resolve_header;

mod country_tests;
mod feature_tests;

/// `countryInfo.txt` header line as published by geonames.org
pub const COUNTRY_INFO_HEADER: &str = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode\tCurrencyName\tPhone\tPostal Code Format\tPostal Code Regex\tLanguages\tgeonameid\tneighbours\tEquivalentFipsCode";

/// Australia row of `countryInfo.txt`
pub const AUSTRALIA_ROW: &str = "AU\tAUS\t036\tAS\tAustralia\tCanberra\t7686850\t24992369\tOC\t.au\tAUD\tDollar\t61\t####\t^(\\d{4})$\ten-AU\t2077456\t\t";

/// Paris row of the France feature dump
pub const PARIS_ROW: &str = "2988507\tParis\tParis\tLutetia,Paname\t48.85\t2.35\tP\tPPLC\tFR\t\t11\t75\t751\t75056\t2138551\t\t42\tEurope/Paris\t2023-01-01";

/// Resolved header for [`COUNTRY_INFO_HEADER`]
pub fn country_info_header() -> HeaderMap {
    resolve_header(COUNTRY_INFO_HEADER)
}
