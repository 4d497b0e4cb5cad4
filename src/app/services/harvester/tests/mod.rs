//! Tests for the harvester module
//!
//! Fixtures write small geonames files into temporary directories and run
//! harvesters against a [`MemoryStore`].


use crate::app::adapters::object_store::MemoryStore;
use crate::config::HarvestConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const COUNTRY_INFO_HEADER: &str = "#ISO\tISO3\tISO-Numeric\tfips\tCountry\tCapital\tArea(in sq km)\tPopulation\tContinent\ttld\tCurrencyCode\tCurrencyName\tPhone\tPostal Code Format\tPostal Code Regex\tLanguages\tgeonameid\tneighbours\tEquivalentFipsCode";

pub const AUSTRALIA_ROW: &str = "AU\tAUS\t036\tAS\tAustralia\tCanberra\t7686850\t24992369\tOC\t.au\tAUD\tDollar\t61\t####\t^(\\d{4})$\ten-AU\t2077456\t\t";

pub const FRANCE_ROW: &str = "FR\tFRA\t250\tFR\tFrance\tParis\t547030\t66987244\tEU\t.fr\tEUR\tEuro\t33\t#####\t^(\\d{5})$\tfr-FR,frp,br,co,ca,eu,oc\t3017382\tCH,DE,BE,LU,IT,AD,MC,ES\t";

pub const PARIS_ROW: &str = "2988507\tParis\tParis\tLutetia,Paris\t48.85\t2.35\tP\tPPLC\tFR\t\t11\t75\t751\t75056\t2138551\t\t42\tEurope/Paris\t2020-03-03";

/// Temporary workspace holding a reference file and a country folder
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("countries")).unwrap();
        Self { dir }
    }

    pub fn country_folder(&self) -> PathBuf {
        self.dir.path().join("countries")
    }

    /// Write `countryInfo.txt` from a comment line, the header, and `rows`
    pub fn write_country_info(&self, rows: &[&str]) -> PathBuf {
        let mut content = format!("# GeoNames country information\n{}\n", COUNTRY_INFO_HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        self.write_file("countryInfo.txt", &content)
    }

    /// Write `<ISO>.txt` into the country folder
    pub fn write_detail(&self, iso_code: &str, content: &str) {
        fs::write(self.country_folder().join(format!("{}.txt", iso_code)), content).unwrap();
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Countries-mode configuration over this fixture
    pub fn countries_config(&self, country_info: PathBuf) -> HarvestConfig {
        HarvestConfig::default()
            .with_country_info(country_info)
            .with_country_folder(self.country_folder())
    }

    /// Features-mode configuration over this fixture
    pub fn features_config(&self, country_info: PathBuf, feature_file: PathBuf) -> HarvestConfig {
        HarvestConfig::default()
            .with_country_info(country_info)
            .with_feature_file(feature_file)
    }
}

pub fn store() -> MemoryStore {
    MemoryStore::new()
}
