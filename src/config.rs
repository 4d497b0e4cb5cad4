//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a JSON configuration file,
//! then command-line overrides. The file keeps the layout used by existing
//! harvester deployments:
//!
//! ```json
//! {
//!   "harvester": {
//!     "type": "geonames",
//!     "geonames": {
//!       "countryInfo": "${fascinator.home}/geonames/countryInfo.txt",
//!       "countryFolder": "${fascinator.home}/geonames/countries",
//!       "featureFile": "~/data/allCountries.txt",
//!       "skipMalformedRows": false
//!     }
//!   },
//!   "storage": { "path": "${fascinator.home}/storage" }
//! }
//! ```

use crate::app::models::HarvestMode;
use crate::app::services::delimited_reader::DelimitedReader;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_HOME_DIR_NAME, DEFAULT_STORAGE_DIR_NAME,
    HOME_ENV_VAR, HOME_PLACEHOLDER,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Effective harvester configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HarvestConfig {
    /// Reference `countryInfo.txt`; the bundled copy is used when unset
    pub country_info: Option<PathBuf>,

    /// Directory of per-country `<ISO>.txt` files (countries mode)
    pub country_folder: Option<PathBuf>,

    /// Feature dump such as `allCountries.txt` (features mode)
    pub feature_file: Option<PathBuf>,

    /// Skip malformed rows with a warning instead of aborting
    pub skip_malformed_rows: bool,

    /// Root directory of the filesystem object store
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    harvester: HarvesterSection,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
struct HarvesterSection {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    geonames: GeonamesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeonamesSection {
    country_info: Option<String>,
    country_folder: Option<String>,
    feature_file: Option<String>,
    skip_malformed_rows: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    path: Option<String>,
}

impl HarvestConfig {
    /// Parse configuration JSON; `source` names the text in error messages
    pub fn from_json_str(text: &str, source: &Path) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text).map_err(|e| {
            Error::configuration(format!("invalid config file {}: {}", source.display(), e))
        })?;

        if let Some(kind) = file.harvester.kind.as_deref() {
            if !kind.is_empty() && kind != "geonames" {
                warn!(
                    "Config {} declares harvester type '{}', reading its geonames section anyway",
                    source.display(),
                    kind
                );
            }
        }

        let home = harvester_home();
        let geonames = file.harvester.geonames;
        Ok(Self {
            country_info: setting_path(geonames.country_info, &home),
            country_folder: setting_path(geonames.country_folder, &home),
            feature_file: setting_path(geonames.feature_file, &home),
            skip_malformed_rows: geonames.skip_malformed_rows.unwrap_or(false),
            storage_path: setting_path(file.storage.path, &home),
        })
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_json_str(&text, path)
    }

    /// Load the explicit file, else the default file if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Layer `overrides` on top; set values in `overrides` win
    pub fn merge(self, overrides: HarvestConfig) -> Self {
        Self {
            country_info: overrides.country_info.or(self.country_info),
            country_folder: overrides.country_folder.or(self.country_folder),
            feature_file: overrides.feature_file.or(self.feature_file),
            skip_malformed_rows: overrides.skip_malformed_rows || self.skip_malformed_rows,
            storage_path: overrides.storage_path.or(self.storage_path),
        }
    }

    pub fn with_country_info(mut self, path: impl Into<PathBuf>) -> Self {
        self.country_info = Some(path.into());
        self
    }

    pub fn with_country_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.country_folder = Some(path.into());
        self
    }

    pub fn with_feature_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.feature_file = Some(path.into());
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Skip malformed rows instead of failing the run
    pub fn with_skip_malformed_rows(mut self) -> Self {
        self.skip_malformed_rows = true;
        self
    }

    /// Apply an explicit malformed-row policy; `None` keeps the current one
    pub fn with_skip_policy(mut self, skip: Option<bool>) -> Self {
        if let Some(skip) = skip {
            self.skip_malformed_rows = skip;
        }
        self
    }

    /// Check the settings a harvest mode requires
    pub fn validate_for(&self, mode: HarvestMode) -> Result<()> {
        match mode {
            HarvestMode::Countries => {
                let folder = self.country_folder()?;
                if !folder.is_dir() {
                    return Err(Error::configuration(format!(
                        "country folder {} is not a directory",
                        folder.display()
                    )));
                }
            }
            HarvestMode::Features => {
                self.feature_file()?;
            }
        }
        Ok(())
    }

    /// Directory of per-country detail files
    pub fn country_folder(&self) -> Result<&Path> {
        self.country_folder
            .as_deref()
            .ok_or_else(|| Error::configuration("country folder is not set (countryFolder)"))
    }

    /// Feature data file
    pub fn feature_file(&self) -> Result<&Path> {
        self.feature_file
            .as_deref()
            .ok_or_else(|| Error::configuration("feature file is not set (featureFile)"))
    }

    /// Open the reference file, falling back to the bundled copy
    pub fn reference_reader(&self) -> Result<DelimitedReader> {
        match &self.country_info {
            Some(path) => DelimitedReader::open(path),
            None => {
                debug!("No countryInfo configured, using bundled reference file");
                Ok(DelimitedReader::bundled())
            }
        }
    }

    /// Store root, defaulting to `<harvester home>/storage`
    pub fn storage_root(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(|| harvester_home().join(DEFAULT_STORAGE_DIR_NAME))
    }
}

/// `$FASCINATOR_HOME`, else `~/.fascinator`
pub fn harvester_home() -> PathBuf {
    match std::env::var(HOME_ENV_VAR) {
        Ok(home) if !home.is_empty() => PathBuf::from(home),
        _ => dirs::home_dir()
            .unwrap_or_default()
            .join(DEFAULT_HOME_DIR_NAME),
    }
}

/// `<user config dir>/geonames-harvester/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Expand `${fascinator.home}` and a leading `~/`
pub fn expand_placeholders(value: &str, home: &Path) -> PathBuf {
    let expanded = value.replace(HOME_PLACEHOLDER, &home.to_string_lossy());
    if let Some(rest) = expanded.strip_prefix("~/") {
        if let Some(user_home) = dirs::home_dir() {
            return user_home.join(rest);
        }
    }
    PathBuf::from(expanded)
}

fn setting_path(value: Option<String>, home: &Path) -> Option<PathBuf> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| expand_placeholders(v.trim(), home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(text: &str) -> Result<HarvestConfig> {
        HarvestConfig::from_json_str(text, Path::new("test.json"))
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse(
            r#"{
                "harvester": {
                    "type": "geonames",
                    "geonames": {
                        "countryInfo": "/data/countryInfo.txt",
                        "countryFolder": "/data/countries",
                        "featureFile": "/data/allCountries.txt",
                        "skipMalformedRows": true
                    }
                },
                "storage": { "path": "/data/storage" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.country_info, Some(PathBuf::from("/data/countryInfo.txt")));
        assert_eq!(config.country_folder, Some(PathBuf::from("/data/countries")));
        assert_eq!(config.feature_file, Some(PathBuf::from("/data/allCountries.txt")));
        assert!(config.skip_malformed_rows);
        assert_eq!(config.storage_root(), PathBuf::from("/data/storage"));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let config = parse(r#"{"harvester": {"geonames": {"countryInfo": "", "countryFolder": "  "}}}"#)
            .unwrap();
        assert_eq!(config, HarvestConfig::default());
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        assert!(matches!(parse("{not json"), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_expand_home_placeholder() {
        let home = Path::new("/opt/fascinator");
        assert_eq!(
            expand_placeholders("${fascinator.home}/geonames/countryInfo.txt", home),
            PathBuf::from("/opt/fascinator/geonames/countryInfo.txt")
        );
        assert_eq!(
            expand_placeholders("/plain/path", home),
            PathBuf::from("/plain/path")
        );
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = HarvestConfig::default()
            .with_country_folder("/from/file")
            .with_feature_file("/from/file/all.txt");
        let merged = base.merge(HarvestConfig::default().with_country_folder("/from/cli"));

        assert_eq!(merged.country_folder, Some(PathBuf::from("/from/cli")));
        assert_eq!(merged.feature_file, Some(PathBuf::from("/from/file/all.txt")));
    }

    #[test]
    fn test_explicit_skip_policy_beats_file() {
        let from_file = HarvestConfig::default().with_skip_malformed_rows();

        let kept = from_file.clone().merge(HarvestConfig::default()).with_skip_policy(None);
        assert!(kept.skip_malformed_rows);

        let disabled = from_file.merge(HarvestConfig::default()).with_skip_policy(Some(false));
        assert!(!disabled.skip_malformed_rows);

        let enabled = HarvestConfig::default().with_skip_policy(Some(true));
        assert!(enabled.skip_malformed_rows);
    }

    #[test]
    fn test_validate_countries_requires_folder() {
        let err = HarvestConfig::default()
            .validate_for(HarvestMode::Countries)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let dir = TempDir::new().unwrap();
        assert!(
            HarvestConfig::default()
                .with_country_folder(dir.path())
                .validate_for(HarvestMode::Countries)
                .is_ok()
        );
    }

    #[test]
    fn test_validate_countries_rejects_missing_folder() {
        let dir = TempDir::new().unwrap();
        let config = HarvestConfig::default().with_country_folder(dir.path().join("absent"));
        assert!(matches!(
            config.validate_for(HarvestMode::Countries),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_features_requires_feature_file() {
        assert!(HarvestConfig::default().validate_for(HarvestMode::Features).is_err());
        assert!(
            HarvestConfig::default()
                .with_feature_file("/data/all.txt")
                .validate_for(HarvestMode::Features)
                .is_ok()
        );
    }

    #[test]
    fn test_reference_reader_falls_back_to_bundled() {
        let reader = HarvestConfig::default().reference_reader().unwrap();
        assert!(reader.source().ends_with("countryInfo.txt"));
    }

    #[test]
    fn test_missing_reference_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let config = HarvestConfig::default().with_country_info(dir.path().join("nope.txt"));
        assert!(matches!(config.reference_reader(), Err(Error::Read { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"harvester": {"geonames": {"featureFile": "/x/all.txt"}}}"#).unwrap();

        let config = HarvestConfig::load(Some(&path)).unwrap();
        assert_eq!(config.feature_file, Some(PathBuf::from("/x/all.txt")));
    }
}
