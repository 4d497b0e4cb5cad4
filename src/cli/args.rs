//! Command-line argument definitions for the geonames harvester
//!
//! This module defines the CLI interface using the clap derive API. Options
//! that apply to every subcommand are global so they can be given before or
//! after the subcommand name.

use crate::app::models::HarvestMode;
use crate::config::HarvestConfig;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the geonames harvester
///
/// Harvests geonames.org gazetteer dumps into an object store, one object
/// per country or per feature.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geonames-harvester",
    version,
    about = "Harvest geonames.org gazetteer dumps into an object store",
    long_about = "Reads the geonames countryInfo.txt reference file and either the per-country \
                  detail files or a feature dump such as allCountries.txt, and stores one JSON \
                  metadata object per country or feature. Object identifiers are derived from \
                  the geonames URL, so re-running a harvest updates objects in place."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// JSON configuration file. If not specified, looks for
    /// <config dir>/geonames-harvester/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Reference countryInfo.txt; the bundled copy is used when unset
    #[arg(
        long = "country-info",
        value_name = "FILE",
        global = true,
        help = "Path to the countryInfo.txt reference file"
    )]
    pub country_info: Option<PathBuf>,

    /// Root directory of the object store
    #[arg(
        short = 's',
        long = "store-path",
        value_name = "PATH",
        global = true,
        help = "Object store directory (default: <harvester home>/storage)"
    )]
    pub store_path: Option<PathBuf>,

    /// Harvest into memory without writing the object store
    #[arg(
        long = "dry-run",
        global = true,
        help = "Harvest into memory and report without writing the store"
    )]
    pub dry_run: bool,

    /// Skip malformed rows instead of aborting
    #[arg(
        long = "skip-malformed",
        global = true,
        overrides_with = "no_skip_malformed_rows",
        help = "Skip malformed rows with a warning instead of aborting"
    )]
    pub skip_malformed_rows: bool,

    /// Abort on malformed rows even when the config file skips them
    #[arg(
        long = "no-skip-malformed",
        global = true,
        overrides_with = "skip_malformed_rows",
        help = "Abort on malformed rows, overriding skipMalformedRows in the config file"
    )]
    pub no_skip_malformed_rows: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Harvest one object per country that has a detail file
    Countries(CountriesArgs),
    /// Harvest one object per row of a feature dump
    Features(FeaturesArgs),
    /// Print the column map resolved from a reference file
    Header(HeaderArgs),
}

/// Arguments for the countries command
#[derive(Debug, Clone, Parser)]
pub struct CountriesArgs {
    /// Directory holding one <ISO>.txt file per country
    #[arg(
        short = 'f',
        long = "country-folder",
        value_name = "DIR",
        help = "Directory of per-country <ISO>.txt detail files"
    )]
    pub country_folder: Option<PathBuf>,
}

/// Arguments for the features command
#[derive(Debug, Clone, Parser)]
pub struct FeaturesArgs {
    /// Tab-separated feature dump, e.g. allCountries.txt
    #[arg(
        short = 'f',
        long = "feature-file",
        value_name = "FILE",
        help = "Feature dump to harvest (e.g. allCountries.txt)"
    )]
    pub feature_file: Option<PathBuf>,
}

/// Arguments for the header command
#[derive(Debug, Clone, Parser)]
pub struct HeaderArgs {
    /// Reference file to inspect; defaults to the configured or bundled one
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Validate arguments that can be checked before loading configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Harvest mode of the selected subcommand, if it harvests
    pub fn mode(&self) -> Option<HarvestMode> {
        match self.command {
            Some(Commands::Countries(_)) => Some(HarvestMode::Countries),
            Some(Commands::Features(_)) => Some(HarvestMode::Features),
            _ => None,
        }
    }

    /// Settings given on the command line, to layer over the config file
    pub fn config_overrides(&self) -> HarvestConfig {
        let mut overrides = HarvestConfig {
            country_info: self.country_info.clone(),
            storage_path: self.store_path.clone(),
            skip_malformed_rows: self.skip_malformed_rows,
            ..Default::default()
        };
        match &self.command {
            Some(Commands::Countries(countries)) => {
                overrides.country_folder = countries.country_folder.clone();
            }
            Some(Commands::Features(features)) => {
                overrides.feature_file = features.feature_file.clone();
            }
            _ => {}
        }
        overrides
    }

    /// Malformed-row policy chosen on the command line, if any
    pub fn skip_malformed_override(&self) -> Option<bool> {
        if self.skip_malformed_rows {
            Some(true)
        } else if self.no_skip_malformed_rows {
            Some(false)
        } else {
            None
        }
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Show the spinner only for interactive human output
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}
