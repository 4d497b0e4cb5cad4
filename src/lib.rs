//! Geonames Harvester Library
//!
//! A Rust library for harvesting geonames.org gazetteer dumps into a
//! content-addressable object store.
//!
//! This library provides tools for:
//! - Streaming tab-separated gazetteer files line by line
//! - Resolving the `#ISO` header line into an ordered column map
//! - Building an ISO code to country name index
//! - Normalizing rows into JSON metadata records with derived fields
//! - Deriving deterministic MD5 object identifiers from canonical URLs
//! - Idempotent create-or-update persistence of objects and payloads

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod country_index;
        pub mod delimited_reader;
        pub mod harvester;
        pub mod header_resolver;
        pub mod identifier;
        pub mod persistence;
        pub mod record_normalizer;
    }
    pub mod adapters {
        pub mod object_store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{HarvestMode, HeaderMap, NormalizedRecord};
pub use app::services::harvester::{CountryHarvester, FeatureHarvester, HarvestResult, Harvester};
pub use config::HarvestConfig;

use std::path::{Path, PathBuf};

/// Result type alias for the geonames harvester
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for harvesting operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Required setting absent or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input file missing, unreadable, or failed mid-stream
    #[error("Failed to read file '{}': {message}", .path.display())]
    Read {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Row shape does not match what the harvest mode expects
    #[error("Row format error in '{}' at line {line}: {message}", .path.display())]
    RowFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Object store failed to create, write, or close an object
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Report could not be rendered or written
    #[error("Output error: {message}")]
    Output {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a read error for the given file
    pub fn read(path: &Path, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: message.into(),
            source,
        }
    }

    /// Create a row format error (`line` is 1-based)
    pub fn row_format(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::RowFormat {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Create a storage error with an underlying cause
    pub fn storage(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error without an underlying cause
    pub fn storage_message(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create an output error
    pub fn output(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Output {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// True for failures on the input side (files being harvested)
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::RowFormat { .. })
    }

    /// True for failures on the output side (object store)
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
