//! Row normalization for both harvest modes
//!
//! Turns the raw positional fields of one row into a [`NormalizedRecord`]
//! plus the derived values persistence needs (canonical URL, grouping key).
//!
//! ## Architecture
//!
//! - [`country`] - Schema-driven normalization against a resolved [`HeaderMap`],
//!   gated on the presence of the country detail file
//! - [`feature`] - Fixed-offset normalization joined against the [`CountryIndex`]
//!
//! [`NormalizedRecord`]: crate::app::models::NormalizedRecord
//! [`HeaderMap`]: crate::app::models::HeaderMap
//! [`CountryIndex`]: crate::app::services::country_index::CountryIndex

pub mod country;
pub mod feature;

#[cfg(test)]
pub mod tests;

pub use country::normalize_country_row;
pub use feature::normalize_feature_row;

use crate::Error;
use std::path::Path;

/// Where a row came from, for error reporting
#[derive(Debug, Clone, Copy)]
pub struct RowLocation<'a> {
    /// File the row was read from
    pub source: &'a Path,

    /// 1-based line number
    pub line: usize,
}

impl<'a> RowLocation<'a> {
    pub fn new(source: &'a Path, line: usize) -> Self {
        Self { source, line }
    }

    /// Row format error at this location
    pub fn row_format(&self, message: impl Into<String>) -> Error {
        Error::row_format(self.source, self.line, message)
    }
}
