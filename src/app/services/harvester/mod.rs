//! Harvest orchestration for both geonames modes
//!
//! A harvester walks one input file from start to end and persists every
//! accepted row through the [`PersistenceAdapter`]. One call produces the
//! whole batch; there is never a second page.
//!
//! # Architecture
//!
//! - [`country`] - Schema-driven harvest of `countryInfo.txt`, one object per
//!   country that has a detail file
//! - [`feature`] - Fixed-mapping harvest of a feature dump, joined against the
//!   country index built at construction
//! - [`stats`] - Counters and the harvest result
//!
//! # Row policy
//!
//! Filtered rows (no detail file) are counted and skipped silently.
//! Malformed rows abort the run unless `skip_malformed_rows` is set, in
//! which case they are logged and counted. Read and storage failures always
//! abort.
//!
//! [`PersistenceAdapter`]: crate::app::services::persistence::PersistenceAdapter

pub mod country;
pub mod feature;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use country::CountryHarvester;
pub use feature::FeatureHarvester;
pub use stats::{HarvestResult, HarvestStats};

use crate::app::models::HarvestMode;
use crate::{Error, Result};
use indicatif::ProgressBar;
use tracing::warn;

/// Harvester plugin contract
pub trait Harvester {
    /// Stable plugin identifier
    fn id(&self) -> &'static str;

    /// Human-readable plugin name
    fn name(&self) -> &'static str;

    fn mode(&self) -> HarvestMode;

    /// Run the harvest and return the identifiers created or updated
    fn object_id_list(&self) -> Result<HarvestResult>;

    /// Whether another call would yield more objects
    fn has_more_objects(&self) -> bool {
        false
    }
}

/// Apply the malformed-row policy to a row error.
///
/// Returns `Ok(())` when the error was absorbed as a skipped row.
pub(crate) fn absorb_row_error(
    err: Error,
    skip_malformed: bool,
    stats: &mut HarvestStats,
) -> Result<()> {
    if skip_malformed && matches!(err, Error::RowFormat { .. }) {
        warn!("Skipping malformed row: {}", err);
        stats.add_warning(err.to_string());
        Ok(())
    } else {
        Err(err)
    }
}

/// Advance the progress display by one row
pub(crate) fn tick(progress: Option<&ProgressBar>, stats: &HarvestStats) {
    if let Some(pb) = progress {
        pb.inc(1);
        if stats.rows_processed % 500 == 0 {
            pb.set_message(format!("{} objects", stats.objects_persisted));
        }
    }
}
