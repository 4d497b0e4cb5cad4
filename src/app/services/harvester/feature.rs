//! Fixed-mapping harvest of a geonames feature dump

use super::{Harvester, HarvestResult, absorb_row_error, tick};
use crate::app::adapters::object_store::ObjectStore;
use crate::app::models::HarvestMode;
use crate::app::services::country_index::{CountryIndex, IndexStats};
use crate::app::services::delimited_reader::{DelimitedReader, split_fields};
use crate::app::services::persistence::PersistenceAdapter;
use crate::app::services::record_normalizer::{RowLocation, normalize_feature_row};
use crate::config::HarvestConfig;
use crate::constants::{FEATURE_HARVESTER_ID, FEATURE_HARVESTER_NAME};
use crate::Result;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::info;

/// Harvests one object per feature row, resolving country names by ISO code
pub struct FeatureHarvester<'a, S: ObjectStore> {
    config: HarvestConfig,
    store: &'a S,
    countries: CountryIndex,
    index_stats: IndexStats,
    progress: Option<ProgressBar>,
}

impl<'a, S: ObjectStore> FeatureHarvester<'a, S> {
    /// Create a harvester and build the country index from the reference file.
    ///
    /// # Errors
    /// * `Configuration` when no feature file is set
    /// * `Read` / `RowFormat` while building the country index
    pub fn new(config: HarvestConfig, store: &'a S) -> Result<Self> {
        config.validate_for(HarvestMode::Features)?;
        let (countries, index_stats) =
            CountryIndex::build(config.reference_reader()?, config.skip_malformed_rows)?;

        Ok(Self {
            config,
            store,
            countries,
            index_stats,
            progress: None,
        })
    }

    /// Report per-row progress on `pb`
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Country index built at construction
    pub fn countries(&self) -> &CountryIndex {
        &self.countries
    }

    /// Walk the feature file and persist every row
    pub fn harvest(&self) -> Result<HarvestResult> {
        let start = Instant::now();
        let mut result = HarvestResult::default();
        result.stats.rows_skipped = self.index_stats.rows_skipped;
        result.stats.warnings = self.index_stats.warnings.clone();

        let mut reader = DelimitedReader::open(self.config.feature_file()?)?;
        let source = reader.source().to_path_buf();
        let adapter = PersistenceAdapter::new(self.store);

        info!(
            "Harvesting features from {} against {} countries",
            source.display(),
            self.countries.len()
        );

        while let Some(line) = reader.next() {
            let line = line?;
            result.stats.rows_processed += 1;
            let row = split_fields(&line);
            let location = RowLocation::new(&source, reader.line_number());

            match normalize_feature_row(&row, &self.countries, location) {
                Ok(feature) => {
                    let oid = adapter.persist_feature(&feature)?;
                    result.object_ids.insert(oid);
                    result.stats.objects_persisted += 1;
                }
                Err(err) => {
                    absorb_row_error(err, self.config.skip_malformed_rows, &mut result.stats)?
                }
            }
            tick(self.progress.as_ref(), &result.stats);
        }

        result.stats.lines_read = reader.line_number();
        result.stats.duration = start.elapsed();
        info!("{}", result.stats.summary());
        Ok(result)
    }
}

impl<S: ObjectStore> Harvester for FeatureHarvester<'_, S> {
    fn id(&self) -> &'static str {
        FEATURE_HARVESTER_ID
    }

    fn name(&self) -> &'static str {
        FEATURE_HARVESTER_NAME
    }

    fn mode(&self) -> HarvestMode {
        HarvestMode::Features
    }

    fn object_id_list(&self) -> Result<HarvestResult> {
        self.harvest()
    }
}
