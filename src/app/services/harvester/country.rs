//! Schema-driven harvest of the reference file

use super::{Harvester, HarvestResult, absorb_row_error, tick};
use crate::app::adapters::object_store::ObjectStore;
use crate::app::models::{HarvestMode, RowOutcome};
use crate::app::services::delimited_reader::split_fields;
use crate::app::services::header_resolver::locate_header;
use crate::app::services::persistence::PersistenceAdapter;
use crate::app::services::record_normalizer::{RowLocation, normalize_country_row};
use crate::config::HarvestConfig;
use crate::constants::{COUNTRY_HARVESTER_ID, COUNTRY_HARVESTER_NAME};
use crate::Result;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::{debug, info};

/// Harvests one object per `countryInfo.txt` row whose `<ISO>.txt` exists
pub struct CountryHarvester<'a, S: ObjectStore> {
    config: HarvestConfig,
    store: &'a S,
    progress: Option<ProgressBar>,
}

impl<'a, S: ObjectStore> CountryHarvester<'a, S> {
    /// Create a harvester; fails with `Configuration` if no usable country folder is set
    pub fn new(config: HarvestConfig, store: &'a S) -> Result<Self> {
        config.validate_for(HarvestMode::Countries)?;
        Ok(Self {
            config,
            store,
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

    /// Walk the reference file and persist every accepted country
    pub fn harvest(&self) -> Result<HarvestResult> {
        let start = Instant::now();
        let mut result = HarvestResult::default();
        let country_folder = self.config.country_folder()?;
        let mut reader = self.config.reference_reader()?;
        let source = reader.source().to_path_buf();
        let adapter = PersistenceAdapter::new(self.store);

        info!("Harvesting countries from {}", source.display());

        let Some(header) = locate_header(&mut reader)? else {
            result.stats.lines_read = reader.line_number();
            result.stats.duration = start.elapsed();
            return Ok(result);
        };
        debug!("Resolved {} header fields", header.len());

        while let Some(line) = reader.next() {
            let line = line?;
            result.stats.rows_processed += 1;
            let row = split_fields(&line);
            let location = RowLocation::new(&source, reader.line_number());

            match normalize_country_row(&row, &header, country_folder, location) {
                Ok(RowOutcome::Accepted(country)) => {
                    let oid = adapter.persist_country(&country)?;
                    result.object_ids.insert(oid);
                    result.stats.objects_persisted += 1;
                }
                Ok(RowOutcome::Filtered(reason)) => {
                    debug!("Filtered row {}: {}", location.line, reason);
                    result.stats.rows_filtered += 1;
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

impl<S: ObjectStore> Harvester for CountryHarvester<'_, S> {
    fn id(&self) -> &'static str {
        COUNTRY_HARVESTER_ID
    }

    fn name(&self) -> &'static str {
        COUNTRY_HARVESTER_NAME
    }

    fn mode(&self) -> HarvestMode {
        HarvestMode::Countries
    }

    fn object_id_list(&self) -> Result<HarvestResult> {
        self.harvest()
    }
}
