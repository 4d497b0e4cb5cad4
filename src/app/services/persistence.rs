//! Persistence of normalized records into an object store
//!
//! Each accepted record becomes one object keyed by the MD5 of its
//! canonical URL. Writing is create-or-update: re-harvesting the same row
//! replaces the metadata payload and properties but leaves any other
//! payloads on the object untouched.

use crate::app::adapters::object_store::{DigitalObject, ObjectStore};
use crate::app::models::{CountryRecord, FeatureRecord, NormalizedRecord};
use crate::app::services::identifier::object_id;
use crate::constants::{
    DETAIL_CONTENT_TYPE, DETAIL_FILE_EXT, METADATA_CONTENT_TYPE, METADATA_PAYLOAD_EXT, properties,
};
use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use tracing::{debug, info};

/// Writes normalized records through an [`ObjectStore`]
pub struct PersistenceAdapter<'a, S: ObjectStore> {
    store: &'a S,
}

impl<'a, S: ObjectStore> PersistenceAdapter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Persist a country record with its detail file.
    ///
    /// Payloads: `<ISO>.json` (metadata) and `<ISO>.txt` (detail file bytes).
    /// Returns the object identifier.
    pub fn persist_country(&self, country: &CountryRecord) -> Result<String> {
        let file = File::open(&country.detail_file).map_err(|e| {
            Error::read(&country.detail_file, "cannot open country detail file", e)
        })?;
        let mut detail = TrackedReader::new(BufReader::new(file));

        let oid = object_id(&country.canonical_url);
        let mut object = self.store.get_or_create_object(&oid)?;

        let pid = format!("{}.{}", country.iso_code, DETAIL_FILE_EXT);
        if let Err(err) = object.create_or_update_payload(&pid, &mut detail, DETAIL_CONTENT_TYPE) {
            return Err(match detail.take_error() {
                Some(e) => Error::read(&country.detail_file, "cannot read country detail file", e),
                None => err,
            });
        }

        write_metadata(&mut object, &country.iso_code, &country.record)?;

        let props = object.properties_mut();
        props.insert(properties::RENDER_PENDING.to_string(), "true".to_string());
        props.insert(properties::ISO_CODE.to_string(), country.iso_code.clone());
        props.insert(
            properties::COUNTRY_NAME.to_string(),
            country.country_name.clone(),
        );

        object.close()?;
        info!("Harvested country {} ({}) as {}", country.iso_code, country.country_name, oid);
        Ok(oid)
    }

    /// Persist a feature record as `<geonameid>.json`.
    ///
    /// Returns the object identifier.
    pub fn persist_feature(&self, feature: &FeatureRecord) -> Result<String> {
        let oid = object_id(&feature.canonical_url);
        let mut object = self.store.get_or_create_object(&oid)?;

        write_metadata(&mut object, &feature.geonameid, &feature.record)?;

        let props = object.properties_mut();
        props.insert(properties::RENDER_PENDING.to_string(), "true".to_string());
        props.insert(
            properties::COUNTRY_CODE.to_string(),
            feature.country_code.clone(),
        );

        object.close()?;
        info!("Harvested feature {} as {}", feature.geonameid, oid);
        Ok(oid)
    }
}

/// Remembers the first read failure so it can be told apart from a store failure
struct TrackedReader<R> {
    inner: R,
    error: Option<io::Error>,
}

impl<R: Read> TrackedReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, error: None }
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: Read> Read for TrackedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| {
            if self.error.is_none() && e.kind() != io::ErrorKind::Interrupted {
                self.error = Some(io::Error::new(e.kind(), e.to_string()));
            }
            e
        })
    }
}

fn write_metadata<O: DigitalObject>(
    object: &mut O,
    name: &str,
    record: &NormalizedRecord,
) -> Result<()> {
    let json = record.to_json().map_err(|e| {
        Error::storage(format!("cannot serialize metadata for {}", object.id()), e)
    })?;
    let pid = format!("{}.{}", name, METADATA_PAYLOAD_EXT);
    debug!("Writing {} ({} bytes) to {}", pid, json.len(), object.id());
    object.create_or_update_payload(&pid, &mut json.as_bytes(), METADATA_CONTENT_TYPE)
}
