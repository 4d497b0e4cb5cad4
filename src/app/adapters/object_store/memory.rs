//! In-memory [`ObjectStore`] for tests and dry runs.
//!
//! Objects live in a `HashMap` behind an `Arc<RwLock>` shared with every
//! open handle; a handle works on a private copy and writes it back on
//! close.

use super::{DigitalObject, ObjectSnapshot, ObjectStore, Properties, StoredPayload, validate_name};
use crate::{Error, Result};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, RwLock};

type ObjectTable = Arc<RwLock<HashMap<String, ObjectSnapshot>>>;

/// RAM-backed object store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: ObjectTable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> Error {
    Error::storage_message("in-memory object table lock poisoned")
}

impl ObjectStore for MemoryStore {
    type Object = MemoryObject;

    fn get_or_create_object(&self, oid: &str) -> Result<MemoryObject> {
        validate_name("object", oid)?;
        let mut objects = self.objects.write().map_err(|_| poisoned())?;
        let state = objects
            .entry(oid.to_string())
            .or_insert_with(|| ObjectSnapshot::new(oid))
            .clone();

        Ok(MemoryObject {
            table: Arc::clone(&self.objects),
            state,
        })
    }

    fn fetch_object(&self, oid: &str) -> Result<Option<ObjectSnapshot>> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        Ok(objects.get(oid).cloned())
    }

    fn object_ids(&self) -> Result<Vec<String>> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        let mut ids: Vec<String> = objects.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Open handle to an object in a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryObject {
    table: ObjectTable,
    state: ObjectSnapshot,
}

impl DigitalObject for MemoryObject {
    fn id(&self) -> &str {
        &self.state.id
    }

    fn create_or_update_payload(
        &mut self,
        pid: &str,
        content: &mut dyn Read,
        content_type: &str,
    ) -> Result<()> {
        validate_name("payload", pid)?;
        let mut bytes = Vec::new();
        content.read_to_end(&mut bytes).map_err(|e| {
            Error::storage(
                format!("failed to read content for payload {}/{}", self.state.id, pid),
                e,
            )
        })?;

        self.state.payloads.insert(
            pid.to_string(),
            StoredPayload {
                content_type: content_type.to_string(),
                content: bytes,
            },
        );
        Ok(())
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.state.properties
    }

    fn close(self) -> Result<()> {
        let mut objects = self.table.write().map_err(|_| poisoned())?;
        objects.insert(self.state.id.clone(), self.state);
        Ok(())
    }
}
