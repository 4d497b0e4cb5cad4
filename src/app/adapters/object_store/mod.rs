//! Object store abstraction for harvested records
//!
//! The [`ObjectStore`] trait is the narrow interface the persistence
//! adapter writes through. Objects are addressed by identifier, hold named
//! payloads with a content type, and carry a string property bag.
//!
//! | Implementation | Purpose |
//! |----------------|---------|
//! | [`MemoryStore`] | RAM storage for tests and dry runs |
//! | [`FilesystemStore`] | One directory per object with an `object.json` manifest |
//!
//! Writes go through a [`DigitalObject`] handle obtained with
//! [`ObjectStore::get_or_create_object`]; nothing is committed until the
//! handle is closed.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Free-form object properties
pub type Properties = BTreeMap<String, String>;

/// Stored payload bytes with their content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPayload {
    pub content_type: String,
    pub content: Vec<u8>,
}

impl StoredPayload {
    /// Payload content as UTF-8 text
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Read-only view of a stored object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSnapshot {
    pub id: String,
    pub properties: Properties,
    pub payloads: BTreeMap<String, StoredPayload>,
}

impl ObjectSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn payload(&self, pid: &str) -> Option<&StoredPayload> {
        self.payloads.get(pid)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Backing store for harvested objects
pub trait ObjectStore {
    /// Write handle returned by [`get_or_create_object`](ObjectStore::get_or_create_object)
    type Object: DigitalObject;

    /// Fetch an object for update, creating it when absent.
    ///
    /// Fetching an existing object keeps its payloads and properties.
    fn get_or_create_object(&self, oid: &str) -> Result<Self::Object>;

    /// Read back a stored object
    fn fetch_object(&self, oid: &str) -> Result<Option<ObjectSnapshot>>;

    /// Identifiers of all stored objects, sorted
    fn object_ids(&self) -> Result<Vec<String>>;
}

/// Write handle to one stored object
pub trait DigitalObject {
    fn id(&self) -> &str;

    /// Write a payload, replacing any previous content under the same name
    fn create_or_update_payload(
        &mut self,
        pid: &str,
        content: &mut dyn Read,
        content_type: &str,
    ) -> Result<()>;

    /// Mutable property bag
    fn properties_mut(&mut self) -> &mut Properties;

    /// Commit pending changes and release the handle
    fn close(self) -> Result<()>;
}

/// Reject identifiers that could escape a store's namespace
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::storage_message(format!(
            "invalid {} name '{}'",
            kind, name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("object", "d41d8cd98f00b204e9800998ecf8427e").is_ok());
        assert!(validate_name("payload", "AU.json").is_ok());
        assert!(validate_name("payload", "../AU.json").is_err());
        assert!(validate_name("payload", "a/b").is_err());
        assert!(validate_name("object", "").is_err());
        assert!(validate_name("object", "..").is_err());
    }

    #[test]
    fn test_snapshot_accessors() {
        let mut snapshot = ObjectSnapshot::new("abc");
        snapshot
            .properties
            .insert("render-pending".to_string(), "true".to_string());
        snapshot.payloads.insert(
            "AU.json".to_string(),
            StoredPayload {
                content_type: "text/json".to_string(),
                content: b"{}".to_vec(),
            },
        );

        assert_eq!(snapshot.property("render-pending"), Some("true"));
        assert_eq!(snapshot.payload("AU.json").unwrap().as_text(), Some("{}"));
        assert!(snapshot.payload("AU.txt").is_none());
    }
}
