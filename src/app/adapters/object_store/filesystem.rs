//! Directory-backed [`ObjectStore`].
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<oid>/object.json   manifest: id, properties, payload content types
//! <root>/<oid>/<pid>         payload bytes
//! ```
//!
//! Payloads are staged in a temporary file next to their final path and
//! renamed into place once fully copied, so a failed copy leaves nothing
//! behind. The manifest is rewritten on close. Reopening an object loads the existing manifest
//! so payloads written by earlier runs are kept.

use super::{DigitalObject, ObjectSnapshot, ObjectStore, Properties, StoredPayload, validate_name};
use crate::constants::OBJECT_MANIFEST_FILE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

/// Object store rooted at a directory
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

/// Per-payload manifest entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PayloadEntry {
    content_type: String,
    size: u64,
}

/// Contents of `object.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Manifest {
    id: String,
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    payloads: BTreeMap<String, PayloadEntry>,
}

impl FilesystemStore {
    /// Open a store, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::storage(
                format!("cannot create store root {}", root.display()),
                e,
            )
        })?;
        debug!("Opened filesystem store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_dir(&self, oid: &str) -> PathBuf {
        self.root.join(oid)
    }
}

fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(OBJECT_MANIFEST_FILE)
}

fn read_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = manifest_path(dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::storage(
                format!("cannot read manifest {}", path.display()),
                e,
            ));
        }
    };
    let manifest = serde_json::from_str(&text).map_err(|e| {
        Error::storage(format!("corrupt manifest {}", path.display()), e)
    })?;
    Ok(Some(manifest))
}

fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = manifest_path(dir);
    let file = File::create(&path)
        .map_err(|e| Error::storage(format!("cannot write manifest {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)
        .map_err(|e| Error::storage(format!("cannot write manifest {}", path.display()), e))?;
    writer
        .flush()
        .map_err(|e| Error::storage(format!("cannot write manifest {}", path.display()), e))
}

impl ObjectStore for FilesystemStore {
    type Object = FilesystemObject;

    fn get_or_create_object(&self, oid: &str) -> Result<FilesystemObject> {
        validate_name("object", oid)?;
        let dir = self.object_dir(oid);

        let manifest = match read_manifest(&dir)? {
            Some(manifest) => manifest,
            None => {
                fs::create_dir_all(&dir).map_err(|e| {
                    Error::storage(format!("cannot create object {}", oid), e)
                })?;
                let manifest = Manifest {
                    id: oid.to_string(),
                    ..Default::default()
                };
                write_manifest(&dir, &manifest)?;
                debug!("Created object {}", oid);
                manifest
            }
        };

        Ok(FilesystemObject { dir, manifest })
    }

    fn fetch_object(&self, oid: &str) -> Result<Option<ObjectSnapshot>> {
        validate_name("object", oid)?;
        let dir = self.object_dir(oid);
        let Some(manifest) = read_manifest(&dir)? else {
            return Ok(None);
        };

        let mut snapshot = ObjectSnapshot::new(manifest.id);
        snapshot.properties = manifest.properties;
        for (pid, entry) in manifest.payloads {
            let path = dir.join(&pid);
            let content = fs::read(&path).map_err(|e| {
                Error::storage(format!("cannot read payload {}", path.display()), e)
            })?;
            snapshot.payloads.insert(
                pid,
                StoredPayload {
                    content_type: entry.content_type,
                    content,
                },
            );
        }
        Ok(Some(snapshot))
    }

    fn object_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::storage(format!("cannot list store {}", self.root.display()), e)
            })?;
            if entry.file_type().is_dir() && manifest_path(entry.path()).is_file() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Open handle to an object in a [`FilesystemStore`]
#[derive(Debug)]
pub struct FilesystemObject {
    dir: PathBuf,
    manifest: Manifest,
}

impl DigitalObject for FilesystemObject {
    fn id(&self) -> &str {
        &self.manifest.id
    }

    fn create_or_update_payload(
        &mut self,
        pid: &str,
        content: &mut dyn Read,
        content_type: &str,
    ) -> Result<()> {
        validate_name("payload", pid)?;
        if pid == OBJECT_MANIFEST_FILE {
            return Err(Error::storage_message(format!(
                "payload name '{}' is reserved",
                pid
            )));
        }

        let path = self.dir.join(pid);
        let failed = |e: io::Error| {
            Error::storage(format!("cannot write payload {}/{}", self.manifest.id, pid), e)
        };
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(failed)?;
        let size = {
            let mut writer = BufWriter::new(staged.as_file_mut());
            let size = io::copy(content, &mut writer).map_err(failed)?;
            writer.flush().map_err(failed)?;
            size
        };
        staged.persist(&path).map_err(|e| failed(e.error))?;

        self.manifest.payloads.insert(
            pid.to_string(),
            PayloadEntry {
                content_type: content_type.to_string(),
                size,
            },
        );
        Ok(())
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.manifest.properties
    }

    fn close(self) -> Result<()> {
        write_manifest(&self.dir, &self.manifest)
    }
}
