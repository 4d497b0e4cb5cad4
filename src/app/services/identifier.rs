//! Deterministic object identifiers
//!
//! Every harvested entity is stored under the MD5 digest of its canonical
//! geonames URL, so re-harvesting the same entity always addresses the
//! same object.

use crate::constants::GEONAMES_URL_BASE;
use md5::{Digest, Md5};

/// Canonical URL of a geonames entity
pub fn canonical_url(geonameid: &str) -> String {
    format!("{}{}", GEONAMES_URL_BASE, geonameid)
}

/// Object identifier for a canonical URL: 32 lowercase hex characters
pub fn object_id(canonical_url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(canonical_url.as_bytes());
    format!("{:x}", hasher.finalize())
}
