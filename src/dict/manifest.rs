//! Container manifest — the `manifest.json` member of a dictionary archive.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::DictError;

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// One blob record. Blob `i` lives at archive member `blobs/{i}`;
/// `content_type` indexes into the manifest's content type table.
#[derive(Debug, Deserialize)]
pub struct ManifestBlob {
    pub content_type: u32,
}

/// One key → blob reference. Several refs may share a key, and several
/// keys may point at the same blob (aliases).
#[derive(Debug, Deserialize)]
pub struct ManifestRef {
    pub key: String,
    pub blob: u32,
    #[serde(default)]
    pub fragment: String,
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub id: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub blobs: Vec<ManifestBlob>,
    #[serde(default)]
    pub refs: Vec<ManifestRef>,
}

impl Manifest {
    /// Reject manifests with dangling indices so lookups never have to
    /// re-check them.
    pub fn validate(&self) -> Result<(), DictError> {
        if self.id.is_empty() {
            return Err(DictError::Malformed("empty container id".into()));
        }
        for (i, blob) in self.blobs.iter().enumerate() {
            if blob.content_type as usize >= self.content_types.len() {
                return Err(DictError::Malformed(format!(
                    "blob {} references content type {} but only {} are declared",
                    i,
                    blob.content_type,
                    self.content_types.len()
                )));
            }
        }
        for r in &self.refs {
            if r.blob as usize >= self.blobs.len() {
                return Err(DictError::Malformed(format!(
                    "ref {:?} references blob {} but only {} are declared",
                    r.key,
                    r.blob,
                    self.blobs.len()
                )));
            }
        }
        Ok(())
    }
}
