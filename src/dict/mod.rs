//! Binding layer to the dictionary container format.
//!
//! A container is a zip archive holding a `manifest.json` (id, tags, content
//! type table, key → blob reference list) and one `blobs/{id}` member per
//! blob. Framing and decompression are the zip crate's problem; this module
//! exposes the container contract the web layer needs: open, metadata
//! accessors, blob retrieval, and key lookup across containers.

mod manifest;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use zip::{CompressionMethod, ZipArchive};

use manifest::Manifest;

pub const MANIFEST_NAME: &str = "manifest.json";

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("failed to open container {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("malformed container manifest: {0}")]
    Malformed(String),
    #[error("no blob with id {0}")]
    BlobNotFound(u32),
    #[error("failed to read blob {blob}: {source}")]
    BlobRead {
        blob: u32,
        #[source]
        source: anyhow::Error,
    },
}

/// A key → blob reference, sorted for lookup.
#[derive(Debug)]
struct Ref {
    key: String,
    /// Case-folded key, the sort and comparison form.
    folded: String,
    blob: u32,
    fragment: String,
}

/// One lookup result: the matched key plus everything needed to build a
/// content link and fetch the bytes later.
#[derive(Debug, Clone)]
pub struct Item {
    pub key: String,
    /// Blob id within the owning container.
    pub id: u32,
    pub fragment: String,
    pub content_type: String,
}

/// An open, read-only dictionary container. Cheap to share across request
/// handlers behind an `Arc`; the seekable archive reader sits behind a mutex
/// since zip reads need exclusive access.
pub struct Dict {
    id: String,
    tags: BTreeMap<String, String>,
    encoding: String,
    compression: String,
    content_types: Vec<String>,
    blob_content_types: Vec<u32>,
    refs: Vec<Ref>,
    archive: Mutex<ZipArchive<File>>,
    path: PathBuf,
}

impl std::fmt::Debug for Dict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dict")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("refs", &self.refs.len())
            .finish()
    }
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

fn compression_name(method: CompressionMethod) -> &'static str {
    match method {
        CompressionMethod::Stored => "stored",
        CompressionMethod::Deflated => "deflate",
        _ => "unknown",
    }
}

impl Dict {
    /// Open a container file and load its manifest. Blob bytes stay in the
    /// archive until requested.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DictError> {
        let path = path.as_ref().to_path_buf();
        let wrap = |source: anyhow::Error| DictError::Open {
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(|e| wrap(e.into()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| wrap(e.into()))?;

        let manifest: Manifest = {
            let entry = archive.by_name(MANIFEST_NAME).map_err(|e| wrap(e.into()))?;
            serde_json::from_reader(entry).map_err(|e| wrap(e.into()))?
        };
        manifest.validate()?;

        // Report whatever method the blob members actually use; an empty
        // container has nothing compressed in it.
        let compression = if manifest.blobs.is_empty() {
            "stored".to_string()
        } else {
            let entry = archive.by_name("blobs/0").map_err(|e| wrap(e.into()))?;
            compression_name(entry.compression()).to_string()
        };

        let mut refs: Vec<Ref> = manifest
            .refs
            .iter()
            .map(|r| Ref {
                folded: fold(&r.key),
                key: r.key.clone(),
                blob: r.blob,
                fragment: r.fragment.clone(),
            })
            .collect();
        refs.sort_by(|a, b| a.folded.cmp(&b.folded).then_with(|| a.key.cmp(&b.key)));

        Ok(Self {
            id: manifest.id,
            tags: manifest.tags,
            encoding: manifest.encoding,
            compression,
            content_types: manifest.content_types,
            blob_content_types: manifest.blobs.iter().map(|b| b.content_type).collect(),
            refs,
            archive: Mutex::new(archive),
            path,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// The container's `label` tag, or its id when untagged. Used as the
    /// human-facing title everywhere.
    pub fn label(&self) -> &str {
        self.tags.get("label").map(String::as_str).unwrap_or(&self.id)
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn compression(&self) -> &str {
        &self.compression
    }

    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    pub fn blob_count(&self) -> u32 {
        self.blob_content_types.len() as u32
    }

    /// Number of key references (not blobs; keys may alias).
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content type and raw bytes of one blob.
    pub fn get(&self, blob_id: u32) -> Result<(String, Vec<u8>), DictError> {
        let ct_index = *self
            .blob_content_types
            .get(blob_id as usize)
            .ok_or(DictError::BlobNotFound(blob_id))?;
        let content_type = self.content_types[ct_index as usize].clone();

        let mut archive = self
            .archive
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entry = archive
            .by_name(&format!("blobs/{blob_id}"))
            .map_err(|e| DictError::BlobRead {
                blob: blob_id,
                source: e.into(),
            })?;
        let mut content = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut content)
            .map_err(|e| DictError::BlobRead {
                blob: blob_id,
                source: e.into(),
            })?;
        Ok((content_type, content))
    }

    fn find_in(&self, folded_term: &str, match_prefix: bool, out: &mut Vec<Item>) {
        let start = self
            .refs
            .partition_point(|r| r.folded.as_str() < folded_term);
        for r in &self.refs[start..] {
            let matched = if match_prefix {
                r.folded.starts_with(folded_term)
            } else {
                r.folded == folded_term
            };
            if !matched {
                break;
            }
            out.push(Item {
                key: r.key.clone(),
                id: r.blob,
                fragment: r.fragment.clone(),
                content_type: self.content_types
                    [self.blob_content_types[r.blob as usize] as usize]
                    .clone(),
            });
        }
    }
}

/// Look up `term` across `dicts`, in the given container order. Matching is
/// case-insensitive; with `match_prefix` every key starting with the term is
/// returned (exact hits sort first within a container), otherwise only exact
/// hits. Callers truncate to their own limit.
pub fn find(
    term: &str,
    dicts: &[Arc<Dict>],
    match_prefix: bool,
) -> Vec<(Arc<Dict>, Item)> {
    let folded = fold(term);
    let mut results = Vec::new();
    for dict in dicts {
        let mut items = Vec::new();
        dict.find_in(&folded, match_prefix, &mut items);
        results.extend(items.into_iter().map(|item| (Arc::clone(dict), item)));
    }
    results
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("test.dict");
        let file = File::create(&path).expect("create fixture file");
        let mut zip = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let manifest = serde_json::json!({
            "id": "11111111-2222-3333-4444-555555555555",
            "encoding": "utf-8",
            "tags": {"label": "Test Dictionary", "uri": "http://example.com/test"},
            "content_types": ["text/html; charset=utf-8", "image/png"],
            "blobs": [
                {"content_type": 0},
                {"content_type": 0},
                {"content_type": 1}
            ],
            "refs": [
                {"key": "Apple", "blob": 0},
                {"key": "apple pie", "blob": 1, "fragment": "top"},
                {"key": "banana", "blob": 1},
                {"key": "icon", "blob": 2}
            ]
        });
        zip.start_file(MANIFEST_NAME, options).expect("start manifest");
        zip.write_all(manifest.to_string().as_bytes())
            .expect("write manifest");

        for (i, content) in ["<p>apple</p>", "<p>pie</p>", "PNGDATA"]
            .iter()
            .enumerate()
        {
            zip.start_file(format!("blobs/{i}"), options)
                .expect("start blob");
            zip.write_all(content.as_bytes()).expect("write blob");
        }
        zip.finish().expect("finish zip");
        path
    }

    #[test]
    fn open_reads_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Dict::open(write_fixture(dir.path())).expect("open fixture");

        assert_eq!(dict.id(), "11111111-2222-3333-4444-555555555555");
        assert_eq!(dict.label(), "Test Dictionary");
        assert_eq!(dict.encoding(), "utf-8");
        assert_eq!(dict.compression(), "deflate");
        assert_eq!(dict.blob_count(), 3);
        assert_eq!(dict.len(), 4);
        assert_eq!(dict.content_types().len(), 2);
    }

    #[test]
    fn get_returns_content_type_and_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Dict::open(write_fixture(dir.path())).expect("open fixture");

        let (ct, bytes) = dict.get(2).expect("get blob");
        assert_eq!(ct, "image/png");
        assert_eq!(bytes, b"PNGDATA");
    }

    #[test]
    fn get_unknown_blob_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Dict::open(write_fixture(dir.path())).expect("open fixture");

        assert!(matches!(dict.get(99), Err(DictError::BlobNotFound(99))));
    }

    #[test]
    fn find_exact_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Arc::new(Dict::open(write_fixture(dir.path())).expect("open fixture"));

        let hits = find("APPLE", &[Arc::clone(&dict)], false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1.key, "Apple");
        assert_eq!(hits[0].1.id, 0);
    }

    #[test]
    fn find_prefix_returns_sorted_matches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Arc::new(Dict::open(write_fixture(dir.path())).expect("open fixture"));

        let hits = find("app", &[dict], true);
        let keys: Vec<&str> = hits.iter().map(|(_, item)| item.key.as_str()).collect();
        assert_eq!(keys, ["Apple", "apple pie"]);
        assert_eq!(hits[1].1.fragment, "top");
    }

    #[test]
    fn find_miss_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dict = Arc::new(Dict::open(write_fixture(dir.path())).expect("open fixture"));

        assert!(find("zebra", &[dict], true).is_empty());
    }

    #[test]
    fn open_rejects_dangling_blob_reference() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.dict");
        let file = File::create(&path).expect("create file");
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.start_file(MANIFEST_NAME, options).expect("start manifest");
        zip.write_all(
            serde_json::json!({
                "id": "x",
                "content_types": [],
                "blobs": [],
                "refs": [{"key": "a", "blob": 0}]
            })
            .to_string()
            .as_bytes(),
        )
        .expect("write manifest");
        zip.finish().expect("finish zip");

        assert!(matches!(Dict::open(&path), Err(DictError::Malformed(_))));
    }

    #[test]
    fn open_rejects_non_container_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("not-a.dict");
        std::fs::write(&path, b"plain text").expect("write file");

        assert!(matches!(Dict::open(&path), Err(DictError::Open { .. })));
    }
}
