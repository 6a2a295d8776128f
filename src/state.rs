//! Shared application state.
//!
//! Containers are opened once at startup and held as read-only shared
//! handles; request handlers clone the state and never mutate it.

use std::sync::Arc;

use crate::dict::Dict;

#[derive(Clone)]
pub struct AppState {
    /// Open containers in command-line order. The set is small (one entry
    /// per file passed on the command line), so lookups scan.
    pub dicts: Arc<Vec<Arc<Dict>>>,
    /// Default cap on lookup results (`--limit`).
    pub limit: usize,
    /// URL prefix all routes and generated links live under. Normalized:
    /// empty for the root mount, otherwise `/something` with no trailing
    /// slash.
    pub mount: String,
}

impl AppState {
    pub fn new(dicts: Vec<Arc<Dict>>, limit: usize, mount_path: &str) -> Self {
        Self {
            dicts: Arc::new(dicts),
            limit,
            mount: normalize_mount(mount_path),
        }
    }

    /// Resolve a container by id, falling back to its `uri` tag. Returns the
    /// container and whether the id matched (drives cache header choice:
    /// blob ids are stable within an id, while a uri may be re-pointed at a
    /// different container over time).
    pub fn find_dict(&self, id_or_uri: &str) -> Option<(Arc<Dict>, bool)> {
        if let Some(dict) = self.dicts.iter().find(|d| d.id() == id_or_uri) {
            return Some((Arc::clone(dict), true));
        }
        self.dicts
            .iter()
            .find(|d| d.tags().get("uri").map(String::as_str) == Some(id_or_uri))
            .map(|d| (Arc::clone(d), false))
    }
}

fn normalize_mount(mount_path: &str) -> String {
    let trimmed = mount_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_mount;

    #[test]
    fn mount_path_is_normalized() {
        assert_eq!(normalize_mount("/"), "");
        assert_eq!(normalize_mount(""), "");
        assert_eq!(normalize_mount("/dict/"), "/dict");
        assert_eq!(normalize_mount("dict"), "/dict");
    }
}
