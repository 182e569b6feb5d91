//! Persistent dedup store: the set of content identifiers already downloaded.
//!
//! On disk the store is a JSON array of lowercase hex strings. It is loaded fully
//! at startup and rewritten in full on every successful download, through a temp
//! file in the same directory that is fsynced and renamed over the target. A kill
//! mid-write leaves either the previous file or the new one, never a truncated one.

use crate::identifier::ContentId;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default file name of the store under the state directory.
pub const STORE_FILE_NAME: &str = "downloaded.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file exists but is not a JSON array of identifiers. Never reset silently:
    /// an empty store would re-download everything.
    #[error("dedup store {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read dedup store {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write dedup store {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Set of downloaded identifiers, optionally backed by a file.
#[derive(Debug, Default)]
pub struct DedupStore {
    ids: HashSet<ContentId>,
    path: Option<PathBuf>,
}

impl DedupStore {
    /// Loads the store backed by `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no dedup store yet, starting empty");
                return Ok(Self {
                    ids: HashSet::new(),
                    path: Some(path),
                });
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        let ids: HashSet<ContentId> = match serde_json::from_slice(&bytes) {
            Ok(ids) => ids,
            Err(source) => return Err(StoreError::Corrupt { path, source }),
        };
        tracing::debug!(path = %path.display(), count = ids.len(), "loaded dedup store");
        Ok(Self {
            ids,
            path: Some(path),
        })
    }

    /// A store that lives only in memory; `record` never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id` and, when file-backed, rewrites the whole file before returning.
    ///
    /// Returns `false` (and writes nothing) if `id` was already present. If the
    /// rewrite fails the id is removed again so memory matches disk.
    pub fn record(&mut self, id: ContentId) -> Result<bool, StoreError> {
        if self.ids.contains(&id) {
            return Ok(false);
        }
        self.ids.insert(id.clone());
        if let Err(e) = self.persist() {
            self.ids.remove(&id);
            return Err(e);
        }
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Backing file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut sorted: Vec<&ContentId> = self.ids.iter().collect();
        sorted.sort();
        let json = serde_json::to_vec_pretty(&sorted)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".pinfetch-store-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path.display(), count = self.ids.len(), "dedup store written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn id(n: u32) -> ContentId {
        ContentId::for_url(&format!("https://i.pinimg.com/originals/{n}.jpg"))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = DedupStore::load(dir.path().join("downloaded.json")).unwrap();
        assert!(store.is_empty());
        assert!(!dir.path().join("downloaded.json").exists());
    }

    #[test]
    fn record_is_durable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        let mut store = DedupStore::load(&path).unwrap();
        assert!(store.record(id(1)).unwrap());
        assert!(store.contains(&id(1)));

        let reloaded = DedupStore::load(&path).unwrap();
        assert!(reloaded.contains(&id(1)));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn record_twice_reports_existing() {
        let mut store = DedupStore::in_memory();
        assert!(store.record(id(1)).unwrap());
        assert!(!store.record(id(1)).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_is_json_array_of_hex() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        let mut store = DedupStore::load(&path).unwrap();
        store.record(id(2)).unwrap();
        store.record(id(1)).unwrap();

        let raw: Vec<String> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let mut expected = vec![id(1).to_string(), id(2).to_string()];
        expected.sort();
        assert_eq!(raw, expected);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        let mut store = DedupStore::load(&path).unwrap();
        for n in 0..5 {
            store.record(id(n)).unwrap();
        }
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("downloaded.json")]);
    }

    #[test]
    fn creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("nested").join("downloaded.json");
        let mut store = DedupStore::load(&path).unwrap();
        store.record(id(7)).unwrap();
        assert!(DedupStore::load(&path).unwrap().contains(&id(7)));
    }

    #[test]
    fn loads_file_written_by_hand() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        fs::write(&path, format!("[\n  \"{}\"\n]", id(3))).unwrap();
        let store = DedupStore::load(&path).unwrap();
        assert!(store.contains(&id(3)));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        fs::write(&path, b"{ not json").unwrap();
        let err = DedupStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        // The corrupt file is left untouched for inspection.
        assert_eq!(fs::read(&path).unwrap(), b"{ not json");
    }

    #[test]
    fn empty_or_malformed_entries_are_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded.json");
        fs::write(&path, b"").unwrap();
        assert!(matches!(DedupStore::load(&path), Err(StoreError::Corrupt { .. })));
        fs::write(&path, b"[\"not-a-digest\"]").unwrap();
        assert!(matches!(DedupStore::load(&path), Err(StoreError::Corrupt { .. })));
        fs::write(&path, b"{\"ids\": []}").unwrap();
        assert!(matches!(DedupStore::load(&path), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn in_memory_store_has_no_path() {
        let mut store = DedupStore::in_memory();
        store.record(id(1)).unwrap();
        assert!(store.path().is_none());
        assert!(store.contains(&id(1)));
    }
}
