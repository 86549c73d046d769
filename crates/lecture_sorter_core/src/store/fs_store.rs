//! Filesystem object store.
//!
//! # Responsibility
//! - Map object keys onto files below one root directory.
//! - Replace files whole via temp-file + rename.
//!
//! # Invariants
//! - Temporary files never appear in `list` output.
//! - `delete` removes only the file. Directories stay, so a concurrent `put`
//!   into the same bucket never loses its parent.

use super::{ObjectKey, ObjectStore, StoreError, StoreResult};
use log::{info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

const TEMP_FILE_PREFIX: &str = ".lecture_sorter-tmp-";

/// Object store backed by a directory tree.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens (and creates when missing) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|err| StoreError::io(root.display().to_string(), err))?;
        info!(
            "event=store_open module=store status=ok backend=fs root={}",
            root.display()
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &ObjectKey) -> PathBuf {
        key.segments()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn key_for(&self, path: &Path) -> Option<ObjectKey> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        ObjectKey::from_segments(segments).ok()
    }
}

impl ObjectStore for FsStore {
    fn put(&self, key: &ObjectKey, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_for(key);
        let parent = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent).map_err(|err| StoreError::io(key.as_str(), err))?;

        let temp_path = parent.join(format!("{TEMP_FILE_PREFIX}{}", Uuid::new_v4()));
        if let Err(err) = fs::write(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::io(key.as_str(), err));
        }
        if let Err(err) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::io(key.as_str(), err));
        }
        Ok(())
    }

    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(key.as_str(), err)),
        }
    }

    fn list(&self, prefix: &ObjectKey) -> StoreResult<Vec<ObjectKey>> {
        let dir = self.path_for(prefix);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                // Entries removed mid-walk are a normal race with deletes.
                Err(err) if err.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound) => {
                    continue
                }
                Err(err) => {
                    return Err(StoreError::io(prefix.as_str(), std::io::Error::from(err)))
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let is_temp = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(TEMP_FILE_PREFIX));
            if is_temp {
                continue;
            }
            match self.key_for(entry.path()) {
                Some(key) => keys.push(key),
                None => warn!(
                    "event=store_list module=store status=skipped backend=fs reason=unmappable_path"
                ),
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn delete(&self, key: &ObjectKey) -> StoreResult<bool> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(false);
        }
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::io(key.as_str(), err)),
        }
    }

    fn exists(&self, key: &ObjectKey) -> StoreResult<bool> {
        Ok(self.path_for(key).is_file())
    }

    fn location(&self, key: &ObjectKey) -> String {
        self.path_for(key).display().to_string()
    }

    fn top_level(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(self.root.display().to_string(), err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StoreError::io(self.root.display().to_string(), err))?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Ok(prefix) = ObjectKey::from_segments([name.as_str()]) else {
                continue;
            };
            if !self.list(&prefix)?.is_empty() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
