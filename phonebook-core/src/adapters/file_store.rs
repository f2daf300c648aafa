//! File-backed key-value store
//!
//! All keys live in one JSON object on disk. Every access takes an advisory
//! lock on the file so concurrent CLI invocations do not interleave writes.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/session.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        restrict_permissions(&file)?;
        Ok(file)
    }

    fn read_entries(&self, file: &mut File) -> Result<Entries> {
        let mut content = String::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_string(&mut content)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // Damaged file reads as empty; the next write replaces it
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(Entries::new())
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<()> {
        let mut file = self.open()?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| Error::storage(format!("failed to lock {}: {}", self.path.display(), e)))?;

        let result: Result<()> = (|| {
            let mut entries = self.read_entries(&mut file)?;
            apply(&mut entries);
            let content = serde_json::to_string_pretty(&entries)?;
            file.set_len(0)?;
            file.seek(SeekFrom::Start(0))?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();

        let _ = FileExt::unlock(&file);
        result
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut file = self.open()?;
        FileExt::lock_shared(&file)
            .map_err(|e| Error::storage(format!("failed to lock {}: {}", self.path.display(), e)))?;
        let entries = self.read_entries(&mut file);
        let _ = FileExt::unlock(&file);
        Ok(entries?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_new_handle() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("token", "T1").unwrap();
        store.set("user", r#"{"email":"a@b.com"}"#).unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("T1"));
        assert_eq!(
            reopened.get("user").unwrap().as_deref(),
            Some(r#"{"email":"a@b.com"}"#)
        );
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("token", "T1").unwrap();
        store.set("user", "{}").unwrap();

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.get("token").unwrap(), None);
        store.remove("token").unwrap();
        assert!(!store.path().exists());

        store.set("token", "T1").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "T2").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("T2"));
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set("token", "secret").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
