//! JSON-file storage for session fields.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use adminkit_core::{Error, Result};
use adminkit_core::error::StorageError;
use adminkit_core::storage::Storage;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

type Entries = BTreeMap<String, String>;

fn map_io(path: &Path, err: std::io::Error) -> Error {
    StorageError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Durable storage kept in a single JSON object file.
///
/// Every operation takes an exclusive lock on a sidecar `.lock` file, so
/// several processes can share one session file. Writes go to a temporary
/// file that is renamed over the original. On Unix the file is readable by
/// its owner only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use the file at `path`, creating it on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Use `session.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join("session.json"))
    }

    /// Get the storage file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Run `f` while holding the exclusive lock.
    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }

        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| map_io(&lock_path, e))?;

        lock_file
            .lock_exclusive()
            .map_err(|e| map_io(&lock_path, e))?;

        let outcome = f();

        lock_file.unlock().map_err(|e| map_io(&lock_path, e))?;

        outcome
    }

    /// Apply `f` to the entries and write them back if it reports a change.
    ///
    /// A corrupt file is treated as empty and overwritten.
    fn update<T>(&self, f: impl FnOnce(&mut Entries) -> (T, bool)) -> Result<T> {
        self.locked(|| {
            let (mut entries, recovered) = match self.read_entries() {
                Ok(entries) => (entries, false),
                Err(Error::Storage(StorageError::Corrupt { message, .. })) => {
                    warn!(
                        path = %self.path.display(),
                        error = %message,
                        "Overwriting corrupt storage file"
                    );
                    (Entries::new(), true)
                }
                Err(e) => return Err(e),
            };

            let (value, changed) = f(&mut entries);
            if changed || recovered {
                self.write_entries(&entries)?;
            }
            Ok(value)
        })
    }

    fn read_entries(&self) -> Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let json = fs::read_to_string(&self.path).map_err(|e| map_io(&self.path, e))?;
        if json.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&json).map_err(|e| {
            StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let tmp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let json = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut file = File::create(&tmp_path).map_err(|e| map_io(&tmp_path, e))?;

        // Restrict permissions before any secret is written (Unix only)
        #[cfg(unix)]
        {
            let mut perms = file
                .metadata()
                .map_err(|e| map_io(&tmp_path, e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| map_io(&tmp_path, e))?;
        }

        file.write_all(json.as_bytes())
            .map_err(|e| map_io(&tmp_path, e))?;
        file.sync_data().map_err(|e| map_io(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| map_io(&self.path, e))?;

        trace!(path = %self.path.display(), keys = entries.len(), "Wrote storage file");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.locked(|| self.read_entries())?;
        Ok(entries.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            let changed = entries.get(key).map(String::as_str) != Some(value);
            entries.insert(key.to_string(), value.to_string());
            ((), changed)
        })?;
        debug!("Stored session field");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| ((), entries.remove(key).is_some()))
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let removed = self.update(|entries| {
            let mut removed = 0usize;
            for key in keys {
                if entries.remove(*key).is_some() {
                    removed += 1;
                }
            }
            (removed, removed > 0)
        })?;
        debug!(removed, "Removed session fields");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_core::storage::keys;
    use adminkit_core::{AccessToken, TokenStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, FileStorage) {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::in_dir(tmp.path().join("data"));
        (tmp, storage)
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let (_tmp, storage) = create_test_storage();
        assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_set_and_get() {
        let (_tmp, storage) = create_test_storage();
        storage.set(keys::ACCESS_TOKEN, "abc").unwrap();
        storage.set(keys::ROLE, "admin").unwrap();

        assert_eq!(
            storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(storage.get(keys::ROLE).unwrap().as_deref(), Some("admin"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let (tmp, storage) = create_test_storage();
        storage.set(keys::REFRESH_TOKEN, "r1").unwrap();

        let reopened = FileStorage::in_dir(tmp.path().join("data"));
        assert_eq!(
            reopened.get(keys::REFRESH_TOKEN).unwrap().as_deref(),
            Some("r1")
        );
    }

    #[test]
    fn test_remove_all_clears_session_keys() {
        let (_tmp, storage) = create_test_storage();
        for key in keys::ALL {
            storage.set(key, "x").unwrap();
        }
        storage.set("theme", "dark").unwrap();

        storage.remove_all(&keys::ALL).unwrap();
        storage.remove_all(&keys::ALL).unwrap();

        for key in keys::ALL {
            assert_eq!(storage.get(key).unwrap(), None);
        }
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let (_tmp, storage) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.get(keys::ROLE),
            Err(Error::Storage(StorageError::Corrupt { .. }))
        ));
    }

    #[test]
    fn test_write_replaces_corrupt_file() {
        let (_tmp, storage) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "{truncated").unwrap();

        storage.set(keys::ACCESS_TOKEN, "abc").unwrap();

        assert_eq!(
            storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("abc")
        );
        let raw = fs::read_to_string(storage.path()).unwrap();
        let entries: Entries = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_clear_repairs_corrupt_file() {
        let (_tmp, storage) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "{truncated").unwrap();

        storage.remove_all(&keys::ALL).unwrap();

        assert_eq!(storage.get(keys::ROLE).unwrap(), None);
    }

    #[test]
    fn test_login_survives_corrupt_session_file() {
        let (tmp, storage) = create_test_storage();
        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), "{truncated").unwrap();

        let store = TokenStore::load(Arc::new(storage));
        assert!(!store.is_authenticated());
        store.set_access_token(AccessToken::new("abc"));

        let reopened = FileStorage::in_dir(tmp.path().join("data"));
        let reopened = TokenStore::load(Arc::new(reopened));
        assert_eq!(reopened.access_token(), Some(AccessToken::new("abc")));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        let (_tmp, storage) = create_test_storage();
        storage.set(keys::ACCESS_TOKEN, "abc").unwrap();

        let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
