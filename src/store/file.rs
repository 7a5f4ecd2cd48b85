//! File-backed license store with atomic writes.
//!
//! Holds one token at `dirs::config_dir()/<namespace>/license.key`.
//! Uses temp file + rename so a crash mid-write never leaves a half token.

use crate::errors::LicenseError;
use crate::protocol::clean_token;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the stored token.
pub const LICENSE_FILE_NAME: &str = "license.key";

/// Persists the raw token text.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    /// Directory holding `license.key`.
    dir: PathBuf,
}

impl LicenseStore {
    /// Create a store under the per-user configuration directory.
    ///
    /// The directory itself is created on first save.
    pub fn new(namespace: &str) -> Result<Self, LicenseError> {
        let base_dir = dirs::config_dir().ok_or(LicenseError::ConfigDirUnavailable)?;
        Ok(Self {
            dir: base_dir.join(namespace),
        })
    }

    /// Create a store in a specific directory.
    pub fn at_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the token file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(LICENSE_FILE_NAME)
    }

    /// Directory the token file lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a token, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<(), LicenseError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            LicenseError::StoreIO(format!("Failed to create license dir: {}", e))
        })?;

        let target_path = self.path();
        let temp_path = self.dir.join(format!("{}.tmp", LICENSE_FILE_NAME));

        fs::write(&temp_path, clean_token(token))
            .map_err(|e| LicenseError::StoreIO(format!("Failed to write temp file: {}", e)))?;

        fs::rename(&temp_path, &target_path).map_err(|e| {
            // Best effort; the rename error is what the caller needs.
            let _ = fs::remove_file(&temp_path);
            LicenseError::StoreIO(format!("Failed to rename license file: {}", e))
        })?;

        debug!(path = %target_path.display(), "license saved");
        Ok(())
    }

    /// Load the stored token.
    ///
    /// Returns `Ok(None)` when nothing is stored (or the file is blank) and
    /// `Err` when a file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>, LicenseError> {
        let path = self.path();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let token = clean_token(&contents);
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read license file");
                Err(LicenseError::StoreIO(format!(
                    "Failed to read license file: {}",
                    e
                )))
            }
        }
    }

    /// Remove the stored token.
    ///
    /// Returns `true` if a token file was removed, `false` if none existed.
    pub fn clear(&self) -> Result<bool, LicenseError> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                debug!("license cleared");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LicenseError::StoreIO(format!(
                "Failed to delete license file: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOKEN: &str = "QANUNI-eyJtYWNoaW5lSWQiOiJBQUFBIn0=-0A1B2C3D";

    #[test]
    fn test_store_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());

        store.save(TOKEN).unwrap();
        assert_eq!(store.load().unwrap(), Some(TOKEN.to_string()));
    }

    #[test]
    fn test_store_trims_on_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());

        store.save(&format!("\n  {}  \r\n", TOKEN)).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), TOKEN);

        fs::write(store.path(), format!("{}\n", TOKEN)).unwrap();
        assert_eq!(store.load().unwrap(), Some(TOKEN.to_string()));
    }

    #[test]
    fn test_store_load_strips_byte_order_mark() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());

        fs::write(store.path(), format!("\u{feff}{}\r\n", TOKEN)).unwrap();
        assert_eq!(store.load().unwrap(), Some(TOKEN.to_string()));

        fs::write(store.path(), "\u{feff}\n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_load_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path().join("never-created"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_load_blank_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());
        fs::write(store.path(), "   \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_store_load_unreadable_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());
        // A directory where the file should be cannot be read as text.
        fs::create_dir_all(store.path()).unwrap();
        assert!(matches!(store.load(), Err(LicenseError::StoreIO(_))));
    }

    #[test]
    fn test_store_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("config").join("qanuni");
        let store = LicenseStore::at_dir(&nested);

        store.save(TOKEN).unwrap();
        assert!(nested.join(LICENSE_FILE_NAME).is_file());
    }

    #[test]
    fn test_store_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());

        store.save(TOKEN).unwrap();
        store.save("QANUNI-b3RoZXI=-FFFFFFFF").unwrap();
        assert_eq!(
            store.load().unwrap(),
            Some("QANUNI-b3RoZXI=-FFFFFFFF".to_string())
        );
        assert!(!temp_dir.path().join("license.key.tmp").exists());
    }

    #[test]
    fn test_store_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = LicenseStore::at_dir(temp_dir.path());

        assert!(!store.clear().unwrap());
        store.save(TOKEN).unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_store_save_failure_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();
        let store = LicenseStore::at_dir(blocker.join("qanuni"));
        assert!(matches!(store.save(TOKEN), Err(LicenseError::StoreIO(_))));
    }

    #[test]
    fn test_store_path_layout() {
        let store = LicenseStore::at_dir("/tmp/qanuni-test");
        assert_eq!(
            store.path(),
            PathBuf::from("/tmp/qanuni-test").join("license.key")
        );
    }
}
