//! Directory-backed `KeyValueStore`.
//!
//! Each document lives in `<dir>/<name>.json`.  Writes go to a temp file
//! in the same directory and are renamed over the target, so readers
//! never observe a half-written document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::errors::{BentoError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`.  The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding document `name`.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn storage_error(name: &str, action: &str, e: io::Error) -> BentoError {
        BentoError::Storage {
            name: name.to_string(),
            reason: format!("{action}: {e}"),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.document_path(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::storage_error(name, "read", e)),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Self::storage_error(name, "create directory", e))?;

        let path = self.document_path(name);
        let tmp_path = self.dir.join(format!(".{name}.json.tmp"));

        fs::write(&tmp_path, value).map_err(|e| Self::storage_error(name, "write", e))?;

        // On Unix, keep documents owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&tmp_path, perms)
                .map_err(|e| Self::storage_error(name, "set permissions", e))?;
        }

        fs::rename(&tmp_path, &path).map_err(|e| Self::storage_error(name, "rename", e))?;

        debug!(document = name, bytes = value.len(), "persisted document");
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        match fs::remove_file(self.document_path(name)) {
            Ok(()) => {
                debug!(document = name, "removed document");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_error(name, "remove", e)),
        }
    }
}
