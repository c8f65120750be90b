use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tally_shared::{ApiError, ApiResult, SessionStore};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const TOKEN_FILE: &str = "token";

/// Keeps the bearer token in `<data dir>/token`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed reading session token");
                None
            }
        }
    }

    #[tracing::instrument(skip(self, token), fields(path = %self.path.display()))]
    fn set(&self, token: &str) -> ApiResult<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| ApiError::Storage("token path has no parent".to_string()))?;
        let storage_err =
            |err: std::io::Error| ApiError::Storage(format!("{}: {err}", self.path.display()));

        let mut tmp = NamedTempFile::new_in(dir).map_err(storage_err)?;
        tmp.write_all(token.as_bytes()).map_err(storage_err)?;
        tmp.flush().map_err(storage_err)?;
        tmp.persist(&self.path)
            .map_err(|err| storage_err(err.error))?;
        debug!("session token written");
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApiError::Storage(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn token_survives_reopen_and_clear_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::open(temp.path());
        assert_eq!(store.get(), None);

        store.set("abc").expect("set token");
        let reopened = FileSessionStore::open(temp.path());
        assert_eq!(reopened.get().as_deref(), Some("abc"));

        reopened.clear().expect("clear token");
        reopened.clear().expect("clear twice");
        assert!(!store.is_signed_in());
    }

    #[test]
    fn blank_file_reads_as_signed_out() {
        let temp = tempdir().expect("tempdir");
        let store = FileSessionStore::open(temp.path());
        fs::write(store.path(), "  \n").expect("write blank token");
        assert_eq!(store.get(), None);
    }
}
