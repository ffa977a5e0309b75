//! Persisted Medium login state (cookies + localStorage snapshot)
//!
//! The file lives at `~/.medium-mcp/auth.json`, is owner-only (0600) inside an
//! owner-only directory (0700), is created by `save_login` and removed by
//! `logout`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{base_dir, write_private};
use crate::error::{MediumError, MediumResult};

const SESSION_FILE: &str = "auth.json";

/// Serializable snapshot of one browser cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Seconds since epoch; negative for session cookies
    pub expires: f64,
    pub http_only: bool,
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginStorage {
    pub origin: String,
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<OriginStorage>,
}

/// On-disk location of the session snapshot
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(base_dir().join(SESSION_FILE))
    }
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn io_error(&self, source: crate::error::BoxError) -> MediumError {
        MediumError::SessionStore {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the snapshot, `None` when no login has been saved.
    pub fn load(&self) -> MediumResult<Option<SessionState>> {
        if !self.exists() {
            return Ok(None);
        }
        let raw = fs::read(&self.path).map_err(|e| self.io_error(e.into()))?;
        let state = serde_json::from_slice(&raw).map_err(|e| self.io_error(e.into()))?;
        Ok(Some(state))
    }

    pub fn save(&self, state: &SessionState) -> MediumResult<()> {
        let json = serde_json::to_vec_pretty(state).map_err(|e| self.io_error(e.into()))?;
        write_private(&self.path, &json).map_err(|e| self.io_error(e.into()))?;
        info!(
            path = %self.path.display(),
            cookies = state.cookies.len(),
            origins = state.origins.len(),
            "Login state saved"
        );
        Ok(())
    }

    /// Delete the snapshot; returns whether a file was removed.
    pub fn clear(&self) -> MediumResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Login state cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionState {
        SessionState {
            cookies: vec![StoredCookie {
                name: "sid".into(),
                value: "abc".into(),
                domain: ".medium.com".into(),
                path: "/".into(),
                expires: 1_900_000_000.0,
                http_only: true,
                secure: true,
                same_site: Some("Lax".into()),
            }],
            origins: vec![OriginStorage {
                origin: "https://medium.com".into(),
                local_storage: vec![StorageEntry {
                    name: "theme".into(),
                    value: "dark".into(),
                }],
            }],
        }
    }

    #[test]
    fn absent_until_saved_then_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("home").join("auth.json"));
        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), None);

        store.save(&sample()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(sample()));

        assert!(store.clear().unwrap());
        assert!(!store.exists());
        assert!(!store.clear().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let store = SessionStore::new(home.join("auth.json"));

        // pre-existing permissive file and directory get tightened
        fs::create_dir_all(&home).unwrap();
        fs::set_permissions(&home, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&sample()).unwrap();

        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(&home).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("auth.json"));
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(MediumError::SessionStore { .. })));
    }
}
