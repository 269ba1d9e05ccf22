//! Access token resolution
//!
//! The token comes from the configuration (flag or `GUMROAD_ACCESS_TOKEN`) when
//! present, otherwise from `gumroad.json` in the credentials directory. The
//! file is re-read on every lookup so a volume mounted after start-up is picked up.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{GumroadError, Result};

pub const CREDENTIALS_FILE: &str = "gumroad.json";

/// Contents of `<creds_dir>/gumroad.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    token: Option<String>,
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(token: Option<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            dir: dir.into(),
        }
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Resolve the access token for a request
    pub fn access_token(&self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let path = self.credentials_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let stored: StoredCredentials = serde_json::from_str(&contents)?;
                let token = stored.access_token.trim().to_string();
                if token.is_empty() {
                    return Err(GumroadError::MissingToken(path));
                }
                debug!("Loaded access token from {}", path.display());
                Ok(token)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GumroadError::MissingToken(path))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Create the credentials directory if it does not exist yet.
///
/// Not fatal: the server still runs with an env-provided token.
pub fn ensure_dir(dir: &Path) {
    if dir.is_dir() {
        return;
    }
    match create_dir(dir) {
        Ok(()) => info!("Created credentials directory {}", dir.display()),
        Err(e) => warn!("Could not create credentials directory {}: {}", dir.display(), e),
    }
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new().recursive(true).mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_token_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), r#"{"access_token": "from-file"}"#).unwrap();

        let store = CredentialStore::new(Some("from-env".to_string()), dir.path());
        assert_eq!(store.access_token().unwrap(), "from-env");
    }

    #[test]
    fn test_token_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), r#"{"access_token": " abc123 "}"#).unwrap();

        let store = CredentialStore::new(None, dir.path());
        assert_eq!(store.access_token().unwrap(), "abc123");
    }

    #[test]
    fn test_blank_env_token_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), r#"{"access_token": "file-token"}"#).unwrap();

        let store = CredentialStore::new(Some("  ".to_string()), dir.path());
        assert_eq!(store.access_token().unwrap(), "file-token");
    }

    #[test]
    fn test_missing_token() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(None, dir.path());

        let err = store.access_token().unwrap_err();
        assert!(matches!(err, GumroadError::MissingToken(_)));
        assert!(err.to_string().contains("GUMROAD_ACCESS_TOKEN"));
        assert!(err.to_string().contains("gumroad.json"));
    }

    #[test]
    fn test_empty_token_in_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), r#"{"access_token": ""}"#).unwrap();

        let store = CredentialStore::new(None, dir.path());
        assert!(matches!(store.access_token(), Err(GumroadError::MissingToken(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CREDENTIALS_FILE), "not json").unwrap();

        let store = CredentialStore::new(None, dir.path());
        assert!(matches!(store.access_token(), Err(GumroadError::SerializationError(_))));
    }

    #[test]
    fn test_ensure_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let creds = dir.path().join("store_creds");

        ensure_dir(&creds);
        assert!(creds.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&creds).unwrap().permissions().mode();
            // umask may clear bits but never adds group/other write
            assert_eq!(mode & 0o777 & !0o755, 0);
            assert_eq!(mode & 0o700, 0o700);
        }
    }
}
