//! Shared configuration for the Aula CLI dashboards.
//!
//! TOML config with env overrides (figment), config-dir resolution, and
//! the durable credential cache the session layer restores from. The
//! cache is the desktop analogue of the browser's local storage: one
//! JSON record holding the raw token and identity, cleared on logout or
//! detected expiry. Expiry itself always comes from the token, never
//! from this file.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use aula_core::{CoreError, CredentialStore, StoredCredential};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Top-level configuration shared by both dashboards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

fn default_backend() -> String {
    "http://localhost:5000".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Parse and validate the backend URL.
    pub fn backend_url(&self) -> Result<url::Url, ConfigError> {
        self.backend
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "backend".into(),
                reason: format!("{e}"),
            })
    }
}

/// Default config file location: `<config dir>/aula/config.toml`.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "aula-labs", "aula")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("aula.toml"))
}

/// Load configuration: defaults, then the TOML file (if present), then
/// `AULA_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    debug!(path = %path.display(), "loading config");
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("AULA_"))
        .extract()?;
    Ok(config)
}

/// Like [`load_config`] but falls back to defaults on any failure.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential cache ────────────────────────────────────────────────

/// File-backed credential storage under the user config dir.
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    /// Cache at the default location: `<config dir>/aula/credentials.json`.
    pub fn new() -> Self {
        let path = ProjectDirs::from("", "aula-labs", "aula")
            .map(|dirs| dirs.config_dir().join("credentials.json"))
            .unwrap_or_else(|| PathBuf::from("aula-credentials.json"));
        Self { path }
    }

    /// Cache at an explicit path (tests, non-standard setups).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for CredentialCache {
    fn load(&self) -> Result<Option<StoredCredential>, CoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::Storage {
                    message: format!("reading {}: {e}", self.path.display()),
                });
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| CoreError::Storage {
                message: format!("parsing {}: {e}", self.path.display()),
            })
    }

    fn store(&self, cred: &StoredCredential) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::Storage {
                message: format!("creating {}: {e}", parent.display()),
            })?;
        }
        let json = serde_json::to_vec_pretty(cred).map_err(|e| CoreError::Storage {
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| CoreError::Storage {
            message: format!("writing {}: {e}", self.path.display()),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage {
                message: format!("removing {}: {e}", self.path.display()),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aula_core::{Identity, Role};

    fn sample() -> StoredCredential {
        StoredCredential {
            token: "a.b.c".into(),
            identity: Identity {
                username: "pat".into(),
                role: Role::Staff,
            },
        }
    }

    #[test]
    fn cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::at(dir.path().join("nested").join("credentials.json"));

        assert!(cache.load().unwrap().is_none());

        cache.store(&sample()).unwrap();
        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded.token, "a.b.c");
        assert_eq!(loaded.identity.username, "pat");
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::at(dir.path().join("credentials.json"));

        cache.clear().unwrap();
        cache.store(&sample()).unwrap();
        cache.clear().unwrap();
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_cache_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"{ not json").unwrap();

        let cache = CredentialCache::at(path);
        assert!(matches!(cache.load(), Err(CoreError::Storage { .. })));
    }

    #[test]
    fn session_restore_scrubs_corrupt_cache() {
        use aula_core::SessionStore;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = SessionStore::new(Box::new(CredentialCache::at(path.clone())));
        assert!(store.restore().is_none());
        assert!(!path.exists(), "corrupt cache file is removed on restore");
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.timeout, 30);
        assert!(!config.insecure);
        config.backend_url().unwrap();
    }

    #[test]
    fn bad_backend_url_is_rejected() {
        let config = Config {
            backend: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.backend_url(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
