//! Mounted secret resolution
//!
//! Secrets are files under a fixed root directory (as mounted by Kubernetes
//! or Docker). The file name relative to the root is the secret name, e.g.
//! `database/password`.

use crate::error::{ConfigError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Root directory secrets are mounted under
pub const DEFAULT_SECRETS_DIR: &str = "/secrets";

/// Reads secrets from files under a root directory.
///
/// Nothing is cached; every lookup re-reads the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretStore {
    root: PathBuf,
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new(DEFAULT_SECRETS_DIR)
    }
}

impl SecretStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing secret `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Get the secret `name` with surrounding whitespace stripped.
    ///
    /// Any read failure is treated like an absent file: the default is used
    /// if there is one, otherwise the error is
    /// [`ConfigError::ConfigurationMissing`]. Failures other than "not found"
    /// are logged and kept as the error's `cause`.
    pub fn get_secret(&self, name: &str, default: Option<&str>) -> Result<String> {
        let path = self.path_for(name);

        let cause = match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read secret {} from {}", name, path.display());
                return Ok(contents.trim().to_string());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "Could not read secret {} at {}: {}",
                    name,
                    path.display(),
                    e
                );
                Some(e.to_string())
            }
        };

        match default {
            Some(default) => {
                debug!("Secret {} unavailable, using default", name);
                Ok(default.to_string())
            }
            None => Err(ConfigError::missing_secret(name, cause)),
        }
    }
}
