//! Test fixtures for building environments and mounted secret directories

#![allow(dead_code)]

use std::fs;
use superset_config::config::{SecretStore, StaticEnv};
use tempfile::TempDir;

/// Secret directory that lives as long as the returned guard
pub struct MountedSecrets {
    pub dir: TempDir,
    pub store: SecretStore,
}

impl MountedSecrets {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("create temp secrets dir");
        for (name, contents) in files {
            write_secret(&dir, name, contents);
        }
        let store = SecretStore::new(dir.path());
        Self { dir, store }
    }

    /// Standard database credentials
    pub fn database(username: &str, password: &str) -> Self {
        Self::new(&[
            ("database/username", username),
            ("database/password", password),
        ])
    }

    pub fn write(&self, name: &str, contents: &str) {
        write_secret(&self.dir, name, contents);
    }
}

fn write_secret(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create secret parent dir");
    }
    fs::write(path, contents).expect("write secret");
}

/// Environment matching a typical Kubernetes deployment
pub fn deployment_env() -> StaticEnv {
    StaticEnv::new()
        .with("DB_HOST", "db")
        .with("DB_PORT", "5432")
        .with("DB_NAME", "super")
        .with("REDIS_HOST", "cache")
        .with("REDIS_PORT", "6379")
}
