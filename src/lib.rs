//! Superset Config - deployment settings for Superset
//!
//! This crate resolves Postgres and Redis connection parameters from the
//! environment and Kubernetes-mounted secrets, and builds the SQLAlchemy URI
//! and Celery configuration the application consumes at startup.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{DeploymentConfig, SecretStore, TaskQueueConfig};
pub use error::{ConfigError, Result, SourceKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
