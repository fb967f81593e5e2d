//! Configuration management for Superset deployments
//!
//! This module resolves database and Celery broker settings from environment
//! variables and mounted secret files, and composes them into connection URIs
//! and the task-queue configuration.

pub mod app;
pub mod database;
pub mod env;
pub mod redis;
pub mod secrets;
pub mod task_queue;

// Re-export commonly used types
pub use app::{validate_config, DeploymentConfig, OutputFormat};
pub use database::DatabaseSettings;
pub use env::{get_env_parsed, get_env_variable, EnvSource, ProcessEnv, StaticEnv};
pub use redis::RedisSettings;
pub use secrets::{SecretStore, DEFAULT_SECRETS_DIR};
pub use task_queue::{TaskAnnotation, TaskQueueConfig};
