//! Main deployment configuration
//!
//! This module ties the resolvers together into one immutable
//! [`DeploymentConfig`], resolved once at startup and passed by reference to
//! whatever needs it.

use super::database::DatabaseSettings;
use super::env::{EnvSource, ProcessEnv};
use super::redis::RedisSettings;
use super::secrets::SecretStore;
use super::task_queue::TaskQueueConfig;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Everything the hosting application needs to connect to its backing
/// services
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// SQLAlchemy connection URI
    pub database_uri: String,
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    /// Celery configuration
    pub task_queue: TaskQueueConfig,
}

impl fmt::Debug for DeploymentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentConfig")
            .field("database_uri", &self.redacted_database_uri())
            .field("database", &self.database)
            .field("redis", &self.redis)
            .field("task_queue", &self.task_queue)
            .finish()
    }
}

impl DeploymentConfig {
    /// Resolve from the process environment and secrets under `/secrets`
    pub fn from_env() -> Result<Self> {
        Self::resolve(&ProcessEnv, &SecretStore::default())
    }

    /// Resolve against explicit sources.
    ///
    /// Order: database secrets, database variables, Redis variables, then
    /// the derived URIs. The first failure aborts.
    pub fn resolve(env: &dyn EnvSource, secrets: &SecretStore) -> Result<Self> {
        let database = DatabaseSettings::resolve(env, secrets)?;
        let redis = RedisSettings::resolve(env)?;

        let database_uri = database.uri()?;
        let task_queue = TaskQueueConfig::from_redis(&redis)?;

        let config = Self {
            database_uri,
            database,
            redis,
            task_queue,
        };

        info!(
            "Resolved deployment configuration (secrets from {})",
            secrets.root().display()
        );
        Ok(config)
    }

    /// Database URI with the password masked
    pub fn redacted_database_uri(&self) -> String {
        self.database
            .redacted_uri()
            .unwrap_or_else(|_| super::database::REDACTED.to_string())
    }

    /// Copy of this configuration safe to print or log
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.database.password = super::database::REDACTED.to_string();
        copy.database_uri = self.redacted_database_uri();
        copy
    }

    /// Render in the given format
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Toml => toml::to_string_pretty(self)?,
            OutputFormat::Env => self.to_env_exports(),
        };
        Ok(rendered)
    }

    /// Shell `export` lines for the values the web app and workers read
    pub fn to_env_exports(&self) -> String {
        let imports = self.task_queue.imports.join(",");
        let pairs = [
            ("SQLALCHEMY_DATABASE_URI", self.database_uri.as_str()),
            ("CELERY_BROKER_URL", self.task_queue.broker_url.as_str()),
            ("CELERY_RESULT_BACKEND", self.task_queue.result_backend.as_str()),
            ("CELERY_IMPORTS", imports.as_str()),
        ];

        let mut out = String::new();
        for (key, value) in pairs {
            out.push_str(&format!("export {}={}\n", key, shell_quote(value)));
        }
        out.push_str(&format!(
            "export CELERY_TASK_PROTOCOL={}\n",
            self.task_queue.task_protocol
        ));
        out
    }
}

/// Validate a configuration that may not have come from [`DeploymentConfig::resolve`]
pub fn validate_config(config: &DeploymentConfig) -> Result<()> {
    config.database.validate()?;
    config.redis.validate()?;

    if config.database_uri != config.database.uri()? {
        return Err(ConfigError::invalid(
            "database_uri",
            config.redacted_database_uri(),
            "does not match database settings",
        ));
    }
    if config.task_queue.broker_url != config.redis.broker_url()? {
        return Err(ConfigError::invalid(
            "broker_url",
            config.task_queue.broker_url.as_str(),
            "does not match redis settings",
        ));
    }
    if config.task_queue.result_backend != config.redis.result_backend_url()? {
        return Err(ConfigError::invalid(
            "result_backend",
            config.task_queue.result_backend.as_str(),
            "does not match redis settings",
        ));
    }

    Ok(())
}

/// Output format for rendered configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
    Env,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "env" | "shell" => Ok(Self::Env),
            other => Err(ConfigError::invalid(
                "format",
                other,
                "expected json, toml or env",
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Toml => write!(f, "toml"),
            OutputFormat::Env => write!(f, "env"),
        }
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
