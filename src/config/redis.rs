//! Redis connection settings used by the Celery broker and result backend

use super::database::non_empty;
use super::env::{get_env_parsed, get_env_variable, EnvSource};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const REDIS_HOST: &str = "REDIS_HOST";
pub const REDIS_PORT: &str = "REDIS_PORT";
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Redis database index that carries queued tasks
pub const BROKER_DB: u8 = 0;
/// Redis database index that stores task results
pub const RESULT_BACKEND_DB: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
}

impl RedisSettings {
    pub fn resolve(env: &dyn EnvSource) -> Result<Self> {
        let host = get_env_variable(env, REDIS_HOST, None)?;
        let port = get_env_parsed(env, REDIS_PORT, Some(DEFAULT_REDIS_PORT))?;
        Ok(Self { host, port })
    }

    /// `redis://host:port/<db>`
    pub fn url_for_db(&self, db: u8) -> Result<String> {
        self.validate()?;
        let raw = format!("redis://{}:{}/{}", self.host, self.port, db);
        Url::parse(&raw)
            .map(|url| url.to_string())
            .map_err(|e| ConfigError::invalid(REDIS_HOST, self.host.as_str(), e.to_string()))
    }

    pub fn broker_url(&self) -> Result<String> {
        self.url_for_db(BROKER_DB)
    }

    pub fn result_backend_url(&self) -> Result<String> {
        self.url_for_db(RESULT_BACKEND_DB)
    }

    pub fn validate(&self) -> Result<()> {
        non_empty(REDIS_HOST, &self.host)?;
        if self.port == 0 {
            return Err(ConfigError::invalid(REDIS_PORT, "0", "port must be non-zero"));
        }
        Ok(())
    }
}
