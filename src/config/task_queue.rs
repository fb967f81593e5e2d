//! Celery task-queue configuration
//!
//! Everything except the broker and result-backend URLs is fixed at compile
//! time.

use super::redis::RedisSettings;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Modules Celery imports for task discovery
pub const DEFAULT_IMPORTS: &[&str] = &["superset.sql_lab"];

/// Task that carries a rate limit annotation
pub const ADD_TASK: &str = "tasks.add";
pub const ADD_TASK_RATE_LIMIT: &str = "10/s";

/// Celery task message protocol version
pub const TASK_PROTOCOL: u8 = 1;

/// Per-task annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnnotation {
    pub rate_limit: String,
}

/// Named Celery configuration handed to the worker and the web app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQueueConfig {
    pub broker_url: String,
    pub result_backend: String,
    pub imports: Vec<String>,
    pub task_protocol: u8,
    pub annotations: BTreeMap<String, TaskAnnotation>,
}

impl TaskQueueConfig {
    /// Build the configuration around the given URLs
    pub fn new(broker_url: impl Into<String>, result_backend: impl Into<String>) -> Self {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            ADD_TASK.to_string(),
            TaskAnnotation {
                rate_limit: ADD_TASK_RATE_LIMIT.to_string(),
            },
        );

        Self {
            broker_url: broker_url.into(),
            result_backend: result_backend.into(),
            imports: DEFAULT_IMPORTS.iter().map(|m| m.to_string()).collect(),
            task_protocol: TASK_PROTOCOL,
            annotations,
        }
    }

    /// Broker on Redis db 0, results on db 1
    pub fn from_redis(redis: &RedisSettings) -> Result<Self> {
        Ok(Self::new(redis.broker_url()?, redis.result_backend_url()?))
    }

    /// Task identifier to rate-limit string
    pub fn rate_limits(&self) -> BTreeMap<&str, &str> {
        self.annotations
            .iter()
            .map(|(task, annotation)| (task.as_str(), annotation.rate_limit.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_fields() {
        let config = TaskQueueConfig::new("redis://a:1/0", "redis://a:1/1");
        assert_eq!(config.imports, vec!["superset.sql_lab".to_string()]);
        assert_eq!(config.task_protocol, 1);
        assert_eq!(config.rate_limits().get("tasks.add"), Some(&"10/s"));
        assert_eq!(config.rate_limits().len(), 1);
    }

    #[test]
    fn test_from_redis() {
        let redis = RedisSettings {
            host: "cache".to_string(),
            port: 6379,
        };
        let config = TaskQueueConfig::from_redis(&redis).unwrap();
        assert_eq!(config.broker_url, "redis://cache:6379/0");
        assert_eq!(config.result_backend, "redis://cache:6379/1");
    }

    #[test]
    fn test_annotations_serialize_as_nested_mapping() {
        let config = TaskQueueConfig::new("redis://a:1/0", "redis://a:1/1");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["annotations"]["tasks.add"]["rate_limit"], "10/s");
        assert_eq!(json["imports"][0], "superset.sql_lab");
    }
}
