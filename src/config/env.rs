//! Environment variable resolution
//!
//! Lookups go through the [`EnvSource`] trait so callers can resolve against
//! the real process environment or a fixed map.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Trait for reading named environment values
pub trait EnvSource: Send + Sync {
    /// Get the value for `name`, or `None` if it is not set
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        // Non-unicode values are treated as unset
        env::var(name).ok()
    }
}

/// Fixed set of variables, independent of the process environment
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Get the environment variable `name`, falling back to `default`.
///
/// A variable that is set to an empty string counts as set. Fails with
/// [`ConfigError::ConfigurationMissing`] when the variable is unset and no
/// default was supplied.
pub fn get_env_variable(
    source: &dyn EnvSource,
    name: &str,
    default: Option<&str>,
) -> Result<String> {
    match source.var(name) {
        Some(value) => Ok(value),
        None => match default {
            Some(default) => {
                debug!("{} not set, using default {:?}", name, default);
                Ok(default.to_string())
            }
            None => Err(ConfigError::missing_env(name)),
        },
    }
}

/// Typed variant of [`get_env_variable`].
///
/// The default keeps its declared type and is returned as-is; a value found
/// in the environment is parsed with [`FromStr`].
pub fn get_env_parsed<T>(source: &dyn EnvSource, name: &str, default: Option<T>) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match source.var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, raw.as_str(), e.to_string())),
        None => match default {
            Some(default) => {
                debug!("{} not set, using typed default", name);
                Ok(default)
            }
            None => Err(ConfigError::missing_env(name)),
        },
    }
}
