//! Error types for configuration resolution
//!
//! This module defines the error kinds raised while resolving deployment
//! settings. Resolution fails fast: the first missing or invalid value aborts
//! the whole load.

use std::fmt;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where a configuration value was looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    EnvironmentVariable,
    Secret,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::EnvironmentVariable => write!(f, "environment variable"),
            SourceKind::Secret => write!(f, "secret"),
        }
    }
}

/// Errors raised while resolving configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", missing_message(.kind, .name, .cause))]
    ConfigurationMissing {
        kind: SourceKind,
        name: String,
        /// I/O failure that was treated as "missing", if any
        cause: Option<String>,
    },

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            kind: SourceKind::EnvironmentVariable,
            name: name.into(),
            cause: None,
        }
    }

    pub fn missing_secret(name: impl Into<String>, cause: Option<String>) -> Self {
        Self::ConfigurationMissing {
            kind: SourceKind::Secret,
            name: name.into(),
            cause,
        }
    }

    pub fn invalid(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Name of the variable or secret the error refers to
    pub fn name(&self) -> &str {
        match self {
            Self::ConfigurationMissing { name, .. } | Self::InvalidValue { name, .. } => name,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::ConfigurationMissing { .. })
    }
}

fn missing_message(kind: &SourceKind, name: &str, cause: &Option<String>) -> String {
    let base = match kind {
        SourceKind::EnvironmentVariable => {
            format!("The environment variable {} was missing", name)
        }
        SourceKind::Secret => format!("Missing a required secret: {}", name),
    };
    match cause {
        Some(cause) => format!("{} ({})", base, cause),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_message() {
        let err = ConfigError::missing_env("DB_HOST");
        assert_eq!(err.to_string(), "The environment variable DB_HOST was missing");
        assert_eq!(err.name(), "DB_HOST");
        assert!(err.is_missing());
    }

    #[test]
    fn test_missing_secret_message_includes_cause() {
        let err = ConfigError::missing_secret("database/password", None);
        assert_eq!(
            err.to_string(),
            "Missing a required secret: database/password"
        );

        let err = ConfigError::missing_secret(
            "database/password",
            Some("permission denied".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Missing a required secret: database/password (permission denied)"
        );
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::invalid("DB_PORT", "abc", "not a port number");
        assert_eq!(
            err.to_string(),
            "Invalid value for DB_PORT: \"abc\" (not a port number)"
        );
        assert!(!err.is_missing());
    }
}
