//! Configuration validation.

use std::net::IpAddr;

use crate::error::ConfigError;
use crate::schema::Config;

/// Backends the server knows how to open.
pub const STORAGE_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors
            .into_iter()
            .next()
            .map(|e| ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_tracker(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        } else if let Ok(ip) = config.server.host.parse::<IpAddr>() {
            if ip.is_unspecified() {
                result.add_warning(ValidationWarning::new(
                    "server.host",
                    "Listening on all interfaces; snapshots will be reachable from the network",
                ));
            }
        }

        if config.server.max_body_bytes == 0 {
            result.add_error(ValidationError::new(
                "server.max_body_bytes",
                "max_body_bytes must be greater than 0",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if !STORAGE_BACKENDS.contains(&config.storage.backend.as_str()) {
            result.add_error(ValidationError::new(
                "storage.backend",
                format!(
                    "Unknown storage backend '{}', valid values: {:?}",
                    config.storage.backend, STORAGE_BACKENDS
                ),
            ));
        }

        if config.storage.backend == "memory" && config.storage.path.is_some() {
            result.add_warning(ValidationWarning::new(
                "storage.path",
                "storage.path is ignored by the memory backend",
            ));
        }
    }

    fn validate_tracker(config: &Config, result: &mut ValidationResult) {
        if config.tracker.history_limit == 0 {
            result.add_error(ValidationError::new(
                "tracker.history_limit",
                "history_limit must be greater than 0",
            ));
        }

        if config.tracker.history_limit > 1000 {
            result.add_warning(ValidationWarning::new(
                "tracker.history_limit",
                "history_limit is very high (>1000), history responses may get large",
            ));
        }

        if config.tracker.preview_chars == 0 {
            result.add_error(ValidationError::new(
                "tracker.preview_chars",
                "preview_chars must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
