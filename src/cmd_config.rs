//! `weblens check-config`: load the configuration and report problems.

use std::path::Path;

use weblens_config::{Config, ConfigLoader, ConfigValidator, ValidationResult};

/// Load the configuration, falling back to defaults when the file is missing.
pub(crate) fn load(path: &Path) -> Result<Config, weblens_config::ConfigError> {
    ConfigLoader::load_or_default(path)
}

/// Format validation findings, one per line.
pub(crate) fn report(path: &Path, result: &ValidationResult) -> String {
    let mut lines = Vec::new();
    for error in &result.errors {
        lines.push(format!("error: {}: {}", error.path, error.message));
    }
    for warning in &result.warnings {
        lines.push(format!("warning: {}: {}", warning.path, warning.message));
    }
    if result.is_valid() {
        lines.push(format!("{}: OK", path.display()));
    }
    lines.join("\n")
}

pub(crate) fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        println!("{} not found, checking defaults", path.display());
    }
    let config = load(path)?;
    let result = ConfigValidator::validate(&config);
    println!("{}", report(path, &result));

    match result.into_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
