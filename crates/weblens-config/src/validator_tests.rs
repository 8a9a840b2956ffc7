use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "server.port"));
}

#[test]
fn test_validate_empty_host() {
    let mut config = Config::default();
    config.server.host = String::new();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "server.host"));
}

#[test]
fn test_validate_public_bind_warning() {
    let mut config = Config::default();
    config.server.host = "0.0.0.0".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "server.host"));
}

#[test]
fn test_validate_zero_body_limit() {
    let mut config = Config::default();
    config.server.max_body_bytes = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "server.max_body_bytes"));
}

#[test]
fn test_validate_unknown_backend() {
    let mut config = Config::default();
    config.storage.backend = "mongodb".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors[0].message.contains("mongodb"));
}

#[test]
fn test_validate_memory_backend_with_path_warns() {
    let mut config = Config::default();
    config.storage.backend = "memory".to_string();
    config.storage.path = Some("/tmp/ignored.db".into());

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "storage.path"));
}

#[test]
fn test_validate_zero_history_limit() {
    let mut config = Config::default();
    config.tracker.history_limit = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "tracker.history_limit"));
}

#[test]
fn test_validate_high_history_limit_warning() {
    let mut config = Config::default();
    config.tracker.history_limit = 5000;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(!result.warnings.is_empty());
}

#[test]
fn test_validate_zero_preview_chars() {
    let mut config = Config::default();
    config.tracker.preview_chars = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "tracker.preview_chars"));
}

#[test]
fn test_into_error_first_error() {
    let mut config = Config::default();
    config.server.port = 0;
    config.tracker.preview_chars = 0;

    let err = ConfigValidator::validate(&config).into_error().unwrap();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
}

#[test]
fn test_into_error_none_when_valid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.into_error().is_none());
}
