use crate::conf::tests::SAMPLE;
use crate::conf::{ConfigError, EnvOverrides, load_config, load_spec_config};
use crate::failover::FailureSignal;
use crate::pool::PoolLabel;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn load_config_from_directory_applies_defaults() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("switchyard.hcl"), SAMPLE).unwrap();

    // Act
    let cfg = load_config(dir.path(), &EnvOverrides::none()).unwrap();

    // Assert
    assert_eq!(cfg.active_pool, PoolLabel::Blue);
    assert_eq!(cfg.registry.get(PoolLabel::Green).address(), "app_green:3000");
    assert_eq!(cfg.proxy.binary, PathBuf::from("nginx"));
    assert_eq!(cfg.proxy.upstream_name, "app_pool");
    assert_eq!(cfg.proxy.listen, 8080);
    assert_eq!(cfg.failover.connect_timeout, Duration::from_secs(2));
    assert_eq!(cfg.failover.tries, 2);
    assert_eq!(cfg.failover.retry_on, FailureSignal::DEFAULT.to_vec());
    assert_eq!(cfg.headers.pool, "X-App-Pool");
    assert_eq!(cfg.health_path, "/healthz");
}

#[test]
fn load_config_accepts_entrypoint_file_path() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.hcl");
    fs::write(&path, SAMPLE).unwrap();

    // Act
    let cfg = load_config(&path, &EnvOverrides::none()).unwrap();

    // Assert
    assert_eq!(cfg.registry.get(PoolLabel::Blue).release_id, "blue-v1");
}

#[test]
fn failover_block_overrides_defaults() {
    // Arrange
    let dir = tempdir().unwrap();
    let contents = format!(
        r#"{SAMPLE}
failover = {{
  connect_timeout_secs = 1
  tries = 3
  retry_on = ["error", "http_503"]
}}
"#
    );
    fs::write(dir.path().join("switchyard.hcl"), contents).unwrap();

    // Act
    let cfg = load_config(dir.path(), &EnvOverrides::none()).unwrap();

    // Assert
    assert_eq!(cfg.failover.connect_timeout, Duration::from_secs(1));
    assert_eq!(cfg.failover.read_timeout, Duration::from_secs(3));
    assert_eq!(cfg.failover.tries, 3);
    assert_eq!(
        cfg.failover.retry_on,
        vec![FailureSignal::Error, FailureSignal::Http503]
    );
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().unwrap();

    let err = load_config(dir.path(), &EnvOverrides::none()).unwrap_err();

    assert!(matches!(err, ConfigError::ReadFile { .. }), "{err:?}");
}

#[test]
fn invalid_hcl_is_a_parse_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("switchyard.hcl"), "pools = {").unwrap();

    let err = load_spec_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
}

#[test]
fn third_pool_is_rejected_at_parse_time() {
    let dir = tempdir().unwrap();
    let contents = SAMPLE.replace(
        "  green = {",
        "  yellow = {\n    host = \"y\"\n    port = 1\n    release_id = \"y\"\n  }\n  green = {",
    );
    fs::write(dir.path().join("switchyard.hcl"), contents).unwrap();

    let err = load_spec_config(dir.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
}

#[test]
fn validation_errors_are_aggregated() {
    // Arrange
    let dir = tempdir().unwrap();
    let contents = SAMPLE
        .replace("active_pool = \"blue\"", "active_pool = \"yellow\"")
        .replace("release_id = \"green-v1\"", "release_id = \"\"")
        .replace("listen      = 8080", "listen      = 0");
    fs::write(dir.path().join("switchyard.hcl"), contents).unwrap();

    // Act
    let err = load_config(dir.path(), &EnvOverrides::none()).unwrap_err();

    // Assert
    let ConfigError::Validation { validation_errors } = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(validation_errors.0.len(), 3);
}
