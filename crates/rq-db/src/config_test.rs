use super::*;
use crate::retry::RetryPolicy;
use std::io::Write;

fn write_config(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = ExecutorConfig::default();
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.delay_ms, 20_000);
}

#[test]
fn test_empty_yaml_uses_defaults() {
    let config: ExecutorConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_load_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "rq.yml",
        "database:\n  path: data/app.duckdb\nretry:\n  max_attempts: 5\n  delay_ms: 250\n",
    );

    let config = ExecutorConfig::load(&path).unwrap();
    assert_eq!(config.database.path, "data/app.duckdb");

    let policy = config.retry.policy();
    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.delay_after(1), Duration::from_millis(250));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "rq.yml", "retry:\n  max_attempts: 2\n");
    write_config(dir.path(), "rq.yaml", "retry:\n  max_attempts: 4\n");

    let config = ExecutorConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.retry.max_attempts, 2);
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "rq.yaml", "retry:\n  delay_ms: 10\n");

    let config = ExecutorConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.retry.delay_ms, 10);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ExecutorConfig::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, DbError::ConfigError(_)));
}

#[test]
fn test_unknown_field_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "rq.yml", "retries: 3\n");
    assert!(matches!(
        ExecutorConfig::load(&path),
        Err(DbError::ConfigError(_))
    ));
}

#[test]
fn test_zero_attempts_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "rq.yml", "retry:\n  max_attempts: 0\n");
    let err = ExecutorConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}
