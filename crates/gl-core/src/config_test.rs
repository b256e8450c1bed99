use super::*;

#[test]
fn test_parse_minimal_config() {
    let config: StoreConfig = serde_yaml::from_str("database_path: ladder.sqlite").unwrap();
    assert_eq!(config.database_path, "ladder.sqlite");
    assert_eq!(config.trace_archive, None);
    assert_eq!(config.busy_timeout_ms, 5_000);
    assert_eq!(config.journal_mode, JournalMode::Wal);
    assert_eq!(config.dangling_references, DanglingReferencePolicy::Warn);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database_path: /var/lib/ladder/ladder.sqlite
trace_archive: traces
busy_timeout_ms: 250
journal_mode: delete
dangling_references: reject
"#;
    let config: StoreConfig = serde_yaml::from_str(yaml).unwrap();
    let root = PathBuf::from("/srv/ladder");
    assert_eq!(
        config.database_path_absolute(&root),
        PathBuf::from("/var/lib/ladder/ladder.sqlite")
    );
    assert_eq!(
        config.trace_archive_absolute(&root),
        Some(root.join("traces"))
    );
    assert_eq!(config.busy_timeout(), std::time::Duration::from_millis(250));
    assert_eq!(config.journal_mode.as_str(), "DELETE");
    assert_eq!(config.dangling_references, DanglingReferencePolicy::Reject);
}

#[test]
fn test_unknown_field_rejected() {
    let result = serde_yaml::from_str::<StoreConfig>("database_path: a.db\narchive: x");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("ladder.yaml"),
        "database_path: ladder.sqlite\ntrace_archive: traces\n",
    )
    .unwrap();

    let config = StoreConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(
        config.database_path_absolute(dir.path()),
        dir.path().join("ladder.sqlite")
    );
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = StoreConfig::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_rejects_zero_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ladder.yml");
    std::fs::write(&path, "database_path: a.db\nbusy_timeout_ms: 0\n").unwrap();

    let err = StoreConfig::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_rejects_empty_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ladder.yml");
    std::fs::write(&path, "database_path: ''\n").unwrap();

    assert!(StoreConfig::load(&path).is_err());
}

#[test]
fn test_in_memory() {
    let config = StoreConfig::in_memory();
    assert!(config.is_in_memory());
    assert!(!StoreConfig::new("ladder.sqlite").is_in_memory());
}
