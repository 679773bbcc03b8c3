//! Tests for configuration and root folder resolution
//!
//! Note: uses serial_test to prevent races on CALLSTATS_ROOT_FOLDER.
//! Tests that touch the variable are marked #[serial].

use callstats_common::config::{
    resolve_root_folder, FolderLayout, LoggingConfig, TomlConfig, DEFAULT_BIND_ADDRESS,
    ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml);

    assert_eq!(resolved, PathBuf::from("/from/cli"));
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml);

    assert_eq!(resolved, PathBuf::from("/from/env"));
    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, &toml), PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_default_when_nothing_configured() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &TomlConfig::default());

    assert!(!resolved.as_os_str().is_empty());
    assert!(resolved.to_string_lossy().contains("callstats"));
}

#[test]
fn test_toml_parses_partial_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("callstats.toml");
    std::fs::write(&path, "root_folder = \"/srv/callstats\"\n").unwrap();

    let config = TomlConfig::from_file(&path).unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/callstats")));
    assert_eq!(config.logging, LoggingConfig::default());
    assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
}

#[test]
fn test_broken_toml_falls_back_to_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("callstats.toml");
    std::fs::write(&path, "root_folder = [unterminated").unwrap();

    assert!(TomlConfig::from_file(&path).is_err());
    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());
}

#[test]
fn test_missing_explicit_toml_falls_back_to_defaults() {
    let config = TomlConfig::load_or_default(Some(Path::new("/definitely/not/here.toml")));
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_folder_layout_creates_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let layout = FolderLayout::new(temp_dir.path().join("root"));

    layout.ensure_directories().unwrap();

    assert!(layout.inbox.is_dir());
    assert!(layout.archive.is_dir());
    assert!(layout.error.is_dir());
    assert_eq!(layout.database, temp_dir.path().join("root").join("callstats.db"));
}
