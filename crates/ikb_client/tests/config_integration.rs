//! Integration tests for config load/save.

use ikb_client::{config, Config, DEFAULT_ENDPOINT, DEFAULT_GREETING};
use predicates::prelude::*;

#[test]
fn load_existing_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
service:
  endpoint: "http://kb.internal:3000/v1/chat"
session:
  greeting: "Ask me about the handbook."
"#,
    )
    .unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.endpoint(), "http://kb.internal:3000/v1/chat");
    assert_eq!(cfg.greeting(), Some("Ask me about the handbook."));
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "service: {}\n").unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
    assert_eq!(cfg.greeting(), Some(DEFAULT_GREETING));
}

#[test]
fn empty_greeting_disables_it() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "session:\n  greeting: \"\"\n").unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert_eq!(cfg.greeting(), None);
}

#[test]
fn load_or_default_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("absent.yaml");

    let cfg = config::load_or_default(&config_path).expect("missing file means defaults");
    assert_eq!(cfg, Config::default());
    assert!(config::load(&config_path).is_err());
}

#[test]
fn invalid_yaml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "service: [unterminated\n").unwrap();

    let err = config::load_or_default(&config_path).expect_err("parse should fail");
    let pred = predicates::str::contains("invalid config");
    assert!(pred.eval(&err.to_string()), "got: {err}");
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("ikb");
    let config_path = config_dir.join("config.yaml");
    assert!(!config_dir.exists(), "config dir should not exist yet");

    let mut cfg = Config::default();
    cfg.service.endpoint = Some("http://localhost:4000/v1/chat".into());

    config::save(&config_path, &cfg).expect("save should succeed");
    let pred = predicates::path::exists();
    assert!(pred.eval(&config_path), "config file should exist after save");

    let reloaded = config::load(&config_path).expect("reload should succeed");
    assert_eq!(reloaded, cfg);
}

#[test]
fn resolved_config_spells_out_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    config::save(&config_path, &Config::default().resolved()).expect("save should succeed");

    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(predicates::str::contains("service:").eval(&contents));
    assert!(predicates::str::contains(DEFAULT_ENDPOINT).eval(&contents));
    assert!(predicates::str::contains("greeting").eval(&contents));
}

/// Config path resolves to `~/.ikb/config.yaml` using the current platform's home dir.
#[test]
fn default_config_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap().to_string();

    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, &home);
    let path = config::default_config_path();
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a config path");
    let expected = dir.path().join(".ikb").join("config.yaml");
    assert_eq!(path, expected);
}
