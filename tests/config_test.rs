//! Integration tests for configuration loading.

use is3dump::config::{load_config, load_config_or_default, Config};
use std::fs;
use tempfile::tempdir;

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.dump.stream_id, 0);
    assert!(config.dump.output_dir.is_none());
    assert_eq!(config.dump.publisher, "IStream");
    assert!(config.dump.id3_tag);
    assert!(!config.channel.recursive);
}

#[test]
fn load_full_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("is3dump.toml");
    fs::write(
        &path,
        format!(
            r#"
[dump]
stream_id = 2
output_dir = "{}"
publisher = "Archive"
id3_tag = false

[channel]
recursive = true
"#,
            dir.path().display()
        ),
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.dump.stream_id, 2);
    assert_eq!(config.dump.output_dir.as_deref(), Some(dir.path()));
    assert_eq!(config.dump.publisher, "Archive");
    assert!(!config.dump.id3_tag);
    assert!(config.channel.recursive);
}

#[test]
fn partial_config_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[dump]\nstream_id = 5\n").unwrap();

    let config = load_config_or_default(Some(path.as_path())).unwrap();
    assert_eq!(config.dump.stream_id, 5);
    assert_eq!(config.dump.publisher, "IStream");
    assert!(config.dump.id3_tag);
}

#[test]
fn empty_publisher_rejected_when_tagging() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    fs::write(&path, "[dump]\npublisher = \"\"\n").unwrap();
    assert!(load_config(&path).is_err());

    fs::write(&path, "[dump]\npublisher = \"\"\nid3_tag = false\n").unwrap();
    assert!(load_config(&path).is_ok());
}

#[test]
fn missing_output_dir_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            "[dump]\noutput_dir = \"{}\"\n",
            dir.path().join("nope").display()
        ),
    )
    .unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Output directory does not exist"));
}

#[test]
fn invalid_toml_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[dump\nstream_id = ").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_config(&dir.path().join("absent.toml")).is_err());
}
