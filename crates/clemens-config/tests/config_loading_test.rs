//! Config file loading tests
//!
//! Covers every supported format plus environment overrides.

use clemens_config::{
    ClemensConfig, ConfigError, ConfigLoader, PageSize, SectionNesting, ENV_FOOTER_DENSITY,
    ENV_VAULT_NAME,
};
use serial_test::serial;
use std::io::Write;

fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_load_toml_file() {
    let file = write_temp(
        r#"
[extraction]
footer_emoji_density = 0.75
section_nesting = "level_table"

[obsidian]
vault_name = "River Notes"
known_entities = ["Huck Finn"]

[pdf]
page_size = "a4"
"#,
        ".toml",
    );

    let config = ConfigLoader::load_from_file(file.path()).unwrap();
    assert_eq!(config.extraction.footer_emoji_density, 0.75);
    assert_eq!(config.extraction.section_nesting, SectionNesting::LevelTable);
    assert_eq!(config.obsidian.vault_name, "River Notes");
    assert_eq!(config.obsidian.known_entities, vec!["Huck Finn".to_string()]);
    assert_eq!(config.pdf.page_size, PageSize::A4);
    // Untouched sections keep defaults
    assert!(config.export.pretty_json);
}

#[test]
fn test_load_yaml_file() {
    let file = write_temp(
        "export:\n  pretty_json: false\n  max_listed: 3\nlogging:\n  level: debug\n",
        ".yaml",
    );

    let config = ConfigLoader::load_from_file(file.path()).unwrap();
    assert!(!config.export.pretty_json);
    assert_eq!(config.export.max_listed, 3);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_round_trip_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ClemensConfig::default();
    config.obsidian.max_key_points = 4;
    ConfigLoader::save_to_file(&config, &path).unwrap();

    let loaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_toml_reports_toml_error() {
    let file = write_temp("[extraction\nfooter_emoji_density = ", ".toml");
    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "got {err:?}");
}

#[test]
fn test_write_example_creates_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clemens").join("config.toml");
    ConfigLoader::write_example(&path).unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.extraction.protocol_prefixes[0], "NSPFRP_");
}

#[test]
#[serial]
fn test_env_overrides_apply_after_file() {
    let file = write_temp("{\"obsidian\": {\"vault_name\": \"FromFile\"}}", ".json");

    std::env::set_var(ENV_VAULT_NAME, "FromEnv");
    std::env::set_var(ENV_FOOTER_DENSITY, "0.25");
    let result = ConfigLoader::load(Some(file.path()));
    std::env::remove_var(ENV_VAULT_NAME);
    std::env::remove_var(ENV_FOOTER_DENSITY);

    let config = result.unwrap();
    assert_eq!(config.obsidian.vault_name, "FromEnv");
    assert_eq!(config.extraction.footer_emoji_density, 0.25);
}

#[test]
#[serial]
fn test_env_override_still_validated() {
    let file = write_temp("{}", ".json");

    std::env::set_var(ENV_FOOTER_DENSITY, "7");
    let result = ConfigLoader::load(Some(file.path()));
    std::env::remove_var(ENV_FOOTER_DENSITY);

    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}
