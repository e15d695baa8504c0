use richpath::config::{Config, OutputFormat};
use richpath::ypath::AttributeConflictPolicy;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.attribute_conflict, AttributeConflictPolicy::ComputedWins);
    assert_eq!(config.output_format, OutputFormat::Yson);
    assert!(config.pretty);
}

#[test]
fn test_serialize_default_config() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).expect("Failed to serialize config");

    assert!(toml_str.contains("attribute_conflict = \"computed-wins\""));
    assert!(toml_str.contains("output_format = \"yson\""));
    assert!(toml_str.contains("pretty = true"));
}

#[test]
fn test_deserialize_full_config() {
    let toml_str = r#"
        attribute_conflict = "reject"
        output_format = "json"
        pretty = false
    "#;

    let config: Config = toml::from_str(toml_str).expect("Failed to deserialize config");

    assert_eq!(config.attribute_conflict, AttributeConflictPolicy::Reject);
    assert_eq!(config.output_format, OutputFormat::Json);
    assert!(!config.pretty);
}

#[test]
fn test_deserialize_empty_config() {
    // Empty TOML should use all defaults
    let config: Config = toml::from_str("").expect("Failed to deserialize config");
    assert_eq!(config, Config::default());
}

#[test]
fn test_deserialize_unknown_policy_fails() {
    let result: Result<Config, _> = toml::from_str("attribute_conflict = \"maybe\"");
    assert!(result.is_err());
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let original = Config {
        attribute_conflict: AttributeConflictPolicy::KeepLiteral,
        output_format: OutputFormat::Yaml,
        pretty: false,
    };
    original.save_to(&path).expect("Failed to save config");

    let loaded = Config::load_from(&path).expect("Failed to load config");
    assert_eq!(loaded, original);
}

#[test]
fn test_load_from_invalid_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "output_format = [").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_from_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
