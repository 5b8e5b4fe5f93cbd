use dedupe::config::{ConfigError, Settings};
use dedupe::scanner::HashAlgorithm;
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
        .extract()
        .unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
max_depth = 4
io_threads = 2
walk_threads = 3
algorithm = "blake3"
strict = true
progress = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&config_path)).unwrap();

    assert_eq!(settings.max_depth, 4);
    assert_eq!(settings.io_threads, 2);
    assert_eq!(settings.walk_threads, 3);
    assert_eq!(settings.algorithm, HashAlgorithm::Blake3);
    assert!(settings.strict);
    assert!(!settings.progress);
}

#[test]
fn test_config_partial_file_keeps_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"blake3\"\n").unwrap();

    let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(settings.algorithm, HashAlgorithm::Blake3);
    assert_eq!(settings.max_depth, 10);
    assert_eq!(settings.io_threads, 4);
}

#[test]
fn test_config_unknown_algorithm_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"md5\"\n").unwrap();

    let result = Settings::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_config_zero_depth_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "max_depth = 0\n").unwrap();

    let result = Settings::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
