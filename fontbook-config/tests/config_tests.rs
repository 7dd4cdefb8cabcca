//! Integration tests for config persistence.

use fontbook_config::{AtlasConfig, Config, ConfigError, LogLevel};

#[test]
fn test_save_then_load_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = Config {
        font_directories: vec!["~/fonts".into(), "/usr/local/share/fonts".into()],
        load_system_fonts: false,
        max_fallback_hops: 4,
        log_level: LogLevel::Debug,
        atlas: AtlasConfig {
            width: 512,
            height: 256,
            padding: 1,
            font_size: 24.0,
        },
        ..Config::default()
    };
    config
        .fallback_chain
        .insert("Brand Sans".to_string(), "Inter".to_string());

    config.save_to(&path).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "log_level: info\nlast_resort_families:\n  - Iosevka\natlas:\n  font_size: 32\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.last_resort_families, vec!["Iosevka".to_string()]);
    assert_eq!(config.atlas.font_size, 32.0);
    assert_eq!(config.atlas.width, 2048);
    assert!(config.load_system_fonts);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Info);
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "max_fallback_hops: [unterminated").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Parse(_))
    ));
}

#[test]
fn test_validation_error_surfaces_through_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "atlas:\n  height: 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Validation(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Io { .. })
    ));
}

#[test]
fn test_config_path_ends_with_fontbook_yaml() {
    let path = Config::config_path();
    assert!(path.ends_with("fontbook/config.yaml"));
}
