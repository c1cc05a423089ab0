//! Configuration tests
//!
//! These guard the file format: everything `to_toml` writes must parse back
//! into the same values, and every section must honor its defaults.

use super::*;
use crate::component::{BorderStyle, FocusStyle};
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let toml_str = Config::default().to_toml();
    let parsed = Config::parse_file_config(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
    let config = Config::from_sources(parsed.unwrap(), no_env);
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.preset = "stacked".to_string();
    config.navigation_order = vec!["messages".into(), "input".into()];
    config.layout.messages_weight = 5;
    config.layout.show_sidebar = false;
    config.layout.border_style = BorderStyle::Rounded;
    config.layout.focus_style = FocusStyle::Both;
    config.layout.spacing = 1;
    config.layout.adaptive_weights = true;
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let parsed = Config::parse_file_config(&config.to_toml()).unwrap();
    assert_eq!(Config::from_sources(parsed, no_env), config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults and precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_uses_defaults() {
    let config = Config::from_sources(FileConfig::default(), no_env);
    assert_eq!(config.preset, "classic");
    assert_eq!(config.navigation_order, ["input", "messages", "debug", "sidebar"]);
    assert_eq!(config.layout.input_height, 4);
    assert_eq!(config.layout.compact_input_height, 3);
    assert_eq!(config.layout.min_panel_width, 20);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_partial_layout_section_keeps_other_defaults() {
    let file = Config::parse_file_config(
        r#"
[layout]
debug_weight = 2
border_style = "double"
"#,
    )
    .unwrap();
    let config = Config::from_sources(file, no_env);
    assert_eq!(config.layout.debug_weight, 2);
    assert_eq!(config.layout.border_style, BorderStyle::Double);
    assert_eq!(config.layout.messages_weight, 3);
    assert_eq!(config.layout.focus_style, FocusStyle::Border);
    assert!(!config.layout.adaptive_weights);
}

#[test]
fn test_adaptive_weights_flag() {
    let file = Config::parse_file_config("[layout]\nadaptive_weights = true").unwrap();
    let config = Config::from_sources(file, no_env);
    assert!(config.layout.adaptive_weights);
    assert_eq!(config.layout.messages_weight, 3);
}

#[test]
fn test_env_overrides_file() {
    let file = Config::parse_file_config(
        r#"
preset = "classic"
[layout]
compact_mode = false
[logging]
level = "warn"
"#,
    )
    .unwrap();
    let env = env_from(&[
        ("PANELBOX_PRESET", "stacked"),
        ("PANELBOX_COMPACT", "true"),
        ("PANELBOX_LOG_LEVEL", "debug"),
    ]);
    let config = Config::from_sources(file, env);
    assert_eq!(config.preset, "stacked");
    assert!(config.layout.compact_mode);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_empty_navigation_order_falls_back() {
    let file = Config::parse_file_config("navigation_order = []").unwrap();
    let config = Config::from_sources(file, no_env);
    assert_eq!(config.navigation_order.len(), 4);
}

#[test]
fn test_broken_file_is_an_error() {
    assert!(Config::parse_file_config("preset = ").is_err());
    assert!(Config::parse_file_config("[layout]\nmessages_weight = \"three\"").is_err());
}

#[test]
fn test_missing_file_is_empty_layer() {
    let path = std::env::temp_dir().join("panelbox-config-test-does-not-exist.toml");
    let file = Config::load_file_config(&path).unwrap();
    assert!(file.preset.is_none());
    assert!(file.layout.is_none());
}
