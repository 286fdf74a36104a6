use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use config::Map;

fn env_with(vars: &[(&str, &str)]) -> Environment {
    let map: Map<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    environment().source(Some(map))
}

fn temp_config(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("posts_cli_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("posts.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_apply_without_sources() {
    let settings = build_settings(
        Some(&temp_config("")),
        env_with(&[]),
    )
    .expect("settings");
    assert_eq!(settings, Settings::default());
    settings.validate().expect("defaults are valid");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "server_url = \"http://localhost:3000\"\npage_size = 10\nnotification_duration_ms = 1500\n",
    );

    let settings = build_settings(Some(&path), env_with(&[])).expect("settings");

    assert_eq!(settings.server_url, "http://localhost:3000");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.notification_duration(), Duration::from_millis(1500));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_config("page_size = 10\n");

    let settings = build_settings(
        Some(&path),
        env_with(&[
            ("APP__PAGE_SIZE", "20"),
            ("APP__OFFLINE", "true"),
            ("APP__PAGE_SIZE_OPTIONS", "20,50"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.page_size, 20);
    assert!(settings.offline);
    assert_eq!(settings.page_size_options, vec![20, 50]);
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let path = env::temp_dir().join("posts_cli_missing_config_file.toml");
    assert!(build_settings(Some(&path), env_with(&[])).is_err());
}

#[test]
fn validation_rejects_bad_values() {
    let mut settings = Settings {
        page_size: 7,
        ..Settings::default()
    };
    assert!(settings.validate().is_err());

    settings.page_size = 5;
    settings.server_url = "not a url".into();
    assert!(settings.validate().is_err());

    settings.offline = true;
    settings.validate().expect("offline ignores server url");

    settings.notification_duration_ms = 0;
    assert!(settings.validate().is_err());
}
