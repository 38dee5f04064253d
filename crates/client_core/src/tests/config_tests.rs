use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("ergocare_config_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn missing_file_and_empty_env_yield_defaults() {
    let dir = temp_dir("defaults");
    let settings =
        load_settings_from(&dir.join("client.toml"), env_from(&[])).expect("settings");
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.reveal_delay(), Duration::from_millis(100));
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn file_values_apply_and_env_overrides_them() {
    let dir = temp_dir("layering");
    let path = dir.join("client.toml");
    fs::write(
        &path,
        "api_base_url = \"http://ml.internal:9000\"\nreveal_delay_ms = 250\n",
    )
    .expect("write settings");

    let from_file = load_settings_from(&path, env_from(&[])).expect("settings");
    assert_eq!(from_file.api_base_url, "http://ml.internal:9000");
    assert_eq!(from_file.reveal_delay_ms, 250);

    let overridden = load_settings_from(
        &path,
        env_from(&[
            ("API_BASE_URL", "http://first.example"),
            ("APP__API_BASE_URL", "https://second.example/"),
            ("APP__REVEAL_DELAY_MS", "5"),
        ]),
    )
    .expect("settings");
    assert_eq!(overridden.api_base_url, "https://second.example/");
    assert_eq!(overridden.reveal_delay_ms, 5);
    assert_eq!(
        overridden.predict_url().expect("url").as_str(),
        "https://second.example/predict"
    );

    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn non_numeric_delay_is_ignored() {
    let dir = temp_dir("bad_delay");
    let settings = load_settings_from(
        &dir.join("client.toml"),
        env_from(&[("APP__REVEAL_DELAY_MS", "soon")]),
    )
    .expect("settings");
    assert_eq!(settings.reveal_delay_ms, 100);
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn malformed_file_is_reported() {
    let dir = temp_dir("malformed");
    let path = dir.join("client.toml");
    fs::write(&path, "api_base_url = 12\n").expect("write settings");

    let err = load_settings_from(&path, env_from(&[])).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }));
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn unusable_base_url_is_rejected() {
    let dir = temp_dir("bad_url");
    let err = load_settings_from(
        &dir.join("client.toml"),
        env_from(&[("API_BASE_URL", "ftp://files.example")]),
    )
    .expect_err("must fail");
    assert!(matches!(err, SettingsError::InvalidBaseUrl { .. }));

    assert!(ClientSettings::default()
        .with_api_base_url("not a url")
        .is_err());
    fs::remove_dir_all(dir).expect("cleanup");
}
