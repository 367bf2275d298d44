use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(label: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("study_client_config_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let path = env::temp_dir().join("study_client_config_absent").join(SETTINGS_FILE);
    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api_base, "http://127.0.0.1:8000");
    assert_eq!(settings.model, "llama3.1:8b");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "file_values",
        "api_base = \"http://study.lan:9000/\"\nmodel = \"gemma2:2b\"\nlog_filter = \"debug\"\n",
    );

    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings.api_base, "http://study.lan:9000");
    assert_eq!(settings.model, "gemma2:2b");
    assert_eq!(settings.log_filter, "debug");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let path = temp_settings_file("env_override", "api_base = \"http://from-file:8000\"\n");

    let settings = load_settings_from(&path, |name| match name {
        "STUDY_API_BASE" => Some("http://from-env:8000".to_string()),
        "APP__API_BASE" => Some("https://from-app-env".to_string()),
        "STUDY_MODEL" => Some("  ".to_string()),
        _ => None,
    })
    .expect("settings");

    assert_eq!(settings.api_base, "https://from-app-env");
    assert_eq!(settings.model, "llama3.1:8b");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_settings_file("malformed", "api_base = [unterminated");

    let err = load_settings_from(&path, no_env).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }), "unexpected: {err}");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn api_base_must_be_http_url() {
    assert!(matches!(
        normalize_api_base("not a url"),
        Err(SettingsError::InvalidApiBase { .. })
    ));
    assert!(matches!(
        normalize_api_base("ftp://files.example"),
        Err(SettingsError::UnsupportedScheme(_))
    ));
    assert_eq!(
        normalize_api_base("  ").expect("blank falls back"),
        DEFAULT_API_BASE
    );
}
