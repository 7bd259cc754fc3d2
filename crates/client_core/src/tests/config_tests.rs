use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn default_settings_are_valid() {
    let settings = ClientSettings::default();
    assert_eq!(settings.title_word_limit, 15);
    assert_eq!(settings.reveal_interval(), Duration::from_millis(50));
    assert_eq!(settings.max_display_items, 40);
    assert_eq!(settings.request_timeout(), None);
    validate_backend_url(&settings.backend_url).expect("default url is valid");
}

#[test]
fn app_prefixed_env_wins_over_legacy_name() {
    let mut settings = ClientSettings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("RECOMMENDER_BACKEND_URL", "http://legacy:1/api"),
            ("APP__BACKEND_URL", "http://preferred:2/api"),
            ("APP__TITLE_WORD_LIMIT", "4"),
            ("APP__REVEAL_INTERVAL_MS", "10"),
            ("APP__REQUEST_TIMEOUT_SECS", "30"),
        ]),
    )
    .expect("env applies");

    assert_eq!(settings.backend_url, "http://preferred:2/api");
    assert_eq!(settings.title_word_limit, 4);
    assert_eq!(settings.reveal_interval_ms, 10);
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn non_numeric_env_values_are_rejected() {
    let mut settings = ClientSettings::default();
    let err = apply_env(
        &mut settings,
        env_from(&[("APP__TITLE_WORD_LIMIT", "many")]),
    )
    .expect_err("should fail");
    assert!(matches!(
        err,
        SettingsError::InvalidValue {
            key: "APP__TITLE_WORD_LIMIT",
            ..
        }
    ));
}

#[test]
fn backend_url_must_be_http() {
    assert!(validate_backend_url("https://recs.example.com/api/recommendations").is_ok());
    assert!(matches!(
        validate_backend_url("ftp://recs.example.com"),
        Err(SettingsError::UnsupportedScheme(_))
    ));
    assert!(matches!(
        validate_backend_url("not a url"),
        Err(SettingsError::InvalidBackendUrl { .. })
    ));
}

#[test]
fn reads_settings_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("recommender_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("recommender.toml");
    fs::write(
        &path,
        "backend_url = \"http://10.0.0.5:3000/api/recommendations\"\n\
         title_word_limit = 4\n\
         max_display_items = 12\n",
    )
    .expect("write settings");

    let mut settings = ClientSettings::default();
    let raw = fs::read_to_string(&path).expect("read back");
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(&raw).expect("toml");
    apply_file(&mut settings, &file_cfg).expect("file applies");

    assert_eq!(settings.backend_url, "http://10.0.0.5:3000/api/recommendations");
    assert_eq!(settings.title_word_limit, 4);
    assert_eq!(settings.max_display_items, 12);
    assert_eq!(settings.reveal_interval_ms, 50);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn malformed_settings_file_is_reported() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("recommender_bad_settings_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("recommender.toml");
    fs::write(&path, "title_word_limit = \"four\"\n").expect("write settings");

    let err = load_settings_from(Some(&path)).expect_err("should fail");
    assert!(matches!(
        err,
        SettingsError::InvalidValue {
            key: "title_word_limit",
            ..
        }
    ));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_settings_file_is_reported() {
    let err = load_settings_from(Some(Path::new("/definitely/not/here/recommender.toml")))
        .expect_err("should fail");
    assert!(matches!(err, SettingsError::Read { .. }));
}
