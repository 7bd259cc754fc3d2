use std::{collections::HashMap, fs, path::Path, time::Duration};

use url::Url;

use crate::error::SettingsError;

pub const DEFAULT_SETTINGS_FILE: &str = "recommender.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub request_timeout_secs: Option<u64>,
    pub title_word_limit: usize,
    pub reveal_interval_ms: u64,
    pub max_display_items: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3000/api/recommendations".into(),
            request_timeout_secs: None,
            title_word_limit: 15,
            reveal_interval_ms: 50,
            max_display_items: 40,
        }
    }
}

impl ClientSettings {
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    let path = Path::new(DEFAULT_SETTINGS_FILE);
    load_settings_from(path.exists().then_some(path))
}

pub fn load_settings_from(path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    if let Some(path) = path {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_cfg: HashMap<String, toml::Value> =
            toml::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        apply_file(&mut settings, &file_cfg)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    validate_backend_url(&settings.backend_url)?;
    Ok(settings)
}

fn apply_file(
    settings: &mut ClientSettings,
    file_cfg: &HashMap<String, toml::Value>,
) -> Result<(), SettingsError> {
    if let Some(v) = file_cfg.get("backend_url").and_then(toml::Value::as_str) {
        settings.backend_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        settings.request_timeout_secs = Some(file_number(v, "request_timeout_secs")?);
    }
    if let Some(v) = file_cfg.get("title_word_limit") {
        settings.title_word_limit = file_number(v, "title_word_limit")? as usize;
    }
    if let Some(v) = file_cfg.get("reveal_interval_ms") {
        settings.reveal_interval_ms = file_number(v, "reveal_interval_ms")?;
    }
    if let Some(v) = file_cfg.get("max_display_items") {
        settings.max_display_items = file_number(v, "max_display_items")? as usize;
    }
    Ok(())
}

fn file_number(value: &toml::Value, key: &'static str) -> Result<u64, SettingsError> {
    value
        .as_integer()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| SettingsError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

pub(crate) fn apply_env(
    settings: &mut ClientSettings,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    if let Some(v) = var("RECOMMENDER_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = var("APP__BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = Some(env_number(&v, "APP__REQUEST_TIMEOUT_SECS")?);
    }
    if let Some(v) = var("APP__TITLE_WORD_LIMIT") {
        settings.title_word_limit = env_number(&v, "APP__TITLE_WORD_LIMIT")? as usize;
    }
    if let Some(v) = var("APP__REVEAL_INTERVAL_MS") {
        settings.reveal_interval_ms = env_number(&v, "APP__REVEAL_INTERVAL_MS")?;
    }
    Ok(())
}

fn env_number(raw: &str, key: &'static str) -> Result<u64, SettingsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| SettingsError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}

pub fn validate_backend_url(raw: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(raw.trim()).map_err(|source| SettingsError::InvalidBackendUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(SettingsError::UnsupportedScheme(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
