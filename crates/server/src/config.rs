use std::{collections::HashMap, fs};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub upstream_url: String,
    /// Route under `upstream_url`. Gradio 3.x serves `run/predict`; later
    /// releases moved named endpoints to `api/predict`.
    pub predict_path: String,
    pub upstream_timeout_secs: u64,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            upstream_url: "http://localhost:7860".into(),
            predict_path: "run/predict".into(),
            upstream_timeout_secs: 120,
            max_body_bytes: 16 * 1024,
        }
    }
}

impl Settings {
    /// Gradio prediction endpoint under the configured upstream root.
    pub fn predict_endpoint(&self) -> anyhow::Result<Url> {
        let mut base = Url::parse(self.upstream_url.trim())
            .with_context(|| format!("invalid upstream url '{}'", self.upstream_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("upstream url must use http or https, got '{}'", base.scheme());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let route = self.predict_path.trim().trim_start_matches('/');
        if route.is_empty() {
            bail!("predict path must not be empty");
        }
        base.join(route)
            .context("failed to build predict endpoint")
    }
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(DEFAULT_SETTINGS_FILE).ok();
    load_settings_with(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Layers `raw_file` (TOML) and then the variables exposed by `var` over the
/// defaults. Malformed entries are skipped.
pub fn load_settings_with(
    raw_file: Option<&str>,
    var: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
                settings.server_bind = v.to_string();
            }
            if let Some(v) = file_cfg.get("upstream_url").and_then(toml::Value::as_str) {
                settings.upstream_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("predict_path").and_then(toml::Value::as_str) {
                settings.predict_path = v.to_string();
            }
            if let Some(v) = file_integer(&file_cfg, "upstream_timeout_secs") {
                settings.upstream_timeout_secs = v;
            }
            if let Some(v) = file_integer(&file_cfg, "max_body_bytes") {
                settings.max_body_bytes = v as usize;
            }
        }
    }

    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("UPSTREAM_URL") {
        settings.upstream_url = v;
    }
    if let Some(v) = var("APP__UPSTREAM_URL") {
        settings.upstream_url = v;
    }

    if let Some(v) = var("APP__PREDICT_PATH") {
        settings.predict_path = v;
    }

    if let Some(v) = var("APP__UPSTREAM_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.upstream_timeout_secs = parsed;
        }
    }
    if let Some(v) = var("APP__MAX_BODY_BYTES") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.max_body_bytes = parsed;
        }
    }

    settings
}

fn file_integer(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<u64> {
    file_cfg
        .get(key)
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
