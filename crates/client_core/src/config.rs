use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const SETTINGS_FILE: &str = "twin_client.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub api_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
        }
    }
}

impl ClientSettings {
    /// Applies a command-line override, which wins over file and environment.
    pub fn with_override(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.filter(|v| !v.trim().is_empty()) {
            self.api_url = api_url;
        }
        self
    }

    pub fn resolved_api_url(&self) -> anyhow::Result<String> {
        normalize_api_url(&self.api_url)
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
    }

    if let Some(v) = env("TWIN_API_URL").filter(|v| !v.trim().is_empty()) {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL").filter(|v| !v.trim().is_empty()) {
        settings.api_url = v;
    }

    settings
}

/// Trims whitespace and trailing slashes and checks for an http(s) origin.
pub fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_URL.to_string());
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("invalid API URL '{trimmed}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(anyhow!(
            "unsupported API URL scheme '{other}' in '{trimmed}'; expected http or https"
        )),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
