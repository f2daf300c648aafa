//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "apiBaseUrl": "http://localhost:8080/api",
//!   "router": { "landingRoute": "/dashboard", "loginRoute": "/login" },
//!   "logging": { "level": "warn", "format": "compact" }
//! }
//! ```
//! Keys this crate does not manage are preserved on save. The
//! `PHONEBOOK_API_URL` override is applied on load and never written back.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::http::{BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::domain::result::{Error, Result};
use crate::services::{LoggingConfig, RouterConfig};

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default)]
    router: RouterConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Phonebook configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL as stored in settings.json
    pub api_base_url: String,
    /// Base URL from the environment; wins over `api_base_url`, never saved
    pub api_base_url_override: Option<String>,
    pub router: RouterConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_base_url_override: None,
            router: RouterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file yields defaults. The API URL
    /// can be overridden with the `PHONEBOOK_API_URL` environment variable.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_override(data_dir, std::env::var(BASE_URL_ENV).ok())
    }

    /// Load config, taking the API URL override from the caller
    pub fn load_with_override(data_dir: &Path, api_base_url_override: Option<String>) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        Ok(Self {
            api_base_url: raw
                .api_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_base_url_override: api_base_url_override.filter(|v| !v.trim().is_empty()),
            router: raw.router,
            logging: raw.logging,
        })
    }

    /// URL requests go to: the override if set, else the stored URL
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url_override
            .as_deref()
            .unwrap_or(&self.api_base_url)
    }

    /// Save config to the data directory, preserving keys we don't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let mut settings = read_settings(data_dir)?;

        settings.api_base_url = Some(self.api_base_url.clone());
        settings.router = self.router.clone();
        settings.logging = self.logging.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Check the values that would otherwise fail later at first use
    pub fn validate(&self) -> Result<()> {
        for raw in std::iter::once(&self.api_base_url).chain(&self.api_base_url_override) {
            let url = url::Url::parse(raw)
                .map_err(|e| Error::config(format!("invalid API URL '{}': {}", raw, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!("API URL must use http or https: {}", raw)));
            }
        }
        for (name, route) in [
            ("landing route", &self.router.landing_route),
            ("login route", &self.router.login_route),
        ] {
            if !route.starts_with('/') {
                return Err(Error::config(format!("{} must start with '/': {}", name, route)));
            }
        }
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings file");
        SettingsFile::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.router.landing_route, "/dashboard");
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_preserves_foreign_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme":"dark","router":{"landingRoute":"/users"}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        assert_eq!(config.router.landing_route, "/users");
        assert_eq!(config.router.login_route, "/login");

        config.api_base_url = "https://phones.example.com/api".to_string();
        config.save(dir.path()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["apiBaseUrl"], "https://phones.example.com/api");
        assert_eq!(raw["router"]["landingRoute"], "/users");
    }

    #[test]
    fn test_unparseable_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{{{").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.router, RouterConfig::default());
    }

    #[test]
    fn test_override_is_used_but_never_saved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"apiBaseUrl":"https://phones.example.com/api"}"#,
        )
        .unwrap();

        let mut config =
            Config::load_with_override(dir.path(), Some("http://127.0.0.1:9999/mock".to_string())).unwrap();
        assert_eq!(config.effective_api_base_url(), "http://127.0.0.1:9999/mock");
        assert_eq!(config.api_base_url, "https://phones.example.com/api");

        config.router.landing_route = "/users".to_string();
        config.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(!raw.contains("9999"));
        let reloaded = Config::load_with_override(dir.path(), None).unwrap();
        assert_eq!(reloaded.effective_api_base_url(), "https://phones.example.com/api");
        assert_eq!(reloaded.router.landing_route, "/users");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_with_override(dir.path(), Some("  ".to_string())).unwrap();
        assert_eq!(config.api_base_url_override, None);
        assert_eq!(config.effective_api_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            api_base_url: "localhost:8080".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.router.landing_route = "dashboard".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("landing route"));

        let config = Config {
            api_base_url_override: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
