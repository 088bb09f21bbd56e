use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the answer service
    pub base_url: String,

    /// Optional request timeout in seconds. None relies on whatever the
    /// network stack and server enforce.
    pub request_timeout_secs: Option<u64>,

    /// askr home directory
    pub askr_home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: String,
    pub show_usage_counter: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            show_usage_counter: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        Config {
            base_url: "http://127.0.0.1:8080".to_string(),
            request_timeout_secs: None,
            askr_home: home.join(".askr"),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from ~/.askr/config.toml, falling back to
    /// defaults when the file is missing. `ASKR_BASE_URL` overrides the
    /// configured endpoint.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let askr_home = home.join(".askr");
        let config_path = askr_home.join("config.toml");

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.askr_home = askr_home;

        if let Ok(base_url) = std::env::var("ASKR_BASE_URL") {
            config.base_url = base_url;
        }

        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.askr_home)
            .context("Failed to create .askr directory")?;
        let config_path = self.askr_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        self.askr_home.join("store.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.askr_home.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.request_timeout_secs, None);
        assert!(config.ui.show_usage_counter);
    }

    #[test]
    fn partial_config_file_fills_in_defaults() {
        let config: Config = toml::from_str("base_url = \"https://chat.example.org\"").unwrap();
        assert_eq!(config.base_url, "https://chat.example.org");
        assert_eq!(config.ui.theme, "dark");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.ui.theme, config.ui.theme);
    }
}
