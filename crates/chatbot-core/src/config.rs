use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use tracing::warn;

/// Where `chatbot-server` listens by default.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/chat";

/// Environment variable overriding the configured endpoint.
pub const ENDPOINT_ENV: &str = "CHATBOT_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn save_endpoint(endpoint: &str) -> Result<()> {
        Self::save_endpoint_to(&Self::config_path()?, endpoint)
    }

    /// Store `endpoint` in the file at `path`, keeping its other settings.
    /// An unreadable file is replaced.
    pub fn save_endpoint_to(path: &Path, endpoint: &str) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "config file unreadable, replacing it");
            Self::new()
        });
        config.endpoint = Some(endpoint.to_string());
        config.save_to(path)
    }

    /// Endpoint to use: command line, then environment, then this file.
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        let from_env = std::env::var(ENDPOINT_ENV).ok();
        choose_endpoint(flag, from_env.as_deref(), self.endpoint.as_deref())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatbot"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("chatbot.log"))
    }
}

fn choose_endpoint(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_ENDPOINT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: Some("http://localhost:8080/chat".to_string()),
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_endpoint_precedence() {
        assert_eq!(choose_endpoint(None, None, None), DEFAULT_ENDPOINT);
        assert_eq!(choose_endpoint(None, None, Some("http://file")), "http://file");
        assert_eq!(choose_endpoint(None, Some("http://env"), Some("http://file")), "http://env");
        assert_eq!(
            choose_endpoint(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
    }

    #[test]
    fn test_blank_endpoint_falls_through() {
        assert_eq!(choose_endpoint(Some("  "), Some(""), None), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_save_endpoint_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chatbot").join("config.json");

        Config::save_endpoint_to(&path, "http://localhost:8080/chat").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8080/chat"));
    }

    #[test]
    #[traced_test]
    fn test_save_endpoint_over_malformed_file_warns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"endpoint\": ").unwrap();

        Config::save_endpoint_to(&path, "http://localhost:8080/chat").unwrap();

        assert!(logs_contain("config file unreadable, replacing it"));
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8080/chat"));
    }
}
