use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "WSFRONT_CONFIG";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. WSFRONT_CONFIG environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.wsfront/config.toml (fallback for systems without XDG)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("wsfront").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".wsfront").join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    pub interval_secs: u64,
    /// A periodic heartbeat is only sent if the user was active this recently.
    pub activity_window_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            activity_window_secs: 30,
        }
    }
}

impl HeartbeatConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn activity_window(&self) -> Duration {
        Duration::from_secs(self.activity_window_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub event_name: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            event_name: wsfront_types::STATUS_RENDERED_EVENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Where the page navigates when a stopped workspace restarts.
    pub restart_url: String,
    /// Upper bound for the one-shot readiness signals; 0 waits forever.
    pub readiness_timeout_secs: u64,
    pub heartbeat: HeartbeatConfig,
    pub analytics: AnalyticsConfig,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            restart_url: "/start/".to_string(),
            readiness_timeout_secs: 300,
            heartbeat: HeartbeatConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl FrontendConfig {
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let config_path = resolve_config_path(explicit_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: FrontendConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.restart_url.trim().is_empty() {
            return Err(Error::Config("restart_url must not be empty".to_string()));
        }
        if self.analytics.event_name.trim().is_empty() {
            return Err(Error::Config(
                "analytics.event_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn readiness_timeout(&self) -> Option<Duration> {
        (self.readiness_timeout_secs > 0).then(|| Duration::from_secs(self.readiness_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = FrontendConfig::default();
        assert_eq!(config.restart_url, "/start/");
        assert_eq!(config.heartbeat.interval(), Duration::from_secs(30));
        assert_eq!(config.readiness_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.analytics.event_name, "status_rendered");
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = FrontendConfig::default();
        config.restart_url = "https://example.org/start/#ws-1".to_string();
        config.heartbeat.interval_secs = 10;

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = FrontendConfig::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "readiness_timeout_secs = 0\n[heartbeat]\nactivity_window_secs = 5\n",
        )?;

        let loaded = FrontendConfig::load_from(&config_path)?;
        assert_eq!(loaded.readiness_timeout(), None);
        assert_eq!(loaded.heartbeat.activity_window(), Duration::from_secs(5));
        assert_eq!(loaded.heartbeat.interval_secs, 30);
        assert_eq!(loaded.restart_url, "/start/");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = FrontendConfig::load_from(&config_path)?;
        assert_eq!(config, FrontendConfig::default());

        Ok(())
    }

    #[test]
    fn test_empty_restart_url_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "restart_url = \"  \"\n")?;

        let err = FrontendConfig::load_from(&config_path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let path = resolve_config_path(Some("/etc/wsfront.toml"))?;
        assert_eq!(path, PathBuf::from("/etc/wsfront.toml"));
        Ok(())
    }
}
