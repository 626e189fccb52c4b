use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::radio::DEFAULT_WAIT_RADIO_ON;
use crate::register::DEFAULT_SERVER_URL;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registration: RegistrationConfig,
    pub telephony: TelephonyConfig,
    pub radio: RadioConfig,
    pub broadcast: BroadcastConfig,
    pub connectivity: ConnectivityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub server_url: String,
    pub timeout_secs: u64,
    /// Used when `register` is run without `--asset-tag`
    pub asset_tag: Option<String>,
    /// Used when `register` is run without `--group-name`
    pub group_name: Option<String>,
}

/// Identifiers a handset would report through its telephony service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelephonyConfig {
    pub device_id: Option<String>,
    pub sim_id: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Address of the radio-control listener
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub sysfs_net_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        config.radio.validate()?;
        Ok(config)
    }
}

impl RegistrationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RadioConfig {
    /// A zero poll interval would turn the radio wait into a busy loop
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("[radio] poll_interval_ms must be greater than 0");
        }
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: 30,
            asset_tag: None,
            group_name: None,
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: DEFAULT_WAIT_RADIO_ON.as_millis() as u64,
            poll_interval_ms: 500,
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1:7370".to_string(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            sysfs_net_dir: PathBuf::from("/sys/class/net"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.registration.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.radio.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.radio.wait_timeout(), DEFAULT_WAIT_RADIO_ON);
        assert_eq!(config.broadcast.target, "127.0.0.1:7370");
        assert_eq!(config.logging.level, "info");
        assert!(config.telephony.device_id.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [registration]
            server_url = "http://localhost:9000/register/"
            group_name = "clinic-north"

            [telephony]
            device_id = "356938035643809"
            phone_number = "+15555550100"

            [radio]
            wait_timeout_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(
            config.registration.server_url,
            "http://localhost:9000/register/"
        );
        assert_eq!(config.registration.timeout(), Duration::from_secs(30));
        assert_eq!(config.registration.group_name.as_deref(), Some("clinic-north"));
        assert!(config.registration.asset_tag.is_none());
        assert_eq!(config.telephony.device_id.as_deref(), Some("356938035643809"));
        assert!(config.telephony.sim_id.is_none());
        assert_eq!(config.radio.wait_timeout(), Duration::from_secs(5));
        assert_eq!(config.radio.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[radio]\npoll_interval_ms = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[radio]\npoll_interval_ms = 250\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.radio.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Config::load(Path::new("/nonexistent/cens-updater.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
