//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::duration::resolve_poll_interval;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// IRC server to connect to.
    pub server: ServerConfig,
    /// Bot identity, channels and tracked peers.
    pub bot: BotConfig,
    /// Email notification settings. Absent means notifications are only logged.
    pub notify: Option<NotifyConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// IRC server address.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address (e.g., "irc.undernet.org").
    pub host: String,
    /// Plaintext IRC port (usually 6667).
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` form accepted by `TcpStream::connect`.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Bot behaviour configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Base nickname. Decorated with `_` when the server reports a collision.
    pub nick: String,
    /// Channels joined once the server reports the connection ready.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Nicknames whose presence is tracked.
    #[serde(default)]
    pub peers: Vec<String>,
    /// How often to poll presence, as a duration string (default: 5m).
    #[serde(default)]
    pub poll_interval: Option<String>,
}

impl BotConfig {
    /// Effective poll interval, falling back to the default when the
    /// configured value is missing or unparseable.
    pub fn poll_interval(&self) -> Duration {
        resolve_poll_interval(self.poll_interval.as_deref())
    }
}

/// Email notification configuration (Amazon SES).
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Sender address (must be verified with SES).
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// AWS region hosting the SES endpoint.
    #[serde(default = "default_region")]
    pub region: String,
    /// Override for the SES endpoint URL (VPC endpoints, local mocks).
    #[serde(default)]
    pub endpoint: Option<String>,
}

pub(super) fn default_region() -> String {
    "us-east-1".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r##"
[server]
host = "irc.example.net"
port = 6667

[bot]
nick = "notifybot"
channels = ["#friends", "#ops"]
peers = ["alice", "bob"]
poll_interval = "90s"

[notify]
from = "bot@example.com"
to = "me@example.com"
"##;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(FULL).unwrap();
        assert_eq!(config.server.address(), "irc.example.net:6667");
        assert_eq!(config.bot.channels, vec!["#friends", "#ops"]);
        assert_eq!(config.bot.peers, vec!["alice", "bob"]);
        assert_eq!(config.bot.poll_interval(), Duration::from_secs(90));

        let notify = config.notify.unwrap();
        assert_eq!(notify.region, "us-east-1");
        assert!(notify.endpoint.is_none());
    }

    #[test]
    fn test_optional_sections_default() {
        let config: Config = toml::from_str(
            r#"
[server]
host = "127.0.0.1"
port = 6667

[bot]
nick = "bot"
peers = ["alice"]
"#,
        )
        .unwrap();
        assert!(config.notify.is_none());
        assert!(config.bot.channels.is_empty());
        assert_eq!(config.bot.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_ipv6_address_is_bracketed() {
        let server = ServerConfig {
            host: "::1".to_string(),
            port: 6667,
        };
        assert_eq!(server.address(), "[::1]:6667");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.bot.nick, "notifybot");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Config::load("/nonexistent/notifybot.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server\nhost = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
