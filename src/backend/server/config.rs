/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration.
 *
 * # Configuration Sources
 *
 * Values are layered, later sources overriding earlier ones:
 *
 * 1. Built-in defaults suitable for local development
 * 2. A TOML file: the path in `TAPSPOT_CONFIG`, or `tapspot.toml` in the
 *    working directory if it exists
 * 3. Environment variables (a `.env` file is loaded by the binary)
 *
 * # Environment Variables
 *
 * | Variable              | Field                        |
 * |-----------------------|------------------------------|
 * | `SERVER_HOST`         | `server.host`                |
 * | `SERVER_PORT`         | `server.port`                |
 * | `DATABASE_URL`        | `database.url`               |
 * | `JWT_SECRET`          | `auth.jwt_secret`            |
 * | `WS_SEND_BUFFER`      | `hub.send_buffer`            |
 * | `WS_READ_TIMEOUT_MS`  | `session.read_timeout_ms`    |
 * | `WS_PING_PERIOD_MS`   | `session.ping_period_ms`     |
 * | `WS_WRITE_TIMEOUT_MS` | `session.write_timeout_ms`   |
 * | `WS_MAX_FRAME_BYTES`  | `session.max_frame_bytes`    |
 */

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when `TAPSPOT_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "tapspot.toml";

const DEV_JWT_SECRET: &str = "tapspot-dev-secret-change-me";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL; the file is created if missing
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tapspot.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: u64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Hub channel sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Capacity of each connection's outbound queue; a full queue evicts the connection
    pub send_buffer: usize,
    /// Capacity of the hub's command queue
    pub command_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_buffer: 256,
            command_buffer: 1024,
        }
    }
}

/// Per-connection limits and timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_frame_bytes: usize,
    /// Connection is dropped when nothing arrives for this long
    pub read_timeout_ms: u64,
    /// Heartbeat interval, must be shorter than `read_timeout_ms`
    pub ping_period_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: 512 * 1024,
            read_timeout_ms: 60_000,
            ping_period_ms: 54_000,
            write_timeout_ms: 10_000,
        }
    }
}

impl SessionConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn ping_period(&self) -> Duration {
        Duration::from_millis(self.ping_period_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub hub: HubConfig,
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from defaults, the optional TOML file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("TAPSPOT_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_env()?;

        if config.auth.jwt_secret == DEV_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set, using the development secret");
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing sections and fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("SERVER_PORT")? {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(send_buffer) = env_parse("WS_SEND_BUFFER")? {
            self.hub.send_buffer = send_buffer;
        }
        if let Some(read_timeout) = env_parse("WS_READ_TIMEOUT_MS")? {
            self.session.read_timeout_ms = read_timeout;
        }
        if let Some(ping_period) = env_parse("WS_PING_PERIOD_MS")? {
            self.session.ping_period_ms = ping_period;
        }
        if let Some(write_timeout) = env_parse("WS_WRITE_TIMEOUT_MS")? {
            self.session.write_timeout_ms = write_timeout;
        }
        if let Some(max_frame) = env_parse("WS_MAX_FRAME_BYTES")? {
            self.session.max_frame_bytes = max_frame;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::Invalid("auth.bcrypt_cost must be between 4 and 31".into()));
        }
        if self.hub.send_buffer == 0 || self.hub.command_buffer == 0 {
            return Err(ConfigError::Invalid("hub buffers must be greater than zero".into()));
        }
        if self.session.max_frame_bytes == 0 {
            return Err(ConfigError::Invalid("session.max_frame_bytes must be greater than zero".into()));
        }
        if self.session.ping_period_ms == 0
            || self.session.ping_period_ms >= self.session.read_timeout_ms
        {
            return Err(ConfigError::Invalid(format!(
                "session.ping_period_ms ({}) must be non-zero and shorter than session.read_timeout_ms ({})",
                self.session.ping_period_ms, self.session.read_timeout_ms
            )));
        }
        if self.session.write_timeout_ms == 0 {
            return Err(ConfigError::Invalid("session.write_timeout_ms must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hub.send_buffer, 256);
        assert_eq!(config.session.ping_period(), Duration::from_secs(54));
        assert_eq!(config.session.read_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_ping_period_must_be_shorter_than_read_timeout() {
        let mut config = ServerConfig::default();
        config.session.ping_period_ms = config.session.read_timeout_ms;
        assert_matches!(config.validate(), Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_send_buffer_rejected() {
        let mut config = ServerConfig::default();
        config.hub.send_buffer = 0;
        assert_matches!(config.validate(), Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[hub]\nsend_buffer = 8\n\n[session]\nread_timeout_ms = 500\nping_period_ms = 200"
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.hub.send_buffer, 8);
        assert_eq!(config.hub.command_buffer, 1024);
        assert_eq!(config.session.read_timeout_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert_matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("SERVER_PORT", "7000");
        std::env::set_var("WS_SEND_BUFFER", "4");
        let mut config = ServerConfig::default();
        let result = config.apply_env();
        std::env::remove_var("SERVER_PORT");
        std::env::remove_var("WS_SEND_BUFFER");

        assert!(result.is_ok());
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.hub.send_buffer, 4);
    }

    #[test]
    #[serial]
    fn test_env_invalid_number() {
        std::env::set_var("WS_READ_TIMEOUT_MS", "soon");
        let mut config = ServerConfig::default();
        let result = config.apply_env();
        std::env::remove_var("WS_READ_TIMEOUT_MS");

        assert_matches!(
            result,
            Err(ConfigError::InvalidValue { key: "WS_READ_TIMEOUT_MS", .. })
        );
    }
}
