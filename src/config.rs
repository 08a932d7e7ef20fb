//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat server location
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host (and optional port) the WebSocket endpoints resolve against
    #[serde(default = "default_host")]
    pub host: String,

    /// Use wss:// and https://
    #[serde(default)]
    pub tls: bool,

    /// CSRF token sent with uploads, when the server requires one
    pub csrf_token: Option<String>,
}

fn default_host() -> String {
    "localhost:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            tls: false,
            csrf_token: None,
        }
    }
}

impl ServerConfig {
    /// HTTP base URL for the upload endpoint
    pub fn http_base(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}", scheme, self.host)
    }
}

/// Session timing knobs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Fixed delay before a reconnect attempt (ms)
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    /// Quiet period after which typing stops (ms)
    #[serde(default = "default_typing_idle")]
    pub typing_idle_ms: u64,
}

fn default_reconnect_delay() -> u64 {
    3000
}

fn default_typing_idle() -> u64 {
    2000
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay(),
            typing_idle_ms: default_typing_idle(),
        }
    }
}

impl SessionSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("palaver").join("config.toml")),
            Some(PathBuf::from("/etc/palaver/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("PALAVER_HOST") {
            self.server.host = host;
        }
        if let Ok(tls) = std::env::var("PALAVER_TLS") {
            if let Ok(t) = tls.parse() {
                self.server.tls = t;
            }
        }
        if let Ok(token) = std::env::var("PALAVER_CSRF_TOKEN") {
            self.server.csrf_token = Some(token);
        }

        if let Ok(delay) = std::env::var("PALAVER_RECONNECT_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                self.session.reconnect_delay_ms = d;
            }
        }
        if let Ok(idle) = std::env::var("PALAVER_TYPING_IDLE_MS") {
            if let Ok(i) = idle.parse() {
                self.session.typing_idle_ms = i;
            }
        }

        if let Ok(level) = std::env::var("PALAVER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PALAVER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Palaver Configuration
#
# Environment variables override these settings:
# - PALAVER_HOST
# - PALAVER_TLS
# - PALAVER_CSRF_TOKEN
# - PALAVER_RECONNECT_DELAY_MS
# - PALAVER_TYPING_IDLE_MS
# - PALAVER_LOG_LEVEL
# - PALAVER_LOG_FORMAT

[server]
# Chat server host (and port)
host = "localhost:8000"

# Use wss:// and https://
tls = false

# CSRF token for the upload endpoint
# csrf_token = ""

[session]
# Fixed delay before reconnecting after an unexpected close (ms)
reconnect_delay_ms = 3000

# Quiet period after which a typing-stopped event is sent (ms)
typing_idle_ms = 2000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/palaver/palaver.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "localhost:8000");
        assert!(!config.server.tls);
        assert_eq!(config.session.reconnect_delay(), Duration::from_secs(3));
        assert_eq!(config.session.typing_idle(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_http_base() {
        let mut server = ServerConfig::default();
        assert_eq!(server.http_base(), "http://localhost:8000");
        server.tls = true;
        server.host = "chat.example.com".to_string();
        assert_eq!(server.http_base(), "https://chat.example.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
host = "chat.example.com"
tls = true

[session]
reconnect_delay_ms = 500
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.host, "chat.example.com");
        assert!(config.server.tls);
        assert_eq!(config.session.reconnect_delay_ms, 500);
        // Unset sections keep their defaults
        assert_eq!(config.session.typing_idle_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not toml at all [").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.session.reconnect_delay_ms, 3000);
        assert_eq!(config.server.host, "localhost:8000");
    }
}
