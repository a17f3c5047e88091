//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `estatefeed.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Home feed presentation.
    pub feed: FeedConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Home feed settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Name greeted in the feed header.
    pub viewer_name: Option<String>,
    /// Insert the demo catalog when the database is empty.
    pub seed_demo: bool,
    /// Longest a page render waits for the feed requests, in milliseconds.
    pub render_timeout_ms: u64,
    /// Reload interval of pages rendered while still loading, in seconds.
    pub refresh_seconds: u32,
    /// Upper bound on concurrently open feed sessions.
    pub max_sessions: usize,
    /// Seconds a feed session may go without requests or an attached stream
    /// before it is evicted.
    pub session_idle_secs: u64,
}

impl Config {
    /// Load configuration from `estatefeed.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("estatefeed.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ESTATEFEED_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("ESTATEFEED_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("ESTATEFEED_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("ESTATEFEED_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("ESTATEFEED_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("ESTATEFEED_VIEWER_NAME") {
            self.feed.viewer_name = Some(val).filter(|name| !name.trim().is_empty());
        }
        if let Some(seed) = var("ESTATEFEED_SEED_DEMO").and_then(|val| val.parse().ok()) {
            self.feed.seed_demo = seed;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.feed.refresh_seconds == 0 {
            return Err(ConfigError::Validation(
                "feed.refresh_seconds must be non-zero".to_string(),
            ));
        }
        if self.feed.max_sessions == 0 {
            return Err(ConfigError::Validation(
                "feed.max_sessions must be non-zero".to_string(),
            ));
        }
        if self.feed.session_idle_secs == 0 {
            return Err(ConfigError::Validation(
                "feed.session_idle_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl FeedConfig {
    #[must_use]
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:estatefeed.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "estatefeedd=info,estatefeed=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            viewer_name: None,
            seed_demo: true,
            render_timeout_ms: 2_000,
            refresh_seconds: 2,
            max_sessions: 1024,
            session_idle_secs: 300,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
