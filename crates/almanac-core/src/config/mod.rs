use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Which store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_hours: u32,
    pub allow_registration: bool,
    pub secure_cookie: bool,
}

impl AuthConfig {
    /// ## Summary
    /// Lifetime of a freshly issued session.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(i64::from(self.session_ttl_hours))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the address the server binds to, in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            format!("http://{}", self.bind_addr())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Configuration builder pre-populated with every default value.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be registered.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.url", "postgres://localhost/almanac")?
            .set_default("database.max_connections", 4)?
            .set_default("database.backend", "postgres")?
            .set_default("auth.session_ttl_hours", 336)?
            .set_default("auth.allow_registration", true)?
            .set_default("auth.secure_cookie", false)?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Loads configuration from environment variables and `config.toml` into a `Settings`.
    /// Environment variables take precedence over the TOML file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env file and process environment, e.g. `DATABASE__URL`
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or does not deserialize.
    pub fn from_toml(document: &str) -> Result<Self> {
        Ok(Self::defaults()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
