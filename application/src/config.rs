//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::postgres;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    pub server: Server,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Loads a new [`Config`] from the file at the provided `path` (if it
    /// exists), overridden with the `CONF.`-prefixed environment variables.
    ///
    /// Missing fields have their default values.
    ///
    /// # Errors
    ///
    /// If the file or the environment variables contain invalid values.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Name of the database to connect to.
    #[default("erp".to_owned())]
    pub dbname: String,

    /// Connection pool configuration.
    pub pool: Pool,
}

/// Postgres connection pool configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Pool {
    /// Maximum number of open connections.
    #[default(16)]
    pub max_size: usize,

    /// Time to wait for a free connection before giving up.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub wait_timeout: time::Duration,
}

impl From<Postgres> for postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            pool: Pool {
                max_size,
                wait_timeout,
            },
        } = value;

        let mut pool = postgres::PoolConfig::new(max_size);
        pool.timeouts.wait = Some(wait_timeout);
        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            pool: Some(pool),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Maximum level of the emitted log entries.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Very verbose tracing, including every SQL statement.
    Trace,

    /// Debugging details.
    Debug,

    /// Regular operational messages.
    #[default]
    Info,

    /// Recoverable problems.
    Warn,

    /// Failures.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time;

    use super::{Config, Postgres};

    #[test]
    fn defaults_without_file() {
        let config = Config::new("definitely-missing.toml").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors.origins, ["*"]);
        assert_eq!(config.postgres.pool.max_size, 16);
        assert_eq!(
            config.postgres.pool.wait_timeout,
            time::Duration::from_secs(5),
        );
    }

    #[test]
    fn configures_pool() {
        let pg = service::infra::postgres::Config::from(Postgres::default());

        let pool = pg.pool.unwrap();
        assert_eq!(pool.max_size, 16);
        assert_eq!(pool.timeouts.wait, Some(time::Duration::from_secs(5)));
        assert_eq!(pg.dbname.as_deref(), Some("erp"));
    }
}
