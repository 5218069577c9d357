use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use wealthlist_db::PoolSettings;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment; selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Local,
    Dev,
    Prod,
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err("expected one of: local, dev, prod".to_string()),
        }
    }
}

/// Complete service configuration, built once at startup and handed to
/// each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
    pub photos: PhotoConfig,
    pub spreadsheet: SpreadsheetConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

/// PostgreSQL connection and pool settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    /// Server-side `statement_timeout` applied to every connection.
    pub statement_timeout_ms: u64,
}

/// Outbound mail settings for the feedback form.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub timeout_secs: u64,
}

/// Where photos live and how large an upload may be.
#[derive(Debug, Clone)]
pub struct PhotoConfig {
    /// Directory on disk; also the prefix of stored photo paths.
    pub dir: String,
    pub max_upload_bytes: usize,
}

/// Identifiers for the spreadsheet export. Carried but optional.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetConfig {
    pub spreadsheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub credentials_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `APP_ENV`                 | `local`                 |
    /// | `SERVER_HOST`             | `0.0.0.0`               |
    /// | `SERVER_PORT`             | `8080`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `DATABASE_URL`            | (unset)                 |
    /// | `DB_HOST`                 | `localhost`             |
    /// | `DB_PORT`                 | `5432`                  |
    /// | `DB_USER`                 | `postgres`              |
    /// | `DB_PASSWORD`             | (empty)                 |
    /// | `DB_NAME`                 | `millionaire`           |
    /// | `DB_MAX_CONNECTIONS`      | `25`                    |
    /// | `DB_MIN_CONNECTIONS`      | `5`                     |
    /// | `DB_MAX_LIFETIME_SECS`    | `300`                   |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `10`                    |
    /// | `DB_STATEMENT_TIMEOUT_MS` | `5000`                  |
    /// | `MAIL_HOST`               | `smtp.gmail.com`        |
    /// | `MAIL_PORT`               | `587`                   |
    /// | `MAIL_USER`               | (empty)                 |
    /// | `MAIL_PASSWORD`           | (empty)                 |
    /// | `MAIL_FROM`               | (empty)                 |
    /// | `MAIL_TO`                 | (empty)                 |
    /// | `MAIL_TIMEOUT_SECS`       | `15`                    |
    /// | `PHOTO_DIR`               | `uploads/photos`        |
    /// | `MAX_UPLOAD_BYTES`        | `10485760`              |
    /// | `GOOGLE_SPREADSHEET_ID`   | (unset)                 |
    /// | `GOOGLE_SHEET_NAME`       | (unset)                 |
    /// | `GOOGLE_CREDENTIALS_PATH` | (unset)                 |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = parse(&lookup, "APP_ENV", AppEnv::Local)?;

        let server = ServerConfig {
            host: string(&lookup, "SERVER_HOST", "0.0.0.0"),
            port: parse(&lookup, "SERVER_PORT", 8080)?,
            cors_origins: string(&lookup, "CORS_ORIGINS", "http://localhost:5173")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            request_timeout_secs: parse(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
        };

        let database = DatabaseConfig {
            url: optional(&lookup, "DATABASE_URL"),
            host: string(&lookup, "DB_HOST", "localhost"),
            port: parse(&lookup, "DB_PORT", 5432)?,
            user: string(&lookup, "DB_USER", "postgres"),
            password: string(&lookup, "DB_PASSWORD", ""),
            name: string(&lookup, "DB_NAME", "millionaire"),
            max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 25)?,
            min_connections: parse(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            max_lifetime_secs: parse(&lookup, "DB_MAX_LIFETIME_SECS", 300)?,
            acquire_timeout_secs: parse(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            statement_timeout_ms: parse(&lookup, "DB_STATEMENT_TIMEOUT_MS", 5000)?,
        };

        let smtp = SmtpConfig {
            host: string(&lookup, "MAIL_HOST", "smtp.gmail.com"),
            port: parse(&lookup, "MAIL_PORT", 587)?,
            username: string(&lookup, "MAIL_USER", ""),
            password: string(&lookup, "MAIL_PASSWORD", ""),
            from: string(&lookup, "MAIL_FROM", ""),
            to: string(&lookup, "MAIL_TO", ""),
            timeout_secs: parse(&lookup, "MAIL_TIMEOUT_SECS", 15)?,
        };

        let photos = PhotoConfig {
            dir: string(&lookup, "PHOTO_DIR", "uploads/photos"),
            max_upload_bytes: parse(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        };

        let spreadsheet = SpreadsheetConfig {
            spreadsheet_id: optional(&lookup, "GOOGLE_SPREADSHEET_ID"),
            sheet_name: optional(&lookup, "GOOGLE_SHEET_NAME"),
            credentials_path: optional(&lookup, "GOOGLE_CREDENTIALS_PATH"),
        };

        Ok(Self {
            env,
            server,
            database,
            smtp,
            photos,
            spreadsheet,
        })
    }
}

impl DatabaseConfig {
    /// Connection options for the pool, with the statement timeout applied.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name),
        };
        Ok(options.options([("statement_timeout", self.statement_timeout_ms.to_string())]))
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            max_lifetime: Duration::from_secs(self.max_lifetime_secs),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Secrets are never written to logs.
const REDACTED: &str = "***";

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| REDACTED))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn string<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}
