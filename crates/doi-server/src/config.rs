//! Server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use doi_resolver::crossref::{CROSSREF_BASE_URL, DEFAULT_MAILTO};
use doi_resolver::{CrossrefConfig, DEFAULT_LEASE_DURATION};
use doi_store::store::DEFAULT_BASE_URI;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection URL. Unset selects the in-memory repository.
    pub database_url: Option<String>,
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// How long an admission lease keeps a DOI claimed.
    pub lease_duration: Duration,
    /// Registry base URL.
    pub crossref_base_url: String,
    /// Contact address sent to the registry.
    pub crossref_mailto: String,
    /// Prefix of journal ids as stored in the repository.
    pub repository_base_uri: String,
    /// Prefix of journal ids as returned to callers.
    pub public_base_uri: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 3000,
            log_level: "info".to_string(),
            cors_allowed_origins: "*".to_string(),
            lease_duration: DEFAULT_LEASE_DURATION,
            crossref_base_url: CROSSREF_BASE_URL.to_string(),
            crossref_mailto: DEFAULT_MAILTO.to_string(),
            repository_base_uri: DEFAULT_BASE_URI.to_string(),
            public_base_uri: DEFAULT_BASE_URI.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `DATABASE_URL`: Database connection string (default: in-memory repository)
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `LEASE_DURATION_MS`: Admission lease duration (default: 30000, must be > 0)
    /// - `CROSSREF_BASE_URL`: Registry base URL (default: "https://api.crossref.org")
    /// - `CROSSREF_MAILTO`: Registry contact (default: "pass@jhu.edu")
    /// - `REPOSITORY_BASE_URI`: Internal journal id prefix
    /// - `PUBLIC_BASE_URI`: External journal id prefix (default: `REPOSITORY_BASE_URI`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or(defaults.cors_allowed_origins);

        let lease_duration = match parse_var::<u64, _>(&lookup, "LEASE_DURATION_MS")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    name: "LEASE_DURATION_MS".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.lease_duration,
        };

        let crossref_base_url = lookup("CROSSREF_BASE_URL").unwrap_or(defaults.crossref_base_url);
        let crossref_mailto = lookup("CROSSREF_MAILTO").unwrap_or(defaults.crossref_mailto);

        let repository_base_uri =
            lookup("REPOSITORY_BASE_URI").unwrap_or(defaults.repository_base_uri);
        let public_base_uri =
            lookup("PUBLIC_BASE_URI").unwrap_or_else(|| repository_base_uri.clone());

        Ok(Self {
            database_url,
            port,
            log_level,
            cors_allowed_origins,
            lease_duration,
            crossref_base_url,
            crossref_mailto,
            repository_base_uri,
            public_base_uri,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Registry client settings.
    pub fn crossref(&self) -> CrossrefConfig {
        CrossrefConfig {
            base_url: self.crossref_base_url.clone(),
            mailto: self.crossref_mailto.clone(),
            ..CrossrefConfig::default()
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
