use std::time::Duration;

use captionary_core::cache::MAX_TTL;

use crate::auth::session::MAX_TTL_HOURS;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Where entities are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Session cookie signing and lifetime.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 key used to sign session cookies.
    pub secret: String,
    /// Session lifetime in hours (default: 24, at most one year).
    pub ttl_hours: i64,
}

/// Server configuration loaded from environment variables.
///
/// Everything except `SESSION_SECRET` (and `DATABASE_URL` for the postgres
/// backend) has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub storage: StorageBackend,
    pub session: SessionConfig,
    /// Read cache TTL in seconds (default: 5 hours, at most 24 hours).
    pub cache_ttl_secs: u64,
    /// Minimum password length accepted at registration (default: `8`).
    pub password_min_length: usize,
    /// Directory served under `/static` (default: `static`).
    pub static_dir: String,
    pub log_format: LogFormat,
}

const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60 * 60;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                   |
    /// |----------------------------|---------------------------|
    /// | `HOST`                     | `0.0.0.0`                 |
    /// | `PORT`                     | `3000`                    |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`   |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                      |
    /// | `STORAGE_BACKEND`          | `postgres`                |
    /// | `DATABASE_URL`             | required for postgres     |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                      |
    /// | `SESSION_SECRET`           | required                  |
    /// | `SESSION_TTL_HOURS`        | `24`                      |
    /// | `CACHE_TTL_SECS`           | `18000`                   |
    /// | `PASSWORD_MIN_LENGTH`      | `8`                       |
    /// | `STATIC_DIR`               | `static`                  |
    /// | `LOG_FORMAT`               | `pretty`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let host = var("HOST", "0.0.0.0");
        let port: u16 = parse("PORT", &var("PORT", "3000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 =
            parse("REQUEST_TIMEOUT_SECS", &var("REQUEST_TIMEOUT_SECS", "30"))?;

        let storage = match var("STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse(
                    "DATABASE_MAX_CONNECTIONS",
                    &var("DATABASE_MAX_CONNECTIONS", "10"),
                )?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    reason: format!("unknown backend '{other}' (expected postgres or memory)"),
                })
            }
        };

        let secret = lookup("SESSION_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        let ttl_hours: i64 = parse(
            "SESSION_TTL_HOURS",
            &var("SESSION_TTL_HOURS", &DEFAULT_SESSION_TTL_HOURS.to_string()),
        )?;
        if !(1..=MAX_TTL_HOURS).contains(&ttl_hours) {
            return Err(ConfigError::Invalid {
                var: "SESSION_TTL_HOURS",
                reason: format!("must be between 1 and {MAX_TTL_HOURS}"),
            });
        }

        let cache_ttl_secs: u64 = parse(
            "CACHE_TTL_SECS",
            &var("CACHE_TTL_SECS", &DEFAULT_CACHE_TTL_SECS.to_string()),
        )?;
        let max_cache_ttl_secs = MAX_TTL.as_secs();
        if !(1..=max_cache_ttl_secs).contains(&cache_ttl_secs) {
            return Err(ConfigError::Invalid {
                var: "CACHE_TTL_SECS",
                reason: format!("must be between 1 and {max_cache_ttl_secs}"),
            });
        }
        let password_min_length: usize =
            parse("PASSWORD_MIN_LENGTH", &var("PASSWORD_MIN_LENGTH", "8"))?;

        let log_format = match var("LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    reason: format!("unknown format '{other}' (expected pretty or json)"),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            session: SessionConfig { secret, ttl_hours },
            cache_ttl_secs,
            password_min_length,
            static_dir: var("STATIC_DIR", "static"),
            log_format,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_memory_backend() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("SESSION_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.cache_ttl(), Duration::from_secs(18_000));
        assert_eq!(config.password_min_length, 8);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let result = ServerConfig::from_lookup(lookup(&[("SESSION_SECRET", "s3cret")]));
        assert_matches!(result, Err(ConfigError::Missing("DATABASE_URL")));

        let config = ServerConfig::from_lookup(lookup(&[
            ("SESSION_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/captionary"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/captionary".into(),
                max_connections: 4,
            }
        );
    }

    #[test]
    fn session_secret_is_required() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("SESSION_SECRET", ""),
        ]));
        assert_matches!(result, Err(ConfigError::Missing("SESSION_SECRET")));
    }

    #[test]
    fn invalid_values_are_reported() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("SESSION_SECRET", "s3cret"),
            ("PORT", "not-a-port"),
        ]));
        assert_matches!(result, Err(ConfigError::Invalid { var: "PORT", .. }));

        let result = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "sqlite"),
            ("SESSION_SECRET", "s3cret"),
        ]));
        assert_matches!(result, Err(ConfigError::Invalid { var: "STORAGE_BACKEND", .. }));
    }

    #[test]
    fn ttls_outside_their_range_are_rejected() {
        for (var, value) in [
            ("CACHE_TTL_SECS", "18446744073709551615"),
            ("CACHE_TTL_SECS", "86401"),
            ("CACHE_TTL_SECS", "0"),
            ("SESSION_TTL_HOURS", "100000000000"),
            ("SESSION_TTL_HOURS", "0"),
            ("SESSION_TTL_HOURS", "-5"),
        ] {
            let result = ServerConfig::from_lookup(lookup(&[
                ("STORAGE_BACKEND", "memory"),
                ("SESSION_SECRET", "s3cret"),
                (var, value),
            ]));
            assert_matches!(result, Err(ConfigError::Invalid { var: v, .. }) if v == var);
        }

        let config = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("SESSION_SECRET", "s3cret"),
            ("CACHE_TTL_SECS", "86400"),
            ("SESSION_TTL_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.cache_ttl(), MAX_TTL);
        assert_eq!(config.session.ttl_hours, MAX_TTL_HOURS);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "memory"),
            ("SESSION_SECRET", "s3cret"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,,"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
