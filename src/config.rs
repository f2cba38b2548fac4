//! # Configuration Module
//!
//! Application settings read from the environment (a `.env` file is loaded
//! first by `main`).

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Unsupported LOG_FORMAT: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub log_format: LogFormat,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; used directly by tests
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_bot_token =
            lookup("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {value}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            telegram_bot_token,
            database_url,
            log_format,
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/pantry"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.db_max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_missing_required_value() {
        let err = AppConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "token")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/pantry"),
            ("LOG_FORMAT", "JSON"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.db_max_connections, 12);

        assert!(AppConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/pantry"),
            ("LOG_FORMAT", "xml"),
        ]))
        .is_err());
    }
}
