//! Process configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chewcrew::ServiceConfig;
use tracing::warn;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_CATEGORIES: &str = "pizza,sushi,tacos,burgers,thai";

/// A variable was set but couldn't be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub categories: Vec<String>,
    pub service: ServiceConfig,
}

impl Config {
    /// Reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset keys fall back to
    /// defaults; set but malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = try_load(&lookup, "CHEWCREW_BIND", DEFAULT_BIND.to_string())?;

        let raw_categories = try_load(
            &lookup,
            "CHEWCREW_CATEGORIES",
            DEFAULT_CATEGORIES.to_string(),
        )?;
        let categories = parse_categories(&raw_categories);
        if categories.is_empty() {
            return Err(ConfigError::Invalid {
                key: "CHEWCREW_CATEGORIES",
                value: raw_categories,
                reason: "no categories listed".into(),
            });
        }

        let mut service = ServiceConfig::default();
        let timeout_ms = try_load(
            &lookup,
            "CHEWCREW_LOOKUP_TIMEOUT_MS",
            service.lookup_timeout.as_millis() as u64,
        )?;
        service.lookup_timeout = Duration::from_millis(timeout_ms);
        service.room.id_length =
            try_load(&lookup, "CHEWCREW_ID_LENGTH", service.room.id_length)?;
        if service.room.id_length == 0 {
            return Err(ConfigError::Invalid {
                key: "CHEWCREW_ID_LENGTH",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            bind,
            categories,
            service,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        },
        None => {
            warn!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}

fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}
