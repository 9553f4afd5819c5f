use std::{env, num::ParseIntError};

use chrono_tz::Tz;
use tarifa::shared::{
    cache::DEFAULT_CAPACITY,
    time::{self, DEFAULT_TIMEZONE},
};
use thiserror::Error;

const PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid value for {name}: {source}")]
    InvalidNumber {
        name: &'static str,
        source: ParseIntError,
    },
    #[error(transparent)]
    Timezone(#[from] time::Error),
}

/// Runtime settings, read from `TARIFA_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub timezone: Tz,
    pub cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: PORT,
            timezone: DEFAULT_TIMEZONE,
            cache_size: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, self::Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, self::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(port) = lookup("TARIFA_PORT") {
            config.port = port.trim().parse().map_err(|source| Error::InvalidNumber {
                name: "TARIFA_PORT",
                source,
            })?;
        }
        if let Some(timezone) = lookup("TARIFA_TIMEZONE") {
            config.timezone = time::parse_timezone(timezone.trim())?;
        }
        if let Some(size) = lookup("TARIFA_CACHE_SIZE") {
            config.cache_size = size.trim().parse().map_err(|source| Error::InvalidNumber {
                name: "TARIFA_CACHE_SIZE",
                source,
            })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.cache_size, 500);
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("TARIFA_PORT", "8000"),
            ("TARIFA_TIMEZONE", "Indian/Reunion"),
            ("TARIFA_CACHE_SIZE", "0"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.timezone, chrono_tz::Indian::Reunion);
        assert_eq!(config.cache_size, 0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("TARIFA_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TARIFA_TIMEZONE", "Nowhere/Land")])).is_err());
    }
}
