use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub refresh_interval: Duration,
    pub realtime_interval: Duration,
    pub request_timeout: Duration,
    pub settle_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            refresh_interval: Duration::from_secs(300),
            realtime_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            settle_timeout: Duration::from_secs(20),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_base = lookup("GHPULSE_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);

        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(Error::Config(format!(
                "GHPULSE_API_BASE must be an http(s) URL, got {}",
                api_base
            )));
        }

        let refresh_interval = seconds(&lookup, "GHPULSE_REFRESH_INTERVAL_SECS")?
            .unwrap_or(defaults.refresh_interval);
        let realtime_interval = seconds(&lookup, "GHPULSE_REALTIME_INTERVAL_SECS")?
            .unwrap_or(defaults.realtime_interval);
        let request_timeout = seconds(&lookup, "GHPULSE_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout);
        let settle_timeout = seconds(&lookup, "GHPULSE_SETTLE_TIMEOUT_SECS")?
            .unwrap_or(defaults.settle_timeout);

        Ok(Self {
            api_base,
            refresh_interval,
            realtime_interval,
            request_timeout,
            settle_timeout,
        })
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<Duration>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds, got {:?}", name, raw))
            })?;
            if secs == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
            Ok(Some(Duration::from_secs(secs)))
        }
    }
}

/// Polling intervals handed to each dashboard view.
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    pub refresh_interval: Duration,
    pub realtime_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DashboardConfig {
    fn from(config: &Config) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            realtime_interval: config.realtime_interval,
        }
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.realtime_interval, Duration::from_secs(30));
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("GHPULSE_API_BASE", "https://example.dev/"),
            ("GHPULSE_REALTIME_INTERVAL_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://example.dev");
        assert_eq!(config.realtime_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup_from(&[("GHPULSE_REFRESH_INTERVAL_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("GHPULSE_REFRESH_INTERVAL_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("GHPULSE_API_BASE", "localhost")])).is_err());
    }
}
