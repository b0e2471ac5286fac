use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::services::trends::{DEFAULT_WINDOW_DAYS, STREAK_SCAN_LIMIT_DAYS};

pub const MAX_WINDOW_DAYS: usize = 90;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    // Aggregation
    pub trend_window_days: usize,
    pub streak_scan_limit_days: u32,

    // Snapshot hub
    pub max_entries_per_snapshot: usize,
    pub snapshot_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            trend_window_days: DEFAULT_WINDOW_DAYS,
            streak_scan_limit_days: STREAK_SCAN_LIMIT_DAYS,
            max_entries_per_snapshot: 10_000,
            snapshot_channel_capacity: 256,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(ToOwned::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            trend_window_days: parse_var("TREND_WINDOW_DAYS", defaults.trend_window_days)?,
            streak_scan_limit_days: parse_var(
                "STREAK_SCAN_LIMIT_DAYS",
                defaults.streak_scan_limit_days,
            )?,
            max_entries_per_snapshot: parse_var(
                "MAX_ENTRIES_PER_SNAPSHOT",
                defaults.max_entries_per_snapshot,
            )?,
            snapshot_channel_capacity: parse_var(
                "SNAPSHOT_CHANNEL_CAPACITY",
                defaults.snapshot_channel_capacity,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.trend_window_days) {
            bail!("TREND_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}");
        }
        if self.streak_scan_limit_days == 0 {
            bail!("STREAK_SCAN_LIMIT_DAYS must be positive");
        }
        if self.snapshot_channel_capacity == 0 {
            bail!("SNAPSHOT_CHANNEL_CAPACITY must be positive");
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend_window_days, 7);
        assert_eq!(config.streak_scan_limit_days, 365);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_window_days_bounds() {
        let config = Config {
            trend_window_days: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            trend_window_days: MAX_WINDOW_DAYS + 1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
