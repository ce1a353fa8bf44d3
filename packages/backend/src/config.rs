use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use shikkha_forecast::{
    ForecastOptions, DEFAULT_UTC_OFFSET_SECONDS, DEFAULT_WINDOW_DAYS, SUB_WINDOW_DAYS,
};

/// Velocity change compares two consecutive sub-windows
const MIN_WINDOW_DAYS: u32 = 2 * SUB_WINDOW_DAYS;
const MAX_WINDOW_DAYS: u32 = 90;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub forecast: ForecastConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            log_level,
            forecast: ForecastConfig::from_env(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Window, local timezone and store timeout used by the forecast endpoints
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub window_days: u32,
    pub utc_offset_minutes: i32,
    pub query_timeout: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_SECONDS / 60,
            query_timeout: Duration::from_millis(3000),
        }
    }
}

impl ForecastConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let window_days = std::env::var("FORECAST_WINDOW_DAYS")
            .ok()
            .and_then(|value| parse_window_days(&value))
            .unwrap_or(defaults.window_days);

        let utc_offset_minutes = std::env::var("FORECAST_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|value| parse_offset_minutes(&value))
            .unwrap_or(defaults.utc_offset_minutes);

        let query_timeout = std::env::var("FORECAST_QUERY_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.query_timeout);

        Self {
            window_days,
            utc_offset_minutes,
            query_timeout,
        }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS))
            .unwrap_or_else(|| chrono::Offset::fix(&Utc))
    }

    pub fn options_at(&self, now: DateTime<Utc>) -> ForecastOptions {
        ForecastOptions::at(now)
            .with_offset(self.utc_offset())
            .with_window_days(self.window_days)
    }
}

fn parse_window_days(raw: &str) -> Option<u32> {
    let days = raw.trim().parse::<u32>().ok()?;
    if days == 0 {
        return None;
    }
    Some(days.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS))
}

/// Offsets beyond ±14h are rejected
fn parse_offset_minutes(raw: &str) -> Option<i32> {
    let minutes = raw.trim().parse::<i32>().ok()?;
    if minutes.abs() > 14 * 60 {
        return None;
    }
    Some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_days() {
        assert_eq!(parse_window_days("14"), Some(14));
        assert_eq!(parse_window_days(" 30 "), Some(30));
        assert_eq!(parse_window_days("0"), None);
        assert_eq!(parse_window_days("365"), Some(MAX_WINDOW_DAYS));
        assert_eq!(parse_window_days("abc"), None);
    }

    #[test]
    fn test_short_window_keeps_both_sub_windows() {
        assert_eq!(parse_window_days("1"), Some(MIN_WINDOW_DAYS));
        assert_eq!(parse_window_days("13"), Some(14));

        let now = Utc::now();
        let config = ForecastConfig {
            window_days: parse_window_days("7").unwrap(),
            ..Default::default()
        };
        assert_eq!(config.options_at(now).window_days, 2 * SUB_WINDOW_DAYS);
    }

    #[test]
    fn test_parse_offset_minutes() {
        assert_eq!(parse_offset_minutes("360"), Some(360));
        assert_eq!(parse_offset_minutes("-300"), Some(-300));
        assert_eq!(parse_offset_minutes("9999"), None);
    }

    #[test]
    fn test_default_offset_is_dhaka() {
        let config = ForecastConfig::default();
        assert_eq!(config.utc_offset().local_minus_utc(), 6 * 3600);
        assert_eq!(config.window_days, 14);
    }
}
